// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Component source formats: parsing generated source and synthesizing source for imports.

pub mod markup;
pub mod synthesis;

pub use markup::{
    parse_markup, Attribute, AttributeValue, MarkupDocument, MarkupNode, MarkupNodeKind,
    MarkupParseError,
};
pub use synthesis::{component_ident, synthesize_component_source};
