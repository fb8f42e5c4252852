// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! The playground edits exactly one [`SourceDocument`]; imported components and rendered node
//! identities are addressed through the typed ids in [`ids`].

pub mod component;
pub mod document;
pub mod ids;

pub use component::{ComponentKind, ImportedComponent};
pub use document::{DocumentError, Revision, SourceDocument, SourceRange};
pub use ids::{ComponentId, GenerationToken, Id, IdError, RenderedNodeId};
