// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tessera: a live component playground core.
//!
//! A single versioned source document drives a rendered preview, a bidirectional source map
//! between preview nodes and source ranges, and two asynchronous sessions (component import and
//! prompt-driven generation). [`playground::Playground`] owns all of it.

pub mod format;
pub mod logging;
pub mod model;
pub mod playground;
pub mod render;
pub mod services;
pub mod session;
pub mod source_map;

pub use playground::{Playground, PlaygroundConfig, PlaygroundError, ViewState};
