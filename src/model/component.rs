// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use schemars::JsonSchema;
use serde::Serialize;

use super::ids::ComponentId;

/// Design-tool node type of an imported component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentKind {
    Frame,
    Component,
    Other,
}

impl ComponentKind {
    /// Maps the import service's raw type string; unknown types are kept as [`Self::Other`].
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "FRAME" => Self::Frame,
            "COMPONENT" => Self::Component,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frame => "FRAME",
            Self::Component => "COMPONENT",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a successful import. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ImportedComponent {
    id: ComponentId,
    display_name: String,
    kind: ComponentKind,
}

impl ImportedComponent {
    pub fn new(id: ComponentId, display_name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            kind,
        }
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }
}
