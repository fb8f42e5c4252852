// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only snapshot of the playground exposed to callers.

use schemars::JsonSchema;
use serde::Serialize;

use crate::model::{ComponentId, GenerationToken, ImportedComponent, SourceRange};
use crate::render::AnnotatedPreview;
use crate::session::{GenerationState, ImportState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
    #[default]
    Code,
    Preview,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportStateView {
    Idle,
    InFlight,
    Succeeded { components: Vec<ImportedComponent> },
    Failed { reason: String },
}

impl From<&ImportState> for ImportStateView {
    fn from(state: &ImportState) -> Self {
        match state {
            ImportState::Idle => Self::Idle,
            ImportState::InFlight => Self::InFlight,
            ImportState::Succeeded(components) => Self::Succeeded {
                components: components.clone(),
            },
            ImportState::Failed(failure) => Self::Failed {
                reason: failure.reason().to_owned(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationStateView {
    Idle {
        last_cancelled: Option<GenerationToken>,
    },
    InFlight {
        token: GenerationToken,
        prompt: String,
    },
    Succeeded {
        token: GenerationToken,
    },
    Failed {
        token: GenerationToken,
        reason: String,
    },
}

impl GenerationStateView {
    pub(crate) fn new(state: &GenerationState, last_cancelled: Option<GenerationToken>) -> Self {
        match state {
            GenerationState::Idle => Self::Idle { last_cancelled },
            GenerationState::InFlight { token, prompt } => Self::InFlight {
                token: *token,
                prompt: prompt.clone(),
            },
            GenerationState::Succeeded { token, .. } => Self::Succeeded { token: *token },
            GenerationState::Failed { token, failure } => Self::Failed {
                token: *token,
                reason: failure.reason().to_owned(),
            },
        }
    }
}

/// Derived from the controller on request; never mutated independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ViewState {
    pub source_text: String,
    pub revision: u64,
    pub preview_mode: PreviewMode,
    pub import_state: ImportStateView,
    pub generation_state: GenerationStateView,
    /// True while an import or a generation is in flight.
    pub busy: bool,
    /// Last successfully rendered preview; only exposed in [`PreviewMode::Preview`].
    pub preview: Option<AnnotatedPreview>,
    /// Document revision the preview and source map were built from.
    pub preview_revision: u64,
    pub render_error: Option<String>,
    pub selected_component: Option<ComponentId>,
    pub highlight: Option<SourceRange>,
}
