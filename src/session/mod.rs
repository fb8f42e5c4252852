// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! State machines for the two asynchronous collaborators.
//!
//! Sessions never perform I/O themselves: the controller starts a session, runs the service call,
//! and feeds the completion back. Keeping the transitions synchronous makes every interleaving of
//! completions reproducible in tests.

use thiserror::Error;

pub mod generation;
pub mod import;

pub use generation::{GenerationOutcome, GenerationSession, GenerationState};
pub use import::{ImportSession, ImportState};

/// Errors returned directly to the caller that triggered them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("an import is already in flight")]
    AlreadyInFlight,
    #[error("no imported component with id '{component_id}'")]
    ComponentNotFound { component_id: String },
    #[error("prompt must not be empty")]
    EmptyPrompt,
}

/// A collaborator failure captured into session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionFailure {
    #[error("import failed: {0}")]
    ImportFailed(String),
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

impl SessionFailure {
    pub fn reason(&self) -> &str {
        match self {
            Self::ImportFailed(reason) | Self::GenerationFailed(reason) => reason,
        }
    }
}

pub(crate) fn component_not_found(id: &str) -> SessionError {
    SessionError::ComponentNotFound {
        component_id: id.to_owned(),
    }
}
