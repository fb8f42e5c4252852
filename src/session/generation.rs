// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Request/cancel state machine for prompt-driven generation.
//!
//! Every `start` mints a fresh [`GenerationToken`] and supersedes whatever was in flight. A
//! completion is applied only while its token is the one in flight; anything else is stale and
//! dropped, so the document only ever reflects the most recently *requested* generation no matter
//! in which order the service calls resolve.

use tracing::{debug, info, warn};

use super::{SessionError, SessionFailure};
use crate::model::GenerationToken;
use crate::services::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    InFlight {
        token: GenerationToken,
        prompt: String,
    },
    Succeeded {
        token: GenerationToken,
        source: String,
    },
    Failed {
        token: GenerationToken,
        failure: SessionFailure,
    },
}

/// What a completion did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The token was current; the caller must apply `source` to the document.
    Applied { source: String },
    /// The token was current and the failure is now surfaced through the session state.
    Failed,
    /// The token was superseded, cancelled or already settled; nothing changed.
    Stale,
}

#[derive(Debug, Clone)]
pub struct GenerationSession {
    state: GenerationState,
    last_token: u64,
    last_cancelled: Option<GenerationToken>,
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationSession {
    pub fn new() -> Self {
        Self {
            state: GenerationState::Idle,
            last_token: 0,
            last_cancelled: None,
        }
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, GenerationState::InFlight { .. })
    }

    /// The token whose completion would currently be applied.
    pub fn current_token(&self) -> Option<GenerationToken> {
        match &self.state {
            GenerationState::InFlight { token, .. } => Some(*token),
            _ => None,
        }
    }

    pub fn last_cancelled(&self) -> Option<GenerationToken> {
        self.last_cancelled
    }

    /// Starts a request for `prompt`, superseding any request still in flight. Never blocks.
    pub fn start(&mut self, prompt: &str) -> Result<GenerationToken, SessionError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(SessionError::EmptyPrompt);
        }

        if let Some(superseded) = self.current_token() {
            debug!(%superseded, "superseding in-flight generation");
        }

        self.last_token += 1;
        let token = GenerationToken::from_raw(self.last_token);
        self.state = GenerationState::InFlight {
            token,
            prompt: prompt.to_owned(),
        };
        info!(%token, "generation started");
        Ok(token)
    }

    pub fn complete(
        &mut self,
        token: GenerationToken,
        result: Result<String, ServiceError>,
    ) -> GenerationOutcome {
        if self.current_token() != Some(token) {
            debug!(%token, current = ?self.current_token(), "dropping stale generation result");
            return GenerationOutcome::Stale;
        }

        match result {
            Ok(source) => {
                info!(%token, bytes = source.len(), "generation succeeded");
                self.state = GenerationState::Succeeded {
                    token,
                    source: source.clone(),
                };
                GenerationOutcome::Applied { source }
            }
            Err(err) => {
                warn!(%token, reason = err.reason(), "generation failed");
                self.state = GenerationState::Failed {
                    token,
                    failure: SessionFailure::GenerationFailed(err.into_reason()),
                };
                GenerationOutcome::Failed
            }
        }
    }

    /// Returns to `Idle` and invalidates the in-flight token, if any.
    pub fn cancel(&mut self) -> Option<GenerationToken> {
        let cancelled = self.current_token();
        self.state = GenerationState::Idle;
        if let Some(token) = cancelled {
            info!(%token, "generation cancelled");
            self.last_cancelled = Some(token);
        }
        cancelled
    }
}
