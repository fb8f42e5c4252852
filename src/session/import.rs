// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use tracing::{info, warn};

use super::{component_not_found, SessionError, SessionFailure};
use crate::model::{ComponentId, ComponentKind, ImportedComponent};
use crate::services::{ExternalComponent, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImportState {
    #[default]
    Idle,
    InFlight,
    Succeeded(Vec<ImportedComponent>),
    Failed(SessionFailure),
}

/// At most one import runs at a time; overlapping requests are rejected, never queued.
#[derive(Debug, Clone, Default)]
pub struct ImportSession {
    state: ImportState,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, ImportState::InFlight)
    }

    /// Moves to `InFlight`, discarding the previous result set.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.is_in_flight() {
            return Err(SessionError::AlreadyInFlight);
        }
        self.state = ImportState::InFlight;
        Ok(())
    }

    /// Applies the service result. Returns `false` (and leaves state untouched) when no import
    /// was in flight.
    pub fn complete(&mut self, result: Result<Vec<ExternalComponent>, ServiceError>) -> bool {
        if !self.is_in_flight() {
            warn!("ignoring import completion with no import in flight");
            return false;
        }

        self.state = match result.and_then(validate_components) {
            Ok(components) => {
                info!(count = components.len(), "import succeeded");
                ImportState::Succeeded(components)
            }
            Err(err) => {
                warn!(reason = err.reason(), "import failed");
                ImportState::Failed(SessionFailure::ImportFailed(err.into_reason()))
            }
        };
        true
    }

    pub fn components(&self) -> &[ImportedComponent] {
        match &self.state {
            ImportState::Succeeded(components) => components,
            _ => &[],
        }
    }

    pub fn select(&self, id: &str) -> Result<&ImportedComponent, SessionError> {
        self.components()
            .iter()
            .find(|component| component.id().as_str() == id)
            .ok_or_else(|| component_not_found(id))
    }
}

fn validate_components(
    raw: Vec<ExternalComponent>,
) -> Result<Vec<ImportedComponent>, ServiceError> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut components = Vec::with_capacity(raw.len());

    for entry in raw {
        let id = ComponentId::new(entry.id.as_str()).map_err(|err| {
            ServiceError::new(format!("invalid component id '{}': {err}", entry.id))
        })?;
        if !seen.insert(id.clone()) {
            return Err(ServiceError::new(format!("duplicate component id '{id}'")));
        }
        components.push(ImportedComponent::new(
            id,
            entry.name,
            ComponentKind::from_raw(&entry.kind),
        ));
    }

    Ok(components)
}
