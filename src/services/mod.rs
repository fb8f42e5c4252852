// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Contracts for the external collaborators.
//!
//! Both services are opaque: latency is unbounded and each call resolves or rejects exactly once.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub mod mock;

pub use mock::{MockGenerationService, MockImportService};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ServiceError {
    reason: String,
}

impl ServiceError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn into_reason(self) -> String {
        self.reason
    }
}

/// One component as reported by the design tool, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalComponent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ExternalComponent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }
}

#[async_trait]
pub trait ImportService: Send + Sync {
    async fn request_import(&self) -> Result<Vec<ExternalComponent>, ServiceError>;
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn request_generation(&self, prompt: &str) -> Result<String, ServiceError>;
}
