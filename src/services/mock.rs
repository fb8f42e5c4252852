// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Stand-ins for the design tool and the generative model, used by the demo binary.

use std::time::Duration;

use async_trait::async_trait;

use super::{ExternalComponent, GenerationService, ImportService, ServiceError};

pub const DEFAULT_IMPORT_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_GENERATION_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct MockImportService {
    delay: Duration,
}

impl MockImportService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockImportService {
    fn default() -> Self {
        Self::new(DEFAULT_IMPORT_DELAY)
    }
}

#[async_trait]
impl ImportService for MockImportService {
    async fn request_import(&self) -> Result<Vec<ExternalComponent>, ServiceError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![
            ExternalComponent::new("1", "Header", "FRAME"),
            ExternalComponent::new("2", "Card", "COMPONENT"),
            ExternalComponent::new("3", "Button", "COMPONENT"),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct MockGenerationService {
    delay: Duration,
}

impl MockGenerationService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockGenerationService {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATION_DELAY)
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    async fn request_generation(&self, prompt: &str) -> Result<String, ServiceError> {
        tokio::time::sleep(self.delay).await;
        Ok(generated_placeholder(prompt))
    }
}

/// The placeholder component the mock model "generates" for a prompt.
pub fn generated_placeholder(prompt: &str) -> String {
    let prompt = prompt.replace(char::is_control, " ");
    format!(
        r#"
// Generated component based on prompt: "{prompt}"
export function GeneratedComponent() {{
  return (
    <div className="p-4 bg-gray-100 rounded-lg">
      <h2 className="text-xl font-bold mb-2">Generated Component</h2>
      <p>This is a placeholder for the generated component based on your prompt.</p>
    </div>
  )
}}
"#
    )
}
