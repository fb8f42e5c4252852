// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The playground controller.
//!
//! [`Playground`] is the single owner of the document, the last good render and the source map.
//! User actions are `&mut self` calls; service calls run as tokio tasks and report back through a
//! completion channel that only the controller drains, so every state change happens as one
//! discrete event on the owning task and nothing is ever partially applied.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::format::synthesize_component_source;
use crate::model::document::DEFAULT_HISTORY_LIMIT;
use crate::model::{
    ComponentId, DocumentError, GenerationToken, RenderedNodeId, SourceDocument, SourceRange,
};
use crate::render::{PreviewRenderer, RenderError, RenderOptions, RenderResult, RenderTree};
use crate::services::{ExternalComponent, GenerationService, ImportService, ServiceError};
use crate::session::{GenerationOutcome, GenerationSession, ImportSession, SessionError};
use crate::source_map::SourceMap;

pub mod view;

pub use view::{GenerationStateView, ImportStateView, PreviewMode, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaygroundConfig {
    /// Number of document revisions retained for `text_at` lookups.
    pub history_limit: usize,
    /// Abort the task of a superseded or cancelled generation instead of letting it run out.
    pub abort_superseded_generations: bool,
    pub render: RenderOptions,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            abort_superseded_generations: false,
            render: RenderOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundTarget {
    Component(String),
    RenderedNode(RenderedNodeId),
    PreviewCell { line: usize, column: usize },
}

impl fmt::Display for NotFoundTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component(id) => write!(f, "imported component '{id}'"),
            Self::RenderedNode(id) => write!(f, "rendered node {id}"),
            Self::PreviewCell { line, column } => {
                write!(f, "preview node at line {line}, column {column}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaygroundError {
    #[error("an import is already in flight")]
    AlreadyInFlight,
    #[error("{0} not found")]
    NotFound(NotFoundTarget),
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error(transparent)]
    InvalidRange(#[from] DocumentError),
    #[error("no tokio runtime is available to run the request")]
    NoRuntime,
}

impl From<SessionError> for PlaygroundError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::AlreadyInFlight => Self::AlreadyInFlight,
            SessionError::ComponentNotFound { component_id } => {
                Self::NotFound(NotFoundTarget::Component(component_id))
            }
            SessionError::EmptyPrompt => Self::EmptyPrompt,
        }
    }
}

/// A service call that has resolved and waits to be applied by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Import(Result<Vec<ExternalComponent>, ServiceError>),
    Generation {
        token: GenerationToken,
        result: Result<String, ServiceError>,
    },
}

pub struct Playground {
    config: PlaygroundConfig,
    document: SourceDocument,
    renderer: PreviewRenderer,
    rendered: RenderResult,
    source_map: SourceMap,
    preview_revision: u64,
    render_error: Option<RenderError>,
    preview_mode: PreviewMode,
    import: ImportSession,
    generation: GenerationSession,
    selected_component: Option<ComponentId>,
    highlight: Option<SourceRange>,
    import_service: Arc<dyn ImportService>,
    generation_service: Arc<dyn GenerationService>,
    generation_task: Option<AbortHandle>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl Playground {
    pub fn new(
        config: PlaygroundConfig,
        import_service: Arc<dyn ImportService>,
        generation_service: Arc<dyn GenerationService>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let document = SourceDocument::new(config.history_limit);
        let preview_revision = document.revision();
        let mut playground = Self {
            config,
            document,
            renderer: PreviewRenderer::new(config.render),
            rendered: RenderResult {
                tree: RenderTree::default(),
                preview: Default::default(),
            },
            source_map: SourceMap::default(),
            preview_revision,
            render_error: None,
            preview_mode: PreviewMode::default(),
            import: ImportSession::new(),
            generation: GenerationSession::new(),
            selected_component: None,
            highlight: None,
            import_service,
            generation_service,
            generation_task: None,
            completions_tx,
            completions_rx,
        };
        playground.refresh();
        playground
    }

    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    pub fn document(&self) -> &SourceDocument {
        &self.document
    }

    /// The last successfully rendered tree and preview.
    pub fn rendered(&self) -> &RenderResult {
        &self.rendered
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    pub fn render_error(&self) -> Option<&RenderError> {
        self.render_error.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.import.is_in_flight() || self.generation.is_in_flight()
    }

    pub fn view_state(&self) -> ViewState {
        let (source_text, revision) = self.document.current_text();
        ViewState {
            source_text: source_text.to_owned(),
            revision,
            preview_mode: self.preview_mode,
            import_state: ImportStateView::from(self.import.state()),
            generation_state: GenerationStateView::new(
                self.generation.state(),
                self.generation.last_cancelled(),
            ),
            busy: self.is_busy(),
            preview: (self.preview_mode == PreviewMode::Preview)
                .then(|| self.rendered.preview.clone()),
            preview_revision: self.preview_revision,
            render_error: self.render_error.as_ref().map(RenderError::reason),
            selected_component: self.selected_component.clone(),
            highlight: self.highlight,
        }
    }

    /// Starts an import. The result arrives later as a [`Completion::Import`].
    pub fn import_components(&mut self) -> Result<(), PlaygroundError> {
        let runtime = Handle::try_current().map_err(|_| PlaygroundError::NoRuntime)?;
        self.import.start()?;
        self.selected_component = None;
        info!("import started");

        let service = Arc::clone(&self.import_service);
        spawn_service_call(
            &runtime,
            "import",
            self.completions_tx.clone(),
            async move { service.request_import().await },
            Completion::Import,
        );
        Ok(())
    }

    /// Replaces the document with the synthesized source of an imported component.
    pub fn select_imported_component(&mut self, id: &str) -> Result<u64, PlaygroundError> {
        let component = self.import.select(id)?;
        let source = synthesize_component_source(component);
        self.selected_component = Some(component.id().clone());
        debug!(component_id = id, "selected imported component");
        Ok(self.apply_text(source))
    }

    /// Starts a generation request, superseding any request still in flight.
    pub fn generate_from_prompt(
        &mut self,
        prompt: &str,
    ) -> Result<GenerationToken, PlaygroundError> {
        let runtime = Handle::try_current().map_err(|_| PlaygroundError::NoRuntime)?;
        let token = self.generation.start(prompt)?;
        self.abort_generation_task();

        let service = Arc::clone(&self.generation_service);
        let prompt = prompt.trim().to_owned();
        self.generation_task = Some(spawn_service_call(
            &runtime,
            "generation",
            self.completions_tx.clone(),
            async move { service.request_generation(&prompt).await },
            move |result| Completion::Generation { token, result },
        ));
        Ok(token)
    }

    pub fn cancel_generation(&mut self) -> Option<GenerationToken> {
        let cancelled = self.generation.cancel();
        if cancelled.is_some() {
            self.abort_generation_task();
        }
        cancelled
    }

    /// Replaces the whole document text. Identical text is a no-op.
    pub fn edit_source(&mut self, text: impl Into<String>) -> u64 {
        self.apply_text(text.into())
    }

    pub fn edit_range(&mut self, range: SourceRange, text: &str) -> Result<u64, PlaygroundError> {
        if self.document.text().get(range.start..range.end) == Some(text) {
            return Ok(self.document.revision());
        }
        let revision = self.document.edit(range, text)?;
        self.after_text_change();
        Ok(revision)
    }

    /// Empties the document. Resetting an already empty document is a no-op.
    pub fn reset(&mut self) -> u64 {
        self.selected_component = None;
        if self.document.text().is_empty() {
            return self.document.revision();
        }
        let revision = self.document.reset();
        self.after_text_change();
        revision
    }

    pub fn preview_mode(&self) -> PreviewMode {
        self.preview_mode
    }

    /// Switches the exposed view. Never re-renders.
    pub fn set_preview_mode(&mut self, mode: PreviewMode) {
        self.preview_mode = mode;
    }

    /// Resolves a rendered node to the source range that produced it and highlights that range.
    ///
    /// While the text is unrenderable the lookup runs against the last good source map, whose
    /// revision is reported as `preview_revision` in the view state.
    pub fn resolve_click_to_code(
        &mut self,
        id: &RenderedNodeId,
    ) -> Result<SourceRange, PlaygroundError> {
        let range = self
            .source_map
            .lookup_by_rendered_node(id)
            .ok_or_else(|| PlaygroundError::NotFound(NotFoundTarget::RenderedNode(id.clone())))?;
        self.highlight = Some(range);
        Ok(range)
    }

    /// Resolves a cell of the textual preview to a source range.
    pub fn resolve_preview_click(
        &mut self,
        line: usize,
        column: usize,
    ) -> Result<SourceRange, PlaygroundError> {
        let id = self
            .rendered
            .preview
            .node_at(line, column)
            .cloned()
            .ok_or(PlaygroundError::NotFound(NotFoundTarget::PreviewCell { line, column }))?;
        self.resolve_click_to_code(&id)
    }

    /// Applies one completion. Returns whether it took effect (stale or unexpected completions
    /// are dropped).
    pub fn apply_completion(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Import(result) => self.import.complete(result),
            Completion::Generation { token, result } => {
                match self.generation.complete(token, result) {
                    GenerationOutcome::Applied { source } => {
                        self.generation_task = None;
                        self.apply_text(source);
                        true
                    }
                    GenerationOutcome::Failed => {
                        self.generation_task = None;
                        true
                    }
                    GenerationOutcome::Stale => false,
                }
            }
        }
    }

    /// Waits for the next completion and applies it.
    ///
    /// Returns `None` without waiting when nothing is in flight and nothing is queued.
    pub async fn next_completion(&mut self) -> Option<bool> {
        let completion = match self.completions_rx.try_recv() {
            Ok(completion) => completion,
            Err(_) if !self.is_busy() => return None,
            Err(_) => self.completions_rx.recv().await?,
        };
        Some(self.apply_completion(completion))
    }

    /// Applies every completion that has already been delivered. Returns how many were processed.
    pub fn drain_completions(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply_completion(completion);
            processed += 1;
        }
        processed
    }

    fn abort_generation_task(&mut self) {
        if let Some(task) = self.generation_task.take() {
            if self.config.abort_superseded_generations {
                debug!("aborting superseded generation task");
                task.abort();
            }
        }
    }

    fn apply_text(&mut self, text: String) -> u64 {
        if text == self.document.text() {
            return self.document.revision();
        }
        let revision = self.document.replace(text);
        self.after_text_change();
        revision
    }

    fn after_text_change(&mut self) {
        self.highlight = None;
        self.refresh();
    }

    /// Re-renders the current text and rebuilds the source map from scratch. On failure the last
    /// good render and map stay in place and the error is recorded.
    fn refresh(&mut self) {
        let (text, revision) = self.document.current_text();
        let rebuilt = self.renderer.render(text).and_then(|rendered| {
            let map = SourceMap::rebuild(text, &rendered.tree)?;
            Ok((rendered, map))
        });

        match rebuilt {
            Ok((rendered, map)) => {
                self.rendered = rendered;
                self.source_map = map;
                self.preview_revision = revision;
                self.render_error = None;
            }
            Err(err) => {
                warn!(revision, reason = %err, "keeping last good preview");
                self.render_error = Some(err);
            }
        }
    }
}

/// Runs a service call on its own task and reports its outcome as a completion, including a
/// panic or abort of the call. Returns the handle that aborts the call.
fn spawn_service_call<T, F, C>(
    runtime: &Handle,
    label: &'static str,
    completions: mpsc::UnboundedSender<Completion>,
    call: F,
    into_completion: C,
) -> AbortHandle
where
    T: Send + 'static,
    F: Future<Output = Result<T, ServiceError>> + Send + 'static,
    C: FnOnce(Result<T, ServiceError>) -> Completion + Send + 'static,
{
    let call = runtime.spawn(call);
    let abort = call.abort_handle();
    runtime.spawn(async move {
        let result = match call.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => {
                warn!(label, "service task panicked");
                Err(ServiceError::new(format!("{label} task panicked")))
            }
            Err(_) => Err(ServiceError::new(format!("{label} task was aborted"))),
        };
        // The receiver only goes away with the controller itself.
        let _ = completions.send(into_completion(result));
    });
    abort
}

#[cfg(test)]
mod tests;
