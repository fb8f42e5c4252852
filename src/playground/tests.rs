// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rstest::{fixture, rstest};
use tokio::sync::oneshot;

use super::{
    GenerationStateView, ImportStateView, NotFoundTarget, Playground, PlaygroundConfig,
    PlaygroundError, PreviewMode,
};
use crate::model::{DocumentError, RenderedNodeId, SourceRange};
use crate::services::{ExternalComponent, GenerationService, ImportService, ServiceError};

type Reply<T> = oneshot::Sender<Result<T, ServiceError>>;

/// Generation service whose calls stay pending until the test resolves them by prompt.
#[derive(Default)]
struct ScriptedGeneration {
    pending: Mutex<Vec<(String, Reply<String>)>>,
}

impl ScriptedGeneration {
    fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    fn resolve(&self, prompt: &str, result: Result<String, ServiceError>) {
        let mut pending = self.pending.lock().unwrap();
        let index = pending
            .iter()
            .position(|(p, _)| p == prompt)
            .unwrap_or_else(|| panic!("no pending generation for {prompt:?}"));
        let (_, reply) = pending.remove(index);
        let _ = reply.send(result);
    }
}

#[async_trait]
impl GenerationService for ScriptedGeneration {
    async fn request_generation(&self, prompt: &str) -> Result<String, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.pending.lock().unwrap().push((prompt.to_owned(), reply));
        response.await.unwrap_or_else(|_| Err(ServiceError::new("reply dropped")))
    }
}

#[derive(Default)]
struct ScriptedImport {
    pending: Mutex<Vec<Reply<Vec<ExternalComponent>>>>,
    calls: Mutex<usize>,
}

impl ScriptedImport {
    fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn resolve(&self, result: Result<Vec<ExternalComponent>, ServiceError>) {
        let reply = self.pending.lock().unwrap().remove(0);
        let _ = reply.send(result);
    }
}

#[async_trait]
impl ImportService for ScriptedImport {
    async fn request_import(&self) -> Result<Vec<ExternalComponent>, ServiceError> {
        *self.calls.lock().unwrap() += 1;
        let (reply, response) = oneshot::channel();
        self.pending.lock().unwrap().push(reply);
        response.await.unwrap_or_else(|_| Err(ServiceError::new("reply dropped")))
    }
}

/// Services whose calls panic instead of resolving.
struct PanickingServices;

#[async_trait]
impl ImportService for PanickingServices {
    async fn request_import(&self) -> Result<Vec<ExternalComponent>, ServiceError> {
        panic!("design tool client crashed");
    }
}

#[async_trait]
impl GenerationService for PanickingServices {
    async fn request_generation(&self, _prompt: &str) -> Result<String, ServiceError> {
        panic!("model client crashed");
    }
}

struct Ctx {
    playground: Playground,
    import: Arc<ScriptedImport>,
    generation: Arc<ScriptedGeneration>,
}

impl Ctx {
    fn with_config(config: PlaygroundConfig) -> Self {
        let import = Arc::new(ScriptedImport::default());
        let generation = Arc::new(ScriptedGeneration::default());
        let playground = Playground::new(config, import.clone(), generation.clone());
        Self { playground, import, generation }
    }

    /// Lets spawned service tasks run until `ready` holds.
    async fn wait_until(&self, ready: impl Fn(&Self) -> bool) {
        for _ in 0..64 {
            if ready(self) {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("spawned service tasks never reached the expected state");
    }

    /// Lets resolved service tasks report back, then applies whatever arrived.
    async fn pump(&mut self) -> usize {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
        self.playground.drain_completions()
    }
}

#[fixture]
fn ctx() -> Ctx {
    Ctx::with_config(PlaygroundConfig::default())
}

fn sample_components() -> Vec<ExternalComponent> {
    vec![
        ExternalComponent::new("1", "Header", "FRAME"),
        ExternalComponent::new("2", "Card", "COMPONENT"),
        ExternalComponent::new("3", "Button", "COMPONENT"),
    ]
}

const CARD: &str = "<div className=\"card\">\n  <h2>Title</h2>\n  <p>Body</p>\n</div>";

fn node(path: &str) -> RenderedNodeId {
    path.parse().expect("node id")
}

#[rstest]
#[tokio::test]
async fn later_request_wins_even_when_earlier_one_resolves_last(ctx: Ctx) {
    let mut ctx = ctx;
    let t1 = ctx.playground.generate_from_prompt("button").expect("t1");
    let t2 = ctx.playground.generate_from_prompt("card").expect("t2");
    assert!(t2 > t1);
    ctx.wait_until(|c| c.generation.pending() == 2).await;

    ctx.generation.resolve("card", Ok("CardComponent".to_owned()));
    assert_eq!(ctx.playground.next_completion().await, Some(true));
    let view = ctx.playground.view_state();
    assert_eq!((view.source_text.as_str(), view.revision), ("CardComponent", 2));
    assert_eq!(view.generation_state, GenerationStateView::Succeeded { token: t2 });

    ctx.generation.resolve("button", Ok("ButtonComponent".to_owned()));
    assert_eq!(ctx.pump().await, 1);
    let view = ctx.playground.view_state();
    assert_eq!((view.source_text.as_str(), view.revision), ("CardComponent", 2));
    assert_eq!(view.generation_state, GenerationStateView::Succeeded { token: t2 });
}

#[rstest]
#[tokio::test]
async fn stale_failure_is_not_surfaced(ctx: Ctx) {
    let mut ctx = ctx;
    ctx.playground.generate_from_prompt("button").expect("t1");
    let t2 = ctx.playground.generate_from_prompt("card").expect("t2");
    ctx.wait_until(|c| c.generation.pending() == 2).await;

    ctx.generation.resolve("button", Err(ServiceError::new("model overloaded")));
    ctx.pump().await;
    assert_eq!(
        ctx.playground.view_state().generation_state,
        GenerationStateView::InFlight { token: t2, prompt: "card".to_owned() }
    );
    assert!(ctx.playground.is_busy());
}

#[rstest]
#[tokio::test]
async fn current_failure_is_surfaced_without_touching_the_document(ctx: Ctx) {
    let mut ctx = ctx;
    ctx.playground.edit_source(CARD);
    let t1 = ctx.playground.generate_from_prompt("hero").expect("t1");
    ctx.wait_until(|c| c.generation.pending() == 1).await;

    ctx.generation.resolve("hero", Err(ServiceError::new("model overloaded")));
    assert_eq!(ctx.playground.next_completion().await, Some(true));

    let view = ctx.playground.view_state();
    assert_eq!(
        view.generation_state,
        GenerationStateView::Failed { token: t1, reason: "model overloaded".to_owned() }
    );
    assert_eq!(view.source_text, CARD);
    assert!(!view.busy);
}

#[rstest]
#[tokio::test]
async fn cancelled_generation_completes_as_a_no_op(ctx: Ctx) {
    let mut ctx = ctx;
    let t1 = ctx.playground.generate_from_prompt("button").expect("t1");
    ctx.wait_until(|c| c.generation.pending() == 1).await;

    assert_eq!(ctx.playground.cancel_generation(), Some(t1));
    assert_eq!(
        ctx.playground.view_state().generation_state,
        GenerationStateView::Idle { last_cancelled: Some(t1) }
    );

    ctx.generation.resolve("button", Ok("ButtonComponent".to_owned()));
    ctx.pump().await;
    let view = ctx.playground.view_state();
    assert_eq!((view.source_text.as_str(), view.revision), ("", 1));
    assert_eq!(ctx.playground.next_completion().await, None);
}

#[tokio::test]
async fn aborting_superseded_generations_keeps_latest_result() {
    let mut ctx = Ctx::with_config(PlaygroundConfig {
        abort_superseded_generations: true,
        ..PlaygroundConfig::default()
    });
    ctx.playground.generate_from_prompt("button").expect("t1");
    ctx.wait_until(|c| c.generation.pending() == 1).await;
    ctx.playground.generate_from_prompt("card").expect("t2");
    ctx.wait_until(|c| c.generation.pending() == 2).await;

    ctx.generation.resolve("button", Ok("ButtonComponent".to_owned()));
    ctx.generation.resolve("card", Ok("CardComponent".to_owned()));
    ctx.pump().await;
    assert_eq!(ctx.playground.document().text(), "CardComponent");
}

#[rstest]
#[case("")]
#[case("  \n")]
#[tokio::test]
async fn empty_prompt_is_rejected(ctx: Ctx, #[case] prompt: &str) {
    let mut ctx = ctx;
    assert_eq!(ctx.playground.generate_from_prompt(prompt), Err(PlaygroundError::EmptyPrompt));
    assert_eq!(
        ctx.playground.view_state().generation_state,
        GenerationStateView::Idle { last_cancelled: None }
    );
}

#[rstest]
#[tokio::test]
async fn overlapping_import_is_rejected_and_first_result_applies(ctx: Ctx) {
    let mut ctx = ctx;
    ctx.playground.import_components().expect("import");
    assert_eq!(ctx.playground.import_components(), Err(PlaygroundError::AlreadyInFlight));
    ctx.wait_until(|c| c.import.pending() == 1).await;
    assert_eq!(ctx.import.calls(), 1);
    assert!(ctx.playground.view_state().busy);

    ctx.import.resolve(Ok(sample_components()));
    assert_eq!(ctx.playground.next_completion().await, Some(true));

    let ImportStateView::Succeeded { components } = ctx.playground.view_state().import_state else {
        panic!("expected succeeded import");
    };
    let names = components.iter().map(|c| c.display_name()).collect::<Vec<_>>();
    assert_eq!(names, ["Header", "Card", "Button"]);
}

#[rstest]
#[tokio::test]
async fn import_failure_is_captured_in_view_state(ctx: Ctx) {
    let mut ctx = ctx;
    ctx.playground.import_components().expect("import");
    ctx.wait_until(|c| c.import.pending() == 1).await;
    ctx.import.resolve(Err(ServiceError::new("401 unauthorized")));
    ctx.playground.next_completion().await;

    assert_eq!(
        ctx.playground.view_state().import_state,
        ImportStateView::Failed { reason: "401 unauthorized".to_owned() }
    );
    // A failed import can be retried.
    ctx.playground.import_components().expect("retry");
}

#[rstest]
#[tokio::test]
async fn selecting_a_component_synthesizes_renderable_source(ctx: Ctx) {
    let mut ctx = ctx;
    ctx.playground.import_components().expect("import");
    ctx.wait_until(|c| c.import.pending() == 1).await;
    ctx.import.resolve(Ok(sample_components()));
    ctx.playground.next_completion().await;

    let revision = ctx.playground.select_imported_component("2").expect("select");
    let view = ctx.playground.view_state();
    assert_eq!(view.revision, revision);
    assert!(view.source_text.contains("export function Card()"));
    assert_eq!(view.selected_component.as_ref().map(|id| id.as_str()), Some("2"));
    assert_eq!(view.render_error, None);
    assert_eq!(ctx.playground.rendered().tree.node_count(), 2);

    // Re-selecting produces identical text and therefore no new revision.
    assert_eq!(ctx.playground.select_imported_component("2"), Ok(revision));

    assert_eq!(
        ctx.playground.select_imported_component("42"),
        Err(PlaygroundError::NotFound(NotFoundTarget::Component("42".to_owned())))
    );
}

#[rstest]
fn broken_edit_keeps_last_good_preview_until_repaired(ctx: Ctx) {
    let mut ctx = ctx;
    let good = ctx.playground.edit_source(CARD);
    let tree = ctx.playground.rendered().tree.clone();
    let map = ctx.playground.source_map().clone();

    let broken = ctx
        .playground
        .edit_source("<div className=\"card\">\n  <h2>Title</h2>\n  <p>Body\n</div>");
    assert!(broken > good);
    let view = ctx.playground.view_state();
    assert!(view.source_text.contains("<p>Body\n</div>"));
    assert!(view.render_error.as_deref().is_some_and(|e| e.contains("mismatched closing tag")));
    assert_eq!(view.preview_revision, good);
    assert_eq!(ctx.playground.rendered().tree, tree);
    assert_eq!(ctx.playground.source_map(), &map);

    let repaired = ctx.playground.edit_source(CARD.replace("Body", "Copy"));
    let view = ctx.playground.view_state();
    assert_eq!(view.render_error, None);
    assert_eq!(view.preview_revision, repaired);
    let body = ctx.playground.source_map().lookup_by_rendered_node(&node("0.1.0")).expect("text");
    assert_eq!(body.slice(&view.source_text), Some("Copy"));
}

#[rstest]
fn preview_mode_switch_never_re_renders(ctx: Ctx) {
    let mut ctx = ctx;
    ctx.playground.edit_source(CARD);
    let good = ctx.playground.view_state().preview_revision;
    ctx.playground.edit_source("<div>");

    ctx.playground.set_preview_mode(PreviewMode::Preview);
    let view = ctx.playground.view_state();
    assert_eq!(view.preview_mode, PreviewMode::Preview);
    assert_eq!(view.preview_revision, good);
    assert!(view.render_error.is_some());
    let preview = view.preview.expect("preview exposed in preview mode");
    assert!(preview.text.starts_with("div.card"));

    ctx.playground.set_preview_mode(PreviewMode::Code);
    assert_eq!(ctx.playground.view_state().preview, None);
}

#[rstest]
fn click_to_code_resolves_and_highlights_source(ctx: Ctx) {
    let mut ctx = ctx;
    ctx.playground.edit_source(CARD);

    let range = ctx.playground.resolve_click_to_code(&node("0.0")).expect("h2");
    assert_eq!(range.slice(CARD), Some("<h2>Title</h2>"));
    assert_eq!(ctx.playground.view_state().highlight, Some(range));

    // Preview line 3 is `  p`; column 2 is its label.
    let range = ctx.playground.resolve_preview_click(3, 2).expect("p");
    assert_eq!(range.slice(CARD), Some("<p>Body</p>"));

    assert_eq!(
        ctx.playground.resolve_click_to_code(&node("0.9")),
        Err(PlaygroundError::NotFound(NotFoundTarget::RenderedNode(node("0.9"))))
    );
    assert_eq!(
        ctx.playground.resolve_preview_click(0, 30),
        Err(PlaygroundError::NotFound(NotFoundTarget::PreviewCell { line: 0, column: 30 }))
    );

    ctx.playground.edit_source(CARD.replace("Title", "Heading"));
    assert_eq!(ctx.playground.view_state().highlight, None);
}

#[rstest]
fn identical_edits_do_not_bump_revision(ctx: Ctx) {
    let mut ctx = ctx;
    let revision = ctx.playground.edit_source(CARD);
    assert_eq!(ctx.playground.edit_source(CARD), revision);
    assert_eq!(ctx.playground.edit_range(SourceRange::new(0, 4), "<div"), Ok(revision));
}

#[rstest]
fn range_edits_splice_and_rebuild(ctx: Ctx) {
    let mut ctx = ctx;
    ctx.playground.edit_source(CARD);
    let title = ctx
        .playground
        .source_map()
        .lookup_by_rendered_node(&node("0.0.0"))
        .expect("title");

    ctx.playground.edit_range(title, "Pricing").expect("edit");
    let text = ctx.playground.document().text().to_owned();
    let new_title = ctx
        .playground
        .source_map()
        .lookup_by_rendered_node(&node("0.0.0"))
        .expect("title");
    assert_eq!(new_title.slice(&text), Some("Pricing"));

    let len = text.len();
    assert_eq!(
        ctx.playground.edit_range(SourceRange::new(0, len + 1), "x"),
        Err(PlaygroundError::InvalidRange(DocumentError::InvalidRange {
            range: SourceRange::new(0, len + 1),
            len
        }))
    );
}

#[rstest]
fn reset_returns_to_an_empty_document(ctx: Ctx) {
    let mut ctx = ctx;
    let before = ctx.playground.edit_source(CARD);
    let after = ctx.playground.reset();
    assert!(after > before);

    let view = ctx.playground.view_state();
    assert_eq!(view.source_text, "");
    assert_eq!(view.preview_revision, after);
    assert!(ctx.playground.rendered().tree.is_empty());
    assert!(ctx.playground.source_map().is_empty());
    assert_eq!(ctx.playground.document().text_at(before), Some(CARD));
}

#[rstest]
fn async_requests_need_a_runtime(ctx: Ctx) {
    let mut ctx = ctx;
    assert_eq!(ctx.playground.import_components(), Err(PlaygroundError::NoRuntime));
    assert_eq!(ctx.playground.generate_from_prompt("card"), Err(PlaygroundError::NoRuntime));

    let view = ctx.playground.view_state();
    assert_eq!(view.import_state, ImportStateView::Idle);
    assert_eq!(view.generation_state, GenerationStateView::Idle { last_cancelled: None });
    assert!(!view.busy);
}

#[rstest]
fn reset_of_an_empty_document_keeps_the_preview_current(ctx: Ctx) {
    let mut ctx = ctx;
    let revision = ctx.playground.document().revision();

    assert_eq!(ctx.playground.reset(), revision);
    let view = ctx.playground.view_state();
    assert_eq!(view.revision, revision);
    assert_eq!(view.preview_revision, view.revision);
}

#[tokio::test]
async fn panicking_services_still_settle_their_sessions() {
    let services = Arc::new(PanickingServices);
    let mut playground =
        Playground::new(PlaygroundConfig::default(), services.clone(), services);

    playground.import_components().expect("import");
    assert_eq!(playground.next_completion().await, Some(true));
    assert_eq!(
        playground.view_state().import_state,
        ImportStateView::Failed { reason: "import task panicked".to_owned() }
    );
    playground.import_components().expect("a failed import can be retried");
    playground.next_completion().await;

    let token = playground.generate_from_prompt("card").expect("generate");
    assert_eq!(playground.next_completion().await, Some(true));
    let view = playground.view_state();
    assert_eq!(
        view.generation_state,
        GenerationStateView::Failed { token, reason: "generation task panicked".to_owned() }
    );
    assert!(!view.busy);
    assert_eq!(playground.next_completion().await, None);
}
