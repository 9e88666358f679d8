//! Integration tests for render orchestration through a workbench.

use std::cell::RefCell;

use mermaid_studio::{
    Studio, StudioError, Workbench,
    config::AppConfig,
    ports::{ManualClock, MemoryLocation, MemoryStorage},
    render::{self, FALLBACK_MESSAGE, RenderEngine, RenderError, RenderResult},
    shortcuts::{Command, KeyChord},
};

/// Engine that records every call and answers from a fixed script.
#[derive(Default)]
struct ScriptedEngine {
    calls: RefCell<Vec<(String, String)>>,
    failure: Option<RenderError>,
}

impl ScriptedEngine {
    fn failing(err: RenderError) -> Self {
        Self {
            calls: RefCell::default(),
            failure: Some(err),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl RenderEngine for ScriptedEngine {
    async fn render(&self, id: &str, source: &str) -> Result<String, RenderError> {
        self.calls
            .borrow_mut()
            .push((id.to_string(), source.to_string()));
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(format!(r#"<svg id="{id}"><text>{}</text></svg>"#, source.len())),
        }
    }
}

fn workbench() -> Workbench<MemoryStorage, MemoryLocation, ManualClock> {
    Studio::default().open(MemoryStorage::new(), MemoryLocation::new(), ManualClock::new())
}

#[tokio::test]
async fn test_generate_renders_current_source() {
    let engine = ScriptedEngine::default();
    let mut workbench = workbench();
    workbench.set_text("graph LR\n  A --> B");

    let request = workbench.generate().expect("entering the viewer requests a render");
    assert_eq!(workbench.renderer().result(), Some(&RenderResult::Loading));

    let outcome = render::perform(&engine, &request).await;
    assert!(workbench.resolve(&request, outcome));

    assert_eq!(
        engine.calls.borrow()[0],
        ("diagram-1".to_string(), "graph LR\n  A --> B".to_string())
    );
    assert!(workbench.renderer().markup().unwrap().contains(r#"id="diagram-1""#));
    assert!(workbench.viewport_mut().is_some());
}

#[tokio::test]
async fn test_stale_results_are_discarded() {
    let engine = ScriptedEngine::default();
    let mut workbench = workbench();

    let first = workbench.generate().unwrap();
    let second = workbench
        .set_text("pie\n  \"a\" : 1")
        .expect("editing while viewing requests a render");
    assert_ne!(first.id(), second.id());

    let second_outcome = render::perform(&engine, &second).await;
    let first_outcome = render::perform(&engine, &first).await;

    assert!(workbench.resolve(&second, second_outcome));
    assert!(!workbench.resolve(&first, first_outcome));
    assert!(workbench.renderer().markup().unwrap().contains(second.id()));
}

#[tokio::test]
async fn test_precheck_skips_the_engine() {
    let engine = ScriptedEngine::default();
    let mut workbench = workbench();
    workbench.set_text("hello world");

    let request = workbench.generate().unwrap();
    let outcome = render::perform(&engine, &request).await;
    workbench.resolve(&request, outcome);

    assert_eq!(engine.call_count(), 0);
    assert_eq!(
        workbench.renderer().error(),
        Some(RenderError::MissingDiagramType.to_string().as_str())
    );
}

#[tokio::test]
async fn test_empty_source_fails_fast() {
    let engine = ScriptedEngine::default();
    let mut workbench = workbench();
    workbench.generate();

    let request = workbench.set_text("   \n").unwrap();
    let outcome = render::perform(&engine, &request).await;
    workbench.resolve(&request, outcome);

    assert_eq!(engine.call_count(), 0);
    assert_eq!(workbench.renderer().error(), Some("Diagram code is empty."));
}

#[tokio::test]
async fn test_engine_messages() {
    let verbatim = ScriptedEngine::failing(RenderError::engine("Parse error on line 2:\n...A -->"));
    let silent = ScriptedEngine::failing(RenderError::Engine(None));
    let mut workbench = workbench();

    let request = workbench.generate().unwrap();
    let outcome = render::perform(&verbatim, &request).await;
    workbench.resolve(&request, outcome);
    assert_eq!(
        workbench.renderer().error(),
        Some("Parse error on line 2:\n...A -->")
    );

    let request = workbench.set_text("graph TD\n  X").unwrap();
    let outcome = render::perform(&silent, &request).await;
    workbench.resolve(&request, outcome);
    assert_eq!(workbench.renderer().error(), Some(FALLBACK_MESSAGE));
    assert!(workbench.viewport_mut().is_none());
}

#[tokio::test]
async fn test_back_drops_pending_render() {
    let engine = ScriptedEngine::default();
    let mut workbench = workbench();
    let request = workbench.generate().unwrap();

    assert!(workbench.back());
    let outcome = render::perform(&engine, &request).await;
    assert!(!workbench.resolve(&request, outcome));
    assert_eq!(workbench.renderer().result(), None);

    assert!(workbench.set_text("pie").is_none());
}

#[tokio::test]
async fn test_render_with_orchestrator() {
    let engine = ScriptedEngine::default();
    let mut orchestrator = render::RenderOrchestrator::default();

    assert!(orchestrator.render_with(&engine, "journey").await);
    assert!(orchestrator.markup().is_some());
}

#[tokio::test]
async fn test_studio_render() {
    let engine = ScriptedEngine::default();
    let studio = Studio::new(AppConfig::default());

    let markup = studio.render(&engine, "mindmap\n  root").await.unwrap();
    assert!(markup.starts_with("<svg"));

    let err = studio.render(&engine, "").await.unwrap_err();
    assert!(matches!(err, StudioError::Render(RenderError::EmptySource)));
    assert_eq!(engine.call_count(), 1);
}

#[test]
fn test_shortcuts_only_apply_in_editor() {
    let mut workbench = workbench();
    workbench.set_text("pie");

    let shortcut = workbench
        .handle_key(&KeyChord::new("z").with_ctrl())
        .unwrap();
    assert_eq!(shortcut.command(), Command::Undo);
    assert!(workbench.session().can_redo());

    workbench.handle_key(&KeyChord::new("y").with_meta());
    assert_eq!(workbench.session().source(), "pie");

    workbench.generate();
    assert!(workbench.handle_key(&KeyChord::new("z").with_ctrl()).is_none());
    assert_eq!(workbench.session().source(), "pie");
}

#[test]
fn test_undo_to_identical_text_does_not_rerender() {
    let mut workbench = workbench();
    workbench.generate().unwrap();
    workbench.set_text("graph TD\n  A").unwrap();
    workbench.set_text("graph TD\n  B").unwrap();
    workbench.set_text_untracked("graph TD\n  A").unwrap();

    assert!(workbench.undo().is_none());
    assert_eq!(workbench.session().source(), "graph TD\n  A");
    assert!(workbench.session().can_redo());

    assert!(workbench.redo().is_none());
    assert_eq!(workbench.session().source(), "graph TD\n  A");

    assert!(workbench.undo().is_none());
    let request = workbench.undo().expect("a real change while viewing re-renders");
    assert_eq!(request.source(), workbench.session().source());
    assert_ne!(request.source(), "graph TD\n  A");
}
