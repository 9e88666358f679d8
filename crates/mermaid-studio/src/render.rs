//! Render orchestration for the viewer.
//!
//! The [`RenderOrchestrator`] issues one [`RenderRequest`] per render, each
//! tagged with a fresh sequence number and element id. Rendering itself is
//! performed by a [`RenderEngine`] outside the orchestrator, usually on the
//! host's executor; the outcome is handed back through
//! [`RenderOrchestrator::resolve`]. Only the most recently issued request
//! may resolve. Results of older requests are dropped, so a slow render can
//! never overwrite a newer one.
//!
//! # Example
//!
//! ```
//! use mermaid_studio::render::{RenderOrchestrator, RenderResult};
//!
//! let mut orchestrator = RenderOrchestrator::default();
//! let first = orchestrator.request("graph TD\n  A");
//! let second = orchestrator.request("graph TD\n  A --> B");
//!
//! assert!(!orchestrator.resolve(&first, Ok("<svg/>".to_string())));
//! assert!(orchestrator.resolve(&second, Ok("<svg></svg>".to_string())));
//! assert_eq!(orchestrator.markup(), Some("<svg></svg>"));
//! ```

mod engine;
mod viewport;

pub use engine::{FALLBACK_MESSAGE, RenderEngine, RenderError};
pub use viewport::Viewport;

use log::{debug, info};

use mermaid_studio_core::diagram::{self, COMMENT_MARKER, DiagramKind};

use crate::config::ViewerConfig;

/// Prefix of the element id handed to the renderer.
const ID_PREFIX: &str = "diagram-";

/// Outcome of the latest render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResult {
    /// A render is in flight.
    Loading,

    /// The rendered SVG markup.
    Success(String),

    /// The message to show instead of the diagram.
    Error(String),
}

impl RenderResult {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// A single render to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    seq: u64,
    id: String,
    source: String,
}

impl RenderRequest {
    /// Sequence number, increasing with every request of an orchestrator.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Element id for the renderer, unique within the orchestrator.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Tracks render requests, the latest result and the viewport.
#[derive(Debug, Clone)]
pub struct RenderOrchestrator {
    last_seq: u64,
    pending: Option<u64>,
    result: Option<RenderResult>,
    viewport: Viewport,
}

impl RenderOrchestrator {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            last_seq: 0,
            pending: None,
            result: None,
            viewport: Viewport::new(config),
        }
    }

    /// Issues a request for `source`, superseding any pending one.
    ///
    /// The result turns to [`RenderResult::Loading`] and the viewport is
    /// reset to identity.
    pub fn request(&mut self, source: impl Into<String>) -> RenderRequest {
        self.last_seq += 1;
        let request = RenderRequest {
            seq: self.last_seq,
            id: format!("{ID_PREFIX}{}", self.last_seq),
            source: source.into(),
        };

        if let Some(superseded) = self.pending.replace(request.seq) {
            debug!(superseded; "Render request superseded");
        }
        self.result = Some(RenderResult::Loading);
        self.viewport.reset();

        info!(id = request.id.as_str(); "Render requested");
        request
    }

    /// Applies the outcome of `request`.
    ///
    /// Returns `false`, leaving the state untouched, if `request` is not the
    /// latest pending one.
    pub fn resolve(&mut self, request: &RenderRequest, outcome: Result<String, RenderError>) -> bool {
        if self.pending != Some(request.seq) {
            debug!(id = request.id.as_str(); "Discarding stale render result");
            return false;
        }
        self.pending = None;

        self.result = Some(match outcome {
            Ok(markup) => {
                info!(id = request.id.as_str(), len = markup.len(); "Render succeeded");
                RenderResult::Success(markup)
            }
            Err(err) => {
                info!(id = request.id.as_str(), err:%; "Render failed");
                RenderResult::Error(err.to_string())
            }
        });
        true
    }

    /// Drops the pending request and the last result.
    pub fn clear(&mut self) {
        self.pending = None;
        self.result = None;
        self.viewport.reset();
    }

    /// Requests `source`, renders it with `engine` and resolves the outcome.
    ///
    /// Returns whether the outcome was applied.
    pub async fn render_with<E: RenderEngine>(
        &mut self,
        engine: &E,
        source: impl Into<String>,
    ) -> bool {
        let request = self.request(source);
        let outcome = perform(engine, &request).await;
        self.resolve(&request, outcome)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The latest result, or `None` before the first request.
    pub fn result(&self) -> Option<&RenderResult> {
        self.result.as_ref()
    }

    /// The rendered markup, if the latest render succeeded.
    pub fn markup(&self) -> Option<&str> {
        match &self.result {
            Some(RenderResult::Success(markup)) => Some(markup),
            _ => None,
        }
    }

    /// The error message, if the latest render failed.
    pub fn error(&self) -> Option<&str> {
        match &self.result {
            Some(RenderResult::Error(message)) => Some(message),
            _ => None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The viewport, mutable only while a rendered diagram is shown.
    pub fn viewport_mut(&mut self) -> Option<&mut Viewport> {
        match self.result {
            Some(RenderResult::Success(_)) => Some(&mut self.viewport),
            _ => None,
        }
    }
}

impl Default for RenderOrchestrator {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

/// Rejects sources that cannot be a diagram before the renderer is involved.
///
/// # Errors
///
/// - [`RenderError::EmptySource`] if the source is blank.
/// - [`RenderError::MissingDiagramType`] if it neither starts with a diagram
///   keyword nor with a `%%` comment or directive.
pub fn precheck(source: &str) -> Result<(), RenderError> {
    let trimmed = diagram::strip_bom(source).trim();
    if trimmed.is_empty() {
        return Err(RenderError::EmptySource);
    }

    let first_word = trimmed
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    if DiagramKind::from_keyword(first_word).is_none() && !trimmed.starts_with(COMMENT_MARKER) {
        return Err(RenderError::MissingDiagramType);
    }
    Ok(())
}

/// Runs `request` through [`precheck`] and then `engine`.
///
/// # Errors
///
/// Returns the [`RenderError`] of the failed pre-check or engine call.
pub async fn perform<E: RenderEngine>(
    engine: &E,
    request: &RenderRequest,
) -> Result<String, RenderError> {
    precheck(request.source())?;
    engine.render(request.id(), request.source()).await
}
