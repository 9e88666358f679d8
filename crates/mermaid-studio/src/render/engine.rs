//! The boundary to the external diagram renderer.

use std::future::Future;

use thiserror::Error;

/// Message shown when the renderer fails without saying why.
pub const FALLBACK_MESSAGE: &str = "Failed to render diagram. Please check your syntax.";

/// Errors produced while rendering a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The source is blank; the renderer was not called.
    #[error("Diagram code is empty.")]
    EmptySource,

    /// The source does not start with a diagram keyword; the renderer was not called.
    #[error(
        "No diagram type detected (like 'graph', 'sequenceDiagram', etc.). Please ensure your code starts with a valid Mermaid keyword."
    )]
    MissingDiagramType,

    /// The renderer failed, with its own message if it gave one.
    #[error("{}", .0.as_deref().unwrap_or(FALLBACK_MESSAGE))]
    Engine(Option<String>),
}

impl RenderError {
    /// An engine failure carrying `message`, or no message if it is blank.
    pub fn engine(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Engine(None)
        } else {
            Self::Engine(Some(message))
        }
    }
}

/// A renderer turning diagram source into SVG markup.
///
/// `id` is unique per request and may be used by the renderer to scope
/// element ids inside the produced markup.
pub trait RenderEngine {
    fn render(&self, id: &str, source: &str)
    -> impl Future<Output = Result<String, RenderError>>;
}
