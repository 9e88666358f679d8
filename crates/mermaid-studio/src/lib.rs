//! Mermaid Studio - editing sessions, rendering and export for Mermaid diagrams.
//!
//! The crate is the state layer of a diagram editor. It validates diagram
//! source, keeps an undoable editing session persisted and mirrored into a
//! shareable link, orchestrates renders through an external engine, and
//! composes exported images. Host capabilities (storage, the link location,
//! the clock and the renderer) are injected through the traits in [`ports`]
//! and [`render::RenderEngine`].

pub mod config;
pub mod export;
pub mod ports;
pub mod render;
pub mod session;
pub mod shortcuts;

mod error;
mod workbench;

pub use mermaid_studio_core::{color, diagram, geometry, view};
pub use mermaid_studio_syntax as syntax;

pub use error::StudioError;
pub use workbench::Workbench;

use chrono::NaiveDateTime;
use log::{debug, info};

use mermaid_studio_core::{geometry::Size, view::ViewMode};
use mermaid_studio_syntax::error::Diagnostic;

use config::AppConfig;
use export::ExportDocument;
use ports::{Clock, Location, Storage};
use render::{RenderEngine, RenderOrchestrator};
use session::Session;

/// Entry point for hosts driving Mermaid Studio.
///
/// # Examples
///
/// ```
/// use mermaid_studio::{
///     Studio,
///     config::AppConfig,
///     ports::{ManualClock, MemoryLocation, MemoryStorage},
/// };
///
/// let studio = Studio::new(AppConfig::default());
/// assert!(studio.check("sequenceDiagram\n  A->>B: hi").is_ok());
///
/// let mut workbench = studio.open(MemoryStorage::new(), MemoryLocation::new(), ManualClock::new());
/// workbench.set_text("pie\n  \"a\" : 1");
/// let request = workbench.generate().unwrap();
/// assert_eq!(request.id(), "diagram-1");
/// ```
#[derive(Debug, Default)]
pub struct Studio {
    config: AppConfig,
}

impl Studio {
    /// Create a new studio with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// All validator findings for `source`, in line order.
    pub fn validate(&self, source: &str) -> Vec<Diagnostic> {
        mermaid_studio_syntax::validate(source)
    }

    /// Validate `source`, failing on any error.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Syntax`] with every diagnostic and the source.
    pub fn check(&self, source: &str) -> Result<Vec<Diagnostic>, StudioError> {
        let warnings = mermaid_studio_syntax::check(source)
            .map_err(|err| StudioError::new_syntax_error(err, source))?;
        debug!(warnings = warnings.len(); "Diagram source checked");
        Ok(warnings)
    }

    /// Load a session from the given ports and wire it to a render orchestrator.
    pub fn open<S, L, C>(&self, storage: S, location: L, clock: C) -> Workbench<S, L, C>
    where
        S: Storage,
        L: Location,
        C: Clock,
    {
        let session = Session::load(&self.config, storage, location, clock);
        Workbench::new(&self.config, session)
    }

    /// Share token for the given state.
    pub fn share(&self, source: &str, title: &str, view_mode: ViewMode) -> String {
        export::encode_state(source, title, view_mode)
    }

    /// Render `source` once, outside of any session.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Render`] if the pre-check or the engine fails.
    pub async fn render<E: RenderEngine>(&self, engine: &E, source: &str) -> Result<String, StudioError> {
        let mut orchestrator = RenderOrchestrator::new(self.config.viewer());
        let request = orchestrator.request(source);
        let markup = render::perform(engine, &request).await?;
        info!(id = request.id(), len = markup.len(); "Diagram rendered");
        Ok(markup)
    }

    /// Compose an export of rendered `markup`.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Export`] if the markup or the export style is
    /// invalid.
    pub fn export(
        &self,
        markup: &str,
        title: &str,
        diagram_size: Size,
        timestamp: NaiveDateTime,
    ) -> Result<ExportDocument, StudioError> {
        let document =
            export::compose_export(markup, title, diagram_size, timestamp, self.config.export())?;
        Ok(document)
    }
}
