//! A session wired to the render orchestrator.
//!
//! The [`Workbench`] forwards edits to its [`Session`] and issues a
//! [`RenderRequest`] whenever the viewer needs a new render: on entering the
//! viewer, and on every source change while viewing. Callers perform the
//! returned request with their [`RenderEngine`](crate::render::RenderEngine)
//! and hand the outcome back through [`Workbench::resolve`].

use chrono::NaiveDateTime;
use log::info;

use mermaid_studio_core::{geometry::Size, view::ViewMode};

use crate::{
    config::{AppConfig, ExportConfig},
    error::StudioError,
    export::{self, ExportDocument, compose_export},
    ports::{Clock, Location, Storage, StorageError, SystemClock},
    render::{RenderError, RenderOrchestrator, RenderRequest, Viewport},
    session::Session,
    shortcuts::{self, Command, KeyChord, Shortcut},
};

/// An editing session together with its viewer state.
#[derive(Debug)]
pub struct Workbench<S, L, C = SystemClock> {
    session: Session<S, L, C>,
    renderer: RenderOrchestrator,
    export: ExportConfig,
}

impl<S, L, C> Workbench<S, L, C>
where
    S: Storage,
    L: Location,
    C: Clock,
{
    pub fn new(config: &AppConfig, session: Session<S, L, C>) -> Self {
        Self {
            session,
            renderer: RenderOrchestrator::new(config.viewer()),
            export: config.export().clone(),
        }
    }

    pub fn session(&self) -> &Session<S, L, C> {
        &self.session
    }

    pub fn renderer(&self) -> &RenderOrchestrator {
        &self.renderer
    }

    /// The viewport, available while a rendered diagram is shown.
    pub fn viewport_mut(&mut self) -> Option<&mut Viewport> {
        self.renderer.viewport_mut()
    }

    /// Issues the first render for a session that was opened in the viewer.
    pub fn start(&mut self) -> Option<RenderRequest> {
        if self.session.view_mode().is_viewer() && self.renderer.result().is_none() {
            Some(self.renderer.request(self.session.source()))
        } else {
            None
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Option<RenderRequest> {
        let changed = self.session.set_text(text);
        self.rerender_if(changed)
    }

    pub fn set_text_untracked(&mut self, text: impl Into<String>) -> Option<RenderRequest> {
        let changed = self.session.set_text_untracked(text);
        self.rerender_if(changed)
    }

    pub fn undo(&mut self) -> Option<RenderRequest> {
        let before = self.session.source().to_string();
        self.session.undo();
        self.rerender_if(self.session.source() != before)
    }

    pub fn redo(&mut self) -> Option<RenderRequest> {
        let before = self.session.source().to_string();
        self.session.redo();
        self.rerender_if(self.session.source() != before)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        self.session.set_title(title)
    }

    pub fn clear(&mut self) -> Option<RenderRequest> {
        let before = self.session.source().to_string();
        self.session.clear();
        self.rerender_if(self.session.source() != before)
    }

    /// Enters the viewer and requests a render of the current source.
    pub fn generate(&mut self) -> Option<RenderRequest> {
        if !self.session.generate() {
            return None;
        }
        Some(self.renderer.request(self.session.source()))
    }

    /// Returns to the editor, dropping any pending or shown render.
    pub fn back(&mut self) -> bool {
        if !self.session.back() {
            return false;
        }
        self.renderer.clear();
        true
    }

    /// Applies a render outcome; stale outcomes are ignored.
    pub fn resolve(
        &mut self,
        request: &RenderRequest,
        outcome: Result<String, RenderError>,
    ) -> bool {
        if self.session.view_mode() != ViewMode::Viewer {
            return false;
        }
        self.renderer.resolve(request, outcome)
    }

    /// Runs the editor command bound to `chord`, if any.
    ///
    /// Shortcuts are only active in the editor.
    pub fn handle_key(&mut self, chord: &KeyChord) -> Option<Shortcut> {
        if !self.session.view_mode().is_editor() {
            return None;
        }
        let shortcut = shortcuts::resolve(chord)?;
        match shortcut.command() {
            Command::Undo => self.session.undo(),
            Command::Redo => self.session.redo(),
        };
        Some(shortcut)
    }

    /// See [`Session::tick`].
    pub fn tick(&mut self) -> bool {
        self.session.tick()
    }

    /// See [`Session::flush`].
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] of the failed write.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.session.flush()
    }

    /// Composes an export of the shown diagram.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Export`] if nothing is rendered or the
    /// composition fails. The session is never modified.
    pub fn export(
        &self,
        diagram_size: Size,
        timestamp: NaiveDateTime,
    ) -> Result<ExportDocument, StudioError> {
        let markup = self.renderer.markup().ok_or(export::Error::NotRendered)?;
        let document = compose_export(
            markup,
            self.session.title(),
            diagram_size,
            timestamp,
            &self.export,
        )?;
        info!(filename = document.filename(); "Diagram exported");
        Ok(document)
    }

    fn rerender_if(&mut self, changed: bool) -> Option<RenderRequest> {
        (changed && self.session.view_mode().is_viewer())
            .then(|| self.renderer.request(self.session.source()))
    }
}
