//! The editing session state machine.
//!
//! A [`Session`] owns the diagram source, its title, the view mode and the
//! undo/redo history. Every change keeps two derived states consistent:
//!
//! - the location fragment always holds the share token of the current
//!   source, title and view mode (replaced synchronously on every change),
//! - durable storage receives the source and title once edits have been
//!   quiet for the configured autosave delay.
//!
//! The session is driven entirely through `&mut self`. The host calls
//! [`Session::tick`] from its event loop so the autosave deadline can come
//! due; nothing runs in the background.
//!
//! # Example
//!
//! ```
//! use mermaid_studio::{
//!     config::AppConfig,
//!     ports::{ManualClock, MemoryLocation, MemoryStorage},
//!     session::Session,
//! };
//!
//! let mut session = Session::load(
//!     &AppConfig::default(),
//!     MemoryStorage::new(),
//!     MemoryLocation::new(),
//!     ManualClock::new(),
//! );
//! session.set_text("graph LR\n  A --> B");
//! session.undo();
//! assert!(session.can_redo());
//! ```

mod autosave;
mod history;

pub use autosave::SaveStatus;
pub use history::History;

use std::fmt;

use log::{debug, info, trace, warn};

use mermaid_studio_core::view::ViewMode;
use mermaid_studio_syntax::{error::Diagnostic, validate};

use crate::{
    config::{AppConfig, StorageConfig},
    export::{decode_state, encode_state},
    ports::{Clock, Location, Storage, StorageError, SystemClock},
};
use autosave::Autosave;

/// Source shown when neither a shared link nor storage provides one.
pub const DEFAULT_SOURCE: &str = "graph TD
    A[Start] --> B{Is it mobile?}
    B -- Yes --> C[Use Mermaid Studio]
    B -- No --> D[Still use it!]
    C --> E[Fast Rendering]
    D --> E
    E --> F[Download PNG]
    F --> G[Done]";

/// Title used when neither a shared link nor storage provides one.
pub const DEFAULT_TITLE: &str = "Mermaid Studio";

/// Where the initial state of a session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// A decodable share token in the location fragment.
    Link,

    /// At least one durable storage slot.
    Storage,

    /// Built-in defaults.
    Defaults,
}

impl fmt::Display for LoadOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link => write!(f, "link"),
            Self::Storage => write!(f, "storage"),
            Self::Defaults => write!(f, "defaults"),
        }
    }
}

/// An editing session over injected storage, location and clock.
#[derive(Debug)]
pub struct Session<S, L, C = SystemClock> {
    source: String,
    title: String,
    view_mode: ViewMode,
    origin: LoadOrigin,

    history: History,
    autosave: Autosave,
    status: SaveStatus,

    keys: StorageConfig,
    storage: S,
    location: L,
    clock: C,
}

impl<S, L, C> Session<S, L, C>
where
    S: Storage,
    L: Location,
    C: Clock,
{
    /// Loads the initial state and synchronizes the location.
    ///
    /// A decodable share token in the location is authoritative for the
    /// source, title and view mode. Otherwise each storage slot is used if
    /// it holds a non-empty value, falling back to the defaults slot by slot.
    /// The view mode only ever comes from the location. Unreadable tokens and
    /// storage failures are logged and skipped.
    pub fn load(config: &AppConfig, storage: S, location: L, clock: C) -> Self {
        let keys = config.storage().clone();

        let shared = location.fragment().and_then(|token| decode_state(&token));
        let (source, title, view_mode, origin) = match shared {
            Some(state) => {
                let (source, title, view_mode) = state.into_parts();
                (source, title, view_mode, LoadOrigin::Link)
            }
            None => {
                let source = read_slot(&storage, keys.code_key());
                let title = read_slot(&storage, keys.title_key());
                let origin = if source.is_some() || title.is_some() {
                    LoadOrigin::Storage
                } else {
                    LoadOrigin::Defaults
                };
                (
                    source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
                    title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                    ViewMode::default(),
                    origin,
                )
            }
        };

        info!(origin:% = origin, view_mode:% = view_mode; "Session loaded");

        let mut session = Self {
            source,
            title,
            view_mode,
            origin,
            history: History::new(config.editor().history_limit()),
            autosave: Autosave::new(config.editor().autosave_delay()),
            status: SaveStatus::Saved,
            keys,
            storage,
            location,
            clock,
        };
        session.sync_location();
        session
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Where the initial state came from.
    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    pub fn save_status(&self) -> SaveStatus {
        self.status
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// Share token of the current source, title and view mode.
    pub fn share_token(&self) -> String {
        encode_state(&self.source, &self.title, self.view_mode)
    }

    /// Validator findings for the current source.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        validate(&self.source)
    }

    /// Replaces the source, recording the previous text for undo.
    ///
    /// Nothing is recorded when the text is unchanged. Returns whether the
    /// source changed.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.source {
            return false;
        }
        let previous = std::mem::replace(&mut self.source, text);
        self.history.record(previous);
        self.source_changed();
        true
    }

    /// Replaces the source without touching the undo/redo history.
    pub fn set_text_untracked(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.source {
            return false;
        }
        self.source = text;
        self.source_changed();
        true
    }

    /// Restores the previous source. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let before = self.source.clone();
        if !self.history.undo(&mut self.source) {
            return false;
        }
        if self.source != before {
            self.source_changed();
        }
        true
    }

    /// Re-applies an undone source. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let before = self.source.clone();
        if !self.history.redo(&mut self.source) {
            return false;
        }
        if self.source != before {
            self.source_changed();
        }
        true
    }

    /// Replaces the title. Returns whether it changed.
    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        if title == self.title {
            return false;
        }
        self.title = title;
        trace!(title = self.title.as_str(); "Title changed");
        self.mark_dirty();
        self.sync_location();
        true
    }

    /// Empties the source (undoable) and the title.
    pub fn clear(&mut self) {
        self.set_text("");
        self.set_title("");
    }

    /// Switches to the viewer. Returns `false` if already viewing.
    pub fn generate(&mut self) -> bool {
        self.switch_mode(ViewMode::Viewer)
    }

    /// Switches back to the editor. Returns `false` if already editing.
    pub fn back(&mut self) -> bool {
        self.switch_mode(ViewMode::Editor)
    }

    /// Persists the session if the autosave deadline has passed.
    ///
    /// Returns whether a write happened. A failed write is logged and leaves
    /// the session dirty until the next edit or [`Session::flush`].
    pub fn tick(&mut self) -> bool {
        if !self.autosave.take_due(self.clock.now()) {
            return false;
        }
        match self.persist() {
            Ok(()) => true,
            Err(err) => {
                warn!(err:%; "Autosave failed");
                false
            }
        }
    }

    /// Persists pending changes immediately.
    ///
    /// Does nothing when the session is already saved.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] of the failed write; the session stays dirty.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        if self.status.is_saved() {
            return Ok(());
        }
        self.save()
    }

    /// Writes the source and title to storage now, even if nothing changed.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] of the failed write.
    pub fn save(&mut self) -> Result<(), StorageError> {
        self.autosave.cancel();
        self.persist()
    }

    fn switch_mode(&mut self, mode: ViewMode) -> bool {
        if self.view_mode == mode {
            return false;
        }
        self.view_mode = mode;
        debug!(view_mode:% = mode; "View mode changed");
        self.sync_location();
        true
    }

    fn source_changed(&mut self) {
        trace!(len = self.source.len(); "Source changed");
        self.mark_dirty();
        self.sync_location();
    }

    fn mark_dirty(&mut self) {
        self.status = SaveStatus::Dirty;
        self.autosave.schedule(self.clock.now());
    }

    fn sync_location(&mut self) {
        let token = self.share_token();
        self.location.replace_fragment(&token);
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        self.storage.set(self.keys.code_key(), &self.source)?;
        self.storage.set(self.keys.title_key(), &self.title)?;
        self.status = SaveStatus::Saved;
        debug!(len = self.source.len(); "Session persisted");
        Ok(())
    }
}

fn read_slot<S: Storage>(storage: &S, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value.filter(|value| !value.is_empty()),
        Err(err) => {
            debug!(key, err:%; "Ignoring unreadable storage slot");
            None
        }
    }
}
