//! Editor view mode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The mode a session is displayed in.
///
/// A session starts in [`ViewMode::Editor`] unless shared state says
/// otherwise. The only transitions are editor to viewer ("generate") and
/// viewer to editor ("back").
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Source text is being edited.
    #[default]
    Editor,
    /// The rendered diagram is being viewed.
    Viewer,
}

impl ViewMode {
    pub fn is_editor(self) -> bool {
        matches!(self, ViewMode::Editor)
    }

    pub fn is_viewer(self) -> bool {
        matches!(self, ViewMode::Viewer)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Editor => write!(f, "editor"),
            ViewMode::Viewer => write!(f, "viewer"),
        }
    }
}
