//! Keyboard shortcuts of the editor.
//!
//! | Chord                        | Command |
//! |------------------------------|---------|
//! | `Ctrl`/`Cmd` + `Z`           | Undo    |
//! | `Ctrl`/`Cmd` + `Shift` + `Z` | Redo    |
//! | `Ctrl`/`Cmd` + `Y`           | Redo    |

/// A key press with its modifier state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    key: String,
    ctrl: bool,
    meta: bool,
    shift: bool,
}

impl KeyChord {
    /// A chord of `key` with no modifiers held.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn is(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// An editor command bound to a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
}

/// A resolved shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    command: Command,
    prevent_default: bool,
}

impl Shortcut {
    pub fn command(&self) -> Command {
        self.command
    }

    /// Whether the host should suppress its own handling of the key press.
    pub fn prevent_default(&self) -> bool {
        self.prevent_default
    }
}

/// Maps `chord` to its command, if it is bound.
///
/// Keys compare case-insensitively, since holding `Shift` usually reports
/// the upper-case letter.
pub fn resolve(chord: &KeyChord) -> Option<Shortcut> {
    if !(chord.ctrl || chord.meta) {
        return None;
    }

    let command = if chord.is("z") {
        if chord.shift {
            Command::Redo
        } else {
            Command::Undo
        }
    } else if chord.is("y") {
        Command::Redo
    } else {
        return None;
    };

    Some(Shortcut {
        command,
        prevent_default: true,
    })
}
