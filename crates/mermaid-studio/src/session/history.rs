//! Linear undo/redo history of the diagram source.
//!
//! Both stacks hold whole snapshots of the source text. The undo stack keeps
//! the most recent snapshot at the back; the redo stack keeps the next snapshot
//! to restore at the front. Recording a new snapshot clears the redo stack,
//! so history never branches.

use std::{collections::VecDeque, mem};

/// Bounded undo/redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<String>,
    redo: VecDeque<String>,
    limit: usize,
}

impl History {
    /// Creates an empty history keeping at most `limit` undo snapshots.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(limit.min(64)),
            redo: VecDeque::new(),
            limit,
        }
    }

    /// Records `previous` as the latest undo snapshot and drops redo history.
    ///
    /// The oldest snapshot is evicted once the limit is exceeded.
    pub fn record(&mut self, previous: String) {
        self.push_undo(previous);
        self.redo.clear();
    }

    /// Restores the latest undo snapshot into `current`.
    ///
    /// The replaced text becomes the next redo snapshot. Returns `false`, and
    /// leaves `current` untouched, when there is nothing to undo.
    pub fn undo(&mut self, current: &mut String) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        let replaced = mem::replace(current, previous);
        self.redo.push_front(replaced);
        true
    }

    /// Restores the next redo snapshot into `current`.
    ///
    /// The replaced text is pushed back onto the undo stack. Returns `false`,
    /// and leaves `current` untouched, when there is nothing to redo.
    pub fn redo(&mut self, current: &mut String) -> bool {
        let Some(next) = self.redo.pop_front() else {
            return false;
        };
        let replaced = mem::replace(current, next);
        self.push_undo(replaced);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo snapshots held.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo snapshots held.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Undo snapshots, oldest first.
    pub fn undo_snapshots(&self) -> impl Iterator<Item = &str> {
        self.undo.iter().map(String::as_str)
    }

    fn push_undo(&mut self, snapshot: String) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }
}
