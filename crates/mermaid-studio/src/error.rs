//! Error types for Mermaid Studio operations.
//!
//! [`StudioError`] wraps the failures of every stage a host drives through
//! the crate: validation, rendering, export, configuration and storage.

use std::io;

use thiserror::Error;

use mermaid_studio_syntax::error::SyntaxError;

use crate::{export, ports::StorageError, render::RenderError};

/// The main error type for Mermaid Studio operations.
///
/// # Diagnostic Variants
///
/// The `Syntax` variant keeps the validated source next to the diagnostics so
/// that hosts can point at the offending lines.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Syntax { err: SyntaxError, src: String },

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Export error: {0}")]
    Export(#[from] export::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl StudioError {
    /// Create a new `Syntax` error with the associated source code.
    pub fn new_syntax_error(err: SyntaxError, src: impl Into<String>) -> Self {
        Self::Syntax {
            err,
            src: src.into(),
        }
    }
}
