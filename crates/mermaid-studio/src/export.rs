//! Export codec for Mermaid Studio.
//!
//! Everything that turns session state or rendered markup into something
//! that leaves the process lives here:
//!
//! - [`share`] - the URL-safe share token and share links
//! - [`filename`] - deterministic export file names
//! - [`sanitize`] - script and event-handler stripping of rendered SVG
//! - [`compose`] - the export canvas: background, title band and diagram
//! - [`measure`] - the diagram's bounding box as declared by its markup
//!
//! # Error Handling
//!
//! Fallible export operations return [`Error`]. [`Error`] converts into
//! [`StudioError::Export`] at the crate boundary. Decoding a share token never
//! fails: a malformed token is reported as "no shared state".
//!
//! [`StudioError::Export`]: crate::StudioError::Export

pub mod compose;
pub mod filename;
pub mod measure;
pub mod sanitize;
pub mod share;

pub use compose::{ExportDocument, ExportLayout, compose_export};
pub use filename::{export_filename, filename_for};
pub use measure::intrinsic_size;
pub use sanitize::{SVG_NAMESPACE, sanitize_markup};
pub use share::{SharedState, decode_state, encode_state, share_url, token_from_url};

use thiserror::Error;

/// Errors that can occur while exporting a rendered diagram.
#[derive(Debug, Error)]
pub enum Error {
    /// The rendered markup is not well-formed.
    #[error("markup could not be parsed: {0}")]
    Markup(String),

    /// The rendered markup contains no element.
    #[error("markup has no root element")]
    MissingRoot,

    /// The sanitized markup could not be serialized.
    #[error("markup could not be written: {0}")]
    Write(String),

    /// The export style is invalid (for example, a bad color).
    #[error("invalid export style: {0}")]
    Style(String),

    /// There is no successfully rendered diagram to export.
    #[error("nothing has been rendered yet")]
    NotRendered,
}
