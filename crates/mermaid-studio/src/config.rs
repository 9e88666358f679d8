//! Configuration types for Mermaid Studio.
//!
//! This module provides configuration structures that control editing
//! sessions, the viewer, image export, persistence and the rendering engine.
//! All types implement [`serde::Deserialize`] and every field has a default,
//! so a configuration file only needs to name what it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`EditorConfig`] - Undo history size and autosave quiet period.
//! - [`ViewerConfig`] - Zoom bounds and step.
//! - [`ExportConfig`] - Export canvas colors and geometry.
//! - [`StorageConfig`] - Durable storage slot names.
//! - [`RenderConfig`] - External rendering command.
//!
//! # Example
//!
//! ```
//! # use mermaid_studio::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.editor().history_limit(), 50);
//! assert!(config.export().background_color().is_ok());
//! ```

use std::time::Duration;

use serde::Deserialize;

use mermaid_studio_core::color::Color;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Editing session configuration section.
    #[serde(default)]
    editor: EditorConfig,

    /// Viewer configuration section.
    #[serde(default)]
    viewer: ViewerConfig,

    /// Export configuration section.
    #[serde(default)]
    export: ExportConfig,

    /// Storage configuration section.
    #[serde(default)]
    storage: StorageConfig,

    /// Rendering engine configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Returns the editing session configuration.
    pub fn editor(&self) -> &EditorConfig {
        &self.editor
    }

    /// Returns the viewer configuration.
    pub fn viewer(&self) -> &ViewerConfig {
        &self.viewer
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }

    /// Returns the storage configuration.
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Returns the rendering engine configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }
}

/// Editing session configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo entries kept.
    history_limit: usize,

    /// Quiet period, in milliseconds, before an edit burst is persisted.
    autosave_delay_ms: u64,
}

impl EditorConfig {
    /// Creates an [`EditorConfig`] with the given history limit and autosave delay.
    pub fn new(history_limit: usize, autosave_delay: Duration) -> Self {
        Self {
            history_limit,
            autosave_delay_ms: u64::try_from(autosave_delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns the maximum number of undo entries kept.
    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Returns the autosave quiet period.
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            autosave_delay_ms: 1000,
        }
    }
}

/// Zoom configuration for the diagram viewer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    min_zoom: f32,
    max_zoom: f32,
    zoom_step: f32,
}

impl ViewerConfig {
    /// Returns the smallest allowed scale.
    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    /// Returns the largest allowed scale.
    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    /// Returns the scale change of one discrete zoom action.
    pub fn zoom_step(&self) -> f32 {
        self.zoom_step
    }

    /// Checks that the bounds are positive and ordered.
    ///
    /// # Errors
    ///
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_zoom <= 0.0 {
            return Err(format!("min_zoom must be positive, got {}", self.min_zoom));
        }
        if self.max_zoom < self.min_zoom {
            return Err(format!(
                "max_zoom ({}) must not be smaller than min_zoom ({})",
                self.max_zoom, self.min_zoom
            ));
        }
        if self.zoom_step <= 0.0 {
            return Err(format!("zoom_step must be positive, got {}", self.zoom_step));
        }
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 4.0,
            zoom_step: 0.2,
        }
    }
}

/// Export canvas configuration.
///
/// The exported image places the diagram on a solid background below a
/// centered title band.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Canvas background, as a CSS color string.
    background_color: String,

    /// Title text color, as a CSS color string.
    title_color: String,

    /// Title font size in canvas units.
    title_font_size: f32,

    /// Height of the band reserved above the diagram for the title.
    title_band: f32,

    /// Baseline of the title, measured from the top of the canvas.
    title_baseline: f32,

    /// Total horizontal (and bottom) margin around the diagram.
    margin: f32,

    /// Smallest canvas width.
    min_width: f32,

    /// Pixel density multiplier applied when rasterizing.
    scale: f32,
}

impl ExportConfig {
    /// Returns the parsed background [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn background_color(&self) -> Result<Color, String> {
        Color::new(&self.background_color)
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the parsed title [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn title_color(&self) -> Result<Color, String> {
        Color::new(&self.title_color).map_err(|err| format!("Invalid title color in config: {err}"))
    }

    pub fn title_font_size(&self) -> f32 {
        self.title_font_size
    }

    pub fn title_band(&self) -> f32 {
        self.title_band
    }

    pub fn title_baseline(&self) -> f32 {
        self.title_baseline
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background_color: "#020617".to_string(),
            title_color: "#f8fafc".to_string(),
            title_font_size: 32.0,
            title_band: 80.0,
            title_baseline: 50.0,
            margin: 40.0,
            min_width: 400.0,
            scale: 5.0,
        }
    }
}

/// Names of the durable storage slots.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    code_key: String,
    title_key: String,
}

impl StorageConfig {
    /// Returns the slot holding the diagram source.
    pub fn code_key(&self) -> &str {
        &self.code_key
    }

    /// Returns the slot holding the diagram title.
    pub fn title_key(&self) -> &str {
        &self.title_key
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            code_key: "mermaid-go-code".to_string(),
            title_key: "mermaid-go-title".to_string(),
        }
    }
}

/// External rendering engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Executable of the Mermaid command-line renderer.
    command: String,

    /// Extra arguments passed before the input/output arguments.
    args: Vec<String>,
}

impl RenderConfig {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            command: "mmdc".to_string(),
            args: Vec::new(),
        }
    }
}
