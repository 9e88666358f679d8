//! Composition of the export canvas.
//!
//! The exported image is a solid background with the title centered in a
//! band at the top and the rendered diagram centered below it. The composed
//! canvas is produced as an SVG document; rasterizing it at
//! [`ExportLayout::pixel_size`] is left to the host.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::NaiveDateTime;
use log::info;
use svg::{Document, node::element as svg_element};

use mermaid_studio_core::geometry::{Point, Size};

use super::{Error, filename_for, sanitize_markup};
use crate::config::ExportConfig;

/// Title drawn when the session title is empty.
const PLACEHOLDER_TITLE: &str = "Diagram";

const TITLE_FONT_FAMILY: &str = "Inter, sans-serif";

/// Placement of the title and diagram on the export canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportLayout {
    canvas: Size,
    diagram: Size,
    diagram_origin: Point,
    title_anchor: Point,
    pixel_size: Size,
}

impl ExportLayout {
    /// Lays out a diagram of the given bounding box.
    ///
    /// The canvas is at least `min_width` wide and leaves `margin` around the
    /// diagram horizontally and below it; the title band sits above.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mermaid_studio::{config::ExportConfig, export::ExportLayout};
    /// # use mermaid_studio_core::geometry::Size;
    /// let layout = ExportLayout::new(Size::new(100.0, 50.0), &ExportConfig::default());
    ///
    /// assert_eq!(layout.canvas(), Size::new(400.0, 170.0));
    /// assert_eq!(layout.diagram_origin().x(), 150.0);
    /// ```
    pub fn new(diagram: Size, config: &ExportConfig) -> Self {
        let diagram = Size::new(diagram.width().max(0.0), diagram.height().max(0.0));

        let width = (diagram.width() + config.margin()).max(config.min_width());
        let height = diagram.height() + config.title_band() + config.margin();
        let canvas = Size::new(width, height);

        Self {
            canvas,
            diagram,
            diagram_origin: Point::new((width - diagram.width()) / 2.0, config.title_band()),
            title_anchor: Point::new(width / 2.0, config.title_baseline()),
            pixel_size: canvas.scale(config.scale()),
        }
    }

    /// Size of the canvas in document units.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Size of the embedded diagram.
    pub fn diagram(&self) -> Size {
        self.diagram
    }

    /// Top-left corner of the diagram on the canvas.
    pub fn diagram_origin(&self) -> Point {
        self.diagram_origin
    }

    /// Horizontal center and baseline of the title.
    pub fn title_anchor(&self) -> Point {
        self.title_anchor
    }

    /// Size of the rasterized image, in pixels.
    pub fn pixel_size(&self) -> Size {
        self.pixel_size
    }
}

/// A composed export, ready to be written or rasterized.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    filename: String,
    svg: String,
    layout: ExportLayout,
}

impl ExportDocument {
    /// Download file name of the rasterized image.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Serialized SVG of the composed canvas.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn layout(&self) -> &ExportLayout {
        &self.layout
    }
}

/// Compose the export canvas for rendered `markup`.
///
/// The markup is sanitized first and embedded as a base64 data URI, so the
/// composed document never carries the diagram's own markup inline.
///
/// # Errors
///
/// Returns an [`Error`] if the markup fails sanitizing or a configured color
/// is invalid. No session state is involved, so a failed export has no side
/// effects.
pub fn compose_export(
    markup: &str,
    title: &str,
    diagram_size: Size,
    timestamp: NaiveDateTime,
    config: &ExportConfig,
) -> Result<ExportDocument, Error> {
    let background = config.background_color().map_err(Error::Style)?;
    let title_color = config.title_color().map_err(Error::Style)?;
    let sanitized = sanitize_markup(markup)?;

    let layout = ExportLayout::new(diagram_size, config);
    let canvas = layout.canvas();
    let label = if title.is_empty() {
        PLACEHOLDER_TITLE
    } else {
        title
    };

    let backdrop = svg_element::Rectangle::new()
        .set("x", 0)
        .set("y", 0)
        .set("width", canvas.width())
        .set("height", canvas.height())
        .set("fill", &background)
        .set("fill-opacity", background.alpha());

    let heading = svg_element::Text::new(label)
        .set("x", layout.title_anchor().x())
        .set("y", layout.title_anchor().y())
        .set("text-anchor", "middle")
        .set("font-family", TITLE_FONT_FAMILY)
        .set("font-weight", "bold")
        .set("font-size", config.title_font_size())
        .set("fill", &title_color);

    let diagram = svg_element::Image::new()
        .set("x", layout.diagram_origin().x())
        .set("y", layout.diagram_origin().y())
        .set("width", layout.diagram().width())
        .set("height", layout.diagram().height())
        .set(
            "href",
            format!("data:image/svg+xml;base64,{}", STANDARD.encode(&sanitized)),
        );

    let document = Document::new()
        .set(
            "viewBox",
            format!("0 0 {} {}", canvas.width(), canvas.height()),
        )
        .set("width", canvas.width())
        .set("height", canvas.height())
        .add(backdrop)
        .add(heading)
        .add(diagram);

    let filename = filename_for(title, timestamp);
    info!(
        filename = filename.as_str(),
        width = layout.pixel_size().width(),
        height = layout.pixel_size().height();
        "Export composed"
    );

    Ok(ExportDocument {
        filename,
        svg: document.to_string(),
        layout,
    })
}
