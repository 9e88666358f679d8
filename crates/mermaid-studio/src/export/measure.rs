//! Intrinsic size of rendered markup.
//!
//! The export canvas is laid out around the diagram's bounding box. Without
//! a layout engine at hand, the box is read from the root element: the
//! `viewBox` when present, otherwise numeric `width` and `height`
//! attributes.

use quick_xml::{Reader, events::Event};

use mermaid_studio_core::geometry::Size;

use super::Error;

/// Reads the size declared by the root element of `markup`.
///
/// # Errors
///
/// - [`Error::Markup`] if the markup cannot be parsed or declares no usable
///   size.
/// - [`Error::MissingRoot`] if there is no element at all.
///
/// # Examples
///
/// ```
/// # use mermaid_studio::export::intrinsic_size;
/// # use mermaid_studio_core::geometry::Size;
/// let size = intrinsic_size(r#"<svg viewBox="0 0 320 180" width="100%"/>"#).unwrap();
/// assert_eq!(size, Size::new(320.0, 180.0));
/// ```
pub fn intrinsic_size(markup: &str) -> Result<Size, Error> {
    let mut reader = Reader::from_str(markup);

    loop {
        match reader.read_event() {
            Ok(Event::Start(root)) | Ok(Event::Empty(root)) => {
                let mut view_box = None;
                let mut width = None;
                let mut height = None;
                for attr in root.attributes() {
                    let attr = attr.map_err(|err| Error::Markup(err.to_string()))?;
                    let value = String::from_utf8_lossy(&attr.value).into_owned();
                    match attr.key.as_ref() {
                        b"viewBox" => view_box = parse_view_box(&value),
                        b"width" => width = parse_length(&value),
                        b"height" => height = parse_length(&value),
                        _ => {}
                    }
                }

                return view_box
                    .or_else(|| Some(Size::new(width?, height?)))
                    .ok_or_else(|| Error::Markup("root element declares no size".to_string()));
            }
            Ok(Event::Eof) => return Err(Error::MissingRoot),
            Ok(_) => {}
            Err(err) => return Err(Error::Markup(err.to_string())),
        }
    }
}

fn parse_view_box(value: &str) -> Option<Size> {
    let numbers: Vec<f32> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match numbers[..] {
        [_, _, width, height] if width > 0.0 && height > 0.0 => Some(Size::new(width, height)),
        _ => None,
    }
}

fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value);
    number.trim().parse().ok().filter(|n: &f32| *n > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_box_wins() {
        let size =
            intrinsic_size(r#"<svg width="10" height="10" viewBox="-8 -8 200.5 100"></svg>"#)
                .unwrap();
        assert_eq!(size, Size::new(200.5, 100.0));
    }

    #[test]
    fn test_comma_separated_view_box() {
        let size = intrinsic_size(r#"<svg viewBox="0,0,40,30"/>"#).unwrap();
        assert_eq!(size, Size::new(40.0, 30.0));
    }

    #[test]
    fn test_width_and_height_fallback() {
        let size = intrinsic_size(r#"<?xml version="1.0"?><svg width="64px" height="48"/>"#)
            .unwrap();
        assert_eq!(size, Size::new(64.0, 48.0));
    }

    #[test]
    fn test_relative_sizes_are_not_usable() {
        assert!(matches!(
            intrinsic_size(r#"<svg width="100%" height="auto"/>"#),
            Err(Error::Markup(_))
        ));
        assert!(matches!(
            intrinsic_size(r#"<svg viewBox="0 0 0 10"/>"#),
            Err(Error::Markup(_))
        ));
    }

    #[test]
    fn test_no_root() {
        assert!(matches!(intrinsic_size("   "), Err(Error::MissingRoot)));
    }
}
