//! Sanitizing of rendered SVG markup before it leaves the process.
//!
//! The markup is streamed through a [`quick_xml`] reader and re-serialized
//! event by event. Along the way:
//!
//! - `script` elements are dropped with their whole subtree, whatever their
//!   case or namespace prefix,
//! - attributes whose local name starts with `on` are stripped, as are
//!   `href` attributes pointing at a `javascript:` URL,
//! - the root `svg` element is given the SVG namespace if it lacks it or
//!   declares a different one,
//! - document type declarations and processing instructions are dropped.
//!
//! Only the predefined XML entities and character references may appear;
//! any other entity reference is an error, since its replacement text is
//! never inspected. Everything else (other attributes, text, comments) is
//! written back untouched.

use log::debug;
use quick_xml::{
    Reader, Writer,
    events::{BytesRef, BytesStart, Event, attributes::Attribute},
};

use super::Error;

/// Entities every XML processor knows without a declaration.
const PREDEFINED_ENTITIES: [&[u8]; 5] = [b"lt", b"gt", b"amp", b"apos", b"quot"];

/// Namespace every exported root element carries.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Default)]
struct Removed {
    scripts: usize,
    attributes: usize,
    declarations: usize,
}

/// Return a sanitized copy of `markup`.
///
/// # Errors
///
/// - [`Error::Markup`] if the markup is not well-formed, or its root element
///   is not `svg`.
/// - [`Error::MissingRoot`] if the markup contains no element at all.
/// - [`Error::Write`] if the sanitized markup cannot be serialized.
pub fn sanitize_markup(markup: &str) -> Result<String, Error> {
    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Vec::with_capacity(markup.len()));

    let mut depth = 0usize;
    let mut skipping = 0usize;
    let mut seen_root = false;
    let mut removed = Removed::default();

    loop {
        let event = reader
            .read_event()
            .map_err(|err| Error::Markup(err.to_string()))?;

        match event {
            Event::Eof => break,
            _ if skipping > 0 => match event {
                Event::Start(_) => skipping += 1,
                Event::End(_) => skipping -= 1,
                _ => {}
            },
            Event::Start(start) => {
                if is_script(&start) {
                    removed.scripts += 1;
                    skipping = 1;
                    continue;
                }
                let is_root = enter_top_level(depth, &mut seen_root, &start)?;
                let cleaned = clean_element(&start, is_root, &mut removed)?;
                depth += 1;
                write(&mut writer, Event::Start(cleaned))?;
            }
            Event::Empty(start) => {
                if is_script(&start) {
                    removed.scripts += 1;
                    continue;
                }
                let is_root = enter_top_level(depth, &mut seen_root, &start)?;
                let cleaned = clean_element(&start, is_root, &mut removed)?;
                write(&mut writer, Event::Empty(cleaned))?;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                write(&mut writer, Event::End(end))?;
            }
            Event::DocType(_) | Event::PI(_) => removed.declarations += 1,
            Event::GeneralRef(reference) => {
                check_reference(&reference)?;
                write(&mut writer, Event::GeneralRef(reference))?;
            }
            other => write(&mut writer, other)?,
        }
    }

    if depth > 0 || skipping > 0 {
        return Err(Error::Markup(
            "unexpected end of markup inside an open element".to_string(),
        ));
    }
    if !seen_root {
        return Err(Error::MissingRoot);
    }

    debug!(
        scripts = removed.scripts,
        attributes = removed.attributes,
        declarations = removed.declarations;
        "Sanitized diagram markup"
    );

    String::from_utf8(writer.into_inner()).map_err(|err| Error::Write(err.to_string()))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), Error> {
    writer
        .write_event(event)
        .map_err(|err| Error::Write(err.to_string()))
}

/// Tracks the top-level element. Returns whether `start` is the root.
///
/// A second element at the top level is an error.
fn enter_top_level(
    depth: usize,
    seen_root: &mut bool,
    start: &BytesStart<'_>,
) -> Result<bool, Error> {
    if depth > 0 {
        return Ok(false);
    }
    if *seen_root {
        return Err(Error::Markup(format!(
            "unexpected <{}> after the root element",
            String::from_utf8_lossy(start.name().as_ref())
        )));
    }
    *seen_root = true;
    Ok(true)
}

fn check_reference(reference: &BytesRef<'_>) -> Result<(), Error> {
    let name: &[u8] = reference;
    if name.starts_with(b"#") || PREDEFINED_ENTITIES.iter().any(|entity| *entity == name) {
        return Ok(());
    }
    Err(Error::Markup(format!(
        "undeclared entity reference &{};",
        String::from_utf8_lossy(name)
    )))
}

fn is_script(start: &BytesStart<'_>) -> bool {
    start
        .local_name()
        .as_ref()
        .eq_ignore_ascii_case(b"script")
}

/// Copy `start` without its unsafe attributes.
///
/// For the root element the name is checked and the namespace enforced.
fn clean_element(
    start: &BytesStart<'_>,
    is_root: bool,
    removed: &mut Removed,
) -> Result<BytesStart<'static>, Error> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    if is_root && !start.local_name().as_ref().eq_ignore_ascii_case(b"svg") {
        return Err(Error::Markup(format!(
            "expected an <svg> root element, found <{name}>"
        )));
    }

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        attributes.push(attr.map_err(|err| Error::Markup(err.to_string()))?);
    }

    let mut cleaned = BytesStart::new(name);
    if is_root && !attributes.iter().any(is_namespace) {
        cleaned.push_attribute(("xmlns", SVG_NAMESPACE));
    }
    for attr in attributes {
        if is_event_handler(&attr) || is_script_link(&attr) {
            removed.attributes += 1;
        } else if is_root && is_namespace(&attr) {
            cleaned.push_attribute(("xmlns", SVG_NAMESPACE));
        } else {
            cleaned.push_attribute(attr);
        }
    }
    Ok(cleaned)
}

fn is_namespace(attr: &Attribute<'_>) -> bool {
    attr.key.as_ref() == b"xmlns"
}

fn is_event_handler(attr: &Attribute<'_>) -> bool {
    let local = attr.key.local_name();
    let local = local.as_ref();
    local.len() >= 2 && local[..2].eq_ignore_ascii_case(b"on")
}

fn is_script_link(attr: &Attribute<'_>) -> bool {
    const SCHEME: &[u8] = b"javascript:";

    if !attr.key.local_name().as_ref().eq_ignore_ascii_case(b"href") {
        return false;
    }
    let value: Vec<u8> = attr
        .value
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    value.len() >= SCHEME.len() && value[..SCHEME.len()].eq_ignore_ascii_case(SCHEME)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns="http://www.w3.org/2000/svg""#;

    #[test]
    fn test_removes_script_subtree() {
        let markup = format!(
            r#"<svg {NS}><script type="text/javascript">alert(1)<g/></script><g><text>hi</text></g></svg>"#
        );
        let clean = sanitize_markup(&markup).unwrap();

        assert!(!clean.contains("script"));
        assert!(!clean.contains("alert"));
        assert!(clean.contains("<g><text>hi</text></g>"));
    }

    #[test]
    fn test_removes_script_in_any_case_or_prefix() {
        let markup = format!(
            r#"<svg {NS} xmlns:svg="http://www.w3.org/2000/svg"><SCRIPT>a()</SCRIPT><svg:script/><Script><![CDATA[b()]]></Script><rect/></svg>"#
        );
        let clean = sanitize_markup(&markup).unwrap();

        assert!(!clean.to_ascii_lowercase().contains("script"));
        assert!(!clean.contains("a()"));
        assert!(!clean.contains("b()"));
        assert!(clean.contains("<rect/>"));
    }

    #[test]
    fn test_strips_event_handlers_and_keeps_other_attributes() {
        let markup = format!(
            r#"<svg {NS} width="10" onload="x()"><rect ONCLICK="y()" fill="red" xlink:onmouseover="z()"/></svg>"#
        );
        let clean = sanitize_markup(&markup).unwrap();

        assert!(!clean.to_ascii_lowercase().contains("onload"));
        assert!(!clean.to_ascii_lowercase().contains("onclick"));
        assert!(!clean.contains("onmouseover"));
        assert!(clean.contains(r#"width="10""#));
        assert!(clean.contains(r#"<rect fill="red"/>"#));
    }

    #[test]
    fn test_strips_javascript_links_only() {
        let markup = format!(
            r##"<svg {NS}><a href=" JavaScript:alert(1)"><text>x</text></a><a href="#node"/></svg>"##
        );
        let clean = sanitize_markup(&markup).unwrap();

        assert!(!clean.to_ascii_lowercase().contains("javascript"));
        assert!(clean.contains(r##"href="#node""##));
    }

    #[test]
    fn test_adds_missing_namespace() {
        let clean = sanitize_markup(r#"<svg width="1"></svg>"#).unwrap();
        assert_eq!(clean, format!(r#"<svg {NS} width="1"></svg>"#));
    }

    #[test]
    fn test_corrects_wrong_namespace() {
        let clean = sanitize_markup(r#"<svg xmlns="http://example.test/ns"/>"#).unwrap();

        assert!(clean.contains(NS));
        assert!(!clean.contains("example.test"));
    }

    #[test]
    fn test_keeps_existing_namespace_once() {
        let markup = format!(r#"<svg {NS} id="diagram-1"><g/></svg>"#);
        let clean = sanitize_markup(&markup).unwrap();

        assert_eq!(clean, markup);
        assert_eq!(clean.matches("xmlns=").count(), 1);
    }

    #[test]
    fn test_preserves_text_comments_and_entities() {
        let markup = format!(
            r#"<?xml version="1.0"?><svg {NS}><!-- note --><style>.a{{fill:red}}</style><text>a &amp; b</text></svg>"#
        );
        let clean = sanitize_markup(&markup).unwrap();

        assert_eq!(clean, markup);
    }

    #[test]
    fn test_malformed_markup_is_an_error() {
        assert!(matches!(
            sanitize_markup("<svg><g></svg>"),
            Err(Error::Markup(_))
        ));
        assert!(matches!(sanitize_markup("<svg><g>"), Err(Error::Markup(_))));
        assert!(matches!(
            sanitize_markup("<svg><script>x"),
            Err(Error::Markup(_))
        ));
    }

    #[test]
    fn test_missing_root() {
        assert!(matches!(sanitize_markup(""), Err(Error::MissingRoot)));
        assert!(matches!(
            sanitize_markup("just some text"),
            Err(Error::MissingRoot)
        ));
    }

    #[test]
    fn test_non_svg_root_is_rejected() {
        assert!(matches!(
            sanitize_markup("<div><svg/></div>"),
            Err(Error::Markup(_))
        ));
    }

    #[test]
    fn test_second_top_level_element_is_rejected() {
        assert!(matches!(
            sanitize_markup("<svg/><div>x</div>"),
            Err(Error::Markup(_))
        ));
        assert!(matches!(
            sanitize_markup("<svg></svg><g/>"),
            Err(Error::Markup(_))
        ));
        assert!(matches!(
            sanitize_markup("<svg></svg><script>x()</script><svg/>"),
            Err(Error::Markup(_))
        ));
    }

    #[test]
    fn test_drops_doctype_and_processing_instructions() {
        let markup = format!(
            r#"<!DOCTYPE svg [<!ENTITY x "<script>alert(1)</script>">]><?xml-stylesheet href="a.css"?><svg {NS}><g/></svg>"#
        );
        let clean = sanitize_markup(&markup).unwrap();

        assert_eq!(clean, format!(r#"<svg {NS}><g/></svg>"#));
    }

    #[test]
    fn test_custom_entity_reference_is_rejected() {
        let markup = format!(
            r#"<!DOCTYPE svg [<!ENTITY x "<script>alert(1)</script><g onload='alert(2)'/>">]><svg {NS}>&x;</svg>"#
        );

        assert!(matches!(sanitize_markup(&markup), Err(Error::Markup(_))));
    }

    #[test]
    fn test_predefined_and_character_references_are_kept() {
        let markup = format!(r#"<svg {NS}><text>&lt;a&gt; &quot;&apos; &#60; &#x3C;</text></svg>"#);
        let clean = sanitize_markup(&markup).unwrap();

        assert_eq!(clean, markup);
    }
}
