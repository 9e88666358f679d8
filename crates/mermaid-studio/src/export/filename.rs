//! Deterministic export file names.
//!
//! Names have the form `YYYYMMDD-HHMMSS-<slug>.<ext>`. The slug keeps only
//! ASCII letters and digits from the title, lowercased, with every other run
//! of characters collapsed into a single hyphen.

use chrono::NaiveDateTime;

/// Slug used when the title has no usable characters.
const FALLBACK_SLUG: &str = "diagram";

/// File name of a PNG export.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use mermaid_studio::export::filename_for;
///
/// let at = NaiveDate::from_ymd_opt(2023, 12, 25)
///     .unwrap()
///     .and_hms_opt(14, 30, 15)
///     .unwrap();
/// assert_eq!(filename_for("Cool Diagram", at), "20231225-143015-cool-diagram.png");
/// ```
pub fn filename_for(title: &str, timestamp: NaiveDateTime) -> String {
    export_filename(title, timestamp, "png")
}

/// File name of an export with an arbitrary extension.
pub fn export_filename(title: &str, timestamp: NaiveDateTime, extension: &str) -> String {
    format!(
        "{}-{}.{extension}",
        timestamp.format("%Y%m%d-%H%M%S"),
        slug(title)
    )
}

fn slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
