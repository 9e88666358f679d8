//! Share tokens.
//!
//! A share token is the session's source text, title and view mode,
//! serialized as compact JSON and encoded with the URL-safe base64 alphabet
//! without padding. Tokens therefore never contain `+`, `/` or `=` and can be
//! used verbatim as a URL fragment.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use log::debug;
use serde::{Deserialize, Serialize};

use mermaid_studio_core::view::ViewMode;

/// Session state carried by a share token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedState {
    #[serde(rename = "c")]
    source: String,

    #[serde(rename = "t", default)]
    title: String,

    #[serde(rename = "m", default)]
    view_mode: ViewMode,
}

impl SharedState {
    pub fn new(source: impl Into<String>, title: impl Into<String>, view_mode: ViewMode) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            view_mode,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Splits the state into `(source, title, view_mode)`.
    pub fn into_parts(self) -> (String, String, ViewMode) {
        (self.source, self.title, self.view_mode)
    }
}

#[derive(Serialize)]
struct SharedStateRef<'a> {
    c: &'a str,
    t: &'a str,
    m: ViewMode,
}

/// Encode session state into a URL-safe share token.
///
/// # Examples
///
/// ```
/// use mermaid_studio::export::{decode_state, encode_state};
/// use mermaid_studio_core::view::ViewMode;
///
/// let token = encode_state("graph TD\n  A --> B", "Flow", ViewMode::Viewer);
/// assert!(!token.contains(['+', '/', '=']));
///
/// let state = decode_state(&token).unwrap();
/// assert_eq!(state.title(), "Flow");
/// assert_eq!(state.view_mode(), ViewMode::Viewer);
/// ```
pub fn encode_state(source: &str, title: &str, view_mode: ViewMode) -> String {
    let payload = SharedStateRef {
        c: source,
        t: title,
        m: view_mode,
    };
    // Two string fields and a unit enum variant have no failing serialization path.
    let json = serde_json::to_vec(&payload).expect("string fields always serialize to JSON");
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a share token produced by [`encode_state`].
///
/// Surrounding whitespace and a leading `#` are ignored. Any malformed token
/// (padding, foreign alphabet, invalid UTF-8 or JSON structure) yields `None`.
pub fn decode_state(token: &str) -> Option<SharedState> {
    let token = token.trim();
    let token = token.strip_prefix('#').unwrap_or(token);
    if token.is_empty() {
        return None;
    }

    let bytes = match URL_SAFE_NO_PAD.decode(token) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(err:%; "Ignoring share token with invalid encoding");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(state) => Some(state),
        Err(err) => {
            debug!(err:%; "Ignoring share token with invalid payload");
            None
        }
    }
}

/// Build a share link by placing `token` in the fragment of `base`.
///
/// Any fragment already present on `base` is replaced.
pub fn share_url(base: &str, token: &str) -> String {
    let base = base.split_once('#').map_or(base, |(head, _)| head);
    format!("{base}#{token}")
}

/// Extract the share token from a link, or treat the input as a bare token.
pub fn token_from_url(url: &str) -> Option<&str> {
    let token = url
        .split_once('#')
        .map_or(url, |(_, fragment)| fragment)
        .trim();
    (!token.is_empty()).then_some(token)
}
