//! Response classification for the Hub API.
//!
//! Maps an HTTP status code and body onto either a parsed [`ResponseBody`]
//! or a classified [`ApiError`]:
//!
//! | Status              | Result                                   |
//! |---------------------|------------------------------------------|
//! | 200, 201            | success                                  |
//! | 400                 | [`ErrorKind::InvalidParams`]             |
//! | 401, 403, 404, 500  | [`ErrorKind::Fatal`]                     |
//! | anything else       | [`ErrorKind::Retryable`]                 |
//!
//! A body that must be JSON but is not degrades to [`ErrorKind::Fatal`]
//! carrying the body's plain text; decoding errors never leak to callers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::clients::errors::{ApiError, ErrorKind};
use crate::clients::http_request::ResponseMode;

static WHITE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static STYLE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<style.*>.*</style>").expect("valid regex"));
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("valid regex"));

/// A successful response body.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    /// Parsed JSON envelope.
    Json(Value),
    /// Raw text, returned for [`ResponseMode::PlainText`] requests.
    Text(String),
}

impl ResponseBody {
    /// Converts into a JSON value; text becomes a JSON string.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }

    /// Converts into text; JSON is serialized.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text,
        }
    }
}

/// Flattens an HTML (or any) body into a single line of readable text.
///
/// Whitespace runs collapse to one space, `<style>` blocks and all remaining
/// tags are removed, and the result is trimmed.
///
/// # Example
///
/// ```rust
/// use hub_api_client::clients::extract_plain_text;
///
/// let html = "<html>\n<style>body { color: red; }</style>\n<h1>Bad   Gateway</h1>\n</html>";
/// assert_eq!(extract_plain_text(html), "Bad Gateway");
/// ```
#[must_use]
pub fn extract_plain_text(html: &str) -> String {
    let text = WHITE_SPACE.replace_all(html, " ");
    let text = STYLE_TAG.replace_all(&text, "");
    let text = ANY_TAG.replace_all(&text, "");
    WHITE_SPACE.replace_all(&text, " ").trim().to_string()
}

/// Classifies a response by status code and body.
///
/// # Errors
///
/// Returns an [`ApiError`] for every status other than 200 and 201, and for
/// a success body that is not valid JSON in [`ResponseMode::Json`].
pub fn classify(status: u16, body: &str, mode: ResponseMode) -> Result<ResponseBody, ApiError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let meta = parsed
        .as_ref()
        .and_then(|b| b.get("meta"))
        .filter(|m| m.is_object())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    match status {
        200 | 201 => match mode {
            ResponseMode::PlainText => Ok(ResponseBody::Text(body.to_string())),
            ResponseMode::Json => parsed
                .map(ResponseBody::Json)
                .ok_or_else(|| ApiError::fatal(extract_plain_text(body))),
        },
        400 => match format_api_errors(&meta) {
            Some(message) => Err(ApiError::new(ErrorKind::InvalidParams, message, meta)),
            None => Err(ApiError::fatal(extract_plain_text(body))),
        },
        401 | 403 | 404 | 500 => Err(ApiError::new(
            ErrorKind::Fatal,
            format_status(status, body),
            meta,
        )),
        _ => Err(ApiError::new(
            ErrorKind::Retryable,
            format_status(status, body),
            meta,
        )),
    }
}

fn format_status(status: u16, body: &str) -> String {
    format!("status: {status}, body: {}", extract_plain_text(body))
}

fn text_field(entry: &Value, key: &str) -> String {
    match entry.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Joins `"{error_param} {message}"` for each entry of `meta.errors`.
fn format_api_errors(meta: &Value) -> Option<String> {
    let errors = meta.get("errors")?.as_array()?;
    Some(
        errors
            .iter()
            .map(|e| format!("{} {}", text_field(e, "error_param"), text_field(e, "message")))
            .collect::<Vec<_>>()
            .join(", "),
    )
}
