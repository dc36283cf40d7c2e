//! Input sanitization for host and date values.
//!
//! Two alphabets are accepted depending on where a value enters the
//! system: the upload path keeps plain alphanumerics only, while query
//! parameters also keep `.` and `-` so dates like `2025-01-01` survive.
//! Everything outside the alphabet is dropped, which guarantees the
//! result can never carry path separators or control characters.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_NON_UPLOAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());

static RE_NON_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9.-]").unwrap());

/// Sanitize a value arriving through the upload path: alphanumerics only.
pub fn sanitize_upload(raw: &str) -> String {
    RE_NON_UPLOAD.replace_all(raw, "").into_owned()
}

/// Sanitize a value arriving as a query parameter: alphanumerics, `.`, `-`.
pub fn sanitize_param(raw: &str) -> String {
    RE_NON_PARAM.replace_all(raw, "").into_owned()
}
