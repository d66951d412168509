//! Filename extraction from a `Content-Disposition` header value.
//!
//! The value is split on `=` and the second segment is taken as-is. This keeps the
//! naming convention existing download folders were built with, limitations included:
//!
//! - quotes are kept: `attachment; filename="a.csv"` gives `"a.csv"`;
//! - trailing parameters leak in: `filename=a.csv; size=3` gives `a.csv; size`;
//! - `filename*=UTF-8''...` is not decoded;
//! - path components (`../x`) are not stripped.

/// Second `=`-separated segment of `header_value`, or `None` when there is no `=` or
/// nothing follows it.
pub fn disposition_filename(header_value: &str) -> Option<&str> {
    header_value
        .split('=')
        .nth(1)
        .filter(|filename| !filename.is_empty())
}
