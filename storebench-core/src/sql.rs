//! Conversions between model values and their SQLite column encoding.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

/// Encode a timestamp as fixed-width RFC 3339 text with nanosecond precision.
///
/// Fixed width keeps `ORDER BY created_at` chronological, and nanosecond
/// precision makes the stored value round-trip exactly.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Decode a `created_at` column value.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc))
}

/// Read column `idx` as a timestamp inside a row-mapping closure.
pub fn timestamp_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    parse_timestamp(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Escape character used with [`like_pattern`] (`LIKE ? ESCAPE '\'`).
pub const LIKE_ESCAPE: char = '\\';

/// Build a `LIKE` pattern matching `needle` anywhere in the value.
///
/// Wildcards in the needle are escaped so they match literally.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
