// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table group.

pub mod articles;
pub mod categories;
pub mod logs;
pub mod pending;
pub mod tags;
pub mod tokens;

/// Current UTC time formatted the way the schema's strftime defaults are.
///
/// Keeping one textual format means lexicographic comparison of timestamp
/// columns (the expiry claim predicate) is also chronological comparison.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Parses a JSON array column into a string list.
pub(crate) fn parse_json_list(idx: usize, raw: String) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}
