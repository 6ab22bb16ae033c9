// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trusted sender/token reference data.
//!
//! Read-only from the pipeline's perspective per submission, except for the
//! usage counter incremented after a successful publish.

use nashir_core::NashirError;
use rusqlite::params;

use crate::database::Database;
use crate::models::TrustedToken;

fn row_to_token(row: &rusqlite::Row<'_>) -> rusqlite::Result<TrustedToken> {
    Ok(TrustedToken {
        id: row.get(0)?,
        sender_address: row.get(1)?,
        token: row.get(2)?,
        is_active: row.get(3)?,
        auto_publish: row.get(4)?,
        default_category_id: row.get(5)?,
        user_id: row.get(6)?,
        usage_count: row.get(7)?,
        created_at: row.get(8)?,
    })
}

const SELECT_COLUMNS: &str = "id, sender_address, token, is_active, auto_publish,
    default_category_id, user_id, usage_count, created_at";

/// Registers a trusted sender with its token and publishing policy.
pub async fn insert(db: &Database, token: &TrustedToken) -> Result<(), NashirError> {
    let t = token.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO trusted_tokens
                 (id, sender_address, token, is_active, auto_publish,
                  default_category_id, user_id, usage_count, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    t.id,
                    t.sender_address,
                    t.token,
                    t.is_active,
                    t.auto_publish,
                    t.default_category_id,
                    t.user_id,
                    t.usage_count,
                    t.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Looks up the token record for a (sender, token) pair.
pub async fn find(
    db: &Database,
    sender_address: &str,
    token: &str,
) -> Result<Option<TrustedToken>, NashirError> {
    let sender_address = sender_address.to_string();
    let token = token.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM trusted_tokens
                 WHERE sender_address = ?1 AND token = ?2"
            ))?;
            let mut rows = stmt
                .query_map(params![sender_address, token], row_to_token)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows.pop())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Increments the usage counter after a successful publish.
pub async fn increment_usage(db: &Database, id: &str) -> Result<(), NashirError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE trusted_tokens SET usage_count = usage_count + 1 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
