// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending submission store: fragment accumulation and atomic claiming.
//!
//! At most one row exists per (sender_address, token), enforced by a UNIQUE
//! constraint. Claiming is a guarded conditional update inside a transaction,
//! never read-then-write, so a submission claimed by the scheduler cannot also
//! be claimed by a force-trigger (or a second scheduler).

use std::time::Duration;

use nashir_core::NashirError;
use rusqlite::params;

use crate::database::Database;
use crate::models::PendingSubmission;
use crate::queries::{now_timestamp, parse_json_list};

fn row_to_submission(row: &rusqlite::Row<'_>) -> rusqlite::Result<PendingSubmission> {
    Ok(PendingSubmission {
        id: row.get(0)?,
        sender_address: row.get(1)?,
        token: row.get(2)?,
        token_id: row.get(3)?,
        user_id: row.get(4)?,
        channel: row.get(5)?,
        message_parts: parse_json_list(6, row.get(6)?)?,
        media_urls: parse_json_list(7, row.get(7)?)?,
        status: row.get(8)?,
        expires_at: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

const SELECT_COLUMNS: &str = "id, sender_address, token, token_id, user_id, channel,
    message_parts, media_urls, status, expires_at, created_at, updated_at";

/// Appends a fragment to the submission for (sender, token), creating the row
/// if none exists, and slides the expiry to `now + window`.
///
/// Returns the updated submission and whether this call created it.
#[allow(clippy::too_many_arguments)]
pub async fn append_fragment(
    db: &Database,
    sender_address: &str,
    token: &str,
    token_id: Option<&str>,
    user_id: Option<&str>,
    channel: &str,
    fragment_text: &str,
    media_urls: &[String],
    window: Duration,
) -> Result<(PendingSubmission, bool), NashirError> {
    let sender_address = sender_address.to_string();
    let token = token.to_string();
    let token_id = token_id.map(String::from);
    let user_id = user_id.map(String::from);
    let channel = channel.to_string();
    let fragment_text = fragment_text.to_string();
    let new_urls = media_urls.to_vec();

    let now = chrono::Utc::now();
    let expires_at = (now + chrono::Duration::from_std(window).unwrap_or_default())
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    let now = now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let existing = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM pending_submissions
                     WHERE sender_address = ?1 AND token = ?2"
                ))?;
                let mut rows = stmt
                    .query_map(params![sender_address, token], row_to_submission)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows.pop()
            };

            let (submission, is_first) = match existing {
                Some(mut sub) => {
                    sub.message_parts.push(fragment_text);
                    sub.media_urls.extend(new_urls);
                    sub.expires_at = expires_at;
                    sub.updated_at = now;
                    let parts_json = serde_json::to_string(&sub.message_parts)
                        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                    let urls_json = serde_json::to_string(&sub.media_urls)
                        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                    tx.execute(
                        "UPDATE pending_submissions
                         SET message_parts = ?1, media_urls = ?2, expires_at = ?3, updated_at = ?4
                         WHERE id = ?5",
                        params![parts_json, urls_json, sub.expires_at, sub.updated_at, sub.id],
                    )?;
                    (sub, false)
                }
                None => {
                    let sub = PendingSubmission {
                        id: uuid::Uuid::new_v4().to_string(),
                        sender_address,
                        token,
                        token_id,
                        user_id,
                        channel,
                        message_parts: vec![fragment_text],
                        media_urls: new_urls,
                        status: "accumulating".to_string(),
                        expires_at,
                        created_at: now.clone(),
                        updated_at: now,
                    };
                    let parts_json = serde_json::to_string(&sub.message_parts)
                        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                    let urls_json = serde_json::to_string(&sub.media_urls)
                        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                    tx.execute(
                        "INSERT INTO pending_submissions
                         (id, sender_address, token, token_id, user_id, channel,
                          message_parts, media_urls, status, expires_at, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                        params![
                            sub.id,
                            sub.sender_address,
                            sub.token,
                            sub.token_id,
                            sub.user_id,
                            sub.channel,
                            parts_json,
                            urls_json,
                            sub.status,
                            sub.expires_at,
                            sub.created_at,
                            sub.updated_at,
                        ],
                    )?;
                    (sub, true)
                }
            };

            tx.commit()?;
            Ok((submission, is_first))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Atomically claims every submission whose expiry has passed.
///
/// Flips matching rows from `accumulating` to `processing` inside one
/// transaction and returns them; a submission returned here will never be
/// returned to a concurrent caller.
pub async fn claim_expired(db: &Database) -> Result<Vec<PendingSubmission>, NashirError> {
    let now = now_timestamp();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let mut claimed = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM pending_submissions
                     WHERE status = 'accumulating' AND expires_at <= ?1
                     ORDER BY expires_at ASC"
                ))?;
                stmt.query_map(params![now], row_to_submission)?
                    .collect::<Result<Vec<_>, _>>()?
            };

            for sub in &mut claimed {
                let changed = tx.execute(
                    "UPDATE pending_submissions SET status = 'processing', updated_at = ?1
                     WHERE id = ?2 AND status = 'accumulating'",
                    params![now, sub.id],
                )?;
                debug_assert_eq!(changed, 1);
                sub.status = "processing".to_string();
            }

            tx.commit()?;
            Ok(claimed)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Claims a single submission by id if it is still accumulating.
///
/// Returns `None` when another caller already claimed (or deleted) it. This
/// is the idempotency guard for force-triggered flushes.
pub async fn claim_one(
    db: &Database,
    id: &str,
) -> Result<Option<PendingSubmission>, NashirError> {
    let id = id.to_string();
    let now = now_timestamp();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let changed = tx.execute(
                "UPDATE pending_submissions SET status = 'processing', updated_at = ?1
                 WHERE id = ?2 AND status = 'accumulating'",
                params![now, id],
            )?;

            let result = if changed == 1 {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM pending_submissions WHERE id = ?1"
                ))?;
                Some(stmt.query_row(params![id], row_to_submission)?)
            } else {
                None
            };

            tx.commit()?;
            Ok(result)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetches a submission by id without claiming it.
pub async fn get(db: &Database, id: &str) -> Result<Option<PendingSubmission>, NashirError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM pending_submissions WHERE id = ?1"
            ))?;
            let mut rows = stmt
                .query_map(params![id], row_to_submission)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows.pop())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Deletes a submission unconditionally. Deleting an absent row is not an
/// error; the pipeline calls this exactly once per execution, success or not.
pub async fn delete(db: &Database, id: &str) -> Result<(), NashirError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM pending_submissions WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
