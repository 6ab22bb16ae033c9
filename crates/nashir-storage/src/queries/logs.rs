// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook audit log: append-only with incremental status transitions.
//!
//! A row is created with status `received` before any validation, then moves
//! to exactly one of `rejected` or `processed` and is never touched again.

use nashir_core::types::RejectionReason;
use nashir_core::NashirError;
use rusqlite::params;

use crate::database::Database;
use crate::models::WebhookLog;
use crate::queries::now_timestamp;

fn row_to_log(row: &rusqlite::Row<'_>) -> rusqlite::Result<WebhookLog> {
    Ok(WebhookLog {
        id: row.get(0)?,
        channel: row.get(1)?,
        sender_address: row.get(2)?,
        token: row.get(3)?,
        raw_text: row.get(4)?,
        media_count: row.get(5)?,
        fragment_count: row.get(6)?,
        status: row.get(7)?,
        reason: row.get(8)?,
        issues: row.get(9)?,
        analysis: row.get(10)?,
        article_id: row.get(11)?,
        processing_ms: row.get(12)?,
        created_at: row.get(13)?,
    })
}

const SELECT_COLUMNS: &str = "id, channel, sender_address, token, raw_text, media_count,
    fragment_count, status, reason, issues, analysis, article_id, processing_ms, created_at";

/// Creates the audit row with status `received` and returns its id.
pub async fn create_received(
    db: &Database,
    channel: &str,
    sender_address: &str,
    token: &str,
    raw_text: &str,
    media_count: i64,
    fragment_count: i64,
) -> Result<String, NashirError> {
    let id = uuid::Uuid::new_v4().to_string();
    let row_id = id.clone();
    let channel = channel.to_string();
    let sender_address = sender_address.to_string();
    let token = token.to_string();
    let raw_text = raw_text.to_string();
    let created_at = now_timestamp();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO webhook_logs
                 (id, channel, sender_address, token, raw_text, media_count,
                  fragment_count, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'received', ?8)",
                params![
                    row_id,
                    channel,
                    sender_address,
                    token,
                    raw_text,
                    media_count,
                    fragment_count,
                    created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(id)
}

/// Marks a log row rejected with its reason and optional sender-visible issues.
pub async fn mark_rejected(
    db: &Database,
    id: &str,
    reason: RejectionReason,
    issues: &[String],
    processing_ms: i64,
) -> Result<(), NashirError> {
    let id = id.to_string();
    let reason = reason.to_string();
    let issues_json = if issues.is_empty() {
        None
    } else {
        Some(serde_json::to_string(issues).map_err(NashirError::storage)?)
    };

    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE webhook_logs
                 SET status = 'rejected', reason = ?1, issues = ?2, processing_ms = ?3
                 WHERE id = ?4 AND status = 'received'",
                params![reason, issues_json, processing_ms, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Marks a log row processed with the resulting article and analysis snapshot.
pub async fn mark_processed(
    db: &Database,
    id: &str,
    article_id: &str,
    analysis_json: &str,
    processing_ms: i64,
) -> Result<(), NashirError> {
    let id = id.to_string();
    let article_id = article_id.to_string();
    let analysis_json = analysis_json.to_string();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE webhook_logs
                 SET status = 'processed', article_id = ?1, analysis = ?2, processing_ms = ?3
                 WHERE id = ?4 AND status = 'received'",
                params![article_id, analysis_json, processing_ms, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetches a log row by id.
pub async fn get(db: &Database, id: &str) -> Result<Option<WebhookLog>, NashirError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM webhook_logs WHERE id = ?1"
            ))?;
            let mut rows = stmt
                .query_map(params![id], row_to_log)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows.pop())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
