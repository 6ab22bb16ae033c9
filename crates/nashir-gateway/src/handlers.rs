// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook ingestion and health handlers.
//!
//! The webhook handlers are the boundary where inbound attachments are made
//! durable: inline base64 payloads go through the media store before the
//! fragment enters the pending submission store, so everything downstream
//! only ever sees stable URLs.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use nashir_core::types::{MediaVisibility, SourceChannel};
use nashir_core::NashirError;
use nashir_pipeline::{is_force_trigger, PipelineOutcome};
use nashir_storage::queries::pending;

use crate::server::AppState;

/// Inbound webhook body: one message fragment, parsed by the channel
/// provider's adapter upstream.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    /// Normalized phone number or email address.
    pub sender_address: String,
    /// Authorization token extracted from the message body.
    pub token: String,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Raw text of this fragment.
    pub message_part: String,
    /// Attachment URLs that are already durable.
    #[serde(default)]
    pub media_urls: Vec<String>,
    /// Inline attachments still to be made durable.
    #[serde(default)]
    pub attachments: Vec<InlineAttachment>,
    /// Explicit force-flush request from the provider adapter.
    #[serde(default)]
    pub force_process: bool,
}

/// An attachment carried inline in the webhook body.
#[derive(Debug, Deserialize)]
pub struct InlineAttachment {
    pub filename: String,
    pub content_base64: String,
    #[serde(default = "default_mime")]
    pub mime_type: String,
}

fn default_mime() -> String {
    "application/octet-stream".to_string()
}

/// Response body for the webhook routes.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub submission_id: String,
    pub is_first_fragment: bool,
    pub fragment_count: usize,
    /// Set when this fragment force-flushed the submission inline.
    pub forced: bool,
    /// Terminal pipeline outcome when forced, absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub storage: String,
    /// Pipeline executions that hit the top-level failure boundary.
    pub pipeline_failures: u64,
}

/// POST /v1/webhooks/whatsapp
pub async fn post_whatsapp_webhook(
    State(state): State<AppState>,
    Json(body): Json<WebhookRequest>,
) -> Response {
    handle_inbound(state, SourceChannel::Whatsapp, body).await
}

/// POST /v1/webhooks/email
pub async fn post_email_webhook(
    State(state): State<AppState>,
    Json(body): Json<WebhookRequest>,
) -> Response {
    handle_inbound(state, SourceChannel::Email, body).await
}

async fn handle_inbound(state: AppState, channel: SourceChannel, body: WebhookRequest) -> Response {
    // Make inline attachments durable first; only stable URLs enter the
    // pending store. A bad attachment is skipped, not fatal to the fragment.
    let mut media_urls = body.media_urls.clone();
    for attachment in &body.attachments {
        match materialize(&state, attachment).await {
            Ok(url) => media_urls.push(url),
            Err(error) => {
                warn!(
                    filename = %attachment.filename,
                    %error,
                    "attachment could not be stored, skipping"
                );
            }
        }
    }

    let window = std::time::Duration::from_secs(state.aggregation.window_secs);
    let (submission, is_first) = match pending::append_fragment(
        &state.db,
        &body.sender_address,
        &body.token,
        body.token_id.as_deref(),
        body.user_id.as_deref(),
        &channel.to_string(),
        &body.message_part,
        &media_urls,
        window,
    )
    .await
    {
        Ok(result) => result,
        Err(error) => {
            error!(%error, "failed to append inbound fragment");
            return internal_error(&error);
        }
    };

    let forced = body.force_process
        || is_force_trigger(&body.message_part, &state.aggregation.trigger_keywords);
    let mut outcome = None;
    if forced {
        match state.pipeline.try_force(&submission.id).await {
            Ok(Some(result)) => outcome = Some(outcome_label(&result).to_string()),
            // Scheduler got there first; nothing left to do.
            Ok(None) => {}
            Err(error) => {
                error!(%error, "force-flush claim failed");
                return internal_error(&error);
            }
        }
    }

    (
        StatusCode::ACCEPTED,
        Json(WebhookResponse {
            submission_id: submission.id,
            is_first_fragment: is_first,
            fragment_count: submission.message_parts.len(),
            forced,
            outcome,
        }),
    )
        .into_response()
}

async fn materialize(state: &AppState, attachment: &InlineAttachment) -> Result<String, NashirError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&attachment.content_base64)
        .map_err(|e| NashirError::Media {
            message: format!("invalid base64 attachment payload: {e}"),
            source: Some(Box::new(e)),
        })?;
    let stored = state
        .media
        .put(
            &attachment.filename,
            bytes,
            &attachment.mime_type,
            MediaVisibility::Public,
        )
        .await?;
    Ok(stored.url)
}

fn outcome_label(outcome: &PipelineOutcome) -> &'static str {
    match outcome {
        PipelineOutcome::Published(_) => "published",
        PipelineOutcome::Draft(_) => "draft",
        PipelineOutcome::Rejected(_) => "rejected",
        PipelineOutcome::Failed => "failed",
    }
}

fn internal_error(error: &NashirError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// GET /health — public liveness endpoint.
pub async fn get_health(State(state): State<AppState>) -> Response {
    let storage = match state
        .db
        .connection()
        .call(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
    {
        Ok(()) => "healthy".to_string(),
        Err(error) => {
            warn!(%error, "storage health probe failed");
            format!("unhealthy: {error}")
        }
    };

    let healthy = storage == "healthy";
    let payload = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        storage,
        pipeline_failures: state.pipeline.failure_count(),
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(payload)).into_response()
}
