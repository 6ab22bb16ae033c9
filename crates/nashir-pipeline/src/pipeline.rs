// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The publishing pipeline state machine.
//!
//! Thirteen strictly sequential gates turn a claimed pending submission into
//! a published (or draft) article: audit log, token validation, content
//! floor, AI quality/rewrite, slug and category resolution, article creation,
//! tag derivation, media linking, cache invalidation, usage accounting,
//! sender reply, and cleanup. The article insert is the single required
//! write; everything after it is best-effort enrichment whose per-item
//! failures never roll the article back.
//!
//! The top-level boundary in [`PublishingPipeline::run`] guarantees a
//! submission never stays `processing` forever: whatever happens, the pending
//! row is deleted exactly once per execution.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use nashir_cache::MemoryCache;
use nashir_config::model::{PipelineConfig, SiteConfig};
use nashir_core::types::{ArticleStatus, RejectionReason};
use nashir_core::{ContentAnalyzer, NashirError, OutboundNotifier};
use nashir_notify::templates;
use nashir_storage::models::{Article, Category, NewArticle, PendingSubmission};
use nashir_storage::queries::{articles, categories, logs, pending, tags, tokens};
use nashir_storage::Database;

use crate::text;

/// Cache key groups that can include a newly created article.
const LISTING_PATTERNS: &[&str] = &[
    "^homepage:",
    "^category:",
    "^trending:",
    "^blocks:",
    "^insights:",
    "^opinion:",
    "^articles:",
];

/// Cache key for the platform category list.
const CATEGORY_CACHE_KEY: &str = "categories:list";

/// Terminal result of one pipeline execution.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Article created and immediately published.
    Published(Article),
    /// Article created as a draft pending editorial review.
    Draft(Article),
    /// Submission rejected at a quality gate.
    Rejected(RejectionReason),
    /// Unexpected failure caught at the top-level boundary.
    Failed,
}

/// The publishing pipeline with its injected collaborators.
///
/// Constructed once at process start and shared behind an `Arc` between the
/// scheduler and the gateway's force-flush path.
pub struct PublishingPipeline {
    db: Database,
    cache: Arc<MemoryCache>,
    analyzer: Arc<dyn ContentAnalyzer>,
    notifier: Arc<dyn OutboundNotifier>,
    thresholds: PipelineConfig,
    site_base_url: String,
    failures: AtomicU64,
}

impl PublishingPipeline {
    pub fn new(
        db: Database,
        cache: Arc<MemoryCache>,
        analyzer: Arc<dyn ContentAnalyzer>,
        notifier: Arc<dyn OutboundNotifier>,
        thresholds: PipelineConfig,
        site: &SiteConfig,
    ) -> Self {
        Self {
            db,
            cache,
            analyzer,
            notifier,
            thresholds,
            site_base_url: site.base_url.trim_end_matches('/').to_string(),
            failures: AtomicU64::new(0),
        }
    }

    /// The database handle, shared with the scheduler's claim scan.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Number of executions that hit the top-level failure boundary.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Runs the pipeline for one claimed submission.
    ///
    /// This is the failure boundary: unexpected errors are logged, counted,
    /// and answered with a generic failure reply, and the pending submission
    /// is deleted unconditionally on every path.
    pub async fn run(&self, submission: PendingSubmission) -> PipelineOutcome {
        let submission_id = submission.id.clone();
        let sender = submission.sender_address.clone();

        let outcome = match self.execute(&submission).await {
            Ok(outcome) => outcome,
            Err(error) => {
                error!(
                    submission_id = %submission_id,
                    sender = %sender,
                    %error,
                    "pipeline execution failed"
                );
                self.failures.fetch_add(1, Ordering::Relaxed);
                self.best_effort_reply(&sender, &templates::generic_failure())
                    .await;
                PipelineOutcome::Failed
            }
        };

        if let Err(error) = pending::delete(&self.db, &submission_id).await {
            error!(submission_id = %submission_id, %error, "failed to delete completed submission");
        }

        outcome
    }

    /// Claims a submission by id and runs it inline (force-flush path).
    ///
    /// Returns `None` when the scheduler or another force-trigger already
    /// claimed it.
    pub async fn try_force(
        &self,
        submission_id: &str,
    ) -> Result<Option<PipelineOutcome>, NashirError> {
        match pending::claim_one(&self.db, submission_id).await? {
            Some(submission) => {
                debug!(submission_id, "force-flush claimed submission");
                Ok(Some(self.run(submission).await))
            }
            None => Ok(None),
        }
    }

    async fn execute(
        &self,
        submission: &PendingSubmission,
    ) -> Result<PipelineOutcome, NashirError> {
        let started = Instant::now();
        let combined = submission.combined_text();
        let fragment_count = submission.message_parts.len();

        // Gate 1: audit log before any validation.
        let log_id = logs::create_received(
            &self.db,
            &submission.channel,
            &submission.sender_address,
            &submission.token,
            &combined,
            submission.media_urls.len() as i64,
            fragment_count as i64,
        )
        .await?;

        // Gate 2: token validation. Silent rejection; an unauthorized sender
        // must not learn the channel is live.
        let token = match tokens::find(&self.db, &submission.sender_address, &submission.token)
            .await?
        {
            Some(token) => token,
            None => {
                return self
                    .reject(&log_id, RejectionReason::InvalidToken, &[], started)
                    .await;
            }
        };
        if !token.is_active {
            return self
                .reject(&log_id, RejectionReason::TokenInactive, &[], started)
                .await;
        }

        // Gate 3: content floor. Silent rejection; no reply spam for
        // accidental or empty messages.
        let cleaned = text::strip_token_marker(&combined, &submission.token);
        if submission.media_urls.is_empty()
            && cleaned.chars().count() < self.thresholds.min_text_length
        {
            return self
                .reject(&log_id, RejectionReason::TextTooShort, &[], started)
                .await;
        }

        // Gate 4: AI quality and rewrite. The one rejection the sender can
        // act on, so the one that gets a reply.
        let category_list = self.categories().await?;
        let category_names: Vec<String> =
            category_list.iter().map(|c| c.name.clone()).collect();
        let analysis = self.analyzer.analyze(&cleaned, &category_names).await?;

        if analysis.quality_score < self.thresholds.min_quality_score || !analysis.is_news {
            let outcome = self
                .reject(&log_id, RejectionReason::LowQuality, &analysis.issues, started)
                .await?;
            self.best_effort_reply(
                &submission.sender_address,
                &templates::quality_rejected(&analysis.issues),
            )
            .await;
            return Ok(outcome);
        }

        // Gate 5: media is already durable; the URLs on the submission are
        // referenced directly.

        // Gate 6: slug and category resolution.
        let slug = text::unique_slug(&analysis.title);
        let category_id = resolve_category(&category_list, analysis.category.as_deref())
            .or_else(|| token.default_category_id.clone());

        // Gate 7: article creation, the single required write.
        let published = token.auto_publish;
        let status = if published {
            ArticleStatus::Published
        } else {
            ArticleStatus::Draft
        };
        let published_at = published.then(|| {
            chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string()
        });
        let source_meta = serde_json::json!({
            "channel": submission.channel,
            "token": submission.token,
            "fragment_count": fragment_count,
            "webhook_log_id": log_id,
        })
        .to_string();

        let article = articles::create(
            &self.db,
            NewArticle {
                title: analysis.title.clone(),
                slug,
                content: analysis.content.clone(),
                excerpt: (!analysis.excerpt.trim().is_empty())
                    .then(|| analysis.excerpt.clone()),
                category_id,
                author_id: token.user_id.clone(),
                status: status.to_string(),
                published_at,
                source_meta: Some(source_meta),
                keywords: analysis.keywords.clone(),
            },
        )
        .await?;
        info!(
            article_id = %article.id,
            slug = %article.slug,
            status = %article.status,
            "article created"
        );

        // Gate 8: tag derivation, isolated per keyword.
        for keyword in analysis.keywords.iter().take(self.thresholds.max_keywords) {
            let tag_slug = text::slugify(keyword);
            if tag_slug.is_empty() {
                warn!(keyword = %keyword, "keyword yields an empty slug, skipping tag");
                continue;
            }
            if let Err(error) =
                tags::find_or_create_and_link(&self.db, &article.id, keyword, &tag_slug).await
            {
                warn!(keyword = %keyword, %error, "tag link failed, continuing");
            }
        }

        // Gate 9: media linking, isolated per image.
        for (index, url) in submission.media_urls.iter().enumerate() {
            let alt = text::alt_text(
                index,
                &analysis.title,
                &analysis.excerpt,
                self.thresholds.max_alt_text_len,
            );
            let filename = text::filename_from_url(url);
            let mime_type = text::mime_from_filename(&filename);
            if let Err(error) = articles::attach_media(
                &self.db,
                &article.id,
                &filename,
                url,
                mime_type,
                &alt,
                index as i64,
            )
            .await
            {
                warn!(url = %url, %error, "media link failed, continuing");
            }
        }

        // Gate 10: invalidate every listing cache the new article could
        // appear in; one broadcast for the whole batch.
        match self.cache.invalidate_patterns(LISTING_PATTERNS) {
            Ok(matched) if !matched.is_empty() => {
                debug!(patterns = ?matched, "listing caches invalidated");
            }
            Ok(_) => {}
            Err(error) => warn!(%error, "cache invalidation failed"),
        }

        // Gate 11: usage accounting and terminal log with latency.
        tokens::increment_usage(&self.db, &token.id).await?;
        let analysis_json = serde_json::to_string(&analysis)
            .map_err(|e| NashirError::Internal(format!("analysis snapshot: {e}")))?;
        logs::mark_processed(
            &self.db,
            &log_id,
            &article.id,
            &analysis_json,
            elapsed_ms(started),
        )
        .await?;

        // Gate 12: sender reply, best-effort.
        let reply = if published {
            let article_url = format!("{}/articles/{}", self.site_base_url, article.slug);
            templates::published(&article_url, fragment_count)
        } else {
            templates::draft_saved()
        };
        self.best_effort_reply(&submission.sender_address, &reply).await;

        // Gate 13 (cleanup) runs in `run`, on every path.
        Ok(if published {
            PipelineOutcome::Published(article)
        } else {
            PipelineOutcome::Draft(article)
        })
    }

    async fn reject(
        &self,
        log_id: &str,
        reason: RejectionReason,
        issues: &[String],
        started: Instant,
    ) -> Result<PipelineOutcome, NashirError> {
        warn!(log_id, %reason, "submission rejected");
        logs::mark_rejected(&self.db, log_id, reason, issues, elapsed_ms(started)).await?;
        Ok(PipelineOutcome::Rejected(reason))
    }

    /// Platform category list, cached under [`CATEGORY_CACHE_KEY`].
    async fn categories(&self) -> Result<Vec<Category>, NashirError> {
        if let Some(value) = self.cache.get(CATEGORY_CACHE_KEY) {
            if let Ok(list) = serde_json::from_value::<Vec<Category>>(value) {
                return Ok(list);
            }
        }
        let list = categories::list(&self.db).await?;
        if let Ok(value) = serde_json::to_value(&list) {
            self.cache.set(CATEGORY_CACHE_KEY, value, None);
        }
        Ok(list)
    }

    async fn best_effort_reply(&self, recipient: &str, reply: &str) {
        if let Err(error) = self.notifier.send_text(recipient, reply).await {
            warn!(recipient, %error, "sender reply could not be delivered");
        }
    }
}

/// Matches the AI-detected category name against the platform list.
///
/// Case-insensitive trimmed comparison; Arabic names have no case but
/// English ones do.
fn resolve_category(list: &[Category], detected: Option<&str>) -> Option<String> {
    let detected = detected?.trim().to_lowercase();
    if detected.is_empty() {
        return None;
    }
    list.iter()
        .find(|c| c.name.trim().to_lowercase() == detected)
        .map(|c| c.id.clone())
}

fn elapsed_ms(started: Instant) -> i64 {
    started.elapsed().as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            slug: id.to_string(),
        }
    }

    #[test]
    fn resolve_category_matches_case_insensitively() {
        let list = vec![category("c1", "اقتصاد"), category("c2", "Sports")];
        assert_eq!(resolve_category(&list, Some("اقتصاد")).as_deref(), Some("c1"));
        assert_eq!(resolve_category(&list, Some("sports")).as_deref(), Some("c2"));
        assert_eq!(resolve_category(&list, Some(" SPORTS ")).as_deref(), Some("c2"));
    }

    #[test]
    fn resolve_category_falls_back_to_none() {
        let list = vec![category("c1", "اقتصاد")];
        assert!(resolve_category(&list, Some("رياضة")).is_none());
        assert!(resolve_category(&list, None).is_none());
        assert!(resolve_category(&list, Some("  ")).is_none());
    }
}
