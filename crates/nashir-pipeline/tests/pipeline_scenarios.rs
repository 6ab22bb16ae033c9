// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline scenarios against a temporary SQLite database with
//! mock analyzer and notifier adapters.

use std::sync::Arc;
use std::time::Duration;

use nashir_cache::MemoryCache;
use nashir_config::model::{PipelineConfig, SiteConfig};
use nashir_core::types::RejectionReason;
use nashir_pipeline::{PipelineOutcome, PublishingPipeline};
use nashir_storage::models::{Category, TrustedToken};
use nashir_storage::queries::{articles, categories, pending, tags, tokens};
use nashir_storage::Database;
use nashir_test_utils::{MockAnalyzer, MockNotifier};
use tempfile::TempDir;

struct Harness {
    db: Database,
    cache: Arc<MemoryCache>,
    analyzer: Arc<MockAnalyzer>,
    notifier: Arc<MockNotifier>,
    pipeline: PublishingPipeline,
    _dir: TempDir,
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("e2e.db").to_str().unwrap())
        .await
        .unwrap();
    let cache = Arc::new(MemoryCache::new(Duration::from_secs(300)));
    let analyzer = Arc::new(MockAnalyzer::new());
    let notifier = Arc::new(MockNotifier::new());

    let thresholds = PipelineConfig {
        min_text_length: 5,
        ..PipelineConfig::default()
    };
    let site = SiteConfig {
        base_url: "https://news.test".to_string(),
        ..SiteConfig::default()
    };
    let pipeline = PublishingPipeline::new(
        db.clone(),
        cache.clone(),
        analyzer.clone(),
        notifier.clone(),
        thresholds,
        &site,
    );

    Harness {
        db,
        cache,
        analyzer,
        notifier,
        pipeline,
        _dir: dir,
    }
}

async fn register_sender(h: &Harness, sender: &str, token: &str, active: bool, auto_publish: bool) {
    tokens::insert(
        &h.db,
        &TrustedToken {
            id: uuid::Uuid::new_v4().to_string(),
            sender_address: sender.to_string(),
            token: token.to_string(),
            is_active: active,
            auto_publish,
            default_category_id: None,
            user_id: "user-1".to_string(),
            usage_count: 0,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        },
    )
    .await
    .unwrap();
}

async fn submit(h: &Harness, sender: &str, token: &str, fragments: &[&str]) -> String {
    let mut id = String::new();
    for fragment in fragments {
        let (sub, _) = pending::append_fragment(
            &h.db,
            sender,
            token,
            None,
            None,
            "whatsapp",
            fragment,
            &[],
            Duration::ZERO,
        )
        .await
        .unwrap();
        id = sub.id;
    }
    id
}

async fn submit_with_media(
    h: &Harness,
    sender: &str,
    token: &str,
    text: &str,
    media_urls: &[String],
) -> String {
    let (sub, _) = pending::append_fragment(
        &h.db,
        sender,
        token,
        None,
        None,
        "whatsapp",
        text,
        media_urls,
        Duration::ZERO,
    )
    .await
    .unwrap();
    sub.id
}

async fn exec_sql(db: &Database, sql: &str) {
    let sql = sql.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute_batch(&sql)?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .unwrap();
}

async fn claim_single(h: &Harness) -> nashir_storage::models::PendingSubmission {
    let mut claimed = pending::claim_expired(&h.db).await.unwrap();
    assert_eq!(claimed.len(), 1);
    claimed.pop().unwrap()
}

async fn count(db: &Database, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(&sql, [], |row| row.get(0))?;
            Ok::<_, rusqlite::Error>(n)
        })
        .await
        .unwrap()
}

async fn sole_log(db: &Database) -> nashir_storage::models::WebhookLog {
    let id: String = db
        .connection()
        .call(|conn| {
            let id = conn.query_row("SELECT id FROM webhook_logs", [], |row| row.get(0))?;
            Ok::<_, rusqlite::Error>(id)
        })
        .await
        .unwrap();
    nashir_storage::queries::logs::get(db, &id).await.unwrap().unwrap()
}

#[tokio::test]
async fn auto_publish_sender_gets_published_article_and_url_reply() {
    let h = harness().await;
    register_sender(&h, "+9665001", "tok-1", true, true).await;

    // Warm listing caches and attach a live subscriber.
    h.cache.set("homepage:latest", serde_json::json!([1]), None);
    let (_sub_id, mut rx) = h.cache.subscribers().subscribe();

    submit(&h, "+9665001", "tok-1", &["عاجل: الأسواق ترتفع خمسة بالمئة اليوم"]).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;

    let article = match outcome {
        PipelineOutcome::Published(article) => article,
        other => panic!("expected published outcome, got {other:?}"),
    };
    assert_eq!(article.status, "published");
    assert!(article.published_at.is_some());

    let log = sole_log(&h.db).await;
    assert_eq!(log.status, "processed");
    assert_eq!(log.article_id.as_deref(), Some(article.id.as_str()));
    assert!(log.processing_ms.is_some());

    let sent = h.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+9665001");
    assert!(sent[0].1.contains(&format!("https://news.test/articles/{}", article.slug)));

    let event = rx.recv().await.unwrap();
    assert_eq!(event.kind, "cache_invalidated");
    assert!(event.patterns.contains(&"homepage".to_string()));

    // Submission gone; usage counted.
    assert_eq!(count(&h.db, "pending_submissions").await, 0);
    let token = tokens::find(&h.db, "+9665001", "tok-1").await.unwrap().unwrap();
    assert_eq!(token.usage_count, 1);
}

#[tokio::test]
async fn two_fragments_merge_into_one_article_with_merge_note() {
    let h = harness().await;
    register_sender(&h, "+9665002", "tok-2", true, true).await;

    submit(&h, "+9665002", "tok-2", &["Breaking: ", "market up 5%"]).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;
    assert!(matches!(outcome, PipelineOutcome::Published(_)));

    // The analyzer saw the merged text in insertion order.
    let calls = h.analyzer.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "Breaking: \n\nmarket up 5%");

    assert_eq!(count(&h.db, "articles").await, 1);

    let sent = h.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains('2'), "reply notes how many fragments merged");
    assert!(sent[0].1.contains("دمج"));
}

#[tokio::test]
async fn inactive_token_is_rejected_silently() {
    let h = harness().await;
    register_sender(&h, "+9665003", "tok-3", false, true).await;

    submit(&h, "+9665003", "tok-3", &["خبر من مرسل موقوف عن النشر"]).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;
    assert!(matches!(
        outcome,
        PipelineOutcome::Rejected(RejectionReason::TokenInactive)
    ));

    let log = sole_log(&h.db).await;
    assert_eq!(log.status, "rejected");
    assert_eq!(log.reason.as_deref(), Some("token_inactive"));

    assert_eq!(count(&h.db, "articles").await, 0);
    assert!(h.notifier.sent().await.is_empty(), "no reply for unauthorized senders");
    assert_eq!(count(&h.db, "pending_submissions").await, 0);
}

#[tokio::test]
async fn unknown_sender_token_pair_is_rejected_silently() {
    let h = harness().await;
    // No token registered for this sender at all.

    submit(&h, "+9665010", "tok-x", &["خبر من مرسل غير معروف للمنصة"]).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;
    assert!(matches!(
        outcome,
        PipelineOutcome::Rejected(RejectionReason::InvalidToken)
    ));

    let log = sole_log(&h.db).await;
    assert_eq!(log.status, "rejected");
    assert_eq!(log.reason.as_deref(), Some("invalid_token"));

    assert_eq!(count(&h.db, "articles").await, 0);
    assert!(h.notifier.sent().await.is_empty(), "no reply for unauthorized senders");
    assert!(h.analyzer.calls().await.is_empty(), "rejected before analysis");
    assert_eq!(count(&h.db, "pending_submissions").await, 0);
}

#[tokio::test]
async fn media_less_text_below_floor_is_rejected_silently() {
    let h = harness().await;
    register_sender(&h, "+9665011", "tok-11", true, true).await;

    // Four chars, no media: below the harness floor of five.
    submit(&h, "+9665011", "tok-11", &["صباح"]).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;
    assert!(matches!(
        outcome,
        PipelineOutcome::Rejected(RejectionReason::TextTooShort)
    ));

    let log = sole_log(&h.db).await;
    assert_eq!(log.status, "rejected");
    assert_eq!(log.reason.as_deref(), Some("text_too_short"));

    assert_eq!(count(&h.db, "articles").await, 0);
    assert!(h.notifier.sent().await.is_empty(), "no reply spam for accidental messages");
    assert!(h.analyzer.calls().await.is_empty(), "rejected before analysis");
}

#[tokio::test]
async fn low_quality_rejection_replies_with_issues() {
    let h = harness().await;
    register_sender(&h, "+9665004", "tok-4", true, true).await;

    let mut analysis = MockAnalyzer::passing_analysis();
    analysis.quality_score = 20;
    analysis.is_news = false;
    analysis.issues = vec![
        "النص غير مكتمل".to_string(),
        "لا يحتوي على معلومة خبرية".to_string(),
    ];
    h.analyzer.add_analysis(analysis).await;

    submit(&h, "+9665004", "tok-4", &["نص قصير بلا قيمة خبرية حقيقية"]).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;
    assert!(matches!(
        outcome,
        PipelineOutcome::Rejected(RejectionReason::LowQuality)
    ));

    let log = sole_log(&h.db).await;
    assert_eq!(log.reason.as_deref(), Some("low_quality"));
    assert!(log.issues.unwrap().contains("النص غير مكتمل"));

    assert_eq!(count(&h.db, "articles").await, 0);

    let sent = h.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("النص غير مكتمل"));
    assert!(sent[0].1.contains("لا يحتوي على معلومة خبرية"));
}

#[tokio::test]
async fn one_bad_keyword_does_not_abort_tagging_or_success_reply() {
    let h = harness().await;
    register_sender(&h, "+9665005", "tok-5", true, true).await;

    let mut analysis = MockAnalyzer::passing_analysis();
    // The middle keyword slugifies to nothing and fails to link; the other
    // two must still land.
    analysis.keywords = vec![
        "اقتصاد".to_string(),
        "!!!".to_string(),
        "أسواق".to_string(),
    ];
    h.analyzer.add_analysis(analysis).await;

    submit(&h, "+9665005", "tok-5", &["تقرير اقتصادي عن حركة الأسواق"]).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;

    let article = match outcome {
        PipelineOutcome::Published(article) => article,
        other => panic!("expected published outcome, got {other:?}"),
    };

    let linked = tags::for_article(&h.db, &article.id).await.unwrap();
    assert_eq!(linked.len(), 2, "two of three keywords linked");

    let sent = h.notifier.sent().await;
    assert_eq!(sent.len(), 1, "success reply still sent");
    assert!(sent[0].1.contains("تم نشر الخبر"));
}

#[tokio::test]
async fn failed_tag_insert_does_not_abort_tagging() {
    let h = harness().await;
    register_sender(&h, "+9665013", "tok-13", true, true).await;

    // Make the middle keyword's tag insert fail at the database level.
    exec_sql(
        &h.db,
        "CREATE TRIGGER reject_banned_tag BEFORE INSERT ON tags
         WHEN NEW.slug = 'محظور'
         BEGIN SELECT RAISE(ABORT, 'tag insert failed'); END;",
    )
    .await;

    let mut analysis = MockAnalyzer::passing_analysis();
    analysis.keywords = vec![
        "اقتصاد".to_string(),
        "محظور".to_string(),
        "أسواق".to_string(),
    ];
    h.analyzer.add_analysis(analysis).await;

    submit(&h, "+9665013", "tok-13", &["تقرير عن قيود جديدة على الأسواق"]).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;

    let article = match outcome {
        PipelineOutcome::Published(article) => article,
        other => panic!("expected published outcome, got {other:?}"),
    };

    let linked = tags::for_article(&h.db, &article.id).await.unwrap();
    let slugs: Vec<&str> = linked.iter().map(|t| t.slug.as_str()).collect();
    assert_eq!(slugs, vec!["أسواق", "اقتصاد"], "failing keyword skipped, rest linked");

    let sent = h.notifier.sent().await;
    assert_eq!(sent.len(), 1, "success reply still sent");
}

#[tokio::test]
async fn media_urls_attach_in_order_with_title_hero_alt() {
    let h = harness().await;
    register_sender(&h, "+9665014", "tok-14", true, true).await;

    let urls = vec![
        "https://media.test/public/one-a.jpg".to_string(),
        "https://media.test/public/two-b.png".to_string(),
    ];
    submit_with_media(&h, "+9665014", "tok-14", "تقرير مصور عن افتتاح المعرض الدولي", &urls)
        .await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;

    let article = match outcome {
        PipelineOutcome::Published(article) => article,
        other => panic!("expected published outcome, got {other:?}"),
    };

    let media = articles::media_for_article(&h.db, &article.id).await.unwrap();
    assert_eq!(media.len(), 2);

    // Hero: filename from the URL, alt from the rewritten title.
    assert_eq!(media[0].filename, "one-a.jpg");
    assert_eq!(media[0].mime_type.as_deref(), Some("image/jpeg"));
    assert_eq!(media[0].alt_text.as_deref(), Some("عنوان معاد صياغته"));

    // Second image: excerpt-based alt with a position suffix.
    assert_eq!(media[1].filename, "two-b.png");
    assert_eq!(media[1].mime_type.as_deref(), Some("image/png"));
    assert_eq!(media[1].alt_text.as_deref(), Some("مقتطف الخبر 2"));
}

#[tokio::test]
async fn one_failed_media_link_does_not_abort_the_rest() {
    let h = harness().await;
    register_sender(&h, "+9665015", "tok-15", true, true).await;

    exec_sql(
        &h.db,
        "CREATE TRIGGER reject_corrupt_media BEFORE INSERT ON media_files
         WHEN NEW.url = 'https://media.test/public/corrupt.bin'
         BEGIN SELECT RAISE(ABORT, 'corrupt media'); END;",
    )
    .await;

    let urls = vec![
        "https://media.test/public/first.jpg".to_string(),
        "https://media.test/public/corrupt.bin".to_string(),
        "https://media.test/public/third.webp".to_string(),
    ];
    submit_with_media(&h, "+9665015", "tok-15", "ثلاث صور مرفقة بإحدى الرسائل", &urls).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;

    let article = match outcome {
        PipelineOutcome::Published(article) => article,
        other => panic!("expected published outcome, got {other:?}"),
    };

    // The failing image is skipped; the others keep their display positions.
    let media = articles::media_for_article(&h.db, &article.id).await.unwrap();
    assert_eq!(media.len(), 2);
    assert_eq!(media[0].filename, "first.jpg");
    assert_eq!(media[1].filename, "third.webp");

    let sent = h.notifier.sent().await;
    assert_eq!(sent.len(), 1, "success reply still sent");
}

#[tokio::test]
async fn draft_policy_creates_unpublished_article_with_draft_reply() {
    let h = harness().await;
    register_sender(&h, "+9665006", "tok-6", true, false).await;

    submit(&h, "+9665006", "tok-6", &["مسودة خبر بانتظار مراجعة المحرر"]).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;

    let article = match outcome {
        PipelineOutcome::Draft(article) => article,
        other => panic!("expected draft outcome, got {other:?}"),
    };
    assert_eq!(article.status, "draft");
    assert!(article.published_at.is_none());

    let sent = h.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("مسودة"));
}

#[tokio::test]
async fn ai_detected_category_resolves_against_platform_list() {
    let h = harness().await;
    register_sender(&h, "+9665007", "tok-7", true, true).await;
    categories::insert(
        &h.db,
        &Category {
            id: "cat-econ".to_string(),
            name: "اقتصاد".to_string(),
            slug: "economy".to_string(),
        },
    )
    .await
    .unwrap();

    let mut analysis = MockAnalyzer::passing_analysis();
    analysis.category = Some("اقتصاد".to_string());
    h.analyzer.add_analysis(analysis).await;

    submit(&h, "+9665007", "tok-7", &["تحليل موسع لأداء الاقتصاد المحلي"]).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;

    let article = match outcome {
        PipelineOutcome::Published(article) => article,
        other => panic!("expected published outcome, got {other:?}"),
    };
    assert_eq!(article.category_id.as_deref(), Some("cat-econ"));
}

#[tokio::test]
async fn analyzer_failure_hits_top_level_boundary() {
    let h = harness().await;
    register_sender(&h, "+9665008", "tok-8", true, true).await;
    h.analyzer.add_failure("quality service unavailable").await;

    submit(&h, "+9665008", "tok-8", &["خبر لن تتم معالجته بسبب عطل الخدمة"]).await;
    let submission = claim_single(&h).await;
    let outcome = h.pipeline.run(submission).await;
    assert!(matches!(outcome, PipelineOutcome::Failed));
    assert_eq!(h.pipeline.failure_count(), 1);

    // Log stays in its last-set status, the submission is still deleted, and
    // the sender gets a generic failure reply.
    let log = sole_log(&h.db).await;
    assert_eq!(log.status, "received");
    assert_eq!(count(&h.db, "pending_submissions").await, 0);

    let sent = h.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("حدث خطأ"));
}

#[tokio::test]
async fn force_flush_claims_once_and_runs_inline() {
    let h = harness().await;
    register_sender(&h, "+9665009", "tok-9", true, true).await;

    // Long window: only a force-flush can process this now.
    let (sub, _) = pending::append_fragment(
        &h.db,
        "+9665009",
        "tok-9",
        None,
        None,
        "whatsapp",
        "خبر جاهز للنشر فورا عبر كلمة التفعيل",
        &[],
        Duration::from_secs(3600),
    )
    .await
    .unwrap();

    let first = h.pipeline.try_force(&sub.id).await.unwrap();
    assert!(matches!(first, Some(PipelineOutcome::Published(_))));

    // Already claimed and deleted: a second force is a no-op.
    let second = h.pipeline.try_force(&sub.id).await.unwrap();
    assert!(second.is_none());
}
