// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Article creation and media linking.
//!
//! Article creation is the pipeline's single required write. Media linking
//! inserts the media row and its join row in one transaction per image so a
//! media row never exists unlinked.

use nashir_core::NashirError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Article, MediaFile, NewArticle};
use crate::queries::{now_timestamp, parse_json_list};

fn row_to_article(row: &rusqlite::Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        content: row.get(3)?,
        excerpt: row.get(4)?,
        category_id: row.get(5)?,
        author_id: row.get(6)?,
        status: row.get(7)?,
        published_at: row.get(8)?,
        source_meta: row.get(9)?,
        keywords: parse_json_list(10, row.get(10)?)?,
        created_at: row.get(11)?,
    })
}

const SELECT_COLUMNS: &str = "id, title, slug, content, excerpt, category_id, author_id,
    status, published_at, source_meta, keywords, created_at";

/// Inserts a new article and returns the stored row.
pub async fn create(db: &Database, input: NewArticle) -> Result<Article, NashirError> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = now_timestamp();
    let article = Article {
        id,
        title: input.title,
        slug: input.slug,
        content: input.content,
        excerpt: input.excerpt,
        category_id: input.category_id,
        author_id: input.author_id,
        status: input.status,
        published_at: input.published_at,
        source_meta: input.source_meta,
        keywords: input.keywords,
        created_at,
    };

    let stored = article.clone();
    db.connection()
        .call(move |conn| {
            let keywords_json = serde_json::to_string(&stored.keywords)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            conn.execute(
                "INSERT INTO articles
                 (id, title, slug, content, excerpt, category_id, author_id,
                  status, published_at, source_meta, keywords, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    stored.id,
                    stored.title,
                    stored.slug,
                    stored.content,
                    stored.excerpt,
                    stored.category_id,
                    stored.author_id,
                    stored.status,
                    stored.published_at,
                    stored.source_meta,
                    keywords_json,
                    stored.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(article)
}

/// Fetches an article by id.
pub async fn get(db: &Database, id: &str) -> Result<Option<Article>, NashirError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM articles WHERE id = ?1"
            ))?;
            let mut rows = stmt
                .query_map(params![id], row_to_article)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows.pop())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Inserts a media row and its article link atomically.
///
/// The hero image is the attachment at display order 0.
pub async fn attach_media(
    db: &Database,
    article_id: &str,
    filename: &str,
    url: &str,
    mime_type: Option<&str>,
    alt_text: &str,
    display_order: i64,
) -> Result<MediaFile, NashirError> {
    let media = MediaFile {
        id: uuid::Uuid::new_v4().to_string(),
        filename: filename.to_string(),
        url: url.to_string(),
        mime_type: mime_type.map(String::from),
        alt_text: Some(alt_text.to_string()),
        created_at: now_timestamp(),
    };

    let article_id = article_id.to_string();
    let stored = media.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO media_files (id, filename, url, mime_type, alt_text, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    stored.id,
                    stored.filename,
                    stored.url,
                    stored.mime_type,
                    stored.alt_text,
                    stored.created_at,
                ],
            )?;
            tx.execute(
                "INSERT INTO article_media (article_id, media_id, display_order)
                 VALUES (?1, ?2, ?3)",
                params![article_id, stored.id, display_order],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(media)
}

/// Lists an article's media in display order.
pub async fn media_for_article(
    db: &Database,
    article_id: &str,
) -> Result<Vec<MediaFile>, NashirError> {
    let article_id = article_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.filename, m.url, m.mime_type, m.alt_text, m.created_at
                 FROM media_files m
                 JOIN article_media am ON am.media_id = m.id
                 WHERE am.article_id = ?1
                 ORDER BY am.display_order ASC",
            )?;
            let rows = stmt
                .query_map(params![article_id], |row| {
                    Ok(MediaFile {
                        id: row.get(0)?,
                        filename: row.get(1)?,
                        url: row.get(2)?,
                        mime_type: row.get(3)?,
                        alt_text: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_article(slug: &str) -> NewArticle {
        NewArticle {
            title: "عنوان تجريبي".to_string(),
            slug: slug.to_string(),
            content: "نص الخبر".to_string(),
            excerpt: Some("مقتطف".to_string()),
            category_id: None,
            author_id: "user-1".to_string(),
            status: "published".to_string(),
            published_at: Some("2026-02-01T10:00:00.000Z".to_string()),
            source_meta: Some(r#"{"channel":"whatsapp","fragment_count":2}"#.to_string()),
            keywords: vec!["اقتصاد".to_string()],
        }
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("a.db").to_str().unwrap())
            .await
            .unwrap();

        let article = create(&db, sample_article("slug-1")).await.unwrap();
        let found = get(&db, &article.id).await.unwrap().unwrap();
        assert_eq!(found, article);
        assert_eq!(found.keywords, vec!["اقتصاد"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("dup.db").to_str().unwrap())
            .await
            .unwrap();

        create(&db, sample_article("same-slug")).await.unwrap();
        let result = create(&db, sample_article("same-slug")).await;
        assert!(result.is_err());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn attach_media_links_in_display_order() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("m.db").to_str().unwrap())
            .await
            .unwrap();

        let article = create(&db, sample_article("with-media")).await.unwrap();
        attach_media(&db, &article.id, "b.jpg", "https://m/b.jpg", Some("image/jpeg"), "alt b", 1)
            .await
            .unwrap();
        attach_media(&db, &article.id, "a.jpg", "https://m/a.jpg", Some("image/jpeg"), "alt a", 0)
            .await
            .unwrap();

        let media = media_for_article(&db, &article.id).await.unwrap();
        assert_eq!(media.len(), 2);
        // Hero first regardless of insertion order.
        assert_eq!(media[0].url, "https://m/a.jpg");
        assert_eq!(media[1].url, "https://m/b.jpg");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn attach_media_to_missing_article_leaves_no_orphan_row() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("orphan.db").to_str().unwrap())
            .await
            .unwrap();

        // Foreign key violation rolls back the whole transaction.
        let result = attach_media(&db, "no-such-article", "x.jpg", "https://m/x.jpg", None, "alt", 0)
            .await;
        assert!(result.is_err());

        let count: i64 = db
            .connection()
            .call(|conn| {
                let n = conn.query_row("SELECT COUNT(*) FROM media_files", [], |row| row.get(0))?;
                Ok::<_, rusqlite::Error>(n)
            })
            .await
            .unwrap();
        assert_eq!(count, 0, "media row must not exist unlinked");

        db.close().await.unwrap();
    }
}
