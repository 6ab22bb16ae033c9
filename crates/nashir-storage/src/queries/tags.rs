// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tag find-or-create and idempotent article linking.

use nashir_core::NashirError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Tag;

/// Finds a tag by slug or creates it, then links it to the article.
///
/// The link insert uses `INSERT OR IGNORE`, so linking the same tag to the
/// same article twice is a silent no-op. The whole operation runs in one
/// transaction.
pub async fn find_or_create_and_link(
    db: &Database,
    article_id: &str,
    name: &str,
    slug: &str,
) -> Result<Tag, NashirError> {
    let article_id = article_id.to_string();
    let name = name.to_string();
    let slug = slug.to_string();
    let new_id = uuid::Uuid::new_v4().to_string();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let existing = {
                let mut stmt = tx.prepare("SELECT id, name, slug FROM tags WHERE slug = ?1")?;
                let mut rows = stmt
                    .query_map(params![slug], |row| {
                        Ok(Tag {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            slug: row.get(2)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                rows.pop()
            };

            let tag = match existing {
                Some(tag) => tag,
                None => {
                    tx.execute(
                        "INSERT INTO tags (id, name, slug) VALUES (?1, ?2, ?3)",
                        params![new_id, name, slug],
                    )?;
                    Tag {
                        id: new_id,
                        name,
                        slug,
                    }
                }
            };

            tx.execute(
                "INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?1, ?2)",
                params![article_id, tag.id],
            )?;

            tx.commit()?;
            Ok(tag)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Lists the tags linked to an article.
pub async fn for_article(db: &Database, article_id: &str) -> Result<Vec<Tag>, NashirError> {
    let article_id = article_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT t.id, t.name, t.slug FROM tags t
                 JOIN article_tags at ON at.tag_id = t.id
                 WHERE at.article_id = ?1
                 ORDER BY t.slug ASC",
            )?;
            let rows = stmt
                .query_map(params![article_id], |row| {
                    Ok(Tag {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        slug: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
