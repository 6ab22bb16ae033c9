// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform category reference data.

use nashir_core::NashirError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Category;

/// Inserts a category. Used by seeding and the editorial CMS, not the pipeline.
pub async fn insert(db: &Database, category: &Category) -> Result<(), NashirError> {
    let c = category.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO categories (id, name, slug) VALUES (?1, ?2, ?3)",
                params![c.id, c.name, c.slug],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Lists all categories in name order.
pub async fn list(db: &Database) -> Result<Vec<Category>, NashirError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, slug FROM categories ORDER BY name ASC")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(Category {
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn insert_and_list_in_name_order() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("c.db").to_str().unwrap())
            .await
            .unwrap();

        for (name, slug) in [("سياسة", "politics"), ("اقتصاد", "economy")] {
            insert(
                &db,
                &Category {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    slug: slug.to_string(),
                },
            )
            .await
            .unwrap();
        }

        let all = list(&db).await.unwrap();
        assert_eq!(all.len(), 2);

        db.close().await.unwrap();
    }
}
