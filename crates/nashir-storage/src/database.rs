// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use nashir_core::NashirError;
use tracing::debug;

/// Handle to the SQLite database used by the publishing pipeline.
///
/// Migrations run during [`Database::open`] on a short-lived blocking
/// connection; all subsequent access goes through the async connection.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if necessary) the database at `path`, applies PRAGMAs,
    /// and runs any pending migrations.
    pub async fn open(path: &str) -> Result<Self, NashirError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(NashirError::storage)?;
        }

        // Migrations need a &mut rusqlite::Connection, so run them on a
        // short-lived blocking connection before the async handle opens.
        let migration_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), NashirError> {
            let mut conn =
                rusqlite::Connection::open(&migration_path).map_err(NashirError::storage)?;
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )
            .map_err(NashirError::storage)?;
            crate::migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| NashirError::Internal(format!("migration task panicked: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(NashirError::storage)?;

        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// Returns the async connection handle.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL and releases the connection.
    pub async fn close(&self) -> Result<(), NashirError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Converts a tokio-rusqlite error into the workspace error type.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> NashirError {
    NashirError::Storage {
        source: Box::new(e),
    }
}
