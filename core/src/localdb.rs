// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! SQLite-backed local contact store.

mod books;
mod contacts;

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use crate::localdb::books::{BookRecord, Books};
pub use crate::localdb::contacts::{ContactRecord, Contacts};

#[derive(Debug, Clone)]
pub struct LocalDb {
    pool: SqlitePool,

    pub books: Books,
    pub contacts: Contacts,
}

impl LocalDb {
    /// Opens a sqlite database connection.
    /// If `filename` is `None`, it opens an in-memory database.
    pub async fn open(filename: Option<&Path>) -> Result<Self, sqlx::Error> {
        let options = if let Some(filename) = filename {
            tracing::info!(path = %filename.display(), "connecting to SQLite database");
            SqliteConnectOptions::new()
                .filename(filename)
                .create_if_missing(true)
        } else {
            tracing::info!("connecting to in-memory SQLite database");
            SqliteConnectOptions::new().in_memory(true)
        };

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        tracing::debug!("ensuring tables in the database");
        let mut tx = pool.begin().await?;
        sqlx::query(BookRecord::sql_create_table())
            .execute(&mut *tx)
            .await?;
        sqlx::query(ContactRecord::sql_create_table())
            .execute(&mut *tx)
            .await?;
        sqlx::query(ContactRecord::sql_create_etag_index())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        let books = Books::new(pool.clone());
        let contacts = Contacts::new(pool.clone());
        Ok(LocalDb {
            pool,
            books,
            contacts,
        })
    }

    /// The underlying connection pool, for transaction scoping.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(self) {
        tracing::debug!("closing database connection");
        self.pool.close().await;
    }
}
