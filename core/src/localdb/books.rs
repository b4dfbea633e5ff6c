// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

use sqlx::SqlitePool;

/// Store accessor for local address-book records.
#[derive(Debug, Clone)]
pub struct Books {
    pool: SqlitePool,
}

impl Books {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: &str) -> Result<Option<BookRecord>, sqlx::Error> {
        const SQL: &str = "\
SELECT id, account_id, source, url, ctag
FROM books
WHERE id = ?;
";

        sqlx::query_as(SQL).bind(id).fetch_optional(&self.pool).await
    }

    pub async fn upsert(&self, book: &BookRecord) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO books (id, account_id, source, url, ctag)
VALUES (?, ?, ?, ?, ?)
ON CONFLICT(id) DO UPDATE SET
    account_id = excluded.account_id,
    source     = excluded.source,
    url        = excluded.url,
    ctag       = excluded.ctag;
";

        sqlx::query(SQL)
            .bind(&book.id)
            .bind(&book.account_id)
            .bind(&book.source)
            .bind(&book.url)
            .bind(&book.ctag)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// One local address-book record, keyed by a deterministic id derived from
/// the source id.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookRecord {
    pub id: String,
    pub account_id: String,
    pub source: String,
    pub url: String,
    pub ctag: Option<String>,
}

impl BookRecord {
    pub fn new(id: String, account_id: String) -> Self {
        Self {
            id,
            account_id,
            source: String::new(),
            url: String::new(),
            ctag: None,
        }
    }

    pub(crate) const fn sql_create_table() -> &'static str {
        "
CREATE TABLE IF NOT EXISTS books (
    id TEXT PRIMARY KEY,
    account_id TEXT NOT NULL,
    source TEXT NOT NULL,
    url TEXT NOT NULL,
    ctag TEXT
);
"
    }
}
