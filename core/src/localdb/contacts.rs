// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

use sqlx::{SqliteConnection, SqlitePool};

/// Store accessor for local contact rows.
///
/// Reads go through the pool; the write paths take a connection so the
/// applier can scope them inside one per-batch transaction.
#[derive(Debug, Clone)]
pub struct Contacts {
    pool: SqlitePool,
}

impl Contacts {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: &str) -> Result<Option<ContactRecord>, sqlx::Error> {
        const SQL: &str = "\
SELECT id, account_id, book_id, email, name, info, etag, hidden
FROM contacts
WHERE id = ?;
";

        sqlx::query_as(SQL).bind(id).fetch_optional(&self.pool).await
    }

    /// The set of etags currently stored on contact rows of one book.
    ///
    /// Fanned-out sibling rows share an etag, so the listing is distinct.
    pub async fn etags(&self, book_id: &str) -> Result<Vec<String>, sqlx::Error> {
        const SQL: &str = "SELECT DISTINCT etag FROM contacts WHERE book_id = ?;";

        let rows: Vec<(String,)> = sqlx::query_as(SQL)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(etag,)| etag).collect())
    }

    pub async fn count(&self, book_id: &str) -> Result<i64, sqlx::Error> {
        const SQL: &str = "SELECT COUNT(*) FROM contacts WHERE book_id = ?;";

        let row: (i64,) = sqlx::query_as(SQL).bind(book_id).fetch_one(&self.pool).await?;
        Ok(row.0)
    }

    /// Upserts one contact row on the given connection.
    ///
    /// Identity is the derived id, so re-ingesting an updated payload
    /// overwrites the same logical row regardless of etag.
    pub async fn upsert_in(
        conn: &mut SqliteConnection,
        contact: &ContactRecord,
    ) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO contacts (id, account_id, book_id, email, name, info, etag, hidden)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT(id) DO UPDATE SET
    email  = excluded.email,
    name   = excluded.name,
    info   = excluded.info,
    etag   = excluded.etag,
    hidden = excluded.hidden;
";

        sqlx::query(SQL)
            .bind(&contact.id)
            .bind(&contact.account_id)
            .bind(&contact.book_id)
            .bind(&contact.email)
            .bind(&contact.name)
            .bind(&contact.info)
            .bind(&contact.etag)
            .bind(contact.hidden)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Deletes every row of the book carrying a stale etag, on the given
    /// connection.
    pub async fn delete_etag_in(
        conn: &mut SqliteConnection,
        book_id: &str,
        etag: &str,
    ) -> Result<(), sqlx::Error> {
        const SQL: &str = "DELETE FROM contacts WHERE book_id = ? AND etag = ?;";

        sqlx::query(SQL).bind(book_id).bind(etag).execute(conn).await?;
        Ok(())
    }

    /// Pool-scoped variant of [`Contacts::delete_etag_in`], used by the
    /// final sweep when no batch transaction ever ran.
    pub async fn delete_etag(&self, book_id: &str, etag: &str) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        Self::delete_etag_in(&mut *conn, book_id, etag).await
    }
}

/// One local contact row.
///
/// A payload with k emails yields k sibling rows sharing name and info,
/// differing by email and id suffix.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContactRecord {
    pub id: String,
    pub account_id: String,
    pub book_id: String,
    pub email: String,
    pub name: String,
    pub info: String,
    pub etag: String,
    pub hidden: bool,
}

impl ContactRecord {
    pub(crate) const fn sql_create_table() -> &'static str {
        "
CREATE TABLE IF NOT EXISTS contacts (
    id TEXT PRIMARY KEY,
    account_id TEXT NOT NULL,
    book_id TEXT NOT NULL,
    email TEXT NOT NULL,
    name TEXT NOT NULL,
    info TEXT NOT NULL,
    etag TEXT NOT NULL,
    hidden BOOLEAN NOT NULL DEFAULT FALSE
);
"
    }

    pub(crate) const fn sql_create_etag_index() -> &'static str {
        "CREATE INDEX IF NOT EXISTS idx_contacts_book_etag ON contacts (book_id, etag);"
    }
}
