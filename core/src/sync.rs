// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! The reconciliation engine: one worker, one source, one pass.

use std::collections::{HashMap, HashSet};

use cardsync_carddav::{CardDavClient, CardDavConfig, CardDavError, Href};

use crate::config::SourceConfig;
use crate::ingest::{EXTERNAL_CARDDAV_SOURCE, IngestContext, ingest_item};
use crate::localdb::{BookRecord, Contacts, LocalDb};

/// Maximum hrefs per addressbook-multiget request, the safe cap commonly
/// enforced by CardDAV servers.
pub const MULTIGET_CHUNK: usize = 90;

/// Result of one reconciliation pass, surfaced to the caller.
///
/// `run` never returns an error; failures land here as `success = false`
/// with a descriptive message. Batches committed before a failure remain
/// applied.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The source id this pass ran for.
    pub source_id: String,
    /// The source display name.
    pub source_name: String,
    /// Total remote item count after reconciliation.
    pub contact_count: usize,
    /// Whether the pass completed.
    pub success: bool,
    /// Error description when `success` is false.
    pub error: Option<String>,
}

/// Fatal failures that abort the remainder of a pass.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A protocol request failed.
    #[error(transparent)]
    Dav(#[from] CardDavError),

    /// A local store operation failed.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// One worker reconciling one external source into the local store.
///
/// A worker is strictly sequential: resolve, reconcile, then batches in
/// order. Multiple workers for different sources may run concurrently
/// against the same pool; each scopes its writes in per-batch transactions
/// and shares no mutable state.
#[derive(Debug)]
pub struct SyncWorker {
    db: LocalDb,
    client: CardDavClient,
    source: SourceConfig,
    account_id: String,
}

impl SyncWorker {
    /// Creates a worker for one source.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(
        db: LocalDb,
        source: SourceConfig,
        account_id: impl Into<String>,
    ) -> Result<Self, SyncError> {
        let client = CardDavClient::new(CardDavConfig {
            base_url: source.url.clone(),
            username: source.username.clone(),
            password: source.password.clone(),
            timeout_secs: source.timeout_secs,
            ..Default::default()
        })?;

        Ok(Self {
            db,
            client,
            source,
            account_id: account_id.into(),
        })
    }

    /// Runs one full reconciliation pass.
    ///
    /// Never panics and never returns `Err`: every failure is folded into
    /// the outcome.
    pub async fn run(&self) -> SyncOutcome {
        tracing::info!(
            source = %self.source.name,
            url = %self.source.url,
            "starting external CardDAV sync"
        );

        match self.run_inner().await {
            Ok(contact_count) => {
                tracing::info!(
                    source = %self.source.name,
                    contacts = contact_count,
                    "external CardDAV sync completed"
                );
                SyncOutcome {
                    source_id: self.source.id.clone(),
                    source_name: self.source.name.clone(),
                    contact_count,
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(source = %self.source.name, error = %e, "external CardDAV sync failed");
                SyncOutcome {
                    source_id: self.source.id.clone(),
                    source_name: self.source.name.clone(),
                    contact_count: 0,
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn run_inner(&self) -> Result<usize, SyncError> {
        let book = self.resolve_book().await?;
        self.run_for_book(&book).await
    }

    /// Finds or creates the local book for this source, tags it and
    /// refreshes its URL, then best-effort refreshes the ctag.
    async fn resolve_book(&self) -> Result<BookRecord, SyncError> {
        let book_id = format!("external-{}", self.source.id);

        let mut book = match self.db.books.get(&book_id).await? {
            Some(existing) => existing,
            None => BookRecord::new(book_id, self.account_id.clone()),
        };

        book.source = EXTERNAL_CARDDAV_SOURCE.to_string();
        book.url = self.source.url.clone();

        // The ctag is advisory only; a failed probe must not block the run.
        match self.client.collection_meta().await {
            Ok(meta) => {
                if let Some(ctag) = meta.ctag {
                    book.ctag = Some(ctag);
                }
            }
            Err(e) => {
                tracing::warn!(
                    source = %self.source.name,
                    error = %e,
                    "could not fetch ctag for external source"
                );
            }
        }

        self.db.books.upsert(&book).await?;
        Ok(book)
    }

    /// Diffs remote vs. local etags, fetches `needed` in bounded batches
    /// and applies deletions and upserts per batch.
    async fn run_for_book(&self, book: &BookRecord) -> Result<usize, SyncError> {
        // Full remote listing: etag -> href, one entry per remote item.
        let remote: HashMap<String, String> = self
            .client
            .list_etags()
            .await?
            .into_iter()
            .map(|(etag, href)| (etag.as_str().to_string(), href.as_str().to_string()))
            .collect();

        let local: HashSet<String> = self.db.contacts.etags(&book.id).await?.into_iter().collect();

        let (needed, mut deleted) = diff(&remote, &local);

        tracing::info!(
            source = %self.source.name,
            remote = remote.len(),
            local = local.len(),
            needed = needed.len(),
            deleted = deleted.len(),
            "external CardDAV reconciliation"
        );

        let ctx = IngestContext {
            source_id: &self.source.id,
            account_id: &self.account_id,
            book_id: &book.id,
        };

        for chunk in needed.chunks(MULTIGET_CHUNK) {
            let items = self.client.multiget(chunk).await?;

            let mut tx = self.db.pool().begin().await?;

            // Stale rows are swept exactly once per pass, inside the first
            // batch's transaction.
            if !deleted.is_empty() {
                for etag in &deleted {
                    Contacts::delete_etag_in(&mut *tx, &book.id, etag).await?;
                }
                deleted.clear();
            }

            for item in &items {
                for contact in ingest_item(&ctx, item) {
                    Contacts::upsert_in(&mut *tx, &contact).await?;
                }
            }

            tx.commit().await?;
        }

        // Nothing needed fetching, so no batch transaction ran: sweep the
        // stale rows unconditionally.
        if !deleted.is_empty() {
            for etag in &deleted {
                self.db.contacts.delete_etag(&book.id, etag).await?;
            }
        }

        Ok(remote.len())
    }
}

/// Splits the remote etag listing against the local etag set into the hrefs
/// that must be fetched and the etags whose rows are stale.
fn diff(remote: &HashMap<String, String>, local: &HashSet<String>) -> (Vec<Href>, Vec<String>) {
    let needed = remote
        .iter()
        .filter(|(etag, _)| !local.contains(*etag))
        .map(|(_, href)| Href::from(href.as_str()))
        .collect();
    let deleted = local
        .iter()
        .filter(|etag| !remote.contains_key(*etag))
        .cloned()
        .collect();
    (needed, deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hrefs(needed: Vec<Href>) -> Vec<String> {
        needed.into_iter().map(|h| h.as_str().to_string()).collect()
    }

    #[test]
    fn diff_disjoint_sets() {
        let remote: HashMap<String, String> = [
            ("e1".to_string(), "/c1.vcf".to_string()),
            ("e2".to_string(), "/c2.vcf".to_string()),
        ]
        .into();
        let local: HashSet<String> = ["e3".to_string()].into();

        let (needed, deleted) = diff(&remote, &local);
        let mut needed = hrefs(needed);
        needed.sort();

        assert_eq!(needed, vec!["/c1.vcf".to_string(), "/c2.vcf".to_string()]);
        assert_eq!(deleted, vec!["e3".to_string()]);
    }

    #[test]
    fn diff_overlap_is_untouched() {
        let remote: HashMap<String, String> = [
            ("e1".to_string(), "/c1.vcf".to_string()),
            ("e2".to_string(), "/c2.vcf".to_string()),
        ]
        .into();
        let local: HashSet<String> = ["e1".to_string()].into();

        let (needed, deleted) = diff(&remote, &local);

        assert_eq!(hrefs(needed), vec!["/c2.vcf".to_string()]);
        assert!(deleted.is_empty());
    }

    #[test]
    fn diff_identical_sets_is_noop() {
        let remote: HashMap<String, String> =
            [("e1".to_string(), "/c1.vcf".to_string())].into();
        let local: HashSet<String> = ["e1".to_string()].into();

        let (needed, deleted) = diff(&remote, &local);

        assert!(needed.is_empty());
        assert!(deleted.is_empty());
    }

    #[test]
    fn diff_edited_item_appears_on_both_sides() {
        // An edited remote item shows up as one deleted old etag and one
        // needed new etag referencing the same href.
        let remote: HashMap<String, String> =
            [("e2".to_string(), "/c1.vcf".to_string())].into();
        let local: HashSet<String> = ["e1".to_string()].into();

        let (needed, deleted) = diff(&remote, &local);

        assert_eq!(hrefs(needed), vec!["/c1.vcf".to_string()]);
        assert_eq!(deleted, vec!["e1".to_string()]);
    }

    #[test]
    fn chunking_respects_multiget_cap() {
        let needed: Vec<u32> = (0..271).collect();
        let chunks: Vec<_> = needed.chunks(MULTIGET_CHUNK).collect();

        assert_eq!(chunks.len(), 271usize.div_ceil(MULTIGET_CHUNK));
        assert!(chunks.iter().all(|c| c.len() <= MULTIGET_CHUNK));
        assert_eq!(chunks.last().unwrap().len(), 271 % MULTIGET_CHUNK);
    }
}
