// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! One-way reconciliation of remote `CardDAV` address books into a local
//! SQLite contact store.
//!
//! The engine diffs remote vs. local etags, fetches changed objects in
//! bounded multiget batches, fans each vCard out into one contact row per
//! email address, and applies deletions and upserts inside per-batch
//! transactions.

mod config;
mod ingest;
mod localdb;
mod sync;

pub use crate::config::SourceConfig;
pub use crate::ingest::{EXTERNAL_CARDDAV_SOURCE, IngestContext, ingest_item};
pub use crate::localdb::{BookRecord, Books, ContactRecord, Contacts, LocalDb};
pub use crate::sync::{MULTIGET_CHUNK, SyncError, SyncOutcome, SyncWorker};
