// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! Minimal vCard 3.0/4.0 parser for contact ingestion.
//!
//! This crate parses the handful of properties the sync engine needs (UID,
//! FN, N, EMAIL, PHOTO, KIND) rather than the full RFC 6350 grammar. Raw
//! payload text is preserved verbatim by callers; this parser only answers
//! field queries.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::pedantic
)]
#![allow(clippy::similar_names, clippy::single_match_else)]

mod card;
mod line;

pub use crate::card::{Vcard, VcardError};
pub use crate::line::ContentLine;
