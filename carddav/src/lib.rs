// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! `CardDAV` client for reading address books on `WebDAV` servers (RFC 6352).

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
#![allow(clippy::similar_names, clippy::single_match_else, clippy::match_bool)]

mod client;
mod config;
mod error;
mod http;
mod request;
mod response;
mod types;
mod xml;

pub use crate::client::{CardDavClient, CollectionMeta};
pub use crate::config::CardDavConfig;
pub use crate::error::CardDavError;
pub use crate::request::{AddressBookMultiGetRequest, AddressBookQueryRequest, PropFindRequest};
pub use crate::response::MultiStatusResponse;
pub use crate::types::{AddressItem, ETag, Href};
