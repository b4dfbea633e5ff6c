// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! `CardDAV` client for address-book read operations.

use std::sync::Arc;

use reqwest::Method;

use crate::config::CardDavConfig;
use crate::error::CardDavError;
use crate::http::HttpClient;
use crate::request::{AddressBookMultiGetRequest, AddressBookQueryRequest, PropFindRequest};
use crate::response::MultiStatusResponse;
use crate::types::{AddressItem, ETag, Href};

/// `CardDAV` client for reading one address-book collection.
///
/// # Example
///
/// ```ignore
/// use cardsync_carddav::{CardDavClient, CardDavConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CardDavConfig {
///     base_url: "dav.example.com/addressbooks/user/contacts/".to_string(),
///     username: "user".to_string(),
///     password: "pass".to_string(),
///     ..Default::default()
/// };
///
/// let client = CardDavClient::new(config)?;
/// let listing = client.list_etags().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CardDavClient {
    http: Arc<HttpClient>,
    config: CardDavConfig,
}

/// Collection metadata from the depth-0 PROPFIND probe.
#[derive(Debug, Clone, Default)]
pub struct CollectionMeta {
    /// The collection change summary token, if reported.
    pub ctag: Option<String>,
    /// The collection display name, if reported.
    pub display_name: Option<String>,
}

impl CardDavClient {
    /// Creates a new `CardDAV` client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: CardDavConfig) -> Result<Self, CardDavError> {
        let http = HttpClient::new(config.clone())?;
        Ok(Self {
            http: Arc::new(http),
            config,
        })
    }

    /// Fetches collection metadata (ctag and display name) with a depth-0
    /// PROPFIND.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    pub async fn collection_meta(&self) -> Result<CollectionMeta, CardDavError> {
        let url = self.config.collection_url();
        tracing::debug!(url = %url, "probing collection metadata");
        let xml_body = PropFindRequest::new().build()?;

        let resp = self
            .http
            .execute(
                self.http
                    .build_request(propfind_method()?, &url, "0")
                    .body(xml_body),
            )
            .await?;

        let xml = resp.text().await?;
        let multistatus = MultiStatusResponse::from_xml(&xml)?;

        Ok(CollectionMeta {
            ctag: multistatus.ctag(),
            display_name: multistatus.display_name(),
        })
    }

    /// Fetches the full remote etag listing with an addressbook-query REPORT.
    ///
    /// Returns one `(etag, href)` pair per remote object.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    pub async fn list_etags(&self) -> Result<Vec<(ETag, Href)>, CardDavError> {
        let url = self.config.collection_url();
        let xml_body = AddressBookQueryRequest::new().build()?;

        let resp = self
            .http
            .execute(HttpClient::accept_vcard(
                self.http
                    .build_request(report_method()?, &url, "1")
                    .body(xml_body),
            ))
            .await?;

        let xml = resp.text().await?;
        let multistatus = MultiStatusResponse::from_xml(&xml)?;
        let listing = multistatus.into_etag_listing();
        tracing::debug!(entries = listing.len(), "received etag listing");
        Ok(listing)
    }

    /// Retrieves address objects by href with an addressbook-multiget REPORT.
    ///
    /// The caller bounds the href count; this method issues exactly one
    /// request for the given slice. Entries the server returned without a
    /// body come back with empty `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    pub async fn multiget(&self, hrefs: &[Href]) -> Result<Vec<AddressItem>, CardDavError> {
        let mut multiget = AddressBookMultiGetRequest::new();
        for href in hrefs {
            multiget.add_href(href.as_str().to_string());
        }
        if multiget.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(hrefs = multiget.len(), "issuing addressbook-multiget");

        let url = self.config.collection_url();
        let xml_body = multiget.build()?;

        let resp = self
            .http
            .execute(HttpClient::accept_vcard(
                self.http
                    .build_request(report_method()?, &url, "1")
                    .body(xml_body),
            ))
            .await?;

        let xml = resp.text().await?;
        let multistatus = MultiStatusResponse::from_xml(&xml)?;
        Ok(multistatus.into_items())
    }
}

fn propfind_method() -> Result<Method, CardDavError> {
    Method::from_bytes(b"PROPFIND").map_err(|e| CardDavError::Http(format!("Invalid method: {e}")))
}

fn report_method() -> Result<Method, CardDavError> {
    Method::from_bytes(b"REPORT").map_err(|e| CardDavError::Http(format!("Invalid method: {e}")))
}
