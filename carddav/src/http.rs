// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with authentication and shared DAV headers.

use reqwest::{Client, Method, RequestBuilder, Response};

use crate::config::CardDavConfig;
use crate::error::CardDavError;

/// HTTP client for `CardDAV` operations.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: CardDavConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: CardDavConfig) -> Result<Self, CardDavError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds a DAV request with authentication and the shared header set.
    ///
    /// Every request carries Basic auth, a minimal-response preference and an
    /// XML content type. The `Depth` header is per call site: `0` for the
    /// collection metadata PROPFIND, `1` for REPORTs.
    pub fn build_request(&self, method: Method, url: &str, depth: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Prefer", "return-minimal")
            .header("Content-Type", "application/xml; charset=utf-8")
            .header("Depth", depth.to_string())
    }

    /// Adds the vCard accept header used on address-data REPORT requests.
    pub fn accept_vcard(req: RequestBuilder) -> RequestBuilder {
        req.header("Accept", "text/vcard; version=4.0")
    }

    /// Executes a request and checks for HTTP errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns an error status code.
    pub async fn execute(&self, req: RequestBuilder) -> Result<Response, CardDavError> {
        let resp = req.send().await?;
        tracing::debug!(status = %resp.status(), url = %resp.url(), "DAV response");

        match resp.status() {
            reqwest::StatusCode::OK
            | reqwest::StatusCode::CREATED
            | reqwest::StatusCode::NO_CONTENT
            | reqwest::StatusCode::MULTI_STATUS => Ok(resp),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(CardDavError::Auth(format!(
                    "server rejected credentials ({})",
                    resp.status()
                )))
            }
            status => {
                let text = resp
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read response".to_string());
                Err(CardDavError::Http(format!("{status}: {text}")))
            }
        }
    }
}
