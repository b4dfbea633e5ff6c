// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

/// `CardDAV` server configuration.
///
/// The `base_url` is the address-book collection URL of one external source.
/// URLs without an `http`/`https` scheme are coerced to `https://`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CardDavConfig {
    /// Address-book collection URL.
    pub base_url: String,
    /// Username for Basic authentication.
    pub username: String,
    /// Password for Basic authentication.
    pub password: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout() -> u64 {
    40
}

fn default_user_agent() -> String {
    concat!("cardsync-carddav/", env!("CARGO_PKG_VERSION")).to_string()
}

impl CardDavConfig {
    /// Returns the collection URL with an explicit scheme, defaulting to
    /// secure transport.
    #[must_use]
    pub fn collection_url(&self) -> String {
        if self.base_url.starts_with("http") {
            self.base_url.clone()
        } else {
            format!("https://{}", self.base_url)
        }
    }
}

impl Default for CardDavConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_collection_url_coerces_to_https() {
        let config = CardDavConfig {
            base_url: "dav.example.com/abook/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.collection_url(), "https://dav.example.com/abook/");
    }

    #[test]
    fn config_collection_url_keeps_explicit_scheme() {
        let config = CardDavConfig {
            base_url: "http://127.0.0.1:8080/abook/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.collection_url(), "http://127.0.0.1:8080/abook/");
    }
}
