// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

/// One externally-configured contact source, immutable for the whole run.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SourceConfig {
    /// Stable identifier of the source; the local book id and all contact
    /// ids derive from it.
    pub id: String,

    /// Human-readable source name, used in logs and run results.
    pub name: String,

    /// Address-book collection URL. A missing scheme means https.
    pub url: String,

    /// Username for Basic authentication.
    pub username: String,

    /// Password for Basic authentication.
    pub password: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

const fn default_timeout() -> u64 {
    40
}
