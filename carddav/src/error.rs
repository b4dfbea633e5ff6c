// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// `CardDAV` client errors.
#[non_exhaustive]
#[derive(Debug)]
pub enum CardDavError {
    /// HTTP layer error.
    Http(String),

    /// XML parsing/writing error.
    Xml(String),

    /// Authentication error.
    Auth(String),

    /// Invalid response from server.
    InvalidResponse(String),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for CardDavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Xml(e) => write!(f, "XML error: {e}"),
            Self::Auth(e) => write!(f, "Authentication failed: {e}"),
            Self::InvalidResponse(e) => write!(f, "Invalid server response: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for CardDavError {}

impl From<reqwest::Error> for CardDavError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<quick_xml::Error> for CardDavError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<std::io::Error> for CardDavError {
    fn from(e: std::io::Error) -> Self {
        Self::Xml(format!("IO error: {e}"))
    }
}
