// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! XML namespaces used in `CardDAV` processing.

/// XML namespaces used in `CardDAV`.
pub mod ns {
    /// `WebDAV` namespace.
    pub const DAV: &str = "DAV:";

    /// `CardDAV` namespace.
    pub const CARDDAV: &str = "urn:ietf:params:xml:ns:carddav";

    /// CalendarServer extension namespace (getctag).
    pub const CALENDARSERVER: &str = "http://calendarserver.org/ns/";
}
