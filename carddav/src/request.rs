// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! Request builders for `CardDAV` operations.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::CardDavError;
use crate::xml::ns;

/// PROPFIND request builder for collection metadata.
///
/// Requests the collection change summary (`cs:getctag`) and display name,
/// the low-cost depth-0 probe issued before every reconciliation pass.
#[derive(Debug, Clone, Copy)]
pub struct PropFindRequest;

impl PropFindRequest {
    /// Creates a new PROPFIND request.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the XML body for the PROPFIND request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, CardDavError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        // <D:propfind xmlns:D="DAV:" xmlns:CS="http://calendarserver.org/ns/">
        let mut propfind = BytesStart::new("D:propfind");
        propfind.push_attribute(("xmlns:D", ns::DAV));
        propfind.push_attribute(("xmlns:CS", ns::CALENDARSERVER));
        writer.write_event(Event::Start(propfind))?;

        // <D:prop>
        writer.write_event(Event::Start(BytesStart::new("D:prop")))?;

        writer.write_event(Event::Empty(BytesStart::new("CS:getctag")))?;
        writer.write_event(Event::Empty(BytesStart::new("D:displayname")))?;

        // </D:prop>
        writer.write_event(Event::End(BytesEnd::new("D:prop")))?;

        // </D:propfind>
        writer.write_event(Event::End(BytesEnd::new("D:propfind")))?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| CardDavError::Xml(format!("UTF-8 error: {e}")))
    }
}

impl Default for PropFindRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Addressbook-query request builder.
///
/// Requests only `d:getetag` for every object in the collection, producing
/// the full remote etag listing without any payload bodies.
#[derive(Debug, Clone, Copy)]
pub struct AddressBookQueryRequest;

impl AddressBookQueryRequest {
    /// Creates a new addressbook-query request.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the XML body for the addressbook-query request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, CardDavError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        // <C:addressbook-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:carddav">
        let mut query = BytesStart::new("C:addressbook-query");
        query.push_attribute(("xmlns:D", ns::DAV));
        query.push_attribute(("xmlns:C", ns::CARDDAV));
        writer.write_event(Event::Start(query))?;

        // <D:prop>
        writer.write_event(Event::Start(BytesStart::new("D:prop")))?;
        writer.write_event(Event::Empty(BytesStart::new("D:getetag")))?;
        writer.write_event(Event::End(BytesEnd::new("D:prop")))?;

        // </C:addressbook-query>
        writer.write_event(Event::End(BytesEnd::new("C:addressbook-query")))?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| CardDavError::Xml(format!("UTF-8 error: {e}")))
    }
}

impl Default for AddressBookQueryRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Addressbook-multiget request builder.
///
/// Embeds one `d:href` per requested object and asks for both the etag and
/// the full `c:address-data` payload. Callers bound the href count; servers
/// commonly cap multiget at around a hundred entries.
#[derive(Debug)]
pub struct AddressBookMultiGetRequest {
    hrefs: Vec<String>,
}

impl AddressBookMultiGetRequest {
    /// Creates a new addressbook-multiget request.
    #[must_use]
    pub fn new() -> Self {
        Self { hrefs: Vec::new() }
    }

    /// Adds an href to the request.
    pub fn add_href(&mut self, href: String) -> &mut Self {
        self.hrefs.push(href);
        self
    }

    /// Number of hrefs currently embedded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hrefs.len()
    }

    /// Whether the request embeds no hrefs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hrefs.is_empty()
    }

    /// Builds the XML body for the addressbook-multiget request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, CardDavError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        // <C:addressbook-multiget xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:carddav">
        let mut multiget = BytesStart::new("C:addressbook-multiget");
        multiget.push_attribute(("xmlns:D", ns::DAV));
        multiget.push_attribute(("xmlns:C", ns::CARDDAV));
        writer.write_event(Event::Start(multiget))?;

        // <D:prop>
        writer.write_event(Event::Start(BytesStart::new("D:prop")))?;
        writer.write_event(Event::Empty(BytesStart::new("D:getetag")))?;
        writer.write_event(Event::Empty(BytesStart::new("C:address-data")))?;
        writer.write_event(Event::End(BytesEnd::new("D:prop")))?;

        // <D:href> for each href
        for href in &self.hrefs {
            writer.write_event(Event::Start(BytesStart::new("D:href")))?;
            writer.write_event(Event::Text(BytesText::new(href.as_str())))?;
            writer.write_event(Event::End(BytesEnd::new("D:href")))?;
        }

        // </C:addressbook-multiget>
        writer.write_event(Event::End(BytesEnd::new("C:addressbook-multiget")))?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| CardDavError::Xml(format!("UTF-8 error: {e}")))
    }
}

impl Default for AddressBookMultiGetRequest {
    fn default() -> Self {
        Self::new()
    }
}
