// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! Response parsers for WebDAV/CardDAV operations.

use quick_xml::events::Event;

use crate::error::CardDavError;
use crate::types::{AddressItem, ETag, Href};

/// `WebDAV` multistatus response.
#[derive(Debug, Clone)]
pub struct MultiStatusResponse {
    /// The response items.
    pub responses: Vec<ResponseItem>,
}

/// Individual response in multistatus.
#[derive(Debug, Clone)]
pub struct ResponseItem {
    /// The href of the responded resource.
    pub href: Href,
    /// Property sets grouped by status.
    pub prop_stats: Vec<PropStat>,
}

/// Property stat with status and value.
#[derive(Debug, Clone)]
pub struct PropStat {
    /// The parsed properties.
    pub props: Properties,
    /// The status line, e.g. `HTTP/1.1 200 OK`.
    pub status: String,
}

/// WebDAV/CardDAV properties.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    /// `d:displayname`.
    pub display_name: Option<String>,
    /// `d:getetag`.
    pub get_etag: Option<ETag>,
    /// `cs:getctag`, the collection change summary.
    pub get_ctag: Option<String>,
    /// `c:address-data`, the raw vCard payload.
    pub address_data: Option<String>,
}

impl MultiStatusResponse {
    /// Parses multistatus response from XML.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    pub fn from_xml(xml: &str) -> Result<Self, CardDavError> {
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        reader.config_mut().check_end_names = true;

        let mut responses = Vec::new();
        let mut current_response: Option<ResponseItem> = None;
        let mut current_prop_stats: Vec<PropStat> = Vec::new();
        let mut current_props: Properties = Properties::default();
        let mut in_prop = false;
        let mut in_response = false;
        let mut in_propstat = false;

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::End(ref e) if e.name().local_name().into_inner() == b"multistatus" => break,
                Event::Eof => break,

                Event::Start(ref e) => match e.name().local_name().into_inner() {
                    b"response" => {
                        in_response = true;
                        current_response = Some(ResponseItem {
                            href: Href::new(String::new()),
                            prop_stats: Vec::new(),
                        });
                    }
                    b"href" if in_response && !in_prop => {
                        if let Event::Text(text) = reader.read_event_into(&mut buf)? {
                            let href = text.unescape()?.to_string();
                            if let Some(ref mut resp) = current_response {
                                resp.href = Href::new(href);
                            }
                        }
                    }
                    b"propstat" if in_response => {
                        in_propstat = true;
                        current_props = Properties::default();
                    }

                    b"prop" => in_prop = true,

                    b"displayname" if in_prop => {
                        if let Event::Text(text) = reader.read_event_into(&mut buf)? {
                            current_props.display_name = Some(text.unescape()?.to_string());
                        }
                    }
                    b"getetag" if in_prop => {
                        if let Event::Text(text) = reader.read_event_into(&mut buf)? {
                            current_props.get_etag = Some(ETag::new(text.unescape()?.to_string()));
                        }
                    }
                    b"getctag" if in_prop => {
                        if let Event::Text(text) = reader.read_event_into(&mut buf)? {
                            current_props.get_ctag = Some(text.unescape()?.to_string());
                        }
                    }
                    b"address-data" if in_prop => {
                        // Servers deliver the payload as escaped text or CDATA.
                        match reader.read_event_into(&mut buf)? {
                            Event::Text(text) => {
                                current_props.address_data = Some(text.unescape()?.to_string());
                            }
                            Event::CData(data) => {
                                let raw = data.into_inner().into_owned();
                                let text = String::from_utf8(raw)
                                    .map_err(|e| CardDavError::Xml(format!("UTF-8 error: {e}")))?;
                                current_props.address_data = Some(text);
                            }
                            _ => {}
                        }
                    }
                    b"status" if in_propstat => {
                        if let Event::Text(text) = reader.read_event_into(&mut buf)? {
                            let status = text.unescape()?.to_string();
                            current_prop_stats.push(PropStat {
                                props: current_props.clone(),
                                status,
                            });
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) => match e.name().local_name().into_inner() {
                    b"response" if in_response => {
                        in_response = false;
                        if let Some(mut resp) = current_response.take() {
                            resp.prop_stats.clone_from(&current_prop_stats);
                            current_prop_stats.clear();
                            responses.push(resp);
                        }
                    }
                    b"propstat" if in_propstat => {
                        in_propstat = false;
                    }
                    b"prop" => {
                        in_prop = false;
                    }
                    _ => {}
                },
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { responses })
    }

    /// Converts an etag-listing response into `(etag, href)` pairs.
    ///
    /// Entries without a successful etag property are dropped.
    #[must_use]
    pub fn into_etag_listing(self) -> Vec<(ETag, Href)> {
        let mut listed = Vec::new();

        for response in self.responses {
            for prop_stat in &response.prop_stats {
                if !prop_stat.status.contains("200") {
                    continue;
                }
                if let Some(etag) = &prop_stat.props.get_etag {
                    listed.push((etag.clone(), response.href.clone()));
                }
            }
        }

        listed
    }

    /// Converts a multiget response into address items.
    ///
    /// Unlike the etag listing, entries whose address-data is missing or
    /// empty are kept (with an empty `data`) so callers can account for them
    /// as benign gaps.
    #[must_use]
    pub fn into_items(self) -> Vec<AddressItem> {
        let mut items = Vec::new();

        for response in self.responses {
            for prop_stat in &response.prop_stats {
                if !prop_stat.status.contains("200") {
                    continue;
                }
                let Some(etag) = &prop_stat.props.get_etag else {
                    continue;
                };
                let data = prop_stat.props.address_data.clone().unwrap_or_default();
                items.push(AddressItem::new(
                    response.href.clone(),
                    etag.clone(),
                    data,
                ));
            }
        }

        items
    }

    /// Returns the first successfully reported ctag, if any.
    #[must_use]
    pub fn ctag(&self) -> Option<String> {
        self.responses.iter().find_map(|r| {
            r.prop_stats
                .iter()
                .find(|p| p.status.contains("200"))
                .and_then(|p| p.props.get_ctag.clone())
        })
    }

    /// Returns the first successfully reported display name, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.responses.iter().find_map(|r| {
            r.prop_stats
                .iter()
                .find(|p| p.status.contains("200"))
                .and_then(|p| p.props.display_name.clone())
        })
    }
}
