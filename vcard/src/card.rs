// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! Parsed vCard with accessors for the fields contact ingestion needs.

use crate::line::{ContentLine, content_lines};

/// vCard structural parse errors.
///
/// A payload that fails to parse is incomplete: the caller skips it rather
/// than treating the whole run as failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VcardError {
    /// The payload has no content lines at all.
    #[error("empty payload")]
    Empty,

    /// The payload is missing the BEGIN:VCARD marker.
    #[error("missing BEGIN:VCARD")]
    MissingBegin,

    /// The payload is missing the END:VCARD marker.
    #[error("missing END:VCARD")]
    MissingEnd,
}

/// One parsed vCard.
#[derive(Debug, Clone)]
pub struct Vcard {
    lines: Vec<ContentLine>,
}

impl Vcard {
    /// Parses a raw vCard payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is empty or not delimited by
    /// `BEGIN:VCARD` / `END:VCARD`.
    pub fn parse(text: &str) -> Result<Self, VcardError> {
        let lines = content_lines(text);
        if lines.is_empty() {
            return Err(VcardError::Empty);
        }

        let begins = |l: &ContentLine| l.name == "BEGIN" && l.value.eq_ignore_ascii_case("VCARD");
        let ends = |l: &ContentLine| l.name == "END" && l.value.eq_ignore_ascii_case("VCARD");
        if !lines.iter().any(begins) {
            return Err(VcardError::MissingBegin);
        }
        if !lines.iter().any(ends) {
            return Err(VcardError::MissingEnd);
        }

        Ok(Self { lines })
    }

    fn first(&self, name: &str) -> Option<&ContentLine> {
        self.lines.iter().find(|l| l.name == name)
    }

    /// The UID property value, if present and non-empty.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.first("UID").map(|l| l.value.as_str()).filter(|v| !v.is_empty())
    }

    /// The formatted display name (FN), if present and non-empty.
    #[must_use]
    pub fn formatted_name(&self) -> Option<&str> {
        self.first("FN").map(|l| l.value.as_str()).filter(|v| !v.is_empty())
    }

    /// The structured name (N) raw value, if present and non-empty.
    #[must_use]
    pub fn structured_name(&self) -> Option<&str> {
        self.first("N").map(|l| l.value.as_str()).filter(|v| !v.is_empty())
    }

    /// Every EMAIL property value, in document order, empty values included.
    ///
    /// Callers fan one contact row out per non-empty address.
    #[must_use]
    pub fn emails(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.name == "EMAIL")
            .map(|l| l.value.as_str())
            .collect()
    }

    /// The PHOTO property value, if present.
    #[must_use]
    pub fn photo(&self) -> Option<&str> {
        self.first("PHOTO").map(|l| l.value.as_str())
    }

    /// The card kind, from KIND (vCard 4.0) or the Apple
    /// X-ADDRESSBOOKSERVER-KIND extension (vCard 3.0).
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.first("KIND")
            .or_else(|| self.first("X-ADDRESSBOOKSERVER-KIND"))
            .map(|l| l.value.as_str())
    }

    /// Whether the card represents a group/distribution-list entity.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind().is_some_and(|k| k.eq_ignore_ascii_case("group"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "\
BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
UID:u-123\r\n\
FN:Ada Lovelace\r\n\
N:Lovelace;Ada;;;\r\n\
EMAIL;TYPE=work:ada@example.com\r\n\
EMAIL;TYPE=home:ada@home.example\r\n\
END:VCARD\r\n";

    #[test]
    fn card_parse_exposes_fields() {
        let card = Vcard::parse(SIMPLE).unwrap();
        assert_eq!(card.uid(), Some("u-123"));
        assert_eq!(card.formatted_name(), Some("Ada Lovelace"));
        assert_eq!(card.structured_name(), Some("Lovelace;Ada;;;"));
        assert_eq!(card.emails(), vec!["ada@example.com", "ada@home.example"]);
        assert!(card.photo().is_none());
        assert!(!card.is_group());
    }

    #[test]
    fn card_parse_empty_payload_fails() {
        assert_eq!(Vcard::parse("").unwrap_err(), VcardError::Empty);
    }

    #[test]
    fn card_parse_missing_begin_fails() {
        let err = Vcard::parse("FN:Ada\r\nEND:VCARD\r\n").unwrap_err();
        assert_eq!(err, VcardError::MissingBegin);
    }

    #[test]
    fn card_parse_missing_end_fails() {
        let err = Vcard::parse("BEGIN:VCARD\r\nFN:Ada\r\n").unwrap_err();
        assert_eq!(err, VcardError::MissingEnd);
    }

    #[test]
    fn card_kind_group_detection() {
        let v4 = "BEGIN:VCARD\r\nVERSION:4.0\r\nKIND:group\r\nFN:Team\r\nEND:VCARD\r\n";
        assert!(Vcard::parse(v4).unwrap().is_group());

        let v3 = "BEGIN:VCARD\r\nVERSION:3.0\r\nX-ADDRESSBOOKSERVER-KIND:GROUP\r\nFN:Team\r\nEND:VCARD\r\n";
        assert!(Vcard::parse(v3).unwrap().is_group());

        let individual = "BEGIN:VCARD\r\nVERSION:4.0\r\nKIND:individual\r\nFN:Ada\r\nEND:VCARD\r\n";
        assert!(!Vcard::parse(individual).unwrap().is_group());
    }

    #[test]
    fn card_photo_value() {
        let text = "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Ada\r\nPHOTO;ENCODING=b;TYPE=JPEG:AAECAw==\r\nEND:VCARD\r\n";
        let card = Vcard::parse(text).unwrap();
        assert_eq!(card.photo(), Some("AAECAw=="));
    }

    #[test]
    fn card_emails_keeps_empty_values() {
        let text = "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Ada\r\nEMAIL:\r\nEMAIL:ada@example.com\r\nEND:VCARD\r\n";
        let card = Vcard::parse(text).unwrap();
        assert_eq!(card.emails(), vec!["", "ada@example.com"]);
    }
}
