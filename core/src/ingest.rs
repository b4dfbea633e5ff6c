// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! Turns one fetched address object into zero-or-more contact rows.

use cardsync_carddav::AddressItem;
use cardsync_vcard::Vcard;

use crate::localdb::ContactRecord;

/// Source tag stored on books and contacts owned by this engine.
pub const EXTERNAL_CARDDAV_SOURCE: &str = "external-carddav";

/// Ownership references shared by every row ingested in one run.
#[derive(Debug, Clone, Copy)]
pub struct IngestContext<'a> {
    /// The external source id; contact ids derive from it.
    pub source_id: &'a str,
    /// The owning account reference.
    pub account_id: &'a str,
    /// The owning book reference.
    pub book_id: &'a str,
}

/// Ingests one multiget response item.
///
/// Empty and unparseable payloads are skipped with an info log; payloads
/// without any usable email address yield no rows at all (no identity
/// without an email). Otherwise one row per non-empty email is produced,
/// the 2nd..Nth carrying a numeric id suffix. Group cards mark every row
/// hidden.
#[must_use]
pub fn ingest_item(ctx: &IngestContext<'_>, item: &AddressItem) -> Vec<ContactRecord> {
    let mut results = Vec::new();

    if item.data.is_empty() {
        tracing::info!(etag = %item.etag, "received addressbook entry with an empty body");
        return results;
    }

    let card = match Vcard::parse(&item.data) {
        Ok(card) => card,
        Err(e) => {
            tracing::info!(etag = %item.etag, error = %e, "unable to decode vcard");
            return results;
        }
    };

    let emails = card.emails();
    if emails.iter().all(|e| e.is_empty()) {
        return results;
    }

    let key = card.uid().unwrap_or_else(|| item.href.as_str());
    let base_id = format!("ext-{}-{}", ctx.source_id, key);

    let name = card
        .formatted_name()
        .or_else(|| card.structured_name())
        .unwrap_or_default();

    // Shared across all fanned-out rows; built once, cloned per row.
    let mut info = serde_json::json!({
        "vcf": item.data,
        "href": item.href.as_str(),
    });
    if let Some(photo) = card.photo().filter(|p| !p.is_empty()) {
        info["photo"] = serde_json::Value::String(photo.to_string());
    }
    let info = info.to_string();

    let hidden = card.is_group();

    for (i, email) in emails.iter().enumerate() {
        if email.is_empty() {
            continue;
        }

        let id = if i == 0 {
            base_id.clone()
        } else {
            format!("{base_id}-{i}")
        };

        results.push(ContactRecord {
            id,
            account_id: ctx.account_id.to_string(),
            book_id: ctx.book_id.to_string(),
            email: (*email).to_string(),
            name: name.to_string(),
            info: info.clone(),
            etag: item.etag.as_str().to_string(),
            hidden,
        });
    }

    results
}

#[cfg(test)]
mod tests {
    use cardsync_carddav::{ETag, Href};

    use super::*;

    fn ctx() -> IngestContext<'static> {
        IngestContext {
            source_id: "src1",
            account_id: "acct1",
            book_id: "external-src1",
        }
    }

    fn item(data: &str) -> AddressItem {
        AddressItem::new(Href::from("/abook/c1.vcf"), ETag::from("\"e1\""), data.to_string())
    }

    #[test]
    fn ingest_empty_body_yields_nothing() {
        assert!(ingest_item(&ctx(), &item("")).is_empty());
    }

    #[test]
    fn ingest_unparseable_payload_yields_nothing() {
        assert!(ingest_item(&ctx(), &item("FN:No Delimiters Here")).is_empty());
    }

    #[test]
    fn ingest_emailless_payload_yields_nothing() {
        let data = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:u1\r\nFN:No Mail\r\nEND:VCARD\r\n";
        assert!(ingest_item(&ctx(), &item(data)).is_empty());
    }

    #[test]
    fn ingest_fans_out_per_email() {
        let data = "\
BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
UID:U\r\n\
FN:Ada Lovelace\r\n\
EMAIL:a@example.com\r\n\
EMAIL:b@example.com\r\n\
EMAIL:c@example.com\r\n\
END:VCARD\r\n";

        let rows = ingest_item(&ctx(), &item(data));
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].id, "ext-src1-U");
        assert_eq!(rows[1].id, "ext-src1-U-1");
        assert_eq!(rows[2].id, "ext-src1-U-2");

        assert_eq!(rows[0].email, "a@example.com");
        assert_eq!(rows[1].email, "b@example.com");
        assert_eq!(rows[2].email, "c@example.com");

        for row in &rows {
            assert_eq!(row.name, "Ada Lovelace");
            assert_eq!(row.info, rows[0].info);
            assert_eq!(row.etag, "\"e1\"");
            assert!(!row.hidden);
        }
    }

    #[test]
    fn ingest_falls_back_to_href_without_uid() {
        let data = "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Ada\r\nEMAIL:a@example.com\r\nEND:VCARD\r\n";
        let rows = ingest_item(&ctx(), &item(data));
        assert_eq!(rows[0].id, "ext-src1-/abook/c1.vcf");
    }

    #[test]
    fn ingest_name_falls_back_to_structured_name() {
        let data = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:u\r\nN:Lovelace;Ada;;;\r\nEMAIL:a@example.com\r\nEND:VCARD\r\n";
        let rows = ingest_item(&ctx(), &item(data));
        assert_eq!(rows[0].name, "Lovelace;Ada;;;");
    }

    #[test]
    fn ingest_group_card_marks_rows_hidden() {
        let data = "\
BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
UID:g1\r\n\
FN:Team\r\n\
X-ADDRESSBOOKSERVER-KIND:group\r\n\
EMAIL:team@example.com\r\n\
END:VCARD\r\n";

        let rows = ingest_item(&ctx(), &item(data));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].hidden);
    }

    #[test]
    fn ingest_info_blob_carries_photo_when_present() {
        let data = "\
BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
UID:u\r\n\
FN:Ada\r\n\
PHOTO;ENCODING=b:AAECAw==\r\n\
EMAIL:a@example.com\r\n\
END:VCARD\r\n";

        let rows = ingest_item(&ctx(), &item(data));
        let info: serde_json::Value = serde_json::from_str(&rows[0].info).unwrap();
        assert_eq!(info["photo"], "AAECAw==");
        assert_eq!(info["href"], "/abook/c1.vcf");
        assert!(info["vcf"].as_str().unwrap().contains("FN:Ada"));
    }

    #[test]
    fn ingest_skips_empty_email_but_keeps_index_suffix() {
        let data = "\
BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
UID:u\r\n\
FN:Ada\r\n\
EMAIL:\r\n\
EMAIL:b@example.com\r\n\
END:VCARD\r\n";

        let rows = ingest_item(&ctx(), &item(data));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "ext-src1-u-1");
        assert_eq!(rows[0].email, "b@example.com");
    }
}
