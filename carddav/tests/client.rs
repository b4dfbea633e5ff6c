// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! Client integration tests with wiremock.

use cardsync_carddav::{CardDavClient, CardDavConfig, Href};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(uri: &str) -> CardDavConfig {
    CardDavConfig {
        base_url: format!("{uri}/abook/"),
        username: "user".to_string(),
        password: "secret".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn client_collection_meta() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/abook/"))
        .and(header("Depth", "0"))
        .and(header("Prefer", "return-minimal"))
        .and(header("Content-Type", "application/xml; charset=utf-8"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            "\
<?xml version=\"1.0\" encoding=\"utf-8\" ?>
<D:multistatus xmlns:D=\"DAV:\" xmlns:CS=\"http://calendarserver.org/ns/\">
  <D:response>
    <D:href>/abook/</D:href>
    <D:propstat>
      <D:prop>
        <CS:getctag>ctag-42</CS:getctag>
        <D:displayname>Work</D:displayname>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>",
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = CardDavClient::new(test_config(&mock_server.uri())).expect("Failed to create client");
    let meta = client.collection_meta().await.expect("PROPFIND failed");

    assert_eq!(meta.ctag.as_deref(), Some("ctag-42"));
    assert_eq!(meta.display_name.as_deref(), Some("Work"));
}

#[tokio::test]
async fn client_list_etags() {
    let mock_server = MockServer::start().await;

    Mock::given(method("REPORT"))
        .and(path("/abook/"))
        .and(header("Depth", "1"))
        .and(header("Accept", "text/vcard; version=4.0"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            "\
<?xml version=\"1.0\" encoding=\"utf-8\" ?>
<D:multistatus xmlns:D=\"DAV:\">
  <D:response>
    <D:href>/abook/card1.vcf</D:href>
    <D:propstat>
      <D:prop>
        <D:getetag>\"e1\"</D:getetag>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>",
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = CardDavClient::new(test_config(&mock_server.uri())).expect("Failed to create client");
    let listing = client.list_etags().await.expect("REPORT failed");

    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].0.as_str(), "\"e1\"");
    assert_eq!(listing[0].1.as_str(), "/abook/card1.vcf");
}

#[tokio::test]
async fn client_multiget_returns_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("REPORT"))
        .and(path("/abook/"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            "\
<?xml version=\"1.0\" encoding=\"utf-8\" ?>
<D:multistatus xmlns:D=\"DAV:\" xmlns:C=\"urn:ietf:params:xml:ns:carddav\">
  <D:response>
    <D:href>/abook/card1.vcf</D:href>
    <D:propstat>
      <D:prop>
        <D:getetag>\"e1\"</D:getetag>
        <C:address-data>BEGIN:VCARD
VERSION:3.0
UID:u1
FN:Ada Lovelace
EMAIL:ada@example.com
END:VCARD</C:address-data>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>",
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = CardDavClient::new(test_config(&mock_server.uri())).expect("Failed to create client");
    let items = client
        .multiget(&[Href::from("/abook/card1.vcf")])
        .await
        .expect("multiget failed");

    assert_eq!(items.len(), 1);
    assert!(items[0].data.contains("UID:u1"));
}

#[tokio::test]
async fn client_multiget_empty_hrefs_skips_request() {
    let mock_server = MockServer::start().await;
    // No mock mounted: any request would fail the test.

    let client = CardDavClient::new(test_config(&mock_server.uri())).expect("Failed to create client");
    let items = client.multiget(&[]).await.expect("multiget failed");

    assert!(items.is_empty());
}

#[tokio::test]
async fn client_reports_auth_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("REPORT"))
        .and(path("/abook/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = CardDavClient::new(test_config(&mock_server.uri())).expect("Failed to create client");
    let err = client.list_etags().await.expect_err("expected auth error");

    assert!(err.to_string().contains("Authentication failed"));
}
