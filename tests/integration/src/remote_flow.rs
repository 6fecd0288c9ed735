//! Refresh and sync through the HTTP client against a mock instance

use std::time::Duration;

use pretty_assertions::assert_eq;
use recon_client::{ClientConfig, MagentoClient};
use recon_core::{
    ExecuteOptions, RecordType, RemoteContent, SyncItemRequest, SyncRun, SyncStatus, compare, run_sync,
};
use recon_test_utils::{TestWorkspace, page};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config() -> ClientConfig {
    ClientConfig {
        timeout: Duration::from_secs(5),
        retry_attempts: 1,
        retry_delay: Duration::from_millis(10),
        page_size: 2,
    }
}

async fn mount_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/V1/cmsPage/search"))
        .and(query_param("searchCriteria[currentPage]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": 1, "identifier": "home", "title": "Home", "content": "Welcome" },
                { "id": 2, "identifier": "about", "title": "About", "content": "Old" }
            ],
            "total_count": 3
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/V1/cmsPage/search"))
        .and(query_param("searchCriteria[currentPage]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": 3, "url_key": "legacy", "title": "Legacy", "content": "Gone" }
            ],
            "total_count": 3
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_snapshot_of_paginated_listing() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let ws = TestWorkspace::new();
    ws.add_instance_at("prod", &server.uri());

    let client = MagentoClient::new(&server.uri(), "prod-token", config()).unwrap();
    let records = client.list(RecordType::Page).await.unwrap();
    assert_eq!(records.len(), 3);

    let info = ws
        .snapshots()
        .save("prod", RecordType::Page, &records, Default::default())
        .unwrap();
    assert_eq!(info.item_count, 3);
    assert_eq!(
        ws.snapshots().load("prod", RecordType::Page).unwrap(),
        Some(records.clone())
    );

    // `url_key` stands in for a missing `identifier`
    let source = vec![page("legacy", "Legacy", "Gone"), page("contact", "Contact", "Hi")];
    let report = compare(&source, &records, RecordType::Page);
    let identifiers: Vec<&str> = report.entries.iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(identifiers, vec!["about", "contact", "home", "legacy"]);
    assert_eq!(report.missing_in_destination, 1);
    assert_eq!(report.missing_in_source, 2);
}

#[tokio::test]
async fn test_sync_run_through_client() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    Mock::given(method("PUT"))
        .and(path("/rest/V1/cmsPage/2"))
        .and(body_partial_json(json!({ "page": { "id": 2, "content": "New" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "identifier": "about", "title": "About", "content": "New"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/V1/cmsPage"))
        .and(body_partial_json(json!({ "page": { "identifier": "contact" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "identifier": "contact", "title": "Contact", "content": "Hi"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ws = TestWorkspace::new();
    let client = MagentoClient::new(&server.uri(), "prod-token", config()).unwrap();
    let source = vec![page("about", "About", "New"), page("contact", "Contact", "Hi")];

    let mut run = SyncRun::new(
        "staging",
        "prod",
        RecordType::Page,
        vec![
            SyncItemRequest::update("about").with_fields(["content"]),
            SyncItemRequest::create("contact"),
        ],
    );
    run_sync(&mut run, &source, &client, None, ExecuteOptions::with_concurrency(2)).await;
    ws.runs().save(&run).unwrap();

    assert_eq!(run.status, SyncStatus::Completed);
    assert_eq!((run.items_synced, run.items_failed), (2, 0));
    assert_eq!(
        run.outcomes[1].message.as_deref(),
        Some("Created page successfully")
    );
    assert_eq!(ws.runs().list(Some(10)).unwrap().len(), 1);
}
