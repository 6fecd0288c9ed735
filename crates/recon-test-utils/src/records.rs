//! Record builders shaped like real CMS API payloads

use recon_core::Record;
use serde_json::json;

/// A CMS block with the fields the API returns
pub fn block(identifier: &str, title: &str, content: &str) -> Record {
    Record::from_json(json!({
        "identifier": identifier,
        "title": title,
        "content": content,
        "is_active": true,
        "store_id": [0],
        "creation_time": "2024-01-01 00:00:00",
        "update_time": "2024-01-01 00:00:00"
    }))
    .unwrap()
}

/// A CMS page with the fields the API returns
pub fn page(identifier: &str, title: &str, content: &str) -> Record {
    Record::from_json(json!({
        "identifier": identifier,
        "title": title,
        "content": content,
        "content_heading": title,
        "page_layout": "1column",
        "meta_title": "",
        "meta_keywords": "",
        "meta_description": "",
        "is_active": true,
        "sort_order": 0,
        "store_id": [0],
        "creation_time": "2024-01-01 00:00:00",
        "update_time": "2024-01-01 00:00:00"
    }))
    .unwrap()
}
