#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use labelscout::{
    config::{ClientConfig, SearchConfig},
    management::{KeyValueStore, MemoryStore},
    spotify::CatalogClient,
    types::Credential,
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

pub const TOKEN_PATH: &str = "/api/token";
pub const SEARCH_PATH: &str = "/v1/search";

pub fn credential() -> Credential {
    Credential::new("test-client", "test-secret")
}

/// Client configuration pointing at the mock server with near-zero pacing.
pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        min_request_interval: Duration::from_millis(1),
        request_timeout: Duration::from_secs(5),
        search: SearchConfig {
            page_delay: Duration::ZERO,
            subquery_delay: Duration::ZERO,
            ..SearchConfig::default()
        },
        ..ClientConfig::default()
    }
    .with_base_urls(
        format!("{}/v1", server.uri()),
        format!("{}{}", server.uri(), TOKEN_PATH),
    )
}

pub fn build_client(server: &MockServer) -> (CatalogClient, Arc<MemoryStore>) {
    build_client_with(test_config(server))
}

pub fn build_client_with(config: ClientConfig) -> (CatalogClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn KeyValueStore> = store.clone();
    let client = CatalogClient::new(config, Some(credential()), shared)
        .expect("client builds");
    (client, store)
}

pub fn token_body(token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": expires_in
    })
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("test-token", 3600)))
        .mount(server)
        .await;
}

pub fn release_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Release {id}"),
        "release_date": "2001-05-04",
        "release_date_precision": "day",
        "album_type": "album",
        "total_tracks": 10,
        "artists": [{ "id": format!("artist-{id}"), "name": "Some Artist" }],
        "images": [{ "url": format!("https://img.example/{id}.jpg"), "height": 640, "width": 640 }],
        "external_urls": { "spotify": format!("https://open.spotify.com/album/{id}") }
    })
}

pub fn releases_json(prefix: &str, range: std::ops::Range<usize>) -> Vec<Value> {
    range.map(|i| release_json(&format!("{prefix}{i}"))).collect()
}

pub fn search_page(items: Vec<Value>, total: u64, offset: u32) -> Value {
    json!({
        "albums": {
            "items": items,
            "total": total,
            "limit": 50,
            "offset": offset,
            "next": null
        }
    })
}

/// Empty result for every search not matched by a more specific mock.
pub async fn mount_empty_search_fallback(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(Vec::new(), 0, 0)))
        .with_priority(10)
        .mount(server)
        .await;
}

/// Mounts the pages of a label query, `page_size` items per page.
pub async fn mount_label_pages(server: &MockServer, query: &str, items: Vec<Value>, page_size: usize) {
    let total = items.len() as u64;
    for (page, chunk) in items.chunks(page_size).enumerate() {
        let offset = (page * page_size) as u32;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("q", query))
            .and(query_param("offset", offset.to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(search_page(chunk.to_vec(), total, offset)),
            )
            .expect(1)
            .mount(server)
            .await;
    }
}
