#![allow(clippy::unwrap_used, clippy::expect_used)]
//! HTTP API tests.
//!
//! Exercise the real router, store, and resolvers against an in-memory
//! content graph.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use trovato_content_api::services::StorageAssetResolver;
use trovato_content_api::store::InMemoryNodeStore;
use trovato_content_api::{AppState, ConverterSettings, routes};

const GRAPH: &str = r#"{
    "assets": [
        {
            "id": "hero",
            "kind": {"type": "image", "width": 4000, "height": 3000},
            "resource": {"uri": "local://2024/01/hero.jpg", "filename": "hero.jpg", "mediaType": "image/jpeg"},
            "title": "Hero",
            "caption": "A hero image",
            "copyrightNotice": "(c) Trovato"
        },
        {
            "id": "report",
            "kind": {"type": "document"},
            "resource": {"uri": "local://2024/02/report.pdf", "filename": "report.pdf", "mediaType": "application/pdf"},
            "title": "Annual report"
        }
    ],
    "nodes": [
        {
            "id": "home",
            "nodeType": "page",
            "uriPath": "/",
            "properties": {
                "title": "Welcome",
                "hero": {"$asset": "hero"},
                "body": "Read <a href=\"node://about\">about us</a> or <a href=\"asset://report\">the report</a>.",
                "featured": {"$node": "about"},
                "aboutLink": "node://about",
                "draftLink": "node://draft",
                "tags": []
            }
        },
        {
            "id": "about",
            "nodeType": "page",
            "uriPath": "/about",
            "properties": {
                "title": "About",
                "download": {"$asset": "report"},
                "home": {"$node": "home"}
            }
        },
        {
            "id": "draft",
            "nodeType": "page",
            "uriPath": "/draft",
            "stageId": "preview"
        },
        {
            "id": "broken",
            "nodeType": "page",
            "properties": {
                "link": "asset://external"
            }
        }
    ]
}"#;

fn app() -> Router {
    app_with_graph(GRAPH)
}

fn app_with_graph(graph: &str) -> Router {
    let store = InMemoryNodeStore::from_json(graph).unwrap();
    let settings = ConverterSettings::default()
        .with_image_maximum(1920, 1080)
        .with_reference_depth(Some(1))
        .unwrap();
    let state = AppState::from_store(
        store,
        settings,
        StorageAssetResolver::new("/files"),
        Url::parse("https://cms.example.org/").unwrap(),
    );
    routes::router().with_state(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_reports_loaded_graph() {
    let (status, body) = get_json(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "nodes": 4, "assets": 2}));
}

#[tokio::test]
async fn test_node_properties_converted() {
    let (status, body) = get_json(app(), "/api/nodes/home/properties").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "title": "Welcome",
            "hero": {
                "src": "/files/styles/1920x1080/2024/01/hero.jpg",
                "width": 1440,
                "height": 1080,
                "title": "Hero",
                "caption": "A hero image",
                "copyrightNotice": "(c) Trovato"
            },
            "body": "Read <a href=\"/about\">about us</a> or <a href=\"/files/2024/02/report.pdf\">the report</a>.",
            "featured": {
                "title": "About",
                "download": {
                    "src": "/files/2024/02/report.pdf",
                    "title": "Annual report",
                    "caption": "",
                    "copyrightNotice": ""
                },
                "home": null
            },
            "aboutLink": "/about",
            "draftLink": null,
            "tags": []
        })
    );
}

#[tokio::test]
async fn test_properties_keep_declared_order() {
    let (_, body) = get(app(), "/api/nodes/home/properties").await;
    let body = String::from_utf8(body).unwrap();
    let positions: Vec<usize> = ["\"title\"", "\"hero\"", "\"body\"", "\"featured\"", "\"aboutLink\""]
        .iter()
        .map(|key| body.find(key).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[tokio::test]
async fn test_absolute_uris_on_request() {
    let (status, body) = get_json(app(), "/api/nodes/home/properties?absolute=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aboutLink"], "https://cms.example.org/about");
    assert_eq!(
        body["hero"]["src"],
        "https://cms.example.org/files/styles/1920x1080/2024/01/hero.jpg"
    );
    assert_eq!(
        body["featured"]["download"]["src"],
        "https://cms.example.org/files/2024/02/report.pdf"
    );
    assert_eq!(
        body["body"],
        "Read <a href=\"https://cms.example.org/about\">about us</a> or <a href=\"https://cms.example.org/files/2024/02/report.pdf\">the report</a>."
    );
}

#[tokio::test]
async fn test_invalid_absolute_flag_is_bad_request() {
    let (status, body) = get(app(), "/api/nodes/home/properties?absolute=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().starts_with("bad request: "));
}

#[tokio::test]
async fn test_unknown_node_is_not_found() {
    let (status, body) = get(app(), "/api/nodes/missing/properties").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"not found");
}

#[tokio::test]
async fn test_conversion_fault_is_internal_error() {
    let graph = r#"{
        "assets": [{
            "id": "external",
            "kind": {"type": "document"},
            "resource": {"uri": "s3://bucket/file.pdf", "filename": "file.pdf", "mediaType": "application/pdf"}
        }],
        "nodes": [{"id": "broken", "nodeType": "page", "properties": {"link": "asset://external"}}]
    }"#;
    let (status, body) = get(app_with_graph(graph), "/api/nodes/broken/properties").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"internal server error");
}

#[tokio::test]
async fn test_unresolvable_asset_token_is_null() {
    let (status, body) = get_json(app(), "/api/nodes/broken/properties").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"link": null}));
}
