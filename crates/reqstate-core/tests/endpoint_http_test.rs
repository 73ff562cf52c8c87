// End-to-end tests: `Endpoint` + `RequestController` over a real
// `HttpTransport` talking to wiremock.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reqstate_api::HttpTransport;
use reqstate_core::{CacheKey, Endpoint, MemoryCache, Method, RequestConfig, RequestError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Club {
    id: u32,
    name: String,
}

async fn setup() -> (MockServer, Arc<HttpTransport>) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri()).parse().unwrap();
    let transport = Arc::new(HttpTransport::from_reqwest(Some(base), reqwest::Client::new()));
    (server, transport)
}

#[tokio::test]
async fn test_cached_endpoint_hits_network_once() {
    let (server, transport) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clubs/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "000",
            "data": { "id": 1, "name": "Rysy" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint: Endpoint<Club, _> = Endpoint::new(Method::Get, "/clubs/1", transport)
        .with_cache(Arc::new(MemoryCache::new()))
        .with_cache_key(CacheKey::unique());

    let first = endpoint.controller();
    let club = first.fetch().await.unwrap();
    assert_eq!(club.name, "Rysy");

    // A second controller from the same endpoint shares the cache slot.
    let second = endpoint.controller();
    assert_eq!(second.fetch().await, Some(club));
    assert!(!second.state().loading);
}

#[tokio::test]
async fn test_bound_params_travel_by_method() {
    let (server, transport) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clubs"))
        .and(query_param("city", "zakopane"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "000",
            "data": [{ "id": 1, "name": "Rysy" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/clubs"))
        .and(body_json(json!({ "name": "Giewont" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "000",
            "data": [{ "id": 2, "name": "Giewont" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let list: Endpoint<Vec<Club>, _> =
        Endpoint::new(Method::Get, "/clubs", Arc::clone(&transport));
    let found = list.bind(json!({ "city": "zakopane" })).fetch().await.unwrap();
    assert_eq!(found[0].name, "Rysy");

    let create: Endpoint<Vec<Club>, _> = Endpoint::new(Method::Post, "/clubs", transport);
    let created = create.bind(json!({ "name": "Giewont" })).fetch().await.unwrap();
    assert_eq!(created[0].id, 2);
}

#[tokio::test]
async fn test_endpoint_config_overrides_bound_method() {
    let (server, transport) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/clubs/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "000",
            "data": { "id": 1, "name": "renamed" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint: Endpoint<Club, _> = Endpoint::new(Method::Post, "/clubs/1", transport)
        .with_config(RequestConfig::default().with_method(Method::Put));

    assert_eq!(endpoint.request_config().method, Some(Method::Put));
    let club = endpoint.bind(json!({ "name": "renamed" })).fetch().await.unwrap();
    assert_eq!(club.name, "renamed");
}

#[tokio::test]
async fn test_http_error_with_envelope_body() {
    let (server, transport) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "403",
            "data": null
        })))
        .mount(&server)
        .await;

    let endpoint: Endpoint<Club, _> = Endpoint::new(Method::Get, "/clubs/9", transport);
    let ctrl = endpoint.controller();

    assert!(ctrl.fetch().await.is_none());
    let state = ctrl.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_ref().and_then(RequestError::code), Some("403"));
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let transport = Arc::new(HttpTransport::from_reqwest(
        Some("http://127.0.0.1:9/api".parse().unwrap()),
        reqwest::Client::new(),
    ));
    let endpoint: Endpoint<Club, _> = Endpoint::new(Method::Get, "/clubs", transport);
    let ctrl = endpoint.controller();

    assert!(ctrl.fetch().await.is_none());
    assert!(matches!(
        ctrl.state().error,
        Some(RequestError::Transport(_))
    ));
}
