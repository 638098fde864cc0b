//! ReqwestTransport against a local mock server
//! Run with: cargo test --test http_transport

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ensure_init, env_with};
use endpointfs::application::errors::EndpointError;
use endpointfs::domain::traits::{HttpTransport, OutboundRequest};
use endpointfs::infrastructure::http::ReqwestTransport;
use endpointfs::plugins::{create_endpoint, SearchEndpoint, SharedEndpoint, SummaryEndpoint, VirtualEndpoint};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(url: String) -> OutboundRequest {
    OutboundRequest {
        url,
        bearer: "secret-token".to_string(),
        body: json!({"query": "rust", "max_results": 2}),
        timeout: Duration::from_secs(5),
    }
}

#[test]
fn test_post_json_sends_bearer_and_body() {
    ensure_init();
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime should start");
    let server = rt.block_on(async { MockServer::start().await });

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("authorization", "Bearer secret-token"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"query": "rust", "max_results": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"results\":[]}"))
            .expect(1)
            .mount(&server)
            .await;
    });

    let transport = ReqwestTransport::new();
    let body = transport
        .post_json(&request(format!("{}/search", server.uri())))
        .expect("request should succeed");
    assert_eq!(body, "{\"results\":[]}");
}

#[test]
fn test_error_status_is_a_transport_error() {
    ensure_init();
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime should start");
    let server = rt.block_on(async { MockServer::start().await });

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
    });

    let transport = ReqwestTransport::new();
    let err = transport
        .post_json(&request(format!("{}/search", server.uri())))
        .unwrap_err();
    match err {
        EndpointError::Transport(message) => assert!(message.contains("500"), "{}", message),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[test]
fn test_shared_summary_endpoint_end_to_end() {
    ensure_init();
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime should start");
    let server = rt.block_on(async { MockServer::start().await });

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-local"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Short version."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;
    });

    let endpoint = SummaryEndpoint::new()
        .with_transport(Arc::new(ReqwestTransport::new()))
        .with_env(env_with(&[("OPENAI_API_KEY", "sk-local")]));
    let shared = SharedEndpoint::new(endpoint);
    let config = json!({"openai_endpoint": format!("{}/v1/chat/completions", server.uri())}).to_string();
    shared.initialize(Some(&config)).unwrap();

    shared.write("/request", b"A long article about lifetimes.").unwrap();
    assert_eq!(shared.read("/response.txt", 0, -1).unwrap(), b"Short version.");
    assert_eq!(shared.stat("/response.txt").unwrap().unwrap().size, 14);
}

#[test]
fn test_endpoints_construct_inside_async_runtime() {
    ensure_init();
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime should start");
    rt.block_on(async {
        drop(SearchEndpoint::new());
        drop(SummaryEndpoint::new());
        for name in ["search", "summary", "skills"] {
            let endpoint = create_endpoint(name).unwrap();
            assert!(endpoint.readme().starts_with("# "));
        }
    });
}
