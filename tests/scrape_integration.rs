//! Scrape integration tests
//!
//! End-to-end tests for the scrape pipeline that verify:
//! - Translation of a live status response
//! - Degraded output when Kibana fails
//! - The HTTP surface served by the router

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use kibana_exporter::collector::{KibanaClient, KibanaCollector};
use kibana_exporter::config::Config;
use kibana_exporter::server::{router, AppState};
use kibana_exporter::transformer::{PrometheusFormatter, Sample};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a mock Kibana server answering the status API with `body`
async fn create_mock_kibana_server(status: u16, body: serde_json::Value) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&mock_server)
        .await;

    mock_server
}

fn collector_for(server: &MockServer) -> KibanaCollector {
    let client = KibanaClient::new(&server.uri(), 5000, false).expect("Failed to create client");
    KibanaCollector::new(Arc::new(client))
}

fn find<'a>(samples: &'a [Sample<'a>], name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    samples
        .iter()
        .find(|s| s.name() == name && s.labels().eq(labels.iter().copied()))
        .map(|s| s.value)
}

/// The documented end-to-end scenario
#[tokio::test]
async fn test_basic_scrape() {
    let mock_server = create_mock_kibana_server(
        200,
        json!({
            "status": {
                "overall": {"level": "green"},
                "core": {"elasticsearch": {"level": "available"}}
            },
            "metrics": {
                "process": {
                    "memory": {
                        "heap": {"total_in_bytes": 100, "used_in_bytes": 50, "size_limit": 200}
                    }
                }
            }
        }),
    )
    .await;

    let collector = collector_for(&mock_server);
    let samples = collector.collect().await;

    assert_eq!(find(&samples, "kibana_status_overall", &[]), Some(1.0));
    assert_eq!(
        find(&samples, "kibana_status_core", &[("name", "elasticsearch")]),
        Some(1.0)
    );
    assert_eq!(find(&samples, "kibana_status_elasticsearch", &[]), Some(1.0));
    assert_eq!(find(&samples, "kibana_heap_total_bytes", &[]), Some(100.0));
    assert_eq!(find(&samples, "kibana_heap_used_bytes", &[]), Some(50.0));
    assert_eq!(find(&samples, "kibana_heap_size_limit_bytes", &[]), Some(200.0));
    assert_eq!(find(&samples, "kibana_up", &[]), Some(1.0));
    assert_eq!(find(&samples, "kibana_scrape_success", &[]), Some(1.0));
    assert!(find(&samples, "kibana_scrape_duration_seconds", &[]).unwrap() >= 0.0);
    assert_eq!(samples.len(), 9);

    let output = PrometheusFormatter::new().format(&samples);
    assert!(output.contains("kibana_status_core{name=\"elasticsearch\"} 1"));
    assert!(output.contains("kibana_heap_size_limit_bytes 200"));
    assert!(output.contains("# TYPE kibana_status_overall gauge"));
}

/// Full document: every row of the translation table yields a sample
#[tokio::test]
async fn test_full_document_scrape() {
    let mock_server = create_mock_kibana_server(
        200,
        json!({
            "name": "kibana-01",
            "version": {"number": "7.17.9"},
            "status": {
                "overall": {"level": "degraded"},
                "core": {
                    "elasticsearch": {"level": "available"},
                    "savedObjects": {"level": "unavailable"}
                }
            },
            "metrics": {
                "concurrent_connections": 7,
                "process": {
                    "memory": {
                        "heap": {"total_in_bytes": 1024, "used_in_bytes": 512, "size_limit": 4096},
                        "resident_set_size_in_bytes": 2048
                    },
                    "event_loop_delay": 250.0,
                    "uptime_in_millis": 3600000
                },
                "requests": {"total": 100, "disconnects": 3, "status_codes": {"200": 95, "404": 5}},
                "response_times": {"avg_in_millis": 40.0, "max_in_millis": 900.0},
                "os": {
                    "cpu": {"cgroup": {"cpu_percent": 3.5}},
                    "load": {"1m": 0.9, "5m": 0.8, "15m": 0.7},
                    "memory": {"total_in_bytes": 16000, "free_in_bytes": 6000, "used_in_bytes": 10000}
                }
            }
        }),
    )
    .await;

    let collector = collector_for(&mock_server);
    let samples = collector.collect().await;

    // 3 scrape samples + 25 translated
    assert_eq!(samples.len(), 28);
    assert_eq!(find(&samples, "kibana_status_overall", &[]), Some(0.5));
    assert_eq!(find(&samples, "kibana_status_saved_objects", &[]), Some(0.0));
    assert_eq!(find(&samples, "kibana_event_loop_delay_seconds", &[]), Some(0.25));
    assert_eq!(find(&samples, "kibana_process_uptime_seconds", &[]), Some(3600.0));
    assert_eq!(
        find(&samples, "kibana_requests_total", &[("status", "404")]),
        Some(5.0)
    );
    assert_eq!(
        find(&samples, "kibana_response_time_seconds", &[("quantile", "max")]),
        Some(0.9)
    );
    assert_eq!(find(&samples, "kibana_os_memory_used_bytes", &[]), Some(10000.0));

    let output = PrometheusFormatter::new().format(&samples);
    assert!(output.contains("# TYPE kibana_requests_total counter"));
    assert!(output.contains("kibana_requests_total{status=\"total\"} 100"));
    assert!(output.contains("kibana_response_time_seconds{quantile=\"avg\"} 0.04"));
}

/// `null` where a string or object is expected must not fail the scrape
#[tokio::test]
async fn test_null_fields_still_scrape() {
    let mock_server = create_mock_kibana_server(
        200,
        json!({
            "name": null,
            "version": null,
            "status": {
                "overall": {"level": "available", "summary": null},
                "core": {"elasticsearch": {"level": "available", "summary": null}}
            },
            "metrics": {
                "process": {"memory": {"heap": {"total_in_bytes": null, "used_in_bytes": 10, "size_limit": 20}}},
                "requests": {"status_codes": {"200": 4, "503": null}}
            }
        }),
    )
    .await;

    let collector = collector_for(&mock_server);
    let samples = collector.collect().await;

    assert_eq!(find(&samples, "kibana_up", &[]), Some(1.0));
    assert_eq!(find(&samples, "kibana_status_overall", &[]), Some(1.0));
    assert_eq!(find(&samples, "kibana_status_elasticsearch", &[]), Some(1.0));
    assert_eq!(find(&samples, "kibana_heap_total_bytes", &[]), Some(0.0));
    assert_eq!(
        find(&samples, "kibana_requests_total", &[("status", "200")]),
        Some(4.0)
    );
    assert_eq!(
        find(&samples, "kibana_requests_total", &[("status", "503")]),
        None
    );
}

/// Error status: only the three scrape samples are produced
#[tokio::test]
async fn test_error_handling_target_down() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let collector = collector_for(&mock_server);
    let samples = collector.collect().await;

    assert_eq!(samples.len(), 3);
    assert_eq!(find(&samples, "kibana_up", &[]), Some(0.0));
    assert_eq!(find(&samples, "kibana_scrape_success", &[]), Some(0.0));
    assert!(find(&samples, "kibana_scrape_duration_seconds", &[]).unwrap() >= 0.0);
}

#[tokio::test]
async fn test_error_handling_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>starting</html>"))
        .mount(&mock_server)
        .await;

    let collector = collector_for(&mock_server);
    let samples = collector.collect().await;

    assert_eq!(samples.len(), 3);
    assert_eq!(find(&samples, "kibana_up", &[]), Some(0.0));
}

#[tokio::test]
async fn test_timeout_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": {"overall": {"level": "green"}}}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = KibanaClient::new(&mock_server.uri(), 100, false).unwrap();
    let collector = KibanaCollector::new(Arc::new(client));
    let samples = collector.collect().await;

    assert_eq!(samples.len(), 3);
    assert_eq!(find(&samples, "kibana_scrape_success", &[]), Some(0.0));
    let duration = find(&samples, "kibana_scrape_duration_seconds", &[]).unwrap();
    assert!(duration >= 0.1 && duration < 5.0, "duration was {duration}");
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String, Option<String>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap(), content_type)
}

fn state_for(server: &MockServer) -> AppState {
    let mut config = Config::default();
    config.kibana.url = server.uri();
    AppState::from_config(config).unwrap()
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let mock_server = create_mock_kibana_server(
        200,
        json!({"status": {"overall": {"level": "red"}, "core": {"http": {"level": "available"}}}}),
    )
    .await;

    let (status, body, content_type) = get(router(state_for(&mock_server)), "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type.as_deref(),
        Some("text/plain; version=0.0.4; charset=utf-8")
    );
    assert!(body.contains("kibana_up 1"));
    assert!(body.contains("kibana_status_overall 0"));
    assert!(body.contains("kibana_status_core{name=\"http\"} 1"));
    assert!(!body.contains("kibana_status_elasticsearch"));
    for line in body.lines() {
        assert!(!line.ends_with(' '), "Line should not end with space: {}", line);
    }
}

#[tokio::test]
async fn test_ready_endpoint() {
    let mock_server = create_mock_kibana_server(200, json!({})).await;
    let (status, body, _) = get(router(state_for(&mock_server)), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "READY");

    let mock_server = create_mock_kibana_server(503, json!({"error": "not ready"})).await;
    let (status, body, _) = get(router(state_for(&mock_server)), "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.starts_with("NOT READY:"));
    assert!(body.contains("503"));
}

#[tokio::test]
async fn test_health_endpoint_does_not_call_kibana() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (status, body, _) = get(router(state_for(&mock_server)), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"status\":\"healthy\""));
}
