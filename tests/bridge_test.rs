//! Bridge Tests - Scrape Path against Real Upstream Servers
//!
//! Upstreams run on `127.0.0.1:0`; the bridge talks to them through the
//! real reqwest source, and its own router is driven with `oneshot`.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::{self, Body};
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceExt; // for `oneshot`

use game_roster::adapters::http::{AppState, build_router};
use game_roster::adapters::metrics::{CounterGauges, HttpMetricsSource, bridge_router};
use game_roster::adapters::persistence::MemoryStore;
use game_roster::domain::counters::{CounterSnapshot, RequestCounters};
use game_roster::usecases::bridge::MetricsBridge;
use game_roster::usecases::roster::CharacterService;

/// What the stub upstream answers with; `None` means HTTP 500.
type Scripted = Arc<Mutex<Option<serde_json::Value>>>;

async fn stub_metrics(State(reply): State<Scripted>) -> Response {
    let reply = reply.lock().unwrap().clone();
    match reply {
        Some(body) => Json(body).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn serve(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
}

async fn spawn_stub(listener: TcpListener, reply: Scripted) {
    let router = Router::new()
        .route("/metrics", get(stub_metrics))
        .with_state(reply);
    serve(listener, router).await;
}

fn bridge_for(addr: SocketAddr) -> (Router, Arc<CounterGauges>) {
    let source = HttpMetricsSource::new(
        format!("http://{addr}/metrics"),
        Duration::from_secs(3),
    )
    .unwrap();
    let gauges = Arc::new(CounterGauges::new().unwrap());
    let bridge = MetricsBridge::new(Arc::new(source), gauges.clone());
    (bridge_router(Arc::new(bridge)), gauges)
}

async fn scrape(router: &Router) -> (StatusCode, String) {
    let resp = router
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn gauge_value(exposition: &str, name: &str) -> Option<f64> {
    exposition
        .lines()
        .filter(|l| !l.starts_with('#'))
        .find_map(|l| l.strip_prefix(name)?.strip_prefix(' ')?.parse().ok())
}

#[tokio::test]
async fn test_scrape_republishes_upstream_values() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let reply: Scripted = Arc::new(Mutex::new(Some(
        serde_json::json!({"requests_total": 7, "uptime_seconds": 12.5}),
    )));
    spawn_stub(listener, reply).await;

    let (router, _) = bridge_for(addr);
    let (status, body) = scrape(&router).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("# TYPE game_api_requests_total gauge"));
    assert_eq!(gauge_value(&body, "game_api_requests_total"), Some(7.0));
    assert_eq!(gauge_value(&body, "game_api_uptime_seconds"), Some(12.5));
}

#[tokio::test]
async fn test_unreachable_upstream_is_500_then_recovers() {
    // Reserve a port, then free it so nothing is listening there.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (router, gauges) = bridge_for(addr);

    let (status, body) = scrape(&router).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body.starts_with("failed to fetch metrics from target: request failed"),
        "{body}"
    );
    assert_eq!(gauges.values(), (0.0, 0.0));

    // Bring the upstream up on the same address; the same bridge recovers.
    let listener = TcpListener::bind(addr).await.unwrap();
    let reply: Scripted = Arc::new(Mutex::new(Some(
        serde_json::json!({"requests_total": 3, "uptime_seconds": 1.5}),
    )));
    spawn_stub(listener, reply).await;

    let (status, body) = scrape(&router).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gauge_value(&body, "game_api_requests_total"), Some(3.0));
}

#[tokio::test]
async fn test_failures_keep_last_good_values() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let reply: Scripted = Arc::new(Mutex::new(Some(
        serde_json::json!({"requests_total": 10, "uptime_seconds": 2.0}),
    )));
    spawn_stub(listener, reply.clone()).await;

    let (router, gauges) = bridge_for(addr);
    assert_eq!(scrape(&router).await.0, StatusCode::OK);

    // Non-success status.
    *reply.lock().unwrap() = None;
    let (status, body) = scrape(&router).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        "failed to fetch metrics from target: bad status code: 500"
    );
    assert_eq!(gauges.values(), (10.0, 2.0));

    // Wrong payload shape.
    *reply.lock().unwrap() = Some(serde_json::json!({"uptime": "long"}));
    let (status, body) = scrape(&router).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("failed to decode counters"), "{body}");
    assert_eq!(gauges.values(), (10.0, 2.0));

    *reply.lock().unwrap() = Some(serde_json::json!({"requests_total": 11, "uptime_seconds": 4.0}));
    let (status, body) = scrape(&router).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gauge_value(&body, "game_api_uptime_seconds"), Some(4.0));
}

#[tokio::test]
async fn test_bridge_against_game_api() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let roster = Arc::new(CharacterService::new(Arc::new(MemoryStore::new())));
    let state = AppState::new(roster, Arc::new(RequestCounters::new()));
    serve(listener, build_router(state)).await;

    let client = reqwest::Client::new();
    for _ in 0..3 {
        let resp = client
            .get(format!("http://{addr}/health"))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
    }

    let (router, _) = bridge_for(addr);
    let (status, body) = scrape(&router).await;
    assert_eq!(status, StatusCode::OK);
    // Three health checks plus the bridge's own fetch.
    assert_eq!(gauge_value(&body, "game_api_requests_total"), Some(4.0));
    assert!(gauge_value(&body, "game_api_uptime_seconds").unwrap() >= 0.0);

    let (_, body) = scrape(&router).await;
    assert_eq!(gauge_value(&body, "game_api_requests_total"), Some(5.0));
}

#[test]
fn test_snapshot_decodes_with_extra_fields() {
    let snap: CounterSnapshot = serde_json::from_str(
        r#"{"uptime_seconds": 1.25, "requests_total": 2, "version": "x"}"#,
    )
    .unwrap();
    assert_eq!(snap.requests_total, 2);
    assert!((snap.uptime_seconds - 1.25).abs() < f64::EPSILON);
}
