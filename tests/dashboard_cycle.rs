//! End-to-end tests for the poll → render → banner cycle

mod common;

use common::{driver_for, renderer, ERROR_TTL};
use pulseboard::cycle::CycleDriver;
use pulseboard::dashboard::types::{UpdateType, WebSocketUpdate};
use pulseboard::poller::{Outcome, PollReport, Poller, Source};
use pulseboard::render::{DisplayKind, TableRow, TargetState, TargetView, PLACEHOLDER};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn entry(key: &str, value: &str) -> TableRow {
    TableRow::Entry {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[tokio::test]
async fn test_success_then_failure_blanks_target_and_raises_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"x": 5})))
        .mount(&server)
        .await;

    let url = format!("{}/a", server.uri());
    let driver = driver_for(vec![Source::new("a", url.clone())]);

    let summary = driver.run_cycle().await;
    assert!(summary.all_succeeded());

    let snapshot = driver.snapshot();
    assert_eq!(
        snapshot.target("a").unwrap().view,
        TargetView::Table {
            rows: vec![entry("x", "5")]
        }
    );
    assert!(snapshot.errors.is_empty());

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let summary = driver.run_cycle().await;
    assert_eq!(summary.failed, vec!["a"]);

    let snapshot = driver.snapshot();
    let target = snapshot.target("a").unwrap();
    assert_eq!(target.view, TargetView::Placeholder);
    assert_eq!(target.view.text_content(), PLACEHOLDER);

    assert_eq!(snapshot.errors.len(), 1);
    let message = &snapshot.errors[0].message;
    assert!(message.contains(&url), "{}", message);
    assert!(message.contains("HTTP 500"), "{}", message);
    assert!(snapshot.errors_visible);
}

#[tokio::test]
async fn test_staggered_sources_render_in_arrival_order() {
    let server = MockServer::start().await;
    for (route, delay_ms) in [("/one", 300), ("/three", 150), ("/four", 20)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"source": route}))
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(ResponseTemplate::new(503).set_delay(Duration::from_millis(80)))
        .mount(&server)
        .await;

    let sources = ["one", "two", "three", "four"]
        .iter()
        .map(|name| Source::new(*name, format!("{}/{}", server.uri(), name)))
        .collect();
    let (tx, mut rx) = broadcast::channel::<WebSocketUpdate>(64);
    let driver = driver_for(sources).with_broadcast(tx);

    let summary = driver.run_cycle().await;
    assert_eq!(summary.succeeded, vec!["four", "three", "one"]);
    assert_eq!(summary.failed, vec!["two"]);

    let mut rendered = Vec::new();
    while let Ok(update) = rx.try_recv() {
        if update.update_type == UpdateType::TargetRendered {
            rendered.push(update.data["key"].as_str().unwrap().to_string());
        }
    }
    assert_eq!(rendered, vec!["four", "two", "three", "one"]);

    let snapshot = driver.snapshot();
    for key in ["one", "three", "four"] {
        assert!(
            matches!(snapshot.target(key).unwrap().view, TargetView::Table { .. }),
            "{} should have rendered",
            key
        );
    }
    assert_eq!(snapshot.target("two").unwrap().view, TargetView::Placeholder);
    assert_eq!(snapshot.errors.len(), 1);
    assert!(snapshot.errors[0].message.contains("HTTP 503"));
    // Targets keep configuration order regardless of arrival order
    let keys: Vec<_> = snapshot.targets.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["one", "two", "three", "four"]);
}

#[tokio::test]
async fn test_text_target_shows_indented_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"beds": [1, 2]})))
        .mount(&server)
        .await;

    let driver = driver_for(vec![Source::new(
        "history",
        format!("{}/history", server.uri()),
    )
    .with_display(DisplayKind::Text)]);
    driver.run_cycle().await;

    let view = driver.snapshot().target("history").unwrap().view.clone();
    assert_eq!(
        view,
        TargetView::Text {
            body: "{\n  \"beds\": [\n    1,\n    2\n  ]\n}".to_string()
        }
    );
}

#[tokio::test]
async fn test_render_is_idempotent() {
    let renderer = renderer();
    renderer
        .store()
        .register("a", "A", "Endpoint: http://h/a", DisplayKind::Table);

    let outcome = Outcome::Success {
        payload: json!({"x": 5, "y": "ok"}),
    };
    assert!(renderer.render("a", &outcome));
    let first = renderer.store().get("a").unwrap();
    assert!(renderer.render("a", &outcome));
    let second = renderer.store().get("a").unwrap();

    assert_eq!(first, second);
    assert!(renderer.banner().events().is_empty());
}

#[tokio::test]
async fn test_render_unknown_target_is_ignored() {
    let renderer = renderer();
    assert!(!renderer.render("missing", &Outcome::Success { payload: json!({}) }));
    assert_eq!(renderer.store().len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_error_entry_expires_after_ttl() {
    let renderer = renderer();
    let source = Source::new("a", "http://h/a");
    renderer
        .store()
        .register("a", "a", &source.endpoint_label(), DisplayKind::Table);

    let report = PollReport {
        url: "http://h/a".to_string(),
        outcome: Outcome::Failure {
            message: "HTTP 500".to_string(),
        },
        latency_ms: 1,
    };
    let event = renderer.present(&source, &report).unwrap();
    assert_eq!(renderer.banner().events(), vec![event]);

    tokio::time::sleep(ERROR_TTL + Duration::from_millis(1)).await;
    assert!(renderer.banner().events().is_empty());
    // The target keeps its placeholder; only the banner entry expires
    assert_eq!(renderer.store().view("a"), Some(TargetView::Placeholder));
}

#[tokio::test]
async fn test_each_failing_cycle_adds_an_entry() {
    let driver = driver_for(vec![Source::new("down", "http://127.0.0.1:1/stats")]);

    driver.run_cycle().await;
    driver.run_cycle().await;

    let snapshot = driver.snapshot();
    assert_eq!(snapshot.errors.len(), 2);
    assert_ne!(snapshot.errors[0].id, snapshot.errors[1].id);
    assert!(snapshot.errors[0].id > snapshot.errors[1].id, "newest first");
}

#[tokio::test]
async fn test_driver_loop_runs_first_cycle_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"up": true})))
        .mount(&server)
        .await;

    let (tx, mut rx) = broadcast::channel::<WebSocketUpdate>(64);
    let driver = Arc::new(
        driver_for(vec![Source::new("svc", format!("{}/health", server.uri()))])
            .with_broadcast(tx),
    );

    let cancel = CancellationToken::new();
    let handle = Arc::clone(&driver).start(cancel.clone());

    // The refresh period is 3 s; the first cycle must not wait for it
    let completed = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Ok(update) = rx.recv().await {
                if update.update_type == UpdateType::CycleComplete {
                    break;
                }
            }
        }
    })
    .await;
    assert!(completed.is_ok(), "first cycle should start at once");
    assert!(driver.snapshot().last_updated.is_some());

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_overlapping_cycles_last_arrival_wins() {
    let server = MockServer::start().await;
    // First request answers slowly; every later one fails at once
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"slow": true}))
                .set_delay(Duration::from_millis(300)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (tx, mut rx) = broadcast::channel::<WebSocketUpdate>(256);
    let driver = Arc::new(
        CycleDriver::new(
            vec![Source::new("stats", format!("{}/stats", server.uri()))],
            Poller::new(None).unwrap(),
            renderer(),
            Duration::from_millis(50),
        )
        .with_broadcast(tx),
    );

    let cancel = CancellationToken::new();
    let handle = Arc::clone(&driver).start(cancel.clone());
    tokio::time::sleep(Duration::from_millis(120)).await;
    cancel.cancel();
    handle.await.unwrap();

    // Cycles already spawned keep running after the loop stops
    tokio::time::sleep(Duration::from_millis(400)).await;

    let requests = server.received_requests().await.unwrap();
    assert!(
        requests.len() >= 2,
        "a new cycle should start while the slow request is in flight, got {}",
        requests.len()
    );

    let mut rendered = Vec::new();
    while let Ok(update) = rx.try_recv() {
        if update.update_type == UpdateType::TargetRendered {
            let target: TargetState = serde_json::from_value(update.data).unwrap();
            rendered.push(target.view);
        }
    }
    assert_eq!(rendered.first(), Some(&TargetView::Placeholder));
    assert_eq!(
        rendered.last(),
        Some(&TargetView::Table {
            rows: vec![entry("slow", "true")]
        })
    );

    let snapshot = driver.snapshot();
    assert_eq!(
        snapshot.target("stats").unwrap().view,
        TargetView::Table {
            rows: vec![entry("slow", "true")]
        }
    );
    assert!(!snapshot.errors.is_empty());
}
