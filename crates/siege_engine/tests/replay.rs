use std::sync::Once;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use siege_core::{Record, RunConfig, Summary};
use siege_engine::replay;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(siege_logging::initialize_for_tests);
}

fn ok(timestamp: f64, path: &str) -> Result<Record, String> {
    Ok(Record::new(timestamp, path))
}

/// Runs the blocking replay loop off the test runtime so the mock server
/// keeps getting polled.
async fn run(records: Vec<Result<Record, String>>, config: RunConfig) -> Summary {
    tokio::task::spawn_blocking(move || replay(records, &config))
        .await
        .expect("replay thread")
        .expect("replay run")
}

async fn start_target() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(400))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn every_dispatched_url_is_accounted_for() {
    init_logging();
    let server = start_target().await;
    let config = RunConfig {
        concurrency: 4,
        flood: true,
        request_timeout: Duration::from_millis(100),
        ..RunConfig::new(server.uri())
    };

    let base = 1_300_000_000.0;
    let records = vec![
        ok(base, "/users/view"),
        ok(base + 1.0, "/index"),
        ok(base + 2.0, "/missing"),
        ok(base + 3.0, "/users/view"),
        ok(base + 4.0, "/slow"),
    ];

    let summary = run(records.clone(), config.clone()).await;

    assert_eq!(summary.total(), 5);
    assert_eq!(summary.success(), 3);
    assert_eq!(summary.http_error(404), 1);
    assert_eq!(summary.timeouts(), 1);
    assert_eq!(summary.network_errors(), 0);

    // The same input replayed again lands on the same tally.
    let again = run(records, config).await;
    assert_eq!(summary, again);
}

#[tokio::test]
async fn malformed_records_are_skipped_not_counted() {
    init_logging();
    let server = start_target().await;
    let config = RunConfig {
        concurrency: 2,
        flood: true,
        ..RunConfig::new(server.uri())
    };

    let base = 1_300_000_000.0;
    let records: Vec<Result<Record, String>> = (1..=10)
        .map(|line| {
            if line == 3 {
                Err(format!("line {line}: could not parse data"))
            } else {
                ok(base + line as f64, "/index")
            }
        })
        .collect();

    let summary = run(records, config).await;

    assert_eq!(summary.total(), 9);
    assert_eq!(summary.success(), 9);
}

#[tokio::test]
async fn zero_records_terminate_immediately() {
    init_logging();
    let config = RunConfig {
        concurrency: 4,
        ..RunConfig::new("http://127.0.0.1:9")
    };

    let summary = run(Vec::new(), config).await;

    assert_eq!(summary.total(), 0);
    assert_eq!(summary, Summary::new());
}

#[tokio::test]
async fn flood_mode_outruns_the_recorded_timeline() {
    init_logging();
    let server = start_target().await;
    let config = RunConfig {
        concurrency: 4,
        flood: true,
        ..RunConfig::new(server.uri())
    };

    // An hour of recorded spacing between consecutive requests.
    let base = 1_300_000_000.0;
    let records = (0..3).map(|k| ok(base + f64::from(k) * 3_600.0, "/index")).collect();

    let started = Instant::now();
    let summary = run(records, config).await;

    assert_eq!(summary.total(), 3);
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "flood run took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn pacing_reproduces_recorded_gaps() {
    init_logging();
    let server = start_target().await;
    let config = RunConfig {
        concurrency: 4,
        flood: false,
        ..RunConfig::new(server.uri())
    };

    let base = 1_300_000_000.0;
    let gap = 0.2;
    let records = (0..3).map(|k| ok(base + f64::from(k) * gap, "/index")).collect();

    let started = Instant::now();
    let summary = run(records, config).await;

    assert_eq!(summary.total(), 3);
    // Two recorded gaps lie between the first and third dispatch; the
    // producer may fall behind but never runs ahead of them.
    assert!(
        started.elapsed() >= Duration::from_secs_f64(2.0 * gap),
        "paced run finished in {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn worker_count_bounds_requests_in_flight() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/held"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_string("held"),
        )
        .mount(&server)
        .await;

    let base = 1_300_000_000.0;
    let records: Vec<Result<Record, String>> =
        (0..4).map(|_| ok(base, "/held")).collect();

    // One worker serializes the four held requests.
    let config = RunConfig {
        concurrency: 1,
        flood: true,
        ..RunConfig::new(server.uri())
    };
    let started = Instant::now();
    let summary = run(records.clone(), config).await;
    assert_eq!(summary.total(), 4);
    assert!(
        started.elapsed() >= Duration::from_millis(1_200),
        "single worker overlapped fetches: {:?}",
        started.elapsed()
    );

    // Four workers run them together.
    let config = RunConfig {
        concurrency: 4,
        flood: true,
        ..RunConfig::new(server.uri())
    };
    let started = Instant::now();
    let summary = run(records, config).await;
    assert_eq!(summary.total(), 4);
    assert!(
        started.elapsed() < Duration::from_millis(1_200),
        "four workers did not overlap fetches: {:?}",
        started.elapsed()
    );
}
