//! End-to-end engine scenarios, run against a real (mocked) HTTP server or
//! a real temp-dir filesystem tree through the full
//! `linkchecker_config::Options -> linkchecker_engine::run` path, the same
//! surface the `linkchecker` binary drives.

use std::time::Duration;

use linkchecker_config::Options;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::cli_with_seeds;

/// A valid page linking to a broken one.
#[tokio::test]
async fn broken_child_link_is_reported_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="b">b</a>"#).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET")).and(path("/b")).respond_with(ResponseTemplate::new(404)).mount(&server).await;

    let seed = format!("{}/a", server.uri());
    let options = Options::resolve(cli_with_seeds(&[&seed])).unwrap();
    let outcome = linkchecker_engine::run(options).await.unwrap();

    assert_eq!(outcome.summary.checked, 2);
    assert_eq!(outcome.summary.valid, 1);
    assert_eq!(outcome.summary.invalid, 1);
    assert!(!outcome.interrupted);
}

/// A two-hop redirect loop collapses to a single invalid entry.
#[tokio::test]
async fn redirect_loop_yields_exactly_one_invalid_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .and(query_param("x", "1"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop?x=1"))
        .mount(&server)
        .await;

    let seed = format!("{}/loop", server.uri());
    let options = Options::resolve(cli_with_seeds(&[&seed])).unwrap();
    let outcome = linkchecker_engine::run(options).await.unwrap();

    assert_eq!(outcome.summary.checked, 1);
    assert_eq!(outcome.summary.invalid, 1);
}

/// `file://` recursion finds one valid page and one missing child.
#[tokio::test]
async fn file_recursion_reports_a_missing_child() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("a.html");
    std::fs::write(&entry, r#"<a href="missing.html">missing</a>"#).unwrap();

    let seed = format!("file://{}", entry.display());
    let options = Options::resolve(cli_with_seeds(&[&seed])).unwrap();
    let outcome = linkchecker_engine::run(options).await.unwrap();

    assert_eq!(outcome.summary.checked, 2);
    assert_eq!(outcome.summary.valid, 1);
    assert_eq!(outcome.summary.invalid, 1);
}

/// Two seeds that normalize to the same canonical URL share one fetch and
/// one cache entry: at most one network fetch per canonical key.
#[tokio::test]
async fn equivalent_seeds_share_a_single_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>").insert_header("content-type", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let lower = format!("{}/", server.uri());
    let upper = lower.replacen("http://", "HTTP://", 1);

    let options = Options::resolve(cli_with_seeds(&[&upper, &lower])).unwrap();
    let outcome = linkchecker_engine::run(options).await.unwrap();

    assert_eq!(outcome.summary.checked, 2);
    assert_eq!(outcome.summary.valid, 2);
    assert_eq!(outcome.summary.cached, 1);

    server.verify().await;
}

/// A robots.txt disallow rule blocks the fetch entirely — the engine
/// never requests the disallowed path.
#[tokio::test]
async fn robots_denied_path_is_never_fetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private/\n").insert_header("content-type", "text/plain"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let seed = format!("{}/private/page", server.uri());
    let options = Options::resolve(cli_with_seeds(&[&seed])).unwrap();
    let outcome = linkchecker_engine::run(options).await.unwrap();

    assert_eq!(outcome.summary.checked, 1);
    assert_eq!(outcome.summary.invalid, 1);

    server.verify().await;
}

/// Scaled down from 100 URLs/10 workers to keep the test fast: five URLs
/// on one host, `wait=1s`, five workers. Per-host serialization means the
/// four gaps between five sequential fetches still dominate wall-clock
/// even though all five workers are free immediately.
#[tokio::test]
async fn per_host_politeness_serializes_fetches_under_concurrency() {
    let server = MockServer::start().await;
    for n in 0..5 {
        Mock::given(method("GET"))
            .and(path(format!("/{n}")))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
    }

    let seeds: Vec<String> = (0..5).map(|n| format!("{}/{n}", server.uri())).collect();
    let seed_refs: Vec<&str> = seeds.iter().map(String::as_str).collect();
    let mut cli = cli_with_seeds(&seed_refs);
    cli.threads = Some(5);
    let mut options = Options::resolve(cli).unwrap();
    options.wait_secs = 1;

    let started = std::time::Instant::now();
    let outcome = linkchecker_engine::run(options).await.unwrap();

    assert_eq!(outcome.summary.checked, 5);
    assert!(started.elapsed() >= Duration::from_millis(3900), "expected >=4 politeness gaps of ~1s each");
}
