//! Fetch client protocol: interstitial retry, reset discipline, serialization.

mod common;

use common::{client, test_config, title_url, StubSession, BASE};
use imdb_extract::config::DEFAULT_INTERSTITIAL_MARKER;
use imdb_extract::{FetchClient, ScrapeError, View};

fn interstitial() -> String {
    format!("<html><body><noscript>{DEFAULT_INTERSTITIAL_MARKER}</noscript></body></html>")
}

#[tokio::test]
async fn test_plain_page_is_read_once() {
    let url = title_url("0095016", "");
    let (client, log) = client(StubSession::new().page(&url, "<html>ok</html>"));

    let html = client.fetch("0095016", View::Main).await.unwrap();

    assert_eq!(html, "<html>ok</html>");
    let log = log.lock().unwrap();
    assert_eq!(log.navigations, vec![url]);
    assert_eq!(log.reads, 1);
    assert_eq!(log.resets, 1);
    assert!(log.user_agents[0].contains("Chrome/142"));
}

#[tokio::test]
async fn test_interstitial_triggers_exactly_one_retry() {
    let url = title_url("0095016", "combined");
    let blocked = interstitial();
    let (client, log) = client(
        StubSession::new().pages(&url, &[&blocked, "<html>rendered</html>"]),
    );

    let html = client.fetch("0095016", View::Combined).await.unwrap();

    assert_eq!(html, "<html>rendered</html>");
    let log = log.lock().unwrap();
    assert_eq!(log.navigations.len(), 1);
    assert_eq!(log.reads, 2);
}

#[tokio::test]
async fn test_persistent_interstitial_is_returned_as_content() {
    let url = title_url("0095016", "combined");
    let blocked = interstitial();
    let (client, log) = client(StubSession::new().pages(&url, &[&blocked, &blocked, "never"]));

    let html = client.fetch("0095016", View::Combined).await.unwrap();

    assert_eq!(html, blocked);
    assert_eq!(log.lock().unwrap().reads, 2);
}

#[tokio::test]
async fn test_navigation_failure_propagates_and_still_resets() {
    let (client, log) = client(StubSession::new());

    let err = client.fetch("0000001", View::Locations).await.unwrap_err();

    match err {
        ScrapeError::Fetch { url, message } => {
            assert_eq!(url, title_url("0000001", "locations"));
            assert!(message.contains("ERR_NAME_NOT_RESOLVED"));
        }
        other => panic!("unexpected error: {other}"),
    }
    let log = log.lock().unwrap();
    assert_eq!(log.reads, 0);
    assert_eq!(log.resets, 1);
}

#[tokio::test]
async fn test_concurrent_fetches_never_overlap() {
    let urls: Vec<String> = (1..=4).map(|i| title_url(&format!("000000{i}"), "")).collect();
    let mut session = StubSession::new();
    for url in &urls {
        session = session.page(url, "<html></html>");
    }
    let log = session.log();
    let config = imdb_extract::ScraperConfig {
        settle_delay_ms: 10,
        ..test_config()
    };
    let client = FetchClient::new(session, config);

    let fetches = (1..=4).map(|i| {
        let client = client.clone();
        async move { client.fetch(&format!("000000{i}"), View::Main).await }
    });
    let results = futures::future::join_all(fetches).await;

    assert!(results.iter().all(|r| r.is_ok()));
    let log = log.lock().unwrap();
    assert_eq!(log.navigations.len(), 4);
    assert_eq!(log.max_open_tabs, 1);
    assert_eq!(log.resets, 4);
}

#[test]
fn test_url_templates() {
    let (client, _) = client(StubSession::new());
    assert_eq!(
        client.title_url("0095016", View::ReleaseInfo),
        format!("{BASE}/title/tt0095016/releaseinfo")
    );
    assert_eq!(client.endpoint_url("/chart/top"), format!("{BASE}/chart/top"));
}
