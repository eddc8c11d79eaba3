//! Integration tests for the crawler
//!
//! Controller behavior is exercised with an in-memory site graph; static
//! extraction runs end-to-end against wiremock servers.

use async_trait::async_trait;
use focus_crawl::config::{Config, RenderMode, Traversal};
use focus_crawl::crawler::{
    crawl, Coordinator, ExtractError, ExtractedRecord, Extractor, PageResult, Strategy,
};
use focus_crawl::CrawlError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE: &str = "https://site.test";

fn page_url(path: &str) -> Url {
    Url::parse(&format!("{}{}", SITE, path)).unwrap()
}

/// In-memory site: path -> (text, linked paths). Unknown paths fail.
struct SiteGraph {
    pages: HashMap<String, (Option<String>, Vec<String>)>,
    calls: Mutex<Vec<String>>,
}

impl SiteGraph {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn page(mut self, path: &str, text: Option<&str>, links: &[&str]) -> Self {
        self.pages.insert(
            page_url(path).to_string(),
            (
                text.map(str::to_string),
                links.iter().map(|l| l.to_string()).collect(),
            ),
        );
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for SiteGraph {
    async fn extract(&self, url: &Url) -> Result<PageResult, ExtractError> {
        self.calls.lock().unwrap().push(url.to_string());
        tokio::task::yield_now().await;

        match self.pages.get(url.as_str()) {
            Some((text, links)) => Ok(PageResult::new(
                text.clone(),
                links.iter().map(|l| page_url(l)).collect(),
            )),
            None => Err(ExtractError::Fetch {
                url: url.to_string(),
                reason: "HTTP 404".to_string(),
            }),
        }
    }
}

fn create_test_config(seed: &str, max_pages: usize, workers: usize) -> Config {
    let mut config = Config::default();
    config.crawler.seed_url = seed.to_string();
    config.crawler.max_pages = max_pages;
    config.crawler.workers = workers;
    config
}

/// Config seeded at the in-memory site root
fn site_config(max_pages: usize, workers: usize) -> Config {
    create_test_config(page_url("/").as_str(), max_pages, workers)
}

async fn run_graph(
    graph: Arc<SiteGraph>,
    config: Config,
) -> (Vec<ExtractedRecord>, focus_crawl::CrawlStats) {
    let coordinator = Coordinator::with_extractor(config, graph).unwrap();
    coordinator.collect().await.unwrap()
}

fn ids(records: &[ExtractedRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

#[tokio::test]
async fn test_budget_of_one_emits_single_record() {
    let graph = Arc::new(
        SiteGraph::new()
            .page("/", Some("Home"), &["/1", "/2", "/3", "/4", "/5"])
            .page("/1", Some("One"), &[])
            .page("/2", Some("Two"), &[]),
    );

    let (records, stats) = run_graph(Arc::clone(&graph), site_config(1, 1)).await;

    assert_eq!(ids(&records), vec![page_url("/").to_string()]);
    assert_eq!(stats.pages_claimed, 1);
    assert_eq!(graph.calls().len(), 1);
}

#[tokio::test]
async fn test_failed_seed_yields_no_records() {
    let graph = Arc::new(SiteGraph::new());

    let (records, stats) = run_graph(graph, site_config(20, 4)).await;

    assert!(records.is_empty());
    assert_eq!(stats.pages_claimed, 1);
    assert_eq!(stats.failed_pages, 1);
    assert_eq!(stats.records_emitted, 0);
}

#[tokio::test]
async fn test_page_without_text_still_enqueues_links() {
    let graph = Arc::new(
        SiteGraph::new()
            .page("/", None, &["/a", "/b", "/c"])
            .page("/a", Some("A"), &[])
            .page("/b", Some("B"), &[])
            .page("/c", Some("C"), &[]),
    );

    let (records, stats) = run_graph(graph, site_config(20, 1)).await;

    let emitted: HashSet<String> = ids(&records).into_iter().collect();
    let expected: HashSet<String> = ["/a", "/b", "/c"]
        .iter()
        .map(|p| page_url(p).to_string())
        .collect();
    assert_eq!(emitted, expected);
    assert_eq!(stats.pages_claimed, 4);
    assert_eq!(stats.empty_pages, 1);
}

#[tokio::test]
async fn test_shared_link_claimed_once() {
    let graph = Arc::new(
        SiteGraph::new()
            .page("/", Some("Home"), &["/a", "/b"])
            .page("/a", Some("A"), &["/shared"])
            .page("/b", Some("B"), &["/shared", "/"])
            .page("/shared", Some("Shared"), &["/a"]),
    );

    let (records, _) = run_graph(Arc::clone(&graph), site_config(20, 3)).await;

    let shared = page_url("/shared").to_string();
    assert_eq!(ids(&records).iter().filter(|id| **id == shared).count(), 1);
    assert_eq!(graph.calls().iter().filter(|c| **c == shared).count(), 1);
    assert_eq!(records.len(), 4);
}

#[tokio::test]
async fn test_depth_first_order() {
    let graph = Arc::new(
        SiteGraph::new()
            .page("/", Some("Home"), &["/a", "/b"])
            .page("/a", Some("A"), &["/a1"])
            .page("/a1", Some("A1"), &[])
            .page("/b", Some("B"), &[]),
    );

    let (records, _) = run_graph(graph, site_config(20, 1)).await;

    let expected: Vec<String> = ["/", "/a", "/a1", "/b"]
        .iter()
        .map(|p| page_url(p).to_string())
        .collect();
    assert_eq!(ids(&records), expected);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let graph = Arc::new(
        SiteGraph::new()
            .page("/", Some("Home"), &["/a", "/b"])
            .page("/a", Some("A"), &["/a1"])
            .page("/a1", Some("A1"), &[])
            .page("/b", Some("B"), &[]),
    );

    let mut config = site_config(20, 1);
    config.crawler.traversal = Traversal::BreadthFirst;
    let (records, _) = run_graph(graph, config).await;

    let expected: Vec<String> = ["/", "/a", "/b", "/a1"]
        .iter()
        .map(|p| page_url(p).to_string())
        .collect();
    assert_eq!(ids(&records), expected);
}

#[tokio::test]
async fn test_budget_and_uniqueness_hold_across_workers() {
    // Dense graph: every page links to the next ten pages.
    let mut graph = SiteGraph::new();
    let paths: Vec<String> = (0..60).map(|i| format!("/p{}", i)).collect();
    for i in 0..60 {
        let links: Vec<&str> = (1..=10)
            .map(|step| paths[(i + step) % 60].as_str())
            .collect();
        graph = graph.page(&paths[i], Some(format!("Page {}", i).as_str()), &links);
    }
    let graph = Arc::new(graph);

    for workers in [1, 4, 16] {
        let before = graph.calls().len();
        let (records, stats) = run_graph(
            Arc::clone(&graph),
            create_test_config(&page_url("/p0").to_string(), 15, workers),
        )
        .await;

        let unique: HashSet<String> = ids(&records).into_iter().collect();
        assert_eq!(unique.len(), records.len(), "repeated id with {} workers", workers);
        assert_eq!(records.len(), 15);
        assert_eq!(stats.pages_claimed, 15);
        assert_eq!(graph.calls().len() - before, 15);
    }
}

#[tokio::test]
async fn test_dropped_consumer_stops_crawl() {
    let graph = Arc::new(
        SiteGraph::new()
            .page("/", Some("Home"), &["/a"])
            .page("/a", Some("A"), &[]),
    );
    let coordinator = Coordinator::with_extractor(site_config(20, 2), graph).unwrap();

    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    let stats = coordinator.run(tx).await.unwrap();
    assert_eq!(stats.records_emitted, 0);
    assert_eq!(stats.pages_claimed, 1);
}

#[tokio::test]
async fn test_invalid_seed_fails_before_work() {
    let (tx, _rx) = mpsc::channel(1);
    let result = crawl(create_test_config("ftp://files.example.com/", 20, 1), tx).await;
    assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));

    let (tx, _rx) = mpsc::channel(1);
    let result = crawl(create_test_config("", 20, 1), tx).await;
    assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));
}

#[tokio::test]
async fn test_static_crawl_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><head><title>Home</title></head><body>
                <nav><a href="/">Home</a></nav>
                <article><h1>Welcome</h1><p>Robots are programmable machines.</p></article>
                <a href="/about">About</a>
                <a href="/missing">Missing</a>
                <a href="/logo.png">Logo</a>
                <a href="mailto:team@example.com">Mail</a>
            </body></html>"#,
            "text/html",
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><main><p>We build robots.</p></main></body></html>"#,
            "text/html",
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let mut config = create_test_config(&seed, 10, 2);
    config.fetch.timeout_secs = 5;

    let coordinator = Coordinator::new(config).unwrap();
    assert_eq!(coordinator.strategy(), Strategy::Static);

    let (records, stats) = coordinator.collect().await.unwrap();

    let by_id: HashMap<String, String> = records
        .into_iter()
        .map(|r| (r.id, r.text))
        .collect();
    assert_eq!(by_id.len(), 2);
    assert_eq!(
        by_id.get(&seed).map(String::as_str),
        Some("Welcome\nRobots are programmable machines.")
    );
    assert_eq!(
        by_id.get(&format!("{}/about", base_url)).map(String::as_str),
        Some("We build robots.")
    );
    assert_eq!(stats.pages_claimed, 3);
    assert_eq!(stats.empty_pages, 1);
}

#[tokio::test]
async fn test_static_seed_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", mock_server.uri()), 10, 2);
    let (records, stats) = Coordinator::new(config).unwrap().collect().await.unwrap();

    assert!(records.is_empty());
    assert_eq!(stats.pages_claimed, 1);
}

#[tokio::test]
async fn test_slow_seed_times_out_cleanly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    r#"<html><body><p>Too late.</p><a href="/next">Next</a></body></html>"#,
                    "text/html",
                )
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&format!("{}/", mock_server.uri()), 10, 1);
    config.fetch.timeout_secs = 1;

    let (records, stats) = Coordinator::new(config).unwrap().collect().await.unwrap();

    assert!(records.is_empty());
    assert_eq!(stats.pages_claimed, 1);
    assert_eq!(stats.empty_pages, 1);
    assert_eq!(stats.failed_pages, 0);
    assert!(stats.elapsed() < chrono::Duration::seconds(3));
}

#[tokio::test]
async fn test_render_launch_failure_ends_cleanly() {
    let mut config = create_test_config("https://www.linkedin.com/company/acme", 5, 1);
    config.crawler.render_mode = RenderMode::Always;
    config.render.chrome_executable = Some("/nonexistent/focus-crawl/chrome".to_string());
    config.render.settle_ms = 0;
    config.render.timeout_secs = 10;

    let coordinator = Coordinator::new(config).unwrap();
    assert_eq!(coordinator.strategy(), Strategy::Rendered);

    let (records, stats) = coordinator.collect().await.unwrap();
    assert!(records.is_empty());
    assert_eq!(stats.failed_pages, 1);
}
