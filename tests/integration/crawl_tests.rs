//! Integration tests for the scraper
//!
//! These tests use wiremock to serve listing pages and exercise the full
//! launch → fetch → aggregate → sink cycle end-to-end.

use ranklist_scraper::config::{load_config, Config};
use ranklist_scraper::crawler::{scrape, Coordinator, Extractor};
use ranklist_scraper::output::read_records;
use ranklist_scraper::{ExtractError, Record, ScrapeError};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_SIZE: usize = 25;

/// Renders a listing page with `count` items ranked from `start + 1`
fn listing_page(start: usize, count: usize) -> String {
    let items: String = (start + 1..=start + count)
        .map(|rank| {
            format!(
                r#"<li><div class="item">
                    <div class="pic"><em>{rank}</em></div>
                    <div class="info">
                        <div class="hd"><a href="https://example.com/subject/{rank}/">
                            <span class="title">Title {rank}</span>
                            <span class="title">&nbsp;/&nbsp;Alt {rank}</span>
                        </a></div>
                        <div class="bd">
                            <div class="star">
                                <span class="rating_num">8.{digit}</span>
                                <span>{votes}人评价</span>
                            </div>
                            <p class="quote"><span>Quote {rank}</span></p>
                        </div>
                    </div>
                </div></li>"#,
                rank = rank,
                digit = rank % 10,
                votes = rank * 1000,
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Top</title></head><body><ol class="grid_view">{}</ol></body></html>"#,
        items
    )
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, page_count: usize, output: &Path) -> Config {
    let mut config = Config::default();
    config.listing.url_template = format!("{}/top250?start={{start}}&filter=", base_url);
    config.listing.page_count = page_count;
    config.listing.page_size = PAGE_SIZE;
    config.fetch.user_agent = "TestScraper/1.0".to_string();
    config.fetch.timeout_secs = 1;
    config.fetch.connect_timeout_secs = 1;
    config.fetch.launch_delay_ms = 0;
    config.output.json_path = output.to_path_buf();
    config
}

async fn mount_page(server: &MockServer, page: usize, body: String) {
    Mock::given(method("GET"))
        .and(path("/top250"))
        .and(query_param("start", (page * PAGE_SIZE).to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn sorted_ranks(records: &[Record]) -> Vec<usize> {
    let mut ranks: Vec<usize> = records
        .iter()
        .map(|r| r.rank.parse().expect("rank should be numeric"))
        .collect();
    ranks.sort_unstable();
    ranks
}

#[tokio::test]
async fn test_full_scrape_nominal() {
    let mock_server = MockServer::start().await;
    for page in 0..10 {
        mount_page(&mock_server, page, listing_page(page * PAGE_SIZE, PAGE_SIZE)).await;
    }

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out").join("top.json");
    let config = create_test_config(&mock_server.uri(), 10, &output);

    let report = scrape(&config).await.expect("Scrape failed");

    assert_eq!(report.pages_launched, 10);
    assert_eq!(report.batches_received, 10);
    assert_eq!(report.empty_batches, 0);
    assert_eq!(report.records, 250);
    assert_eq!(report.persisted_to.as_deref(), Some(output.as_path()));

    let records = read_records(&output).expect("Failed to read output");
    assert_eq!(records.len(), 250);
    assert_eq!(sorted_ranks(&records), (1..=250).collect::<Vec<_>>());

    let first = records.iter().find(|r| r.rank == "1").unwrap();
    assert_eq!(first.title, "Title 1");
    assert_eq!(first.link, "https://example.com/subject/1/");
    assert_eq!(first.rating, "8.1");
    assert_eq!(first.evaluate_count, "1000人评价");
    assert_eq!(first.quote, "Quote 1");
}

#[tokio::test]
async fn test_records_within_a_page_stay_contiguous() {
    let mock_server = MockServer::start().await;
    for page in 0..3 {
        mount_page(&mock_server, page, listing_page(page * PAGE_SIZE, PAGE_SIZE)).await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), 3, &dir.path().join("top.json"));

    let harvest = Coordinator::new(&config).unwrap().run().await;
    assert_eq!(harvest.records.len(), 75);

    // Pages may arrive in any order, but each page's batch is appended whole
    for chunk in harvest.records.chunks(PAGE_SIZE) {
        let ranks: Vec<usize> = chunk.iter().map(|r| r.rank.parse().unwrap()).collect();
        let first = ranks[0];
        assert_eq!((first - 1) % PAGE_SIZE, 0);
        assert_eq!(ranks, (first..first + PAGE_SIZE).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_timed_out_page_contributes_nothing() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 0, listing_page(0, PAGE_SIZE)).await;

    // Page 1 answers after the client timeout
    Mock::given(method("GET"))
        .and(path("/top250"))
        .and(query_param("start", "25"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(25, PAGE_SIZE))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("top.json");
    let config = create_test_config(&mock_server.uri(), 2, &output);

    let report = scrape(&config).await.expect("Scrape failed");

    assert_eq!(report.batches_received, 2);
    assert_eq!(report.empty_batches, 1);
    assert_eq!(report.records, 25);

    let records = read_records(&output).unwrap();
    assert_eq!(records.len(), 25);
    assert_eq!(sorted_ranks(&records), (1..=25).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_error_status_and_missing_list_contribute_nothing() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 0, listing_page(0, PAGE_SIZE)).await;

    Mock::given(method("GET"))
        .and(path("/top250"))
        .and(query_param("start", "25"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    // A block page without the list container
    mount_page(
        &mock_server,
        2,
        "<html><body><p>Please verify you are human</p></body></html>".to_string(),
    )
    .await;

    // Page 3 is not mounted at all: the mock server answers 404
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), 4, &dir.path().join("top.json"));

    let report = scrape(&config).await.expect("Scrape failed");
    assert_eq!(report.batches_received, 4);
    assert_eq!(report.empty_batches, 3);
    assert_eq!(report.records, 25);
}

#[tokio::test]
async fn test_item_without_fields_keeps_its_slot() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        0,
        r#"<html><body><ol class="grid_view"><li><span>??</span></li><li></li></ol></body></html>"#
            .to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("top.json");
    let config = create_test_config(&mock_server.uri(), 1, &output);

    scrape(&config).await.expect("Scrape failed");

    let records = read_records(&output).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(Record::is_blank));
}

#[tokio::test]
async fn test_zero_pages_writes_empty_array() {
    let mock_server = MockServer::start().await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("top.json");
    let config = create_test_config(&mock_server.uri(), 0, &output);

    let report = scrape(&config).await.expect("Scrape failed");
    assert_eq!(report.pages_launched, 0);
    assert_eq!(report.records, 0);

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content.trim(), "[]");

    let received = mock_server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_utf8_output_path_is_written_verbatim() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 0, listing_page(0, PAGE_SIZE)).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join(OsStr::from_bytes(b"top\xff.json"));
    let config = create_test_config(&mock_server.uri(), 1, &output);

    let report = scrape(&config).await.expect("Scrape failed");
    assert_eq!(report.persisted_to.as_deref(), Some(output.as_path()));

    let records = read_records(&output).unwrap();
    assert_eq!(records.len(), PAGE_SIZE);
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/top250"))
        .and(header("user-agent", "TestScraper/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(0, PAGE_SIZE)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), 1, &dir.path().join("top.json"));

    let report = scrape(&config).await.expect("Scrape failed");
    assert_eq!(report.records, PAGE_SIZE);
}

#[tokio::test]
async fn test_sink_failure_is_surfaced() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 0, listing_page(0, PAGE_SIZE)).await;

    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let mut config = create_test_config(&mock_server.uri(), 1, &blocker.join("top.json"));

    let result = scrape(&config).await;
    assert!(matches!(result, Err(ScrapeError::Sink(_))));

    // Opting back into log-and-continue
    config.output.allow_sink_failure = true;
    let report = scrape(&config).await.expect("Sink failure should be tolerated");
    assert_eq!(report.records, PAGE_SIZE);
    assert!(report.persisted_to.is_none());
}

/// Extractor that counts calls and returns a fixed number of records
struct CountingExtractor {
    calls: AtomicUsize,
    per_page: usize,
}

impl Extractor for CountingExtractor {
    fn extract(&self, _document: &str) -> Result<Vec<Record>, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Record::default(); self.per_page])
    }
}

#[tokio::test]
async fn test_custom_extractor_is_called_once_per_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top250"))
        .respond_with(ResponseTemplate::new(200).set_body_string("anything"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), 5, &dir.path().join("top.json"));

    let extractor = Arc::new(CountingExtractor {
        calls: AtomicUsize::new(0),
        per_page: 3,
    });
    let coordinator = Coordinator::with_extractor(&config, extractor.clone()).unwrap();
    let harvest = coordinator.run().await;

    assert_eq!(extractor.calls.load(Ordering::SeqCst), 5);
    assert_eq!(harvest.records.len(), 15);
    assert_eq!(harvest.report.batches_received, 5);
}

#[tokio::test]
async fn test_scrape_from_config_file() {
    let mock_server = MockServer::start().await;
    for page in 0..2 {
        mount_page(&mock_server, page, listing_page(page * PAGE_SIZE, PAGE_SIZE)).await;
    }

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("top.json");
    let config_path = dir.path().join("scraper.toml");

    let mut file = std::fs::File::create(&config_path).unwrap();
    write!(
        file,
        r#"
[listing]
url-template = "{}/top250?start={{start}}&filter="
page-count = 2
page-size = 25

[fetch]
user-agent = "TestScraper/1.0"
timeout-secs = 2
launch-delay-ms = 10
max-in-flight = 1

[output]
json-path = "{}"
"#,
        mock_server.uri(),
        output.display()
    )
    .unwrap();
    drop(file);

    let config = load_config(&config_path).expect("Failed to load config");
    let report = scrape(&config).await.expect("Scrape failed");

    assert_eq!(report.records, 50);
    assert_eq!(read_records(&output).unwrap().len(), 50);
}
