use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Ranklist-Scraper
///
/// Every section is optional; `Config::default()` reproduces the built-in
/// Douban Top 250 profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which pages to fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Request URL template; `{start}` is replaced by the page offset
    #[serde(rename = "url-template")]
    pub url_template: String,

    /// Number of pages to fetch
    #[serde(rename = "page-count")]
    pub page_count: usize,

    /// Items per page, used to compute offsets
    #[serde(rename = "page-size")]
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            url_template: "https://movie.douban.com/top250?start={start}&filter=".to_string(),
            page_count: 10,
            page_size: 25,
        }
    }
}

/// HTTP and launch cadence configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Pause between launching consecutive page tasks (milliseconds)
    #[serde(rename = "launch-delay-ms")]
    pub launch_delay_ms: u64,

    /// Maximum number of page requests in flight at once
    #[serde(rename = "max-in-flight")]
    pub max_in_flight: u32,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn launch_delay(&self) -> Duration {
        Duration::from_millis(self.launch_delay_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
            launch_delay_ms: 300,
            max_in_flight: 10,
        }
    }
}

/// CSS selectors used to pull records out of a listing page
///
/// `container` locates the list; `item` is matched inside it. The remaining
/// selectors are matched inside each item.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub container: String,
    pub item: String,
    pub rank: String,
    pub title: String,
    pub link: String,
    pub rating: String,
    #[serde(rename = "evaluate-count")]
    pub evaluate_count: String,
    pub quote: String,
}

impl SelectorConfig {
    /// All selectors paired with their config key, for validation and diagnostics
    pub fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("container", &self.container),
            ("item", &self.item),
            ("rank", &self.rank),
            ("title", &self.title),
            ("link", &self.link),
            ("rating", &self.rating),
            ("evaluate-count", &self.evaluate_count),
            ("quote", &self.quote),
        ]
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            container: "ol.grid_view".to_string(),
            item: "li".to_string(),
            rank: "div.pic em".to_string(),
            title: "div.info span.title".to_string(),
            link: "div.info a".to_string(),
            rating: "div.star span.rating_num".to_string(),
            evaluate_count: "div.star span:last-child".to_string(),
            quote: "p.quote span".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON artifact
    #[serde(rename = "json-path")]
    pub json_path: PathBuf,

    /// Report a failed write but still exit successfully
    #[serde(rename = "allow-sink-failure")]
    pub allow_sink_failure: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: PathBuf::from("out/douban_top250.json"),
            allow_sink_failure: false,
        }
    }
}
