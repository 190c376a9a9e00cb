//! Page URL construction for Ranklist-Scraper
//!
//! Each listing page is addressed by an offset: page `i` of size `P` starts
//! at item `i * P`. The configured template carries a `{start}` placeholder
//! that is replaced with that offset.

use crate::config::ListingConfig;
use crate::{UrlError, UrlResult};
use url::Url;

/// Placeholder substituted with the page offset
pub const START_PLACEHOLDER: &str = "{start}";

/// A single page task: which page, and where to fetch it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Page index in launch order, `0..page_count`
    pub index: usize,

    /// Fully-formed request URL
    pub url: Url,
}

/// Builds the request URL for the page starting at `offset`
///
/// # Arguments
///
/// * `template` - URL template containing `{start}`
/// * `offset` - Item offset of the page
///
/// # Returns
///
/// * `Ok(Url)` - The request URL
/// * `Err(UrlError)` - The template has no placeholder, does not parse, or is not HTTP(S)
///
/// # Example
///
/// ```
/// use ranklist_scraper::url::build_page_url;
///
/// let url = build_page_url("https://movie.douban.com/top250?start={start}&filter=", 50).unwrap();
/// assert_eq!(url.as_str(), "https://movie.douban.com/top250?start=50&filter=");
/// ```
pub fn build_page_url(template: &str, offset: usize) -> UrlResult<Url> {
    if !template.contains(START_PLACEHOLDER) {
        return Err(UrlError::MissingPlaceholder(template.to_string()));
    }

    let raw = template.replace(START_PLACEHOLDER, &offset.to_string());
    let url = Url::parse(&raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}

/// Builds the ordered list of page requests for a listing
///
/// Produces exactly `page_count` requests, index `i` at offset `i * page_size`.
pub fn page_requests(listing: &ListingConfig) -> UrlResult<Vec<PageRequest>> {
    (0..listing.page_count)
        .map(|index| {
            let url = build_page_url(&listing.url_template, index * listing.page_size)?;
            Ok(PageRequest { index, url })
        })
        .collect()
}
