//! Scraped record types
//!
//! A [`Record`] is one list item from one listing page. A [`PageBatch`] is
//! everything a single page task produced, possibly nothing.

use serde::{Deserialize, Serialize};

/// One scraped listing entry
///
/// Every field is best-effort text: a selector that matches nothing yields an
/// empty string rather than an error. The serialized keys are the existing
/// artifact's, including the leading space in `" quote"`; a bare `"quote"` is
/// accepted when reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Ordinal position of the item within the listing
    #[serde(rename = "排名")]
    pub rank: String,

    /// Display name
    #[serde(rename = "电影名")]
    pub title: String,

    /// Detail page URL, absolute or relative
    #[serde(rename = "链接")]
    pub link: String,

    /// Numeric score as text
    #[serde(rename = "评分")]
    pub rating: String,

    /// Popularity count as text
    #[serde(rename = "评价人数")]
    pub evaluate_count: String,

    /// Short tagline, often empty
    #[serde(rename = " quote", alias = "quote")]
    pub quote: String,
}

impl Record {
    /// Returns true if every field is empty
    pub fn is_blank(&self) -> bool {
        self.rank.is_empty()
            && self.title.is_empty()
            && self.link.is_empty()
            && self.rating.is_empty()
            && self.evaluate_count.is_empty()
            && self.quote.is_empty()
    }
}

/// The result of one page task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBatch {
    /// Index of the page this batch came from, in launch order
    pub page_index: usize,

    /// Records in document order
    pub records: Vec<Record>,
}

impl PageBatch {
    pub fn new(page_index: usize, records: Vec<Record>) -> Self {
        Self {
            page_index,
            records,
        }
    }

    /// A batch for a page that failed to fetch or parse
    pub fn empty(page_index: usize) -> Self {
        Self::new(page_index, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
