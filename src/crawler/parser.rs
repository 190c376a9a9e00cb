//! Listing page extraction
//!
//! This module turns a raw listing document into [`Record`]s. The fetcher only
//! sees the [`Extractor`] trait, so tests and alternative sites can plug in
//! their own implementation.

use crate::config::SelectorConfig;
use crate::record::Record;
use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};

/// Turns a fetched document into records
///
/// Called synchronously from page tasks, so implementations must be
/// shareable across threads.
pub trait Extractor: Send + Sync {
    fn extract(&self, document: &str) -> Result<Vec<Record>, ExtractError>;
}

/// Selector-driven extractor
///
/// Row presence is decided by item existence alone: an item whose field
/// selectors all miss still produces a record, with every field empty.
#[derive(Debug)]
pub struct SelectorExtractor {
    container_source: String,
    container: Selector,
    item: Selector,
    rank: Selector,
    title: Selector,
    link: Selector,
    rating: Selector,
    evaluate_count: Selector,
    quote: Selector,
}

impl SelectorExtractor {
    /// Compiles every selector in the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SelectorExtractor)` - All selectors compiled
    /// * `Err(ExtractError::InvalidSelector)` - The first selector that failed to compile
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            container_source: config.container.clone(),
            container: compile(&config.container)?,
            item: compile(&config.item)?,
            rank: compile(&config.rank)?,
            title: compile(&config.title)?,
            link: compile(&config.link)?,
            rating: compile(&config.rating)?,
            evaluate_count: compile(&config.evaluate_count)?,
            quote: compile(&config.quote)?,
        })
    }

    fn extract_item(&self, item: ElementRef<'_>) -> Record {
        Record {
            rank: all_text(item, &self.rank),
            title: first_text(item, &self.title).trim().to_string(),
            link: first_attr(item, &self.link, "href"),
            rating: all_text(item, &self.rating),
            evaluate_count: all_text(item, &self.evaluate_count),
            quote: all_text(item, &self.quote).trim().to_string(),
        }
    }
}

impl Extractor for SelectorExtractor {
    fn extract(&self, document: &str) -> Result<Vec<Record>, ExtractError> {
        let document = Html::parse_document(document);

        let containers: Vec<ElementRef<'_>> = document.select(&self.container).collect();
        if containers.is_empty() {
            return Err(ExtractError::MissingContainer(self.container_source.clone()));
        }

        Ok(containers
            .into_iter()
            .flat_map(|container| container.select(&self.item))
            .map(|item| self.extract_item(item))
            .collect())
    }
}

fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Concatenated text of every match
fn all_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope.select(selector).flat_map(|el| el.text()).collect()
}

/// Text of the first match only
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect())
        .unwrap_or_default()
}

fn first_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> String {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .unwrap_or_default()
        .to_string()
}
