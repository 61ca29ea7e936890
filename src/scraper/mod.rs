//! Browser-driven scraping of the company directory.
//!
//! The directory is a three-level hierarchy of pages:
//!
//! # Architecture
//!
//! ```text
//! industries page → industry page (countries) → listing pages (companies, paginated)
//! ```
//!
//! Every public entry point opens its own browser through a [`Navigator`],
//! extracts anchors with a [`LinkExtractor`], and tears the browser down
//! before returning. Failures degrade to an empty result; use the `try_*`
//! and `*_with_outcome` variants to see the error.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dirscout::scraper::{ChromeNavigator, DirectoryScraper, ScraperConfig};
//!
//! let config = ScraperConfig::default();
//! let scraper = DirectoryScraper::new(ChromeNavigator::new(config.clone()), config)?;
//!
//! let industries = scraper.get_industries().await;
//! let countries = scraper.get_countries(&industries[0].url).await;
//! let companies = scraper.scrape(&countries[0].url, 50).await;
//! ```

mod chrome;
mod config;
mod directory;
mod extractor;
mod listing;

#[cfg(test)]
pub(crate) mod stub;

pub use chrome::{ChromeNavigator, ChromePage};
pub use config::ScraperConfig;
pub use directory::dedup_entries;
pub use extractor::{normalize_href, ExtractedLink, LinkExtractor, LinkFilter};
pub use listing::{CompanyAccumulator, ScrapeOutcome, StopReason};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::Result;

/// An element as enumerated in the live page, before any filtering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnchor {
    /// Rendered inner text
    #[serde(default)]
    pub text: String,
    /// The `href` attribute exactly as written in the markup
    #[serde(default)]
    pub href: Option<String>,
    /// Whether the element currently occupies space on screen
    #[serde(default)]
    pub visible: bool,
}

/// A loaded page in a live browser session
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Enumerate every element matching `selector`
    async fn anchors(&self, selector: &str) -> Result<Vec<RawAnchor>>;

    /// Click the element matching `selector` if it exists.
    ///
    /// Best-effort: a missing element or a failed click yields `false`, never an error.
    async fn dismiss(&self, selector: &str) -> bool;

    /// Click the first visible control whose text equals one of `labels`.
    ///
    /// Labels are tried in order. Returns `Ok(false)` when no control matches.
    async fn click_next(&self, labels: &[String]) -> Result<bool>;

    /// Release the page and its browser
    async fn close(self);
}

/// Opens pages in a fresh browser
#[async_trait]
pub trait Navigator: Send + Sync {
    type Page: BrowserPage;

    /// Load `url` and wait for it to settle
    async fn open(&self, url: &str) -> Result<Self::Page>;
}

/// Walks the directory and scrapes company listings through a [`Navigator`]
pub struct DirectoryScraper<N> {
    navigator: N,
    config: ScraperConfig,
    directory_links: LinkExtractor,
    listing_links: LinkExtractor,
}

impl<N: Navigator> DirectoryScraper<N> {
    pub fn new(navigator: N, config: ScraperConfig) -> Result<Self> {
        let origin = Url::parse(&config.origin)?;

        let directory_links = LinkExtractor::new(
            config.directory_selectors.clone(),
            LinkFilter::directory(&config),
            origin.clone(),
        );
        let listing_links = LinkExtractor::new(
            config.listing_selectors.clone(),
            LinkFilter::listing(&config),
            origin,
        );

        Ok(Self {
            navigator,
            config,
            directory_links,
            listing_links,
        })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::stub::StubNavigator;
    use super::*;

    #[test]
    fn test_new_rejects_invalid_origin() {
        let config = ScraperConfig {
            origin: "not a url".into(),
            ..ScraperConfig::instant()
        };
        assert!(DirectoryScraper::new(StubNavigator::new(vec![]), config).is_err());
    }

    #[test]
    fn test_raw_anchor_deserializes_with_missing_fields() {
        let anchor: RawAnchor = serde_json::from_str(r#"{"text": "Acme"}"#).unwrap();
        assert_eq!(anchor.text, "Acme");
        assert!(anchor.href.is_none());
        assert!(!anchor.visible);
    }
}
