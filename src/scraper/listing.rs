use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::app::Result;
use crate::domain::CompanyRecord;
use crate::scraper::{BrowserPage, DirectoryScraper, ExtractedLink, Navigator};

/// Why a paginated scrape stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of companies was collected
    CapReached,
    /// A page yielded no company that was not already collected
    Exhausted,
    /// No pagination control was found
    NoNextControl,
    /// Extraction or pagination failed part-way; earlier pages are kept
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub records: Vec<CompanyRecord>,
    pub pages: usize,
    pub stop: StopReason,
}

/// Companies collected across pages, unique by URL and capped in size
#[derive(Debug)]
pub struct CompanyAccumulator {
    records: Vec<CompanyRecord>,
    seen: HashSet<String>,
    cap: usize,
}

impl CompanyAccumulator {
    pub fn new(cap: usize) -> Self {
        Self {
            records: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    /// Add one page of links, returning how many were new
    pub fn offer_page(&mut self, links: Vec<ExtractedLink>) -> usize {
        let mut added = 0;
        for link in links {
            if self.is_full() {
                break;
            }
            if !self.seen.insert(link.href.clone()) {
                continue;
            }
            self.records.push(CompanyRecord::new(link.name, link.href));
            added += 1;
        }
        added
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.cap
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<CompanyRecord> {
        self.records
    }
}

impl<N: Navigator> DirectoryScraper<N> {
    /// Scrape up to `max_results` companies starting from a listing page.
    ///
    /// A failure before the first page loads yields an empty list.
    pub async fn scrape(&self, listing_url: &str, max_results: usize) -> Vec<CompanyRecord> {
        match self.scrape_with_outcome(listing_url, max_results).await {
            Ok(outcome) => outcome.records,
            Err(e) => {
                warn!("Error scraping companies from {}: {}", listing_url, e);
                Vec::new()
            }
        }
    }

    pub async fn scrape_with_outcome(
        &self,
        listing_url: &str,
        max_results: usize,
    ) -> Result<ScrapeOutcome> {
        info!("Scraping companies from {}", listing_url);

        let page = self.navigator.open(listing_url).await?;

        // Best-effort: a missing or unclickable banner is not an error.
        if let Some(ref selector) = self.config.cookie_accept_selector {
            if page.dismiss(selector).await {
                debug!("Dismissed cookie banner");
            }
        }

        let outcome = self.paginate(&page, max_results).await;
        page.close().await;

        info!(
            "Collected {} companies over {} pages ({:?})",
            outcome.records.len(),
            outcome.pages,
            outcome.stop
        );
        Ok(outcome)
    }

    async fn paginate<P: BrowserPage>(&self, page: &P, max_results: usize) -> ScrapeOutcome {
        let mut acc = CompanyAccumulator::new(max_results);
        let mut pages = 0;

        let stop = loop {
            pages += 1;

            let links = match self.listing_links.extract(page).await {
                Ok(links) => links,
                Err(e) => break StopReason::Failed(e.to_string()),
            };
            let added = acc.offer_page(links);
            debug!("Page {}: {} new companies, {} total", pages, added, acc.len());

            if acc.is_full() {
                break StopReason::CapReached;
            }
            if added == 0 {
                break StopReason::Exhausted;
            }

            match page.click_next(&self.config.next_labels).await {
                Ok(true) => {}
                Ok(false) => break StopReason::NoNextControl,
                Err(e) => break StopReason::Failed(e.to_string()),
            }
            tokio::time::sleep(self.config.settle_delay()).await;
        };

        if let StopReason::Failed(ref message) = stop {
            warn!(
                "Scrape stopped on page {} after an error, keeping {} companies: {}",
                pages,
                acc.len(),
                message
            );
        }

        ScrapeOutcome {
            records: acc.into_records(),
            pages,
            stop,
        }
    }
}
