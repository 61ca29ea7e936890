use std::collections::HashSet;

use tracing::{info, warn};

use crate::app::Result;
use crate::domain::DirectoryEntry;
use crate::scraper::{BrowserPage, DirectoryScraper, Navigator};

impl<N: Navigator> DirectoryScraper<N> {
    /// List the industries on the top-level directory page.
    ///
    /// Any navigation or extraction failure yields an empty list.
    pub async fn get_industries(&self) -> Vec<DirectoryEntry> {
        let url = self.config.directory_url.clone();
        match self.try_walk(&url).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error fetching industries: {}", e);
                Vec::new()
            }
        }
    }

    /// List the countries linked from an industry page.
    ///
    /// Any navigation or extraction failure yields an empty list.
    pub async fn get_countries(&self, industry_url: &str) -> Vec<DirectoryEntry> {
        match self.try_walk(industry_url).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error fetching countries from {}: {}", industry_url, e);
                Vec::new()
            }
        }
    }

    /// Collect the drill-down links of one directory page
    pub async fn try_walk(&self, url: &str) -> Result<Vec<DirectoryEntry>> {
        info!("Walking directory page {}", url);

        let page = self.navigator.open(url).await?;
        let links = self.directory_links.extract(&page).await;
        page.close().await;

        let entries = dedup_entries(
            links?
                .into_iter()
                .map(|link| DirectoryEntry::new(link.name, link.href)),
        );
        info!("Found {} directory entries at {}", entries.len(), url);
        Ok(entries)
    }
}

/// Drop repeated (name, url) pairs, keeping first-seen order
pub fn dedup_entries(entries: impl IntoIterator<Item = DirectoryEntry>) -> Vec<DirectoryEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}
