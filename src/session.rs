//! Per-invocation search state.
//!
//! The scraper functions are stateless; everything a user action reads or
//! produces lives in a [`SearchSession`] passed to the handlers by reference.

use tracing::info;

use crate::app::{DirscoutError, Result};
use crate::domain::{find_by_name, CompanyRecord, DirectoryEntry};
use crate::matcher::{score_companies, CompanyMatcher, ScoringMode};
use crate::scraper::{DirectoryScraper, Navigator};

#[derive(Debug, Default)]
pub struct SearchSession {
    pub industries: Vec<DirectoryEntry>,
    pub countries: Vec<DirectoryEntry>,
    selected_industry: Option<DirectoryEntry>,
    selected_country: Option<DirectoryEntry>,
    pub results: Vec<CompanyRecord>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_industry(&self) -> Option<&DirectoryEntry> {
        self.selected_industry.as_ref()
    }

    pub fn selected_country(&self) -> Option<&DirectoryEntry> {
        self.selected_country.as_ref()
    }

    /// Refresh the industry list from the directory
    pub async fn load_industries<N: Navigator>(
        &mut self,
        scraper: &DirectoryScraper<N>,
    ) -> &[DirectoryEntry] {
        self.industries = scraper.get_industries().await;
        &self.industries
    }

    /// Select an industry by name, reloading countries only when the selection changes
    pub async fn select_industry<N: Navigator>(
        &mut self,
        scraper: &DirectoryScraper<N>,
        name: &str,
    ) -> Result<&[DirectoryEntry]> {
        let entry = find_by_name(&self.industries, name)
            .cloned()
            .ok_or_else(|| DirscoutError::NotFound(format!("industry {:?}", name)))?;

        let changed = self
            .selected_industry
            .as_ref()
            .map_or(true, |current| current.url != entry.url);

        if changed {
            info!("Fetching countries for {}", entry.name);
            self.countries = scraper.get_countries(&entry.url).await;
            self.selected_country = None;
            self.selected_industry = Some(entry);
        }

        Ok(&self.countries)
    }

    pub fn select_country(&mut self, name: &str) -> Result<&DirectoryEntry> {
        let entry = find_by_name(&self.countries, name)
            .cloned()
            .ok_or_else(|| DirscoutError::NotFound(format!("country {:?}", name)))?;
        Ok(self.selected_country.insert(entry))
    }

    /// Scrape the selected country's listing, replacing any earlier results
    pub async fn search<N: Navigator>(
        &mut self,
        scraper: &DirectoryScraper<N>,
        max_results: usize,
    ) -> Result<&[CompanyRecord]> {
        let country = self.selected_country.as_ref().ok_or_else(|| {
            DirscoutError::NotFound("no location selected; select both an industry and a location".into())
        })?;

        self.results = scraper.scrape(&country.url, max_results).await;
        Ok(&self.results)
    }

    /// Score the current results against `profile`
    pub async fn analyze<M: CompanyMatcher + ?Sized>(
        &mut self,
        matcher: &M,
        profile: &str,
        mode: ScoringMode,
        batch_size: usize,
        progress: impl FnMut(usize, usize),
    ) {
        score_companies(matcher, &mut self.results, profile, mode, batch_size, progress).await;
    }

    /// Discard all held state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{MatcherConfig, OpenAiMatcher};
    use crate::scraper::stub::{anchor, StubListing, StubNavigator};
    use crate::scraper::ScraperConfig;

    fn site() -> StubNavigator {
        StubNavigator::new(vec![StubListing::new()
            .with(
                ".directory-content-box-col a",
                vec![
                    anchor("Software", "/company-search/software/"),
                    anchor("Germany", "/company-search/software/germany/"),
                ],
            )
            .with(
                ".directory-content-box a",
                vec![anchor("Acme", "/company/acme"), anchor("Globex", "/company/globex")],
            )])
    }

    fn scraper(navigator: &StubNavigator) -> DirectoryScraper<StubNavigator> {
        DirectoryScraper::new(navigator.clone(), ScraperConfig::instant()).unwrap()
    }

    #[test]
    fn test_full_flow() {
        tokio_test::block_on(async {
            let navigator = site();
            let scraper = scraper(&navigator);
            let mut session = SearchSession::new();

            assert_eq!(session.load_industries(&scraper).await.len(), 2);
            session.select_industry(&scraper, "software").await.unwrap();
            session.select_country("Germany").unwrap();

            let results = session.search(&scraper, 50).await.unwrap();
            assert_eq!(results.len(), 2);
            assert_eq!(navigator.opened().len(), 3);
            assert_eq!(
                navigator.opened()[2],
                "https://www.lusha.com/company-search/software/germany/"
            );
        });
    }

    #[test]
    fn test_reselecting_same_industry_does_not_refetch() {
        tokio_test::block_on(async {
            let navigator = site();
            let scraper = scraper(&navigator);
            let mut session = SearchSession::new();

            session.load_industries(&scraper).await;
            session.select_industry(&scraper, "Software").await.unwrap();
            session.select_country("Germany").unwrap();
            session.select_industry(&scraper, "Software").await.unwrap();

            assert_eq!(navigator.opened().len(), 2);
            assert!(session.selected_country().is_some());
        });
    }

    #[test]
    fn test_unknown_names_are_errors() {
        tokio_test::block_on(async {
            let navigator = site();
            let scraper = scraper(&navigator);
            let mut session = SearchSession::new();

            session.load_industries(&scraper).await;
            assert!(session.select_industry(&scraper, "Mining").await.is_err());
            assert!(session.select_country("Atlantis").is_err());
        });
    }

    #[test]
    fn test_search_requires_country() {
        tokio_test::block_on(async {
            let navigator = site();
            let scraper = scraper(&navigator);
            let mut session = SearchSession::new();
            assert!(session.search(&scraper, 50).await.is_err());
            assert!(navigator.opened().is_empty());
        });
    }

    #[test]
    fn test_analyze_without_key_marks_missing_key() {
        tokio_test::block_on(async {
            let mut session = SearchSession::new();
            session.results = vec![CompanyRecord::new("Acme", "https://www.lusha.com/company/acme")];

            let matcher = OpenAiMatcher::new(None, &MatcherConfig::default());
            session
                .analyze(&matcher, "profile", ScoringMode::Single, 20, |_, _| {})
                .await;

            assert_eq!(session.results[0].match_score, Some(0));
            assert_eq!(session.results[0].reasoning.as_deref(), Some("API Key missing"));
        });
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut session = SearchSession::new();
        session.results = vec![CompanyRecord::new("Acme", "https://x/acme")];
        session.industries = vec![DirectoryEntry::new("Software", "https://x/company-search/s/")];
        session.clear();
        assert!(session.results.is_empty());
        assert!(session.industries.is_empty());
        assert!(session.selected_industry().is_none());
    }
}
