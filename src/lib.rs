//! # dirscout
//!
//! Browse a public company directory with a headless browser, score the
//! companies found against a free-text profile, and export the results.
//!
//! ## Architecture
//!
//! ```text
//! industries → countries → paginated listing → (AI scoring) → export
//! ```
//!
//! - [`scraper`]: Headless Chrome navigation, link extraction and pagination
//! - [`matcher`]: Chat-model scoring of companies against a profile
//! - [`export`]: Spreadsheet, CSV and JSON output
//! - [`session`]: State held across the steps of one search
//!
//! ## Quick Start
//!
//! ```bash
//! # List industries
//! dirscout industries
//!
//! # List locations for one industry
//! dirscout countries "Computer Software"
//!
//! # Scrape, score and export
//! OPENAI_API_KEY=sk-... dirscout search --industry "Computer Software" \
//!     --country "Germany" --profile resume.txt --max 100
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config,
/// the directory scraper and the matcher.
pub mod app;

/// Command-line interface using clap.
///
/// - `industries` - List industries
/// - `countries <industry>` - List locations for an industry
/// - `scrape <url>` - Scrape one listing page and its successors
/// - `search` - Full walk, scrape, score and export
pub mod cli;

/// Configuration loaded from `~/.config/dirscout/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`DirectoryEntry`](domain::DirectoryEntry): An industry or country link
/// - [`CompanyRecord`](domain::CompanyRecord): A scraped company, optionally scored
/// - [`ScoringResult`](domain::ScoringResult): A model's fit score and reasoning
pub mod domain;

/// Writing results to `.xlsx`, `.csv` or `.json`.
pub mod export;

/// AI profile matching.
///
/// - [`CompanyMatcher`](matcher::CompanyMatcher): Async trait for scoring
/// - [`OpenAiMatcher`](matcher::OpenAiMatcher): async-openai implementation
pub mod matcher;

/// Directory scraping through headless Chrome via chromiumoxide.
///
/// - [`DirectoryScraper`](scraper::DirectoryScraper): Walkers and paginated scraper
/// - [`ChromeNavigator`](scraper::ChromeNavigator): One fresh browser per call
/// - [`Navigator`](scraper::Navigator) / [`BrowserPage`](scraper::BrowserPage): Browser seams
pub mod scraper;

/// Search state passed through user actions.
pub mod session;
