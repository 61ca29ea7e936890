use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the directory scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Scheme and host prefixed to root-relative links
    pub origin: String,

    /// Top-level directory page listing industries
    pub directory_url: String,

    /// Path segment every drill-down link must contain
    pub directory_path: String,

    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Page load timeout in seconds (default: 60)
    pub timeout_secs: u64,

    /// Fixed wait after navigation or pagination for client rendering, in milliseconds (default: 3000)
    pub settle_delay_ms: u64,

    /// Anchor selectors for directory pages, tried in order
    pub directory_selectors: Vec<String>,

    /// Anchor selectors for company listing pages, tried in order
    pub listing_selectors: Vec<String>,

    /// Cookie-consent accept button, clicked when present on listing pages
    pub cookie_accept_selector: Option<String>,

    /// Text of the pagination control, tried in order
    pub next_labels: Vec<String>,

    /// Link texts that are site chrome rather than companies (case-insensitive)
    pub excluded_texts: Vec<String>,

    /// Shortest acceptable link text after trimming (default: 2)
    pub min_name_len: usize,

    /// Default number of companies to collect per search (default: 50)
    pub max_results: usize,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.lusha.com".to_string(),
            directory_url: "https://www.lusha.com/company-search/".to_string(),
            directory_path: "/company-search/".to_string(),
            headless: true,
            timeout_secs: 60,
            settle_delay_ms: 3000,
            directory_selectors: vec![
                ".directory-content-box-col a".to_string(),
                "main a".to_string(),
            ],
            listing_selectors: vec![
                ".directory-content-box a".to_string(),
                "main a".to_string(),
            ],
            cookie_accept_selector: Some("button#onetrust-accept-btn-handler".to_string()),
            next_labels: vec!["Next".to_string(), ">".to_string()],
            excluded_texts: [
                "Privacy Policy",
                "Terms of Use",
                "Start for free",
                "Login",
                "Sign Up",
                "About Us",
                "Contact",
                "Lusha",
                "Twitter",
                "Facebook",
                "LinkedIn",
                "Instagram",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            min_name_len: 2,
            max_results: 50,
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

impl ScraperConfig {
    /// Get the page load timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the settle delay as a Duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Config with no settle delay, for driving the scraper against stub pages
    pub fn instant() -> Self {
        Self {
            settle_delay_ms: 0,
            ..Default::default()
        }
    }
}
