use std::path::Path;

use crate::app::error::Result;
use crate::config::Config;
use crate::matcher::OpenAiMatcher;
use crate::scraper::{ChromeNavigator, DirectoryScraper};

pub struct AppContext {
    pub config: Config,
    pub scraper: DirectoryScraper<ChromeNavigator>,
}

impl AppContext {
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let navigator = ChromeNavigator::new(config.scraper.clone());
        let scraper = DirectoryScraper::new(navigator, config.scraper.clone())?;

        Ok(Self { config, scraper })
    }

    /// Matcher for this run; without a key every score is the missing-key sentinel
    pub fn matcher(&self, api_key: Option<&str>) -> OpenAiMatcher {
        OpenAiMatcher::new(api_key, &self.config.matcher)
    }
}
