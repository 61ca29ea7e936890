use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::Handler;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::{DirscoutError, Result};
use crate::scraper::config::ScraperConfig;
use crate::scraper::extractor::{anchor_script, next_control_script};
use crate::scraper::{BrowserPage, Navigator, RawAnchor};

/// Launches a fresh headless Chrome for every page it opens
#[derive(Debug, Clone)]
pub struct ChromeNavigator {
    config: ScraperConfig,
}

impl ChromeNavigator {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    async fn launch(&self) -> Result<(Browser, JoinHandle<()>)> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .request_timeout(self.config.timeout());

        if !self.config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| DirscoutError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, handler) = Browser::launch(browser_config).await.map_err(|e| {
            DirscoutError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        Ok((browser, spawn_handler(handler)))
    }

    async fn load(&self, browser: &Browser, url: &str) -> Result<Page> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DirscoutError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = self.config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| DirscoutError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        match tokio::time::timeout(self.config.timeout(), page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(DirscoutError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(DirscoutError::Timeout {
                    url: url.to_string(),
                    secs: self.config.timeout_secs,
                })
            }
        }

        // Client-side rendering fills the directory in after load
        tokio::time::sleep(self.config.settle_delay()).await;

        Ok(page)
    }
}

fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(_event) = handler.next().await {}
    })
}

async fn shutdown(mut browser: Browser, handler: JoinHandle<()>) {
    if let Err(e) = browser.close().await {
        debug!("Browser close failed: {}", e);
    }
    let _ = browser.wait().await;
    handler.abort();
}

#[async_trait]
impl Navigator for ChromeNavigator {
    type Page = ChromePage;

    async fn open(&self, url: &str) -> Result<ChromePage> {
        debug!("Opening {}", url);
        let (browser, handler) = self.launch().await?;

        match self.load(&browser, url).await {
            Ok(page) => Ok(ChromePage {
                browser,
                page,
                handler,
            }),
            Err(e) => {
                shutdown(browser, handler).await;
                Err(e)
            }
        }
    }
}

/// A loaded page that owns its browser process
pub struct ChromePage {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

#[async_trait]
impl BrowserPage for ChromePage {
    async fn anchors(&self, selector: &str) -> Result<Vec<RawAnchor>> {
        self.page
            .evaluate(anchor_script(selector))
            .await
            .map_err(|e| DirscoutError::Browser(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| DirscoutError::Browser(format!("Failed to parse anchors: {:?}", e)))
    }

    async fn dismiss(&self, selector: &str) -> bool {
        match self.page.find_element(selector).await {
            Ok(element) => element.click().await.is_ok(),
            Err(_) => false,
        }
    }

    async fn click_next(&self, labels: &[String]) -> Result<bool> {
        self.page
            .evaluate(next_control_script(labels))
            .await
            .map_err(|e| DirscoutError::Browser(format!("Pagination click failed: {}", e)))?
            .into_value()
            .map_err(|e| DirscoutError::Browser(format!("Failed to parse click result: {:?}", e)))
    }

    async fn close(self) {
        let ChromePage {
            browser,
            page,
            handler,
        } = self;
        if let Err(e) = page.close().await {
            debug!("Page close failed: {}", e);
        }
        shutdown(browser, handler).await;
    }
}
