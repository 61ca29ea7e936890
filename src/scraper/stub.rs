//! In-memory stand-ins for the browser, used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::app::{DirscoutError, Result};
use crate::scraper::{BrowserPage, Navigator, RawAnchor};

pub fn anchor(text: &str, href: &str) -> RawAnchor {
    RawAnchor {
        text: text.to_string(),
        href: Some(href.to_string()),
        visible: true,
    }
}

pub fn hidden_anchor(text: &str, href: &str) -> RawAnchor {
    RawAnchor {
        visible: false,
        ..anchor(text, href)
    }
}

/// One simulated page state
#[derive(Debug, Clone, Default)]
pub struct StubListing {
    by_selector: HashMap<String, Vec<RawAnchor>>,
    has_next: bool,
    fail_click: bool,
    fail_extract: bool,
    has_banner: bool,
}

impl StubListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, selector: &str, anchors: Vec<RawAnchor>) -> Self {
        self.by_selector.insert(selector.to_string(), anchors);
        self
    }

    pub fn with_next(mut self) -> Self {
        self.has_next = true;
        self
    }

    pub fn failing_click(mut self) -> Self {
        self.has_next = true;
        self.fail_click = true;
        self
    }

    pub fn failing_extract(mut self) -> Self {
        self.fail_extract = true;
        self
    }

    pub fn with_banner(mut self) -> Self {
        self.has_banner = true;
        self
    }
}

/// Records what the scraper did to the stub browser
#[derive(Debug, Default)]
pub struct StubLog {
    pub opened: Vec<String>,
    pub dismissed: Vec<String>,
    pub clicks: usize,
    pub closed: usize,
}

#[derive(Clone)]
pub struct StubNavigator {
    pages: Arc<Vec<StubListing>>,
    fail_open: bool,
    pub log: Arc<Mutex<StubLog>>,
}

impl StubNavigator {
    pub fn new(pages: Vec<StubListing>) -> Self {
        Self {
            pages: Arc::new(pages),
            fail_open: false,
            log: Arc::new(Mutex::new(StubLog::default())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::new(vec![])
        }
    }

    pub fn clicks(&self) -> usize {
        self.log.lock().unwrap().clicks
    }

    pub fn closed(&self) -> usize {
        self.log.lock().unwrap().closed
    }

    pub fn opened(&self) -> Vec<String> {
        self.log.lock().unwrap().opened.clone()
    }

    pub fn dismissed(&self) -> Vec<String> {
        self.log.lock().unwrap().dismissed.clone()
    }
}

pub struct StubPage {
    pages: Arc<Vec<StubListing>>,
    current: AtomicUsize,
    log: Arc<Mutex<StubLog>>,
}

impl StubPage {
    fn listing(&self) -> StubListing {
        self.pages
            .get(self.current.load(Ordering::SeqCst))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl BrowserPage for StubPage {
    async fn anchors(&self, selector: &str) -> Result<Vec<RawAnchor>> {
        let listing = self.listing();
        if listing.fail_extract {
            return Err(DirscoutError::Browser("page crashed".into()));
        }
        Ok(listing.by_selector.get(selector).cloned().unwrap_or_default())
    }

    async fn dismiss(&self, selector: &str) -> bool {
        self.log.lock().unwrap().dismissed.push(selector.to_string());
        self.listing().has_banner
    }

    async fn click_next(&self, _labels: &[String]) -> Result<bool> {
        let listing = self.listing();
        if listing.fail_click {
            return Err(DirscoutError::Browser("click failed".into()));
        }
        let current = self.current.load(Ordering::SeqCst);
        if !listing.has_next || current + 1 >= self.pages.len() {
            return Ok(false);
        }
        self.current.store(current + 1, Ordering::SeqCst);
        self.log.lock().unwrap().clicks += 1;
        Ok(true)
    }

    async fn close(self) {
        self.log.lock().unwrap().closed += 1;
    }
}

#[async_trait]
impl Navigator for StubNavigator {
    type Page = StubPage;

    async fn open(&self, url: &str) -> Result<StubPage> {
        if self.fail_open {
            return Err(DirscoutError::Timeout {
                url: url.to_string(),
                secs: 60,
            });
        }
        self.log.lock().unwrap().opened.push(url.to_string());
        Ok(StubPage {
            pages: self.pages.clone(),
            current: AtomicUsize::new(0),
            log: self.log.clone(),
        })
    }
}
