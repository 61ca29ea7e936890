use std::collections::HashSet;

use tracing::debug;
use url::Url;

use crate::app::Result;
use crate::scraper::{BrowserPage, RawAnchor, ScraperConfig};

/// A link that survived filtering, with its href made absolute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    pub name: String,
    pub href: String,
}

/// Rules deciding which anchors are real directory or company links
#[derive(Debug, Clone)]
pub struct LinkFilter {
    excluded: HashSet<String>,
    min_len: usize,
    require_visible: bool,
    required_path: Option<String>,
}

impl LinkFilter {
    /// Filter for industry and country pages: only drill-down links into the directory
    pub fn directory(config: &ScraperConfig) -> Self {
        Self {
            required_path: Some(config.directory_path.clone()),
            require_visible: false,
            ..Self::base(config)
        }
    }

    /// Filter for company listing pages: visible links that are not site chrome
    pub fn listing(config: &ScraperConfig) -> Self {
        Self {
            required_path: None,
            require_visible: true,
            ..Self::base(config)
        }
    }

    fn base(config: &ScraperConfig) -> Self {
        Self {
            excluded: config
                .excluded_texts
                .iter()
                .map(|t| t.trim().to_lowercase())
                .collect(),
            min_len: config.min_name_len,
            require_visible: false,
            required_path: None,
        }
    }

    /// Apply the filter to one anchor, returning the cleaned link if it passes
    pub fn accept(&self, anchor: &RawAnchor, origin: &Url) -> Option<ExtractedLink> {
        if self.require_visible && !anchor.visible {
            return None;
        }

        let name = anchor.text.trim();
        if name.is_empty() || name.chars().count() < self.min_len {
            return None;
        }
        if self.excluded.contains(&name.to_lowercase()) {
            return None;
        }

        let href = anchor.href.as_deref()?;
        if href.contains("javascript") {
            return None;
        }
        let href = normalize_href(origin, href)?;

        if let Some(ref path) = self.required_path {
            if !href.contains(path.as_str()) {
                return None;
            }
        }

        Some(ExtractedLink {
            name: name.to_string(),
            href,
        })
    }
}

/// Make an href absolute against the site origin.
///
/// Root-relative paths get the origin prepended verbatim. Absolute URLs are
/// returned untouched, so normalizing twice is a no-op. Other relative forms
/// resolve against the origin root. Links without a host (`mailto:`, `tel:`)
/// are dropped.
pub fn normalize_href(origin: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if href.starts_with('/') && !href.starts_with("//") {
        return Some(format!("{}{}", origin.origin().ascii_serialization(), href));
    }

    match Url::parse(href) {
        Ok(url) => url.host_str().map(|_| href.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => origin.join(href).ok().map(String::from),
        Err(_) => None,
    }
}

/// Ordered selector strategies plus the filter applied to whichever one matched
pub struct LinkExtractor {
    strategies: Vec<String>,
    filter: LinkFilter,
    origin: Url,
}

impl LinkExtractor {
    pub fn new(strategies: Vec<String>, filter: LinkFilter, origin: Url) -> Self {
        Self {
            strategies,
            filter,
            origin,
        }
    }

    /// Extract links from the page.
    ///
    /// Strategies are tried in order and the first selector matching any
    /// element wins, even if all of its elements are later filtered out.
    /// Result sets are never merged.
    pub async fn extract<P: BrowserPage>(&self, page: &P) -> Result<Vec<ExtractedLink>> {
        for selector in &self.strategies {
            let anchors = page.anchors(selector).await?;
            if anchors.is_empty() {
                debug!("No elements for selector {}, trying next", selector);
                continue;
            }

            let matched = anchors.len();
            let links = self.filter_anchors(anchors);
            debug!(
                "Selector {} matched {} elements, kept {}",
                selector,
                matched,
                links.len()
            );
            return Ok(links);
        }

        Ok(Vec::new())
    }

    pub fn filter_anchors(&self, anchors: Vec<RawAnchor>) -> Vec<ExtractedLink> {
        anchors
            .iter()
            .filter_map(|a| self.filter.accept(a, &self.origin))
            .collect()
    }
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// JavaScript enumerating the elements matching `selector`.
///
/// Elements that throw while being read are skipped, not fatal to the batch.
pub(crate) fn anchor_script(selector: &str) -> String {
    let selector = js_string(selector);
    format!(
        r#"
        (() => {{
            const out = [];
            for (const el of document.querySelectorAll({selector})) {{
                try {{
                    const style = window.getComputedStyle(el);
                    const rect = el.getBoundingClientRect();
                    const visible = style.visibility !== 'hidden'
                        && style.display !== 'none'
                        && rect.width > 0
                        && rect.height > 0;
                    out.push({{
                        text: el.innerText || '',
                        href: el.getAttribute('href'),
                        visible: visible
                    }});
                }} catch (e) {{}}
            }}
            return out;
        }})()
        "#
    )
}

/// JavaScript clicking the first visible control labelled with one of `labels`
pub(crate) fn next_control_script(labels: &[String]) -> String {
    let labels = serde_json::to_string(labels).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"
        (() => {{
            const labels = {labels};
            const candidates = Array.from(
                document.querySelectorAll('a, button, [role="button"]')
            );
            const isVisible = (el) => {{
                const style = window.getComputedStyle(el);
                const rect = el.getBoundingClientRect();
                return style.visibility !== 'hidden'
                    && style.display !== 'none'
                    && rect.width > 0
                    && rect.height > 0;
            }};
            for (const label of labels) {{
                const control = candidates.find(
                    (el) => (el.textContent || '').trim() === label && isVisible(el)
                );
                if (control) {{
                    control.click();
                    return true;
                }}
            }}
            return false;
        }})()
        "#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::stub::{anchor, hidden_anchor, StubListing, StubNavigator};
    use crate::scraper::Navigator;

    fn origin() -> Url {
        Url::parse("https://www.lusha.com").unwrap()
    }

    fn listing_filter() -> LinkFilter {
        LinkFilter::listing(&ScraperConfig::instant())
    }

    fn directory_filter() -> LinkFilter {
        LinkFilter::directory(&ScraperConfig::instant())
    }

    #[test]
    fn test_normalize_root_relative() {
        assert_eq!(
            normalize_href(&origin(), "/company-search/software/").as_deref(),
            Some("https://www.lusha.com/company-search/software/")
        );
    }

    #[test]
    fn test_normalize_absolute_is_untouched() {
        let href = "https://other.example.com/path?q=1";
        assert_eq!(normalize_href(&origin(), href).as_deref(), Some(href));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_href(&origin(), "/company-search/a/").unwrap();
        let twice = normalize_href(&origin(), &once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.matches("https://www.lusha.com").count(), 1);
    }

    #[test]
    fn test_normalize_root_relative_is_plain_prefix() {
        assert_eq!(
            normalize_href(&origin(), "/a/../b").as_deref(),
            Some("https://www.lusha.com/a/../b")
        );
        assert_eq!(
            normalize_href(&origin(), "/company search/x").as_deref(),
            Some("https://www.lusha.com/company search/x")
        );
    }

    #[test]
    fn test_normalize_uses_origin_not_origin_path() {
        let base = Url::parse("https://www.lusha.com/company-search/").unwrap();
        assert_eq!(
            normalize_href(&base, "/company/acme").as_deref(),
            Some("https://www.lusha.com/company/acme")
        );
    }

    #[test]
    fn test_normalize_protocol_and_document_relative() {
        assert_eq!(
            normalize_href(&origin(), "//cdn.example.com/x").as_deref(),
            Some("https://cdn.example.com/x")
        );
        assert_eq!(
            normalize_href(&origin(), "germany/").as_deref(),
            Some("https://www.lusha.com/germany/")
        );
    }

    #[test]
    fn test_normalize_drops_hostless_schemes() {
        assert!(normalize_href(&origin(), "mailto:sales@example.com").is_none());
        assert!(normalize_href(&origin(), "   ").is_none());
    }

    #[test]
    fn test_accept_plain_link() {
        let link = listing_filter()
            .accept(&anchor("  Acme Corp \n", "/company/acme"), &origin())
            .unwrap();
        assert_eq!(link.name, "Acme Corp");
        assert_eq!(link.href, "https://www.lusha.com/company/acme");
    }

    #[test]
    fn test_excluded_text_is_case_insensitive() {
        let filter = listing_filter();
        for text in ["Privacy Policy", "privacy policy", "  LOGIN ", "linkedin"] {
            assert!(
                filter.accept(&anchor(text, "https://www.lusha.com/x"), &origin()).is_none(),
                "{} should be excluded",
                text
            );
        }
    }

    #[test]
    fn test_short_and_empty_text_rejected() {
        let filter = listing_filter();
        assert!(filter.accept(&anchor("A", "/a"), &origin()).is_none());
        assert!(filter.accept(&anchor("   ", "/a"), &origin()).is_none());
        assert!(filter.accept(&anchor("AB", "/a"), &origin()).is_some());
    }

    #[test]
    fn test_missing_or_script_href_rejected() {
        let filter = listing_filter();
        let no_href = RawAnchor {
            text: "Acme".into(),
            href: None,
            visible: true,
        };
        assert!(filter.accept(&no_href, &origin()).is_none());
        assert!(filter.accept(&anchor("Acme", "javascript:void(0)"), &origin()).is_none());
    }

    #[test]
    fn test_visibility_only_enforced_for_listings() {
        let hidden = hidden_anchor("Software", "/company-search/software/");
        assert!(listing_filter().accept(&hidden, &origin()).is_none());
        assert!(directory_filter().accept(&hidden, &origin()).is_some());
    }

    #[test]
    fn test_directory_requires_directory_path() {
        let filter = directory_filter();
        assert!(filter.accept(&anchor("Pricing", "/pricing/"), &origin()).is_none());
        assert!(filter
            .accept(&anchor("Retail", "/company-search/retail/"), &origin())
            .is_some());
    }

    #[test]
    fn test_scripts_embed_quoted_arguments() {
        let script = anchor_script(".box a[data-x=\"1\"]");
        assert!(script.contains(r#"".box a[data-x=\"1\"]""#));

        let script = next_control_script(&["Next".to_string(), ">".to_string()]);
        assert!(script.contains(r#"["Next",">"]"#));
        assert!(script.contains("control.click()"));
    }

    #[tokio::test]
    async fn test_primary_selector_wins_when_it_matches() {
        let navigator = StubNavigator::new(vec![StubListing::new()
            .with("primary", vec![anchor("Acme", "/a")])
            .with("fallback", vec![anchor("Other", "/b")])]);
        let page = navigator.open("https://www.lusha.com/").await.unwrap();

        let extractor = LinkExtractor::new(
            vec!["primary".into(), "fallback".into()],
            listing_filter(),
            origin(),
        );
        let links = extractor.extract(&page).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Acme");
    }

    #[tokio::test]
    async fn test_fallback_used_only_when_primary_matches_nothing() {
        let navigator = StubNavigator::new(vec![StubListing::new()
            .with("fallback", vec![anchor("Other", "/b")])]);
        let page = navigator.open("https://www.lusha.com/").await.unwrap();

        let extractor = LinkExtractor::new(
            vec!["primary".into(), "fallback".into()],
            listing_filter(),
            origin(),
        );
        let links = extractor.extract(&page).await.unwrap();
        assert_eq!(links[0].href, "https://www.lusha.com/b");
    }

    #[tokio::test]
    async fn test_filtered_out_primary_does_not_fall_back() {
        let navigator = StubNavigator::new(vec![StubListing::new()
            .with("primary", vec![anchor("Login", "/login")])
            .with("fallback", vec![anchor("Other", "/b")])]);
        let page = navigator.open("https://www.lusha.com/").await.unwrap();

        let extractor = LinkExtractor::new(
            vec!["primary".into(), "fallback".into()],
            listing_filter(),
            origin(),
        );
        assert!(extractor.extract(&page).await.unwrap().is_empty());
    }
}
