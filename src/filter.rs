use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for classifying links found on wiki pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkFilterConfig {
    /// Host every followed link must live on (None allows any host)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_host: Option<String>,

    /// Path prefixes of the category namespace, in either plain or percent-encoded form
    #[serde(default = "default_category_prefixes")]
    pub category_prefixes: Vec<String>,

    /// Path prefix of ordinary content pages
    #[serde(default = "default_content_prefix")]
    pub content_prefix: String,

    /// Regex patterns for URLs that are never followed
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

/// Category namespace prefixes for the Russian and English wikis
pub fn default_category_prefixes() -> Vec<String> {
    vec!["/wiki/Категория:".to_string(), "/wiki/Category:".to_string()]
}

fn default_content_prefix() -> String {
    "/wiki/".to_string()
}

fn default_exclude_patterns() -> Vec<String> {
    vec![r"\.(jpg|jpeg|png|gif|css|js|ico|svg|pdf)$".to_string()]
}

impl Default for LinkFilterConfig {
    fn default() -> Self {
        Self {
            required_host: None,
            category_prefixes: default_category_prefixes(),
            content_prefix: default_content_prefix(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// What a link on a category page points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Category,
    Member,
}

/// Decides which links are categories, which are member pages and which are ignored
#[derive(Debug)]
pub struct LinkFilter {
    config: LinkFilterConfig,
    category_prefixes: Vec<String>,
    content_prefix: String,
    exclude_regexes: Vec<Regex>,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self::new(LinkFilterConfig::default()).expect("Default regex patterns should be valid")
    }
}

impl LinkFilter {
    /// Create a new link filter from configuration
    pub fn new(config: LinkFilterConfig) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        // Url::path() is always percent-encoded, so keep both spellings of each prefix
        let mut category_prefixes = Vec::new();
        for prefix in &config.category_prefixes {
            for form in [prefix.clone(), encode_path(prefix)] {
                if !category_prefixes.contains(&form) {
                    category_prefixes.push(form);
                }
            }
        }
        let content_prefix = encode_path(&config.content_prefix);

        Ok(Self {
            config,
            category_prefixes,
            content_prefix,
            exclude_regexes,
        })
    }

    /// Resolve an href against the page it was found on, dropping the fragment
    pub fn resolve(&self, base: &Url, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let mut url = base.join(href).ok()?;
        url.set_fragment(None);
        Some(url)
    }

    /// Whether the URL may be fetched at all
    pub fn should_follow(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        if !self.is_in_host_scope(url) {
            return false;
        }
        let url_str = url.as_str();
        !self.exclude_regexes.iter().any(|regex| regex.is_match(url_str))
    }

    /// Check if a URL is on the required host
    pub fn is_in_host_scope(&self, url: &Url) -> bool {
        match &self.config.required_host {
            Some(required) => url.host_str() == Some(required.as_str()),
            None => true,
        }
    }

    /// Whether the URL points into the category namespace
    pub fn is_category(&self, url: &Url) -> bool {
        let path = url.path();
        self.category_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Whether the URL is a content page that is not itself a category
    pub fn is_member(&self, url: &Url) -> bool {
        url.path().starts_with(self.content_prefix.as_str()) && !self.is_category(url)
    }

    /// Classify a followable URL
    pub fn classify(&self, url: &Url) -> Option<LinkKind> {
        if !self.should_follow(url) {
            return None;
        }
        if self.is_category(url) {
            Some(LinkKind::Category)
        } else if self.is_member(url) {
            Some(LinkKind::Member)
        } else {
            None
        }
    }
}

/// Percent-encode a path the same way `Url` stores it
fn encode_path(path: &str) -> String {
    match Url::parse("http://localhost/").and_then(|base| base.join(path)) {
        Ok(url) => url.path().to_string(),
        Err(_) => path.to_string(),
    }
}
