use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::HostEnvironment;
use super::scanner;
use crate::timedtext::entities::decode_html_fragment;

// @module: Static snapshot of a watch page used as the host environment

static SCRIPT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>").unwrap()
});

static META_TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<meta\b[^>]*\bname\s*=\s*["']title["'][^>]*>"#).unwrap()
});

static CONTENT_ATTR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").unwrap()
});

const CONFIG_SETTER: &str = "ytcfg.set(";
const SITE_SUFFIX: &str = " - YouTube";

/// Captured state of a watch page.
///
/// Built either from the page HTML (scripts, `ytcfg.set` calls and title are
/// scraped) or from a JSON dump of the page globals taken in a browser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Top-level globals such as `ytInitialPlayerResponse`
    #[serde(default)]
    pub globals: Map<String, Value>,

    /// Values visible through the page configuration getter
    #[serde(default)]
    pub config: Map<String, Value>,

    /// Inline script bodies in document order
    #[serde(default)]
    pub scripts: Vec<String>,

    /// Page title
    #[serde(default)]
    pub title: Option<String>,
}

impl PageSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Scrape a watch page document
    pub fn from_html(html: &str) -> Self {
        let scripts: Vec<String> = SCRIPT_REGEX
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|body| !body.trim().is_empty())
            .collect();

        let mut config = Map::new();
        for script in &scripts {
            for literal in scanner::objects_after(script, CONFIG_SETTER) {
                if let Ok(Value::Object(entries)) = serde_json::from_str::<Value>(literal) {
                    config.extend(entries);
                }
            }
        }

        debug!("Page snapshot: {} script(s), {} config key(s)", scripts.len(), config.len());

        Self {
            globals: Map::new(),
            config,
            scripts,
            title: Self::scrape_title(html),
        }
    }

    /// Load a JSON dump of the form `{"globals": {...}, "scripts": [...], "title": "..."}`
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Set a global variable
    pub fn with_global(mut self, name: impl Into<String>, value: Value) -> Self {
        self.globals.insert(name.into(), value);
        self
    }

    /// Set a configuration value
    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    /// Append an inline script
    pub fn with_script(mut self, body: impl Into<String>) -> Self {
        self.scripts.push(body.into());
        self
    }

    /// Set the page title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn scrape_title(html: &str) -> Option<String> {
        let from_meta = META_TITLE_REGEX
            .find(html)
            .and_then(|tag| CONTENT_ATTR_REGEX.captures(tag.as_str()))
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| decode_html_fragment(m.as_str()).trim().to_string())
            .filter(|t| !t.is_empty());

        from_meta.or_else(|| {
            TITLE_REGEX
                .captures(html)
                .and_then(|caps| caps.get(1))
                .map(|m| decode_html_fragment(m.as_str()).trim().to_string())
                .map(|t| t.strip_suffix(SITE_SUFFIX).map(str::trim).unwrap_or(t.as_str()).to_string())
                .filter(|t| !t.is_empty())
        })
    }
}

impl HostEnvironment for PageSnapshot {
    fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    fn config_get(&self, key: &str) -> Option<Value> {
        self.config.get(key).cloned()
    }

    fn script_texts(&self) -> Vec<&str> {
        self.scripts.iter().map(String::as_str).collect()
    }

    fn page_title(&self) -> Option<String> {
        self.title.clone().filter(|t| !t.trim().is_empty())
    }
}
