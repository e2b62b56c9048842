//! Saving web links with an OpenGraph preview.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use database::{item, Database, ItemMeta, NewItem, SourceType};
use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::error::{PipelineError, Result};

/// `created_via` value for saved links.
pub const VIA_LINK: &str = "link";

/// Largest page body read for a preview.
const MAX_PAGE_BYTES: usize = 512 * 1024;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\s[^>]*>").expect("valid meta tag pattern"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z][a-z0-9:_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute pattern")
});

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title pattern"));

/// Preview fields extracted from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPreview {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub site_name: Option<String>,
}

impl LinkPreview {
    /// Parse OpenGraph tags, falling back to `<title>` for the title.
    pub fn from_html(html: &str) -> Self {
        let mut og: HashMap<String, String> = HashMap::new();

        for tag in META_TAG.find_iter(html) {
            let mut key = None;
            let mut content = None;
            for attr in ATTRIBUTE.captures_iter(tag.as_str()) {
                let name = attr[1].to_ascii_lowercase();
                let value = attr.get(2).or(attr.get(3)).map(|m| m.as_str());
                match name.as_str() {
                    "property" | "name" => key = value.map(str::to_ascii_lowercase),
                    "content" => content = value.map(decode_entities),
                    _ => {}
                }
            }
            if let (Some(key), Some(content)) = (key, content) {
                let content = content.trim().to_string();
                if key.starts_with("og:") && !content.is_empty() {
                    og.entry(key).or_insert(content);
                }
            }
        }

        let title = og.remove("og:title").or_else(|| {
            TITLE
                .captures(html)
                .map(|c| decode_entities(c[1].trim()))
                .filter(|t| !t.is_empty())
        });

        Self {
            title,
            description: og.remove("og:description"),
            image: og.remove("og:image"),
            site_name: og.remove("og:site_name"),
        }
    }
}

/// Stores user-submitted links as `web` items.
#[derive(Clone)]
pub struct LinkSaver {
    database: Database,
    http: Client,
}

impl LinkSaver {
    pub fn new(database: Database) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("message-buffer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::InvalidInput(format!("HTTP client: {}", e)))?;
        Ok(Self { database, http })
    }

    /// Save `raw_url` for `user_id` and return the new item ID.
    ///
    /// A page that cannot be fetched is still saved, with the URL as content.
    pub async fn save(&self, user_id: &str, raw_url: &str) -> Result<String> {
        let url = parse_http_url(raw_url)?;

        let preview = match self.fetch_preview(&url).await {
            Ok(preview) => preview,
            Err(e) => {
                warn!(url = %url, error = %e, "Link preview failed; saving bare URL");
                LinkPreview::default()
            }
        };

        let new_item = NewItem {
            source_type: SourceType::Web,
            content: preview
                .title
                .clone()
                .unwrap_or_else(|| url.to_string()),
            meta: ItemMeta {
                url: Some(url.to_string()),
                og_title: preview.title,
                og_description: preview.description,
                og_image: preview.image,
                og_site_name: preview.site_name,
                created_via: Some(VIA_LINK.to_string()),
                ..ItemMeta::default()
            },
            user_id: user_id.to_string(),
        };

        Ok(item::insert_item(self.database.pool(), &new_item).await?)
    }

    async fn fetch_preview(&self, url: &Url) -> std::result::Result<LinkPreview, reqwest::Error> {
        let response = self.http.get(url.as_str()).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        let body = &body[..body.len().min(MAX_PAGE_BYTES)];
        let html = String::from_utf8_lossy(body);
        debug!(url = %url, "Fetched {} bytes for preview", body.len());
        Ok(LinkPreview::from_html(&html))
    }
}

fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| PipelineError::InvalidInput(format!("invalid URL {:?}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PipelineError::InvalidInput(format!(
            "unsupported URL scheme: {}",
            other
        ))),
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
