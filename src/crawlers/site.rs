use std::borrow::Cow;

use async_trait::async_trait;
use encoding_rs::Encoding;
use scraper::{Html, Selector};
use url::Url;

use crate::crawlers::{NameSource, NameStream, SourceError, SourceResult};

/// Static description of one page listing names.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub id: &'static str,
    pub url: &'static str,
    /// Character encoding the page is served in.
    pub encoding: &'static Encoding,
    /// Selects one node per name.
    pub item_selector: &'static str,
    /// Narrows each item node to the element holding the text, if set.
    pub text_selector: Option<&'static str>,
    /// Returns `false` for tokens that must be dropped.
    pub filter: Option<fn(&str) -> bool>,
}

/// Crawler for a single page described by a [`SiteConfig`].
pub struct SiteCrawler {
    site: SiteConfig,
    url: Url,
    client: reqwest::Client,
}

impl SiteCrawler {
    /// Creates a crawler for `site`. The `client` is expected to carry the
    /// harvester's User-Agent, see [`build_reqwest_client`].
    ///
    /// [`build_reqwest_client`]: crate::crawlers::build_reqwest_client
    pub fn new(site: SiteConfig, client: reqwest::Client) -> SourceResult<Self> {
        Ok(Self {
            url: Url::parse(site.url).map_err(|e| SourceError::Build(e.to_string()))?,
            site,
            client,
        })
    }

    async fn fetch_bytes(&self) -> SourceResult<Vec<u8>> {
        let res = self.client.get(self.url.clone()).send().await?;
        if !res.status().is_success() {
            log::error!("Failed to get URL {}: {}", self.url, res.status());
            return Err(SourceError::Status(res.status()));
        }
        Ok(res.bytes().await?.to_vec())
    }
}

#[async_trait]
impl NameSource for SiteCrawler {
    fn id(&self) -> &str {
        self.site.id
    }

    async fn fetch_names(&self) -> SourceResult<NameStream> {
        let body = self.fetch_bytes().await?;
        let text = decode_body(&body, self.site.encoding)?;
        let names = extract_names(&text, &self.site)?;
        log::debug!("{}: extracted {} names", self.site.id, names.len());
        Ok(Box::new(names.into_iter()))
    }
}

/// Converts a response body to UTF-8. Malformed input is an error rather
/// than being patched with replacement characters.
pub fn decode_body(bytes: &[u8], encoding: &'static Encoding) -> SourceResult<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or(SourceError::Encoding(encoding.name()))
}

/// Extracts trimmed, filtered names from a page.
///
/// A page where the item selector matches nothing is treated as a markup
/// change and reported as [`SourceError::Parse`].
pub fn extract_names(html: &str, site: &SiteConfig) -> SourceResult<Vec<String>> {
    let item_selector = parse_selector(site.item_selector)?;
    let text_selector = site.text_selector.map(parse_selector).transpose()?;

    let document = Html::parse_document(html);
    let items = document.select(&item_selector).collect::<Vec<_>>();
    if items.is_empty() {
        return Err(SourceError::Parse(format!(
            "selector `{}` matched nothing",
            site.item_selector
        )));
    }

    let names = items
        .into_iter()
        .filter_map(|item| {
            let raw: String = match &text_selector {
                Some(selector) => item.select(selector).flat_map(|el| el.text()).collect(),
                None => item.text().collect(),
            };
            let name = raw.trim();
            if name.is_empty() {
                return None;
            }
            if let Some(accept) = site.filter
                && !accept(name)
            {
                return None;
            }
            Some(name.to_string())
        })
        .collect();

    Ok(names)
}

fn parse_selector(selector: &str) -> SourceResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| SourceError::Parse(format!("invalid selector `{selector}`: {e}")))
}
