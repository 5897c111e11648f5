//! Thin query layer over the HTML tree.
//!
//! Extractors only need three things from a parsed page: find every
//! element matching a selector, read an attribute, read the text. Keeping
//! those behind [`HtmlTree`] keeps the extraction heuristics free of
//! parser-specific plumbing.

use log::debug;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Read-only queries over a document or a subtree of it
pub trait HtmlTree {
    /// Every element matching a CSS selector, in document order.
    /// An unparsable selector matches nothing.
    fn find_all(&self, selector: &str) -> Vec<ElementRef<'_>>;

    /// First matching element
    fn find_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        self.find_all(selector).into_iter().next()
    }

    /// Non-empty attribute of the first matching element
    fn first_attr(&self, selector: &str, attr: &str) -> Option<String> {
        self.find_first(selector)
            .and_then(|el| el.value().attr(attr).map(str::trim))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Non-empty, whitespace-collapsed text of the first matching element
    fn first_text(&self, selector: &str) -> Option<String> {
        self.find_first(selector)
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
    }

    /// `content` of `<meta {attr}="{value}">`
    fn meta_content(&self, attr: &str, value: &str) -> Option<String> {
        self.first_attr(&format!(r#"meta[{attr}="{value}"]"#), "content")
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            debug!("Ignoring invalid selector {selector:?}: {e:?}");
            None
        }
    }
}

impl HtmlTree for Html {
    fn find_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(selector) {
            Some(selector) => self.select(&selector).collect(),
            None => Vec::new(),
        }
    }
}

impl HtmlTree for ElementRef<'_> {
    fn find_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(selector) {
            Some(selector) => self.select(&selector).collect(),
            None => Vec::new(),
        }
    }
}

/// Text content with whitespace runs collapsed to single spaces
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text content exactly as it appears in the markup, trimmed at both ends
pub fn raw_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Leading integer of an attribute value, the way browsers read `width="40px"`
pub fn leading_int(value: &str) -> Option<u32> {
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// A fetched page ready for extraction
pub struct ParsingContext {
    /// Address the page was served from, after redirects
    pub url: Url,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    /// Base for resolving relative links: `<base href>` when present and
    /// valid, else the page address
    pub fn base_url(&self) -> Url {
        self.document
            .first_attr("base[href]", "href")
            .and_then(|href| self.url.join(&href).ok())
            .unwrap_or_else(|| self.url.clone())
    }
}

/// Resolve a possibly relative reference against `base`.
/// Protocol-relative and root-relative forms are handled by the URL parser.
pub fn absolutize(base: &Url, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    match base.join(reference) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!("Skipping unresolvable URL {reference:?}: {e}");
            None
        }
    }
}
