use crate::config::FetchConfig;
use crate::error::ScrapeError;
use config::ConfigError;
use log::debug;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE, PRAGMA,
};
use reqwest::{Client, Response};
use url::Url;

const PAGE_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Content type assumed when an image response does not declare one
const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

/// HTML of a fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Address the body was served from, after redirects
    pub final_url: Url,
    pub body: String,
}

/// A downloaded image that passed the content-type and size checks
#[derive(Debug, Clone)]
pub struct DownloadedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl DownloadedImage {
    /// File extension derived from the MIME subtype, `jpg` when there is none
    pub fn extension(&self) -> &str {
        self.content_type
            .split('/')
            .nth(1)
            .and_then(|subtype| subtype.split(';').next())
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .unwrap_or("jpg")
    }
}

/// Parse a user-supplied address, accepting only absolute http(s) URLs
pub fn parse_http_url(url: &str) -> Result<Url, ScrapeError> {
    let parsed = Url::parse(url.trim()).map_err(|e| ScrapeError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(ScrapeError::InvalidUrl(format!(
            "{url}: unsupported scheme {scheme}"
        ))),
    }
}

/// HTTP client that looks like a desktop browser to recipe sites
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, ScrapeError> {
        let accept_language = HeaderValue::from_str(&config.accept_language).map_err(|e| {
            ConfigError::Message(format!(
                "invalid accept_language {:?}: {e}",
                config.accept_language
            ))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, accept_language);
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Download the HTML of a recipe page
    pub async fn fetch_page(&self, url: &Url) -> Result<FetchedPage, ScrapeError> {
        debug!("Fetching page {url}");
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, PAGE_ACCEPT)
            .send()
            .await
            .map_err(ScrapeError::from_transport)?;
        let response = ensure_success(response)?;

        let final_url = response.url().clone();
        let body = response.text().await.map_err(ScrapeError::from_transport)?;
        debug!("Fetched {} bytes from {final_url}", body.len());

        Ok(FetchedPage { final_url, body })
    }

    /// Download an image, refusing non-image content and bodies over `max_bytes`
    pub async fn fetch_image(&self, url: &str, max_bytes: usize) -> Result<DownloadedImage, ScrapeError> {
        let url = parse_http_url(url)?;
        debug!("Downloading image from {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ScrapeError::from_transport)?;
        let mut response = ensure_success(response)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_IMAGE_TYPE)
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(ScrapeError::NotAnImage(content_type));
        }

        if let Some(declared) = response.content_length() {
            let declared = usize::try_from(declared).unwrap_or(usize::MAX);
            if declared > max_bytes {
                return Err(ScrapeError::ImageTooLarge {
                    size: declared,
                    limit: max_bytes,
                });
            }
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(ScrapeError::from_transport)? {
            bytes.extend_from_slice(&chunk);
            if bytes.len() > max_bytes {
                return Err(ScrapeError::ImageTooLarge {
                    size: bytes.len(),
                    limit: max_bytes,
                });
            }
        }

        debug!("Image downloaded: {} bytes, type: {content_type}", bytes.len());
        Ok(DownloadedImage {
            bytes,
            content_type,
        })
    }
}

fn ensure_success(response: Response) -> Result<Response, ScrapeError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ScrapeError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}
