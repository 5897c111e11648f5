use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::extractors::{Extractor, HeuristicExtractor, JsonLdExtractor};
use crate::fetch::{parse_http_url, FetchedPage, PageFetcher};
use crate::html::{absolutize, ParsingContext};
use crate::images::{candidate_images, harvest_images, primary_image};
use crate::model::{CandidateImage, ScrapedRecipeDraft};
use crate::storage::{save_remote_image, ImageStore};
use log::{debug, info};
use std::time::Duration;
use url::Url;

/// Builder for a [`Scraper`]
///
/// # Example
/// ```no_run
/// use recipe_scraper::Scraper;
/// use std::time::Duration;
///
/// # async fn run() -> Result<(), recipe_scraper::ScrapeError> {
/// let scraper = Scraper::builder()
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// let draft = scraper.scrape("https://example.com/recipes/soup").await?;
/// println!("{}", draft.title);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScraperBuilder {
    config: Option<ScraperConfig>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ScraperBuilder {
    /// Use an explicit configuration instead of the defaults
    pub fn config(mut self, config: ScraperConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the per-request timeout
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Override the User-Agent sent to recipe sites
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<Scraper, ScrapeError> {
        let mut config = self.config.unwrap_or_default();
        if let Some(timeout) = self.timeout {
            // whole seconds, at least one
            config.fetch.timeout_secs = timeout.as_secs().max(1);
        }
        if let Some(user_agent) = self.user_agent {
            config.fetch.user_agent = user_agent;
        }

        let fetcher = PageFetcher::new(&config.fetch)?;
        Ok(Scraper { fetcher, config })
    }
}

/// Turns recipe page URLs into drafts and image lists
pub struct Scraper {
    fetcher: PageFetcher,
    config: ScraperConfig,
}

impl Scraper {
    pub fn builder() -> ScraperBuilder {
        ScraperBuilder::default()
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        let url = parse_http_url(url)?;
        self.fetcher.fetch_page(&url).await
    }

    /// Fetch a recipe page and extract a draft from it
    pub async fn scrape(&self, url: &str) -> Result<ScrapedRecipeDraft, ScrapeError> {
        let page = self.fetch(url).await?;
        Ok(self.scrape_html(&page.final_url, &page.body))
    }

    /// Extract a draft from HTML that has already been fetched.
    ///
    /// Structured data wins when it yields a title; otherwise the markup
    /// heuristics are used. Images are harvested either way.
    pub fn scrape_html(&self, page_url: &Url, html: &str) -> ScrapedRecipeDraft {
        let context = ParsingContext::new(page_url.clone(), html);
        let mut draft = extract_draft(&context);

        let base = context.base_url();
        let images = harvest_images(&context.document, &base, &self.config.images);
        draft.image = draft
            .image
            .and_then(|image| absolutize(&base, &image))
            .or_else(|| images.first().cloned());
        draft.images = images;

        info!(
            "Scraped {:?} from {}: {} ingredients, {} instructions, {} images",
            draft.title,
            page_url,
            draft.ingredients.len(),
            draft.instructions.len(),
            draft.images.len()
        );
        draft
    }

    /// Fetch a page and list the images a user could pick for the recipe
    pub async fn scrape_images(&self, url: &str) -> Result<Vec<CandidateImage>, ScrapeError> {
        let page = self.fetch(url).await?;
        let context = ParsingContext::new(page.final_url, &page.body);
        let images = candidate_images(&context.document, &context.url, &self.config.images);
        debug!("Found {} candidate images on {}", images.len(), context.url);
        Ok(images)
    }

    /// Fetch a page and return its single representative image, if any
    pub async fn find_primary_image(&self, url: &str) -> Result<Option<String>, ScrapeError> {
        let page = self.fetch(url).await?;
        let context = ParsingContext::new(page.final_url, &page.body);
        Ok(primary_image(&context.document, &context.url))
    }

    /// Download a remote image and copy it into `store`
    pub async fn save_image(&self, store: &dyn ImageStore, image_url: &str) -> Result<String, ScrapeError> {
        save_remote_image(&self.fetcher, store, image_url, self.config.images.max_bytes).await
    }
}

/// First extractor draft with a title, else the last extractor's draft
fn extract_draft(context: &ParsingContext) -> ScrapedRecipeDraft {
    let extractors: [&dyn Extractor; 2] = [&JsonLdExtractor, &HeuristicExtractor];

    let mut fallback = None;
    for extractor in extractors {
        match extractor.parse(context) {
            Some(draft) if !draft.title.is_empty() => {
                debug!("Using {} extractor for {}", extractor.name(), context.url);
                return draft;
            }
            Some(draft) => {
                debug!("{} extractor found no title", extractor.name());
                fallback = Some(draft);
            }
            None => debug!("{} extractor found nothing", extractor.name()),
        }
    }
    fallback.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> Scraper {
        Scraper::builder().build().unwrap()
    }

    fn page_url() -> Url {
        Url::parse("https://x.com/recipes/soup").unwrap()
    }

    #[test]
    fn test_builder_overrides() {
        let scraper = Scraper::builder()
            .timeout(Duration::from_millis(200))
            .user_agent("TestBot/1.0")
            .build()
            .unwrap();
        assert_eq!(scraper.config().fetch.timeout_secs, 1);
        assert_eq!(scraper.config().fetch.user_agent, "TestBot/1.0");
    }

    #[test]
    fn test_json_ld_draft_wins_and_image_is_absolutized() {
        let html = r#"<html><head>
            <script type="application/ld+json">
                {"@type": "Recipe", "name": "Soup", "image": "/soup.jpg",
                 "recipeIngredient": ["water"], "recipeInstructions": "Boil."}
            </script>
            <meta property="og:image" content="https://x.com/og.jpg">
        </head><body><h1>Ignored heading</h1></body></html>"#;

        let draft = scraper().scrape_html(&page_url(), html);
        assert_eq!(draft.title, "Soup");
        assert_eq!(draft.ingredients, vec!["water"]);
        assert_eq!(draft.image.as_deref(), Some("https://x.com/soup.jpg"));
        assert_eq!(draft.images, vec!["https://x.com/og.jpg"]);
    }

    #[test]
    fn test_untitled_json_ld_falls_back_to_heuristics() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type": "Recipe", "recipeIngredient": ["x"]}</script>
        </head><body>
            <h1>Flatbread</h1>
            <ul class="ingredients"><li>flour</li></ul>
            <img src="/bread.jpg">
        </body></html>"#;

        let draft = scraper().scrape_html(&page_url(), html);
        assert_eq!(draft.title, "Flatbread");
        assert_eq!(draft.ingredients, vec!["flour"]);
        assert_eq!(draft.image.as_deref(), Some("https://x.com/bread.jpg"));
    }

    #[test]
    fn test_base_href_used_for_images() {
        let html = r#"<html><head><base href="https://cdn.x.com/media/"></head>
            <body><h1>Stew</h1><img src="stew.jpg"></body></html>"#;

        let draft = scraper().scrape_html(&page_url(), html);
        assert_eq!(draft.images, vec!["https://cdn.x.com/media/stew.jpg"]);
    }
}
