//! Discovery and ranking of image URLs on a recipe page.

use crate::config::ImageConfig;
use crate::html::{absolutize, leading_int, HtmlTree};
use crate::model::CandidateImage;
use log::debug;
use scraper::ElementRef;
use std::collections::HashSet;
use url::Url;

/// Substrings that mark decoration rather than food photos
const HARVEST_BLOCKLIST: &[&str] = &[
    "logo", "icon", "sprite", "avatar", "badge", "btn", "button",
];

const CANDIDATE_URL_BLOCKLIST: &[&str] = &[
    "logo", "icon", "button", "banner", "tracking", "pixel",
];

const CANDIDATE_ALT_BLOCKLIST: &[&str] = &["logo", "icon"];

/// Matched as whole tokens only, so "uploads" or "bread" survive
const CANDIDATE_URL_TOKENS: &[&str] = &["ad", "ads"];

/// Ordered, duplicate-free list of absolute URLs
#[derive(Default)]
struct RankedUrls {
    urls: Vec<String>,
    seen: HashSet<String>,
}

impl RankedUrls {
    fn push(&mut self, url: String) {
        if self.seen.insert(url.clone()) {
            self.urls.push(url);
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn contains_token(haystack: &str, tokens: &[&str]) -> bool {
    haystack
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|part| tokens.contains(&part))
}

/// First non-empty of `src`, `data-src`, `data-lazy-src`
fn image_source<'a>(img: &ElementRef<'a>) -> Option<&'a str> {
    ["src", "data-src", "data-lazy-src"]
        .into_iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|src| !src.is_empty())
}

fn declared_dimension(img: &ElementRef<'_>, attr: &str) -> Option<u32> {
    img.value().attr(attr).and_then(leading_int)
}

fn is_data_uri(src: &str) -> bool {
    src.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Social-card images: `og:image`, then `twitter:image` when it differs
fn social_images(tree: &impl HtmlTree) -> Vec<String> {
    let og_image = tree.meta_content("property", "og:image");
    let twitter_image = tree
        .meta_content("name", "twitter:image")
        .filter(|twitter| Some(twitter) != og_image.as_ref());
    og_image.into_iter().chain(twitter_image).collect()
}

/// Every usable image on the page, social-card images first.
///
/// Page `<img>` elements are skipped when they are data URIs, declare a
/// width or height under `config.min_dimension`, or look like site chrome
/// (logos, icons, buttons...) by URL or alt text. URLs are resolved against
/// `base`; anything that cannot be resolved is dropped.
pub fn harvest_images(tree: &impl HtmlTree, base: &Url, config: &ImageConfig) -> Vec<String> {
    let mut ranked = RankedUrls::default();

    for image in social_images(tree) {
        if let Some(url) = absolutize(base, &image) {
            debug!("Found social card image: {url}");
            ranked.push(url);
        }
    }
    let priority_count = ranked.urls.len();

    for img in tree.find_all("img") {
        let Some(src) = image_source(&img) else {
            continue;
        };
        if is_data_uri(src) {
            continue;
        }

        let too_small = ["width", "height"].into_iter().any(|attr| {
            declared_dimension(&img, attr).is_some_and(|d| d > 0 && d < config.min_dimension)
        });
        if too_small {
            continue;
        }

        let lower_src = src.to_lowercase();
        let lower_alt = img.value().attr("alt").unwrap_or_default().to_lowercase();
        if contains_any(&lower_src, HARVEST_BLOCKLIST) || contains_any(&lower_alt, HARVEST_BLOCKLIST)
        {
            continue;
        }

        if let Some(url) = absolutize(base, src) {
            ranked.push(url);
        }
    }

    debug!(
        "Total images found: {} ({} priority + {} regular)",
        ranked.urls.len(),
        priority_count,
        ranked.urls.len() - priority_count
    );
    ranked.urls
}

/// Images to offer in an image picker, each with its alt text.
///
/// Stricter than [`harvest_images`]: both declared dimensions must reach
/// `config.candidate_min_dimension`, and banner/ad/tracking images are
/// dropped as well. Social-card images lead the list.
pub fn candidate_images(tree: &impl HtmlTree, page_url: &Url, config: &ImageConfig) -> Vec<CandidateImage> {
    let mut seen = HashSet::new();
    let mut page_images = Vec::new();

    for img in tree.find_all("img[src]") {
        let Some(src) = img.value().attr("src").map(str::trim) else {
            continue;
        };
        let Some(url) = absolutize(page_url, src) else {
            continue;
        };
        let alt = img
            .value()
            .attr("alt")
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .map(str::to_string);

        let lower_url = url.to_lowercase();
        let lower_alt = alt.as_deref().unwrap_or_default().to_lowercase();
        if contains_any(&lower_url, CANDIDATE_URL_BLOCKLIST)
            || contains_token(&lower_url, CANDIDATE_URL_TOKENS)
            || contains_any(&lower_alt, CANDIDATE_ALT_BLOCKLIST)
        {
            continue;
        }

        let width = declared_dimension(&img, "width");
        let height = declared_dimension(&img, "height");
        if let (Some(w), Some(h)) = (width, height) {
            if w < config.candidate_min_dimension || h < config.candidate_min_dimension {
                continue;
            }
        }

        if seen.insert(url.clone()) {
            page_images.push(CandidateImage { url, alt });
        }
    }

    // Open Graph claims a shared URL first, but the Twitter card is listed first
    let mut images = Vec::new();
    let social = [
        ("property", "og:image", "Open Graph Image"),
        ("name", "twitter:image", "Twitter Card Image"),
    ];
    for (attr, value, label) in social {
        let Some(url) = tree
            .meta_content(attr, value)
            .and_then(|content| absolutize(page_url, &content))
        else {
            continue;
        };
        if seen.insert(url.clone()) {
            images.push(CandidateImage {
                url,
                alt: Some(label.to_string()),
            });
        }
    }

    images.reverse();
    images.extend(page_images);
    images
}

/// The single image that best represents the page: `og:image`, then
/// `twitter:image`, then a schema.org `itemprop="image"` element
pub fn primary_image(tree: &impl HtmlTree, page_url: &Url) -> Option<String> {
    tree.meta_content("property", "og:image")
        .or_else(|| tree.meta_content("name", "twitter:image"))
        .or_else(|| tree.first_attr(r#"[itemprop="image"]"#, "src"))
        .or_else(|| tree.first_attr(r#"[itemprop="image"]"#, "content"))
        .and_then(|image| absolutize(page_url, &image))
}
