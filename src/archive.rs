//! Bulk import of recipe-manager HTML exports.
//!
//! Each export is one HTML file per recipe, annotated with schema.org
//! microdata (`itemprop="name"`, `itemprop="recipeIngredient"`...). Timing
//! and yield are not microdata but `<b>Label:</b> <span>value</span>` pairs.

use crate::error::ScrapeError;
use crate::html::{element_text, leading_int, raw_text, HtmlTree};
use crate::model::{non_empty, Nutrition};
use crate::pipeline::Scraper;
use crate::storage::ImageStore;
use crate::validation::RecipeInput;
use log::{debug, info, warn};
use regex::Regex;
use scraper::{ElementRef, Html};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

static CALORIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Calories[:\s]+([0-9]+)").expect("calories pattern is valid"));
static PROTEIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Protein[:\s]+([0-9]+)").expect("protein pattern is valid"));
static CARBS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Carb(?:ohydrate)?s?[:\s]+([0-9]+)").expect("carbs pattern is valid")
});
static FAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Fat Total[:\s]+([0-9]+)|Fat[:\s]+([0-9]+)").expect("fat pattern is valid")
});
static FIBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Fiber[:\s]+([0-9]+)").expect("fiber pattern is valid"));
static SUGAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Sugars?[:\s]+([0-9]+)").expect("sugar pattern is valid"));
static SODIUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Sodium[:\s]+([0-9]+)").expect("sodium pattern is valid"));

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("line break pattern is valid"));

/// One recipe read from an export file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedRecipe {
    #[serde(flatten)]
    pub recipe: RecipeInput,
    /// Star rating from the export, 0 when unrated
    pub rating: u32,
}

/// Outcome of importing a directory of exports
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    /// Number of `.html` files found
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Human-readable log of what happened to each file
    pub details: Vec<String>,
    pub recipes: Vec<ExportedRecipe>,
}

/// Parse one exported recipe page. `None` when the page has no title.
pub fn parse_exported_recipe(html: &str) -> Option<ExportedRecipe> {
    let document = Html::parse_document(html);
    let title = document.first_text(r#"[itemprop="name"]"#)?;

    let rating = document
        .first_attr(".rating", "value")
        .and_then(|value| leading_int(&value))
        .unwrap_or(0);

    let categories = document
        .find_all(r#"[itemprop="recipeCategory"]"#)
        .iter()
        .map(element_text)
        .collect::<Vec<_>>()
        .join(",")
        .split(',')
        .filter_map(non_empty)
        .collect();

    let ingredients = document
        .find_all(r#"[itemprop="recipeIngredient"]"#)
        .iter()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    let nutrition = document
        .find_first(r#"[itemprop="nutrition"]"#)
        .map(|element| parse_nutrition(&element_text(&element)))
        .unwrap_or_default();

    let recipe = RecipeInput {
        title,
        ingredients,
        instructions: exported_instructions(&document),
        categories,
        notes: document.first_text(r#"[itemprop="comment"]"#),
        source_url: document.first_attr(r#"[itemprop="url"]"#, "href"),
        source_author: document.first_text(r#"[itemprop="author"]"#),
        prep_time: labelled_value(&document, "Prep Time:"),
        cook_time: labelled_value(&document, "Cook Time:"),
        total_time: labelled_value(&document, "Total Time:"),
        servings: labelled_value(&document, "Servings:"),
        difficulty: labelled_value(&document, "Difficulty:"),
        nutrition,
        ..Default::default()
    };

    Some(ExportedRecipe { recipe, rating })
}

/// `p.line` paragraphs, else the container text split on line breaks
fn exported_instructions(document: &Html) -> Vec<String> {
    let lines: Vec<String> = document
        .find_all(r#"[itemprop="recipeInstructions"] p.line"#)
        .iter()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();
    if !lines.is_empty() {
        return lines;
    }

    document
        .find_first(r#"[itemprop="recipeInstructions"]"#)
        .map(|container| {
            LINE_BREAKS
                .split(&raw_text(&container))
                .filter_map(non_empty)
                .collect()
        })
        .unwrap_or_default()
}

/// Text of the `<span>` right after a `<b>` containing `label`
fn labelled_value(document: &Html, label: &str) -> Option<String> {
    document
        .find_all("b")
        .into_iter()
        .filter(|bold| element_text(bold).contains(label))
        .find_map(|bold| {
            bold.next_siblings()
                .find_map(ElementRef::wrap)
                .filter(|sibling| sibling.value().name() == "span")
                .map(|span| element_text(&span))
        })
        .and_then(non_empty)
}

fn capture_number(pattern: &Regex, text: &str) -> Option<u32> {
    let caps = pattern.captures(text)?;
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .and_then(|group| group.as_str().parse().ok())
}

/// Whole-number nutrition facts from free text such as
/// `"Calories: 57kcal, Carbohydrates: 14g, Protein: 1g"`
pub fn parse_nutrition(text: &str) -> Nutrition {
    Nutrition {
        calories: capture_number(&CALORIES, text),
        protein: capture_number(&PROTEIN, text),
        carbs: capture_number(&CARBS, text),
        fat: capture_number(&FAT, text),
        fiber: capture_number(&FIBER, text),
        sugar: capture_number(&SUGAR, text),
        sodium: capture_number(&SODIUM, text),
    }
}

/// Where imported recipes get their image from when the export has none.
#[derive(Clone, Copy)]
pub struct ImageBackfill<'a> {
    pub scraper: &'a Scraper,
    pub store: &'a dyn ImageStore,
}

impl ImageBackfill<'_> {
    /// Look up the primary image of `source_url` and copy it into the store.
    /// Failures are logged and leave the recipe without an image.
    async fn fill(&self, source_url: &str, details: &mut Vec<String>) -> Option<String> {
        details.push(format!("  Scraping image from: {source_url}"));
        let found = match self.scraper.find_primary_image(source_url).await {
            Ok(found) => found?,
            Err(e) => {
                warn!("Image lookup failed for {source_url}: {}", e.reason());
                return None;
            }
        };
        details.push(format!("  Found image: {found}"));

        match self.scraper.save_image(self.store, &found).await {
            Ok(stored) => {
                details.push("  Image uploaded".to_string());
                Some(stored)
            }
            Err(e) => {
                warn!("Storing {found} failed: {}", e.reason());
                None
            }
        }
    }
}

/// Import every `.html` export in `dir`.
///
/// Files without a title, or whose title is in `existing_titles` or was
/// already imported earlier in the run, are skipped. An unreadable file is
/// counted as an error and the run carries on; only failing to list the
/// directory aborts.
///
/// With `images`, a recipe that has a source URL but no image gets the
/// source page's primary image copied into the store.
pub async fn import_directory(
    dir: &Path,
    existing_titles: &HashSet<String>,
    images: Option<ImageBackfill<'_>>,
) -> Result<ImportReport, ScrapeError> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".html") {
            files.push(name);
        }
    }
    files.sort();

    let mut report = ImportReport {
        total: files.len(),
        ..Default::default()
    };
    let mut known_titles = existing_titles.clone();

    for file in files {
        report.details.push(format!("Processing: {file}"));

        let html = match tokio::fs::read_to_string(dir.join(&file)).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to read {file}: {e}");
                report.details.push(format!("  ✗ Error: {e}"));
                report.errors += 1;
                continue;
            }
        };

        let Some(mut exported) = parse_exported_recipe(&html) else {
            debug!("No title in {file}");
            report.details.push("  Skipped (no title)".to_string());
            report.skipped += 1;
            continue;
        };

        if !known_titles.insert(exported.recipe.title.clone()) {
            report.details.push("  Already exists, skipping".to_string());
            report.skipped += 1;
            continue;
        }

        if let (Some(backfill), None, Some(source_url)) = (
            images,
            exported.recipe.image.as_ref(),
            exported.recipe.source_url.clone(),
        ) {
            exported.recipe.image = backfill.fill(&source_url, &mut report.details).await;
        }

        report.details.push("  ✓ Imported successfully".to_string());
        report.imported += 1;
        report.recipes.push(exported);
    }

    info!(
        "Import finished: {} imported, {} skipped, {} errors out of {}",
        report.imported, report.skipped, report.errors, report.total
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nutrition_formats() {
        let nutrition = parse_nutrition(
            "Calories: 57kcal, Carbohydrates: 14g, Protein: 1g, Fat: 2g, \
             Fiber: 3g, Sugar: 10g, Sodium: 120mg",
        );
        assert_eq!(
            nutrition,
            Nutrition {
                calories: Some(57),
                protein: Some(1),
                carbs: Some(14),
                fat: Some(2),
                fiber: Some(3),
                sugar: Some(10),
                sodium: Some(120),
            }
        );

        let other = parse_nutrition("calories 300 fat total 12 carbs 40 sugars 5");
        assert_eq!(other.calories, Some(300));
        assert_eq!(other.fat, Some(12));
        assert_eq!(other.carbs, Some(40));
        assert_eq!(other.sugar, Some(5));
        assert_eq!(other.protein, None);
    }

    #[test]
    fn test_labelled_value_needs_following_span() {
        let document = Html::parse_document(
            "<div><b>Prep Time:</b> <span>10 mins</span></div>\
             <div><b>Cook Time:</b> <i>ignored</i><span>20 mins</span></div>",
        );
        assert_eq!(
            labelled_value(&document, "Prep Time:").as_deref(),
            Some("10 mins")
        );
        assert_eq!(labelled_value(&document, "Cook Time:"), None);
        assert_eq!(labelled_value(&document, "Servings:"), None);
    }

    #[test]
    fn test_instructions_split_on_line_breaks_without_paragraphs() {
        let document = Html::parse_document(
            "<div itemprop=\"recipeInstructions\">Boil water.\n\n Add pasta.\nDrain.</div>",
        );
        assert_eq!(
            exported_instructions(&document),
            vec!["Boil water.", "Add pasta.", "Drain."]
        );
    }
}
