use super::Extractor;
use crate::html::{element_text, raw_text, HtmlTree, ParsingContext};
use crate::model::{non_empty, push_category, ScrapedRecipeDraft};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// Best-effort extraction from common recipe markup, for pages without
/// structured data. Never fails; missing pieces stay empty.
pub struct HeuristicExtractor;

/// Ordered fallbacks: the first selector yielding any text wins, later ones
/// are not consulted.
const INGREDIENT_SELECTORS: &[&str] = &[
    ".ingredient",
    ".recipe-ingredient",
    r#"[itemprop="recipeIngredient"]"#,
    ".ingredients li",
    ".ingredient-list li",
];

const INSTRUCTION_SELECTORS: &[&str] = &[
    ".instruction",
    ".recipe-instruction",
    r#"[itemprop="recipeInstructions"]"#,
    ".instructions li",
    ".instruction-list li",
    ".steps li",
    ".directions li",
];

/// Containers whose raw text is split into numbered steps when no
/// instruction selector matched
const INSTRUCTION_CONTAINERS: &[&str] = &[
    r#"[itemprop="recipeInstructions"]"#,
    ".instructions",
    ".directions",
    ".steps",
    ".method",
];

const CATEGORY_SELECTORS: &str = r#".recipe-category, .category, .tag, [rel="category tag"]"#;

// Recipe plugin class names (WordPress Recipe Maker, Tasty Recipes,
// Mediavine Create, WP Zoom...) for the fields the generic markup lacks.
const NOTES_CLASSES: &[&str] = &[
    "wprm-recipe-notes",
    "recipe-notes",
    "tasty-recipes-notes",
    "mv-create-notes",
    "recipe-card-notes",
    "wpzoom-recipe-notes",
    "recipe-tips",
    "recipe-card-tips",
    "recipe-footnotes",
];

const SERVINGS_CLASSES: &[&str] = &[
    "wprm-recipe-servings",
    "recipe-yield",
    "recipe-servings",
    "tasty-recipes-yield",
    "mv-create-yield",
    "recipe-card-servings",
    "wpzoom-recipe-servings",
    "recipe-card-yield",
];

const PREP_TIME_CLASSES: &[&str] = &[
    "wprm-recipe-prep_time-container",
    "wprm-recipe-prep-time",
    "recipe-prep-time",
    "prep-time",
    "tasty-recipes-prep-time",
    "mv-create-time-prep",
];

const COOK_TIME_CLASSES: &[&str] = &[
    "wprm-recipe-cook_time-container",
    "wprm-recipe-cook-time",
    "recipe-cook-time",
    "cook-time",
    "tasty-recipes-cook-time",
    "mv-create-time-active",
];

const TOTAL_TIME_CLASSES: &[&str] = &[
    "wprm-recipe-total_time-container",
    "wprm-recipe-total-time",
    "recipe-total-time",
    "total-time",
    "tasty-recipes-total-time",
    "mv-create-time-total",
];

const MAX_TAG_LENGTH: usize = 30;
const MIN_STEP_LENGTH: usize = 10;

static STEP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9]+\.|step [0-9]+").expect("step marker pattern is valid"));

/// Texts of every match of the first selector that yields at least one
fn first_matching_list(tree: &impl HtmlTree, selectors: &[&str]) -> Vec<String> {
    for selector in selectors {
        let items: Vec<String> = tree
            .find_all(selector)
            .iter()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();
        if !items.is_empty() {
            debug!("HeuristicExtractor: {} items via {selector}", items.len());
            return items;
        }
    }
    Vec::new()
}

/// Text of the first non-empty element among the given class names
fn first_class_text(tree: &impl HtmlTree, classes: &[&str]) -> Option<String> {
    classes
        .iter()
        .find_map(|class_name| tree.first_text(&format!(".{class_name}")))
}

fn split_numbered_steps(text: &str) -> Vec<String> {
    STEP_MARKER
        .split(text)
        .map(str::trim)
        .filter(|step| step.chars().count() > MIN_STEP_LENGTH)
        .map(str::to_string)
        .collect()
}

impl HeuristicExtractor {
    fn title(&self, tree: &impl HtmlTree) -> String {
        tree.first_text("h1")
            .or_else(|| tree.first_text("title"))
            .unwrap_or_default()
    }

    fn description(&self, tree: &impl HtmlTree) -> Option<String> {
        tree.meta_content("name", "description")
            .or_else(|| tree.meta_content("property", "og:description"))
            .or_else(|| tree.first_text("p"))
    }

    fn categories(&self, tree: &impl HtmlTree) -> Vec<String> {
        let mut categories = Vec::new();

        for tag in tree.find_all(r#"meta[property="article:tag"]"#) {
            if let Some(content) = tag.value().attr("content") {
                push_category(&mut categories, content);
            }
        }

        if let Some(keywords) = tree.meta_content("name", "keywords") {
            keywords
                .split(',')
                .map(str::trim)
                .filter(|k| k.chars().count() < MAX_TAG_LENGTH)
                .for_each(|k| push_category(&mut categories, k));
        }

        tree.find_all(CATEGORY_SELECTORS)
            .iter()
            .map(element_text)
            .filter(|text| text.chars().count() < MAX_TAG_LENGTH)
            .for_each(|text| push_category(&mut categories, &text));

        categories
    }

    fn instructions(&self, tree: &impl HtmlTree) -> Vec<String> {
        let steps = first_matching_list(tree, INSTRUCTION_SELECTORS);
        if !steps.is_empty() {
            return steps;
        }

        for container in INSTRUCTION_CONTAINERS {
            if let Some(element) = tree.find_first(container) {
                let steps = split_numbered_steps(&raw_text(&element));
                if !steps.is_empty() {
                    debug!(
                        "HeuristicExtractor: split {} numbered steps from {container}",
                        steps.len()
                    );
                    return steps;
                }
            }
        }
        Vec::new()
    }
}

impl Extractor for HeuristicExtractor {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn parse(&self, context: &ParsingContext) -> Option<ScrapedRecipeDraft> {
        debug!("HeuristicExtractor: Scanning markup of {}", context.url);
        let document = &context.document;

        let draft = ScrapedRecipeDraft {
            title: self.title(document),
            description: self.description(document).and_then(non_empty),
            ingredients: first_matching_list(document, INGREDIENT_SELECTORS),
            instructions: self.instructions(document),
            categories: self.categories(document),
            notes: first_class_text(document, NOTES_CLASSES),
            image: None,
            images: Vec::new(),
            servings: first_class_text(document, SERVINGS_CLASSES),
            prep_time: first_class_text(document, PREP_TIME_CLASSES),
            cook_time: first_class_text(document, COOK_TIME_CLASSES),
            total_time: first_class_text(document, TOTAL_TIME_CLASSES),
            author: document
                .meta_content("name", "author")
                .or_else(|| document.first_text(r#"[rel="author"]"#)),
        };

        debug!(
            "HeuristicExtractor: title {:?}, {} ingredients, {} instructions",
            draft.title,
            draft.ingredients.len(),
            draft.instructions.len()
        );
        Some(draft)
    }
}
