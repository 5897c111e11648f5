use serde::{Deserialize, Serialize};

/// Maximum number of categories carried by a scraped draft
pub const MAX_CATEGORIES: usize = 5;

/// Recipe assembled from a single scraped page.
///
/// Lives for the duration of one scrape request; the caller maps it into
/// whatever persistent record it owns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedRecipeDraft {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Deduplicated, at most [`MAX_CATEGORIES`] entries
    pub categories: Vec<String>,
    pub notes: Option<String>,
    /// Primary image, absolute when it came from the harvester
    pub image: Option<String>,
    /// Every harvested image, best candidates first
    pub images: Vec<String>,
    pub servings: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub author: Option<String>,
}

/// Image offered to the user when picking a picture for a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateImage {
    /// Always absolute
    pub url: String,
    pub alt: Option<String>,
}

/// Nutrition facts per serving, as whole numbers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: Option<u32>,
    pub protein: Option<u32>,
    pub carbs: Option<u32>,
    pub fat: Option<u32>,
    pub fiber: Option<u32>,
    pub sugar: Option<u32>,
    pub sodium: Option<u32>,
}

/// Push `value` unless it is blank or already present, respecting the category cap
pub(crate) fn push_category(categories: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if value.is_empty() || categories.len() >= MAX_CATEGORIES {
        return;
    }
    if !categories.iter().any(|c| c == value) {
        categories.push(value.to_string());
    }
}

/// `None` for blank strings, trimmed text otherwise
pub(crate) fn non_empty(text: impl AsRef<str>) -> Option<String> {
    let text = text.as_ref().trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_category_dedupes_and_caps() {
        let mut categories = Vec::new();
        for value in ["Soup", " Soup ", "", "Dinner", "A", "B", "C", "D"] {
            push_category(&mut categories, value);
        }
        assert_eq!(categories, vec!["Soup", "Dinner", "A", "B", "C"]);
    }

    #[test]
    fn test_draft_serializes_optional_fields() {
        let draft = ScrapedRecipeDraft {
            title: "Soup".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["title"], "Soup");
        assert!(json["description"].is_null());
        assert_eq!(json["images"], serde_json::json!([]));
    }
}
