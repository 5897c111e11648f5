use crate::error::{FieldError, ScrapeError};
use crate::model::{Nutrition, ScrapedRecipeDraft};
use serde::{Deserialize, Serialize};
use url::Url;

/// A recipe as submitted for saving, whether typed in, scraped or imported
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeInput {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub categories: Vec<String>,
    pub notes: Option<String>,
    pub source_url: Option<String>,
    pub source_author: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub servings: Option<String>,
    pub difficulty: Option<String>,
    #[serde(flatten)]
    pub nutrition: Nutrition,
}

impl RecipeInput {
    /// Prefill a submission from a scraped draft
    pub fn from_draft(draft: ScrapedRecipeDraft, source_url: impl Into<String>) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            image: draft.image,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
            categories: draft.categories,
            notes: draft.notes,
            source_url: Some(source_url.into()),
            source_author: draft.author,
            prep_time: draft.prep_time,
            cook_time: draft.cook_time,
            total_time: draft.total_time,
            servings: draft.servings,
            difficulty: None,
            nutrition: Nutrition::default(),
        }
    }

    /// Check the fields a stored recipe cannot do without.
    ///
    /// Every failing field is reported, not just the first.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if self.ingredients.is_empty() {
            errors.push(FieldError::new(
                "ingredients",
                "At least one ingredient is required",
            ));
        }
        if self.instructions.is_empty() {
            errors.push(FieldError::new(
                "instructions",
                "At least one instruction is required",
            ));
        }
        if let Some(source_url) = self.source_url.as_deref().filter(|url| !url.is_empty()) {
            if Url::parse(source_url).is_err() {
                errors.push(FieldError::new("sourceUrl", "Invalid URL"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ScrapeError::Validation(errors))
        }
    }
}
