//! Turn recipe web pages into structured drafts.
//!
//! A page is fetched, its schema.org JSON-LD is read when present, and
//! common recipe markup is used as a fallback. Candidate images are
//! harvested from social-card metadata and `<img>` tags, and ingredient
//! lists can be scaled to a different number of servings.
//!
//! ```no_run
//! use recipe_scraper::{scale_recipe, Scraper};
//!
//! # async fn run() -> Result<(), recipe_scraper::ScrapeError> {
//! let scraper = Scraper::builder().build()?;
//! let draft = scraper.scrape("https://example.com/recipes/pancakes").await?;
//!
//! let doubled = scale_recipe(&draft.ingredients, draft.servings.as_deref(), 8.0);
//! for line in doubled.scaled_ingredients.iter() {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod html;
pub mod images;
pub mod model;
pub mod pipeline;
pub mod scaling;
pub mod storage;
pub mod validation;

pub use archive::{
    import_directory, parse_exported_recipe, ExportedRecipe, ImageBackfill, ImportReport,
};
pub use crate::config::ScraperConfig;
pub use error::{FieldError, ScrapeError};
pub use images::{candidate_images, harvest_images, primary_image};
pub use model::{CandidateImage, Nutrition, ScrapedRecipeDraft};
pub use pipeline::{Scraper, ScraperBuilder};
pub use scaling::{format_quantity, parse_quantity, scale_ingredient, scale_recipe, ScaledRecipe};
pub use storage::{ImageStore, MemoryImageStore};
pub use validation::RecipeInput;
