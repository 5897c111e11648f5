use crate::html::ParsingContext;
use crate::model::ScrapedRecipeDraft;

mod heuristic;
mod json_ld;

pub use heuristic::HeuristicExtractor;
pub use json_ld::JsonLdExtractor;

/// A strategy for turning a parsed page into a recipe draft.
///
/// `None` means the strategy found nothing it recognises; callers move on
/// to the next one.
pub trait Extractor {
    fn name(&self) -> &'static str;
    fn parse(&self, context: &ParsingContext) -> Option<ScrapedRecipeDraft>;
}
