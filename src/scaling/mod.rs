//! Ingredient quantity parsing, fraction formatting and recipe scaling.
//!
//! Everything here is pure: no I/O, no shared state.

mod fraction;
mod quantity;
mod scaler;

pub use fraction::format_quantity;
pub use quantity::{glyph_value, parse_quantity, ParsedQuantity, VULGAR_FRACTIONS};
pub use scaler::{scale_ingredient, scale_recipe, servings_baseline, ScaledRecipe};
