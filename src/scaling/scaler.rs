use super::fraction::format_quantity;
use super::quantity::parse_quantity;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("servings pattern is valid"));

// Unit words that read wrong once a single unit is multiplied past one.
// Abbreviations (tsp, tbsp, oz, g...) don't change.
const UNIT_PLURALS: [(&str, &str); 24] = [
    ("cup", "cups"),
    ("tablespoon", "tablespoons"),
    ("teaspoon", "teaspoons"),
    ("pound", "pounds"),
    ("ounce", "ounces"),
    ("clove", "cloves"),
    ("can", "cans"),
    ("pinch", "pinches"),
    ("dash", "dashes"),
    ("slice", "slices"),
    ("stick", "sticks"),
    ("quart", "quarts"),
    ("pint", "pints"),
    ("gallon", "gallons"),
    ("liter", "liters"),
    ("litre", "litres"),
    ("package", "packages"),
    ("bunch", "bunches"),
    ("sprig", "sprigs"),
    ("head", "heads"),
    ("piece", "pieces"),
    ("jar", "jars"),
    ("bottle", "bottles"),
    ("handful", "handfuls"),
];

/// Result of scaling a whole ingredient list
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledRecipe<'a> {
    /// Borrowed from the input when nothing had to change
    pub scaled_ingredients: Cow<'a, [String]>,
    pub scale_factor: f64,
}

fn pluralize_unit<'a>(remainder: &'a str, scaled: f64) -> Cow<'a, str> {
    if scaled <= 1.0 {
        return Cow::Borrowed(remainder);
    }
    let word_end = remainder
        .find(|c: char| !c.is_alphabetic())
        .unwrap_or(remainder.len());
    let (word, rest) = remainder.split_at(word_end);

    match UNIT_PLURALS.iter().find(|(singular, _)| *singular == word) {
        Some((_, plural)) => Cow::Owned(format!("{plural}{rest}")),
        None => Cow::Borrowed(remainder),
    }
}

/// Multiply the leading quantity of one ingredient line.
///
/// Lines without a leading quantity, and any line scaled by exactly 1, are
/// returned as-is.
pub fn scale_ingredient(line: &str, factor: f64) -> Cow<'_, str> {
    if factor == 1.0 {
        return Cow::Borrowed(line);
    }

    let parsed = parse_quantity(line);
    let Some(quantity) = parsed.quantity else {
        return Cow::Borrowed(line);
    };

    let scaled = quantity * factor;
    let remainder = if quantity <= 1.0 {
        pluralize_unit(parsed.remainder, scaled)
    } else {
        Cow::Borrowed(parsed.remainder)
    };

    Cow::Owned(format!("{} {}", format_quantity(scaled), remainder))
}

/// First whole number in a servings description ("Serves 4-6" → 4)
pub fn servings_baseline(servings: &str) -> Option<u32> {
    FIRST_NUMBER
        .find(servings)
        .and_then(|m| m.as_str().parse().ok())
        .filter(|n| *n > 0)
}

/// Scale every ingredient from the recipe's stated servings to `target_servings`.
///
/// Without a usable baseline in `original_servings` the list is returned
/// unchanged with a factor of 1.
pub fn scale_recipe<'a>(
    ingredients: &'a [String],
    original_servings: Option<&str>,
    target_servings: f64,
) -> ScaledRecipe<'a> {
    let unchanged = ScaledRecipe {
        scaled_ingredients: Cow::Borrowed(ingredients),
        scale_factor: 1.0,
    };

    let Some(baseline) = original_servings.and_then(servings_baseline) else {
        return unchanged;
    };

    let scale_factor = target_servings / f64::from(baseline);
    if scale_factor == 1.0 {
        return unchanged;
    }

    let scaled = ingredients
        .iter()
        .map(|line| scale_ingredient(line, scale_factor).into_owned())
        .collect::<Vec<_>>();

    ScaledRecipe {
        scaled_ingredients: Cow::Owned(scaled),
        scale_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_servings_baseline_reads_ascii_digits_only() {
        assert_eq!(servings_baseline("Serves ٤ (4 people)"), Some(4));
        assert_eq!(servings_baseline("٦ servings"), None);
    }

    #[test]
    fn test_scale_ingredient_doubles() {
        assert_eq!(scale_ingredient("2 eggs", 2.0), "4 eggs");
        assert_eq!(scale_ingredient("1/2 tsp salt", 2.0), "1 tsp salt");
        assert_eq!(scale_ingredient("1 1/2 cups milk", 2.0), "3 cups milk");
    }

    #[test]
    fn test_scale_ingredient_produces_glyphs() {
        assert_eq!(scale_ingredient("1 cup sugar", 0.5), "½ cup sugar");
        assert_eq!(scale_ingredient("2 cups flour", 0.75), "1 ½ cups flour");
        assert_eq!(scale_ingredient("1 tbsp oil", 1.0 / 3.0), "⅓ tbsp oil");
    }

    #[test]
    fn test_singular_unit_is_pluralized_past_one() {
        assert_eq!(scale_ingredient("1 cup flour", 2.0), "2 cups flour");
        assert_eq!(scale_ingredient("½ cup flour", 3.0), "1 ½ cups flour");
        assert_eq!(scale_ingredient("1 clove garlic", 3.0), "3 cloves garlic");
        assert_eq!(scale_ingredient("1 cupcake", 2.0), "2 cupcake");
        assert_eq!(scale_ingredient("1 tsp vanilla", 2.0), "2 tsp vanilla");
    }

    #[test]
    fn test_unquantified_lines_are_untouched() {
        let line = "Salt to taste";
        for factor in [0.25, 2.0, 100.0] {
            let scaled = scale_ingredient(line, factor);
            assert!(matches!(scaled, Cow::Borrowed(_)));
            assert_eq!(scaled, line);
        }
        assert_eq!(
            scale_ingredient("Add 2 cups of flour", 2.0),
            "Add 2 cups of flour"
        );
    }

    #[test]
    fn test_factor_one_is_identity() {
        let line = "1 1/2 cups flour";
        let scaled = scale_ingredient(line, 1.0);
        match scaled {
            Cow::Borrowed(s) => assert!(std::ptr::eq(s, line)),
            Cow::Owned(_) => panic!("factor 1 must not allocate"),
        }
    }

    #[test]
    fn test_scale_recipe_by_servings() {
        let ingredients = lines(&["1 cup flour", "2 eggs"]);
        let result = scale_recipe(&ingredients, Some("4 servings"), 8.0);

        assert_eq!(result.scale_factor, 2.0);
        assert_eq!(
            result.scaled_ingredients.as_ref(),
            lines(&["2 cups flour", "4 eggs"]).as_slice()
        );
    }

    #[test]
    fn test_scale_recipe_without_baseline() {
        let ingredients = lines(&["1 cup flour"]);
        for servings in [None, Some("a few"), Some("0 servings")] {
            let result = scale_recipe(&ingredients, servings, 6.0);
            assert_eq!(result.scale_factor, 1.0);
            match result.scaled_ingredients {
                Cow::Borrowed(slice) => assert!(std::ptr::eq(slice, ingredients.as_slice())),
                Cow::Owned(_) => panic!("no baseline must return the input"),
            }
        }
    }

    #[test]
    fn test_scale_recipe_same_servings_borrows() {
        let ingredients = lines(&["1 cup flour"]);
        let result = scale_recipe(&ingredients, Some("Serves 4-6"), 4.0);
        assert_eq!(result.scale_factor, 1.0);
        assert!(matches!(result.scaled_ingredients, Cow::Borrowed(_)));
    }

    #[test]
    fn test_servings_baseline() {
        assert_eq!(servings_baseline("4 servings"), Some(4));
        assert_eq!(servings_baseline("Serves 6 to 8"), Some(6));
        assert_eq!(servings_baseline("one loaf"), None);
    }
}
