use recipe_scraper::scaling::{
    format_quantity, parse_quantity, scale_ingredient, scale_recipe, VULGAR_FRACTIONS,
};
use std::borrow::Cow;

#[test]
fn test_every_glyph_round_trips() {
    for (glyph, value) in VULGAR_FRACTIONS {
        assert_eq!(format_quantity(value), glyph.to_string(), "value {value}");

        let line = format!("{glyph} cup");
        let parsed = parse_quantity(&line);
        assert!((parsed.quantity.unwrap() - value).abs() < 1e-9, "glyph {glyph}");
        assert_eq!(parsed.remainder, "cup");
    }
}

#[test]
fn test_lines_without_leading_quantity_never_change() {
    let lines = [
        "Salt to taste",
        "Add 2 cups of flour",
        "",
        "   ",
        "a pinch of nutmeg",
        "2",
    ];
    for line in lines {
        for factor in [0.25, 0.5, 2.0, 3.0, 100.0] {
            assert_eq!(scale_ingredient(line, factor), line);
        }
    }
}

#[test]
fn test_factor_one_returns_the_same_string() {
    let line = "1 1/2 cups flour";
    match scale_ingredient(line, 1.0) {
        Cow::Borrowed(same) => assert!(std::ptr::eq(same, line)),
        Cow::Owned(_) => panic!("factor 1 must not allocate"),
    }
}

#[test]
fn test_scaled_quantity_parses_back() {
    let quantities = [0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0];
    let factors = [0.5, 1.5, 2.0, 3.0, 0.25];

    for q in quantities {
        for f in factors {
            let line = format!("{} x", format_quantity(q));
            let scaled = scale_ingredient(&line, f);
            let reparsed = parse_quantity(&scaled).quantity.unwrap();
            assert!(
                (reparsed - q * f).abs() < 0.03,
                "{line:?} * {f} gave {scaled:?}"
            );
        }
    }
}

#[test]
fn test_scale_recipe_to_target_servings() {
    let ingredients = vec!["1 cup flour".to_string(), "2 eggs".to_string()];
    let scaled = scale_recipe(&ingredients, Some("4 servings"), 8.0);

    assert_eq!(scaled.scale_factor, 2.0);
    assert_eq!(scaled.scaled_ingredients.as_ref(), ["2 cups flour", "4 eggs"]);
}

#[test]
fn test_scale_recipe_without_baseline_is_a_no_op() {
    let ingredients = vec!["1 cup flour".to_string()];

    for servings in [None, Some("a few"), Some("0 servings")] {
        let scaled = scale_recipe(&ingredients, servings, 12.0);
        assert_eq!(scaled.scale_factor, 1.0);
        assert!(matches!(scaled.scaled_ingredients, Cow::Borrowed(_)));
        assert_eq!(scaled.scaled_ingredients.as_ref(), ingredients.as_slice());
    }
}

#[test]
fn test_scale_down_mixed_numbers() {
    let ingredients = vec![
        "1 ½ cups milk".to_string(),
        "3 tbsp butter".to_string(),
        "Salt to taste".to_string(),
    ];
    let scaled = scale_recipe(&ingredients, Some("Serves 6"), 2.0);

    assert_eq!(
        scaled.scaled_ingredients.as_ref(),
        ["½ cups milk", "1 tbsp butter", "Salt to taste"]
    );
}
