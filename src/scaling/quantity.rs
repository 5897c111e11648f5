use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Unicode vulgar fractions understood by the parser, with their exact values
pub const VULGAR_FRACTIONS: [(char, f64); 15] = [
    ('¼', 1.0 / 4.0),
    ('½', 1.0 / 2.0),
    ('¾', 3.0 / 4.0),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('⅕', 1.0 / 5.0),
    ('⅖', 2.0 / 5.0),
    ('⅗', 3.0 / 5.0),
    ('⅘', 4.0 / 5.0),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅛', 1.0 / 8.0),
    ('⅜', 3.0 / 8.0),
    ('⅝', 5.0 / 8.0),
    ('⅞', 7.0 / 8.0),
];

// Alternatives are tried left to right; the first one that is followed by
// whitespace wins.
static QUANTITY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:(?P<whole>[0-9]+)\s*(?P<whole_glyph>[¼½¾⅓⅔⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])|(?P<mixed>[0-9]+)\s+(?P<mixed_num>[0-9]+)/(?P<mixed_den>[0-9]+)|(?P<glyph>[¼½¾⅓⅔⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])|(?P<num>[0-9]+)/(?P<den>[0-9]+)|(?P<decimal>[0-9]+\.[0-9]+)|(?P<integer>[0-9]+))\s+",
    )
    .expect("quantity prefix pattern is valid")
});

/// Leading quantity of an ingredient line.
///
/// When `quantity` is `None`, `remainder` is the whole input and
/// `matched_prefix` is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedQuantity<'a> {
    pub quantity: Option<f64>,
    /// Input with the quantity and its trailing whitespace removed
    pub remainder: &'a str,
    /// Exact text that was consumed
    pub matched_prefix: &'a str,
}

impl<'a> ParsedQuantity<'a> {
    fn unmatched(input: &'a str) -> Self {
        Self {
            quantity: None,
            remainder: input,
            matched_prefix: "",
        }
    }
}

/// Value of a single vulgar fraction glyph
pub fn glyph_value(glyph: char) -> Option<f64> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(g, _)| *g == glyph)
        .map(|(_, value)| *value)
}

fn glyph_str_value(glyph: &str) -> Option<f64> {
    let mut chars = glyph.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => glyph_value(c),
        _ => None,
    }
}

fn ratio(num: &str, den: &str) -> Option<f64> {
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    if den == 0.0 {
        None
    } else {
        Some(num / den)
    }
}

fn group_text<'h>(caps: &Captures<'h>, name: &str) -> &'h str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn group_number(caps: &Captures<'_>, name: &str) -> Option<f64> {
    group_text(caps, name).parse().ok()
}

/// Parse the quantity at the very start of an ingredient line.
///
/// Recognised forms, in priority order: mixed numbers (`2 ½`, `2 1/2`),
/// a lone glyph (`½`), an ASCII fraction (`1/2`), a decimal (`2.5`) and a
/// plain integer. Quantities in the middle of the line are ignored.
pub fn parse_quantity(input: &str) -> ParsedQuantity<'_> {
    let Some(caps) = QUANTITY_PREFIX.captures(input) else {
        return ParsedQuantity::unmatched(input);
    };

    let quantity = if caps.name("whole").is_some() {
        group_number(&caps, "whole")
            .zip(glyph_str_value(group_text(&caps, "whole_glyph")))
            .map(|(whole, frac)| whole + frac)
    } else if caps.name("mixed").is_some() {
        group_number(&caps, "mixed")
            .zip(ratio(
                group_text(&caps, "mixed_num"),
                group_text(&caps, "mixed_den"),
            ))
            .map(|(whole, frac)| whole + frac)
    } else if caps.name("glyph").is_some() {
        glyph_str_value(group_text(&caps, "glyph"))
    } else if caps.name("num").is_some() {
        ratio(group_text(&caps, "num"), group_text(&caps, "den"))
    } else if caps.name("decimal").is_some() {
        group_number(&caps, "decimal")
    } else {
        group_number(&caps, "integer")
    };

    match quantity {
        Some(quantity) if quantity.is_finite() => {
            let end = caps.get(0).map_or(0, |m| m.end());
            ParsedQuantity {
                quantity: Some(quantity),
                remainder: &input[end..],
                matched_prefix: &input[..end],
            }
        }
        _ => ParsedQuantity::unmatched(input),
    }
}
