/// Lookup keys are the fractional part rounded to three decimals. The order
/// matters: the tolerance pass takes the first entry within range.
const CANONICAL_FRACTIONS: [(f64, &str); 15] = [
    (0.25, "¼"),
    (0.5, "½"),
    (0.75, "¾"),
    (0.333, "⅓"),
    (0.667, "⅔"),
    (0.2, "⅕"),
    (0.4, "⅖"),
    (0.6, "⅗"),
    (0.8, "⅘"),
    (0.167, "⅙"),
    (0.833, "⅚"),
    (0.125, "⅛"),
    (0.375, "⅜"),
    (0.625, "⅝"),
    (0.875, "⅞"),
];

const FRACTION_TOLERANCE: f64 = 0.02;

fn exact_glyph(decimal: f64) -> Option<&'static str> {
    let rounded = (decimal * 1000.0).round() / 1000.0;
    CANONICAL_FRACTIONS
        .iter()
        .find(|(key, _)| (key - rounded).abs() < 1e-9)
        .map(|(_, glyph)| *glyph)
}

fn nearby_glyph(decimal: f64) -> Option<&'static str> {
    CANONICAL_FRACTIONS
        .iter()
        .find(|(key, _)| (key - decimal).abs() < FRACTION_TOLERANCE)
        .map(|(_, glyph)| *glyph)
}

/// Render a quantity the way a cook writes it: `1 ½`, `⅔`, `3`, `2.3`.
///
/// Fractional parts close to one of the fifteen common culinary fractions
/// become the matching glyph; anything else is printed with at most two
/// decimals.
pub fn format_quantity(value: f64) -> String {
    let whole = value.floor();
    let decimal = value - whole;

    if decimal == 0.0 {
        return format!("{whole:.0}");
    }

    if let Some(glyph) = exact_glyph(decimal).or_else(|| nearby_glyph(decimal)) {
        return if whole > 0.0 {
            format!("{whole:.0} {glyph}")
        } else {
            glyph.to_string()
        };
    }

    let fixed = format!("{value:.2}");
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaling::quantity::VULGAR_FRACTIONS;

    #[test]
    fn test_whole_numbers() {
        assert_eq!(format_quantity(0.0), "0");
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(12.0), "12");
    }

    #[test]
    fn test_every_glyph_round_trips() {
        for (glyph, value) in VULGAR_FRACTIONS {
            assert_eq!(format_quantity(value), glyph.to_string(), "value {value}");
            assert_eq!(format_quantity(3.0 + value), format!("3 {glyph}"));
        }
    }

    #[test]
    fn test_tolerance_window() {
        assert_eq!(format_quantity(1.49), "1 ½");
        assert_eq!(format_quantity(0.34), "⅓");
        // 0.32 is within 0.02 of ⅓ only
        assert_eq!(format_quantity(0.32), "⅓");
    }

    #[test]
    fn test_tolerance_prefers_declared_order() {
        // 0.185 is within range of both ⅕ (0.2) and ⅙ (0.167); ⅕ is declared first
        assert_eq!(format_quantity(0.185), "⅕");
    }

    #[test]
    fn test_decimal_fallback_strips_zeros() {
        assert_eq!(format_quantity(2.3), "2.3");
        assert_eq!(format_quantity(2.07), "2.07");
        assert_eq!(format_quantity(0.05), "0.05");
        assert_eq!(format_quantity(2.001), "2");
        assert_eq!(format_quantity(19.999), "20");
    }
}
