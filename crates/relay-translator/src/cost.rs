//! Rough pricing for planned translation batches.

use serde::Serialize;

const CHARS_PER_TOKEN: u64 = 4;
/// Translations run slightly longer than their source.
const OUTPUT_EXPANSION: f64 = 1.2;
const INPUT_USD_PER_MILLION: f64 = 3.0;
const OUTPUT_USD_PER_MILLION: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    /// Input tokens across all translations.
    pub input_tokens: u64,
    /// Output tokens across all translations.
    pub output_tokens: f64,
    pub estimated_cost_usd: f64,
    pub cost_per_translation: f64,
}

/// Estimate the cost of translating `content_length` characters into
/// `num_translations` languages. A count of zero is treated as one.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn estimate_cost(content_length: usize, num_translations: u32) -> CostEstimate {
    let translations = num_translations.max(1);

    let input_per_translation = content_length as u64 / CHARS_PER_TOKEN;
    let output_per_translation = input_per_translation as f64 * OUTPUT_EXPANSION;

    let input_tokens = input_per_translation * u64::from(translations);
    let output_tokens = output_per_translation * f64::from(translations);

    let total = input_tokens as f64 / 1_000_000.0 * INPUT_USD_PER_MILLION
        + output_tokens / 1_000_000.0 * OUTPUT_USD_PER_MILLION;

    CostEstimate {
        input_tokens,
        output_tokens,
        estimated_cost_usd: round4(total),
        cost_per_translation: round4(total / f64::from(translations)),
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn four_languages_of_two_thousand_chars() {
        let estimate = estimate_cost(2000, 4);
        assert_eq!(estimate.input_tokens, 2000);
        assert!(approx(estimate.output_tokens, 2400.0));
        assert!(approx(estimate.estimated_cost_usd, 0.042));
        assert!(approx(estimate.cost_per_translation, 0.0105));
    }

    #[test]
    fn single_translation() {
        let estimate = estimate_cost(10_000, 1);
        assert_eq!(estimate.input_tokens, 2500);
        assert!(approx(estimate.output_tokens, 3000.0));
        // 2500 * 3e-6 + 3000 * 15e-6 = 0.0075 + 0.045
        assert!(approx(estimate.estimated_cost_usd, 0.0525));
        assert!(approx(estimate.cost_per_translation, 0.0525));
    }

    #[test]
    fn partial_tokens_are_truncated() {
        assert_eq!(estimate_cost(7, 1).input_tokens, 1);
        assert_eq!(estimate_cost(3, 2).input_tokens, 0);
    }

    #[test]
    fn zero_translations_counts_as_one() {
        assert_eq!(estimate_cost(400, 0), estimate_cost(400, 1));
    }
}
