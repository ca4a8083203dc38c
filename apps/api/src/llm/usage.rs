//! Per-call token accounting.
//!
//! Every completed provider call emits one structured log line with model,
//! token counts and estimated USD cost from a static rate table.

use tracing::info;

use crate::llm::TokenUsage;

/// USD per 1M tokens (input, output). Matched by substring, first hit wins,
/// so more specific names must precede their prefixes (gpt-4o-mini before
/// gpt-4o before gpt-4).
const MODEL_RATES: &[(&str, f64, f64)] = &[
    ("gpt-4o-mini", 0.15, 0.60),
    ("gpt-4o", 2.50, 10.00),
    ("gpt-4-turbo", 10.00, 30.00),
    ("gpt-4", 30.00, 60.00),
    ("gpt-3.5-turbo", 0.50, 1.50),
    ("o1-preview", 15.00, 60.00),
    ("o1-mini", 3.00, 12.00),
    ("o3-mini", 3.00, 12.00),
    ("claude-3-5-sonnet", 3.00, 15.00),
    ("claude-sonnet-4", 3.00, 15.00),
    ("claude-3-5-haiku", 0.80, 4.00),
];

/// Estimated USD cost for a call. Unknown models cost 0.0 so accounting
/// never blocks a call path.
pub fn estimated_cost(model: &str, usage: &TokenUsage) -> f64 {
    let model = model.to_lowercase();
    for (key, input_rate, output_rate) in MODEL_RATES {
        if model.contains(key) {
            return (usage.input_tokens as f64 / 1_000_000.0) * input_rate
                + (usage.output_tokens as f64 / 1_000_000.0) * output_rate;
        }
    }
    0.0
}

pub fn log_usage(provider: &str, model: &str, usage: &TokenUsage) {
    info!(
        provider,
        model,
        input_tokens = usage.input_tokens,
        output_tokens = usage.output_tokens,
        cost_usd = estimated_cost(model, usage),
        "provider call completed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_uses_most_specific_rate() {
        let usage = TokenUsage {
            input_tokens: 1_000_000,
            output_tokens: 0,
        };
        // gpt-4o-mini must not match the gpt-4o or gpt-4 rows
        assert!((estimated_cost("gpt-4o-mini", &usage) - 0.15).abs() < 1e-9);
        assert!((estimated_cost("gpt-4o", &usage) - 2.50).abs() < 1e-9);
        assert!((estimated_cost("gpt-4", &usage) - 30.00).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_model_costs_zero() {
        let usage = TokenUsage {
            input_tokens: 500,
            output_tokens: 500,
        };
        assert_eq!(estimated_cost("mystery-model", &usage), 0.0);
    }
}
