//! Cost projection from token estimates and model pricing.

use crate::profile::ModelPricing;
use crate::report::CostEstimate;

/// Monetary values are rounded to this many decimal places.
pub const MONEY_DECIMALS: i32 = 8;

fn round_money(value: f64) -> f64 {
    let scale = 10f64.powi(MONEY_DECIMALS);
    (value * scale).round() / scale
}

#[allow(clippy::cast_precision_loss)]
fn price(pricing: &ModelPricing, input_tokens: usize, output_tokens: usize) -> f64 {
    (input_tokens as f64 / 1000.0).mul_add(
        pricing.input_per_1k,
        output_tokens as f64 / 1000.0 * pricing.output_per_1k,
    )
}

/// Project the cost of one call, and of the same call with waste removed.
///
/// Returns `None` when no pricing is available. No currency conversion is
/// performed; the estimate carries the pricing's currency.
pub fn estimate_cost(
    pricing: Option<&ModelPricing>,
    input_tokens: usize,
    output_tokens: usize,
    wasted_tokens: usize,
) -> Option<CostEstimate> {
    let pricing = pricing?;

    let current = price(pricing, input_tokens, output_tokens);
    let optimized = price(
        pricing,
        input_tokens.saturating_sub(wasted_tokens),
        output_tokens,
    );
    let savings = (current - optimized).max(0.0);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let savings_pct = if current > 0.0 {
        (100.0 * savings / current).round() as u32
    } else {
        0
    };

    Some(CostEstimate {
        currency: pricing.currency.clone(),
        current: round_money(current),
        optimized: round_money(optimized),
        savings: round_money(savings),
        savings_pct,
    })
}
