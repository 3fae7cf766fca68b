//! Quality and efficiency scoring.
//!
//! `overall` starts at 100 and loses a fixed penalty per issue severity.
//! `efficiency` is the share of input tokens not attributed to waste, where
//! each issue contributes a fixed waste estimate by severity and the total
//! is capped at the input size.

use crate::report::{Issue, Scores, Severity};

/// Points subtracted from `overall` for one issue of this severity.
pub const fn penalty(severity: Severity) -> u32 {
    match severity {
        Severity::Low => 5,
        Severity::Medium => 15,
        Severity::High => 30,
        Severity::Critical => 50,
    }
}

/// Tokens attributed to waste for one issue of this severity.
pub const fn waste_tokens(severity: Severity) -> usize {
    match severity {
        Severity::Low => 10,
        Severity::Medium => 40,
        Severity::High => 120,
        Severity::Critical => 300,
    }
}

/// Estimated wasted tokens, never more than `input_tokens`.
pub fn wasted_tokens(issues: &[Issue], input_tokens: usize) -> usize {
    issues
        .iter()
        .map(|i| waste_tokens(i.severity))
        .sum::<usize>()
        .min(input_tokens)
}

/// Compute both scores.
///
/// Adding an issue never raises either score.
pub fn score(issues: &[Issue], input_tokens: usize, wasted_tokens: usize) -> Scores {
    let total_penalty: u32 = issues.iter().map(|i| penalty(i.severity)).sum();
    let overall = 100u32.saturating_sub(total_penalty);

    #[allow(clippy::cast_precision_loss)]
    let ratio = wasted_tokens as f64 / input_tokens.max(1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let waste_pct = (100.0 * ratio).round().clamp(0.0, 100.0) as u32;

    #[allow(clippy::cast_possible_truncation)]
    Scores {
        overall: overall as u8,
        efficiency: (100 - waste_pct) as u8,
    }
}
