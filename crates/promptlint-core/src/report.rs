//! Report types produced by a single analysis.
//!
//! Field order on every struct is the serialized key order, so a report
//! built from identical inputs always serializes to identical bytes.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::UnknownSeverity;

/// How serious a detected issue is.
///
/// Parsing is case-insensitive; serialization is always lowercase.
/// Variants are ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Severity {
    /// Minor inefficiency.
    Low,
    /// Likely to cost tokens or produce inconsistent output.
    Medium,
    /// Significant waste or ambiguity.
    High,
    /// The prompt is unlikely to work as intended.
    Critical,
}

impl Severity {
    /// Returns the severity as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single detected inefficiency or ambiguity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Issue {
    /// Stable short identifier of the check that produced this issue.
    pub code: String,
    /// How serious the issue is.
    pub severity: Severity,
    /// What was found.
    pub message: String,
    /// How to fix it. The first sentence doubles as the rewrite clause.
    pub fix: String,
}

impl Issue {
    /// Create an issue.
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        fix: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            fix: fix.into(),
        }
    }
}

/// Quality scores, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Scores {
    /// 100 minus the summed severity penalties.
    pub overall: u8,
    /// 100 minus the wasted-token percentage.
    pub efficiency: u8,
}

/// Token usage estimates for the analyzed prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TokenEstimates {
    /// Estimated tokens in the normalized prompt.
    pub input_tokens: usize,
    /// Expected output tokens used for cost projection.
    pub output_tokens_est: usize,
    /// Estimated input tokens attributable to detected issues.
    pub wasted_tokens_est: usize,
}

/// Current-versus-optimized cost projection for one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CostEstimate {
    /// Currency code taken from the model's pricing.
    pub currency: String,
    /// Cost of the prompt as written.
    pub current: f64,
    /// Cost with the wasted input tokens removed.
    pub optimized: f64,
    /// `current - optimized`, never negative.
    pub savings: f64,
    /// Savings as a whole percentage of `current`.
    pub savings_pct: u32,
}

/// Suggested improvements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Suggestions {
    /// Original prompt with one clause appended per actionable issue.
    pub rewritten_prompt: Option<String>,
}

/// Full result of analyzing one prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    /// Model the analysis was resolved against.
    pub model: String,
    /// Quality scores.
    pub scores: Scores,
    /// Token usage estimates.
    pub token_estimates: TokenEstimates,
    /// Cost projection; `null` when the model has no pricing.
    pub cost_estimate: Option<CostEstimate>,
    /// Issues in rule-registration order, followed by budget checks.
    pub issues: Vec<Issue>,
    /// Suggested rewrite.
    pub suggestions: Suggestions,
}

impl Report {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Highest severity among the reported issues, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }
}
