//! Core library for promptlint.
//!
//! Static analysis of LLM prompts: rule-based issue detection, token
//! estimation, quality scoring, cost projection, and rewrite suggestions.
//! Used by the `promptlint` CLI and MCP server, and by any downstream
//! consumer that wants to lint prompts in-process.
//!
//! # Modules
//!
//! - [`analyzer`] - The analysis pipeline ([`PromptAnalyzer`], [`analyze`])
//! - [`config`] - Configuration loading and management
//! - [`cost`] - Cost projection from pricing
//! - [`error`] - Error types and result aliases
//! - [`keywords`] - Whole-word keyword matching
//! - [`messages`] - Chat messages and retrieved context
//! - [`normalize`] - Prompt normalization
//! - [`profile`] - Defaults, model profiles, and resolution
//! - [`report`] - Report types
//! - [`rules`] - The rule trait, registry, and built-in rules
//! - [`score`] - Quality and efficiency scoring
//! - [`suggest`] - Rewritten-prompt suggestions
//! - [`tokens`] - Token estimation backends
//!
//! # Quick Start
//!
//! ```
//! use promptlint_core::{AnalyzerConfig, AnalyzerDefaults, ModelPricing, ModelProfile, Overrides};
//!
//! let config = AnalyzerConfig::new(
//!     AnalyzerDefaults::default(),
//!     [ModelProfile::new("gpt-4o-mini").with_pricing(ModelPricing::new(0.00015, 0.0006))],
//! )
//! .unwrap();
//!
//! let report = promptlint_core::analyze(
//!     "Summarize this document.",
//!     &config,
//!     &Overrides::default().with_model("gpt-4o-mini"),
//! );
//! assert_eq!(report.scores.overall, 80);
//! ```
#![deny(unsafe_code)]

pub mod analyzer;
pub mod config;
pub mod cost;
pub mod error;
pub mod keywords;
pub mod messages;
pub mod normalize;
pub mod profile;
pub mod report;
pub mod rules;
pub mod score;
pub mod suggest;
pub mod tokens;

pub use analyzer::{PromptAnalyzer, analyze};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{ConfigError, ConfigResult, RuleError, RuleResult};
pub use messages::{ContextChunk, Message, Role};
pub use profile::{
    AnalyzerConfig, AnalyzerDefaults, ModelPricing, ModelProfile, Overrides, ResolvedProfile,
    parse_numeric_override,
};
pub use report::{CostEstimate, Issue, Report, Scores, Severity, Suggestions, TokenEstimates};
pub use rules::{Rule, RuleContext, RuleSet};
pub use tokens::{TokenReport, Tokenizer, count_tokens, tokenizer_for};

/// Default maximum input size in bytes (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
