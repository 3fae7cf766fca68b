//! Token estimation.
//!
//! Tokenizers are selected by string key. Every backend is an estimate of
//! what a provider will bill; none of them is guaranteed exact.
//!
//! - `approx`: `ceil(chars / 4)`, deterministic and dependency-free.
//! - `cl100k` (aliases `cl100k_base`, `openai`): OpenAI cl100k BPE.
//! - `o200k` (alias `o200k_base`): OpenAI o200k BPE.
//!
//! Unknown keys fall back to `approx` rather than failing.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Tokenizer keys understood by [`tokenizer_for`].
pub const AVAILABLE_TOKENIZERS: &[&str] = &["approx", "cl100k", "o200k"];

/// Converts text into an estimated token count.
pub trait Tokenizer: Send + Sync {
    /// Canonical key for this tokenizer.
    fn name(&self) -> &'static str;

    /// Estimate how many tokens `text` will consume.
    fn estimate(&self, text: &str) -> usize;
}

/// Four characters per token, rounded up.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTokenizer;

impl Tokenizer for ApproxTokenizer {
    fn name(&self) -> &'static str {
        "approx"
    }

    fn estimate(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}

/// Byte-pair encoding backed by a pre-built OpenAI vocabulary.
#[derive(Clone, Copy)]
pub struct BpeTokenizer {
    name: &'static str,
    encoding: fn() -> &'static bpe_openai::Tokenizer,
}

impl std::fmt::Debug for BpeTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BpeTokenizer").field("name", &self.name).finish()
    }
}

impl Tokenizer for BpeTokenizer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn estimate(&self, text: &str) -> usize {
        (self.encoding)().count(text)
    }
}

static APPROX: ApproxTokenizer = ApproxTokenizer;

static CL100K: BpeTokenizer = BpeTokenizer {
    name: "cl100k",
    encoding: bpe_openai::cl100k_base,
};

static O200K: BpeTokenizer = BpeTokenizer {
    name: "o200k",
    encoding: bpe_openai::o200k_base,
};

/// Look up a tokenizer by key, falling back to `approx` for unknown keys.
///
/// Keys are matched case-insensitively.
pub fn tokenizer_for(key: &str) -> &'static dyn Tokenizer {
    match key.trim().to_ascii_lowercase().as_str() {
        "approx" | "" => &APPROX,
        "cl100k" | "cl100k_base" | "openai" => &CL100K,
        "o200k" | "o200k_base" => &O200K,
        other => {
            tracing::warn!(
                tokenizer = other,
                available = ?AVAILABLE_TOKENIZERS,
                "unknown tokenizer, falling back to approx"
            );
            &APPROX
        }
    }
}

/// Result of counting tokens in a text.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TokenReport {
    /// Tokenizer that produced the count.
    pub tokenizer: String,
    /// Estimated number of tokens in the normalized text.
    pub count: usize,
    /// Token budget (if provided).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<usize>,
    /// Whether the count exceeds the budget.
    pub over_budget: bool,
}

/// Estimate tokens in `text` after normalization.
///
/// Normalizing first keeps this count identical to the `input_tokens`
/// that a full analysis reports for the same prompt.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn count_tokens(text: &str, tokenizer: &str, budget: Option<usize>) -> TokenReport {
    let backend = tokenizer_for(tokenizer);
    let count = backend.estimate(&normalize(text));
    let over_budget = budget.is_some_and(|max| count > max);

    TokenReport {
        tokenizer: backend.name().to_string(),
        count,
        budget,
        over_budget,
    }
}
