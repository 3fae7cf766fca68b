//! Flags prompts that put no bound on response length.

use std::sync::LazyLock;

use regex::Regex;

use super::{Rule, RuleContext};
use crate::error::RuleResult;
use crate::keywords::KeywordSet;
use crate::normalize::NormalizedPrompt;
use crate::report::{Issue, Severity};

/// A number followed by a length unit: "50 words", "3 bullet points".
static NUMERIC_LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+\s*(?:words?|tokens?|lines?|sentences?|paragraphs?|bullet points?|bullets?|characters?|chars?|items?|points?|pages?)\b",
    )
    .expect("valid regex")
});

/// Qualitative length bounds.
const LIMIT_PHRASES: &[&str] = &[
    "briefly",
    "brief",
    "concise",
    "concisely",
    "succinct",
    "succinctly",
    "no more than",
    "at most",
    "maximum",
    "max",
    "limit",
    "one sentence",
    "one line",
    "one paragraph",
    "one word",
    "single sentence",
    "single paragraph",
];

static LIMIT_KEYWORDS: LazyLock<KeywordSet> = LazyLock::new(|| KeywordSet::new(LIMIT_PHRASES));

/// Fires when the prompt has neither a numeric nor a qualitative length bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOutputLimit;

impl NoOutputLimit {
    /// Issue code.
    pub const CODE: &'static str = "no_output_limit";
}

impl Rule for NoOutputLimit {
    fn code(&self) -> &'static str {
        Self::CODE
    }

    fn evaluate(
        &self,
        prompt: &NormalizedPrompt<'_>,
        ctx: &RuleContext<'_>,
    ) -> RuleResult<Option<Issue>> {
        let text = prompt.text();
        if text.is_empty() || NUMERIC_LIMIT.is_match(text) || LIMIT_KEYWORDS.contains_word(text) {
            return Ok(None);
        }

        let budget = ctx.profile.expected_output_tokens;
        let lead = if budget > 0 {
            format!("Keep the response under {budget} tokens.")
        } else {
            "Keep the response brief.".to_string()
        };

        Ok(Some(Issue::new(
            Self::CODE,
            Severity::Low,
            "No output length limit is set; the model may produce more tokens than needed.",
            format!(
                "{lead} Add an explicit maximum length or token budget, such as 'at most 150 words'."
            ),
        )))
    }
}
