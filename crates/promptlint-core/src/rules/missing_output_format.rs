//! Flags prompts that never say what shape the answer should take.

use std::sync::LazyLock;

use super::{Rule, RuleContext};
use crate::error::RuleResult;
use crate::keywords::KeywordSet;
use crate::normalize::NormalizedPrompt;
use crate::report::{Issue, Severity};

/// Words and phrases that describe an output shape.
const FORMAT_TERMS: &[&str] = &[
    "json",
    "yaml",
    "yml",
    "xml",
    "csv",
    "html",
    "markdown",
    "table",
    "tables",
    "bullet",
    "bullets",
    "bulleted",
    "bullet points",
    "list",
    "lists",
    "numbered",
    "schema",
    "format",
    "formatted",
    "template",
    "code block",
];

static FORMAT_KEYWORDS: LazyLock<KeywordSet> = LazyLock::new(|| KeywordSet::new(FORMAT_TERMS));

/// Fires when the prompt names no output format.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingOutputFormat;

impl MissingOutputFormat {
    /// Issue code.
    pub const CODE: &'static str = "missing_output_format";
}

impl Rule for MissingOutputFormat {
    fn code(&self) -> &'static str {
        Self::CODE
    }

    fn evaluate(
        &self,
        prompt: &NormalizedPrompt<'_>,
        _ctx: &RuleContext<'_>,
    ) -> RuleResult<Option<Issue>> {
        if prompt.is_empty() {
            return Ok(None);
        }
        if let Some(term) = FORMAT_KEYWORDS.find_word(prompt.text()) {
            tracing::trace!(term, "output format found");
            return Ok(None);
        }

        Ok(Some(Issue::new(
            Self::CODE,
            Severity::Medium,
            "No output format is specified; responses may be verbose and inconsistent.",
            "Specify the output format explicitly, for example JSON with named fields, \
             a bulleted list, or a table. A fixed shape keeps answers short and easy to parse.",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{AnalyzerConfig, Overrides};

    fn check(text: &str) -> Option<Issue> {
        let profile = AnalyzerConfig::default().resolve(&Overrides::default());
        MissingOutputFormat
            .evaluate(&NormalizedPrompt::new(text), &RuleContext { profile: &profile })
            .unwrap()
    }

    #[test]
    fn fires_without_format_keyword() {
        let issue = check("Summarize this document.").unwrap();
        assert_eq!(issue.code, "missing_output_format");
        assert_eq!(issue.severity, Severity::Medium);
        assert!(issue.fix.starts_with("Specify the output format"));
    }

    #[test]
    fn passes_with_format_keyword() {
        assert!(check("Return the result as a JSON object.").is_none());
        assert!(check("Answer as a bulleted list.").is_none());
        assert!(check("Put the comparison in a Markdown table.").is_none());
        assert!(check("Use this template:\nName: ...").is_none());
    }

    #[test]
    fn ignores_embedded_matches() {
        // "list" inside "specialist", "format" inside "information"
        assert!(check("Ask a specialist for more information.").is_some());
    }

    #[test]
    fn silent_on_empty_prompt() {
        assert!(check("").is_none());
        assert!(check("   \n ").is_none());
    }
}
