//! Rewritten-prompt suggestions.
//!
//! The rewrite is the author's original prompt with one imperative clause
//! appended per distinct actionable issue. Each clause is the first
//! sentence of the issue's fix text.

use crate::report::{Issue, Suggestions};
use crate::rules::RULE_ERROR_CODE;

/// First sentence of a fix text, including its terminating punctuation.
fn first_sentence(fix: &str) -> &str {
    let fix = fix.trim();
    fix.char_indices()
        .find(|&(i, c)| {
            matches!(c, '.' | '!' | '?')
                && fix[i + c.len_utf8()..]
                    .chars()
                    .next()
                    .is_none_or(char::is_whitespace)
        })
        .map_or(fix, |(i, c)| &fix[..i + c.len_utf8()])
}

/// Build the suggestion block for a report.
///
/// `rewritten_prompt` is `None` when the prompt is blank or no actionable
/// issue fired. Clauses keep issue order and are deduplicated by code and
/// by text.
pub fn suggest(original: &str, issues: &[Issue]) -> Suggestions {
    let base = original.trim_end();
    if base.trim().is_empty() {
        return Suggestions::default();
    }

    let mut seen_codes: Vec<&str> = Vec::new();
    let mut clauses: Vec<&str> = Vec::new();
    for issue in issues.iter().filter(|i| i.code != RULE_ERROR_CODE) {
        if seen_codes.contains(&issue.code.as_str()) {
            continue;
        }
        seen_codes.push(&issue.code);
        let clause = first_sentence(&issue.fix);
        if !clause.is_empty() && !clauses.contains(&clause) {
            clauses.push(clause);
        }
    }

    if clauses.is_empty() {
        return Suggestions::default();
    }

    let mut rewritten = String::from(base);
    rewritten.push_str("\n\n");
    rewritten.push_str(&clauses.join("\n"));

    Suggestions {
        rewritten_prompt: Some(rewritten),
    }
}
