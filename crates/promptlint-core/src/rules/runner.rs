//! Rule execution with per-rule failure isolation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::{Rule, RuleContext};
use crate::normalize::NormalizedPrompt;
use crate::report::{Issue, Severity};

/// Code of the synthetic issue emitted when a rule fails.
pub const RULE_ERROR_CODE: &str = "rule_error";

/// Evaluate every rule once, in order.
///
/// A rule that returns an error or panics is replaced by a low-severity
/// [`RULE_ERROR_CODE`] issue naming it; the remaining rules still run.
#[tracing::instrument(skip_all, fields(rules = rules.len(), text_len = prompt.text().len()))]
pub(crate) fn run_rules(
    rules: &[Box<dyn Rule>],
    prompt: &NormalizedPrompt<'_>,
    ctx: &RuleContext<'_>,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for rule in rules {
        let code = rule.code();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(prompt, ctx)));
        match outcome {
            Ok(Ok(Some(issue))) => {
                tracing::debug!(rule = code, severity = %issue.severity, "rule fired");
                issues.push(issue);
            }
            Ok(Ok(None)) => tracing::trace!(rule = code, "rule passed"),
            Ok(Err(err)) => {
                tracing::warn!(rule = code, error = %err, "rule failed");
                issues.push(rule_failure(code, &err.to_string()));
            }
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                tracing::warn!(rule = code, reason = %reason, "rule panicked");
                issues.push(rule_failure(code, &reason));
            }
        }
    }

    issues
}

fn rule_failure(code: &str, reason: &str) -> Issue {
    Issue::new(
        RULE_ERROR_CODE,
        Severity::Low,
        format!("Rule '{code}' failed and was skipped: {reason}"),
        format!("Report the '{code}' failure to the rule author; the other checks ran normally."),
    )
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panicked".to_string())
}
