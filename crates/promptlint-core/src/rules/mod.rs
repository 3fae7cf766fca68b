//! Prompt rules and the rule registry.
//!
//! A rule inspects the normalized prompt and the resolved profile and
//! optionally emits one [`Issue`]. Rules are stateless; a [`RuleSet`] is an
//! ordered registry that runs each of them exactly once per analysis and
//! keeps their issues in registration order.
//!
//! Adding a rule means implementing [`Rule`] and registering it with
//! [`RuleSet::with_rule`]; the runner itself never changes.

pub mod missing_output_format;
pub mod no_output_limit;
mod runner;

pub use missing_output_format::MissingOutputFormat;
pub use no_output_limit::NoOutputLimit;
pub use runner::RULE_ERROR_CODE;

use crate::error::RuleResult;
use crate::normalize::NormalizedPrompt;
use crate::profile::ResolvedProfile;
use crate::report::Issue;

/// Read-only inputs a rule may consult besides the prompt itself.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Effective model settings for this analysis.
    pub profile: &'a ResolvedProfile,
}

/// A single stateless prompt check.
pub trait Rule: Send + Sync {
    /// Stable identifier, used as the code of every issue this rule emits.
    fn code(&self) -> &'static str;

    /// Inspect the prompt.
    ///
    /// Must handle any input, including an empty prompt, without panicking.
    /// An `Err` is reported as a low-severity `rule_error` issue.
    fn evaluate(
        &self,
        prompt: &NormalizedPrompt<'_>,
        ctx: &RuleContext<'_>,
    ) -> RuleResult<Option<Issue>>;
}

/// Ordered registry of rules.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::core()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.codes()).finish()
    }
}

impl RuleSet {
    /// A registry with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in rules, in their fixed order.
    pub fn core() -> Self {
        Self::empty()
            .with_rule(MissingOutputFormat)
            .with_rule(NoOutputLimit)
    }

    /// Append a rule; it runs after every rule registered before it.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Codes of the registered rules, in run order.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.code())
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule once and collect their issues in registration order.
    pub fn run(&self, prompt: &NormalizedPrompt<'_>, ctx: &RuleContext<'_>) -> Vec<Issue> {
        runner::run_rules(&self.rules, prompt, ctx)
    }
}
