//! The analysis pipeline.
//!
//! [`PromptAnalyzer::analyze`] runs, in order: profile resolution,
//! normalization, token estimation, the rule set, budget checks, scoring,
//! cost projection, and suggestion building. Every step is a pure function
//! of its inputs, so identical inputs always produce identical reports.

use crate::cost::estimate_cost;
use crate::messages::{ContextChunk, FlattenedPrompt, Message};
use crate::normalize::{NormalizedPrompt, normalize};
use crate::profile::{AnalyzerConfig, Overrides, ResolvedProfile};
use crate::report::{Issue, Report, Severity, TokenEstimates};
use crate::rules::{RuleContext, RuleSet};
use crate::score::{score, wasted_tokens};
use crate::suggest::suggest;
use crate::tokens::tokenizer_for;

/// Issue code for prompts larger than the input token budget.
pub const INPUT_OVER_BUDGET: &str = "input_over_budget";

/// Issue code for calls that would not fit the model's context window.
pub const CONTEXT_WINDOW_EXCEEDED: &str = "context_window_exceeded";

/// Analyzes prompts against a fixed configuration and rule set.
///
/// Cheap to share: analysis takes `&self` and keeps no per-call state.
#[derive(Debug, Default)]
pub struct PromptAnalyzer {
    config: AnalyzerConfig,
    rules: RuleSet,
}

impl PromptAnalyzer {
    /// An analyzer running the built-in rules.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            rules: RuleSet::core(),
        }
    }

    /// Replace the rule set.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// The configuration this analyzer resolves profiles against.
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The registered rules.
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Analyze one prompt.
    ///
    /// Never fails: unknown models fall back to defaults, unknown
    /// tokenizers fall back to `approx`, and failing rules are reported as
    /// `rule_error` issues.
    #[tracing::instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub fn analyze(&self, prompt: &str, overrides: &Overrides) -> Report {
        self.run(prompt, prompt, "", overrides)
    }

    /// Analyze a conversation plus retrieved context.
    ///
    /// Rules see all messages joined in order. Context chunks add to the
    /// input token estimate but are not linted. The rewrite starts from
    /// the user messages, or from the whole conversation if there are none.
    #[tracing::instrument(skip_all, fields(messages = messages.len(), chunks = context.len()))]
    pub fn analyze_messages(
        &self,
        messages: &[Message],
        context: &[ContextChunk],
        overrides: &Overrides,
    ) -> Report {
        let flat = FlattenedPrompt::new(messages, context);
        self.run(
            &flat.joined_text,
            flat.rewrite_base(),
            &flat.context_text,
            overrides,
        )
    }

    fn run(
        &self,
        prompt: &str,
        rewrite_base: &str,
        context: &str,
        overrides: &Overrides,
    ) -> Report {
        let profile = self.config.resolve(overrides);
        let normalized = NormalizedPrompt::new(prompt);
        let tokenizer = tokenizer_for(&profile.tokenizer);
        let input_tokens = tokenizer
            .estimate(normalized.text())
            .saturating_add(tokenizer.estimate(&normalize(context)));

        let mut issues = self
            .rules
            .run(&normalized, &RuleContext { profile: &profile });
        issues.extend(budget_issues(&profile, input_tokens));

        let wasted = wasted_tokens(&issues, input_tokens);
        let scores = score(&issues, input_tokens, wasted);
        let cost_estimate = estimate_cost(
            profile.pricing.as_ref(),
            input_tokens,
            profile.expected_output_tokens,
            wasted,
        );
        let suggestions = suggest(rewrite_base, &issues);

        tracing::info!(
            model = %profile.model,
            input_tokens,
            wasted_tokens = wasted,
            issues = issues.len(),
            overall = scores.overall,
            efficiency = scores.efficiency,
            "prompt analyzed"
        );

        Report {
            model: profile.model,
            scores,
            token_estimates: TokenEstimates {
                input_tokens,
                output_tokens_est: profile.expected_output_tokens,
                wasted_tokens_est: wasted,
            },
            cost_estimate,
            issues,
            suggestions,
        }
    }
}

/// Analyze one prompt with the built-in rules.
pub fn analyze(prompt: &str, config: &AnalyzerConfig, overrides: &Overrides) -> Report {
    PromptAnalyzer::new(config.clone()).analyze(prompt, overrides)
}

fn budget_issues(profile: &ResolvedProfile, input_tokens: usize) -> Vec<Issue> {
    let mut issues = Vec::new();

    let max_input = profile.max_input_tokens;
    if input_tokens > max_input {
        issues.push(Issue::new(
            INPUT_OVER_BUDGET,
            Severity::Medium,
            format!("Prompt uses about {input_tokens} tokens, over the {max_input}-token input budget."),
            format!(
                "Shorten the prompt to under {max_input} tokens. Remove repeated context, \
                 boilerplate, and examples the model does not need."
            ),
        ));
    }

    let window = profile.context_window_tokens;
    let needed = input_tokens.saturating_add(profile.expected_output_tokens);
    if window > 0 && needed > window {
        issues.push(Issue::new(
            CONTEXT_WINDOW_EXCEEDED,
            Severity::High,
            format!(
                "Prompt plus expected output needs about {needed} tokens, more than the \
                 {window}-token context window of '{}'.",
                profile.model
            ),
            format!(
                "Cut the prompt and expected output to fit in {window} tokens. \
                 Split the work into smaller calls if it cannot be shortened."
            ),
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{AnalyzerDefaults, ModelPricing, ModelProfile};

    fn config() -> AnalyzerConfig {
        AnalyzerConfig::new(
            AnalyzerDefaults::default(),
            [
                ModelProfile::new("gpt-4o-mini")
                    .with_context_window(128_000)
                    .with_pricing(ModelPricing::new(0.00015, 0.0006)),
                ModelProfile::new("tiny").with_context_window(100),
            ],
        )
        .unwrap()
    }

    fn mini() -> Overrides {
        Overrides::default()
            .with_model("gpt-4o-mini")
            .with_expected_output_tokens(300)
    }

    fn codes(report: &Report) -> Vec<&str> {
        report.issues.iter().map(|i| i.code.as_str()).collect()
    }

    #[test]
    fn vague_prompt_fires_both_baseline_rules() {
        let report = analyze("Summarize this document.", &config(), &mini());
        assert_eq!(codes(&report), vec!["missing_output_format", "no_output_limit"]);
        assert_eq!(report.scores.overall, 80);
        assert_eq!(report.model, "gpt-4o-mini");
        assert_eq!(report.token_estimates.input_tokens, 6);
        assert_eq!(report.token_estimates.output_tokens_est, 300);
        // 50 waste capped at 6 input tokens
        assert_eq!(report.token_estimates.wasted_tokens_est, 6);
        assert_eq!(report.scores.efficiency, 0);

        let cost = report.cost_estimate.as_ref().unwrap();
        assert_eq!(cost.currency, "USD");
        assert!(cost.current > cost.optimized);

        let rewrite = report.suggestions.rewritten_prompt.as_deref().unwrap();
        assert!(rewrite.starts_with("Summarize this document.\n\n"));
        assert!(rewrite.contains("Specify the output format explicitly"));
        assert!(rewrite.contains("Keep the response under 300 tokens."));
    }

    #[test]
    fn specific_prompt_is_clean() {
        let report = analyze(
            "Return the result as a JSON object with at most 50 words.",
            &config(),
            &mini(),
        );
        assert!(report.issues.is_empty());
        assert_eq!(report.scores.overall, 100);
        assert_eq!(report.scores.efficiency, 100);
        assert_eq!(report.token_estimates.wasted_tokens_est, 0);
        assert!(report.suggestions.rewritten_prompt.is_none());
    }

    #[test]
    fn oversized_prompt_is_over_budget() {
        let overrides = mini().with_max_input_tokens(5);
        let report = analyze(
            "Return the result as a JSON object with at most 50 words.",
            &config(),
            &overrides,
        );
        assert_eq!(codes(&report), vec![INPUT_OVER_BUDGET]);
        assert_eq!(report.issues[0].severity, Severity::Medium);
        assert_eq!(report.scores.overall, 85);
    }

    #[test]
    fn unknown_model_falls_back_without_cost() {
        let overrides = Overrides::default().with_model("nonexistent-model");
        let report = analyze("Summarize this document.", &config(), &overrides);
        assert_eq!(report.model, "nonexistent-model");
        assert!(report.cost_estimate.is_none());
        assert_eq!(report.token_estimates.output_tokens_est, 300);
    }

    #[test]
    fn context_window_is_enforced() {
        let overrides = Overrides::default().with_model("tiny");
        let report = analyze("Answer in JSON, briefly.", &config(), &overrides);
        assert_eq!(codes(&report), vec![CONTEXT_WINDOW_EXCEEDED]);
        assert_eq!(report.issues[0].severity, Severity::High);
    }

    #[test]
    fn empty_prompt_is_safe() {
        let report = analyze("", &config(), &mini());
        assert_eq!(report.token_estimates.input_tokens, 0);
        assert!(report.issues.is_empty());
        assert!(report.suggestions.rewritten_prompt.is_none());
        assert_eq!(report.scores.overall, 100);
        assert_eq!(report.scores.efficiency, 100);
    }

    #[test]
    fn analysis_is_deterministic() {
        let analyzer = PromptAnalyzer::new(config());
        let prompt = "Explain\n\nquantum computing   to a child.";
        let first = analyzer.analyze(prompt, &mini()).to_json().unwrap();
        for _ in 0..5 {
            assert_eq!(analyzer.analyze(prompt, &mini()).to_json().unwrap(), first);
        }
    }

    #[test]
    fn whitespace_does_not_change_token_count() {
        let analyzer = PromptAnalyzer::new(config());
        let a = analyzer.analyze("Summarize this document.", &mini());
        let b = analyzer.analyze("  Summarize\n\n  this   document.\n", &mini());
        assert_eq!(a.token_estimates.input_tokens, b.token_estimates.input_tokens);
        assert_eq!(codes(&a), codes(&b));
    }

    #[test]
    fn report_serializes_expected_keys_in_order() {
        let report = analyze("Summarize this document.", &config(), &mini());
        let json = report.to_json().unwrap();
        let positions: Vec<usize> = [
            "\"model\"",
            "\"scores\"",
            "\"token_estimates\"",
            "\"cost_estimate\"",
            "\"issues\"",
            "\"suggestions\"",
        ]
        .iter()
        .map(|key| json.find(key).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["issues"][0]["severity"], "medium");
    }

    #[test]
    fn missing_pricing_serializes_null_cost() {
        let report = analyze("Hi", &AnalyzerConfig::default(), &Overrides::default());
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert!(value["cost_estimate"].is_null());
        assert!(value["suggestions"].get("rewritten_prompt").is_some());
    }

    #[test]
    fn custom_rule_set_is_used() {
        let analyzer = PromptAnalyzer::new(config()).with_rules(RuleSet::empty());
        let report = analyzer.analyze("Summarize this document.", &mini());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn scores_stay_in_bounds() {
        let analyzer = PromptAnalyzer::new(config());
        let long = "word ".repeat(5000);
        for prompt in ["", "x", "Summarize.", long.as_str()] {
            let report = analyzer.analyze(prompt, &mini().with_max_input_tokens(1));
            assert!(report.scores.overall <= 100);
            assert!(report.scores.efficiency <= 100);
            assert!(report.token_estimates.wasted_tokens_est <= report.token_estimates.input_tokens);
        }
    }

    #[test]
    fn single_user_message_matches_plain_prompt() {
        let analyzer = PromptAnalyzer::new(config());
        let plain = analyzer.analyze("Summarize this document.", &mini());
        let chat =
            analyzer.analyze_messages(&[Message::user("Summarize this document.")], &[], &mini());
        assert_eq!(plain.to_json().unwrap(), chat.to_json().unwrap());
    }

    #[test]
    fn system_and_user_messages_are_linted_together() {
        let analyzer = PromptAnalyzer::new(config());
        let report = analyzer.analyze_messages(
            &[
                Message::system("Always answer in JSON."),
                Message::user("List three risks in at most 50 words."),
            ],
            &[],
            &mini(),
        );
        assert!(report.issues.is_empty());
        assert!(report.suggestions.rewritten_prompt.is_none());
    }

    #[test]
    fn context_chunks_count_tokens_but_are_not_linted() {
        let analyzer = PromptAnalyzer::new(config());
        let report = analyzer.analyze_messages(
            &[Message::user("Summarize this document.")],
            &[ContextChunk::new("Reply in JSON."), ContextChunk::new("  ")],
            &mini(),
        );
        // 6 prompt tokens + 4 context tokens
        assert_eq!(report.token_estimates.input_tokens, 10);
        assert_eq!(codes(&report), vec!["missing_output_format", "no_output_limit"]);
    }

    #[test]
    fn message_rewrite_starts_from_user_text() {
        let analyzer = PromptAnalyzer::new(config());
        let report = analyzer.analyze_messages(
            &[
                Message::system("You are terse."),
                Message::user("Summarize this document."),
            ],
            &[],
            &mini(),
        );
        let rewritten = report.suggestions.rewritten_prompt.unwrap();
        assert!(rewritten.starts_with("Summarize this document.\n\n"));
        assert!(!rewritten.contains("You are terse."));
    }

    #[test]
    fn empty_conversation_is_safe() {
        let report = PromptAnalyzer::new(config()).analyze_messages(&[], &[], &mini());
        assert_eq!(report.token_estimates.input_tokens, 0);
        assert!(report.issues.is_empty());
        assert!(report.suggestions.rewritten_prompt.is_none());
    }
}
