//! Analyze command — full prompt report with optional quality gates.

use anyhow::bail;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use promptlint_core::{
    AnalyzerConfig, Overrides, PromptAnalyzer, Report, Severity, parse_numeric_override,
};

use super::PromptSource;

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Prompt to analyze.
    #[command(flatten)]
    pub source: PromptSource,

    /// Model profile to analyze against.
    #[arg(long, short)]
    pub model: Option<String>,

    /// Tokenizer override (approx, cl100k, o200k).
    #[arg(long)]
    pub tokenizer: Option<String>,

    /// Expected output tokens (non-numeric or negative values use the default).
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub expected_output: Option<String>,

    /// Advisory input token budget (non-numeric or non-positive values use the default).
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub max_input: Option<String>,

    /// Fail when any issue is at or above this severity.
    #[arg(long, value_enum, ignore_case = true, value_name = "SEVERITY")]
    pub fail_on: Option<Severity>,

    /// Fail when the overall score is below this value (0–100).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_score: Option<u8>,
}

impl AnalyzeArgs {
    /// Per-call overrides from the command line.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            model: self.model.clone(),
            tokenizer: self.tokenizer.clone(),
            expected_output_tokens: self
                .expected_output
                .as_deref()
                .and_then(parse_numeric_override),
            max_input_tokens: self.max_input.as_deref().and_then(parse_numeric_override),
        }
    }
}

/// Gate thresholds after falling back to configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gates {
    /// Severity gate.
    pub fail_on: Option<Severity>,
    /// Overall-score gate.
    pub min_score: Option<u8>,
}

impl Gates {
    /// The first gate failure for a report, if any.
    pub fn check(&self, report: &Report) -> Option<String> {
        if let Some(threshold) = self.fail_on
            && let Some(worst) = report.max_severity()
            && worst >= threshold
        {
            let count = report.issues.iter().filter(|i| i.severity >= threshold).count();
            return Some(format!(
                "{count} issue(s) at or above {threshold} severity (worst: {worst})"
            ));
        }
        if let Some(min) = self.min_score
            && report.scores.overall < min
        {
            return Some(format!(
                "overall score {} is below minimum {min}",
                report.scores.overall
            ));
        }
        None
    }
}

/// Analyze a prompt and print the report.
#[instrument(name = "cmd_analyze", skip_all, fields(source = %args.source.label()))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    analyzer_config: AnalyzerConfig,
    config_gates: Gates,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(
        model = ?args.model,
        tokenizer = ?args.tokenizer,
        fail_on = ?args.fail_on,
        min_score = ?args.min_score,
        "executing analyze command"
    );

    let prompt = args.source.read(max_input_bytes)?;
    let gates = Gates {
        fail_on: args.fail_on.or(config_gates.fail_on),
        min_score: args.min_score.or(config_gates.min_score),
    };

    let report = PromptAnalyzer::new(analyzer_config).analyze(&prompt, &args.overrides());

    if global_json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&args.source.label(), &report);
    }

    if let Some(failure) = gates.check(&report) {
        bail!("{}: {failure}", args.source.label());
    }

    Ok(())
}

fn severity_label(severity: Severity) -> String {
    let tag = format!("[{severity}]");
    match severity {
        Severity::Low => tag.dimmed().to_string(),
        Severity::Medium => tag.yellow().to_string(),
        Severity::High => tag.red().to_string(),
        Severity::Critical => tag.red().bold().to_string(),
    }
}

fn score_label(score: u8) -> String {
    if score >= 80 {
        score.green().to_string()
    } else if score >= 60 {
        score.yellow().to_string()
    } else {
        score.red().to_string()
    }
}

fn print_report(label: &str, report: &Report) {
    println!("{} ({})", label.bold(), report.model.cyan());

    println!(
        "\n  {} overall {}/100, efficiency {}/100",
        "Scores:".cyan(),
        score_label(report.scores.overall),
        score_label(report.scores.efficiency),
    );

    let tokens = &report.token_estimates;
    println!(
        "  {} {} input, {} expected output, ~{} wasted",
        "Tokens:".cyan(),
        tokens.input_tokens,
        tokens.output_tokens_est,
        tokens.wasted_tokens_est,
    );

    match report.cost_estimate {
        Some(ref cost) => println!(
            "  {} {:.8} {cur} now, {:.8} {cur} optimized (saves {}%)",
            "Cost:".cyan(),
            cost.current,
            cost.optimized,
            cost.savings_pct,
            cur = cost.currency,
        ),
        None => println!("  {} {}", "Cost:".cyan(), "(no pricing configured)".dimmed()),
    }

    if report.issues.is_empty() {
        println!("\n  {} no issues found", "PASS:".green());
    } else {
        println!("\n  {}", "Issues:".yellow());
        for issue in &report.issues {
            println!(
                "    {} {}: {}",
                severity_label(issue.severity),
                issue.code.bold(),
                issue.message
            );
            println!("      {} {}", "fix:".dimmed(), issue.fix);
        }
    }

    if let Some(ref rewritten) = report.suggestions.rewritten_prompt {
        println!("\n  {}", "Suggested prompt:".cyan());
        for line in rewritten.lines() {
            println!("    {line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlint_core::{ModelPricing, ModelProfile};

    fn report_for(prompt: &str) -> Report {
        let config = AnalyzerConfig::new(
            promptlint_core::AnalyzerDefaults::default(),
            [ModelProfile::new("m").with_pricing(ModelPricing::new(0.001, 0.002))],
        )
        .unwrap();
        PromptAnalyzer::new(config).analyze(prompt, &Overrides::default().with_model("m"))
    }

    #[test]
    fn lenient_numeric_overrides() {
        let args = AnalyzeArgs {
            expected_output: Some("abc".to_string()),
            max_input: Some("100".to_string()),
            ..Default::default()
        };
        let overrides = args.overrides();
        assert_eq!(overrides.expected_output_tokens, None);
        assert_eq!(overrides.max_input_tokens, Some(100));
    }

    #[test]
    fn severity_gate_trips_at_threshold() {
        let report = report_for("Summarize this document.");
        let medium = Gates {
            fail_on: Some(Severity::Medium),
            ..Default::default()
        };
        assert!(medium.check(&report).is_some());
        let high = Gates {
            fail_on: Some(Severity::High),
            ..Default::default()
        };
        assert!(high.check(&report).is_none());
    }

    #[test]
    fn score_gate_trips_below_minimum() {
        let report = report_for("Summarize this document.");
        let gate = |min| Gates {
            min_score: Some(min),
            ..Default::default()
        };
        assert!(gate(81).check(&report).is_some());
        assert!(gate(80).check(&report).is_none());
    }

    #[test]
    fn clean_report_passes_all_gates() {
        let report = report_for("Return JSON with at most 50 words.");
        let gates = Gates {
            fail_on: Some(Severity::Low),
            min_score: Some(100),
        };
        assert!(gates.check(&report).is_none());
    }

    #[test]
    fn text_output_does_not_panic() {
        print_report("<text>", &report_for("Summarize this document."));
        print_report("<text>", &report_for(""));
    }
}
