//! Tokens command — estimate prompt tokens.

use anyhow::bail;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use promptlint_core::{AnalyzerConfig, Overrides, tokens};

use super::PromptSource;

/// Arguments for the `tokens` subcommand.
#[derive(Args, Debug, Default)]
pub struct TokensArgs {
    /// Prompt to measure.
    #[command(flatten)]
    pub source: PromptSource,

    /// Tokenizer (approx, cl100k, o200k). Defaults to the model's tokenizer.
    #[arg(long)]
    pub tokenizer: Option<String>,

    /// Model profile whose tokenizer and input budget apply.
    #[arg(long, short)]
    pub model: Option<String>,

    /// Maximum token budget (defaults to the resolved input budget).
    #[arg(long)]
    pub budget: Option<usize>,
}

/// Estimate tokens in a prompt and check them against a budget.
#[instrument(name = "cmd_tokens", skip_all, fields(source = %args.source.label()))]
pub fn cmd_tokens(
    args: TokensArgs,
    global_json: bool,
    analyzer_config: &AnalyzerConfig,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(
        tokenizer = ?args.tokenizer,
        model = ?args.model,
        budget = ?args.budget,
        "executing tokens command"
    );

    let content = args.source.read(max_input_bytes)?;
    let profile = analyzer_config.resolve(&Overrides {
        model: args.model.clone(),
        tokenizer: args.tokenizer.clone(),
        ..Default::default()
    });

    let budget = args.budget.unwrap_or(profile.max_input_tokens);
    let report = tokens::count_tokens(&content, &profile.tokenizer, Some(budget));
    let label = args.source.label();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.over_budget {
        bail!(
            "{label} is {} tokens (budget: {budget}, tokenizer: {}). Compress.",
            report.count.red(),
            report.tokenizer,
        );
    } else {
        println!(
            "{} {label} is {} tokens (budget: {budget}, tokenizer: {})",
            "PASS:".green(),
            report.count,
            report.tokenizer,
        );
    }

    Ok(())
}
