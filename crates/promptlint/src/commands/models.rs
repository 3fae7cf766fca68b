//! Models command — list configured model profiles as they resolve.

use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use promptlint_core::{AnalyzerConfig, Overrides, ResolvedProfile};

/// Arguments for the `models` subcommand.
#[derive(Args, Debug, Default)]
pub struct ModelsArgs {
    // No subcommand-specific arguments; uses global --json flag
}

/// Resolve every configured profile (plus the default model).
pub fn resolved_profiles(config: &AnalyzerConfig) -> Vec<ResolvedProfile> {
    let mut names: Vec<String> = config.models().map(|m| m.name.clone()).collect();
    let default_model = &config.defaults().model;
    if !names.contains(default_model) {
        names.insert(0, default_model.clone());
    }

    names
        .into_iter()
        .map(|name| config.resolve(&Overrides::default().with_model(name)))
        .collect()
}

/// Print the resolved model profiles.
#[instrument(name = "cmd_models", skip_all)]
pub fn cmd_models(
    _args: ModelsArgs,
    global_json: bool,
    config: &AnalyzerConfig,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing models command");

    let profiles = resolved_profiles(config);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    let default_model = &config.defaults().model;
    for profile in &profiles {
        let marker = if &profile.model == default_model {
            " (default)".green().to_string()
        } else {
            String::new()
        };
        let status = if profile.configured {
            String::new()
        } else {
            " not configured".yellow().to_string()
        };
        println!("{}{marker}{status}", profile.model.bold());
        println!("  {}: {}", "Tokenizer".dimmed(), profile.tokenizer);
        if profile.context_window_tokens > 0 {
            println!("  {}: {}", "Context window".dimmed(), profile.context_window_tokens);
        } else {
            println!("  {}: {}", "Context window".dimmed(), "(unknown)".dimmed());
        }
        println!("  {}: {}", "Expected output".dimmed(), profile.expected_output_tokens);
        println!("  {}: {}", "Input budget".dimmed(), profile.max_input_tokens);
        match profile.pricing {
            Some(ref p) => println!(
                "  {}: {} in / {} out per 1k tokens ({})",
                "Pricing".dimmed(),
                p.input_per_1k,
                p.output_per_1k,
                p.currency
            ),
            None => println!("  {}: {}", "Pricing".dimmed(), "(none)".dimmed()),
        }
    }

    Ok(())
}
