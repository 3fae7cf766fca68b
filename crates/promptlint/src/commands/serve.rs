//! Serve command — run the MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use promptlint_core::AnalyzerConfig;

use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // No subcommand-specific arguments; the server speaks MCP over stdio
}

/// Serve MCP tools over stdin/stdout until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    analyzer_config: AnalyzerConfig,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    info!(
        models = analyzer_config.models().count(),
        max_input_bytes = ?max_input_bytes,
        "starting MCP server on stdio"
    );

    let service = ProjectServer::new(analyzer_config, max_input_bytes)
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    service
        .waiting()
        .await
        .context("MCP server terminated abnormally")?;

    info!("MCP server stopped");
    Ok(())
}
