//! MCP (Model Context Protocol) server implementation.
//!
//! This module exposes prompt analysis over the MCP protocol, making it
//! available to AI assistants and editors over the stdio transport.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer. It wraps the same core library that
//! the CLI commands use. Each `#[tool]` method delegates to `promptlint-core`
//! rather than implementing business logic directly.
//!
//! # Adding Tools
//!
//! 1. Define a parameter struct with `Deserialize` + `JsonSchema`
//! 2. Add a `#[tool(description = "...")]` method to the `#[tool_router]` impl
//! 3. Call core library functions, convert errors to `McpError`
//! 4. Return `CallToolResult::success(vec![Content::text(...)])`

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use promptlint_core::{AnalyzerConfig, ContextChunk, Message, Overrides, PromptAnalyzer, tokens};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `analyze_prompt` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzePromptParams {
    /// The prompt text to analyze.
    pub prompt: String,
    /// Model profile to analyze against. Unknown models fall back to defaults.
    pub model: Option<String>,
    /// Tokenizer override: "approx", "cl100k", or "o200k".
    pub tokenizer: Option<String>,
    /// Expected output tokens. Negative values use the default.
    pub expected_output_tokens: Option<i64>,
    /// Advisory input token budget. Non-positive values use the default.
    pub max_input_tokens: Option<i64>,
}

/// Parameters for the `analyze_messages` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeMessagesParams {
    /// Conversation messages in order. `role` defaults to "user".
    pub messages: Vec<Message>,
    /// Retrieved context sent with the messages. Counted, not linted.
    #[serde(default)]
    pub context_chunks: Vec<ContextChunk>,
    /// Model profile to analyze against. Unknown models fall back to defaults.
    pub model: Option<String>,
    /// Tokenizer override: "approx", "cl100k", or "o200k".
    pub tokenizer: Option<String>,
    /// Expected output tokens. Negative values use the default.
    pub expected_output_tokens: Option<i64>,
    /// Advisory input token budget. Non-positive values use the default.
    pub max_input_tokens: Option<i64>,
}

/// Parameters for the `count_tokens` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct CountTokensParams {
    /// The text to count tokens in.
    pub text: String,
    /// Tokenizer: "approx", "cl100k", or "o200k". Defaults to the model's tokenizer.
    pub tokenizer: Option<String>,
    /// Model profile whose tokenizer applies.
    pub model: Option<String>,
    /// Optional maximum token budget.
    pub budget: Option<usize>,
}

/// MCP server exposing prompt analysis to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    analyzer: Arc<PromptAnalyzer>,
    max_input_bytes: Option<usize>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new(
            AnalyzerConfig::default(),
            Some(promptlint_core::DEFAULT_MAX_INPUT_BYTES),
        )
    }
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_router]
impl ProjectServer {
    /// Create a new MCP server instance.
    pub fn new(config: AnalyzerConfig, max_input_bytes: Option<usize>) -> Self {
        Self {
            analyzer: Arc::new(PromptAnalyzer::new(config)),
            max_input_bytes,
            tool_router: Self::tool_router(),
        }
    }

    fn check_input_size(&self, text: &str) -> Result<(), McpError> {
        if let Some(max) = self.max_input_bytes
            && text.len() > max
        {
            return Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            ));
        }
        Ok(())
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let models: Vec<&str> = self
            .analyzer
            .config()
            .models()
            .map(|m| m.name.as_str())
            .collect();
        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "default_model": self.analyzer.config().defaults().model,
            "models": models,
            "tokenizers": tokens::AVAILABLE_TOKENIZERS,
        });

        let text = if params.format == "json" {
            serialize(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Analyze a prompt and return the full report.
    #[tool(
        description = "Analyze an LLM prompt. Returns scores, token estimates, cost projection, issues with fixes, and a rewritten prompt."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn analyze_prompt(
        &self,
        Parameters(params): Parameters<AnalyzePromptParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "analyze_prompt", "executing MCP tool");
        self.check_input_size(&params.prompt)?;

        let overrides = Overrides {
            model: params.model,
            tokenizer: params.tokenizer,
            expected_output_tokens: params.expected_output_tokens,
            max_input_tokens: params.max_input_tokens,
        };
        let report = self.analyzer.analyze(&params.prompt, &overrides);
        let json = serialize(&report)?;

        tracing::info!(
            tool = "analyze_prompt",
            overall = report.scores.overall,
            issues = report.issues.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Analyze a chat conversation plus retrieved context.
    #[tool(
        description = "Analyze a chat-style prompt: role-tagged messages plus optional context chunks. Returns the same report as analyze_prompt."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn analyze_messages(
        &self,
        Parameters(params): Parameters<AnalyzeMessagesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "analyze_messages",
            messages = params.messages.len(),
            chunks = params.context_chunks.len(),
            "executing MCP tool"
        );
        let total: usize = params.messages.iter().map(|m| m.content.len()).sum::<usize>()
            + params.context_chunks.iter().map(|c| c.text.len()).sum::<usize>();
        if let Some(max) = self.max_input_bytes
            && total > max
        {
            return Err(McpError::invalid_params(
                format!("input too large: {total} bytes (limit: {max} bytes)"),
                None,
            ));
        }

        let overrides = Overrides {
            model: params.model,
            tokenizer: params.tokenizer,
            expected_output_tokens: params.expected_output_tokens,
            max_input_tokens: params.max_input_tokens,
        };
        let report =
            self.analyzer
                .analyze_messages(&params.messages, &params.context_chunks, &overrides);
        let json = serialize(&report)?;

        tracing::info!(
            tool = "analyze_messages",
            overall = report.scores.overall,
            issues = report.issues.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Estimate tokens in text.
    #[tool(description = "Count tokens in text. Returns token count and optional budget check.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn count_tokens(
        &self,
        Parameters(params): Parameters<CountTokensParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "count_tokens", budget = ?params.budget, "executing MCP tool");
        self.check_input_size(&params.text)?;

        let profile = self.analyzer.config().resolve(&Overrides {
            model: params.model,
            tokenizer: params.tokenizer,
            ..Default::default()
        });
        let report = tokens::count_tokens(&params.text, &profile.tokenizer, params.budget);
        let json = serialize(&report)?;

        tracing::info!(
            tool = "count_tokens",
            count = report.count,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use analyze_prompt to lint an LLM prompt before sending it, \
                 analyze_messages for chat-style prompts, and count_tokens for a quick size estimate.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlint_core::{AnalyzerDefaults, ModelPricing, ModelProfile};
    use rmcp::model::RawContent;

    fn priced_server() -> ProjectServer {
        let config = AnalyzerConfig::new(
            AnalyzerDefaults::default(),
            [ModelProfile::new("gpt-4o-mini").with_pricing(ModelPricing::new(0.00015, 0.0006))],
        )
        .unwrap();
        ProjectServer::new(config, Some(64))
    }

    #[test]
    fn server_info_has_correct_name() {
        let server = ProjectServer::default();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn server_has_tools_capability() {
        let server = ProjectServer::default();
        let info = ServerHandler::get_info(&server);

        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn server_has_instructions() {
        let server = ProjectServer::default();
        let info = ServerHandler::get_info(&server);

        let instructions = info.instructions.expect("server should have instructions");
        assert!(instructions.contains(env!("CARGO_PKG_NAME")));
        assert!(instructions.contains("analyze_prompt"));
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn extract_json(result: &CallToolResult) -> serde_json::Value {
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("output should be valid JSON")
    }

    #[test]
    fn get_info_tool_returns_text_by_default() {
        let server = ProjectServer::default();
        let params = Parameters(GetInfoParams {
            format: default_format(),
        });

        let result = server.get_info(params).expect("get_info should succeed");

        assert!(!result.is_error.unwrap_or(false));
        let text = extract_text(&result).expect("should have text content");
        assert!(text.contains(env!("CARGO_PKG_NAME")));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = priced_server();
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");
        let json = extract_json(&result);

        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["models"][0], "gpt-4o-mini");
        assert_eq!(json["default_model"], "default");
    }

    #[test]
    fn analyze_prompt_tool_returns_report() {
        let server = priced_server();
        let params = Parameters(AnalyzePromptParams {
            prompt: "Summarize this document.".to_string(),
            model: Some("gpt-4o-mini".to_string()),
            ..Default::default()
        });

        let result = server
            .analyze_prompt(params)
            .expect("analyze_prompt should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let json = extract_json(&result);
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["scores"]["overall"], 80);
        assert_eq!(json["issues"][0]["code"], "missing_output_format");
        assert_eq!(json["cost_estimate"]["currency"], "USD");
        assert!(json["suggestions"]["rewritten_prompt"].is_string());
    }

    #[test]
    fn analyze_prompt_unknown_model_has_null_cost() {
        let server = priced_server();
        let params = Parameters(AnalyzePromptParams {
            prompt: "Return JSON with at most 50 words.".to_string(),
            model: Some("nonexistent-model".to_string()),
            ..Default::default()
        });

        let json = extract_json(&server.analyze_prompt(params).unwrap());
        assert!(json["cost_estimate"].is_null());
        assert_eq!(json["scores"]["overall"], 100);
        assert!(json["suggestions"]["rewritten_prompt"].is_null());
    }

    #[test]
    fn analyze_prompt_rejects_oversized_input() {
        let server = priced_server();
        let params = Parameters(AnalyzePromptParams {
            prompt: "x".repeat(65),
            ..Default::default()
        });

        assert!(server.analyze_prompt(params).is_err());
    }

    #[test]
    fn analyze_messages_tool_joins_system_and_user() {
        let server = priced_server();
        let params: AnalyzeMessagesParams = serde_json::from_value(serde_json::json!({
            "messages": [
                {"role": "system", "content": "Always answer in JSON."},
                {"content": "List three risks in at most 50 words."}
            ],
            "model": "gpt-4o-mini"
        }))
        .unwrap();

        let json = extract_json(&server.analyze_messages(Parameters(params)).unwrap());
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["scores"]["overall"], 100);
        assert_eq!(json["issues"], serde_json::json!([]));
    }

    #[test]
    fn analyze_messages_tool_counts_context_toward_size_limit() {
        let server = priced_server();
        let params = Parameters(AnalyzeMessagesParams {
            messages: vec![Message::user("Summarize this document.")],
            context_chunks: vec![ContextChunk::new("x".repeat(60))],
            ..Default::default()
        });

        assert!(server.analyze_messages(params).is_err());
    }

    #[test]
    fn count_tokens_tool_works() {
        let server = ProjectServer::default();
        let params = Parameters(CountTokensParams {
            text: "Hello, world!".to_string(),
            budget: Some(100),
            ..Default::default()
        });

        let result = server
            .count_tokens(params)
            .expect("count_tokens should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let json = extract_json(&result);
        assert_eq!(json["count"], 4);
        assert_eq!(json["tokenizer"], "approx");
        assert!(!json["over_budget"].as_bool().unwrap());
    }

    #[test]
    fn count_tokens_tool_honors_tokenizer() {
        let server = ProjectServer::default();
        let params = Parameters(CountTokensParams {
            text: "Hello, world!".to_string(),
            tokenizer: Some("o200k".to_string()),
            budget: Some(1),
            ..Default::default()
        });

        let json = extract_json(&server.count_tokens(params).unwrap());
        assert_eq!(json["tokenizer"], "o200k");
        assert!(json["over_budget"].as_bool().unwrap());
    }
}
