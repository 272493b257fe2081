//! MCP Server module for rutgen
//!
//! Exposes RUT generation, formatting and validation as tools for LLM
//! clients over stdio.

use async_trait::async_trait;
use rust_mcp_sdk::McpServer;
use rust_mcp_sdk::macros::{JsonSchema, mcp_tool};
use rust_mcp_sdk::mcp_server::ServerHandler;
use rust_mcp_sdk::schema::{
    CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams, RpcError,
    TextContent, schema_utils::CallToolError,
};
use rust_mcp_sdk::tool_box;
use std::sync::Arc;

use crate::rut::{DEFAULT_LIST_SIZE, format_rut, random_ruts, validate_rut};
use crate::types::RutFormat;

/// Upper bound on how many RUTs one call may generate
const MAX_COUNT: u32 = 1000;

/// MCP Server handler for rutgen tools
pub struct RutgenServerHandler {
    format: RutFormat,
}

impl RutgenServerHandler {
    /// `format` is used for any separator the client leaves out
    pub fn new(format: RutFormat) -> Self {
        Self { format }
    }
}

#[async_trait]
impl ServerHandler for RutgenServerHandler {
    async fn handle_list_tools_request(
        &self,
        _params: Option<PaginatedRequestParams>,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: RutgenTools::tools(),
        })
    }

    async fn handle_call_tool_request(
        &self,
        params: CallToolRequestParams,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<CallToolResult, CallToolError> {
        tracing::debug!(tool = %params.name, "tool call");
        let tool_params: RutgenTools = RutgenTools::try_from(params).map_err(CallToolError::new)?;

        match tool_params {
            RutgenTools::RandomRut(tool) => tool.call_tool(&self.format),
            RutgenTools::FormatRut(tool) => tool.call_tool(&self.format),
            RutgenTools::ValidateRut(tool) => tool.call_tool(),
        }
    }
}

fn text_result(output: String) -> Result<CallToolResult, CallToolError> {
    Ok(CallToolResult::text_content(vec![TextContent::from(output)]))
}

// ==================== Tools ====================

/// Generate random valid RUTs
#[mcp_tool(
    name = "random_rut",
    description = "Generates random valid Chilean RUTs (8-digit body plus modulo-11 check digit), one per line. Separators default to the server's configured format.",
    read_only_hint = true
)]
#[derive(Debug, serde::Deserialize, serde::Serialize, JsonSchema)]
pub struct RandomRut {
    /// How many RUTs to generate (default: 10, max: 1000)
    #[serde(default = "default_count")]
    count: Option<u32>,
    /// Inserted between groups of three body digits, e.g. "."
    body_separator: Option<String>,
    /// Inserted before the check digit, e.g. "-"
    check_digit_separator: Option<String>,
}

fn default_count() -> Option<u32> {
    Some(DEFAULT_LIST_SIZE as u32)
}

impl RandomRut {
    fn render(&self, default_format: &RutFormat) -> String {
        let format = default_format.with_overrides(
            self.body_separator.as_deref(),
            self.check_digit_separator.as_deref(),
        );
        let count = self
            .count
            .unwrap_or(DEFAULT_LIST_SIZE as u32)
            .min(MAX_COUNT) as usize;

        random_ruts(count, &format).join("\n")
    }

    pub fn call_tool(&self, default_format: &RutFormat) -> Result<CallToolResult, CallToolError> {
        text_result(self.render(default_format))
    }
}

/// Reformat a raw RUT
#[mcp_tool(
    name = "format_rut",
    description = "Formats a raw RUT (body digits followed by the check digit, no separators) with the given separators. The input is not validated; use validate_rut for that.",
    read_only_hint = true
)]
#[derive(Debug, serde::Deserialize, serde::Serialize, JsonSchema)]
pub struct FormatRut {
    /// Raw RUT such as "123456785"
    rut: String,
    /// Inserted between groups of three body digits, e.g. "."
    body_separator: Option<String>,
    /// Inserted before the check digit, e.g. "-"
    check_digit_separator: Option<String>,
}

impl FormatRut {
    fn render(&self, default_format: &RutFormat) -> String {
        let format = default_format.with_overrides(
            self.body_separator.as_deref(),
            self.check_digit_separator.as_deref(),
        );
        format_rut(&self.rut, &format)
    }

    pub fn call_tool(&self, default_format: &RutFormat) -> Result<CallToolResult, CallToolError> {
        text_result(self.render(default_format))
    }
}

/// Check a RUT's check digit
#[mcp_tool(
    name = "validate_rut",
    description = "Checks whether a RUT's check digit matches its body. Separators and surrounding text are ignored; a lowercase k is accepted.",
    read_only_hint = true
)]
#[derive(Debug, serde::Deserialize, serde::Serialize, JsonSchema)]
pub struct ValidateRut {
    /// RUT in any common format, e.g. "12.345.678-5"
    rut: String,
}

impl ValidateRut {
    fn render(&self) -> String {
        match validate_rut(&self.rut) {
            Ok(rut) => format!("Valid RUT: {}", rut.format(&RutFormat::dotted())),
            Err(e) => format!("Invalid RUT '{}': {}", self.rut, e),
        }
    }

    pub fn call_tool(&self) -> Result<CallToolResult, CallToolError> {
        text_result(self.render())
    }
}

// Generate the tool_box enum
tool_box!(RutgenTools, [RandomRut, FormatRut, ValidateRut]);

/// Run the MCP server over stdio
pub async fn run_mcp_server(format: RutFormat) -> Result<(), Box<dyn std::error::Error>> {
    use rust_mcp_sdk::mcp_server::{McpServerOptions, ServerRuntime, server_runtime};
    use rust_mcp_sdk::schema::{
        Implementation, InitializeResult, ProtocolVersion, ServerCapabilities,
        ServerCapabilitiesTools,
    };
    use rust_mcp_sdk::{StdioTransport, ToMcpServerHandler, TransportOptions};

    let server_details = InitializeResult {
        server_info: Implementation {
            name: "rutgen".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            title: Some("rutgen - Chilean RUT generator".into()),
            description: Some("MCP server for generating, formatting and validating Chilean RUTs".into()),
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        meta: None,
        instructions: Some("Use random_rut to get sample RUTs, format_rut to apply separators to a raw RUT, and validate_rut to check one.".into()),
        protocol_version: ProtocolVersion::V2025_11_25.into(),
    };

    let transport = StdioTransport::new(TransportOptions::default())?;
    let handler = RutgenServerHandler::new(format);

    tracing::info!("starting MCP server on stdio");
    let server: Arc<ServerRuntime> = server_runtime::create_server(McpServerOptions {
        server_details,
        transport,
        handler: handler.to_mcp_server_handler(),
        task_store: None,
        client_task_store: None,
    });

    server.start().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_rut_tool_uses_server_format() {
        let tool = RandomRut {
            count: Some(3),
            body_separator: None,
            check_digit_separator: None,
        };
        let output = tool.render(&RutFormat::dotted());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            assert_eq!(line.len(), 12);
            assert!(validate_rut(line).is_ok());
        }
    }

    #[test]
    fn test_random_rut_tool_caps_count() {
        let tool = RandomRut {
            count: Some(MAX_COUNT + 50),
            body_separator: Some(String::new()),
            check_digit_separator: Some(String::new()),
        };
        assert_eq!(tool.render(&RutFormat::default()).lines().count(), MAX_COUNT as usize);
    }

    #[test]
    fn test_format_rut_tool() {
        let tool = FormatRut {
            rut: "123456785".to_string(),
            body_separator: Some(".".to_string()),
            check_digit_separator: None,
        };
        assert_eq!(tool.render(&RutFormat::default()), "12.345.678-5");
    }

    #[test]
    fn test_validate_rut_tool() {
        let valid = ValidateRut {
            rut: "123456785".to_string(),
        };
        assert_eq!(valid.render(), "Valid RUT: 12.345.678-5");

        let invalid = ValidateRut {
            rut: "12345678-9".to_string(),
        };
        assert!(invalid.render().starts_with("Invalid RUT"));
    }
}
