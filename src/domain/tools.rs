//! Interactive tools exposed via Model Context Protocol
//!
//! Provides `character-search`, which resolves a name to STAPI characters and
//! renders each one as a text block.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_error_with_data, json_rpc_serialized,
};
use crate::stapi::{format::format_character, search::search_characters};
use crate::AppState;

pub const CHARACTER_SEARCH_TOOL: &str = "character-search";

#[macros::mcp_tool(
    name = "character-search",
    description = "Search for a star trek character by name"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CharacterSearchTool {
    pub name: String,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![CharacterSearchTool::tool()]
}

pub fn normalize_search_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request(
            "invalid_name",
            "name must not be empty",
        ));
    }

    Ok(name)
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    match tool_call.name.as_str() {
        CHARACTER_SEARCH_TOOL => {
            let arguments: CharacterSearchTool =
                match serde_json::from_value(json!(tool_call.arguments.unwrap_or_default())) {
                    Ok(value) => value,
                    Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
                };

            let name = match normalize_search_name(&arguments.name) {
                Ok(name) => name,
                Err(err) => return app_error_to_json_rpc(id, err),
            };

            let result = match search_characters(state.character_api.as_ref(), name).await {
                Ok(outcome) => CallToolResult {
                    content: outcome
                        .characters
                        .iter()
                        .map(|character| {
                            ContentBlock::from(TextContent::new(
                                format_character(character),
                                None,
                                None,
                            ))
                        })
                        .collect(),
                    is_error: None,
                    meta: None,
                    structured_content: Some(serde_json::Map::from_iter([(
                        "characters".to_string(),
                        json!(outcome.candidates),
                    )])),
                },
                Err(err) => {
                    warn!(name, error = %err, code = err.code(), "character search failed");
                    CallToolResult {
                        content: vec![ContentBlock::from(TextContent::new(
                            format!("character search failed: {err}"),
                            None,
                            None,
                        ))],
                        is_error: Some(true),
                        meta: None,
                        structured_content: None,
                    }
                }
            };

            json_rpc_serialized(id, &result)
        }
        _ => json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": tool_call.name,
                },
            })),
        ),
    }
}
