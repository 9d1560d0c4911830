//! Model Context Protocol resource templates
//!
//! Exposes individual characters as JSON documents under `character://{characterUid}`.

use rust_mcp_sdk::schema::{
    ReadResourceContent, ReadResourceRequestParams, ReadResourceResult, ResourceTemplate,
    TextResourceContents,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_error_with_data, json_rpc_serialized,
};
use crate::stapi::character::fetch_character;
use crate::AppState;

pub const CHARACTER_URI_SCHEME: &str = "character://";
pub const CHARACTER_URI_TEMPLATE: &str = "character://{characterUid}";

pub fn build_resource_templates_list() -> Vec<ResourceTemplate> {
    vec![ResourceTemplate {
        annotations: None,
        description: Some(
            "Fetch information about a specific star trek character by uid".to_string(),
        ),
        icons: vec![],
        meta: None,
        mime_type: Some("application/json".to_string()),
        name: "character".to_string(),
        title: Some("Star Trek Character".to_string()),
        uri_template: CHARACTER_URI_TEMPLATE.to_string(),
    }]
}

/// Extracts the uid from a `character://` URI.
///
/// `Ok(None)` means the URI belongs to another scheme.
pub fn parse_character_uri(uri: &str) -> Result<Option<&str>, AppError> {
    let Some(uid) = uri.strip_prefix(CHARACTER_URI_SCHEME) else {
        return Ok(None);
    };

    let uid = uid.trim();
    if uid.is_empty() || uid.contains('/') {
        return Err(AppError::bad_request(
            "invalid_character_uri",
            "character uri must be character://{characterUid}",
        ));
    }

    Ok(Some(uid))
}

pub async fn handle_resources_read(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let resource_read: ReadResourceRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let uid = match parse_character_uri(&resource_read.uri) {
        Ok(Some(uid)) => uid,
        Ok(None) => {
            return json_rpc_error_with_data(
                id,
                -32601,
                "Method not found",
                Some(json!({
                    "code": "resource_not_found",
                    "message": "unknown resource uri",
                    "details": {
                        "uri": resource_read.uri,
                    },
                })),
            )
        }
        Err(err) => return app_error_to_json_rpc(id, err),
    };

    let character = match fetch_character(state.character_api.as_ref(), uid).await {
        Ok(character) => character,
        Err(err) => return app_error_to_json_rpc(id, AppError::Upstream(err)),
    };

    let text = match serde_json::to_string(&character) {
        Ok(text) => text,
        Err(err) => {
            return app_error_to_json_rpc(
                id,
                AppError::internal(format!("character serialization failed: {err}")),
            )
        }
    };

    json_rpc_serialized(
        id,
        &ReadResourceResult {
            contents: vec![ReadResourceContent::from(TextResourceContents {
                meta: None,
                mime_type: Some("application/json".to_string()),
                text,
                uri: resource_read.uri.clone(),
            })],
            meta: None,
        },
    )
}
