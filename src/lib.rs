use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod mcp;
pub mod stapi;

use stapi::client::CharacterApi;

/// Per-process handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub character_api: Arc<dyn CharacterApi>,
}

impl AppState {
    pub fn new(character_api: Arc<dyn CharacterApi>) -> Self {
        Self { character_api }
    }
}
