use std::sync::Arc;

use stapi_character_mcp::{
    config::Config, logging, mcp::stdio::serve_stdio, stapi::client::StapiClient, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let client = StapiClient::new(config.stapi_base_url.clone(), config.stapi_timeout)?;
    let state = AppState::new(Arc::new(client));

    info!(
        stapi_base_url = %config.stapi_base_url,
        timeout_secs = config.stapi_timeout.as_secs(),
        "server starting"
    );

    serve_stdio(state).await?;
    Ok(())
}
