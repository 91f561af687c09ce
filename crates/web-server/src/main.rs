use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use web_server::AppState;

// This main function is the entry point when running `cargo run -p web-server`.
// The root `dealing serve` command does the same with CLI overrides.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = configuration::load_config().context("Failed to load configuration")?;
    let _guard = web_server::telemetry::init(&config.logging)?;

    let nav_file = config
        .navigation_file
        .clone()
        .unwrap_or_else(|| configuration::NAVIGATION_FILE.into());
    let navigation = configuration::load_navigation(Path::new(&nav_file))?;
    let addr = config.server.addr()?;
    // Dataset generation and model training are CPU-bound.
    let state = tokio::task::spawn_blocking(move || AppState::build(&config, navigation)).await??;

    web_server::run_server(addr, Arc::new(state)).await
}
