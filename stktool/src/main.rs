//! StkTool
//!
//! GTK4 front end for the ofono SIM Toolkit. Shows the SIM main menu and
//! answers ofono's agent requests with pages and dialogs.

mod app;
mod backend;
mod dialogs;
mod pages;
mod pending;
mod toast;
mod window;

use gtk4::glib;
use stktool_agent::config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> glib::ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting StkTool");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    };

    // D-Bus runs on tokio; GTK owns the main thread
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start tokio runtime: {}", e);
            return glib::ExitCode::FAILURE;
        }
    };
    let _guard = runtime.enter();

    let app = app::StkApp::new(config);
    app.run()
}
