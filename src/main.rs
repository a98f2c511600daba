//! snippet-web server binary.
//!
//! ```text
//!   Client Request
//!     │
//!     ▼
//!   ┌──────────────────────────────────────────────────────┐
//!   │ request id → trace → security headers → timeout      │
//!   │   → session → csrf issue → locals → error handler    │
//!   │     → csrf validate → routes                         │
//!   └──────────────────────────────────────────────────────┘
//!     │
//!     ▼
//!   Rendered page, redirect with flash, or error page
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use snippet_web::config::{self, ObservabilityConfig};
use snippet_web::lifecycle::startup;
use snippet_web::observability::logging;

#[derive(Parser)]
#[command(name = "snippet-web", version)]
#[command(about = "Server-rendered snippet application", long_about = None)]
struct Cli {
    /// Optional TOML configuration file. Environment variables take precedence.
    #[arg(short, long, env = "APP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            let node_env = std::env::var("NODE_ENV").unwrap_or_default();
            logging::init(
                config::Environment::from_node_env(&node_env),
                &ObservabilityConfig::default(),
            );
            tracing::error!(%error, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.server.environment, &config.observability);
    tracing::info!("snippet-web v{} starting", env!("CARGO_PKG_VERSION"));

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "Server failed");
            ExitCode::FAILURE
        }
    }
}
