//! HTTP echo/mock server.
//!
//! Every request is answered with a JSON description of itself. Special
//! `x-mock-*` request headers script the response:
//!
//! ```text
//!     Client Request
//!     ─────────────────▶ net (listener, TLS, HTTP/1.1 codec)
//!                            │
//!                            ▼
//!                        http (axum router, echo handler)
//!                            │
//!                            ▼
//!                        pipeline
//!                          response headers → body → counter → status → delay
//!                            │
//!     Client Response        ▼
//!     ◀───────────────── JSON descriptor
//! ```

use std::path::PathBuf;

use clap::Parser;

use mock_echo_server::config::{load_config, ConfigOverrides, ServerConfig};
use mock_echo_server::lifecycle::{signals, startup, Shutdown};
use mock_echo_server::observability::logging;

#[derive(Parser)]
#[command(name = "mock-echo-server")]
#[command(about = "HTTP server that echoes every request as JSON, scriptable via x-mock-* headers", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "MOCK_ECHO_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (keeps the configured bind host)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Serve HTTPS; any value enables it
    #[arg(long, env = "USE_TLS")]
    use_tls: Option<String>,

    /// PEM certificate chain
    #[arg(long, env = "TLS_CERT")]
    tls_cert: Option<String>,

    /// PEM private key
    #[arg(long, env = "TLS_KEY")]
    tls_key: Option<String>,

    /// Per-request logging; `no` disables it
    #[arg(long, env = "LOG")]
    log: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            use_tls: self.use_tls.is_some(),
            tls_cert: self.tls_cert.clone(),
            tls_key: self.tls_key.clone(),
            log_requests: self.log.as_deref().map(|v| v != "no"),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    cli.overrides().apply(&mut config)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("mock-echo-server v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
