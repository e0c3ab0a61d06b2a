pub mod config;
pub mod error;

pub use config::{CalendarConfig, Config, CredentialsConfig, SheetsConfig, ValidationResult};
pub use error::ConfigError;

use anyhow::Result;

/// Initialize logging. `RUST_LOG` overrides the default `info` filter.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("gapi core initialized");
    Ok(())
}
