use tracing_subscriber::EnvFilter;

use crate::bootstrap::config::Config;

/// Installs the global fmt subscriber. `RUST_LOG` wins over the configured
/// filter. Calling it twice is harmless: the second install is ignored.
pub fn init_tracing(cfg: &Config) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cfg.log_filter.clone());
    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .try_init();
    if installed.is_ok() {
        tracing::info!(?cfg, "tracing_initialized");
    }
}
