//! Configuration loading. The pipeline receives an explicit
//! [`SiteConfig`]; there is no process-wide settings state.

mod loader;
mod types;

pub use loader::{ConfigError, default_config_path, load};
pub use types::{LoggingConfig, SiteConfig};
