#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_api_version, validate_identifier, validate_non_empty_string, validate_range,
    validate_url,
};

pub const DEFAULT_DATASET: &str = "production";
pub const DEFAULT_API_VERSION: &str = "2021-08-31";
pub const DEFAULT_FOODS_URL: &str = "https://sanity-nextjs-rouge.vercel.app/api/foods";
pub const DEFAULT_CHEFS_URL: &str = "https://sanity-nextjs-rouge.vercel.app/api/chefs";
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Checks shared by every configuration source.
pub fn validate_settings<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_identifier("project_id", config.project_id())?;
    validate_identifier("dataset", config.dataset())?;
    validate_non_empty_string("token", config.token())?;
    validate_api_version("api_version", config.api_version())?;

    if let Some(host) = config.api_host() {
        validate_url("api_host", host)?;
    }
    validate_url("foods_url", config.foods_endpoint())?;
    validate_url("chefs_url", config.chefs_endpoint())?;

    validate_range(
        "retry_attempts",
        config.retry_policy().attempts,
        1,
        MAX_RETRY_ATTEMPTS,
    )?;

    Ok(())
}
