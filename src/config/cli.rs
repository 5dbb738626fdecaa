use super::toml_config::TomlConfig;
use super::{
    validate_settings, DEFAULT_API_VERSION, DEFAULT_CHEFS_URL, DEFAULT_DATASET,
    DEFAULT_FOODS_URL, DEFAULT_RETRY_DELAY_MS,
};
use crate::core::ConfigProvider;
use crate::domain::model::FailurePolicy;
use crate::utils::error::Result;
use crate::utils::retry::RetryPolicy;
use crate::utils::validation::{validate_required_field, Validate};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Project id variable used by the menu web app's own environment file.
const PUBLIC_PROJECT_ID_ENV: &str = "NEXT_PUBLIC_SANITY_PROJECT_ID";

#[derive(Debug, Clone, Parser)]
#[command(name = "menu-import")]
#[command(about = "Import seed foods and chefs into the menu content store")]
pub struct CliConfig {
    /// Load settings from a TOML file instead of flags
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, env = "SANITY_PROJECT_ID")]
    pub project_id: Option<String>,

    #[arg(long, env = "SANITY_DATASET", default_value = DEFAULT_DATASET)]
    pub dataset: String,

    /// Write-capable API token
    #[arg(long, env = "SANITY_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, env = "SANITY_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Override the content store host (defaults to https://<project>.api.sanity.io)
    #[arg(long, env = "SANITY_API_HOST")]
    pub api_host: Option<String>,

    #[arg(long, env = "MENU_FOODS_URL", default_value = DEFAULT_FOODS_URL)]
    pub foods_url: String,

    #[arg(long, env = "MENU_CHEFS_URL", default_value = DEFAULT_CHEFS_URL)]
    pub chefs_url: String,

    /// Per-request timeout; no timeout when unset
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Attempts for fetches and asset uploads, 1 when unset (document creates are never retried)
    #[arg(long)]
    pub retry_attempts: Option<u32>,

    /// Pause between attempts [default: 500]
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Policy for a failed image fetch or upload [default: continue]
    #[arg(long, value_enum)]
    pub on_image_error: Option<FailurePolicy>,

    /// Policy for a failed document create [default: continue]
    #[arg(long, value_enum)]
    pub on_create_error: Option<FailurePolicy>,

    /// Fetch and transform only; nothing is uploaded or created
    #[arg(long)]
    pub dry_run: bool,

    /// Write a CSV ledger of every processed record
    #[arg(long)]
    pub report: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    /// Falls back to the web app's public project id variable.
    pub fn with_env_fallbacks(mut self) -> Self {
        if self.project_id.is_none() {
            self.project_id = std::env::var(PUBLIC_PROJECT_ID_ENV)
                .ok()
                .filter(|v| !v.is_empty());
        }
        self
    }

    /// Lays the flags given on the command line over a loaded config file.
    pub fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(seconds) = self.timeout_seconds {
            config.http.timeout_seconds = Some(seconds);
        }
        if let Some(attempts) = self.retry_attempts {
            config.http.retry_attempts = Some(attempts);
        }
        if let Some(delay) = self.retry_delay_ms {
            config.http.retry_delay_ms = Some(delay);
        }
        if let Some(policy) = self.on_image_error {
            config.import.on_image_error = policy;
        }
        if let Some(policy) = self.on_create_error {
            config.import.on_create_error = policy;
        }
        if self.dry_run {
            config.import.dry_run = true;
        }
        if let Some(path) = &self.report {
            config.import.report_path = Some(path.clone());
        }
    }
}

impl ConfigProvider for CliConfig {
    fn project_id(&self) -> &str {
        self.project_id.as_deref().unwrap_or_default()
    }

    fn dataset(&self) -> &str {
        &self.dataset
    }

    fn token(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn api_host(&self) -> Option<&str> {
        self.api_host.as_deref()
    }

    fn foods_endpoint(&self) -> &str {
        &self.foods_url
    }

    fn chefs_endpoint(&self) -> &str {
        &self.chefs_url
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_attempts.unwrap_or(1),
            delay: Duration::from_millis(self.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS)),
        }
    }

    fn on_image_error(&self) -> FailurePolicy {
        self.on_image_error.unwrap_or_default()
    }

    fn on_create_error(&self) -> FailurePolicy {
        self.on_create_error.unwrap_or_default()
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_required_field("project_id", &self.project_id)?;
        validate_required_field("token", &self.token)?;
        validate_settings(self)
    }
}
