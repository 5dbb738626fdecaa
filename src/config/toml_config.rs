use super::{
    validate_settings, DEFAULT_API_VERSION, DEFAULT_CHEFS_URL, DEFAULT_DATASET,
    DEFAULT_FOODS_URL, DEFAULT_RETRY_DELAY_MS,
};
use crate::core::ConfigProvider;
use crate::domain::model::FailurePolicy;
use crate::utils::error::{ImportError, Result};
use crate::utils::retry::RetryPolicy;
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub project_id: String,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    pub token: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    pub api_host: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_foods_url")]
    pub foods_url: String,
    #[serde(default = "default_chefs_url")]
    pub chefs_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            foods_url: default_foods_url(),
            chefs_url: default_chefs_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub on_image_error: FailurePolicy,
    #[serde(default)]
    pub on_create_error: FailurePolicy,
    #[serde(default)]
    pub dry_run: bool,
    pub report_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

fn default_dataset() -> String {
    DEFAULT_DATASET.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_foods_url() -> String {
    DEFAULT_FOODS_URL.to_string()
}

fn default_chefs_url() -> String {
    DEFAULT_CHEFS_URL.to_string()
}

impl TomlConfig {
    /// Loads a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ImportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = placeholder_regex()?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let re = placeholder_regex()?;
        let secrets = [
            ("store.project_id", self.store.project_id.as_str()),
            ("store.token", self.store.token.as_str()),
        ];
        for (field, value) in secrets {
            if let Some(caps) = re.captures(value) {
                return Err(ImportError::ConfigValidationError {
                    field: field.to_string(),
                    message: format!("environment variable {} is not set", &caps[1]),
                });
            }
        }

        validate_settings(self)
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.import.report_path.as_deref()
    }
}

fn placeholder_regex() -> Result<Regex> {
    Regex::new(r"\$\{([^}]+)\}").map_err(|e| ImportError::ProcessingError {
        message: e.to_string(),
    })
}

impl ConfigProvider for TomlConfig {
    fn project_id(&self) -> &str {
        &self.store.project_id
    }

    fn dataset(&self) -> &str {
        &self.store.dataset
    }

    fn token(&self) -> &str {
        &self.store.token
    }

    fn api_version(&self) -> &str {
        &self.store.api_version
    }

    fn api_host(&self) -> Option<&str> {
        self.store.api_host.as_deref()
    }

    fn foods_endpoint(&self) -> &str {
        &self.source.foods_url
    }

    fn chefs_endpoint(&self) -> &str {
        &self.source.chefs_url
    }

    fn timeout(&self) -> Option<Duration> {
        self.http.timeout_seconds.map(Duration::from_secs)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.http.retry_attempts.unwrap_or(1),
            delay: Duration::from_millis(self.http.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS)),
        }
    }

    fn on_image_error(&self) -> FailurePolicy {
        self.import.on_image_error
    }

    fn on_create_error(&self) -> FailurePolicy {
        self.import.on_create_error
    }

    fn dry_run(&self) -> bool {
        self.import.dry_run
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config() {
        let toml_content = r#"
[store]
project_id = "v8ri5c79"
token = "sk-test"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.dataset(), "production");
        assert_eq!(config.api_version(), "2021-08-31");
        assert_eq!(config.foods_endpoint(), DEFAULT_FOODS_URL);
        assert_eq!(config.on_create_error(), FailurePolicy::Continue);
        assert_eq!(config.retry_policy().attempts, 1);
        assert!(!config.dry_run());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[store]
project_id = "v8ri5c79"
dataset = "staging"
token = "sk-test"
api_version = "2023-01-01"
api_host = "http://localhost:4000"

[source]
foods_url = "http://localhost:3000/api/foods"
chefs_url = "http://localhost:3000/api/chefs"

[import]
on_image_error = "abort"
on_create_error = "abort"
dry_run = true
report_path = "reports/import.csv"

[http]
timeout_seconds = 30
retry_attempts = 3
retry_delay_ms = 250
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_host(), Some("http://localhost:4000"));
        assert_eq!(config.chefs_endpoint(), "http://localhost:3000/api/chefs");
        assert_eq!(config.on_image_error(), FailurePolicy::Abort);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.retry_policy(),
            RetryPolicy::new(3, Duration::from_millis(250))
        );
        assert_eq!(config.report_path(), Some(Path::new("reports/import.csv")));
        assert!(config.dry_run());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MENU_IMPORT_TEST_TOKEN", "sk-from-env");

        let toml_content = r#"
[store]
project_id = "v8ri5c79"
token = "${MENU_IMPORT_TEST_TOKEN}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.token(), "sk-from-env");

        std::env::remove_var("MENU_IMPORT_TEST_TOKEN");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = r#"
[store]
project_id = "v8ri5c79"
token = "${MENU_IMPORT_TEST_UNSET_TOKEN}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("MENU_IMPORT_TEST_UNSET_TOKEN"));
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let toml_content = r#"
[store]
project_id = "v8ri5c79"
token = "sk-test"

[import]
on_create_error = "retry"
"#;

        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(ImportError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[store]
project_id = "v8ri5c79"
token = "sk-test"

[source]
foods_url = "https://seed.example.com/api/foods"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.foods_endpoint(), "https://seed.example.com/api/foods");
        assert_eq!(config.chefs_endpoint(), DEFAULT_CHEFS_URL);
    }
}
