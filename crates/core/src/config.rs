use serde::Deserialize;

use crate::types::LogLevel;

/// Root application configuration. Loaded from an optional
/// `campaign-relay.toml` and environment variables with the prefix
/// `CAMPAIGN_RELAY__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub relay: RelayConfig,
}

/// What the host application provides to integrations.
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayConfig {
    /// Project settings document holding per-integration settings.
    #[serde(default)]
    pub settings_path: Option<String>,
}

fn default_capabilities() -> Vec<String> {
    vec!["support-library".to_string()]
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            capabilities: default_capabilities(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional config file and environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("campaign-relay").required(false))
            .add_source(
                config::Environment::with_prefix("CAMPAIGN_RELAY")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("host.capabilities"),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, LogLevel::Basic);
        assert_eq!(config.host.capabilities, vec!["support-library".to_string()]);
        assert!(config.relay.settings_path.is_none());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml = r#"
            log_level = "verbose"

            [host]
            capabilities = ["support-library", "push"]

            [relay]
            settings_path = "settings.json"
        "#;
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Verbose);
        assert_eq!(config.host.capabilities.len(), 2);
        assert_eq!(config.relay.settings_path.as_deref(), Some("settings.json"));
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str("log_level = \"info\"", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.host.capabilities, vec!["support-library".to_string()]);
    }
}
