//! Integration settings — the project settings document and the typed
//! routing config built from it.

use std::collections::HashMap;

use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::types::LogLevel;
use serde::{Deserialize, Serialize};

/// Host settings document: one settings object per integration key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default)]
    pub integrations: HashMap<String, serde_json::Value>,
}

impl ProjectSettings {
    pub fn from_json(raw: &str) -> CampaignResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn for_integration(&self, key: &str) -> Option<&serde_json::Value> {
        self.integrations.get(key)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoutingSettings {
    api_key: Option<String>,
    push_sender_id: Option<String>,
}

/// Validated router configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    pub api_key: String,
    pub push_sender_id: String,
    pub debug_mode: bool,
}

impl RoutingConfig {
    /// Build from an integration settings object
    /// (`{"apiKey": ..., "pushSenderId": ...}`). Debug mode follows the host
    /// log level.
    pub fn from_settings(settings: &serde_json::Value, log_level: LogLevel) -> CampaignResult<Self> {
        let raw: RawRoutingSettings = serde_json::from_value(settings.clone())
            .map_err(|e| CampaignError::Config(format!("invalid routing settings: {e}")))?;

        Ok(Self {
            api_key: required(raw.api_key, "apiKey")?,
            push_sender_id: required(raw.push_sender_id, "pushSenderId")?,
            debug_mode: log_level.is_info_or_verbose(),
        })
    }
}

fn required(value: Option<String>, field: &str) -> CampaignResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CampaignError::Config(format!(
            "routing setting '{field}' is required"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_settings() {
        let settings = json!({"apiKey": "key-1", "pushSenderId": "sender-1"});
        let config = RoutingConfig::from_settings(&settings, LogLevel::Basic).unwrap();
        assert_eq!(config.api_key, "key-1");
        assert_eq!(config.push_sender_id, "sender-1");
        assert!(!config.debug_mode);
    }

    #[test]
    fn test_debug_mode_follows_log_level() {
        let settings = json!({"apiKey": "k", "pushSenderId": "s"});
        for (level, expected) in [
            (LogLevel::None, false),
            (LogLevel::Basic, false),
            (LogLevel::Info, true),
            (LogLevel::Verbose, true),
        ] {
            let config = RoutingConfig::from_settings(&settings, level).unwrap();
            assert_eq!(config.debug_mode, expected, "level {level}");
        }
    }

    #[test]
    fn test_missing_required_fields() {
        let missing_key = json!({"pushSenderId": "s"});
        let err = RoutingConfig::from_settings(&missing_key, LogLevel::Info).unwrap_err();
        assert!(err.to_string().contains("apiKey"));

        let blank_sender = json!({"apiKey": "k", "pushSenderId": "  "});
        let err = RoutingConfig::from_settings(&blank_sender, LogLevel::Info).unwrap_err();
        assert!(err.to_string().contains("pushSenderId"));

        let not_an_object = json!("oops");
        assert!(matches!(
            RoutingConfig::from_settings(&not_an_object, LogLevel::Info),
            Err(CampaignError::Config(_))
        ));
    }

    #[test]
    fn test_project_settings() {
        let settings = ProjectSettings::from_json(
            r#"{"integrations": {"PushMarketing": {"apiKey": "k", "pushSenderId": "s"}}}"#,
        )
        .unwrap();
        assert!(settings.for_integration("PushMarketing").is_some());
        assert!(settings.for_integration("Other").is_none());

        let empty = ProjectSettings::from_json("{}").unwrap();
        assert!(empty.integrations.is_empty());

        assert!(ProjectSettings::from_json("not json").is_err());
    }
}
