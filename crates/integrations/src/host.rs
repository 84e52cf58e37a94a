//! Host environment — what the embedding application offers integrations at
//! initialization time.

use std::collections::HashSet;

use campaign_core::config::HostConfig;
use campaign_core::types::LogLevel;

/// Support library the push-marketing SDK links against.
pub const SUPPORT_LIBRARY: &str = "support-library";

pub trait HostEnvironment {
    /// Whether a named module or capability is bundled with the host.
    fn has_capability(&self, name: &str) -> bool;

    /// The host's configured log verbosity.
    fn log_level(&self) -> LogLevel;
}

/// Host described up front by a fixed capability list.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    capabilities: HashSet<String>,
    log_level: LogLevel,
}

impl StaticHost {
    pub fn new<I, S>(capabilities: I, log_level: LogLevel) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            capabilities: capabilities.into_iter().map(Into::into).collect(),
            log_level,
        }
    }

    pub fn from_config(config: &HostConfig, log_level: LogLevel) -> Self {
        Self::new(config.capabilities.iter().cloned(), log_level)
    }
}

impl HostEnvironment for StaticHost {
    fn has_capability(&self, name: &str) -> bool {
        self.capabilities.contains(name)
    }

    fn log_level(&self) -> LogLevel {
        self.log_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_host() {
        let host = StaticHost::new([SUPPORT_LIBRARY], LogLevel::Info);
        assert!(host.has_capability(SUPPORT_LIBRARY));
        assert!(!host.has_capability("location"));
        assert_eq!(host.log_level(), LogLevel::Info);
    }

    #[test]
    fn test_from_config_uses_default_capabilities() {
        let host = StaticHost::from_config(&HostConfig::default(), LogLevel::None);
        assert!(host.has_capability(SUPPORT_LIBRARY));
        assert_eq!(host.log_level(), LogLevel::None);
    }

    #[test]
    fn test_default_host_is_bare() {
        let host = StaticHost::default();
        assert!(!host.has_capability(SUPPORT_LIBRARY));
        assert_eq!(host.log_level(), LogLevel::Basic);
    }
}
