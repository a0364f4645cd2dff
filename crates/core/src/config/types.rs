use serde::{Deserialize, Serialize};

use crate::orchestrator::DownloaderConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub downloader: DownloaderConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::CountPolicy;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.downloader.count_policy, CountPolicy::AfterDelete);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.downloader.count_policy, config.downloader.count_policy);
        assert_eq!(
            parsed.downloader.channel_capacity,
            config.downloader.channel_capacity
        );
    }
}
