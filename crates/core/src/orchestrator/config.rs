//! Downloader configuration.

use serde::{Deserialize, Serialize};

/// When `downloaded_count` is incremented for a successfully fetched item.
///
/// Device firmwares historically disagreed on this, so the policy is an
/// explicit choice rather than a hardcoded semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountPolicy {
    /// Count when the delete result arrives (success or failure), if and
    /// only if every download step of the item succeeded. This is how crash
    /// report downloaders account.
    #[default]
    AfterDelete,
    /// Count as soon as the last download step succeeds, independent of the
    /// delete outcome. This is how flight data downloaders account.
    AfterDownload,
}

/// Configuration for a download orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Accounting policy for `downloaded_count`.
    #[serde(default)]
    pub count_policy: CountPolicy,

    /// Capacity of the progress notification channel. Subscribers lagging
    /// further than this lose the oldest notifications.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    16
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            count_policy: CountPolicy::default(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DownloaderConfig::default();
        assert_eq!(config.count_policy, CountPolicy::AfterDelete);
        assert_eq!(config.channel_capacity, 16);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: DownloaderConfig = toml::from_str("").unwrap();
        assert_eq!(config.count_policy, CountPolicy::AfterDelete);
        assert_eq!(config.channel_capacity, 16);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            count_policy = "after_download"
            channel_capacity = 64
        "#;
        let config: DownloaderConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.count_policy, CountPolicy::AfterDownload);
        assert_eq!(config.channel_capacity, 64);
    }
}
