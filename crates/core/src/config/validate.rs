use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Downloader channel capacity is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.downloader.channel_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "downloader.channel_capacity cannot be 0".to_string(),
        ));
    }

    Ok(())
}
