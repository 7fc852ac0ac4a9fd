use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Upload limit is not 0
/// - Orchestrator intervals and limits are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.server.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "server.max_upload_bytes cannot be 0".to_string(),
        ));
    }

    // Orchestrator validation
    if config.orchestrator.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.poll_interval_ms cannot be 0".to_string(),
        ));
    }

    if config.orchestrator.max_poll_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.max_poll_attempts cannot be 0".to_string(),
        ));
    }

    if config.orchestrator.stuck_threshold == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.stuck_threshold cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_poll_interval_fails() {
        let mut config = Config::default();
        config.orchestrator.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_stuck_threshold_fails() {
        let mut config = Config::default();
        config.orchestrator.stuck_threshold = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_upload_limit_fails() {
        let mut config = Config::default();
        config.server.max_upload_bytes = 0;
        assert!(validate_config(&config).is_err());
    }
}
