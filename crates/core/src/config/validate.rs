use super::{
    types::{Config, CounterBackend, DeploymentMode},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Production mode names an allowed origin
/// - Upload limits are non-zero
/// - Encoder parameters are in range
/// - The selected counter backend has its settings
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    if config.server.mode == DeploymentMode::Production
        && config
            .server
            .allowed_origin
            .as_deref()
            .is_none_or(str::is_empty)
    {
        return Err(invalid(
            "server.allowed_origin is required in production mode",
        ));
    }

    // Upload limits
    if config.uploads.max_files == 0 {
        return Err(invalid("uploads.max_files must be at least 1"));
    }
    if config.uploads.max_file_size_bytes == 0 {
        return Err(invalid("uploads.max_file_size_bytes must be at least 1"));
    }

    // Encoder
    if !(0.0..=100.0).contains(&config.encoder.webp_quality) {
        return Err(invalid("encoder.webp_quality must be between 0 and 100"));
    }
    if !(1..=30).contains(&config.encoder.gif_speed) {
        return Err(invalid("encoder.gif_speed must be between 1 and 30"));
    }

    // Counter store
    if config.counter_store.backend == CounterBackend::Upstash {
        match &config.counter_store.upstash {
            None => {
                return Err(invalid(
                    "counter_store.upstash is required when backend = \"upstash\"",
                ))
            }
            Some(upstash) if upstash.url.is_empty() || upstash.token.is_empty() => {
                return Err(invalid(
                    "counter_store.upstash.url and counter_store.upstash.token cannot be empty",
                ))
            }
            Some(_) => {}
        }
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
