use crate::config::types::{
    ArtifactConfig, CatalogConfig, Config, FetchConfig, PhaseConfig, StorageConfig,
};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_catalog_config(&config.catalog)?;
    validate_phase_config("listing", &config.listing)?;
    validate_phase_config("detail", &config.detail)?;
    validate_fetch_config(&config.fetch)?;
    validate_artifact_config(&config.artifacts)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates the catalog section
fn validate_catalog_config(config: &CatalogConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    if config.total_pages < 1 {
        return Err(ConfigError::Validation(
            "total_pages must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates wave settings for one crawl phase
fn validate_phase_config(phase: &str, config: &PhaseConfig) -> ConfigResult<()> {
    if config.batch_size < 1 || config.batch_size > 100 {
        return Err(ConfigError::Validation(format!(
            "{}.batch_size must be between 1 and 100, got {}",
            phase, config.batch_size
        )));
    }

    Ok(())
}

/// Validates fetch settings
fn validate_fetch_config(config: &FetchConfig) -> ConfigResult<()> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(
            "max_attempts must be >= 1".to_string(),
        ));
    }

    if config.backoff_base_ms > config.backoff_max_ms {
        return Err(ConfigError::Validation(format!(
            "backoff_base_ms ({}) cannot exceed backoff_max_ms ({})",
            config.backoff_base_ms, config.backoff_max_ms
        )));
    }

    if config.user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user_agents must contain at least one entry".to_string(),
        ));
    }

    if config.user_agents.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user_agents cannot contain blank entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates artifact paths
fn validate_artifact_config(config: &ArtifactConfig) -> ConfigResult<()> {
    if config.extracted_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "extracted_path cannot be empty".to_string(),
        ));
    }

    if config.transformed_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "transformed_path cannot be empty".to_string(),
        ));
    }

    if config.extracted_path == config.transformed_path {
        return Err(ConfigError::Validation(
            "extracted_path and transformed_path must differ".to_string(),
        ));
    }

    Ok(())
}

/// Validates the object store destination
fn validate_storage_config(config: &StorageConfig) -> ConfigResult<()> {
    if config.bucket.trim().is_empty() {
        return Err(ConfigError::Validation("bucket cannot be empty".to_string()));
    }

    if config.key.trim().is_empty() {
        return Err(ConfigError::Validation("key cannot be empty".to_string()));
    }

    if let Some(endpoint) = &config.endpoint {
        Url::parse(endpoint)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid storage endpoint: {}", e)))?;
    }

    Ok(())
}
