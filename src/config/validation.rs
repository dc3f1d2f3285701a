use crate::config::types::{
    Config, CrawlerConfig, FilterConfig, OutputConfig, RendererConfig, RendererKind,
    UserAgentConfig, ValidationConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_renderer_config(&config.renderer)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_filter_config(&config.filter)?;
    validate_output_config(&config.output)?;
    validate_validation_config(&config.validation)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 100, got {}",
            config.max_concurrency
        )));
    }

    if config.chunk_size < 1 {
        return Err(ConfigError::Validation(format!(
            "chunk_size must be >= 1, got {}",
            config.chunk_size
        )));
    }

    if config.progress_interval_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "progress_interval_secs must be >= 1, got {}",
            config.progress_interval_secs
        )));
    }

    if config.min_batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "min_batch_size must be >= 1, got {}",
            config.min_batch_size
        )));
    }

    Ok(())
}

/// Validates renderer configuration
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "renderer timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.kind == RendererKind::Browser && !cfg!(feature = "browser") {
        return Err(ConfigError::Validation(
            "renderer kind 'browser' requires building with the 'browser' feature".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates the extension list and the exclusion vocabulary
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    for extension in &config.excluded_extensions {
        if !extension.starts_with('.') || extension.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "Excluded extension '{}' must start with '.' and name a suffix",
                extension
            )));
        }
    }

    if config.excluded_words.iter().any(|w| w.trim().is_empty()) {
        return Err(ConfigError::InvalidPattern(
            "Excluded words cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_validation_config(config: &ValidationConfig) -> Result<(), ConfigError> {
    if config.probe_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "probe_timeout_secs must be >= 1, got {}",
            config.probe_timeout_secs
        )));
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
