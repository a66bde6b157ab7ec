//! Generation configuration.
//!
//! Configuration arrives as JSON from the calling layer, is deserialized with
//! defaults for every missing field, and is validated before use. There is no
//! global configuration: each generation call receives its own.

pub mod schema;

pub use schema::{
    DependencySwitches, GenerationConfig, GenerationOption, JavaVersion, PomConfig, PomType,
    ProjectInfo,
};

use log::warn;
use serde_json::Value;
use thiserror::Error;

/// Errors from loading or validating a [`GenerationConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The JSON does not have the configuration shape.
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A field has a value outside its allowed range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Loads a generation configuration from a JSON value.
///
/// Missing fields take their defaults; the result is validated.
///
/// # Example
///
/// ```
/// use curl_rest_assured::config::{load_generation_config, GenerationOption};
/// use serde_json::json;
///
/// let config = load_generation_config(json!({
///     "option": "full",
///     "serviceName": "user service",
///     "methodName": "create user",
///     "statusCode": 201
/// }))
/// .unwrap();
///
/// assert_eq!(config.option, GenerationOption::Full);
/// assert_eq!(config.status_code, "201");
/// assert!(config.use_fluent_api);
/// ```
pub fn load_generation_config(settings: Value) -> Result<GenerationConfig, ConfigError> {
    let config: GenerationConfig = serde_json::from_value(settings).map_err(|e| {
        warn!("failed to parse generation config: {}", e);
        ConfigError::from(e)
    })?;

    if let Err(e) = config.validate() {
        warn!("rejecting generation config: {}", e);
        return Err(e);
    }

    Ok(config)
}
