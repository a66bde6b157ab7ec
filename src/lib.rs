//! cURL to REST-assured test generator.
//!
//! Parses a cURL command line into a canonical request model, then renders
//! Java test code for the REST-assured library from that model.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - **curl**: Tokenizes and interprets cURL commands, and re-emits them
//! - **normalize**: Merges raw input into a [`CanonicalRequest`] and prunes empty fields
//! - **models**: Core data structures for the canonical request
//! - **codegen**: REST-assured test code, POJO classes and Maven POM generation
//! - **config**: Generation settings and their validation
//! - **filter**: Path-based field projection over a request
//!
//! # Pipeline
//!
//! 1. The tokenizer splits the command into shell-like tokens
//! 2. The flag interpreter maps tokens onto a [`normalize::RawRequest`]
//! 3. The normalizer decomposes the URL, infers the method and merges
//!    flat and grouped network/SSL options
//! 4. The code generator validates the request and config, then renders
//!
//! # Usage
//!
//! ```
//! use curl_rest_assured::{generate, parse, GenerationConfig};
//!
//! let request = parse(
//!     r#"curl -X POST https://api.example.com/users -H "Authorization: Bearer tok123" -d '{"name":"Ana"}'"#,
//! )
//! .unwrap();
//!
//! let code = generate(&request, &GenerationConfig::full("users", "create user")).unwrap();
//! assert!(code.test_code.contains(r#".auth().oauth2("tok123")"#));
//! assert!(code.test_code.contains(".statusCode(200)"));
//! ```

pub mod codegen;
pub mod config;
pub mod curl;
pub mod filter;
pub mod models;
pub mod normalize;

use serde_json::Value;
use std::collections::HashMap;

pub use codegen::{CodeGenError, GeneratedCode};
pub use config::{ConfigError, GenerationConfig, GenerationOption};
pub use curl::{CurlOptions, ParseError, ParseOptions};
pub use filter::FilterError;
pub use models::CanonicalRequest;

/// Parses a cURL command with default options.
pub fn parse(command: &str) -> Result<CanonicalRequest, ParseError> {
    curl::parse_curl_command(command)
}

/// Parses a cURL command with explicit tokenizer and interpreter options.
pub fn parse_with_options(
    command: &str,
    options: &ParseOptions,
) -> Result<CanonicalRequest, ParseError> {
    curl::parse_with_options(command, options)
}

/// Normalizes a request payload given as JSON.
///
/// Accepts flat and grouped network/SSL fields alike.
pub fn normalize_value(payload: &Value) -> Result<CanonicalRequest, ParseError> {
    normalize::normalize_value(payload)
}

/// Generates REST-assured code for a request.
pub fn generate(
    request: &CanonicalRequest,
    config: &GenerationConfig,
) -> Result<GeneratedCode, CodeGenError> {
    codegen::generate(request, config)
}

/// Keeps every field whose dotted path is not mapped to `false`.
pub fn project(
    request: &CanonicalRequest,
    inclusion: &HashMap<String, bool>,
) -> Result<CanonicalRequest, FilterError> {
    filter::project(request, inclusion)
}

/// Deserializes and validates generation settings.
pub fn load_generation_config(settings: Value) -> Result<GenerationConfig, ConfigError> {
    config::load_generation_config(settings)
}

/// Renders a request back into a cURL command.
pub fn generate_curl_command(request: &CanonicalRequest) -> String {
    curl::generate_curl_command(request)
}
