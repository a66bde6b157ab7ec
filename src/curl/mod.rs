//! cURL command parsing and generation.
//!
//! Converts cURL command lines into [`CanonicalRequest`]s and back. Parsing
//! runs in three stages: the [`tokenizer`] splits the command line, the
//! flag interpreter in [`parser`] maps flags onto request fields, and the
//! normalizer merges in what the [`url`] decomposer derives from the URL.
//!
//! # Examples
//!
//! ## Parsing a cURL command
//!
//! ```
//! use curl_rest_assured::curl::parse_curl_command;
//! use curl_rest_assured::models::HttpMethod;
//!
//! let curl = r#"curl -X POST https://api.example.com/users \
//!   -H "Content-Type: application/json" \
//!   -d {"name":"John"}"#;
//!
//! let request = parse_curl_command(curl).unwrap();
//! assert_eq!(request.method, HttpMethod::POST);
//! assert_eq!(request.base_url, "https://api.example.com");
//! assert_eq!(request.endpoint, "/users");
//! ```
//!
//! ## Generating a cURL command
//!
//! ```
//! use curl_rest_assured::curl::{generate_curl_command, parse_curl_command};
//!
//! let request = parse_curl_command("curl -u admin:secret https://api.example.com").unwrap();
//! let curl = generate_curl_command(&request);
//! assert!(curl.contains("-u admin:secret"));
//! ```
//!
//! # Quoting
//!
//! By default only double quotes group whitespace. Commands copied from a
//! POSIX shell that rely on single quotes parse with [`ParseOptions::shell`].
//!
//! [`CanonicalRequest`]: crate::models::CanonicalRequest

pub mod error;
pub mod generator;
pub mod parser;
pub mod tokenizer;
pub mod url;

pub use error::ParseError;
pub use generator::{
    generate_curl_command, generate_curl_command_compact, generate_curl_with_options, CurlOptions,
};
pub use parser::{interpret_tokens, parse_curl_command, parse_with_options, ParseOptions};
pub use tokenizer::{strip_quotes, tokenize, tokenize_with, TokenizerOptions, UnterminatedQuote};
pub use url::{decompose_url, extract_path_template, DecomposedUrl};
