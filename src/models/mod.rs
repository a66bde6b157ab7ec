//! Data models for the canonical request.
//!
//! This module contains the core data structures shared by the cURL parser,
//! the normalizer, the projection filter and the code generators.

pub mod params;
pub mod request;

pub use params::{DuplicateKeys, Param, ParamList};
pub use request::{
    Auth, AuthConfig, CanonicalRequest, HttpMethod, NetworkConfig, RequestBody, SslConfig,
};
