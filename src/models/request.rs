//! Canonical request model.
//!
//! This module defines the normalized, flag-free representation of a single
//! HTTP request produced by the cURL parser and consumed by the code
//! generators and the projection filter.

use super::params::ParamList;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP request method.
///
/// Represents all standard HTTP methods as defined in RFC 7231 and RFC 5789.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    #[default]
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
    /// HTTP TRACE method - perform a message loop-back test
    TRACE,
    /// HTTP CONNECT method - establish a tunnel to the server
    CONNECT,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::TRACE => "TRACE",
            HttpMethod::CONNECT => "CONNECT",
        }
    }

    /// Parses a string into an HttpMethod, ignoring case.
    ///
    /// Returns `None` if the string is not a standard HTTP method.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "DELETE" => Some(HttpMethod::DELETE),
            "PATCH" => Some(HttpMethod::PATCH),
            "OPTIONS" => Some(HttpMethod::OPTIONS),
            "HEAD" => Some(HttpMethod::HEAD),
            "TRACE" => Some(HttpMethod::TRACE),
            "CONNECT" => Some(HttpMethod::CONNECT),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HttpMethod::from_str(&value).ok_or_else(|| format!("unknown HTTP method '{}'", value))
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

/// Request body with its raw text and, when the text is valid JSON, the
/// parsed value.
///
/// Serializes as the raw text. Deserializes from a string, or from any other
/// JSON value which then becomes both the parsed form and, re-encoded, the
/// raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub struct RequestBody {
    raw: String,
    json: Option<Value>,
}

impl RequestBody {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let json = serde_json::from_str(raw.trim()).ok();
        Self { raw, json }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed JSON form, if the raw text is JSON.
    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        match value {
            Value::String(raw) => RequestBody::new(raw),
            Value::Null => RequestBody::new(""),
            other => RequestBody {
                raw: other.to_string(),
                json: Some(other),
            },
        }
    }
}

impl From<RequestBody> for String {
    fn from(body: RequestBody) -> Self {
        body.raw
    }
}

/// Authentication scheme attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Auth {
    #[default]
    None,
    Basic {
        #[serde(default)]
        username: String,
        #[serde(default)]
        password: String,
    },
    Bearer {
        #[serde(default)]
        token: String,
    },
}

/// An [`Auth`] scheme together with its editor on/off switch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(flatten)]
    pub scheme: Auth,
    #[serde(default)]
    pub enabled: bool,
}

impl AuthConfig {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            scheme: Auth::Basic {
                username: username.into(),
                password: password.into(),
            },
            enabled: true,
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            scheme: Auth::Bearer {
                token: token.into(),
            },
            enabled: true,
        }
    }
}

/// Timing, retry and redirect settings carried by the command.
///
/// Durations are in seconds, as cURL takes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_max_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_redirects: Option<i32>,
}

impl NetworkConfig {
    pub fn is_empty(&self) -> bool {
        self == &NetworkConfig::default()
    }
}

/// Client certificate and TLS settings carried by the command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SslConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_version: Option<String>,
}

impl SslConfig {
    pub fn is_empty(&self) -> bool {
        self == &SslConfig::default()
    }
}

/// The normalized representation of one HTTP request.
///
/// Produced by [`crate::curl::parse_curl_command`] and
/// [`crate::normalize::normalize`]. After normalization every optional group
/// that is present is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanonicalRequest {
    pub method: HttpMethod,

    /// The request URL as given on the command line.
    pub url: String,

    /// `scheme://host[:port]`, or the whole URL when it could not be parsed.
    pub base_url: String,

    /// Decoded path, `/` when empty.
    pub endpoint: String,

    /// Endpoint with every path placeholder written as `{name}`.
    pub path_template: String,

    /// Placeholder names in order of first appearance.
    pub path_parameters: Vec<String>,

    pub query_params: ParamList,

    /// Header names keep the case they were given in.
    pub headers: ParamList,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,

    pub form_data: ParamList,

    pub cookies: ParamList,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,

    /// Boolean switches such as `compressed` or `insecure`. A missing flag
    /// means the same as `false`.
    pub flags: IndexMap<String, bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_config: Option<NetworkConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_config: Option<SslConfig>,

    /// Unrecognized flags and stray arguments, in command-line order.
    pub raw_options: Vec<String>,
}

impl CanonicalRequest {
    /// Returns whether the boolean flag `name` is set.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Returns the body when it is present and not just whitespace.
    pub fn non_blank_body(&self) -> Option<&RequestBody> {
        self.body.as_ref().filter(|b| !b.is_blank())
    }

    /// Gets the Content-Type header value if present and enabled.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get_ignore_case("content-type")
    }

    /// Auth scheme, if one is attached and enabled.
    pub fn enabled_auth(&self) -> Option<&Auth> {
        self.auth
            .as_ref()
            .filter(|a| a.enabled)
            .map(|a| &a.scheme)
    }
}
