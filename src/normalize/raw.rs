//! The loosely-shaped request the normalizer accepts.
//!
//! The cURL flag interpreter fills a [`RawRequest`] directly. Backends that
//! already extracted a request send the same shape as JSON, where network
//! and SSL settings may arrive flat (`timeout`, `cert`, ...) or grouped
//! (`networkConfig`, `sslConfig`).

use crate::models::{AuthConfig, HttpMethod, NetworkConfig, ParamList, RequestBody, SslConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRequest {
    pub method: Option<HttpMethod>,
    pub url: Option<String>,
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub path_template: Option<String>,
    pub path_parameters: Option<Vec<String>>,
    pub query_params: ParamList,
    pub headers: ParamList,
    pub body: Option<RequestBody>,
    pub form_data: ParamList,
    pub cookies: ParamList,
    pub auth: Option<AuthConfig>,
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub flags: IndexMap<String, bool>,
    pub raw_options: Vec<String>,

    // Flat network fields
    pub timeout: Option<f64>,
    pub connect_timeout: Option<f64>,
    pub max_time: Option<f64>,
    pub retry: Option<u32>,
    pub retry_delay: Option<f64>,
    pub retry_max_time: Option<f64>,
    pub max_redirects: Option<i32>,
    pub network_config: Option<NetworkConfig>,

    // Flat SSL fields
    pub cert: Option<String>,
    pub key: Option<String>,
    pub ca_cert: Option<String>,
    pub ca_path: Option<String>,
    pub ssl_version: Option<String>,
    pub ssl_config: Option<SslConfig>,
}

impl RawRequest {
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}
