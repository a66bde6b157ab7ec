//! Request normalization.
//!
//! Merges the output of the flag interpreter (or a backend-supplied request
//! payload) with what can be derived from the URL, fills defaults, and prunes
//! empty content so that every optional group left in the
//! [`CanonicalRequest`] is non-empty.
//!
//! Precedence rules:
//!
//! - an explicitly supplied field wins over one recomputed locally (for
//!   example a supplied `endpoint` over the path of `url`);
//! - a flat network/SSL field wins over the same field inside the grouped
//!   `networkConfig`/`sslConfig` object.

pub mod prune;
pub mod raw;

pub use prune::{prune, prune_or_empty};
pub use raw::RawRequest;

use crate::curl::url::{decompose_url, extract_path_template, join_url};
use crate::curl::ParseError;
use crate::models::{CanonicalRequest, HttpMethod, NetworkConfig, SslConfig};
use log::debug;
use serde_json::Value;

/// Returns the first candidate that is `Some`, in precedence order.
pub fn first_defined<T>(candidates: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    candidates.into_iter().flatten().next()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Normalizes a backend-supplied request payload.
///
/// # Examples
///
/// ```
/// use curl_rest_assured::normalize::normalize_value;
/// use serde_json::json;
///
/// let request = normalize_value(&json!({
///     "url": "https://api.example.com/users?page=2",
///     "timeout": 5,
///     "networkConfig": {"timeout": 30, "retry": 2}
/// }))
/// .unwrap();
///
/// let network = request.network_config.unwrap();
/// assert_eq!(network.timeout, Some(5.0));
/// assert_eq!(network.retry, Some(2));
/// ```
pub fn normalize_value(value: &Value) -> Result<CanonicalRequest, ParseError> {
    let raw: RawRequest = serde_json::from_value(value.clone())?;
    normalize(raw)
}

/// Merges a [`RawRequest`] into a clean [`CanonicalRequest`].
///
/// Fails with [`ParseError::MissingUrl`] when neither a URL nor a base URL
/// is available.
pub fn normalize(raw: RawRequest) -> Result<CanonicalRequest, ParseError> {
    let get_flag = raw.flag("get");
    let head_flag = raw.flag("head");

    let RawRequest {
        method,
        url,
        base_url,
        endpoint,
        path_template,
        path_parameters,
        query_params,
        headers,
        body,
        form_data,
        cookies,
        auth,
        proxy,
        user_agent,
        referer,
        flags,
        raw_options,
        timeout,
        connect_timeout,
        max_time,
        retry,
        retry_delay,
        retry_max_time,
        max_redirects,
        network_config,
        cert,
        key,
        ca_cert,
        ca_path,
        ssl_version,
        ssl_config,
    } = raw;

    let url = non_blank(url);
    let decomposed = url.as_deref().map(decompose_url);

    let base_url = first_defined([
        non_blank(base_url),
        decomposed.as_ref().map(|d| d.base_url.clone()),
    ])
    .ok_or(ParseError::MissingUrl)?;

    let endpoint = first_defined([
        non_blank(endpoint),
        decomposed.as_ref().map(|d| d.endpoint.clone()),
    ])
    .unwrap_or_else(|| "/".to_string());

    let url = url.unwrap_or_else(|| join_url(&base_url, &endpoint));

    let mut query_params = if query_params.is_empty() {
        decomposed.map(|d| d.query_params).unwrap_or_default()
    } else {
        query_params
    };

    let (derived_template, derived_parameters) = extract_path_template(&endpoint);
    let path_template = non_blank(path_template).unwrap_or(derived_template);
    let path_parameters = path_parameters
        .filter(|p| !p.is_empty())
        .unwrap_or(derived_parameters);

    let mut body = body.filter(|b| !b.is_blank());

    // -G sends the data as query string
    if get_flag {
        if let Some(data) = body.take() {
            debug!("moving request data into the query string (-G)");
            for (name, value) in url::form_urlencoded::parse(data.raw().as_bytes()) {
                query_params.insert(name, value);
            }
        }
    }

    let method = match method {
        Some(method) => method,
        None if head_flag => HttpMethod::HEAD,
        None if body.is_some() || !form_data.is_empty() => HttpMethod::POST,
        None => HttpMethod::GET,
    };

    let grouped = network_config.unwrap_or_default();
    let network = NetworkConfig {
        timeout: first_defined([timeout, grouped.timeout]),
        connect_timeout: first_defined([connect_timeout, grouped.connect_timeout]),
        max_time: first_defined([max_time, grouped.max_time]),
        retry: first_defined([retry, grouped.retry]),
        retry_delay: first_defined([retry_delay, grouped.retry_delay]),
        retry_max_time: first_defined([retry_max_time, grouped.retry_max_time]),
        max_redirects: first_defined([max_redirects, grouped.max_redirects]),
    };

    let grouped = ssl_config.unwrap_or_default();
    let ssl = SslConfig {
        cert: first_defined([non_blank(cert), non_blank(grouped.cert)]),
        key: first_defined([non_blank(key), non_blank(grouped.key)]),
        ca_cert: first_defined([non_blank(ca_cert), non_blank(grouped.ca_cert)]),
        ca_path: first_defined([non_blank(ca_path), non_blank(grouped.ca_path)]),
        ssl_version: first_defined([non_blank(ssl_version), non_blank(grouped.ssl_version)]),
    };

    let request = CanonicalRequest {
        method,
        url,
        base_url,
        endpoint,
        path_template,
        path_parameters,
        query_params,
        headers,
        body,
        form_data,
        cookies,
        auth,
        proxy: non_blank(proxy),
        user_agent: non_blank(user_agent),
        referer: non_blank(referer),
        flags,
        network_config: (!network.is_empty()).then_some(network),
        ssl_config: (!ssl.is_empty()).then_some(ssl),
        raw_options,
    };

    clean(&request)
}

/// Prunes empty content out of a request.
///
/// The request goes through its JSON form so the same rules apply at every
/// depth: empty strings, `false`, and empty lists or groups disappear.
pub fn clean(request: &CanonicalRequest) -> Result<CanonicalRequest, ParseError> {
    let value = serde_json::to_value(request)?;
    Ok(serde_json::from_value(prune_or_empty(value))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthConfig, Param, ParamList, RequestBody};
    use serde_json::json;

    fn raw_with_url(url: &str) -> RawRequest {
        RawRequest {
            url: Some(url.to_string()),
            ..RawRequest::default()
        }
    }

    #[test]
    fn test_first_defined() {
        assert_eq!(first_defined([None, Some(2), Some(3)]), Some(2));
        assert_eq!(first_defined::<i32>([None, None]), None);
    }

    #[test]
    fn test_normalize_decomposes_url() {
        let request = normalize(raw_with_url("http://a.com/p?x=1&y=2")).unwrap();

        assert_eq!(request.base_url, "http://a.com");
        assert_eq!(request.endpoint, "/p");
        assert_eq!(request.path_template, "/p");
        assert_eq!(request.query_params.get("x"), Some("1"));
        assert_eq!(request.query_params.get("y"), Some("2"));
        assert_eq!(request.method, HttpMethod::GET);
    }

    #[test]
    fn test_missing_url_and_base_url() {
        assert_eq!(normalize(RawRequest::default()), Err(ParseError::MissingUrl));
    }

    #[test]
    fn test_base_url_without_url_rebuilds_url() {
        let raw = RawRequest {
            base_url: Some("https://api.example.com".to_string()),
            endpoint: Some("/users".to_string()),
            ..RawRequest::default()
        };
        let request = normalize(raw).unwrap();

        assert_eq!(request.url, "https://api.example.com/users");
        assert_eq!(request.endpoint, "/users");
    }

    #[test]
    fn test_explicit_fields_win_over_derived() {
        let raw = RawRequest {
            url: Some("https://api.example.com/v2/users?page=1".to_string()),
            endpoint: Some("/users".to_string()),
            query_params: [("limit", "10")].into_iter().collect(),
            ..RawRequest::default()
        };
        let request = normalize(raw).unwrap();

        assert_eq!(request.base_url, "https://api.example.com");
        assert_eq!(request.endpoint, "/users");
        assert_eq!(request.query_params.get("limit"), Some("10"));
        assert_eq!(request.query_params.get("page"), None);
    }

    #[test]
    fn test_unparsable_url_falls_back_to_explicit_fields() {
        let raw = RawRequest {
            url: Some("http//broken".to_string()),
            base_url: Some("https://fallback.example.com".to_string()),
            endpoint: Some("/health".to_string()),
            ..RawRequest::default()
        };
        let request = normalize(raw).unwrap();

        assert_eq!(request.url, "http//broken");
        assert_eq!(request.base_url, "https://fallback.example.com");
        assert_eq!(request.endpoint, "/health");
    }

    #[test]
    fn test_flat_network_fields_win_over_grouped() {
        let request = normalize_value(&json!({
            "url": "https://api.example.com",
            "connectTimeout": 3,
            "networkConfig": {"connectTimeout": 10, "maxRedirects": 5},
            "caCert": "flat.pem",
            "sslConfig": {"caCert": "grouped.pem", "sslVersion": "tlsv1.3"}
        }))
        .unwrap();

        let network = request.network_config.unwrap();
        assert_eq!(network.connect_timeout, Some(3.0));
        assert_eq!(network.max_redirects, Some(5));

        let ssl = request.ssl_config.unwrap();
        assert_eq!(ssl.ca_cert.as_deref(), Some("flat.pem"));
        assert_eq!(ssl.ssl_version.as_deref(), Some("tlsv1.3"));
    }

    #[test]
    fn test_empty_groups_are_pruned() {
        let request = normalize_value(&json!({
            "url": "https://api.example.com",
            "networkConfig": {},
            "sslConfig": {"cert": ""},
            "flags": {"compressed": false},
            "proxy": "",
            "body": "   "
        }))
        .unwrap();

        assert!(request.network_config.is_none());
        assert!(request.ssl_config.is_none());
        assert!(request.flags.is_empty());
        assert!(request.proxy.is_none());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_method_inference() {
        let mut raw = raw_with_url("https://api.example.com");
        raw.body = Some(RequestBody::new("a=1"));
        assert_eq!(normalize(raw).unwrap().method, HttpMethod::POST);

        let mut raw = raw_with_url("https://api.example.com");
        raw.flags.insert("head".to_string(), true);
        assert_eq!(normalize(raw).unwrap().method, HttpMethod::HEAD);

        let mut raw = raw_with_url("https://api.example.com");
        raw.method = Some(HttpMethod::PUT);
        raw.body = Some(RequestBody::new("a=1"));
        assert_eq!(normalize(raw).unwrap().method, HttpMethod::PUT);
    }

    #[test]
    fn test_get_flag_moves_data_to_query() {
        let mut raw = raw_with_url("https://api.example.com/search?lang=en");
        raw.flags.insert("get".to_string(), true);
        raw.body = Some(RequestBody::new("q=rust%20lang&page=2"));

        let request = normalize(raw).unwrap();

        assert_eq!(request.method, HttpMethod::GET);
        assert!(request.body.is_none());
        assert_eq!(request.query_params.get("lang"), Some("en"));
        assert_eq!(request.query_params.get("q"), Some("rust lang"));
        assert_eq!(request.query_params.get("page"), Some("2"));
    }

    #[test]
    fn test_path_parameters_extracted() {
        let request = normalize(raw_with_url("https://api.example.com/users/{id}/posts")).unwrap();

        assert_eq!(request.path_template, "/users/{id}/posts");
        assert_eq!(request.path_parameters, vec!["id"]);
    }

    #[test]
    fn test_empty_path_parameters_are_derived() {
        let mut raw = raw_with_url("https://api.example.com/users/{id}");
        raw.path_parameters = Some(Vec::new());
        let request = normalize(raw).unwrap();

        assert_eq!(request.path_template, "/users/{id}");
        assert_eq!(request.path_parameters, vec!["id"]);
    }

    #[test]
    fn test_clean_keeps_disabled_entries_disabled() {
        let mut headers = ParamList::new();
        headers.push(Param::disabled("X-Debug", "1"));
        let request = CanonicalRequest {
            url: "https://api.example.com".to_string(),
            headers,
            auth: Some(AuthConfig {
                enabled: false,
                ..AuthConfig::bearer("t")
            }),
            ..CanonicalRequest::default()
        };

        let cleaned = clean(&request).unwrap();

        assert_eq!(cleaned.headers.len(), 1);
        assert_eq!(cleaned.headers.enabled().count(), 0);
        assert_eq!(cleaned.enabled_auth(), None);
        assert_eq!(clean(&cleaned).unwrap(), cleaned);
    }

    #[test]
    fn test_invalid_payload_is_structured_error() {
        let result = normalize_value(&json!({"url": "https://a.com", "method": "FETCH"}));
        assert!(matches!(result, Err(ParseError::InvalidInput(_))));
    }
}
