//! Splitting a request URL into base URL, endpoint and query parameters.

use crate::models::ParamList;
use log::debug;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

/// Matches `{{name}}`, `{name}` and `:name` path placeholders.
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][\w-]*)\s*\}\}|\{([A-Za-z_][\w-]*)\}|(^|/):([A-Za-z_][\w-]*)")
        .expect("placeholder regex is valid")
});

/// The pieces of a URL, as the canonical request stores them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposedUrl {
    pub base_url: String,
    pub endpoint: String,
    pub query_params: ParamList,
    /// `false` when the URL could not be parsed and the fallback was used.
    pub parsed: bool,
}

/// Decomposes `raw` into base URL, endpoint and query parameters.
///
/// An unparsable URL, or one without a host, is kept whole as the base URL
/// with endpoint `/` and no query parameters.
pub fn decompose_url(raw: &str) -> DecomposedUrl {
    let raw = raw.trim();

    let url = match Url::parse(raw) {
        Ok(url) if url.has_host() => url,
        Ok(_) => return fallback(raw, "URL has no host"),
        Err(e) => return fallback(raw, &e.to_string()),
    };

    let host = url.host_str().unwrap_or_default();
    let base_url = match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    };

    let path = decode_path(url.path());
    let endpoint = if path.is_empty() { "/".to_string() } else { path };

    let query_params = url.query_pairs().collect();

    DecomposedUrl {
        base_url,
        endpoint,
        query_params,
        parsed: true,
    }
}

/// Decodes only the escapes that name unreserved characters or placeholder
/// braces. Everything else (`%2F`, `%3F`, `%23`, `%25`, non-ASCII) stays
/// encoded so the endpoint still addresses the same resource.
fn decode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(i) = rest.find('%') {
        out.push_str(&rest[..i]);
        let decoded: Option<Vec<u8>> =
            rest.get(i..i + 3).map(|e| percent_decode_str(e).collect());
        match decoded.as_deref() {
            Some(&[byte]) if is_safe_to_decode(byte) => {
                out.push(byte as char);
                rest = &rest[i + 3..];
            }
            _ => {
                out.push('%');
                rest = &rest[i + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_safe_to_decode(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b'{' | b'}')
}

fn fallback(raw: &str, reason: &str) -> DecomposedUrl {
    debug!("treating '{}' as an opaque base URL: {}", raw, reason);
    DecomposedUrl {
        base_url: raw.to_string(),
        endpoint: "/".to_string(),
        query_params: ParamList::new(),
        parsed: false,
    }
}

/// Rewrites every placeholder in `endpoint` as `{name}` and lists the names
/// in order of first appearance.
pub fn extract_path_template(endpoint: &str) -> (String, Vec<String>) {
    let mut parameters: Vec<String> = Vec::new();

    let template = PLACEHOLDER_REGEX.replace_all(endpoint, |caps: &regex::Captures| {
        let (prefix, name) = match (caps.get(1), caps.get(2), caps.get(4)) {
            (Some(name), _, _) | (None, Some(name), _) => ("", name.as_str()),
            (None, None, Some(name)) => (caps.get(3).map_or("", |m| m.as_str()), name.as_str()),
            _ => return caps[0].to_string(),
        };
        if !parameters.iter().any(|p| p == name) {
            parameters.push(name.to_string());
        }
        format!("{}{{{}}}", prefix, name)
    });

    (template.into_owned(), parameters)
}

/// Joins a base URL and an endpoint without doubling or dropping the slash.
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    match (base_url.ends_with('/'), endpoint.starts_with('/')) {
        (true, true) => format!("{}{}", base_url, &endpoint[1..]),
        (false, false) if !endpoint.is_empty() => format!("{}/{}", base_url, endpoint),
        _ => format!("{}{}", base_url, endpoint),
    }
}
