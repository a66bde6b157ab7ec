//! cURL command generator.
//!
//! Converts a [`CanonicalRequest`] back into a cURL command. Arguments that
//! need quoting are wrapped in double quotes with shell escapes, so the output
//! parses back with the default tokenizer.

use super::parser::{BOOLEAN_FLAGS, SSL_VERSION_FLAGS};
use super::url::join_url;
use crate::models::{Auth, CanonicalRequest, HttpMethod};
use url::{form_urlencoded, Url};

/// Generates a cURL command, broken over several lines when it is long.
///
/// # Examples
///
/// ```
/// use curl_rest_assured::curl::{generate_curl_command, parse_curl_command};
///
/// let request = parse_curl_command(
///     r#"curl -X POST https://api.example.com/users -H "Content-Type: application/json""#,
/// )
/// .unwrap();
///
/// let curl = generate_curl_command(&request);
/// assert!(curl.contains("-X POST"));
/// assert!(curl.contains(r#"-H "Content-Type: application/json""#));
/// ```
pub fn generate_curl_command(request: &CanonicalRequest) -> String {
    format_multiline(&command_parts(request, &CurlOptions::default()))
}

/// Generates a compact single-line cURL command.
pub fn generate_curl_command_compact(request: &CanonicalRequest) -> String {
    command_parts(request, &CurlOptions::default()).join(" ")
}

/// Converts a request to cURL with custom formatting options.
pub fn generate_curl_with_options(request: &CanonicalRequest, options: &CurlOptions) -> String {
    let parts = command_parts(request, options);
    if options.compact {
        parts.join(" ")
    } else {
        format_multiline(&parts)
    }
}

/// Options for cURL command generation.
#[derive(Debug, Clone, Default)]
pub struct CurlOptions {
    /// Generate a compact single-line command
    pub compact: bool,
    /// Include verbose flag (-v)
    pub verbose: bool,
    /// Include insecure flag (-k) for HTTPS
    pub insecure: bool,
}

/// Builds the command as a list of already-escaped parts, each flag joined
/// with its argument.
fn command_parts(request: &CanonicalRequest, options: &CurlOptions) -> Vec<String> {
    let mut parts = vec!["curl".to_string()];

    // A body without -X reads back as POST
    let has_payload =
        request.non_blank_body().is_some() || request.form_data.enabled().next().is_some();
    if request.method != HttpMethod::GET || (has_payload && !request.flag("get")) {
        parts.push(format!("-X {}", request.method.as_str()));
    }

    for header in request.headers.enabled() {
        parts.push(with_arg("-H", &format!("{}: {}", header.key, header.value)));
    }

    let cookies: Vec<String> = request
        .cookies
        .enabled()
        .map(|c| format!("{}={}", c.key, c.value))
        .collect();
    if !cookies.is_empty() {
        parts.push(with_arg("-b", &cookies.join("; ")));
    }

    match request.enabled_auth() {
        Some(Auth::Basic { username, password }) => {
            parts.push(with_arg("-u", &format!("{}:{}", username, password)));
        }
        Some(Auth::Bearer { token }) => parts.push(with_arg("--oauth2-bearer", token)),
        Some(Auth::None) | None => {}
    }

    for field in request.form_data.enabled() {
        parts.push(with_arg("-F", &format!("{}={}", field.key, field.value)));
    }

    if let Some(body) = request.non_blank_body() {
        parts.push(with_arg("-d", body.raw()));
    }

    if let Some(proxy) = &request.proxy {
        parts.push(with_arg("-x", proxy));
    }
    if let Some(agent) = &request.user_agent {
        parts.push(with_arg("-A", agent));
    }
    if let Some(referer) = &request.referer {
        parts.push(with_arg("-e", referer));
    }

    for (_, long, name) in BOOLEAN_FLAGS {
        let forced = match *name {
            "verbose" => options.verbose,
            "insecure" => options.insecure,
            _ => false,
        };
        if request.flag(name) || forced {
            parts.push(long.to_string());
        }
    }

    if let Some(network) = &request.network_config {
        // --max-time is the closest curl has to a plain timeout
        let max_time = network.max_time.or(network.timeout);
        let numbers = [
            ("--connect-timeout", network.connect_timeout),
            ("--max-time", max_time),
            ("--retry", network.retry.map(f64::from)),
            ("--retry-delay", network.retry_delay),
            ("--retry-max-time", network.retry_max_time),
            ("--max-redirs", network.max_redirects.map(f64::from)),
        ];
        for (flag, value) in numbers {
            if let Some(value) = value {
                parts.push(format!("{} {}", flag, value));
            }
        }
    }

    if let Some(ssl) = &request.ssl_config {
        let paths = [
            ("--cert", &ssl.cert),
            ("--key", &ssl.key),
            ("--cacert", &ssl.ca_cert),
            ("--capath", &ssl.ca_path),
        ];
        for (flag, value) in paths {
            if let Some(value) = value {
                parts.push(with_arg(flag, value));
            }
        }
        if let Some(version) = &ssl.ssl_version {
            if let Some((flag, _)) = SSL_VERSION_FLAGS.iter().find(|(_, v)| *v == version.as_str()) {
                parts.push(flag.to_string());
            }
        }
    }

    // Already shell tokens
    parts.extend(request.raw_options.iter().cloned());

    parts.push(escape_shell_arg(&request_url(request)));
    parts
}

fn with_arg(flag: &str, value: &str) -> String {
    format!("{} {}", flag, escape_shell_arg(value))
}

/// Rebuilds the URL from its parts so that disabled query parameters drop
/// out. Falls back to the stored URL when the base URL is opaque.
fn request_url(request: &CanonicalRequest) -> String {
    let structured = Url::parse(&request.base_url).map_or(false, |u| u.has_host());
    if !structured {
        return request.url.clone();
    }

    let mut url = join_url(&request.base_url, &request.endpoint);
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(
            request
                .query_params
                .enabled()
                .map(|p| (p.key.as_str(), p.value.as_str())),
        )
        .finish();
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// Escapes a string for safe use in shell commands.
///
/// Uses double quotes, escaping the characters the shell still interprets
/// inside them.
fn escape_shell_arg(arg: &str) -> String {
    if !needs_quoting(arg) {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for ch in arg.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Checks if a string needs quoting for shell safety.
fn needs_quoting(s: &str) -> bool {
    let special_chars = [
        ' ', '\t', '\n', '\r', '|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\'', '*',
        '?', '[', ']', '#', '~', '=', '%', '{', '}',
    ];

    s.is_empty() || s.chars().any(|c| special_chars.contains(&c))
}

/// Formats cURL command parts into a multi-line string with backslash continuations.
fn format_multiline(parts: &[String]) -> String {
    if parts.is_empty() {
        return String::new();
    }

    // If the command is short, keep it on one line
    let single_line = parts.join(" ");
    if single_line.len() <= 80 {
        return single_line;
    }

    let mut result = String::new();
    result.push_str(&parts[0]);

    for part in &parts[1..] {
        result.push_str(" \\\n  ");
        result.push_str(part);
    }

    result
}
