//! cURL command parser.
//!
//! Walks the token stream produced by [`super::tokenizer`] and maps the
//! recognized cURL flags onto a [`RawRequest`], which the normalizer then
//! turns into a [`CanonicalRequest`].
//!
//! The interpreter is lenient: unknown flags are skipped (and kept in
//! `rawOptions`), flags missing their argument are ignored, and unparsable
//! values fall back to defaults. Only an unusable result (no URL at all) is
//! reported as an error, by the normalizer.

use super::error::ParseError;
use super::tokenizer::{strip_quotes, tokenize_with, TokenizerOptions};
use crate::models::{AuthConfig, CanonicalRequest, DuplicateKeys, HttpMethod, RequestBody};
use crate::normalize::{normalize, RawRequest};
use log::{debug, warn};

/// Boolean switches: optional short letter, long spelling, flag name in the model.
pub(crate) const BOOLEAN_FLAGS: &[(Option<char>, &str, &str)] = &[
    (None, "--compressed", "compressed"),
    (Some('k'), "--insecure", "insecure"),
    (Some('L'), "--location", "location"),
    (None, "--http1.0", "http10"),
    (None, "--http1.1", "http11"),
    (None, "--http2", "http2"),
    (None, "--http3", "http3"),
    (Some('s'), "--silent", "silent"),
    (Some('S'), "--show-error", "showError"),
    (Some('v'), "--verbose", "verbose"),
    (Some('i'), "--include", "include"),
    (Some('I'), "--head", "head"),
    (Some('G'), "--get", "get"),
    (Some('f'), "--fail", "fail"),
    (Some('N'), "--no-buffer", "noBuffer"),
];

/// TLS/SSL protocol switches and the version name they select.
pub(crate) const SSL_VERSION_FLAGS: &[(&str, &str)] = &[
    ("--tlsv1", "tlsv1"),
    ("--tlsv1.0", "tlsv1.0"),
    ("--tlsv1.1", "tlsv1.1"),
    ("--tlsv1.2", "tlsv1.2"),
    ("--tlsv1.3", "tlsv1.3"),
    ("--sslv2", "sslv2"),
    ("--sslv3", "sslv3"),
];

/// Parser behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub tokenizer: TokenizerOptions,
    /// How repeated `-H` lines with the same name are resolved.
    pub duplicate_headers: DuplicateKeys,
}

impl ParseOptions {
    /// Shell-style quoting with the default header policy.
    pub fn shell() -> Self {
        Self {
            tokenizer: TokenizerOptions::shell(),
            ..Self::default()
        }
    }
}

/// Flags that take an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueFlag {
    Request,
    Header,
    Data,
    User,
    OAuth2Bearer,
    Form,
    Cookie,
    UserAgent,
    Referer,
    Proxy,
    Url,
    MaxTime,
    ConnectTimeout,
    Retry,
    RetryDelay,
    RetryMaxTime,
    MaxRedirs,
    Cert,
    Key,
    CaCert,
    CaPath,
    /// Known flags that do not describe the request itself.
    Ignored,
}

fn value_flag(name: &str) -> Option<ValueFlag> {
    use ValueFlag::*;

    Some(match name {
        "-X" | "--request" => Request,
        "-H" | "--header" => Header,
        "-d" | "--data" | "--data-raw" | "--data-binary" | "--data-ascii" | "--data-urlencode" => {
            Data
        }
        "-u" | "--user" => User,
        "--oauth2-bearer" => OAuth2Bearer,
        "-F" | "--form" | "--form-string" => Form,
        "-b" | "--cookie" => Cookie,
        "-A" | "--user-agent" => UserAgent,
        "-e" | "--referer" => Referer,
        "-x" | "--proxy" => Proxy,
        "--url" => Url,
        "-m" | "--max-time" => MaxTime,
        "--connect-timeout" => ConnectTimeout,
        "--retry" => Retry,
        "--retry-delay" => RetryDelay,
        "--retry-max-time" => RetryMaxTime,
        "--max-redirs" => MaxRedirs,
        "-E" | "--cert" => Cert,
        "--key" => Key,
        "--cacert" => CaCert,
        "--capath" => CaPath,
        "-o" | "--output" | "-w" | "--write-out" | "-c" | "--cookie-jar" => Ignored,
        _ => return None,
    })
}

fn boolean_flag(token: &str) -> Option<&'static str> {
    BOOLEAN_FLAGS.iter().find_map(|(short, long, name)| {
        let short_matches = short.map_or(false, |c| {
            let mut chars = token.chars();
            chars.next() == Some('-') && chars.next() == Some(c) && chars.next().is_none()
        });
        (short_matches || token == *long).then_some(*name)
    })
}

fn ssl_version_flag(token: &str) -> Option<&'static str> {
    SSL_VERSION_FLAGS
        .iter()
        .find(|(flag, _)| *flag == token)
        .map(|(_, version)| *version)
}

/// Expands a cluster of short boolean flags such as `-sSL`.
fn boolean_cluster(token: &str) -> Option<Vec<&'static str>> {
    let letters = token.strip_prefix('-')?;
    if letters.starts_with('-') || letters.chars().count() < 2 {
        return None;
    }

    letters
        .chars()
        .map(|c| {
            BOOLEAN_FLAGS
                .iter()
                .find(|(short, _, _)| *short == Some(c))
                .map(|(_, _, name)| *name)
        })
        .collect()
}

/// Splits `--long=value` and `-Xvalue` into flag and inline argument.
fn split_inline_value(token: &str) -> Option<(&str, &str)> {
    if token.starts_with("--") {
        return token.split_once('=');
    }

    let (idx, _) = token.char_indices().nth(2)?;
    Some((&token[..idx], &token[idx..]))
}

fn is_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Parses a cURL command string into a canonical request.
///
/// # Examples
///
/// ```
/// use curl_rest_assured::curl::parse_curl_command;
///
/// let request = parse_curl_command(r#"curl -H "X: 1" -H "X: 2" http://a/b"#).unwrap();
/// assert_eq!(request.headers.get("X"), Some("2"));
/// assert_eq!(request.endpoint, "/b");
/// ```
pub fn parse_curl_command(curl_str: &str) -> Result<CanonicalRequest, ParseError> {
    parse_with_options(curl_str, &ParseOptions::default())
}

/// Parses a cURL command string with explicit parser options.
pub fn parse_with_options(
    curl_str: &str,
    options: &ParseOptions,
) -> Result<CanonicalRequest, ParseError> {
    let trimmed = curl_str.trim();

    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let tokens = tokenize_with(trimmed, &options.tokenizer)?;
    let raw = interpret_tokens(&tokens, options);

    normalize(raw)
}

/// Maps tokens onto request fields. Never fails.
pub fn interpret_tokens(tokens: &[String], options: &ParseOptions) -> RawRequest {
    let mut raw = RawRequest::default();
    let mut i = 0;

    // Skip "curl" command itself
    if tokens
        .first()
        .map_or(false, |t| strip_quotes(t).eq_ignore_ascii_case("curl"))
    {
        i = 1;
    }

    while i < tokens.len() {
        let token = tokens[i].as_str();

        if !is_flag(token) {
            let value = strip_quotes(token);
            if value.starts_with("http") && raw.url.is_none() {
                raw.url = Some(value);
            } else {
                debug!("keeping stray argument '{}'", token);
                raw.raw_options.push(token.to_string());
            }
            i += 1;
            continue;
        }

        if let Some(flag) = value_flag(token) {
            if i + 1 < tokens.len() {
                i += 1;
                let value = strip_quotes(&tokens[i]);
                apply_value(&mut raw, flag, token, value, options);
            } else {
                warn!("flag {} is missing its argument, ignoring it", token);
            }
        } else if let Some(name) = boolean_flag(token) {
            raw.flags.insert(name.to_string(), true);
        } else if let Some(version) = ssl_version_flag(token) {
            raw.ssl_version = Some(version.to_string());
        } else if let Some((flag, name, value)) = split_inline_value(token)
            .and_then(|(name, value)| value_flag(name).map(|flag| (flag, name, value)))
        {
            apply_value(&mut raw, flag, name, strip_quotes(value), options);
        } else if let Some(names) = boolean_cluster(token) {
            for name in names {
                raw.flags.insert(name.to_string(), true);
            }
        } else {
            debug!("skipping unrecognized flag {}", token);
            raw.raw_options.push(token.to_string());
        }

        i += 1;
    }

    raw
}

fn apply_value(
    raw: &mut RawRequest,
    flag: ValueFlag,
    flag_token: &str,
    value: String,
    options: &ParseOptions,
) {
    match flag {
        ValueFlag::Request => match HttpMethod::from_str(&value) {
            Some(method) => raw.method = Some(method),
            None => warn!("unknown HTTP method '{}', keeping the default", value),
        },
        ValueFlag::Header => match value.split_once(':') {
            Some((name, header_value)) if !name.trim().is_empty() => {
                raw.headers
                    .insert_with(name.trim(), header_value.trim(), options.duplicate_headers);
            }
            _ => warn!("ignoring malformed header '{}'", value),
        },
        ValueFlag::Data => raw.body = Some(RequestBody::new(value)),
        ValueFlag::User => {
            let (username, password) = value.split_once(':').unwrap_or((value.as_str(), ""));
            raw.auth = Some(AuthConfig::basic(username, password));
        }
        ValueFlag::OAuth2Bearer => raw.auth = Some(AuthConfig::bearer(value)),
        ValueFlag::Form => {
            let (name, field_value) = value.split_once('=').unwrap_or((value.as_str(), ""));
            raw.form_data.insert(name.trim(), field_value);
        }
        ValueFlag::Cookie => {
            if value.contains('=') {
                for pair in value.split(';') {
                    if let Some((name, cookie_value)) = pair.split_once('=') {
                        raw.cookies.insert(name.trim(), cookie_value.trim());
                    }
                }
            } else {
                // A cookie file, nothing to put on the request
                raw.raw_options.push(flag_token.to_string());
                raw.raw_options.push(value);
            }
        }
        ValueFlag::UserAgent => raw.user_agent = Some(value),
        ValueFlag::Referer => raw.referer = Some(value),
        ValueFlag::Proxy => raw.proxy = Some(value),
        ValueFlag::Url => {
            if raw.url.is_none() {
                raw.url = Some(value);
            } else {
                raw.raw_options.push(flag_token.to_string());
                raw.raw_options.push(value);
            }
        }
        ValueFlag::MaxTime => raw.max_time = parse_number(flag_token, &value),
        ValueFlag::ConnectTimeout => raw.connect_timeout = parse_number(flag_token, &value),
        ValueFlag::Retry => raw.retry = parse_number(flag_token, &value),
        ValueFlag::RetryDelay => raw.retry_delay = parse_number(flag_token, &value),
        ValueFlag::RetryMaxTime => raw.retry_max_time = parse_number(flag_token, &value),
        ValueFlag::MaxRedirs => raw.max_redirects = parse_number(flag_token, &value),
        ValueFlag::Cert => raw.cert = Some(value),
        ValueFlag::Key => raw.key = Some(value),
        ValueFlag::CaCert => raw.ca_cert = Some(value),
        ValueFlag::CaPath => raw.ca_path = Some(value),
        ValueFlag::Ignored => {
            raw.raw_options.push(flag_token.to_string());
            raw.raw_options.push(value);
        }
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!("ignoring non-numeric value '{}' for {}", value, flag);
            None
        }
    }
}
