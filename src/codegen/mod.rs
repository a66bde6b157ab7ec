//! Code generation for REST-assured tests.
//!
//! Turns a [`CanonicalRequest`] into Java test source, and optionally into
//! POJO classes for its JSON body and a Maven POM for the test project.
//! Every check runs before any rendering, so a failed call never produces
//! partial output.

pub mod java;
pub mod pojo;
pub mod pom;

use crate::config::{ConfigError, GenerationConfig, PomType};
use crate::models::CanonicalRequest;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").expect("word regex is valid"));

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null", "var", "record",
];

/// Output of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCode {
    pub test_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pojo_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pom_xml: Option<String>,
}

/// Errors that can occur during code generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeGenError {
    #[error("Service name is required to generate a test class")]
    MissingServiceName,

    #[error("Method name is required to generate a test class")]
    MissingMethodName,

    /// A full POM was requested without complete project coordinates.
    #[error("Project info is incomplete, missing: {}", .missing.join(", "))]
    IncompleteProjectInfo { missing: Vec<String> },

    /// The request is invalid or missing required fields
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid generation config: {0}")]
    InvalidConfig(String),
}

impl From<ConfigError> for CodeGenError {
    fn from(err: ConfigError) -> Self {
        CodeGenError::InvalidConfig(err.to_string())
    }
}

/// Generates REST-assured test code for a request.
///
/// # Examples
///
/// ```
/// use curl_rest_assured::codegen::generate;
/// use curl_rest_assured::config::GenerationConfig;
/// use curl_rest_assured::curl::parse_curl_command;
///
/// let request = parse_curl_command("curl https://api.example.com/users/{id}").unwrap();
/// let config = GenerationConfig::full("user service", "get user");
///
/// let code = generate(&request, &config).unwrap();
/// assert!(code.test_code.contains("public class UserService"));
/// assert!(code.test_code.contains("public void getUser()"));
/// assert!(code.test_code.contains(r#".get("/users/{id}")"#));
/// assert!(code.pojo_code.is_none());
/// ```
pub fn generate(
    request: &CanonicalRequest,
    config: &GenerationConfig,
) -> Result<GeneratedCode, CodeGenError> {
    if let Err(e) = validate(request, config) {
        warn!("code generation rejected: {}", e);
        return Err(e);
    }

    let test_code = java::render_test(request, config)?;

    let pojo_code = if config.need_pojo {
        let code = request
            .non_blank_body()
            .and_then(|body| body.json())
            .and_then(|json| {
                pojo::generate_pojos(json, &pojo::root_class_name(config), &config.pojo_annotations)
            });
        if code.is_none() {
            debug!("request body is not a JSON object, skipping POJO generation");
        }
        code
    } else {
        None
    };

    let pom_xml = if config.generate_pom {
        Some(pom::generate_pom(&config.pom_config)?)
    } else {
        None
    };

    Ok(GeneratedCode {
        test_code,
        pojo_code,
        pom_xml,
    })
}

/// Runs every generation check without rendering anything.
pub fn validate(request: &CanonicalRequest, config: &GenerationConfig) -> Result<(), CodeGenError> {
    config.validate()?;

    if config.is_full() {
        // A name without a single letter or digit cannot become an identifier
        if pascal_case(&config.service_name).is_empty() {
            return Err(CodeGenError::MissingServiceName);
        }
        if camel_case(&config.method_name).is_empty() {
            return Err(CodeGenError::MissingMethodName);
        }
    }

    if config.generate_pom && config.pom_config.pom_type == PomType::Full {
        pom::validate(&config.pom_config)?;
    }

    java::resolve_target(request)?;

    Ok(())
}

/// Splits text into alphanumeric words, also breaking camelCase humps.
fn words(s: &str) -> Vec<String> {
    let mut words = Vec::new();

    for word in WORD_REGEX.find_iter(s) {
        let mut current = String::new();
        let mut prev_lower = false;
        for ch in word.as_str().chars() {
            if ch.is_ascii_uppercase() && prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
            current.push(ch);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }

    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `user service` -> `UserService`. Empty when `s` has no letters or digits.
pub fn pascal_case(s: &str) -> String {
    let joined: String = words(s).iter().map(|w| capitalize(w)).collect();
    if joined.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", joined)
    } else {
        joined
    }
}

/// `get user by id` -> `getUserById`.
pub fn camel_case(s: &str) -> String {
    let words = words(s);
    let mut out = String::new();

    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_ascii_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", out)
    } else {
        out
    }
}

pub fn is_java_keyword(s: &str) -> bool {
    JAVA_KEYWORDS.contains(&s)
}

/// A camelCase identifier that is safe to declare in Java.
pub fn java_identifier(s: &str) -> String {
    let ident = camel_case(s);
    if ident.is_empty() {
        "value".to_string()
    } else if is_java_keyword(&ident) {
        format!("{}_", ident)
    } else {
        ident
    }
}

/// Escapes text for a Java string literal.
pub fn escape_java_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationOption, PomConfig, ProjectInfo};
    use crate::curl::parse_curl_command;

    fn request() -> CanonicalRequest {
        parse_curl_command(r#"curl -X POST https://api.example.com/users -d "{\"name\":\"John\"}""#)
            .unwrap()
    }

    #[test]
    fn test_pascal_and_camel_case() {
        assert_eq!(pascal_case("user service"), "UserService");
        assert_eq!(pascal_case("user-service_api"), "UserServiceApi");
        assert_eq!(pascal_case("userService"), "UserService");
        assert_eq!(pascal_case("2fa check"), "_2faCheck");
        assert_eq!(camel_case("Get User By Id"), "getUserById");
        assert_eq!(camel_case("createUser"), "createUser");
        assert_eq!(camel_case("first_name"), "firstName");
        assert_eq!(camel_case("!!"), "");
    }

    #[test]
    fn test_java_identifier() {
        assert_eq!(java_identifier("class"), "class_");
        assert_eq!(java_identifier("user-id"), "userId");
        assert_eq!(java_identifier("$$"), "value");
    }

    #[test]
    fn test_escape_java_string() {
        assert_eq!(escape_java_string(r#"{"a":"b\c"}"#), r#"{\"a\":\"b\\c\"}"#);
        assert_eq!(escape_java_string("line1\nline2\t"), "line1\\nline2\\t");
        assert_eq!(escape_java_string("\u{1}"), "\\u0001");
    }

    #[test]
    fn test_missing_service_name() {
        let config = GenerationConfig::full("  ", "create user");
        assert_eq!(generate(&request(), &config), Err(CodeGenError::MissingServiceName));
    }

    #[test]
    fn test_missing_method_name() {
        let config = GenerationConfig::full("users", "");
        assert_eq!(generate(&request(), &config), Err(CodeGenError::MissingMethodName));
    }

    #[test]
    fn test_method_mode_needs_no_names() {
        let config = GenerationConfig {
            option: GenerationOption::Method,
            ..GenerationConfig::default()
        };
        let code = generate(&request(), &config).unwrap();
        assert!(code.test_code.contains("public void postUsers()"));
    }

    #[test]
    fn test_incomplete_project_info() {
        let config = GenerationConfig {
            generate_pom: true,
            pom_config: PomConfig {
                project_info: ProjectInfo {
                    group_id: "com.example".to_string(),
                    version: "1.0.0".to_string(),
                    ..ProjectInfo::default()
                },
                ..PomConfig::default()
            },
            ..GenerationConfig::full("users", "create")
        };

        assert_eq!(
            generate(&request(), &config),
            Err(CodeGenError::IncompleteProjectInfo {
                missing: vec!["artifactId".to_string()]
            })
        );
    }

    #[test]
    fn test_invalid_config() {
        let config = GenerationConfig {
            status_code: "abc".to_string(),
            ..GenerationConfig::full("users", "create")
        };
        assert!(matches!(
            generate(&request(), &config),
            Err(CodeGenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_request() {
        let config = GenerationConfig::full("users", "create");
        assert!(matches!(
            generate(&CanonicalRequest::default(), &config),
            Err(CodeGenError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_pojo_only_for_json_object_bodies() {
        let config = GenerationConfig {
            need_pojo: true,
            ..GenerationConfig::full("users", "create")
        };

        let code = generate(&request(), &config).unwrap();
        assert!(code.pojo_code.unwrap().contains("public class UsersRequest"));

        let text = parse_curl_command("curl -d a=1 https://api.example.com/form").unwrap();
        assert!(generate(&text, &config).unwrap().pojo_code.is_none());
    }

    #[test]
    fn test_error_display() {
        let err = CodeGenError::IncompleteProjectInfo {
            missing: vec!["groupId".to_string(), "version".to_string()],
        };
        assert_eq!(err.to_string(), "Project info is incomplete, missing: groupId, version");
    }
}
