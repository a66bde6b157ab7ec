//! Generation configuration schema.
//!
//! Defines the options that steer code generation and their validation.
//! Every field has a default, so a partial JSON object is a valid
//! configuration.

use super::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

static PACKAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][\w$]*(\.[A-Za-z_$][\w$]*)*$").expect("package regex is valid")
});

/// Which shape of test code to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationOption {
    /// A complete test class with imports and setup.
    #[default]
    Full,
    /// Only the annotated test method, for pasting into an existing class.
    Method,
}

/// Options for one code generation run.
///
/// Built fresh for every call to [`crate::codegen::generate`] and never
/// mutated by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default)]
    pub option: GenerationOption,

    /// Test class name source. Required for [`GenerationOption::Full`].
    #[serde(default)]
    pub service_name: String,

    /// Test method name source. Required for [`GenerationOption::Full`];
    /// derived from the request when blank in method mode.
    #[serde(default)]
    pub method_name: String,

    /// Whether to assert the response status code. Defaults to true.
    #[serde(default = "default_true")]
    pub assertion_required: bool,

    /// Expected status code. Accepts a string or a number; defaults to "200".
    #[serde(default = "default_status_code", deserialize_with = "string_or_number")]
    pub status_code: String,

    /// Whether to log the full response.
    #[serde(default)]
    pub logging_required: bool,

    /// Whether to generate POJO classes for a JSON body.
    #[serde(default)]
    pub need_pojo: bool,

    /// Chain the request as `given()...then()` rather than as statements on a
    /// `RequestSpecification`. Defaults to true.
    #[serde(default = "default_true")]
    pub use_fluent_api: bool,

    /// Attach a retry analyzer to the test.
    #[serde(default)]
    pub include_retry: bool,

    /// TestNG groups. Accepts an array or a comma-separated string.
    #[serde(default, deserialize_with = "string_list")]
    pub test_groups: Vec<String>,

    #[serde(default)]
    pub test_priority: Option<i32>,

    #[serde(default)]
    pub test_description: Option<String>,

    /// Whether to assert an upper bound on the response time.
    #[serde(default)]
    pub assert_response_time: bool,

    /// Upper bound for the response time assertion, in milliseconds.
    #[serde(default = "default_max_response_time_ms")]
    pub max_response_time_ms: u64,

    /// Whether to generate a Maven POM alongside the test.
    #[serde(default)]
    pub generate_pom: bool,

    #[serde(default)]
    pub pom_config: PomConfig,

    /// Java package of the generated class. Full mode only.
    #[serde(default)]
    pub package_name: Option<String>,

    /// Annotation lines placed on every generated POJO class, such as
    /// `@Data` or `@Builder`. When present they replace generated accessors.
    #[serde(default)]
    pub pojo_annotations: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            option: GenerationOption::default(),
            service_name: String::new(),
            method_name: String::new(),
            assertion_required: default_true(),
            status_code: default_status_code(),
            logging_required: false,
            need_pojo: false,
            use_fluent_api: default_true(),
            include_retry: false,
            test_groups: Vec::new(),
            test_priority: None,
            test_description: None,
            assert_response_time: false,
            max_response_time_ms: default_max_response_time_ms(),
            generate_pom: false,
            pom_config: PomConfig::default(),
            package_name: None,
            pojo_annotations: Vec::new(),
        }
    }
}

impl GenerationConfig {
    /// A full-class configuration with the given names and defaults otherwise.
    pub fn full(service_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            method_name: method_name.into(),
            ..Self::default()
        }
    }

    /// A method-only configuration.
    pub fn method(method_name: impl Into<String>) -> Self {
        Self {
            option: GenerationOption::Method,
            method_name: method_name.into(),
            ..Self::default()
        }
    }

    /// Validates the option values themselves.
    ///
    /// Required names and POM coordinates depend on the request being
    /// generated and are checked by the generator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.status_code_number()?;

        if self.assert_response_time && self.max_response_time_ms == 0 {
            return Err(ConfigError::Invalid(
                "maxResponseTimeMs must be greater than 0".to_string(),
            ));
        }

        if let Some(package) = self.package_name.as_deref().map(str::trim) {
            if !package.is_empty() && !PACKAGE_REGEX.is_match(package) {
                return Err(ConfigError::Invalid(format!(
                    "packageName '{}' is not a valid Java package",
                    package
                )));
            }
        }

        Ok(())
    }

    /// The expected status code as a number in `100..=599`.
    pub fn status_code_number(&self) -> Result<u16, ConfigError> {
        let code = self.status_code.trim();
        match code.parse::<u16>() {
            Ok(n) if code.len() == 3 && (100..=599).contains(&n) => Ok(n),
            _ => Err(ConfigError::Invalid(format!(
                "statusCode '{}' is not an HTTP status code",
                self.status_code
            ))),
        }
    }

    pub fn is_full(&self) -> bool {
        self.option == GenerationOption::Full
    }
}

/// Whether the POM is a whole project or only a dependency block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomType {
    #[default]
    Full,
    DependenciesOnly,
}

/// Maven coordinates and descriptive fields of the generated project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInfo {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ProjectInfo {
    /// Names of the required coordinates that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("groupId", &self.group_id),
            ("artifactId", &self.artifact_id),
            ("version", &self.version),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Optional dependencies appended to the base set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencySwitches {
    pub junit: bool,
    pub allure: bool,
    pub extent: bool,
    pub excel: bool,
    pub faker: bool,
    pub logging: bool,
    pub commons_io: bool,
}

/// Java language level of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "u8")]
pub enum JavaVersion {
    V8,
    V11,
    #[default]
    V17,
    V21,
}

impl JavaVersion {
    /// Value for `maven.compiler.source`/`target`.
    pub fn release(&self) -> &'static str {
        match self {
            JavaVersion::V8 => "1.8",
            JavaVersion::V11 => "11",
            JavaVersion::V17 => "17",
            JavaVersion::V21 => "21",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "8" | "1.8" => Some(JavaVersion::V8),
            "11" => Some(JavaVersion::V11),
            "17" => Some(JavaVersion::V17),
            "21" => Some(JavaVersion::V21),
            _ => None,
        }
    }
}

impl From<JavaVersion> for u8 {
    fn from(version: JavaVersion) -> Self {
        match version {
            JavaVersion::V8 => 8,
            JavaVersion::V11 => 11,
            JavaVersion::V17 => 17,
            JavaVersion::V21 => 21,
        }
    }
}

/// POM generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PomConfig {
    pub pom_type: PomType,
    pub project_info: ProjectInfo,
    pub dependencies: DependencySwitches,
    #[serde(deserialize_with = "java_version")]
    pub java_version: JavaVersion,
}

// Default value functions for serde

fn default_true() -> bool {
    true
}

fn default_status_code() -> String {
    "200".to_string()
}

fn default_max_response_time_ms() -> u64 {
    2000
}

// Lenient field shapes

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(Number),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
}

fn java_version<'de, D>(deserializer: D) -> Result<JavaVersion, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = string_or_number(deserializer)?;
    JavaVersion::from_str(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "unsupported javaVersion '{}', expected 8, 11, 17 or 21",
            raw
        ))
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringList {
    List(Vec<String>),
    Joined(String),
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match StringList::deserialize(deserializer)? {
        StringList::List(items) => items,
        StringList::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };

    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
