//! Field projection over requests.
//!
//! A projection map names fields by dotted path (`headers.0.value`,
//! `networkConfig.timeout`) and maps each to a boolean. Paths mapped to
//! `false` are dropped; everything else is kept.

use crate::models::CanonicalRequest;
use crate::normalize::prune_or_empty;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The projected tree no longer reads back as a request.
    #[error("Projection produced an invalid request: {0}")]
    InvalidShape(String),
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::InvalidShape(err.to_string())
    }
}

/// Projects a request, then prunes whatever the projection left empty.
///
/// # Examples
///
/// ```
/// use curl_rest_assured::curl::parse_curl_command;
/// use curl_rest_assured::filter::project;
/// use std::collections::HashMap;
///
/// let request = parse_curl_command(r#"curl -H "A: 1" -A agent https://api.example.com"#).unwrap();
/// let inclusion = HashMap::from([("userAgent".to_string(), false)]);
///
/// let projected = project(&request, &inclusion).unwrap();
/// assert_eq!(projected.user_agent, None);
/// assert_eq!(projected.headers, request.headers);
/// ```
pub fn project(
    request: &CanonicalRequest,
    inclusion: &HashMap<String, bool>,
) -> Result<CanonicalRequest, FilterError> {
    let value = serde_json::to_value(request)?;
    let projected = prune_or_empty(project_value(&value, inclusion));
    Ok(serde_json::from_value(projected)?)
}

/// Deep-copies `value`, leaving out every path mapped to `false`.
pub fn project_value(value: &Value, inclusion: &HashMap<String, bool>) -> Value {
    walk(value, "", inclusion)
}

fn child_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

fn excluded(path: &str, inclusion: &HashMap<String, bool>) -> bool {
    inclusion.get(path) == Some(&false)
}

fn walk(value: &Value, prefix: &str, inclusion: &HashMap<String, bool>) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, child) in map {
                let path = child_path(prefix, key);
                if !excluded(&path, inclusion) {
                    out.insert(key.clone(), walk(child, &path, inclusion));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .filter_map(|(i, child)| {
                    let path = child_path(prefix, &i.to_string());
                    (!excluded(&path, inclusion)).then(|| walk(child, &path, inclusion))
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
