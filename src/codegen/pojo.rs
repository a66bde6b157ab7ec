//! POJO generation for JSON request bodies.
//!
//! The body becomes one outer class; every distinct nested object shape
//! becomes a `public static class` inside it. Two keys holding objects of the
//! same shape share a class.

use super::{escape_java_string, java_identifier, pascal_case};
use crate::config::GenerationConfig;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Types the generated fields refer to unqualified.
const RESERVED_CLASS_NAMES: &[&str] =
    &["String", "Integer", "Long", "Double", "Boolean", "Object", "List"];

/// Name of the outer POJO class for a configuration.
pub fn root_class_name(config: &GenerationConfig) -> String {
    match pascal_case(&config.service_name) {
        name if name.is_empty() => "RequestPayload".to_string(),
        name => format!("{}Request", name),
    }
}

#[derive(Debug, Clone)]
struct Field {
    key: String,
    ident: String,
    java_type: String,
}

#[derive(Debug, Clone)]
struct PojoClass {
    name: String,
    fields: Vec<Field>,
}

impl PojoClass {
    /// Identifies a shape by its keys and field types.
    fn signature(fields: &[Field]) -> String {
        fields
            .iter()
            .map(|f| format!("{}:{};", f.key, f.java_type))
            .collect()
    }
}

/// Collects nested classes while the body is walked.
struct PojoBuilder {
    root_name: String,
    nested: Vec<PojoClass>,
    by_signature: HashMap<String, String>,
}

impl PojoBuilder {
    fn new(root_name: &str) -> Self {
        Self {
            root_name: root_name.to_string(),
            nested: Vec::new(),
            by_signature: HashMap::new(),
        }
    }

    fn fields(&mut self, entries: &[(String, Value)]) -> Vec<Field> {
        let mut fields: Vec<Field> = Vec::new();

        for (key, value) in entries {
            let base = java_identifier(key);
            let mut ident = base.clone();
            let mut n = 2;
            while fields.iter().any(|f| f.ident == ident) {
                ident = format!("{}{}", base, n);
                n += 1;
            }

            let java_type = self.java_type(key, value);
            fields.push(Field {
                key: key.clone(),
                ident,
                java_type,
            });
        }

        fields
    }

    fn java_type(&mut self, key: &str, value: &Value) -> String {
        match value {
            Value::Null => "Object".to_string(),
            Value::Bool(_) => "Boolean".to_string(),
            Value::Number(n) => match n.as_i64() {
                Some(i) if i32::try_from(i).is_ok() => "Integer".to_string(),
                Some(_) => "Long".to_string(),
                None if n.is_u64() => "Long".to_string(),
                None => "Double".to_string(),
            },
            Value::String(_) => "String".to_string(),
            Value::Object(map) => {
                let entries: Vec<(String, Value)> =
                    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                self.nested_class(&pascal_case(key), &entries)
            }
            Value::Array(items) => format!("List<{}>", self.element_type(key, items)),
        }
    }

    fn element_type(&mut self, key: &str, items: &[Value]) -> String {
        let objects: Vec<&Map<String, Value>> =
            items.iter().filter_map(Value::as_object).collect();

        if !objects.is_empty() {
            let entries = merge_objects(&objects);
            return self.nested_class(&format!("{}Item", pascal_case(key)), &entries);
        }

        match items.iter().find(|v| !v.is_null()) {
            Some(first) => self.java_type(key, first),
            None => "Object".to_string(),
        }
    }

    /// Registers a nested class for `entries`, reusing an existing class of
    /// the same shape. Returns the class name.
    fn nested_class(&mut self, suggested: &str, entries: &[(String, Value)]) -> String {
        let fields = self.fields(entries);
        let signature = PojoClass::signature(&fields);

        if let Some(existing) = self.by_signature.get(&signature) {
            return existing.clone();
        }

        let base = if suggested.is_empty() {
            "Nested".to_string()
        } else {
            suggested.to_string()
        };
        let mut name = base.clone();
        let mut n = 2;
        while name == self.root_name
            || RESERVED_CLASS_NAMES.contains(&name.as_str())
            || self.nested.iter().any(|c| c.name == name)
        {
            name = format!("{}{}", base, n);
            n += 1;
        }

        self.by_signature.insert(signature, name.clone());
        self.nested.push(PojoClass {
            name: name.clone(),
            fields,
        });
        name
    }
}

/// Union of the keys of several objects, in first-seen order. The first
/// non-null value seen for a key decides its type.
fn merge_objects(objects: &[&Map<String, Value>]) -> Vec<(String, Value)> {
    let mut merged: Vec<(String, Value)> = Vec::new();

    for object in objects {
        for (key, value) in object.iter() {
            match merged.iter_mut().find(|(k, _)| k == key) {
                Some((_, existing)) if existing.is_null() => *existing = value.clone(),
                Some(_) => {}
                None => merged.push((key.clone(), value.clone())),
            }
        }
    }

    merged
}

/// Generates POJO source for a JSON body.
///
/// Returns `None` unless the body is an object or an array holding objects.
/// With `annotations` (for example `@Data`) the classes carry those lines
/// instead of generated getters and setters.
///
/// # Examples
///
/// ```
/// use curl_rest_assured::codegen::pojo::generate_pojos;
/// use serde_json::json;
///
/// let code = generate_pojos(
///     &json!({"name": "John", "address": {"city": "Paris"}}),
///     "UserRequest",
///     &[],
/// )
/// .unwrap();
///
/// assert!(code.contains("public class UserRequest {"));
/// assert!(code.contains("private Address address;"));
/// assert!(code.contains("public static class Address {"));
/// ```
pub fn generate_pojos(body: &Value, root_name: &str, annotations: &[String]) -> Option<String> {
    let entries: Vec<(String, Value)> = match body {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Value::Array(items) => {
            let objects: Vec<&Map<String, Value>> =
                items.iter().filter_map(Value::as_object).collect();
            if objects.is_empty() {
                return None;
            }
            merge_objects(&objects)
        }
        _ => return None,
    };

    let mut builder = PojoBuilder::new(root_name);
    let root = PojoClass {
        name: root_name.to_string(),
        fields: builder.fields(&entries),
    };
    let classes: Vec<&PojoClass> = std::iter::once(&root).chain(&builder.nested).collect();

    let annotations: Vec<&str> = annotations
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();

    let mut out = String::new();

    let needs_json_property = classes
        .iter()
        .flat_map(|c| c.fields.iter())
        .any(|f| f.ident != f.key);
    let needs_list = classes
        .iter()
        .flat_map(|c| c.fields.iter())
        .any(|f| f.java_type.contains("List<"));

    if needs_json_property {
        out.push_str("import com.fasterxml.jackson.annotation.JsonProperty;\n");
    }
    if needs_list {
        out.push_str("import java.util.List;\n");
    }
    if needs_json_property || needs_list {
        out.push('\n');
    }

    write_class(&mut out, &root, &annotations, 0, &builder.nested);

    Some(out)
}

fn write_class(
    out: &mut String,
    class: &PojoClass,
    annotations: &[&str],
    depth: usize,
    nested: &[PojoClass],
) {
    let header = if depth == 0 {
        "public class"
    } else {
        "public static class"
    };
    let pad = "    ".repeat(depth);
    let inner = "    ".repeat(depth + 1);

    for annotation in annotations {
        out.push_str(&format!("{}{}\n", pad, annotation));
    }
    out.push_str(&format!("{}{} {} {{\n", pad, header, class.name));

    for field in &class.fields {
        if field.ident != field.key {
            out.push_str(&format!(
                "{}@JsonProperty(\"{}\")\n",
                inner,
                escape_java_string(&field.key)
            ));
        }
        out.push_str(&format!("{}private {} {};\n", inner, field.java_type, field.ident));
    }

    if annotations.is_empty() {
        for field in &class.fields {
            write_accessors(out, field, &inner);
        }
    }

    for child in nested {
        out.push('\n');
        write_class(out, child, annotations, depth + 1, &[]);
    }

    out.push_str(&format!("{}}}\n", pad));
}

fn write_accessors(out: &mut String, field: &Field, indent: &str) {
    let suffix = capitalize_ident(&field.ident);
    let body = format!("{}    ", indent);

    out.push('\n');
    out.push_str(&format!(
        "{}public {} get{}() {{\n{}return {};\n{}}}\n",
        indent, field.java_type, suffix, body, field.ident, indent
    ));
    out.push('\n');
    out.push_str(&format!(
        "{}public void set{}({} {}) {{\n{}this.{} = {};\n{}}}\n",
        indent, suffix, field.java_type, field.ident, body, field.ident, field.ident, indent
    ));
}

fn capitalize_ident(ident: &str) -> String {
    let mut chars = ident.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
