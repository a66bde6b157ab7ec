//! REST-assured test rendering.
//!
//! The request specification is rendered in a fixed order so that output is
//! stable across runs:
//!
//! 1. builder start, TLS relaxation and proxy
//! 2. headers, cookies, user agent and referer
//! 3. authentication
//! 4. path and query parameters
//! 5. body or multipart form fields
//! 6. the HTTP verb
//! 7. status code assertion
//! 8. response time assertion
//! 9. response logging
//!
//! Path parameter locals are declared before step 1. Disabled entries are
//! never rendered.

use super::{camel_case, escape_java_string, java_identifier, pascal_case, CodeGenError};
use crate::config::GenerationConfig;
use crate::curl::url::{decompose_url, extract_path_template, join_url};
use crate::models::{Auth, CanonicalRequest, HttpMethod};
use std::collections::BTreeSet;

const RETRY_ANALYZER: &str = "RetryAnalyzer";
const MAX_RETRIES: u32 = 2;

/// Where a request goes, as the generated test addresses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub base_url: String,
    /// Path template with `{name}` placeholders.
    pub path: String,
    pub path_parameters: Vec<String>,
}

impl Target {
    /// Base URL and path joined, as used in method mode.
    pub fn absolute(&self) -> String {
        join_url(&self.base_url, &self.path)
    }
}

/// Works out base URL and path for a request, deriving whatever the model
/// leaves blank from its URL.
pub fn resolve_target(request: &CanonicalRequest) -> Result<Target, CodeGenError> {
    let (base_url, endpoint) = if !request.base_url.trim().is_empty() {
        (request.base_url.trim().to_string(), request.endpoint.clone())
    } else if !request.url.trim().is_empty() {
        let parts = decompose_url(&request.url);
        (parts.base_url, parts.endpoint)
    } else {
        return Err(CodeGenError::InvalidRequest(
            "request has neither a URL nor a base URL".to_string(),
        ));
    };

    let endpoint = if endpoint.trim().is_empty() {
        "/".to_string()
    } else {
        endpoint
    };

    let (derived_path, derived_parameters) = extract_path_template(&endpoint);
    let path = if request.path_template.trim().is_empty() {
        derived_path
    } else {
        request.path_template.clone()
    };
    let path_parameters = if request.path_parameters.is_empty() {
        derived_parameters
    } else {
        request.path_parameters.clone()
    };

    Ok(Target {
        base_url,
        path,
        path_parameters,
    })
}

/// Derives a method name from the verb and path: `GET /users/{id}` becomes
/// `getUsersById`.
pub fn derive_method_name(method: HttpMethod, path: &str) -> String {
    let mut name = method.as_str().to_ascii_lowercase();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(param) => {
                name.push_str("By");
                name.push_str(&pascal_case(param));
            }
            None => name.push_str(&pascal_case(segment)),
        }
    }

    if name.len() == method.as_str().len() {
        name.push_str("Root");
    }
    name
}

/// Indentation-aware line buffer.
struct JavaWriter {
    out: String,
    indent: usize,
}

impl JavaWriter {
    fn new(indent: usize) -> Self {
        Self {
            out: String::new(),
            indent,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.indent += 1;
    }

    fn close(&mut self, text: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }
}

/// Renders the test source for `request`.
///
/// Callers are expected to have run [`super::validate`] first.
pub fn render_test(
    request: &CanonicalRequest,
    config: &GenerationConfig,
) -> Result<String, CodeGenError> {
    let target = resolve_target(request)?;
    let status_code = config.status_code_number()?;

    let method_name = match camel_case(&config.method_name) {
        name if name.is_empty() => derive_method_name(request.method, &target.path),
        name => java_identifier(&name),
    };

    let mut w = JavaWriter::new(0);

    if config.is_full() {
        render_preamble(&mut w, &target, config);
        render_method(&mut w, request, config, &target, &method_name, status_code);
        if config.include_retry {
            w.blank();
            render_retry_analyzer(&mut w);
        }
        w.close("}");
    } else {
        render_method(&mut w, request, config, &target, &method_name, status_code);
    }

    Ok(w.out)
}

/// Package, imports, class header and setup. Leaves the writer inside the class.
fn render_preamble(w: &mut JavaWriter, target: &Target, config: &GenerationConfig) {
    if let Some(package) = config.package_name.as_deref().map(str::trim) {
        if !package.is_empty() {
            w.line(format!("package {};", package));
            w.blank();
        }
    }

    let mut imports = BTreeSet::from([
        "io.restassured.RestAssured",
        "org.testng.annotations.BeforeClass",
        "org.testng.annotations.Test",
    ]);
    if !config.use_fluent_api {
        imports.insert("io.restassured.response.Response");
        imports.insert("io.restassured.specification.RequestSpecification");
        if config.assertion_required || config.assert_response_time {
            imports.insert("org.testng.Assert");
        }
    }
    if config.include_retry {
        imports.insert("org.testng.IRetryAnalyzer");
        imports.insert("org.testng.ITestResult");
    }
    for import in &imports {
        w.line(format!("import {};", import));
    }

    if config.use_fluent_api {
        w.blank();
        w.line("import static io.restassured.RestAssured.given;");
        if config.assert_response_time {
            w.line("import static org.hamcrest.Matchers.lessThan;");
        }
    }

    w.blank();
    w.open(format!("public class {} {{", pascal_case(&config.service_name)));
    w.blank();
    w.line("@BeforeClass");
    w.open("public void setup() {");
    w.line(format!(
        "RestAssured.baseURI = \"{}\";",
        escape_java_string(&target.base_url)
    ));
    w.close("}");
    w.blank();
}

fn test_annotation(config: &GenerationConfig) -> String {
    let mut attributes = Vec::new();

    if !config.test_groups.is_empty() {
        let groups: Vec<String> = config
            .test_groups
            .iter()
            .map(|g| format!("\"{}\"", escape_java_string(g)))
            .collect();
        attributes.push(format!("groups = {{{}}}", groups.join(", ")));
    }
    if let Some(priority) = config.test_priority {
        attributes.push(format!("priority = {}", priority));
    }
    if let Some(description) = config
        .test_description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
    {
        attributes.push(format!("description = \"{}\"", escape_java_string(description)));
    }
    if config.include_retry {
        attributes.push(format!("retryAnalyzer = {}.class", RETRY_ANALYZER));
    }

    if attributes.is_empty() {
        "@Test".to_string()
    } else {
        format!("@Test({})", attributes.join(", "))
    }
}

fn render_method(
    w: &mut JavaWriter,
    request: &CanonicalRequest,
    config: &GenerationConfig,
    target: &Target,
    method_name: &str,
    status_code: u16,
) {
    w.line(test_annotation(config));
    w.open(format!("public void {}() {{", method_name));

    let locals = path_locals(&target.path_parameters);
    for (_, local) in &locals {
        w.line(format!("String {} = \"\";", local));
    }
    if !locals.is_empty() {
        w.blank();
    }

    let spec = spec_calls(request, &locals);
    let path = if config.is_full() {
        target.path.clone()
    } else {
        target.absolute()
    };
    let verb = verb_call(request.method, &path);

    if config.use_fluent_api {
        render_fluent(w, config, &spec, &verb, status_code);
    } else {
        render_statements(w, config, &spec, &verb, status_code);
    }

    w.close("}");
}

fn render_fluent(
    w: &mut JavaWriter,
    config: &GenerationConfig,
    spec: &[String],
    verb: &str,
    status_code: u16,
) {
    let mut chain: Vec<(usize, String)> = vec![(0, "given()".to_string())];
    chain.extend(spec.iter().map(|call| (1, format!(".{}", call))));
    chain.push((0, ".when()".to_string()));
    chain.push((1, format!(".{}", verb)));

    let checks = response_checks(config, status_code);
    if !checks.is_empty() {
        chain.push((0, ".then()".to_string()));
        chain.extend(checks.into_iter().map(|check| (1, format!(".{}", check))));
    }

    let last = chain.len() - 1;
    for (i, (depth, text)) in chain.into_iter().enumerate() {
        w.indent += depth;
        if i == last {
            w.line(format!("{};", text));
        } else {
            w.line(text);
        }
        w.indent -= depth;
    }
}

fn render_statements(
    w: &mut JavaWriter,
    config: &GenerationConfig,
    spec: &[String],
    verb: &str,
    status_code: u16,
) {
    w.line("RequestSpecification request = RestAssured.given();");
    for call in spec {
        w.line(format!("request.{};", call));
    }
    w.blank();
    w.line(format!("Response response = request.{};", verb));

    let mut tail = Vec::new();
    if config.assertion_required {
        tail.push(format!(
            "Assert.assertEquals(response.getStatusCode(), {});",
            status_code
        ));
    }
    if config.assert_response_time {
        tail.push(format!(
            "Assert.assertTrue(response.getTime() < {ms}L, \"Response time exceeded {ms} ms\");",
            ms = config.max_response_time_ms
        ));
    }
    if config.logging_required {
        tail.push("response.then().log().all();".to_string());
    }

    if !tail.is_empty() {
        w.blank();
        for line in tail {
            w.line(line);
        }
    }
}

/// Steps 7 to 9 as `ValidatableResponse` calls.
fn response_checks(config: &GenerationConfig, status_code: u16) -> Vec<String> {
    let mut checks = Vec::new();
    if config.assertion_required {
        checks.push(format!("statusCode({})", status_code));
    }
    if config.assert_response_time {
        checks.push(format!("time(lessThan({}L))", config.max_response_time_ms));
    }
    if config.logging_required {
        checks.push("log().all()".to_string());
    }
    checks
}

/// Locals the statement style declares itself.
const RESERVED_LOCALS: &[&str] = &["request", "response"];

/// Pairs each path parameter with a unique local variable name.
fn path_locals(parameters: &[String]) -> Vec<(String, String)> {
    let mut locals: Vec<(String, String)> = Vec::new();

    for param in parameters {
        let base = java_identifier(param);
        let mut local = base.clone();
        let mut n = 2;
        while RESERVED_LOCALS.contains(&local.as_str())
            || locals.iter().any(|(_, l)| *l == local)
        {
            local = format!("{}{}", base, n);
            n += 1;
        }
        locals.push((param.clone(), local));
    }

    locals
}

fn literal(s: &str) -> String {
    format!("\"{}\"", escape_java_string(s))
}

/// Steps 1 to 5 as `RequestSpecification` calls, without the leading dot.
fn spec_calls(request: &CanonicalRequest, locals: &[(String, String)]) -> Vec<String> {
    let mut calls = Vec::new();

    // 1. builder
    if request.flag("insecure") {
        calls.push("relaxedHTTPSValidation()".to_string());
    }
    if let Some(proxy) = &request.proxy {
        calls.push(format!("proxy({})", literal(proxy)));
    }

    // 2. headers
    let has_header =
        |name: &str| request.headers.enabled().any(|h| h.key.eq_ignore_ascii_case(name));

    for header in request
        .headers
        .enabled()
        .filter(|h| !h.key.eq_ignore_ascii_case("authorization"))
    {
        calls.push(format!("header({}, {})", literal(&header.key), literal(&header.value)));
    }
    for cookie in request.cookies.enabled() {
        calls.push(format!("cookie({}, {})", literal(&cookie.key), literal(&cookie.value)));
    }
    if let Some(agent) = request.user_agent.as_deref().filter(|_| !has_header("user-agent")) {
        calls.push(format!("header(\"User-Agent\", {})", literal(agent)));
    }
    if let Some(referer) = request.referer.as_deref().filter(|_| !has_header("referer")) {
        calls.push(format!("header(\"Referer\", {})", literal(referer)));
    }

    // 3. auth
    for header in request
        .headers
        .enabled()
        .filter(|h| h.key.eq_ignore_ascii_case("authorization"))
    {
        let value = header.value.trim();
        match bearer_token(value) {
            Some(token) => calls.push(format!("auth().oauth2({})", literal(token))),
            None => calls.push(format!("header({}, {})", literal(&header.key), literal(value))),
        }
    }
    match request.enabled_auth() {
        Some(Auth::Basic { username, password }) => calls.push(format!(
            "auth().preemptive().basic({}, {})",
            literal(username),
            literal(password)
        )),
        Some(Auth::Bearer { token }) => calls.push(format!("auth().oauth2({})", literal(token))),
        Some(Auth::None) | None => {}
    }

    // 4. parameters
    for (param, local) in locals {
        calls.push(format!("pathParam({}, {})", literal(param), local));
    }
    for query in request.query_params.enabled() {
        calls.push(format!("queryParam({}, {})", literal(&query.key), literal(&query.value)));
    }

    // 5. body
    if let Some(body) = request.non_blank_body() {
        calls.push(format!("body({})", literal(body.raw())));
    } else {
        for field in request.form_data.enabled() {
            calls.push(format!("multiPart({}, {})", literal(&field.key), literal(&field.value)));
        }
    }

    calls
}

fn bearer_token(value: &str) -> Option<&str> {
    let prefix = value.get(..7)?;
    prefix
        .eq_ignore_ascii_case("bearer ")
        .then(|| value[7..].trim())
}

/// Step 6. REST-assured has no shorthand for TRACE and CONNECT.
fn verb_call(method: HttpMethod, path: &str) -> String {
    match method {
        HttpMethod::TRACE | HttpMethod::CONNECT => {
            format!("request({}, {})", literal(method.as_str()), literal(path))
        }
        _ => format!("{}({})", method.as_str().to_ascii_lowercase(), literal(path)),
    }
}

fn render_retry_analyzer(w: &mut JavaWriter) {
    w.open(format!(
        "public static class {} implements IRetryAnalyzer {{",
        RETRY_ANALYZER
    ));
    w.line(format!("private static final int MAX_RETRIES = {};", MAX_RETRIES));
    w.line("private int attempts = 0;");
    w.blank();
    w.line("@Override");
    w.open("public boolean retry(ITestResult result) {");
    w.open("if (attempts < MAX_RETRIES) {");
    w.line("attempts++;");
    w.line("return true;");
    w.close("}");
    w.line("return false;");
    w.close("}");
    w.close("}");
}
