//! End-to-end integration tests
//!
//! These tests verify complete workflows from a cURL command line through
//! normalization, projection and code generation, using only the public API.

use super::init_test_env;
use curl_rest_assured::codegen::CodeGenError;
use curl_rest_assured::config::{PomConfig, PomType, ProjectInfo};
use curl_rest_assured::models::{HttpMethod, Param};
use curl_rest_assured::{
    generate, generate_curl_command, load_generation_config, normalize_value, parse,
    parse_with_options, project, GenerationConfig, ParseError, ParseOptions,
};
use serde_json::json;
use std::collections::HashMap;

#[test]
fn test_end_to_end_curl_to_test_class() {
    init_test_env();

    // Step 1: Parse the command
    let request = parse(
        r#"curl -X POST "https://api.example.com/v1/users?notify=true" \
            -H "Content-Type: application/json" \
            -H "Authorization: Bearer tok123" \
            -d "{\"name\":\"Ana\",\"age\":31}""#,
    )
    .expect("command should parse");

    assert_eq!(request.method, HttpMethod::POST);
    assert_eq!(request.base_url, "https://api.example.com");
    assert_eq!(request.endpoint, "/v1/users");
    assert_eq!(request.query_params.get("notify"), Some("true"));

    // Step 2: Load settings the way a caller hands them over
    let config = load_generation_config(json!({
        "option": "full",
        "serviceName": "user service",
        "methodName": "create user",
        "statusCode": 201,
        "needPojo": true,
        "testGroups": "smoke, users"
    }))
    .expect("config should load");

    // Step 3: Generate
    let code = generate(&request, &config).expect("generation should succeed");

    assert!(code.test_code.contains("public class UserService {"));
    assert!(code.test_code.contains(r#"@Test(groups = {"smoke", "users"})"#));
    assert!(code.test_code.contains("public void createUser() {"));
    assert!(code.test_code.contains(r#".auth().oauth2("tok123")"#));
    assert!(code.test_code.contains(r#".queryParam("notify", "true")"#));
    assert!(code.test_code.contains(r#".post("/v1/users")"#));
    assert!(code.test_code.contains(".statusCode(201);"));

    let pojo = code.pojo_code.expect("JSON object body yields a POJO");
    assert!(pojo.contains("public class UserServiceRequest"));
    assert!(pojo.contains("private String name;"));
    assert!(pojo.contains("private Integer age;"));
    assert!(code.pom_xml.is_none());
}

#[test]
fn test_end_to_end_backend_payload() {
    init_test_env();

    let request = normalize_value(&json!({
        "method": "PUT",
        "baseUrl": "https://api.example.com",
        "endpoint": "/orders/{orderId}",
        "headers": [
            {"key": "Accept", "value": "application/json", "enabled": true},
            {"key": "X-Debug", "value": "1", "enabled": false}
        ],
        "body": {"status": "shipped"},
        "connectTimeout": 3,
        "networkConfig": {"connectTimeout": 10, "retry": 1}
    }))
    .expect("payload should normalize");

    assert_eq!(request.url, "https://api.example.com/orders/{orderId}");
    assert_eq!(request.path_parameters, vec!["orderId"]);
    let network = request.network_config.clone().unwrap();
    assert_eq!(network.connect_timeout, Some(3.0));
    assert_eq!(network.retry, Some(1));

    let code = generate(&request, &GenerationConfig::full("orders", "ship order")).unwrap();

    assert!(code.test_code.contains("String orderId = \"\";"));
    assert!(code.test_code.contains(r#".pathParam("orderId", orderId)"#));
    assert!(code.test_code.contains(r#".header("Accept", "application/json")"#));
    assert!(!code.test_code.contains("X-Debug"));
    assert!(code.test_code.contains(r#".put("/orders/{orderId}")"#));
}

#[test]
fn test_end_to_end_projection_then_generation() {
    init_test_env();

    let request = parse(
        r#"curl -H "Accept: application/json" -H "X-Trace: abc" -A "probe/1.0" https://api.example.com/health"#,
    )
    .unwrap();

    let inclusion = HashMap::from([
        ("userAgent".to_string(), false),
        ("headers.1".to_string(), false),
    ]);
    let projected = project(&request, &inclusion).unwrap();

    let code = generate(&projected, &GenerationConfig::method("health")).unwrap();

    assert!(code.test_code.contains(r#".header("Accept", "application/json")"#));
    assert!(!code.test_code.contains("X-Trace"));
    assert!(!code.test_code.contains("probe/1.0"));
}

#[test]
fn test_end_to_end_curl_round_trip() {
    init_test_env();

    let original = parse(
        r#"curl -X PATCH https://api.example.com/items/7 -H "Content-Type: application/json" -b "sid=1" -u admin:pw --compressed --max-time 30 -d "{\"qty\":\"3 \$\"}""#,
    )
    .unwrap();

    let emitted = generate_curl_command(&original);
    let reparsed = parse(&emitted).expect("emitted command should parse back");

    assert_eq!(reparsed.method, original.method);
    assert_eq!(reparsed.url, original.url);
    assert_eq!(reparsed.headers, original.headers);
    assert_eq!(reparsed.cookies, original.cookies);
    assert_eq!(reparsed.auth, original.auth);
    assert_eq!(reparsed.body, original.body);
    assert_eq!(reparsed.flags, original.flags);
    assert_eq!(reparsed.network_config, original.network_config);
}

#[test]
fn test_end_to_end_full_pom() {
    init_test_env();

    let request = parse("curl https://api.example.com/status").unwrap();
    let config = GenerationConfig {
        generate_pom: true,
        pom_config: PomConfig {
            project_info: ProjectInfo {
                group_id: "com.example".to_string(),
                artifact_id: "status-tests".to_string(),
                version: "0.1.0".to_string(),
                ..ProjectInfo::default()
            },
            ..PomConfig::default()
        },
        ..GenerationConfig::full("status", "check status")
    };

    let code = generate(&request, &config).unwrap();
    let pom = code.pom_xml.expect("POM was requested");

    assert!(pom.contains("<artifactId>status-tests</artifactId>"));
    assert!(pom.contains("<artifactId>rest-assured</artifactId>"));
    assert!(pom.contains("<artifactId>testng</artifactId>"));
}

#[test]
fn test_end_to_end_failures_produce_no_output() {
    init_test_env();

    let request = parse("curl https://api.example.com/status").unwrap();

    let blank_service = GenerationConfig::full("   ", "check");
    assert_eq!(
        generate(&request, &blank_service),
        Err(CodeGenError::MissingServiceName)
    );

    let incomplete_pom = GenerationConfig {
        generate_pom: true,
        pom_config: PomConfig {
            pom_type: PomType::Full,
            ..PomConfig::default()
        },
        ..GenerationConfig::full("status", "check")
    };
    assert!(matches!(
        generate(&request, &incomplete_pom),
        Err(CodeGenError::IncompleteProjectInfo { .. })
    ));

    assert_eq!(parse("   "), Err(ParseError::EmptyInput));
    assert_eq!(parse("curl -X POST -d x=1"), Err(ParseError::MissingUrl));
}

#[test]
fn test_end_to_end_shell_quoting_mode() {
    init_test_env();

    let command = r#"curl -H 'X-Name: Ana Maria' 'https://api.example.com/people'"#;
    let request = parse_with_options(command, &ParseOptions::shell()).unwrap();

    assert_eq!(request.headers.get("X-Name"), Some("Ana Maria"));
    assert_eq!(request.url, "https://api.example.com/people");
}

#[test]
fn test_end_to_end_disabled_entries_stay_out_of_every_output() {
    init_test_env();

    let mut request = parse(
        r#"curl -H "X-Keep: yes" -b "theme=dark" "https://api.example.com/search?q=rust&secret=1""#,
    )
    .unwrap();
    request.headers.push(Param::disabled("X-Drop", "no"));
    request.cookies.set_enabled("theme", false);
    request.query_params.set_enabled("secret", false);

    let java = generate(&request, &GenerationConfig::full("search", "find")).unwrap();
    let curl = generate_curl_command(&request);

    for output in [&java.test_code, &curl] {
        assert!(output.contains("X-Keep"));
        assert!(!output.contains("X-Drop"), "{}", output);
        assert!(!output.contains("theme"), "{}", output);
        assert!(!output.contains("secret"), "{}", output);
    }
}
