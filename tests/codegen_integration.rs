//! Integration tests for code generation.
//!
//! These tests verify the structure of the generated Java sources and POM
//! files for common cURL commands. Outputs are written under
//! `target/codegen-test-output` for manual inspection.

use curl_rest_assured::config::{
    DependencySwitches, GenerationOption, JavaVersion, PomConfig, PomType, ProjectInfo,
};
use curl_rest_assured::{generate, parse, GenerationConfig};
use std::fs;
use std::path::PathBuf;

/// Helper function to create a test output directory
fn get_test_output_dir() -> PathBuf {
    let dir = PathBuf::from("target/codegen-test-output");
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_output(name: &str, contents: &str) -> PathBuf {
    let path = get_test_output_dir().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Braces and parentheses outside string literals must balance.
fn assert_balanced(code: &str) {
    let mut braces = 0i32;
    let mut parens = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for ch in code.chars() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => braces += 1,
            '}' => braces -= 1,
            '(' => parens += 1,
            ')' => parens -= 1,
            _ => {}
        }
        assert!(braces >= 0 && parens >= 0, "unbalanced code:\n{}", code);
    }

    assert_eq!(braces, 0, "unbalanced braces:\n{}", code);
    assert_eq!(parens, 0, "unbalanced parentheses:\n{}", code);
    assert!(!in_string, "unterminated string literal:\n{}", code);
}

#[test]
fn test_generate_simple_get_class() {
    let request = parse("curl https://jsonplaceholder.typicode.com/posts/1").unwrap();

    let code = generate(&request, &GenerationConfig::full("posts api", "get post")).unwrap();
    let output_path = write_output("PostsApi.java", &code.test_code);

    assert_balanced(&code.test_code);
    assert!(code.test_code.contains("public class PostsApi {"));
    assert!(code
        .test_code
        .contains("RestAssured.baseURI = \"https://jsonplaceholder.typicode.com\";"));
    assert!(code.test_code.contains(".get(\"/posts/1\")"));
    assert!(code.test_code.contains(".statusCode(200);"));

    println!("✓ Generated GET test written to: {}", output_path.display());
}

#[test]
fn test_generate_post_with_everything() {
    let request = parse(
        r#"curl -X POST "https://api.example.com/v2/orders/{orderId}/items?dryRun=true" \
            -H "Content-Type: application/json" \
            -H "Authorization: Bearer secret-token" \
            -b "session=xyz" \
            -A "client/2.0" \
            -d "{\"sku\":\"A-1\",\"quantity\":2,\"price\":9.5,\"gift\":false,\"tags\":[\"x\"],\"shipping\":{\"city\":\"Lima\",\"zip\":\"15001\"}}""#,
    )
    .unwrap();

    let config = GenerationConfig {
        package_name: Some("com.example.orders".to_string()),
        need_pojo: true,
        include_retry: true,
        logging_required: true,
        assert_response_time: true,
        test_priority: Some(2),
        ..GenerationConfig::full("order items", "add item")
    };

    let code = generate(&request, &config).unwrap();
    write_output("OrderItems.java", &code.test_code);

    assert_balanced(&code.test_code);
    assert!(code.test_code.starts_with("package com.example.orders;"));
    assert!(code
        .test_code
        .contains("@Test(priority = 2, retryAnalyzer = RetryAnalyzer.class)"));
    assert!(code.test_code.contains("String orderId = \"\";"));
    assert!(code.test_code.contains(".cookie(\"session\", \"xyz\")"));
    assert!(code.test_code.contains(".header(\"User-Agent\", \"client/2.0\")"));
    assert!(code.test_code.contains(".auth().oauth2(\"secret-token\")"));
    assert!(code.test_code.contains(".queryParam(\"dryRun\", \"true\")"));
    assert!(code.test_code.contains(".post(\"/v2/orders/{orderId}/items\")"));
    assert!(code.test_code.contains(".time(lessThan(2000L))"));
    assert!(code.test_code.contains("implements IRetryAnalyzer"));

    let pojo = code.pojo_code.unwrap();
    write_output("OrderItemsRequest.java", &pojo);

    assert_balanced(&pojo);
    assert!(pojo.contains("public class OrderItemsRequest {"));
    assert!(pojo.contains("private Double price;"));
    assert!(pojo.contains("private Boolean gift;"));
    assert!(pojo.contains("private List<String> tags;"));
    assert!(pojo.contains("public static class Shipping {"));
    assert!(pojo.contains("public String getCity()"));
}

#[test]
fn test_generate_statement_style() {
    let request = parse(
        r#"curl -X DELETE https://api.example.com/users/42 -H "X-Request-Id: 7" -u admin:secret"#,
    )
    .unwrap();

    let config = GenerationConfig {
        use_fluent_api: false,
        status_code: "204".to_string(),
        ..GenerationConfig::full("users", "delete user")
    };

    let code = generate(&request, &config).unwrap();
    write_output("UsersStatements.java", &code.test_code);

    assert_balanced(&code.test_code);
    assert!(code.test_code.contains("request.header(\"X-Request-Id\", \"7\");"));
    assert!(code
        .test_code
        .contains("request.auth().preemptive().basic(\"admin\", \"secret\");"));
    assert!(code
        .test_code
        .contains("Response response = request.delete(\"/users/42\");"));
    assert!(code
        .test_code
        .contains("Assert.assertEquals(response.getStatusCode(), 204);"));
}

#[test]
fn test_generate_method_snippet() {
    let request = parse(r#"curl -F "avatar=@me.png" -F "name=Ana" https://cdn.example.com/upload"#)
        .unwrap();

    let config = GenerationConfig {
        option: GenerationOption::Method,
        ..GenerationConfig::default()
    };

    let code = generate(&request, &config).unwrap();
    write_output("upload_snippet.java", &code.test_code);

    assert_balanced(&code.test_code);
    assert!(code.test_code.starts_with("@Test\npublic void postUpload() {"));
    assert!(code.test_code.contains(".multiPart(\"avatar\", \"@me.png\")"));
    assert!(code.test_code.contains(".post(\"https://cdn.example.com/upload\")"));
}

#[test]
fn test_generate_full_pom_with_switches() {
    let request = parse("curl https://api.example.com/ping").unwrap();

    let config = GenerationConfig {
        generate_pom: true,
        pom_config: PomConfig {
            pom_type: PomType::Full,
            project_info: ProjectInfo {
                group_id: "com.example".to_string(),
                artifact_id: "ping-tests".to_string(),
                version: "1.0.0-SNAPSHOT".to_string(),
                name: Some("Ping tests".to_string()),
                description: Some("Checks & balances".to_string()),
            },
            dependencies: DependencySwitches {
                allure: true,
                faker: true,
                ..DependencySwitches::default()
            },
            java_version: JavaVersion::V11,
        },
        ..GenerationConfig::full("ping", "ping")
    };

    let code = generate(&request, &config).unwrap();
    let pom = code.pom_xml.unwrap();
    let output_path = write_output("pom.xml", &pom);

    assert!(pom.contains("<artifactId>ping-tests</artifactId>"));
    assert!(pom.contains("<description>Checks &amp; balances</description>"));
    assert!(pom.contains("<maven.compiler.source>11</maven.compiler.source>"));
    assert!(pom.contains("<artifactId>allure-testng</artifactId>"));
    assert!(pom.contains("<artifactId>datafaker</artifactId>"));
    assert!(!pom.contains("<artifactId>junit-jupiter</artifactId>"));

    println!("✓ Generated POM written to: {}", output_path.display());
}

#[test]
fn test_generate_dependencies_only_pom() {
    let request = parse("curl https://api.example.com/ping").unwrap();

    let config = GenerationConfig {
        generate_pom: true,
        pom_config: PomConfig {
            pom_type: PomType::DependenciesOnly,
            ..PomConfig::default()
        },
        ..GenerationConfig::full("ping", "ping")
    };

    let pom = generate(&request, &config).unwrap().pom_xml.unwrap();
    write_output("dependencies.xml", &pom);

    assert!(pom.starts_with("<dependencies>"));
    assert!(!pom.contains("<project"));
}
