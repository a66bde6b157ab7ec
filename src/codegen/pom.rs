//! Maven POM generation.

use super::CodeGenError;
use crate::config::{DependencySwitches, PomConfig, PomType};

/// A Maven dependency coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub group_id: &'static str,
    pub artifact_id: &'static str,
    pub version: &'static str,
    pub scope: Option<&'static str>,
}

const fn dep(
    group_id: &'static str,
    artifact_id: &'static str,
    version: &'static str,
    scope: Option<&'static str>,
) -> Dependency {
    Dependency {
        group_id,
        artifact_id,
        version,
        scope,
    }
}

const TEST: Option<&str> = Some("test");

/// Always present.
pub const BASE_DEPENDENCIES: &[Dependency] = &[
    dep("io.rest-assured", "rest-assured", "5.4.0", TEST),
    dep("org.testng", "testng", "7.10.2", TEST),
    dep("com.fasterxml.jackson.core", "jackson-databind", "2.17.1", None),
];

const JUNIT: &[Dependency] = &[dep("org.junit.jupiter", "junit-jupiter", "5.10.2", TEST)];
const ALLURE: &[Dependency] = &[dep("io.qameta.allure", "allure-testng", "2.27.0", TEST)];
const EXTENT: &[Dependency] = &[dep("com.aventstack", "extentreports", "5.1.1", None)];
const EXCEL: &[Dependency] = &[dep("org.apache.poi", "poi-ooxml", "5.2.5", None)];
const FAKER: &[Dependency] = &[dep("net.datafaker", "datafaker", "2.2.2", None)];
const LOGGING: &[Dependency] = &[
    dep("org.apache.logging.log4j", "log4j-api", "2.23.1", None),
    dep("org.apache.logging.log4j", "log4j-core", "2.23.1", None),
];
const COMMONS_IO: &[Dependency] = &[dep("commons-io", "commons-io", "2.16.1", None)];

const COMPILER_PLUGIN_VERSION: &str = "3.13.0";
const SUREFIRE_PLUGIN_VERSION: &str = "3.2.5";

/// Base dependencies followed by those the switches turn on, in a fixed order.
pub fn dependencies(switches: &DependencySwitches) -> Vec<Dependency> {
    let optional = [
        (switches.junit, JUNIT),
        (switches.allure, ALLURE),
        (switches.extent, EXTENT),
        (switches.excel, EXCEL),
        (switches.faker, FAKER),
        (switches.logging, LOGGING),
        (switches.commons_io, COMMONS_IO),
    ];

    BASE_DEPENDENCIES
        .iter()
        .chain(
            optional
                .iter()
                .filter(|(on, _)| *on)
                .flat_map(|(_, deps)| deps.iter()),
        )
        .copied()
        .collect()
}

/// Checks that a full POM has its required coordinates.
pub fn validate(config: &PomConfig) -> Result<(), CodeGenError> {
    if config.pom_type != PomType::Full {
        return Ok(());
    }

    let missing = config.project_info.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CodeGenError::IncompleteProjectInfo {
            missing: missing.into_iter().map(str::to_string).collect(),
        })
    }
}

/// Generates the POM text.
///
/// # Examples
///
/// ```
/// use curl_rest_assured::codegen::pom::generate_pom;
/// use curl_rest_assured::config::{PomConfig, PomType};
///
/// let pom = generate_pom(&PomConfig {
///     pom_type: PomType::DependenciesOnly,
///     ..PomConfig::default()
/// })
/// .unwrap();
///
/// assert!(pom.starts_with("<dependencies>"));
/// assert!(pom.contains("<artifactId>rest-assured</artifactId>"));
/// ```
pub fn generate_pom(config: &PomConfig) -> Result<String, CodeGenError> {
    validate(config)?;

    let deps = dependencies(&config.dependencies);

    Ok(match config.pom_type {
        PomType::DependenciesOnly => dependency_block(&deps, 0),
        PomType::Full => full_pom(config, &deps),
    })
}

fn dependency_block(deps: &[Dependency], depth: usize) -> String {
    let pad = "    ".repeat(depth);
    let mut out = format!("{}<dependencies>\n", pad);

    for d in deps {
        out.push_str(&format!("{}    <dependency>\n", pad));
        out.push_str(&format!("{}        <groupId>{}</groupId>\n", pad, d.group_id));
        out.push_str(&format!("{}        <artifactId>{}</artifactId>\n", pad, d.artifact_id));
        out.push_str(&format!("{}        <version>{}</version>\n", pad, d.version));
        if let Some(scope) = d.scope {
            out.push_str(&format!("{}        <scope>{}</scope>\n", pad, scope));
        }
        out.push_str(&format!("{}    </dependency>\n", pad));
    }

    out.push_str(&format!("{}</dependencies>\n", pad));
    out
}

fn full_pom(config: &PomConfig, deps: &[Dependency]) -> String {
    let info = &config.project_info;
    let release = config.java_version.release();

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<project xmlns=\"http://maven.apache.org/POM/4.0.0\"\n");
    out.push_str("         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n");
    out.push_str("         xsi:schemaLocation=\"http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd\">\n");
    out.push_str("    <modelVersion>4.0.0</modelVersion>\n\n");

    out.push_str(&format!("    <groupId>{}</groupId>\n", xml_escape(info.group_id.trim())));
    out.push_str(&format!(
        "    <artifactId>{}</artifactId>\n",
        xml_escape(info.artifact_id.trim())
    ));
    out.push_str(&format!("    <version>{}</version>\n", xml_escape(info.version.trim())));
    out.push_str("    <packaging>jar</packaging>\n");
    if let Some(name) = info.name.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str(&format!("    <name>{}</name>\n", xml_escape(name)));
    }
    if let Some(description) = info.description.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str(&format!(
            "    <description>{}</description>\n",
            xml_escape(description)
        ));
    }
    out.push('\n');

    out.push_str("    <properties>\n");
    out.push_str(&format!("        <maven.compiler.source>{}</maven.compiler.source>\n", release));
    out.push_str(&format!("        <maven.compiler.target>{}</maven.compiler.target>\n", release));
    out.push_str("        <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>\n");
    out.push_str("    </properties>\n\n");

    out.push_str(&dependency_block(deps, 1));
    out.push('\n');

    out.push_str("    <build>\n");
    out.push_str("        <plugins>\n");
    out.push_str("            <plugin>\n");
    out.push_str("                <groupId>org.apache.maven.plugins</groupId>\n");
    out.push_str("                <artifactId>maven-compiler-plugin</artifactId>\n");
    out.push_str(&format!("                <version>{}</version>\n", COMPILER_PLUGIN_VERSION));
    out.push_str("                <configuration>\n");
    out.push_str(&format!("                    <source>{}</source>\n", release));
    out.push_str(&format!("                    <target>{}</target>\n", release));
    out.push_str("                </configuration>\n");
    out.push_str("            </plugin>\n");
    out.push_str("            <plugin>\n");
    out.push_str("                <groupId>org.apache.maven.plugins</groupId>\n");
    out.push_str("                <artifactId>maven-surefire-plugin</artifactId>\n");
    out.push_str(&format!("                <version>{}</version>\n", SUREFIRE_PLUGIN_VERSION));
    out.push_str("            </plugin>\n");
    out.push_str("        </plugins>\n");
    out.push_str("    </build>\n");
    out.push_str("</project>\n");

    out
}

/// Escapes the five XML special characters.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
