//! Integration tests for the bamgen command line

mod common;

use assert_cmd::Command;
use common::{SHIPMENT_DEFINITION, definition_workbook, plain_workbook};
use predicates::prelude::*;
use tempfile::TempDir;

fn bamgen(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bamgen").unwrap();
    // Keep a user config file out of the tests
    let config = dir.path().join("empty-config.toml");
    std::fs::write(&config, "").unwrap();
    cmd.env("BAMGEN_CONFIG", config);
    cmd
}

fn read_utf16(path: &std::path::Path) -> String {
    let bytes = std::fs::read(path).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xFE], "missing UTF-16LE byte order mark");
    let units: Vec<u16> = bytes[2..]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).unwrap()
}

#[test]
fn test_export_writes_utf16_definition() {
    let dir = TempDir::new().unwrap();
    let workbook = definition_workbook(&dir, "BAMDefinition.xlsx", &[SHIPMENT_DEFINITION]);
    let output = dir.path().join("BAMDefinition.xml");

    bamgen(&dir)
        .arg("export")
        .arg(&workbook)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote BAM XML"));

    assert_eq!(read_utf16(&output), SHIPMENT_DEFINITION);
}

#[test]
fn test_export_legacy_mode() {
    let dir = TempDir::new().unwrap();
    let workbook = definition_workbook(&dir, "BAMDefinition.xlsx", &["<A>", "</A>"]);
    let output = dir.path().join("legacy.xml");

    bamgen(&dir)
        .arg("export")
        .arg(&workbook)
        .arg(&output)
        .arg("--legacy")
        .assert()
        .success()
        .stdout(predicate::str::contains("legacy mode"));

    assert_eq!(read_utf16(&output), "<A></A>");
}

#[test]
fn test_export_without_definition_sheet_fails() {
    let dir = TempDir::new().unwrap();
    let workbook = plain_workbook(&dir, "Plain.xlsx");
    let output = dir.path().join("out.xml");

    bamgen(&dir)
        .arg("export")
        .arg(&workbook)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("BamXmlHiddenSheet"));

    assert!(!output.exists());
}

#[test]
fn test_export_missing_workbook_fails() {
    let dir = TempDir::new().unwrap();

    bamgen(&dir)
        .arg("export")
        .arg(dir.path().join("missing.xlsx"))
        .arg(dir.path().join("out.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.xlsx"));
}

#[test]
fn test_generate_from_workbook() {
    let dir = TempDir::new().unwrap();
    let workbook = definition_workbook(&dir, "BAMDefinition.xlsx", &[SHIPMENT_DEFINITION]);
    let output = dir.path().join("BamApi.cs");

    bamgen(&dir)
        .arg("generate")
        .arg(&workbook)
        .arg(&output)
        .arg("buffered")
        .arg("Contoso.Bam")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote typed BAM API"));

    let code = std::fs::read_to_string(&output).unwrap();
    assert!(code.contains("namespace Contoso.Bam"));
    assert!(code.contains("new BufferedEventStream("));
}

#[test]
fn test_generate_with_custom_template_from_xml() {
    let dir = TempDir::new().unwrap();
    let definition = dir.path().join("def.xml");
    std::fs::write(&definition, SHIPMENT_DEFINITION).unwrap();
    let template = dir.path().join("echo.tera");
    std::fs::write(&template, "{{ EventStreamType }} {{ TargetNamespace }}").unwrap();
    let output = dir.path().join("out.txt");

    bamgen(&dir)
        .arg("generate")
        .arg(&definition)
        .arg(&output)
        .arg("ORCHESTRATION")
        .arg("Contoso.Bam")
        .arg(&template)
        .arg("--from-xml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Using custom template"));

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Orchestration Contoso.Bam"
    );
}

#[test]
fn test_generate_invalid_mode_fails() {
    let dir = TempDir::new().unwrap();
    let workbook = definition_workbook(&dir, "BAMDefinition.xlsx", &[SHIPMENT_DEFINITION]);
    let output = dir.path().join("BamApi.cs");

    bamgen(&dir)
        .arg("generate")
        .arg(&workbook)
        .arg(&output)
        .arg("sideways")
        .arg("Contoso.Bam")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown EventStream type 'sideways'"));

    assert!(!output.exists());
}

#[test]
fn test_generate_missing_template_fails() {
    let dir = TempDir::new().unwrap();
    let workbook = definition_workbook(&dir, "BAMDefinition.xlsx", &[SHIPMENT_DEFINITION]);

    bamgen(&dir)
        .arg("generate")
        .arg(&workbook)
        .arg(dir.path().join("BamApi.cs"))
        .arg("Direct")
        .arg("Contoso.Bam")
        .arg(dir.path().join("missing.tera"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot find the specified template file"));
}

#[test]
fn test_template_from_config_file() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("configured.tera");
    std::fs::write(&template, "CONFIGURED {{ TargetNamespace }}").unwrap();
    let config = dir.path().join("bamgen.toml");
    std::fs::write(
        &config,
        format!("[generation]\ntemplate = {:?}\n", template.display().to_string()),
    )
    .unwrap();
    let definition = dir.path().join("def.xml");
    std::fs::write(&definition, "<Root/>").unwrap();
    let output = dir.path().join("out.txt");

    bamgen(&dir)
        .arg("--config")
        .arg(&config)
        .arg("generate")
        .arg(&definition)
        .arg(&output)
        .arg("Direct")
        .arg("Acme")
        .arg("--from-xml")
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "CONFIGURED Acme");
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bamgen.toml");
    std::fs::write(&config, "[extraction]\nunknown_key = 1\n").unwrap();

    bamgen(&dir)
        .arg("--config")
        .arg(&config)
        .arg("template")
        .arg("export")
        .arg(dir.path().join("t.tera"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn test_template_export_command() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("TypedApi.cs.tera");

    bamgen(&dir)
        .arg("template")
        .arg("export")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote built-in template"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("{{ TargetNamespace }}"));
}
