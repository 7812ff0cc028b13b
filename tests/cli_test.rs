//! CLI integration tests for the typeshape binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("typeshape"))
}

// Helper to create a temp file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const ORDER_SCHEMA: &str = "tests/fixtures/order.schema.json";

mod validate_command {
    use super::*;

    #[test]
    fn validate_valid_payload() {
        cmd()
            .args([
                "validate",
                "tests/fixtures/order.valid.json",
                "--schema",
                ORDER_SCHEMA,
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Valid"));
    }

    #[test]
    fn validate_invalid_payload() {
        cmd()
            .args([
                "validate",
                "tests/fixtures/order.invalid.json",
                "--schema",
                ORDER_SCHEMA,
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Validation failed"))
            .stderr(predicate::str::contains("lines.1.qty: must be number"));
    }

    #[test]
    fn refinements_ignored_without_flag() {
        cmd()
            .args([
                "validate",
                "tests/fixtures/order.refinement.json",
                "--schema",
                ORDER_SCHEMA,
            ])
            .assert()
            .success();
    }

    #[test]
    fn refinements_enforced_with_flag() {
        cmd()
            .args([
                "validate",
                "tests/fixtures/order.refinement.json",
                "--schema",
                ORDER_SCHEMA,
                "--enforce-refinements",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("total: must be >= 0"));
    }

    #[test]
    fn validate_strict_object_rejects_extra_key() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{"type":"object","isStrict":true,"properties":{"a":{"type":"number"}}}"#,
        );
        let payload = write_temp_file(&dir, "payload.json", r#"{"a":1,"b":2}"#);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("b: object has unexpected key"));
    }

    #[test]
    fn validate_json_output_valid() {
        cmd()
            .args([
                "validate",
                "tests/fixtures/order.valid.json",
                "--schema",
                ORDER_SCHEMA,
                "--json",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"{"valid":true}"#));
    }

    #[test]
    fn validate_json_output_invalid() {
        cmd()
            .args([
                "validate",
                "tests/fixtures/order.invalid.json",
                "--schema",
                ORDER_SCHEMA,
                "--json",
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains(r#""path":"lines.1.qty""#))
            .stdout(predicate::str::contains(r#""kind":"type_mismatch""#));
    }

    #[test]
    fn validate_json_output_file_error() {
        let dir = TempDir::new().unwrap();
        let payload = write_temp_file(&dir, "payload.json", r#"{}"#);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                "/nonexistent/schema.json",
                "--json",
            ])
            .assert()
            .code(3)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains(r#""message":"#));
    }

    #[test]
    fn validate_max_depth() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{"type":"object","additionalProperties":{"type":"object","additionalProperties":{}}}"#,
        );
        let payload = write_temp_file(&dir, "payload.json", r#"{"a":{"b":1}}"#);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--max-depth",
                "1",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("maximum nesting depth"));
    }
}

mod export_command {
    use super::*;

    #[test]
    fn export_to_stdout() {
        cmd()
            .args(["export", ORDER_SCHEMA])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#""$schema":"https://json-schema.org/draft/2020-12/schema""#,
            ))
            .stdout(predicate::str::contains(r#""required":["id","status","total","lines","customer"]"#))
            .stdout(predicate::str::contains("isStrict").not());
    }

    #[test]
    fn export_with_pretty() {
        cmd()
            .args(["export", ORDER_SCHEMA, "--pretty"])
            .assert()
            .success()
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn export_with_output_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("exported.json");

        cmd()
            .args(["export", ORDER_SCHEMA, "--output", output.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#""additionalProperties":false"#));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn well_formed_schema() {
        cmd()
            .args(["check", ORDER_SCHEMA])
            .assert()
            .success()
            .stdout(predicate::str::contains("Schema OK"));
    }

    #[test]
    fn mixed_enum_rejected() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{"type":"object","properties":{"level":{"type":"number","enum":[1,"high"]}}}"#,
        );

        cmd()
            .args(["check", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("properties.level"))
            .stderr(predicate::str::contains("same literal type"));
    }

    #[test]
    fn annotated_schema_accepted() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{"$schema":"https://json-schema.org/draft/2020-12/schema","title":"Tag","type":"string","description":"short label"}"#,
        );

        cmd()
            .args(["check", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Schema OK"));
    }

    #[test]
    fn root_level_error_has_no_path() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"enum":["a","b"]}"#);

        cmd()
            .args(["check", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid schema document: `enum`"));
    }

    #[test]
    fn empty_union_rejected() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"anyOf":[]}"#);

        cmd()
            .args(["check", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("anyOf requires at least one schema"));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["check", "/nonexistent/schema.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn invalid_json_schema() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "bad.json", r#"{ not valid json"#);

        cmd()
            .args(["export", schema.to_str().unwrap()])
            .assert()
            .code(2);
    }

    #[test]
    fn invalid_payload_json() {
        let dir = TempDir::new().unwrap();
        let payload = write_temp_file(&dir, "payload.json", r#"[1,"#);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                ORDER_SCHEMA,
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("loading payload"));
    }
}

mod required_args {
    use super::*;

    #[test]
    fn missing_schema_flag() {
        cmd()
            .args(["validate", "tests/fixtures/order.valid.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--schema"));
    }

    #[test]
    fn missing_payload_for_validate() {
        cmd()
            .args(["validate", "--schema", ORDER_SCHEMA])
            .assert()
            .failure()
            .stderr(predicate::str::contains("PAYLOAD"));
    }

    #[test]
    fn missing_schema_for_export() {
        cmd().args(["export"]).assert().failure();
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Validate JSON values against typeshape schema documents",
            ));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("typeshape"));
    }

    #[test]
    fn validate_help() {
        cmd()
            .args(["validate", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--schema"))
            .stdout(predicate::str::contains("--enforce-refinements"))
            .stdout(predicate::str::contains("--max-depth"));
    }
}
