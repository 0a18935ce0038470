//! CLI integration tests for the facade-schema binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("facade-schema"))
}

// Helper to create a temp document file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const DOCUMENT: &str = r##"[
    {
        "Name": "Secrets",
        "Version": 2,
        "AvailableTo": ["model-user"],
        "Schema": {
            "type": "object",
            "properties": {
                "RemoveSecrets": {
                    "type": "object",
                    "properties": {
                        "Params": { "$ref": "#/definitions/DeleteSecretArgs" },
                        "Result": { "$ref": "#/definitions/Error" }
                    }
                }
            },
            "definitions": {
                "DeleteSecretArgs": {
                    "type": "object",
                    "properties": {
                        "args": { "type": "array", "items": { "type": "string" } }
                    }
                },
                "Error": {
                    "type": "object",
                    "properties": {
                        "code": { "type": "string" },
                        "info": { "type": "object", "patternProperties": { ".*": { "type": "object" } } }
                    }
                }
            }
        }
    },
    {
        "Name": "Controller",
        "Version": 11,
        "AvailableTo": ["controller-user", "model-user"],
        "Schema": {
            "properties": {
                "ControllerVersion": { "properties": { "Result": { "type": "string" } } }
            }
        }
    }
]"##;

const BROKEN_DOCUMENT: &str = r##"[{
    "Name": "Broken",
    "Version": 1,
    "AvailableTo": ["model-user"],
    "Schema": {
        "properties": {
            "Run": { "properties": { "Params": { "type": "array" } } }
        }
    }
}]"##;

mod render_command {
    use super::*;

    #[test]
    fn renders_both_audiences() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "schemas-juju-3.3.json", DOCUMENT);

        cmd()
            .args(["render", dir.path().to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 files checked: 1 rendered, 0 failed"));

        let model = fs::read_to_string(dir.path().join("schemas-juju-3.3.model-user.txt")).unwrap();
        assert!(model.starts_with("Secrets: 2\n.RemoveSecrets()\nin\n: DeleteSecretArgs\n"));
        assert!(model.contains(".info[abc]: mapping"));
        assert!(model.contains("Controller: 11\n.ControllerVersion()\nin: None\nout\n: text\n"));

        let controller =
            fs::read_to_string(dir.path().join("schemas-juju-3.3.controller-user.txt")).unwrap();
        assert!(!controller.contains("Secrets"));
        assert!(controller.starts_with("Controller: 11\n"));
    }

    #[test]
    fn ignores_non_matching_files() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "other.json", DOCUMENT);

        cmd()
            .args(["render", dir.path().to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("0 files checked"));

        assert!(!dir.path().join("other.model-user.txt").exists());
    }

    #[test]
    fn custom_pattern_and_audience() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "api-v1.json", DOCUMENT);

        cmd()
            .args([
                "render",
                dir.path().to_str().unwrap(),
                "--pattern",
                "api-*.json",
                "--audience",
                "controller-user",
            ])
            .assert()
            .success();

        assert!(dir.path().join("api-v1.controller-user.txt").exists());
        assert!(!dir.path().join("api-v1.model-user.txt").exists());
    }

    #[test]
    fn python_labels() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "schemas-juju-3.3.json", DOCUMENT);

        cmd()
            .args([
                "render",
                dir.path().to_str().unwrap(),
                "--labels",
                "python",
            ])
            .assert()
            .success();

        let model = fs::read_to_string(dir.path().join("schemas-juju-3.3.model-user.txt")).unwrap();
        assert!(model.contains(".args[0]: str"));
        assert!(model.contains(".info[\"abc\"]: dict[Any, Any]"));
    }

    #[test]
    fn failing_file_does_not_block_others() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "schemas-juju-1.json", BROKEN_DOCUMENT);
        write_temp_file(&dir, "schemas-juju-2.json", DOCUMENT);

        cmd()
            .args(["render", dir.path().to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("has no items schema"))
            .stdout(predicate::str::contains("2 files checked: 1 rendered, 1 failed"));

        assert!(!dir.path().join("schemas-juju-1.model-user.txt").exists());
        assert!(dir.path().join("schemas-juju-2.model-user.txt").exists());
    }

    #[test]
    fn json_report() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "schemas-juju-1.json", "{ not json");

        let output = cmd()
            .args(["render", dir.path().to_str().unwrap(), "--format", "json"])
            .assert()
            .code(1)
            .get_output()
            .stdout
            .clone();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(report["files_checked"], 1);
        assert_eq!(report["failed"], 1);
        assert_eq!(report["results"][0]["status"], "error");
        assert!(report["results"][0]["error"]
            .as_str()
            .unwrap()
            .contains("invalid JSON"));
    }

    #[test]
    fn quiet_hides_successes() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "schemas-juju-3.3.json", DOCUMENT);

        cmd()
            .args(["render", dir.path().to_str().unwrap(), "--quiet"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn missing_directory() {
        cmd()
            .args(["render", "/nonexistent/schemas"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }
}

mod show_command {
    use super::*;

    #[test]
    fn prints_listing() {
        let dir = TempDir::new().unwrap();
        let document = write_temp_file(&dir, "schemas.json", DOCUMENT);

        cmd()
            .args(["show", document.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(".RemoveSecrets()"))
            .stdout(predicate::str::contains(".args[0]: text"));
    }

    #[test]
    fn filters_by_audience() {
        let dir = TempDir::new().unwrap();
        let document = write_temp_file(&dir, "schemas.json", DOCUMENT);

        cmd()
            .args([
                "show",
                document.to_str().unwrap(),
                "--audience",
                "controller-user",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Secrets").not())
            .stdout(predicate::str::contains("Controller: 11"));
    }

    #[test]
    fn writes_output_file() {
        let dir = TempDir::new().unwrap();
        let document = write_temp_file(&dir, "schemas.json", DOCUMENT);
        let output = dir.path().join("listing.txt");

        cmd()
            .args([
                "show",
                document.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("Secrets: 2\n"));
    }

    #[test]
    fn wrapped_document() {
        let dir = TempDir::new().unwrap();
        let wrapped = format!(r#"{{"facades": {}}}"#, DOCUMENT);
        let document = write_temp_file(&dir, "schemas.json", &wrapped);

        cmd()
            .args(["show", document.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Secrets: 2"));
    }
}

mod definitions_command {
    use super::*;

    #[test]
    fn dumps_each_definition() {
        let dir = TempDir::new().unwrap();
        let document = write_temp_file(&dir, "schemas.json", DOCUMENT);

        cmd()
            .args(["definitions", document.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "# Secrets.DeleteSecretArgs\n.args[0]: text\n",
            ))
            .stdout(predicate::str::contains(
                "# Secrets.Error\n.code: text\n.info[abc]: mapping\n",
            ));
    }

    #[test]
    fn unknown_facade() {
        let dir = TempDir::new().unwrap();
        let document = write_temp_file(&dir, "schemas.json", DOCUMENT);

        cmd()
            .args([
                "definitions",
                document.to_str().unwrap(),
                "--facade",
                "Nope",
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("no facade named 'Nope'"));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["show", "/nonexistent/schemas.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn invalid_json() {
        let dir = TempDir::new().unwrap();
        let document = write_temp_file(&dir, "schemas.json", "not json");

        cmd()
            .args(["show", document.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }

    #[test]
    fn invalid_document_shape() {
        let dir = TempDir::new().unwrap();
        let document = write_temp_file(&dir, "schemas.json", r#"{"Name": "Secrets"}"#);

        cmd()
            .args(["show", document.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid facade document"));
    }

    #[test]
    fn malformed_schema() {
        let dir = TempDir::new().unwrap();
        let document = write_temp_file(&dir, "schemas.json", BROKEN_DOCUMENT);

        cmd()
            .args(["show", document.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("array at \"\" has no items schema"));
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
            .stdout(predicate::str::contains("Flatten RPC facade schemas"));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("facade-schema"));
    }

    #[test]
    fn render_help() {
        cmd()
            .args(["render", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--pattern"))
            .stdout(predicate::str::contains("--audience"))
            .stdout(predicate::str::contains("--labels"));
    }
}

/// Remote document loading against a local mock server
#[cfg(feature = "remote")]
mod remote {
    use super::*;

    #[test]
    fn show_from_url() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/schemas-juju-3.3.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(DOCUMENT)
            .create();

        cmd()
            .args(["show", &format!("{}/schemas-juju-3.3.json", server.url())])
            .assert()
            .success()
            .stdout(predicate::str::contains(".RemoveSecrets()"));
    }

    #[test]
    fn show_url_404() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/missing.json").with_status(404).create();

        cmd()
            .args(["show", &format!("{}/missing.json", server.url())])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("failed to fetch"));
    }
}
