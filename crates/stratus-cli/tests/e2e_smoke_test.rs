use std::{fs, path::PathBuf};

use tempfile::tempdir;

use stratus_cli::{Args, Command, run, types_listing};

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn args(schema: &str, command: Command) -> Args {
    Args {
        schema: fixture(schema),
        config: None,
        log_level: "off".to_string(),
        command,
    }
}

#[test]
fn e2e_smoke_test_check_valid_template() {
    let args = args(
        "schema.json",
        Command::Check {
            template: fixture("web_stack.json"),
        },
    );
    if let Err(e) = run(&args) {
        panic!("Valid template failed: {e}");
    }
}

#[test]
fn e2e_smoke_test_render_round_trip() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("web_stack.json");

    let args = args(
        "schema.json",
        Command::Render {
            template: fixture("web_stack.json"),
            output: Some(output_path.to_string_lossy().to_string()),
        },
    );
    run(&args).expect("Failed to render template");

    let rendered: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    let original: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fixture("web_stack.json")).unwrap()).unwrap();
    assert_eq!(rendered, original);
}

#[test]
fn e2e_smoke_test_invalid_references() {
    let args = args(
        "schema.json",
        Command::Check {
            template: fixture("cyclic_stack.json"),
        },
    );
    let err = run(&args).expect_err("Cyclic template should fail the check");
    match err {
        stratus::StratusError::InvalidReferences(violations) => {
            let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
            assert_eq!(
                messages,
                vec![
                    "Invalid Reference: Resource Primary refers to Replica",
                    "Invalid Reference: Resource Replica refers to Primary",
                    "Invalid Reference: Output Missing refers to Ghost",
                ]
            );
        }
        other => panic!("Expected InvalidReferences, got {other}"),
    }
}

#[test]
fn e2e_smoke_test_render_refuses_cyclic_template() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("out.json");
    let args = args(
        "schema.json",
        Command::Render {
            template: fixture("cyclic_stack.json"),
            output: Some(output_path.to_string_lossy().to_string()),
        },
    );
    assert!(run(&args).is_err());
    assert!(!output_path.exists(), "Nothing is written for invalid templates");
}

#[test]
fn e2e_smoke_test_config_relaxes_validation() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[validation]\nfail_on_invalid_refs = false\n").unwrap();
    let output_path = temp_dir.path().join("out.json");

    let mut args = args(
        "schema.json",
        Command::Render {
            template: fixture("cyclic_stack.json"),
            output: Some(output_path.to_string_lossy().to_string()),
        },
    );
    args.config = Some(config_path.to_string_lossy().to_string());

    run(&args).expect("Relaxed validation should render");
    assert!(output_path.exists());
}

#[test]
fn e2e_smoke_test_yaml_schema() {
    let args = args("schema.yaml", Command::Types { abbreviations: true });
    run(&args).expect("YAML schema should load");
}

#[test]
fn e2e_smoke_test_types_listing() {
    let schema = stratus::Stratus::default()
        .load_schema(fixture("schema.json"))
        .unwrap();
    let listing = types_listing(&schema, true);
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "AWS::EC2::Instance (EC2::Instance, Instance)");
    assert_eq!(
        lines[3],
        "AWS::S3::Bucket (S3::Bucket, Bucket)"
    );
    assert_eq!(types_listing(&schema, false).lines().next(), Some("AWS::EC2::Instance"));
}

#[test]
fn e2e_smoke_test_missing_schema() {
    let args = args("absent.json", Command::Types { abbreviations: false });
    assert!(run(&args).is_err());
}
