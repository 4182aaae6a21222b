use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "machine_flags_cli_test_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

const PROVISIONING_FLAGS: &str = r#"
driver: example
flags:
  - type: bool
    name: enable-ssl
    usage: Enable SSL
    env_var: EXAMPLE_SSL
    value: true
  - type: int
    name: retries
    usage: Number of retries
    env_var: EXAMPLE_RETRIES
    value: 3
  - type: string_slice
    name: tags
    usage: Resource tags
    value: [a, b]
  - type: string
    name: region
  - type: string_slice
    name: labels
    env_var: EXAMPLE_LABELS
"#;

fn write_flag_set(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.join("flags.yml");
    fs::write(&path, contents).expect("failed to write flag set");
    path
}

fn machine_flags() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_machine-flags"));
    cmd.env_remove("MACHINE_DRIVER_FLAGS")
        .env_remove("EXAMPLE_RETRIES")
        .env_remove("EXAMPLE_SSL")
        .env_remove("EXAMPLE_LABELS")
        .env_remove("RUST_LOG");
    cmd
}

fn run_with_flags(dir: &TempDir, args: &[&str]) -> Output {
    let path = write_flag_set(dir, PROVISIONING_FLAGS);
    machine_flags()
        .arg("--driver-flags")
        .arg(&path)
        .args(args)
        .output()
        .expect("failed to run machine-flags")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "machine-flags failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// Defaults and overrides
// ---------------------------------------------------------------------------

#[test]
fn test_unset_flags_print_parser_defaults() {
    let dir = TempDir::new("defaults");
    let output = run_with_flags(&dir, &[]);
    let json = stdout_json(&output);

    assert_eq!(json["driver"], "example");
    assert_eq!(json["options"]["enable-ssl"], true);
    assert_eq!(json["options"]["retries"], 3);
    assert_eq!(json["options"]["tags"], serde_json::json!(["a", "b"]));
    assert_eq!(json["options"]["region"], "");
    assert_eq!(json["options"]["labels"], serde_json::json!([]));
}

#[test]
fn test_arguments_override_defaults() {
    let dir = TempDir::new("overrides");
    let output = run_with_flags(
        &dir,
        &[
            "--enable-ssl=false",
            "--retries",
            "5",
            "--tags",
            "x",
            "--tags",
            "y",
            "--region",
            "eu-west-1",
        ],
    );
    let json = stdout_json(&output);

    assert_eq!(json["options"]["enable-ssl"], false);
    assert_eq!(json["options"]["retries"], 5);
    assert_eq!(json["options"]["tags"], serde_json::json!(["x", "y"]));
    assert_eq!(json["options"]["region"], "eu-west-1");
}

#[test]
fn test_flag_env_var_binding() {
    let dir = TempDir::new("env_binding");
    let path = write_flag_set(&dir, PROVISIONING_FLAGS);
    let output = machine_flags()
        .arg("--driver-flags")
        .arg(&path)
        .env("EXAMPLE_RETRIES", "9")
        .output()
        .expect("failed to run machine-flags");
    let json = stdout_json(&output);

    assert_eq!(json["options"]["retries"], 9);
}

#[test]
fn test_bool_env_binding_accepts_numeric_values() {
    let dir = TempDir::new("bool_env");
    let path = write_flag_set(&dir, PROVISIONING_FLAGS);
    let output = machine_flags()
        .arg("--driver-flags")
        .arg(&path)
        .env("EXAMPLE_SSL", "0")
        .output()
        .expect("failed to run machine-flags");
    let json = stdout_json(&output);

    assert_eq!(json["options"]["enable-ssl"], false);
}

#[test]
fn test_string_slice_env_binding() {
    let dir = TempDir::new("slice_env");
    let path = write_flag_set(&dir, PROVISIONING_FLAGS);
    let output = machine_flags()
        .arg("--driver-flags")
        .arg(&path)
        .env("EXAMPLE_LABELS", "web,prod")
        .output()
        .expect("failed to run machine-flags");
    let json = stdout_json(&output);

    assert_eq!(json["options"]["labels"], serde_json::json!(["web", "prod"]));
}

#[test]
fn test_empty_string_slice_env_binding_is_empty_list() {
    let dir = TempDir::new("empty_slice_env");
    let path = write_flag_set(&dir, PROVISIONING_FLAGS);
    let output = machine_flags()
        .arg("--driver-flags")
        .arg(&path)
        .env("EXAMPLE_LABELS", "")
        .output()
        .expect("failed to run machine-flags");
    let json = stdout_json(&output);

    assert_eq!(json["options"]["labels"], serde_json::json!([]));
}

#[test]
fn test_driver_flags_from_environment() {
    let dir = TempDir::new("flags_env");
    let path = write_flag_set(&dir, PROVISIONING_FLAGS);
    let output = machine_flags()
        .env("MACHINE_DRIVER_FLAGS", &path)
        .args(["--retries", "1"])
        .output()
        .expect("failed to run machine-flags");
    let json = stdout_json(&output);

    assert_eq!(json["driver"], "example");
    assert_eq!(json["options"]["retries"], 1);
}

#[test]
fn test_yaml_output() {
    let dir = TempDir::new("yaml");
    let output = run_with_flags(&dir, &["--format", "yaml"]);
    assert!(output.status.success());

    let yaml: serde_yaml::Value =
        serde_yaml::from_slice(&output.stdout).expect("stdout should be YAML");
    assert_eq!(yaml["driver"].as_str(), Some("example"));
    assert_eq!(yaml["options"]["retries"].as_i64(), Some(3));
}

#[test]
fn test_no_flag_set_prints_empty_options() {
    let output = machine_flags().output().expect("failed to run machine-flags");
    let json = stdout_json(&output);

    assert_eq!(json["driver"], "none");
    assert_eq!(json["options"], serde_json::json!({}));
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

#[test]
fn test_invalid_int_is_usage_error() {
    let dir = TempDir::new("bad_int");
    let output = run_with_flags(&dir, &["--retries", "many"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let dir = TempDir::new("unknown_flag");
    let output = run_with_flags(&dir, &["--no-such-flag"]);

    assert_eq!(output.status.code(), Some(2));
}

// ---------------------------------------------------------------------------
// Swarm discovery
// ---------------------------------------------------------------------------

#[test]
fn test_valid_swarm_discovery_is_accepted() {
    let output = machine_flags()
        .args(["--swarm-discovery", "token://deadbeefcafe"])
        .output()
        .expect("failed to run machine-flags");

    assert!(output.status.success());
}

#[test]
fn test_malformed_swarm_discovery_is_rejected() {
    let output = machine_flags()
        .args(["--swarm-discovery", "foo"])
        .output()
        .expect("failed to run machine-flags");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Swarm Discovery URL was in the wrong format: foo"),
        "unexpected stderr: {stderr}"
    );
}

// ---------------------------------------------------------------------------
// Flag set errors
// ---------------------------------------------------------------------------

#[test]
fn test_reserved_flag_name_fails() {
    let dir = TempDir::new("reserved");
    let path = write_flag_set(
        &dir,
        "driver: clash\nflags:\n  - type: string\n    name: format\n",
    );
    let output = machine_flags()
        .arg("--driver-flags")
        .arg(&path)
        .output()
        .expect("failed to run machine-flags");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("reserved"), "unexpected stderr: {stderr}");
}

#[test]
fn test_help_flag_name_fails() {
    let dir = TempDir::new("help_flag");
    let path = write_flag_set(&dir, "driver: d\nflags:\n  - type: bool\n    name: help\n");
    let output = machine_flags()
        .arg("--driver-flags")
        .arg(&path)
        .output()
        .expect("failed to run machine-flags");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("flag name is reserved: help"), "unexpected stderr: {stderr}");
}

#[test]
fn test_unsupported_flag_type_fails() {
    let dir = TempDir::new("unsupported");
    let path = write_flag_set(
        &dir,
        "driver: future\nflags:\n  - type: duration\n    name: future-timeout\n",
    );
    let output = machine_flags()
        .arg("--driver-flags")
        .arg(&path)
        .output()
        .expect("failed to run machine-flags");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unsupported flag type 'duration' for flag 'future-timeout'"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_missing_flag_set_file_fails() {
    let dir = TempDir::new("missing");
    let output = machine_flags()
        .arg("--driver-flags")
        .arg(dir.join("absent.yml"))
        .output()
        .expect("failed to run machine-flags");

    assert_eq!(output.status.code(), Some(1));
}
