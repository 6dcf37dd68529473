use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::NamedTempFile;

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_alliodiagram") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("alliodiagram{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_alliodiagram is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn diagram_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("alliodiagram-")
        .suffix(".yaml")
        .tempfile()
        .expect("temporary file should be created");
    file.write_all(content.as_bytes())
        .expect("temporary file should be written");
    file
}

fn run_validate(input: &Path, extra_args: &[&str]) -> Output {
    Command::new(cargo_bin())
        .arg(input)
        .args(extra_args)
        .env_remove("RUST_LOG")
        .output()
        .expect("alliodiagram should execute")
}

fn assert_exit_code(output: &Output, expected: i32) {
    let actual = output.status.code().unwrap_or(-1);
    assert_eq!(
        actual,
        expected,
        "unexpected exit code; stdout: {}; stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

const VALID: &str = "\
devices: {}
diagrams:
  - content:
      - type: begin
        id: b1
      - type: end
        id: e1
      - type: transition
        from: b1
        to: e1
";

const UNREACHABLE: &str = "\
devices:
  lamp: {}
diagrams:
  - content:
      - type: begin
        id: b1
      - type: end
        id: e1
      - type: command
        id: c1
        device: lamp
        command: toggle
      - type: transition
        from: b1
        to: e1
";

const INVALID_KEY: &str = "\
devices: {}
diagrams:
  - content:
      - type: begin
        id: b1
        foo: 1
";

#[test]
fn validate_returns_success_for_clean_diagram() {
    let input = diagram_file(VALID);
    let output = run_validate(input.path(), &[]);

    assert_exit_code(&output, 0);
    assert!(stdout_lines(&output).is_empty());
}

#[test]
fn validate_allows_warnings_by_default() {
    let input = diagram_file(UNREACHABLE);
    let output = run_validate(input.path(), &[]);

    assert_exit_code(&output, 0);

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(&format!("{}:9:", input.path().display())));
    assert!(lines[0].ends_with(": warning: found unreachable diagram component"));
}

#[test]
fn validate_deny_warnings_flag_fails_on_warning() {
    let input = diagram_file(UNREACHABLE);
    let output = run_validate(input.path(), &["--deny-warnings"]);

    assert_exit_code(&output, 1);
    assert_eq!(stdout_lines(&output).len(), 1);
}

#[test]
fn validate_reports_invalid_key_with_position() {
    let input = diagram_file(INVALID_KEY);
    let output = run_validate(input.path(), &[]);

    assert_exit_code(&output, 1);

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(&format!("{}:6:", input.path().display())));
    assert!(lines[0].ends_with(": error: found invalid key \"foo\""));
}

#[test]
fn validate_reports_syntax_error() {
    let input = diagram_file("devices: {}\ndiagrams: [\n");
    let output = run_validate(input.path(), &[]);

    assert_exit_code(&output, 1);

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(": error: "));
}

#[test]
fn validate_verbose_reports_every_violation() {
    let input = diagram_file(
        "\
devices: {}
diagrams:
  - content:
      - type: begin
      - type: end
",
    );

    let quiet = run_validate(input.path(), &[]);
    let verbose = run_validate(input.path(), &["--verbose"]);

    assert_exit_code(&quiet, 1);
    assert_exit_code(&verbose, 1);
    assert_eq!(stdout_lines(&quiet).len(), 1);
    assert!(stdout_lines(&verbose).len() >= 2);
}

#[test]
fn validate_reads_config_file() {
    let input = diagram_file(UNREACHABLE);
    let config = diagram_file("deny_warnings: true\n");
    let config_path = config.path().to_string_lossy().to_string();

    let output = run_validate(input.path(), &["--config", &config_path]);

    assert_exit_code(&output, 1);
}

#[test]
fn validate_returns_fault_for_invalid_config() {
    let input = diagram_file(VALID);
    let config = diagram_file("deny_warnings: [\n");
    let config_path = config.path().to_string_lossy().to_string();

    let output = run_validate(input.path(), &["-c", &config_path]);

    assert_exit_code(&output, 2);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
}

#[test]
fn validate_returns_fault_when_input_is_missing() {
    let missing = repo_root().join("does-not-exist.yaml");
    let output = run_validate(&missing, &[]);

    assert_exit_code(&output, 2);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to validate"));
    assert!(stdout_lines(&output).is_empty());
}
