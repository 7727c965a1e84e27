//! End-to-end tests for the command-line tools

use pdf_mergician_tools::date::parse_date_version;
use pdf_mergician_tools::pdf::count_pages;
use pdf_mergician_tools::version::VersionRecord;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn version_cmd(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mergician-version"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run mergician-version")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// The version printed after `prefix`, split into date and build
fn version_after<'a>(out: &'a str, prefix: &str) -> (&'a str, u32) {
    let line = out
        .lines()
        .find_map(|line| line.trim().strip_prefix(prefix))
        .unwrap_or_else(|| panic!("no {:?} line in stdout: {}", prefix, out));
    let (date, build) = line.trim().rsplit_once('.').expect("version has a build number");
    parse_date_version(date).expect("version starts with a YYYY.MM.DD date");
    (date, build.parse().expect("build is a number"))
}

fn state_record(root: &Path) -> VersionRecord {
    let path = root.join(".version_state.json");
    let text = fs::read_to_string(&path).expect("Failed to read state file");
    VersionRecord::from_json(&text, &path).expect("State file is valid")
}

fn write_project(root: &Path) {
    fs::write(root.join("pyproject.toml"), "[project]\nname = \"x\"\nversion = \"0.0.0\"\n").unwrap();
    fs::create_dir_all(root.join("merge_pdf")).unwrap();
    fs::write(root.join("merge_pdf").join("__init__.py"), "__version__ = \"0.0.0\"\n").unwrap();
}

#[test]
fn test_missing_subcommand_prints_usage() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = version_cmd(temp_dir.path(), &[]);

    assert!(!output.status.success());
    assert!(stdout(&output).contains("Usage"), "stdout was: {}", stdout(&output));
}

#[test]
fn test_unknown_subcommand_fails_without_state() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = version_cmd(temp_dir.path(), &["publish"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("bump"));
    assert!(!temp_dir.path().join(".version_state.json").exists());
}

#[test]
fn test_show_before_first_bump() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = version_cmd(temp_dir.path(), &["show"]);

    assert!(output.status.success());
    let out = stdout(&output);
    let (_, build) = version_after(&out, "Current version:");
    assert_eq!(build, 1);
    assert!(!out.contains("Build:"));
    assert!(!temp_dir.path().join(".version_state.json").exists());
}

#[test]
fn test_bump_show_reset_cycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path();
    write_project(root);

    let output = version_cmd(root, &["bump"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let out = stdout(&output);
    let (first_date, build) = version_after(&out, "✓ Version bumped to");
    assert_eq!(build, 1);
    assert_eq!(state_record(root), VersionRecord::new(first_date, 1));
    assert!(out.contains("Updated pyproject.toml"));
    assert!(out.contains("__init__.py"));

    let output = version_cmd(root, &["bump"]);
    let out = stdout(&output);
    let (date, build) = version_after(&out, "✓ Version bumped to");
    // A bump that lands after midnight starts the new day at 1
    let expected_build = if date == first_date { 2 } else { 1 };
    assert_eq!(build, expected_build);
    assert_eq!(state_record(root), VersionRecord::new(date, build));

    let init = fs::read_to_string(root.join("merge_pdf").join("__init__.py")).unwrap();
    assert_eq!(init, format!("__version__ = \"{}.{}\"\n", date, build));

    let output = version_cmd(root, &["show"]);
    let out = stdout(&output);
    assert_eq!(version_after(&out, "Current version:"), (date, build));
    assert!(out.contains(&format!("  Date: {}", date)));
    assert!(out.contains(&format!("  Build: {}", build)));

    let output = version_cmd(root, &["reset"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("✓ Version state reset"));
    assert!(!root.join(".version_state.json").exists());

    // Resetting twice is fine
    assert!(version_cmd(root, &["reset"]).status.success());
}

#[test]
fn test_bump_with_missing_target_exits_nonzero() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path();
    write_project(root);
    fs::remove_file(root.join("pyproject.toml")).unwrap();

    let output = version_cmd(root, &["bump"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("pyproject.toml"));

    // The version was issued and the other target still got it
    let record = state_record(root);
    assert_eq!(record.build, 1);
    let init = fs::read_to_string(root.join("merge_pdf").join("__init__.py")).unwrap();
    assert_eq!(init, format!("__version__ = \"{}\"\n", record.version().unwrap()));
}

#[test]
fn test_bump_with_invalid_pattern_issues_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path();
    write_project(root);
    fs::write(
        root.join("version.toml"),
        "[[targets]]\nfile = \"pyproject.toml\"\npattern = '(['\nreplacement = '{version}'\n",
    )
    .unwrap();

    let output = version_cmd(root, &["bump"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid substitution pattern"));
    assert!(!root.join(".version_state.json").exists());

    let pyproject = fs::read_to_string(root.join("pyproject.toml")).unwrap();
    assert!(pyproject.contains("version = \"0.0.0\""));
}

#[test]
fn test_corrupt_state_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join(".version_state.json"), "garbage").unwrap();

    let output = version_cmd(temp_dir.path(), &["show"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Corrupt version state"));
}

#[test]
fn test_fixtures_binary_blank() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let dir = temp_dir.path().join("fixtures");

    let output = Command::new(env!("CARGO_BIN_EXE_mergician-fixtures"))
        .arg("--dir")
        .arg(&dir)
        .arg("--blank")
        .output()
        .expect("Failed to run mergician-fixtures");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("✓ Created document_a.pdf (10 blank pages)"), "stdout was: {}", out);
    assert!(out.contains("✓ Created single_page.pdf (1 blank page)"));
    assert_eq!(count_pages(&dir.join("document_c.pdf")).unwrap(), 5);
}
