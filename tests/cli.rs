use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

struct RunOutput {
    stdout: String,
    stderr: String,
    code: Option<i32>,
}

/// Helper to run go-include inside `dir` and capture output
fn run_go_include(dir: &Path, args: &[&str]) -> Result<RunOutput> {
    let exe_path = PathBuf::from(env!("CARGO_BIN_EXE_go-include"));
    let output = Command::new(exe_path)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()?;

    Ok(RunOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        code: output.status.code(),
    })
}

fn generated(dir: &Path) -> Result<String> {
    Ok(fs::read_to_string(dir.join("generated_include.go"))?)
}

#[test]
fn test_raw_mode_trims_and_derives_name() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("foo.txt"), "\n\nhello\nworld\n\n")?;

    let run = run_go_include(temp_dir.path(), &["--file", "foo.txt"])?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    let output = generated(temp_dir.path())?;
    assert!(output.starts_with("// Code generated by go-include. DO NOT EDIT.\n"));
    assert!(output.contains("\npackage main\n"));
    assert!(output.ends_with("const foo = `hello\nworld`\n"));

    Ok(())
}

#[test]
fn test_raw_mode_without_trim_keeps_bytes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("foo.txt"), "\nhello\n")?;

    let run = run_go_include(temp_dir.path(), &["-file", "foo.txt", "-trim=false"])?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(generated(temp_dir.path())?.ends_with("const foo = `\nhello\n`\n"));

    Ok(())
}

#[test]
fn test_name_override_and_output_path() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::create_dir(temp_dir.path().join("assets"))?;
    fs::write(temp_dir.path().join("assets/doc.go"), "// Package assets.\npackage assets\n")?;
    fs::write(temp_dir.path().join("page.html"), "<p>hi</p>\n")?;

    let run = run_go_include(
        temp_dir.path(),
        &["--path", "page.html", "--key", "bar", "--out", "assets/page_gen.go"],
    )?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    let output = fs::read_to_string(temp_dir.path().join("assets/page_gen.go"))?;
    assert!(output.contains("\npackage assets\n"));
    assert!(output.contains("const bar = `<p>hi</p>`\n"));
    assert!(!output.contains("const page"));

    Ok(())
}

#[test]
fn test_json_mode_emits_one_declaration_per_key() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("data.json"), r#"{"C":true,"A":"x","B":2.5}"#)?;

    let run = run_go_include(temp_dir.path(), &["--file", "data.json", "--parse", "json"])?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    let output = generated(temp_dir.path())?;
    let declarations: Vec<&str> = output.lines().filter(|l| l.starts_with("const ")).collect();
    assert_eq!(
        declarations,
        ["const A = `x`", "const B = 2.500000", "const C = true"]
    );

    Ok(())
}

#[test]
fn test_toml_mode() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("limits.toml"),
        "MaxRetries = 3\nRatio = 0.25\nGreeting = \"hi `there`\"\n",
    )?;

    let run = run_go_include(temp_dir.path(), &["--file", "limits.toml", "--type", "toml"])?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    let output = generated(temp_dir.path())?;
    assert!(output.contains("const Greeting = `hi ` + \"`\" + `there` + \"`\" + ``\n"));
    assert!(output.contains("const MaxRetries = 3\n"));
    assert!(output.contains("const Ratio = 0.250000\n"));

    Ok(())
}

#[test]
fn test_json_nested_value_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("data.json"), r#"{"A":{"nested":1}}"#)?;

    let run = run_go_include(temp_dir.path(), &["--file", "data.json", "--parse", "json"])?;

    assert_eq!(run.code, Some(66));
    assert!(run.stderr.contains("unsupported value for key \"A\""));
    assert_eq!(run.stderr.lines().count(), 1, "stderr: {}", run.stderr);
    assert!(!temp_dir.path().join("generated_include.go").exists());

    Ok(())
}

#[test]
fn test_malformed_json_is_parse_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("data.json"), "{\"A\": ")?;

    let run = run_go_include(temp_dir.path(), &["--file", "data.json", "--parse", "json"])?;

    assert_eq!(run.code, Some(65));
    assert!(run.stderr.contains("could not parse json"));

    Ok(())
}

#[test]
fn test_unsupported_mode_touches_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let run = run_go_include(temp_dir.path(), &["--file", "missing.txt", "--parse", "yaml"])?;

    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("yaml"));
    assert!(!temp_dir.path().join("generated_include.go").exists());

    Ok(())
}

#[test]
fn test_missing_file_flag_prints_usage() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let run = run_go_include(temp_dir.path(), &[])?;

    assert_eq!(run.code, Some(64));
    assert!(run.stderr.contains("--file is required"));
    assert!(run.stderr.contains("Usage:"));

    Ok(())
}

#[test]
fn test_unreadable_input_is_io_error() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let run = run_go_include(temp_dir.path(), &["--file", "nope.txt"])?;

    assert_eq!(run.code, Some(74));
    assert!(run.stderr.contains("could not read file nope.txt"));
    assert!(!temp_dir.path().join("generated_include.go").exists());

    Ok(())
}

#[test]
fn test_conflicting_packages_are_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("a.go"), "package one\n")?;
    fs::write(temp_dir.path().join("b.go"), "package two\n")?;
    fs::write(temp_dir.path().join("foo.txt"), "x")?;

    let run = run_go_include(temp_dir.path(), &["--file", "foo.txt"])?;
    assert_eq!(run.code, Some(70));

    // An explicit package skips resolution entirely
    let run = run_go_include(temp_dir.path(), &["--file", "foo.txt", "--package", "one"])?;
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(generated(temp_dir.path())?.contains("\npackage one\n"));

    Ok(())
}

#[test]
fn test_regeneration_is_byte_identical() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("a.go"), "package assets\n")?;
    fs::write(
        temp_dir.path().join("data.json"),
        r#"{"Zeta":"z","Alpha":1,"Mid":false,"Beta":"b"}"#,
    )?;
    let args = ["--file", "data.json", "--parse", "json"];

    let first = run_go_include(temp_dir.path(), &args)?;
    assert_eq!(first.code, Some(0), "stderr: {}", first.stderr);
    let first_output = generated(temp_dir.path())?;

    let second = run_go_include(temp_dir.path(), &args)?;
    assert_eq!(second.code, Some(0), "stderr: {}", second.stderr);
    assert_eq!(first_output, generated(temp_dir.path())?);

    Ok(())
}

#[test]
fn test_no_banner() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("foo.txt"), "x")?;

    let run = run_go_include(temp_dir.path(), &["--file", "foo.txt", "--no-banner"])?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert_eq!(generated(temp_dir.path())?, "package main\n\nconst foo = `x`\n");

    Ok(())
}

#[test]
fn test_carriage_returns_use_interpreted_literal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("dos.txt"), "a\r\nb\r\n")?;

    let run = run_go_include(temp_dir.path(), &["--file", "dos.txt"])?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(generated(temp_dir.path())?.ends_with("const dos = \"a\\r\\nb\\r\"\n"));

    Ok(())
}

#[test]
fn test_help_lists_examples() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let run = run_go_include(temp_dir.path(), &["--help"])?;

    assert_eq!(run.code, Some(0));
    assert!(run.stdout.contains("--parse"));
    assert!(run.stdout.contains("go:generate"));

    Ok(())
}

#[test]
fn test_uncreatable_output_is_io_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("foo.txt"), "x")?;
    fs::create_dir(temp_dir.path().join("taken"))?;

    let run = run_go_include(
        temp_dir.path(),
        &["--file", "foo.txt", "--package", "main", "--out", "taken"],
    )?;

    assert_eq!(run.code, Some(74));
    assert!(run.stderr.contains("could not create file taken"));

    Ok(())
}
