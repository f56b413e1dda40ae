//! End-to-end tests that launch the built `html2pptx` binary.

use deck_pptx::PptxInspector;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn html2pptx(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_html2pptx"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch html2pptx")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_slide(dir: &Path, name: &str, title: &str) {
    fs::write(
        dir.join(name),
        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head>\
             <body style=\"width: 720pt; height: 405pt\"><h1>{}</h1><p>Body</p></body></html>",
            title
        ),
    )
    .unwrap();
}

fn write_job(path: &Path, job: serde_json::Value) {
    fs::write(path, serde_json::to_string_pretty(&job).unwrap()).unwrap();
}

fn slide_titles(path: &Path) -> Vec<String> {
    PptxInspector::new()
        .inspect_file(path)
        .unwrap()
        .slides
        .into_iter()
        .map(|s| s.texts[0].clone())
        .collect()
}

#[test]
fn test_no_arguments_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = html2pptx(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Usage: html2pptx <config.json>"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_two_slides_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_slide(dir.path(), "a.html", "Slide A");
    write_slide(dir.path(), "b.html", "Slide B");
    write_job(
        &dir.path().join("config.json"),
        json!({"html_files": ["a.html", "b.html"], "output_file": "out.pptx"}),
    );

    let output = html2pptx(dir.path(), &["config.json"]);
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(out.contains("Converting 2 HTML slides to PowerPoint..."));
    assert!(out.contains("  Processing slide 1/2: a.html"));
    assert!(out.contains("  Processing slide 2/2: b.html"));
    assert!(out.contains("Saving presentation to: out.pptx"));
    assert_eq!(out.lines().last(), Some("  Total slides: 2"));

    assert_eq!(
        slide_titles(&dir.path().join("out.pptx")),
        vec!["Slide A", "Slide B"]
    );
}

#[test]
fn test_relative_paths_follow_launch_directory() {
    let launch = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    write_slide(launch.path(), "only.html", "Launch dir");

    // The job file lives somewhere else; its relative paths still mean
    // "relative to where the tool was started".
    let job_path = elsewhere.path().join("job.json");
    write_job(
        &job_path,
        json!({"html_files": ["only.html"], "output_file": "deck.pptx"}),
    );

    let output = html2pptx(launch.path(), &[job_path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(launch.path().join("deck.pptx").exists());
    assert!(!elsewhere.path().join("deck.pptx").exists());
}

#[test]
fn test_missing_html_files() {
    let dir = tempfile::tempdir().unwrap();
    write_job(
        &dir.path().join("config.json"),
        json!({"html_files": [], "output_file": "out.pptx"}),
    );

    let output = html2pptx(dir.path(), &["config.json"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output).trim(),
        "Error: html_files must be a non-empty array"
    );
    assert!(!stdout(&output).contains("Processing"));
    assert!(!dir.path().join("out.pptx").exists());
}

#[test]
fn test_missing_output_file() {
    let dir = tempfile::tempdir().unwrap();
    write_slide(dir.path(), "a.html", "A");
    write_job(
        &dir.path().join("config.json"),
        json!({"html_files": ["a.html"]}),
    );

    let output = html2pptx(dir.path(), &["config.json"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output).trim(), "Error: output_file is required");
    assert!(!stdout(&output).contains("Processing"));
}

#[test]
fn test_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.json"), "{ not json").unwrap();

    let output = html2pptx(dir.path(), &["config.json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Error: "));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = html2pptx(dir.path(), &["nope.json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("nope.json"));
}

#[test]
fn test_failing_slide_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    write_slide(dir.path(), "a.html", "A");
    fs::write(dir.path().join("b.html"), "<html><head></head></html>").unwrap();
    write_slide(dir.path(), "c.html", "C");
    write_job(
        &dir.path().join("config.json"),
        json!({"html_files": ["a.html", "b.html", "c.html"], "output_file": "out.pptx"}),
    );

    let output = html2pptx(dir.path(), &["config.json"]);
    let out = stdout(&output);
    let err = stderr(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("Processing slide 1/3: a.html"));
    assert!(out.contains("Processing slide 2/3: b.html"));
    assert!(!out.contains("Processing slide 3/3"));
    assert!(!out.contains("Saving"));
    assert!(err.lines().last().unwrap().starts_with("Error: "));
    assert!(err.lines().last().unwrap().contains("b.html"));
    assert!(!dir.path().join("out.pptx").exists());
}

#[test]
fn test_missing_input_names_file() {
    let dir = tempfile::tempdir().unwrap();
    write_job(
        &dir.path().join("config.json"),
        json!({"html_files": ["ghost.html"], "output_file": "out.pptx"}),
    );

    let output = html2pptx(dir.path(), &["config.json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("ghost.html"));
    assert!(!dir.path().join("out.pptx").exists());
}

#[test]
fn test_unwritable_output_is_error() {
    let dir = tempfile::tempdir().unwrap();
    write_slide(dir.path(), "a.html", "A");
    write_job(
        &dir.path().join("config.json"),
        json!({"html_files": ["a.html"], "output_file": "missing/dir/out.pptx"}),
    );

    let output = html2pptx(dir.path(), &["config.json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Saving presentation to: out.pptx"));
    assert!(!stdout(&output).contains("Total slides"));
    assert!(stderr(&output).contains("Failed to write"));
}

#[test]
fn test_placeholders_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("chart.html"),
        r#"<body><h2>Sales</h2><div class="placeholder" id="chart"></div>
           <div class="placeholder" id="table"></div></body>"#,
    )
    .unwrap();
    write_job(
        &dir.path().join("config.json"),
        json!({"html_files": ["chart.html"], "output_file": "out.pptx", "config": {"font_face": "Georgia"}}),
    );

    let output = html2pptx(dir.path(), &["config.json"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("    Found 2 placeholder(s)"));
}

#[test]
fn test_verify_and_extra_arguments() {
    let dir = tempfile::tempdir().unwrap();
    write_slide(dir.path(), "a.html", "A");
    write_job(
        &dir.path().join("config.json"),
        json!({"html_files": ["a.html"], "output_file": "out.pptx"}),
    );

    let output = html2pptx(dir.path(), &["--verify", "config.json", "ignored-extra"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).lines().last(), Some("  Total slides: 1"));
}

#[test]
fn test_extreme_lengths_never_crash() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("tall.html"),
        r#"<body><p style="height: 99999999999999999999999px">x</p><p>y</p></body>"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("wide.html"),
        r#"<body style="width: -99999999999999999999999px"><p>z</p></body>"#,
    )
    .unwrap();
    write_job(
        &dir.path().join("tall.json"),
        json!({"html_files": ["tall.html"], "output_file": "tall.pptx"}),
    );
    write_job(
        &dir.path().join("wide.json"),
        json!({"html_files": ["wide.html"], "output_file": "wide.pptx"}),
    );

    let output = html2pptx(dir.path(), &["tall.json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(dir.path().join("tall.pptx").exists());

    let output = html2pptx(dir.path(), &["wide.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: Failed to convert"));
    assert!(stderr(&output).contains("Layout mismatch"));
    assert!(!dir.path().join("wide.pptx").exists());
}

#[test]
fn test_array_job_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    write_slide(dir.path(), "a.html", "A");
    fs::write(
        dir.path().join("config.json"),
        r#"[["a.html"], "out.pptx", {}]"#,
    )
    .unwrap();

    let output = html2pptx(dir.path(), &["config.json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Error: "));
    assert!(stdout(&output).is_empty());
    assert!(!dir.path().join("out.pptx").exists());
}
