//! End-to-end runs through the command-line front end

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use csp_cli::audit::{AuditLog, AuditRecord};
use csp_cli::{Args, AuditArgs, audit, run};

fn write_input(dir: &Path, name: &str, html: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, html).unwrap();
    path
}

fn args(input: &Path, out: &Path, extra: &[&str]) -> Args {
    let mut argv = vec![
        "run".to_string(),
        "--out-dir".to_string(),
        out.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    argv.push(input.display().to_string());
    Args::parse_from(argv)
}

fn archive_entries(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

// ============================================================================
// SUCCESSFUL RUNS
// ============================================================================

#[test]
fn test_run_writes_archive_and_audit() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(
        tmp.path(),
        "login.html",
        r#"<form onsubmit="check()"><input style="width:10px"></form>"#,
    );

    let outcome = run(&args(&input, tmp.path(), &[])).unwrap();

    assert_eq!(outcome.output_path, tmp.path().join("login_refactored.zip"));
    assert_eq!(
        archive_entries(&outcome.output_path),
        vec!["login.css", "login.js", "login_clean.html"]
    );

    let mut archive = zip::ZipArchive::new(fs::File::open(&outcome.output_path).unwrap()).unwrap();
    let mut html = String::new();
    archive
        .by_name("login_clean.html")
        .unwrap()
        .read_to_string(&mut html)
        .unwrap();
    assert_eq!(html, outcome.result.html());
    assert!(html.contains(r#"href="login.css""#));
    assert!(html.contains(r#"src="login.js""#));

    let audit_path = outcome.audit_path.unwrap();
    assert!(audit_path.starts_with(tmp.path().join("audit")));
    let record = AuditRecord::read_json(&audit_path).unwrap();
    assert!(record.is_success());
    assert_eq!(record.original_filename, "login.html");
    assert_eq!(record.change_log_entries(), outcome.result.change_log());
    assert_eq!(record.refactored_css.as_deref(), Some(outcome.result.css()));
}

#[test]
fn test_clean_input_archive_has_only_html() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "plain.htm", "<p>nothing inline</p>");

    let outcome = run(&args(&input, tmp.path(), &["--no-audit"])).unwrap();

    assert!(outcome.audit_path.is_none());
    assert!(!tmp.path().join("audit").exists());
    assert_eq!(archive_entries(&outcome.output_path), vec!["plain_clean.html"]);
}

#[test]
fn test_unpacked_output() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "plain.htm", "<p>nothing inline</p>");

    let outcome = run(&args(&input, tmp.path(), &["--unpacked", "--no-audit"])).unwrap();

    assert_eq!(outcome.output_path, tmp.path().join("plain_refactored"));
    let names: Vec<_> = fs::read_dir(&outcome.output_path)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["plain_clean.html"]);
}

#[test]
fn test_compact_flag() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "c.html", "<div><p>a</p></div>");

    let outcome = run(&args(&input, tmp.path(), &["--compact", "--no-audit"])).unwrap();
    assert_eq!(
        outcome.result.html(),
        "<html><head></head><body><div><p>a</p></div></body></html>"
    );
}

#[test]
fn test_out_dir_created() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "n.html", "<p style=\"a:b\">x</p>");
    let out = tmp.path().join("nested").join("out");

    let outcome = run(&args(&input, &out, &[])).unwrap();
    assert!(outcome.output_path.starts_with(&out));
    assert!(outcome.audit_path.unwrap().starts_with(out.join("audit")));
}

// ============================================================================
// AUDIT HISTORY
// ============================================================================

#[test]
fn test_repeated_runs_keep_every_record() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "page.html", "<p style=\"a:b\">x</p>");
    let audit_dir = tmp.path().join("history");
    let dir_arg = audit_dir.display().to_string();

    let first = run(&args(&input, tmp.path(), &["--audit-dir", dir_arg.as_str()])).unwrap();
    let second = run(&args(&input, tmp.path(), &["--audit-dir", dir_arg.as_str()])).unwrap();
    assert_ne!(first.audit_path, second.audit_path);

    let records = audit(&AuditArgs::parse_from(["audit", "--audit-dir", dir_arg.as_str()])).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].upload_timestamp >= records[1].upload_timestamp);
    assert!(records.iter().all(|r| r.original_filename == "page.html"));

    let newest = &records[0].id;
    let shown = audit(&AuditArgs::parse_from([
        "audit",
        "--audit-dir",
        dir_arg.as_str(),
        "--id",
        newest.as_str(),
    ]))
    .unwrap();
    assert_eq!(shown, vec![records[0].clone()]);
}

#[test]
fn test_unknown_audit_id() {
    let tmp = tempfile::tempdir().unwrap();
    let dir_arg = tmp.path().display().to_string();
    assert!(AuditLog::new(tmp.path()).list().unwrap().is_empty());

    let err = audit(&AuditArgs::parse_from(["audit", "--audit-dir", dir_arg.as_str(), "--id", "nope"]))
        .unwrap_err();
    assert!(err.to_string().starts_with("No refactor run with id nope"), "{}", err);
}

// ============================================================================
// REJECTED INPUT
// ============================================================================

#[test]
fn test_rejects_non_html_input() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "notes.txt", "<p>x</p>");

    let err = run(&args(&input, tmp.path(), &[])).unwrap_err();
    assert_eq!(err.to_string(), "Please upload a valid .html file.");
    assert!(!tmp.path().join("notes_refactored.zip").exists());
    assert!(!tmp.path().join("audit").exists());
}

#[test]
fn test_rejects_empty_input() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "empty.html", "");

    let err = run(&args(&input, tmp.path(), &[])).unwrap_err();
    assert_eq!(err.to_string(), "Please select a file to upload.");
}

#[test]
fn test_missing_input_file() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("absent.html");
    assert!(run(&args(&missing, tmp.path(), &[])).is_err());
}
