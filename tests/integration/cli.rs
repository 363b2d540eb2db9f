//! The `chronoport` binary: in-place writes, check mode, reports and configuration.

mod common;

use std::fs;
use std::path::Path;

use common::chronoport;

const LEGACY: &str =
    "import org.joda.time.Duration;\n\nclass A {\n    Duration f() {\n        return Duration.standardDays(1L);\n    }\n}\n";

const MIGRATED: &str =
    "import java.time.Duration;\n\nclass A {\n    Duration f() {\n        return Duration.ofDays(1L);\n    }\n}\n";

const UNMAPPED: &str =
    "import org.joda.time.DateTime;\n\nclass B {\n    int f(DateTime dt) {\n        return dt.getMillisOfDay();\n    }\n}\n";

/// A throwaway repository root so config discovery stops here.
fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn write_rewrites_files_in_place() {
    let dir = project(&[("src/A.java", LEGACY), ("src/Plain.java", "class Plain {\n}\n")]);
    let output = chronoport()
        .args(["migrate", "src", "--write", "--jobs", "2"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(read(dir.path(), "src/A.java"), MIGRATED);
    assert_eq!(read(dir.path(), "src/Plain.java"), "class Plain {\n}\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2 file(s), 1 changed, 0 event(s), 0 error(s)"), "{stderr}");
}

#[test]
fn check_fails_without_touching_files() {
    let dir = project(&[("A.java", LEGACY)]);
    let output = chronoport().args(["migrate", "A.java", "--check"]).current_dir(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(read(dir.path(), "A.java"), LEGACY);

    fs::write(dir.path().join("A.java"), MIGRATED).unwrap();
    let output = chronoport().args(["migrate", "A.java", "--check"]).current_dir(dir.path()).output().unwrap();
    assert!(output.status.success());
}

#[test]
fn dry_run_prints_migrated_source() {
    let dir = project(&[("A.java", LEGACY)]);
    let output = chronoport().args(["migrate", "A.java"]).current_dir(dir.path()).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("return Duration.ofDays(1L);"), "{stdout}");
    assert_eq!(read(dir.path(), "A.java"), LEGACY);
}

#[test]
fn json_report_lists_events() {
    let dir = project(&[("A.java", LEGACY), ("B.java", UNMAPPED)]);
    let output = chronoport()
        .args(["migrate", ".", "--write", "--report", "json"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["changed"], 2);
    assert_eq!(report["events"], 1);
    let files = report["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    let event = &files[1]["events"][0];
    assert_eq!(event["snippet"], "dt.getMillisOfDay()");
    assert_eq!(event["severity"], "informational");
}

#[test]
fn config_can_fail_on_unmapped_usages() {
    let dir = project(&[
        ("chronoport.toml", "[report]\nfail_on_unmapped = true\n"),
        ("B.java", UNMAPPED),
    ]);
    let output = chronoport().args(["migrate", "B.java", "--write"]).current_dir(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn invalid_config_is_reported() {
    let dir = project(&[("chronoport.toml", "[migrate]\nfamilies = [\"nope\"]\n"), ("A.java", LEGACY)]);
    let output = chronoport().args(["migrate", "A.java"]).current_dir(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown family `nope`"), "{stderr}");
}

#[test]
fn syntax_errors_fail_the_run() {
    let dir = project(&[("Bad.java", "class Bad {")]);
    let output = chronoport().args(["migrate", "Bad.java"]).current_dir(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn catalog_lists_families() {
    let output = chronoport().args(["catalog", "--family", "period"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("family period"), "{stdout}");
    assert!(stdout.contains("(int) ChronoUnit.DAYS.between(#{any()}, #{any()})"), "{stdout}");
}
