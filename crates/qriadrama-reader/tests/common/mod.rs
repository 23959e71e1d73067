//! Shared test helpers for reader integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Writes `contents` to `relative` under `root`, creating parent directories.
pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A data directory with two scripts, "Demo" and "Night".
pub fn library() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Demo/qd.json",
        r#"{"title": "Demo", "index": "main.json", "cover": "cover.png",
             "description": "Two friends say goodbye",
             "roles": {"A": "color: #FF0000"}}"#,
    );
    write(dir.path(), "Demo/main.json", r#"[{"A": "hi"}, {"B": "bye"}]"#);
    write(
        dir.path(),
        "Night/qd.json",
        r#"{"title": "Night", "index": "1.json"}"#,
    );
    write(dir.path(), "Night/1.json", r#"[{"": "The lamps go out."}]"#);
    dir
}
