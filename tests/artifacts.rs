use entryscan::build::{move_artifacts, temp_dir_name};
use std::fs;

#[test]
fn move_artifacts_relocates_and_overwrites() {
    let dir = tempfile::TempDir::new().unwrap();
    let staging = dir.path().join(temp_dir_name());
    let dest = dir.path().join("dist/client");

    fs::create_dir_all(staging.join("build")).unwrap();
    fs::write(staging.join("q-manifest.json"), "{\"new\":true}").unwrap();
    fs::write(staging.join("build/q-abc.js"), "export{}").unwrap();

    fs::create_dir_all(dest.join("build")).unwrap();
    fs::write(dest.join("q-manifest.json"), "{\"old\":true}").unwrap();
    fs::write(dest.join("build/stale.js"), "stale").unwrap();
    fs::write(dest.join("index.html"), "<html></html>").unwrap();

    let moved = move_artifacts(&staging, &dest).unwrap();
    assert_eq!(moved, 2);

    assert_eq!(
        fs::read_to_string(dest.join("q-manifest.json")).unwrap(),
        "{\"new\":true}"
    );
    assert!(dest.join("build/q-abc.js").exists());
    // directories are replaced as a whole
    assert!(!dest.join("build/stale.js").exists());
    // untouched destination entries survive
    assert!(dest.join("index.html").exists());
    // source is drained
    assert_eq!(fs::read_dir(&staging).unwrap().count(), 0);
}

#[test]
fn move_artifacts_creates_destination() {
    let dir = tempfile::TempDir::new().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.js"), "a").unwrap();

    let dest = dir.path().join("nested/out");
    assert_eq!(move_artifacts(&src, &dest).unwrap(), 1);
    assert_eq!(fs::read_to_string(dest.join("a.js")).unwrap(), "a");
}

#[test]
fn move_artifacts_fails_on_missing_source() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = move_artifacts(&dir.path().join("missing"), &dir.path().join("out")).unwrap_err();
    assert!(err.is_not_found());
}
