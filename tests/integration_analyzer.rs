use entryscan::config::{DiscoveryConfig, ParseFailurePolicy};
use entryscan::core::{DiscoveryError, EntrypointDiscovery, PatternConfig};
use entryscan::discover_entrypoints;
use std::fs;
use std::path::PathBuf;

const QWIK_COMPONENT: &str = r#"import { component$ } from "@builder.io/qwik";
export const Hello = component$(() => null);
"#;
const PLAIN_MODULE: &str = "import { format } from 'date-fns';\nexport const f = format;\n";

fn canonical_tempdir() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::TempDir::new().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    (dir, root)
}

#[test]
fn analyzer_returns_only_marker_importers() {
    let (_dir, root) = canonical_tempdir();
    fs::write(root.join("x.ts"), QWIK_COMPONENT).unwrap();
    fs::write(root.join("y.ts"), PLAIN_MODULE).unwrap();

    let found = discover_entrypoints(&root, &DiscoveryConfig::default()).unwrap();
    assert_eq!(found, vec![root.join("x.ts")]);
}

#[test]
fn analyzer_reads_embedded_and_unknown_sources_leniently() {
    let (_dir, root) = canonical_tempdir();
    fs::create_dir_all(root.join("pages")).unwrap();
    fs::write(
        root.join("pages/index.astro"),
        "---\nimport { Hello } from '../components/hello';\n---\n<Hello />\n",
    )
    .unwrap();
    fs::write(
        root.join("pages/island.astro"),
        "---\nimport { component$ } from '@builder.io/qwik';\n---\n<div />\n",
    )
    .unwrap();
    fs::write(
        root.join("intro.mdx"),
        "import { Counter } from '@builder.io/qwik';\n\n# Intro\n\n<Counter />\n",
    )
    .unwrap();
    fs::write(root.join("styles.css"), "body { color: red }").unwrap();
    fs::write(root.join("hello.tsx"), QWIK_COMPONENT).unwrap();

    let config = DiscoveryConfig::default().with_sort(true);
    let report = EntrypointDiscovery::new(&config)
        .unwrap()
        .discover(&root)
        .unwrap();
    assert_eq!(report.scanned, 5);
    assert!(report.skipped.is_empty());
    assert_eq!(
        report.entrypoints,
        vec![
            root.join("hello.tsx"),
            root.join("intro.mdx"),
            root.join("pages/island.astro"),
        ]
    );
}

#[test]
fn excluded_files_are_never_parsed() {
    let (_dir, root) = canonical_tempdir();
    fs::create_dir_all(root.join("legacy")).unwrap();
    fs::write(root.join("ok.ts"), QWIK_COMPONENT).unwrap();
    // Would match the marker, and is also unparseable: exclusion must win before either matters.
    fs::write(
        root.join("legacy/broken.ts"),
        "import { component$ } from '@builder.io/qwik';\nexport const = ;;; {{\n",
    )
    .unwrap();

    let config = DiscoveryConfig::default().with_exclude(PatternConfig::glob("**/legacy/**"));
    let report = EntrypointDiscovery::new(&config)
        .unwrap()
        .discover(&root)
        .unwrap();

    assert_eq!(report.entrypoints, vec![root.join("ok.ts")]);
    assert_eq!(report.filtered_out, 1);
    assert!(report.skipped.is_empty());
}

#[test]
fn include_patterns_restrict_candidates() {
    let (_dir, root) = canonical_tempdir();
    fs::create_dir_all(root.join("qwik")).unwrap();
    fs::create_dir_all(root.join("react")).unwrap();
    fs::write(root.join("qwik/a.tsx"), QWIK_COMPONENT).unwrap();
    fs::write(root.join("react/b.tsx"), QWIK_COMPONENT).unwrap();

    let config = DiscoveryConfig::default()
        .with_include(PatternConfig::glob("qwik/**"))
        .with_base_dir(&root);
    let found = discover_entrypoints(&root, &config).unwrap();
    assert_eq!(found, vec![root.join("qwik/a.tsx")]);
}

#[test]
fn parse_failure_aborts_by_default() {
    let (_dir, root) = canonical_tempdir();
    fs::write(root.join("ok.ts"), QWIK_COMPONENT).unwrap();
    fs::write(root.join("bad.ts"), "export const = ;;; {{\n").unwrap();

    let err = discover_entrypoints(&root, &DiscoveryConfig::default()).unwrap_err();
    match err {
        DiscoveryError::Parse { path, .. } => assert_eq!(path, root.join("bad.ts")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn parse_failure_can_be_skipped() {
    let (_dir, root) = canonical_tempdir();
    fs::write(root.join("ok.ts"), QWIK_COMPONENT).unwrap();
    fs::write(root.join("bad.ts"), "export const = ;;; {{\n").unwrap();

    let config = DiscoveryConfig::default().with_parse_failure_policy(ParseFailurePolicy::Skip);
    let report = EntrypointDiscovery::new(&config)
        .unwrap()
        .discover(&root)
        .unwrap();

    assert_eq!(report.entrypoints, vec![root.join("ok.ts")]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, root.join("bad.ts"));
}

#[test]
fn marker_import_next_to_unsupported_syntax_is_found() {
    let (_dir, root) = canonical_tempdir();
    fs::write(
        root.join("store.ts"),
        "import { component$ } from '@builder.io/qwik';\nclass A { accessor x = 1 }\n",
    )
    .unwrap();

    let found = discover_entrypoints(&root, &DiscoveryConfig::default()).unwrap();
    assert_eq!(found, vec![root.join("store.ts")]);
}

#[test]
fn sorted_output_is_deterministic() {
    let (_dir, root) = canonical_tempdir();
    for name in ["zeta.ts", "alpha.ts", "mid.tsx"] {
        fs::write(root.join(name), QWIK_COMPONENT).unwrap();
    }

    let config = DiscoveryConfig::default().with_sort(true);
    let found = discover_entrypoints(&root, &config).unwrap();
    assert_eq!(
        found,
        vec![root.join("alpha.ts"), root.join("mid.tsx"), root.join("zeta.ts")]
    );
}

#[test]
fn missing_root_surfaces_error() {
    let (_dir, root) = canonical_tempdir();
    let err = discover_entrypoints(&root.join("nope"), &DiscoveryConfig::default()).unwrap_err();
    assert!(err.is_not_found());
}

#[cfg(unix)]
#[test]
fn cycle_and_dangling_link_scenario() {
    use std::os::unix::fs::symlink;

    let (_dir, root) = canonical_tempdir();
    fs::write(root.join("x.ts"), QWIK_COMPONENT).unwrap();
    fs::write(root.join("y.ts"), PLAIN_MODULE).unwrap();
    symlink(&root, root.join("sub")).unwrap();
    symlink(root.join("nonexistent"), root.join("dangling")).unwrap();

    let found = discover_entrypoints(&root, &DiscoveryConfig::default()).unwrap();
    assert_eq!(found, vec![root.join("x.ts")]);
}

#[cfg(unix)]
#[test]
fn file_symlink_is_reported_by_target() {
    use std::os::unix::fs::symlink;

    let (_dir, shared) = canonical_tempdir();
    fs::write(shared.join("widget.tsx"), QWIK_COMPONENT).unwrap();

    let (_dir2, root) = canonical_tempdir();
    symlink(shared.join("widget.tsx"), root.join("widget.tsx")).unwrap();

    let found = discover_entrypoints(&root, &DiscoveryConfig::default()).unwrap();
    assert_eq!(found, vec![shared.join("widget.tsx")]);
}
