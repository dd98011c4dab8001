// Integration tests for the tour planner scaffold.

use std::path::{Path, PathBuf};

use tour_planner::config::ensure_config_files;

fn scratch_dir(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!(
        "tour-planner-scaffold-{tag}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Verify that defaults/planner.toml is valid TOML with the required keys.
#[test]
fn default_planner_toml_is_valid() {
    let content = std::fs::read_to_string("defaults/planner.toml")
        .expect("defaults/planner.toml should exist");
    let parsed: toml::Value = toml::from_str(&content).expect("defaults/planner.toml is not valid TOML");

    let service = parsed.get("service").expect("missing [service] section");
    assert!(service.get("base_url").and_then(|v| v.as_str()).is_some());
    let plan_path = service
        .get("plan_path")
        .and_then(|v| v.as_str())
        .expect("missing service.plan_path");
    assert!(plan_path.starts_with('/'));
}

/// Verify that all expected directories exist.
#[test]
fn directory_structure_exists() {
    let expected_dirs = [
        "src",
        "src/api",
        "src/plan",
        "src/trip",
        "src/tui",
        "src/tui/widgets",
        "defaults",
        "tests",
    ];

    for dir in &expected_dirs {
        assert!(Path::new(dir).is_dir(), "Expected directory '{}' does not exist", dir);
    }
}

/// Verify that a fresh checkout gets its config seeded from defaults/.
#[test]
fn ensure_config_files_seeds_from_defaults() {
    let base = scratch_dir("seed");
    std::fs::create_dir_all(base.join("defaults")).unwrap();
    std::fs::copy("defaults/planner.toml", base.join("defaults/planner.toml")).unwrap();

    let copied = ensure_config_files(&base).unwrap();
    assert_eq!(copied, vec![base.join("config").join("planner.toml")]);
    assert!(base.join("config/planner.toml").is_file());

    // Second run leaves the user's copy alone.
    std::fs::write(base.join("config/planner.toml"), "# edited\n").unwrap();
    let copied = ensure_config_files(&base).unwrap();
    assert!(copied.is_empty());
    assert_eq!(
        std::fs::read_to_string(base.join("config/planner.toml")).unwrap(),
        "# edited\n"
    );

    let _ = std::fs::remove_dir_all(&base);
}

/// Without defaults/ or config/ there is nothing to start from.
#[test]
fn ensure_config_files_fails_on_empty_dir() {
    let base = scratch_dir("empty");
    assert!(ensure_config_files(&base).is_err());
    let _ = std::fs::remove_dir_all(&base);
}
