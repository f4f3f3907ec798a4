//! CLI integration tests for modgraph.
//!
//! Each test lays out a small source tree of `Module.toml` files in a
//! temporary directory and runs the binary against it.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the modgraph binary command, isolated from the user's config.
fn modgraph(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("modgraph").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("MODGRAPH_ROOT");
    cmd
}

fn write_module(root: &Path, dir: &str, contents: &str) {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Module.toml"), contents).unwrap();
}

/// Game pub[Engine, Slate] priv[Online]; Engine pub[Core];
/// Slate priv[SlateCore]; SlateCore pub[Core]; Online pub[Json].
fn engine_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write_module(
        root,
        "Game",
        r#"
[module]
name = "Game"

[dependencies]
public = ["Engine", "Slate"]
private = ["Online"]

[include]
public = ["Game/Public"]

[conditional]
Analytics = "Analytics"

[overlay.Win64]
private-dependencies = ["D3D12"]
"#,
    );
    write_module(
        root,
        "Runtime/Engine",
        r#"
[module]
name = "Engine"

[dependencies]
public = ["Core"]

[include]
public = ["Engine/Public"]
"#,
    );
    write_module(
        root,
        "Runtime/Slate",
        r#"
[module]
name = "Slate"

[dependencies]
private = ["SlateCore"]

[include]
public = ["Slate/Public"]
"#,
    );
    write_module(
        root,
        "Runtime/SlateCore",
        r#"
[module]
name = "SlateCore"

[dependencies]
public = ["Core"]
"#,
    );
    write_module(
        root,
        "Online",
        r#"
[module]
name = "Online"

[dependencies]
public = ["Json"]
"#,
    );
    write_module(
        root,
        "Runtime/Json",
        r#"
[module]
name = "Json"
"#,
    );
    write_module(
        root,
        "Runtime/Core",
        r#"
[module]
name = "Core"
pch = "NoPCHs"

[include]
public = ["Core/Public"]
"#,
    );
    write_module(
        root,
        "Plugins/Analytics",
        r#"
[module]
name = "Analytics"
"#,
    );
    write_module(
        root,
        "Platform/D3D12",
        r#"
[module]
name = "D3D12"
"#,
    );

    tmp
}

// ============================================================================
// modgraph check
// ============================================================================

#[test]
fn test_check_counts_modules() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 9 modules"));
}

#[test]
fn test_check_with_root_flag() {
    let tmp = engine_tree();
    let elsewhere = TempDir::new().unwrap();

    modgraph(elsewhere.path())
        .args(["check", "--root"])
        .arg(tmp.path())
        .current_dir(elsewhere.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 9 modules"));
}

#[test]
fn test_check_empty_tree_fails() {
    let tmp = TempDir::new().unwrap();

    modgraph(tmp.path())
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Module.toml"));
}

#[test]
fn test_check_rejects_cycle() {
    let tmp = TempDir::new().unwrap();
    write_module(
        tmp.path(),
        "A",
        "[module]\nname = \"A\"\n\n[dependencies]\npublic = [\"B\"]\n",
    );
    write_module(
        tmp.path(),
        "B",
        "[module]\nname = \"B\"\n\n[dependencies]\nprivate = [\"A\"]\n",
    );

    modgraph(tmp.path())
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cyclic dependency: A -> B -> A"));
}

#[test]
fn test_piped_stderr_is_plain() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["plan", "Game", "--features", "Telemetry"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: feature flag `Telemetry`"))
        .stderr(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_check_rejects_duplicate_module() {
    let tmp = TempDir::new().unwrap();
    write_module(tmp.path(), "One", "[module]\nname = \"Core\"\n");
    write_module(tmp.path(), "Two", "[module]\nname = \"Core\"\n");

    modgraph(tmp.path())
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Core"))
        .stderr(predicate::str::contains("declared in both"));
}

#[test]
fn test_check_rejects_conflicting_visibility() {
    let tmp = TempDir::new().unwrap();
    write_module(
        tmp.path(),
        "A",
        "[module]\nname = \"A\"\n\n[dependencies]\npublic = [\"B\"]\nprivate = [\"B\"]\n",
    );
    write_module(tmp.path(), "B", "[module]\nname = \"B\"\n");

    modgraph(tmp.path())
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("both a public and a private"));
}

// ============================================================================
// modgraph resolve
// ============================================================================

#[test]
fn test_resolve_marks_visibility() {
    let tmp = engine_tree();

    let output = modgraph(tmp.path())
        .args(["resolve", "Game"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Game (7 modules)"));

    let line = |name: &str| {
        stdout
            .lines()
            .find(|l| l.trim_start().starts_with(&format!("{} ", name)))
            .unwrap_or_else(|| panic!("no line for {}", name))
            .to_string()
    };
    assert!(line("Engine").contains("public"));
    assert!(line("Core").contains("public"));
    assert!(line("Online").contains("private-only"));
    assert!(line("Json").contains("private-only"));
    assert!(line("SlateCore").contains("private-only"));
    assert!(!stdout.contains("Analytics"));
}

#[test]
fn test_resolve_unknown_root() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["resolve", "Nope"])
        .current_dir(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("`Nope` is not registered"));
}

#[test]
fn test_resolve_unknown_dependency_names_referrer() {
    let tmp = TempDir::new().unwrap();
    write_module(
        tmp.path(),
        "A",
        "[module]\nname = \"A\"\n\n[dependencies]\npublic = [\"Missing\"]\n",
    );

    modgraph(tmp.path())
        .args(["resolve", "A"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("`Missing` (required by `A`)"));
}

#[test]
fn test_resolve_with_feature_flag() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["resolve", "Game", "--features", "Analytics"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Game (8 modules)"))
        .stdout(predicate::str::contains("Analytics"));
}

#[test]
fn test_resolve_warns_on_undeclared_feature() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["resolve", "Game", "--features", "Telemetry"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Telemetry"));
}

#[test]
fn test_resolve_with_configuration_overlay() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["resolve", "Game", "--configuration", "Win64"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("D3D12"));

    modgraph(tmp.path())
        .args(["resolve", "Game", "--configuration", "Linux"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("D3D12").not());
}

// ============================================================================
// modgraph includes / pch
// ============================================================================

#[test]
fn test_includes_follow_public_chain() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["includes", "Game", "--module", "Game"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Game/Public"))
        .stdout(predicate::str::contains("Engine/Public"))
        .stdout(predicate::str::contains("Core/Public"))
        .stdout(predicate::str::contains("Slate/Public"));
}

#[test]
fn test_includes_for_non_member_fails() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["includes", "Engine", "--module", "Game"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not part of the closure"));
}

#[test]
fn test_pch_modes() {
    let tmp = engine_tree();

    let output = modgraph(tmp.path())
        .args(["pch", "Game"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let core = stdout.lines().find(|l| l.starts_with("Core ")).unwrap();
    assert!(core.contains("none"));
}

// ============================================================================
// modgraph plan
// ============================================================================

#[test]
fn test_plan_emits_json() {
    let tmp = engine_tree();

    let output = modgraph(tmp.path())
        .args(["plan", "Game"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["root"], "Game");
    assert_eq!(plan["modules"]["Online"]["visibility"], "private-only");
    assert_eq!(plan["modules"]["Engine"]["visibility"], "public");

    let order: Vec<&str> = plan["build_order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    let pos = |m: &str| order.iter().position(|x| *x == m).unwrap();
    assert!(pos("Core") < pos("Engine"));
    assert!(pos("Engine") < pos("Game"));
    assert_eq!(order.last(), Some(&"Game"));
}

#[test]
fn test_plan_is_deterministic() {
    let tmp = engine_tree();

    let run = || {
        modgraph(tmp.path())
            .args(["plan", "Game"])
            .current_dir(tmp.path())
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_plan_configured_targets() {
    let tmp = engine_tree();
    let config_dir = tmp.path().join(".modgraph");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        r#"
[targets.client]
root = "Game"
configuration = "Win64"

[targets.server]
root = "Online"
"#,
    )
    .unwrap();

    let out_file = tmp.path().join("plans.json");
    modgraph(tmp.path())
        .args(["plan", "--all-targets", "--output"])
        .arg(&out_file)
        .current_dir(tmp.path())
        .assert()
        .success();

    let plans: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_file).unwrap()).unwrap();
    let plans = plans.as_array().unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0]["target"], "client");
    assert_eq!(plans[0]["configuration"], "Win64");
    assert!(plans[0]["modules"].get("D3D12").is_some());
    assert_eq!(plans[1]["target"], "server");
    assert_eq!(plans[1]["root"], "Online");
}

#[test]
fn test_plan_unknown_target() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["plan", "--target", "nope"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_plan_cycle_through_feature() {
    let tmp = TempDir::new().unwrap();
    write_module(
        tmp.path(),
        "A",
        "[module]\nname = \"A\"\n\n[dependencies]\npublic = [\"B\"]\n",
    );
    write_module(
        tmp.path(),
        "B",
        "[module]\nname = \"B\"\n\n[conditional]\nLoop = \"A\"\n",
    );

    modgraph(tmp.path())
        .args(["plan", "A"])
        .current_dir(tmp.path())
        .assert()
        .success();

    modgraph(tmp.path())
        .args(["plan", "A", "--features", "Loop"])
        .current_dir(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cyclic dependency"));
}

// ============================================================================
// modgraph tree / explain
// ============================================================================

#[test]
fn test_tree_shows_private_edges() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["tree", "Game"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Game"))
        .stdout(predicate::str::contains("Online [private]"))
        .stdout(predicate::str::contains("(*)"));
}

#[test]
fn test_tree_public_only() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["tree", "Game", "--public-only"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Engine"))
        .stdout(predicate::str::contains("Online").not());
}

#[test]
fn test_explain_path() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["explain", "Game", "Json"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Json is private-only"))
        .stdout(predicate::str::contains("Online (private)"))
        .stdout(predicate::str::contains("Json (public)"));
}

#[test]
fn test_explain_non_member() {
    let tmp = engine_tree();

    modgraph(tmp.path())
        .args(["explain", "Engine", "Json"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not required by"));
}

// ============================================================================
// modgraph completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();

    modgraph(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modgraph"));
}
