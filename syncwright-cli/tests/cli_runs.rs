//! End-to-end runs of the `syncwright` binary against fixture projects.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const CONFIG: &str = r#"
version_templates:
  - file: src/version.ts
    template: "const version = '{version}'"
catalog:
  inclusion: exchanges.cfg
  discovery_dir: src/exchanges
  extension: ts
  descriptors_dir: descriptors
  manifest: exchanges.json
registries:
  - file: src/root.ts
    syntax: typescript
docs:
  - file: wiki.md
    view: full
    count_template: "{count} exchanges"
translate:
  command: sh
  args: ["-c", "printf '%s:' \"$1\"; cat \"$2\""]
  kind: single
  targets:
    - language: go
      extension: go
      output_dir: out/go
    - language: java
      extension: java
      output_dir: out/java
"#;

const ROOT_TS: &str = "\
import Exchange from './src/base/Exchange.js'

const exchanges = {
}

export {
    version,
}
";

const WIKI: &str = "# Exchanges\n\n0 exchanges\n\n| logo | id | name | ver | certified | pro |\n|---|\n\nfooter\n";

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "syncwright.yaml", CONFIG);
    write(root, "package.json", r#"{"version": "2.3.4"}"#);
    write(root, "exchanges.cfg", "");
    for id in ["alpha", "beta"] {
        write(root, &format!("src/exchanges/{id}.ts"), "export default class {}\n");
    }
    write(root, "descriptors/alpha.yaml", "id: alpha\nname: Alpha\ncountries: [JP]\ncertified: true\n");
    write(root, "descriptors/beta.yaml", "id: beta\nname: Beta\ncountries: [US]\n");
    write(root, "src/root.ts", ROOT_TS);
    write(root, "src/version.ts", "const version = '0.0.1'\n");
    write(root, "wiki.md", WIKI);
    dir
}

fn syncwright(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("syncwright").expect("binary");
    cmd.arg("--root").arg(root).env("RUST_LOG", "warn");
    cmd
}

#[test]
fn export_then_diff_is_clean() {
    let dir = fixture();

    syncwright(dir.path())
        .arg("export-exchanges")
        .assert()
        .success()
        .stdout(contains("2 exchanges exported"));
    syncwright(dir.path()).arg("vss").assert().success().stdout(contains("2.3.4"));

    let root_ts = read(dir.path(), "src/root.ts");
    assert!(root_ts.contains("    'alpha': alpha,\n    'beta': beta,\n"));
    let wiki = read(dir.path(), "wiki.md");
    assert!(wiki.contains("2 exchanges"));
    assert!(wiki.ends_with("\n\nfooter\n"));
    assert_eq!(read(dir.path(), "src/version.ts"), "const version = '2.3.4'\n");

    syncwright(dir.path())
        .arg("diff")
        .assert()
        .success()
        .stdout(contains("No differences."));
}

#[test]
fn dry_run_reports_and_writes_nothing() {
    let dir = fixture();
    syncwright(dir.path())
        .args(["export-exchanges", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("[dry-run]"))
        .stdout(contains("root.ts"));
    assert_eq!(read(dir.path(), "src/root.ts"), ROOT_TS);
    assert!(!dir.path().join("exchanges.json").exists());
}

#[test]
fn diff_shows_pending_registry_change() {
    let dir = fixture();
    syncwright(dir.path())
        .arg("diff")
        .assert()
        .success()
        .stdout(contains("--- a/src/root.ts"))
        .stdout(contains("+    'alpha': alpha,"));
}

#[test]
fn doc_without_table_fails_after_writing_the_rest() {
    let dir = fixture();
    write(dir.path(), "wiki.md", "# Exchanges\n\nno table\n");

    syncwright(dir.path())
        .arg("export-exchanges")
        .assert()
        .failure()
        .stdout(contains("wiki.md"))
        .stderr(contains("documentation file(s) could not be updated"));

    assert!(read(dir.path(), "src/root.ts").contains("'beta': beta,"));
    assert_eq!(read(dir.path(), "wiki.md"), "# Exchanges\n\nno table\n");
}

#[test]
fn missing_registry_anchor_is_fatal_and_writes_nothing() {
    let dir = fixture();
    write(dir.path(), "src/root.ts", "// emptied by hand\n");

    syncwright(dir.path()).arg("export-exchanges").assert().failure();
    assert_eq!(read(dir.path(), "wiki.md"), WIKI);
}

#[test]
fn vss_rejects_malformed_override() {
    let dir = fixture();
    syncwright(dir.path())
        .args(["vss", "--version", "5.0"])
        .assert()
        .failure();
    assert_eq!(read(dir.path(), "src/version.ts"), "const version = '0.0.1'\n");
}

#[test]
fn missing_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    syncwright(dir.path())
        .arg("diff")
        .assert()
        .failure()
        .stderr(contains("failed to load config"));
}

#[test]
fn config_flag_overrides_location() {
    let dir = fixture();
    fs::rename(dir.path().join("syncwright.yaml"), dir.path().join("alt.yaml")).unwrap();
    syncwright(dir.path())
        .args(["--config", "alt.yaml", "errors"])
        .assert()
        .failure()
        .stderr(contains("errors"));
    syncwright(dir.path())
        .args(["--config", "alt.yaml", "export-exchanges"])
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn translate_writes_one_file_per_target() {
    let dir = fixture();
    syncwright(dir.path())
        .args(["translate", "src/exchanges/alpha.ts", "src/exchanges/beta.ts", "--jobs", "2"])
        .assert()
        .success()
        .stdout(contains("2"));

    assert_eq!(read(dir.path(), "out/go/alpha.go"), "go:export default class {}\n");
    assert_eq!(read(dir.path(), "out/java/beta.java"), "java:export default class {}\n");
}

#[cfg(unix)]
#[test]
fn translate_reports_failed_unit_and_exits_nonzero() {
    let dir = fixture();
    syncwright(dir.path())
        .args(["translate", "src/exchanges/alpha.ts", "src/exchanges/missing.ts", "--target", "go"])
        .assert()
        .failure()
        .stdout(contains("missing.ts"));
    assert!(dir.path().join("out/go/alpha.go").exists());
    assert!(!dir.path().join("out/java").exists());
}

#[cfg(unix)]
#[test]
fn translate_skips_up_to_date_units_unless_forced() {
    let dir = fixture();
    let run = |extra: &[&str]| {
        let mut cmd = syncwright(dir.path());
        cmd.args(["translate", "src/exchanges/alpha.ts", "--target", "go"]).args(extra);
        cmd.assert().success()
    };

    run(&[]).stdout(contains("0 up to date"));
    write(dir.path(), "out/go/alpha.go", "edited by hand\n");

    run(&[]).stdout(contains("1 up to date"));
    assert_eq!(read(dir.path(), "out/go/alpha.go"), "edited by hand\n");

    run(&["--force"]).stdout(contains("0 up to date"));
    assert_eq!(read(dir.path(), "out/go/alpha.go"), "go:export default class {}\n");
}

#[cfg(unix)]
#[test]
fn translate_rejects_units_sharing_an_output() {
    let dir = fixture();
    write(dir.path(), "src/exchanges/pro/alpha.ts", "export default class Pro {}\n");
    syncwright(dir.path())
        .args(["translate", "src/exchanges/alpha.ts", "src/exchanges/pro/alpha.ts"])
        .assert()
        .failure()
        .stderr(contains("would both be written"));
    assert!(!dir.path().join("out").exists());
}

fn git(root: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["-c", "user.name=syncwright", "-c", "user.email=syncwright@localhost"])
        .args(args)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[test]
fn cleanup_old_tags_paper_run_as_json() {
    let dir = TempDir::new().unwrap();
    if !git(dir.path(), &["init", "-q"]) {
        return;
    }
    assert!(git(dir.path(), &["commit", "-q", "--allow-empty", "-m", "init"]));
    for minor in 1..=10 {
        for patch in 1..=3 {
            assert!(git(dir.path(), &["tag", &format!("1.{minor}.{patch}")]));
        }
    }

    let out = syncwright(dir.path())
        .args(["cleanup-old-tags", "--paper", "--json", "--limit", "4"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["keep"].as_array().unwrap().len(), 20);
    let deletions: Vec<_> = json["deletions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["tag"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(deletions, vec!["1.5.3", "1.5.2", "1.4.3", "1.4.2"]);
    assert!(git(dir.path(), &["rev-parse", "-q", "--verify", "refs/tags/1.1.2"]));
}

#[test]
fn cleanup_old_tags_rejects_malformed_tag() {
    let dir = TempDir::new().unwrap();
    if !git(dir.path(), &["init", "-q"]) {
        return;
    }
    assert!(git(dir.path(), &["commit", "-q", "--allow-empty", "-m", "init"]));
    assert!(git(dir.path(), &["tag", "1.0.1"]));
    assert!(git(dir.path(), &["tag", "v2-beta"]));

    syncwright(dir.path())
        .arg("cleanup-old-tags")
        .assert()
        .failure()
        .stderr(contains("v2-beta"));
}
