//! Runs the `ribbon` binary against manifests written to a temporary directory.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

const CORE: &str = r#"<ribbon>
  <app-menu><control id="save"/><control id="print"/></app-menu>
  <tabs>
    <tab label="HOME">
      <groups>
        <group label="CLIPBOARD"><control id="cut"/><control id="copy"/></group>
      </groups>
    </tab>
  </tabs>
</ribbon>"#;

const CLIPBOARD: &str = r#"<tab label="HOME" override="true">
  <groups>
    <group label="CLIPBOARD" override="true" controlsOrder="2"><control id="paste"/></group>
  </groups>
</tab>"#;

const BROKEN: &str = r#"<tab label="BROKEN"><groups><group label="G" order="x.y"/></groups></tab>"#;

fn project(files: &[(&str, &str)], manifest: &str) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    fs::write(dir.path().join("ribbon.toml"), manifest).unwrap();
    dir
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ribbon"))
        .args(args)
        .arg("--manifest")
        .arg(dir.path().join("ribbon.toml"))
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute ribbon")
}

fn two_plugins() -> TempDir {
    project(
        &[("core/ribbon.xml", CORE), ("clipboard.xml", CLIPBOARD)],
        r#"
[[plugin]]
name = "core"
files = ["core/ribbon.xml"]

[[plugin]]
name = "clipboard"
files = ["clipboard.xml"]
"#,
    )
}

fn with_broken_plugin(strict: bool) -> TempDir {
    project(
        &[("core/ribbon.xml", CORE), ("broken.xml", BROKEN)],
        &format!(
            r#"
[options]
strict = {strict}

[[plugin]]
name = "core"
files = ["core/ribbon.xml"]

[[plugin]]
name = "broken"
files = ["broken.xml"]
"#
        ),
    )
}

#[test]
fn test_build_writes_merged_xml() {
    let dir = two_plugins();
    let output = run(&dir, &["build"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<ribbon xmlns:i18n="));
    let cut = stdout.find(r#"<control id="cut""#).unwrap();
    let copy = stdout.find(r#"<control id="copy""#).unwrap();
    let paste = stdout.find(r#"<control id="paste""#).unwrap();
    assert!(cut < paste && paste < copy);
}

#[test]
fn test_build_json_to_file() {
    let dir = two_plugins();
    let target = dir.path().join("out/ribbon.json");
    fs::create_dir_all(target.parent().unwrap()).unwrap();

    let output = run(&dir, &["build", "--format", "json", "--output", target.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(json["tabs"][0]["label"]["key"], "HOME");
    assert_eq!(json["app_menu"][1]["id"], "print");
}

#[test]
fn test_build_hides_controls() {
    let dir = two_plugins();
    let output = run(&dir, &["build", "--hide", "print", "--hide", "copy"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains(r#"id="print""#));
    assert!(!stdout.contains(r#"id="copy""#));
    assert!(stdout.contains(r#"id="paste""#));
}

#[test]
fn test_manifest_exclusions_apply() {
    let dir = project(
        &[("core/ribbon.xml", CORE), ("clipboard.xml", CLIPBOARD)],
        r#"
[[plugin]]
name = "core"
files = ["core/ribbon.xml"]

[[plugin]]
name = "clipboard"
files = ["clipboard.xml"]

[[exclude]]
type = "import"
target = "plugin"
value = "clipboard"
"#,
    );
    let output = run(&dir, &["build"]);
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("paste"));
}

#[test]
fn test_check_clean_project() {
    let dir = two_plugins();
    let output = run(&dir, &["check"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_check_reports_rejected_fragment() {
    let dir = with_broken_plugin(false);
    let output = run(&dir, &["check"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("R-1-1"), "{stderr}");
}

#[test]
fn test_build_survives_rejected_fragment() {
    let dir = with_broken_plugin(false);
    let output = run(&dir, &["build"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("application:HOME"));
    assert!(!stdout.contains("BROKEN"));
}

#[test]
fn test_strict_build_fails_without_output() {
    for (strict_in_manifest, args) in [(true, vec!["build"]), (false, vec!["build", "--strict"])] {
        let dir = with_broken_plugin(strict_in_manifest);
        let output = run(&dir, &args);
        assert!(!output.status.success());
        assert!(output.stdout.is_empty());
        assert!(String::from_utf8_lossy(&output.stderr).contains("R-1-1"));
    }
}

#[test]
fn test_json_errors() {
    let dir = project(
        &[("core/ribbon.xml", CORE), ("broken.xml", BROKEN), ("truncated.xml", "<tab label=\"X\">")],
        r#"
[[plugin]]
name = "core"
files = ["core/ribbon.xml", "truncated.xml"]

[[plugin]]
name = "broken"
files = ["broken.xml"]
"#,
    );
    let output = run(&dir, &["check", "--json-errors"]);
    assert!(!output.status.success());

    let codes: Vec<String> = String::from_utf8_lossy(&output.stderr)
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).expect("not a JSON line"))
        .map(|json| json["code"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(codes, vec!["R-9-2", "R-1-1"]);
}

#[test]
fn test_invalid_manifest() {
    let dir = project(&[], "[[plugin]]\nname = \"core\"\npath = \"x.xml\"\n");
    let output = run(&dir, &["check"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid ribbon manifest"), "{stderr}");
}
