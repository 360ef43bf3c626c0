use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::tempdir;

fn autoimport() -> Command {
  assert_cmd::cargo::cargo_bin_cmd!("autoimport-js")
}

fn fixture(name: &str) -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

const APP_IMPORTS: &str = concat!(
  "import { Container } from \"react-bootstrap\"\n",
  "import { Button } from \"react-bootstrap\"\n",
  "import Icon from \"./Icon\"\n",
);

#[test]
fn reports_missing_imports_without_touching_the_file() {
  let app = fixture("App.tsx");
  let before = fs::read_to_string(&app).unwrap();
  autoimport()
    .arg("--config")
    .arg(fixture("settings.json"))
    .arg(&app)
    .assert()
    .success()
    .stdout(
      predicate::str::contains("Auto-imported Container from \"react-bootstrap\"")
        .and(predicate::str::contains("Auto-imported Button from \"react-bootstrap\""))
        .and(predicate::str::contains("Auto-imported Icon from \"./Icon\"")),
    );
  assert_eq!(fs::read_to_string(&app).unwrap(), before);
}

#[test]
fn write_inserts_imports_once() {
  let dir = tempdir().unwrap();
  let app = dir.path().join("App.tsx");
  let original = fs::read_to_string(fixture("App.tsx")).unwrap();
  fs::write(&app, &original).unwrap();

  autoimport()
    .arg("--config")
    .arg(fixture("settings.json"))
    .arg("--write")
    .arg(&app)
    .assert()
    .success();
  let written = fs::read_to_string(&app).unwrap();
  assert_eq!(written, format!("{APP_IMPORTS}{original}"));

  autoimport()
    .arg("--config")
    .arg(fixture("settings.json"))
    .arg("--write")
    .arg("--check")
    .arg(&app)
    .assert()
    .success()
    .stdout(predicate::str::is_empty());
  assert_eq!(fs::read_to_string(&app).unwrap(), written);
}

#[test]
fn check_fails_only_when_imports_are_missing() {
  autoimport()
    .arg("--config")
    .arg(fixture("settings.json"))
    .arg("--check")
    .arg(fixture("App.tsx"))
    .assert()
    .code(1);

  autoimport()
    .arg("--config")
    .arg(fixture("settings.json"))
    .arg("--check")
    .arg(fixture("Clean.tsx"))
    .assert()
    .success()
    .stdout(predicate::str::is_empty());
}

#[test]
fn json_report_is_parseable() {
  let output = autoimport()
    .arg("--config")
    .arg(fixture("settings.json"))
    .arg("--json")
    .arg(fixture("App.tsx"))
    .arg(fixture("Clean.tsx"))
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();
  let value: Value = serde_json::from_slice(&output).expect("stdout to be valid JSON");
  let reports = value.as_array().expect("array of reports");
  assert_eq!(reports.len(), 2);

  let app = &reports[0];
  assert_eq!(app["changed"], true);
  assert_eq!(app["written"], false);
  let plan = app["plan"].as_array().unwrap();
  assert_eq!(plan.len(), 3);
  assert_eq!(plan[0]["name"], "Container");
  assert_eq!(plan[0]["kind"], "named");
  assert_eq!(plan[2]["name"], "Icon");
  assert_eq!(plan[2]["kind"], "default");
  assert_eq!(app["edits"][0]["position"]["line"], 0);
  assert_eq!(app["edits"][0]["position"]["character"], 0);
  assert_eq!(app["edits"][0]["text"], APP_IMPORTS);

  let clean = &reports[1];
  assert_eq!(clean["changed"], false);
  assert_eq!(clean["plan"].as_array().unwrap().len(), 0);
  assert_eq!(clean["edits"].as_array().unwrap().len(), 0);
}

#[test]
fn broken_source_still_gets_imports_and_warnings() {
  autoimport()
    .arg("--config")
    .arg(fixture("settings.json"))
    .arg(fixture("Broken.jsx"))
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "Auto-imported Button from \"react-bootstrap\"",
    ))
    .stderr(
      predicate::str::contains("warning[PS")
        .and(predicate::str::contains("no import configured for <Layout>")),
    );
}

#[test]
fn default_settings_file_is_picked_up() {
  let dir = tempdir().unwrap();
  fs::copy(fixture("settings.json"), dir.path().join(".autoimport.json")).unwrap();
  autoimport()
    .current_dir(dir.path())
    .arg(fixture("App.tsx"))
    .assert()
    .success()
    .stdout(predicate::str::contains("Auto-imported Icon"));
}

#[test]
fn no_settings_means_no_imports() {
  let dir = tempdir().unwrap();
  autoimport()
    .current_dir(dir.path())
    .arg("--check")
    .arg(fixture("App.tsx"))
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("no import configured for <Button>"));
}

#[test]
fn io_and_settings_errors_exit_with_2() {
  autoimport()
    .arg("--config")
    .arg(fixture("settings.json"))
    .arg(fixture("missing.tsx"))
    .assert()
    .code(2)
    .stderr(predicate::str::contains("failed to read"));

  let dir = tempdir().unwrap();
  let bad = dir.path().join("bad.json");
  fs::write(&bad, r#"{ "namedImports": ["Button"] }"#).unwrap();
  autoimport()
    .arg("--config")
    .arg(&bad)
    .arg(fixture("App.tsx"))
    .assert()
    .code(2)
    .stderr(predicate::str::contains("invalid settings"));
}
