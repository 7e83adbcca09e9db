use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use assert_cmd::cargo::{self};
use predicates::str::contains;
use serde_json::Value;

fn scratch_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("formsmith-cli-{name}-{stamp}"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn field_ids(path: &PathBuf) -> Vec<String> {
    let doc: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    doc["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|field| field["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn new_add_and_validate() {
    let dir = scratch_dir("workflow");
    let form = dir.join("form.json");

    cargo::cargo_bin_cmd!("formsmith")
        .args(["new", "--title", "Signup", "--theme", "elegant-purple", "-o"])
        .arg(&form)
        .assert()
        .success();

    cargo::cargo_bin_cmd!("formsmith")
        .arg("add")
        .arg(&form)
        .args(["--type", "email", "--label", "Email", "--required"])
        .assert()
        .success()
        .stderr(contains("added field"));

    let ids = field_ids(&form);
    assert_eq!(ids.len(), 1);
    let email = &ids[0];

    let bad = dir.join("bad.json");
    fs::write(&bad, format!(r#"{{"{email}": "not-an-email"}}"#)).unwrap();
    cargo::cargo_bin_cmd!("formsmith")
        .arg("validate")
        .arg(&form)
        .arg("--values")
        .arg(&bad)
        .assert()
        .failure()
        .stdout(contains("Please enter a valid email address"));

    let good = dir.join("good.json");
    fs::write(&good, format!(r#"{{"{email}": "user@example.com"}}"#)).unwrap();
    cargo::cargo_bin_cmd!("formsmith")
        .arg("validate")
        .arg(&form)
        .arg("--values")
        .arg(&good)
        .assert()
        .success()
        .stdout(contains("\"valid\": true"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn rejects_malformed_rule_patterns() {
    let dir = scratch_dir("pattern");
    let form = dir.join("form.json");

    cargo::cargo_bin_cmd!("formsmith")
        .args(["new", "-o"])
        .arg(&form)
        .assert()
        .success();

    cargo::cargo_bin_cmd!("formsmith")
        .arg("add")
        .arg(&form)
        .args(["--type", "text", "--rule", "pattern=(["])
        .assert()
        .failure()
        .stderr(contains("not a valid regular expression"));

    assert!(field_ids(&form).is_empty(), "failed edits are not written");
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn toml_forms_and_values_round_trip() {
    let dir = scratch_dir("toml");
    let form = dir.join("form.toml");

    cargo::cargo_bin_cmd!("formsmith")
        .args(["new", "--title", "Survey", "-o"])
        .arg(&form)
        .assert()
        .success();

    cargo::cargo_bin_cmd!("formsmith")
        .arg("add")
        .arg(&form)
        .args(["--type", "number", "--label", "Age", "--rule", "min=18"])
        .assert()
        .success();

    let contents = fs::read_to_string(&form).unwrap();
    assert!(contents.contains("title = \"Survey\""));
    let doc: toml::Table = toml::from_str(&contents).unwrap();
    let id = doc["fields"][0]["id"].as_str().unwrap().to_string();

    let values = dir.join("values.toml");
    fs::write(&values, format!("{id} = \"12\"\n")).unwrap();
    cargo::cargo_bin_cmd!("formsmith")
        .arg("validate")
        .arg(&form)
        .arg("--values")
        .arg(&values)
        .assert()
        .failure()
        .stdout(contains("Minimum value is 18"));

    let _ = fs::remove_dir_all(dir);
}
