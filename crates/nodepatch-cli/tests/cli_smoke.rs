use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

const STORED_NODE: &str = r#"{
  "name": "node-1",
  "driver": "ipmi",
  "driver_info": {"ipmi_address": "10.0.0.5", "ipmi_username": "admin"},
  "properties": {"cpus": 8, "memory_mb": 16384},
  "extra": {}
}"#;

const EDITED_NODE: &str = r#"{
  "name": "node-1",
  "driver": "ipmi",
  "driver_info": {"ipmi_address": "10.0.0.6"},
  "properties": {"cpus": 16, "memory_mb": 16384},
  "extra": {"rack": "r7"}
}"#;

const EXPECTED_JSON: &str = concat!(
    r#"[{"op":"replace","path":"/driver_info/ipmi_address","value":"10.0.0.6"},"#,
    r#"{"op":"remove","path":"/driver_info/ipmi_username","value":"admin"},"#,
    r#"{"op":"replace","path":"/properties/cpus","value":16},"#,
    r#"{"op":"add","path":"/extra/rack","value":"r7"}]"#,
    "\n"
);

fn write_tempfile(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create tempfile");
    write!(file, "{contents}").expect("write tempfile");
    file
}

fn nodepatch() -> Command {
    let mut cmd = Command::cargo_bin("nodepatch").expect("binary nodepatch should be built");
    cmd.env_remove("NODEPATCH_LOG");
    cmd
}

#[test]
fn help_succeeds() {
    nodepatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: nodepatch [OPTIONS] SOURCE [TARGET]"))
        .stdout(predicate::str::contains("--allow-partial"));
}

#[test]
fn version_prints_package_version() {
    nodepatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn json_output_lists_operations() {
    let stored = write_tempfile(STORED_NODE);
    let edited = write_tempfile(EDITED_NODE);
    nodepatch()
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .code(1)
        .stdout(EXPECTED_JSON)
        .stderr(predicate::str::is_empty());
}

#[test]
fn strict_output_drops_removed_values() {
    let stored = write_tempfile(STORED_NODE);
    let edited = write_tempfile(EDITED_NODE);
    nodepatch()
        .args(["--format", "strict"])
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#"{"op":"remove","path":"/driver_info/ipmi_username"}"#))
        .stdout(predicate::str::contains(r#""value":"admin""#).not());
}

#[test]
fn text_output_uses_markers() {
    let stored = write_tempfile(STORED_NODE);
    let edited = write_tempfile(EDITED_NODE);
    nodepatch()
        .args(["--format", "text"])
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .code(1)
        .stdout(
            "~ /driver_info/ipmi_address \"10.0.0.6\"\n\
             - /driver_info/ipmi_username \"admin\"\n\
             ~ /properties/cpus 16\n\
             + /extra/rack \"r7\"\n",
        );
}

#[test]
fn text_output_with_color() {
    let stored = write_tempfile(r#"{"a":1}"#);
    let edited = write_tempfile(r#"{"a":2}"#);
    nodepatch()
        .args(["--format", "text", "--color"])
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .code(1)
        .stdout("\u{1b}[33m~ /a 2\u{1b}[0m\n");
}

#[test]
fn single_argument_reads_stdin() {
    let stored = write_tempfile(STORED_NODE);
    nodepatch()
        .arg(stored.path())
        .write_stdin(EDITED_NODE)
        .assert()
        .code(1)
        .stdout(EXPECTED_JSON);
}

#[test]
fn identical_documents_exit_zero() {
    let stored = write_tempfile(STORED_NODE);
    let edited = write_tempfile(STORED_NODE);
    nodepatch().arg(stored.path()).arg(edited.path()).assert().success().stdout("[]\n");
}

#[test]
fn base_path_prefixes_operations() {
    let stored = write_tempfile(r#"{"cpus":8}"#);
    let edited = write_tempfile(r#"{"cpus":16}"#);
    nodepatch()
        .args(["--base-path", "/properties", "--format", "strict"])
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .code(1)
        .stdout("[{\"op\":\"replace\",\"path\":\"/properties/cpus\",\"value\":16}]\n");
}

#[test]
fn escape_keys_encodes_slashes() {
    let stored = write_tempfile(r#"{}"#);
    let edited = write_tempfile(r#"{"capabilities/boot":"uefi"}"#);
    nodepatch()
        .args(["--escape-keys", "--format", "text"])
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .code(1)
        .stdout("+ /capabilities~1boot \"uefi\"\n");
}

#[test]
fn yaml_inputs_are_supported() {
    let stored = write_tempfile("name: node-1\nproperties:\n  cpus: 8\n");
    let edited = write_tempfile("name: node-1\nproperties:\n  cpus: 4\n");
    nodepatch()
        .args(["--yaml", "--format", "text"])
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .code(1)
        .stdout("~ /properties/cpus 4\n");
}

#[test]
fn incomplete_patch_is_refused() {
    let stored = write_tempfile(r#"{"name":"a"}"#);
    let edited = write_tempfile(r#"{"name":"b","instance_uuid":null}"#);
    nodepatch()
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("refusing to submit incomplete patch"))
        .stderr(predicate::str::contains("UNKNOWN_TYPE"));
}

#[test]
fn allow_partial_emits_recognized_operations() {
    let stored = write_tempfile(r#"{"name":"a","maintenance":false}"#);
    let edited = write_tempfile(r#"{"name":"b","maintenance":true}"#);
    nodepatch()
        .args(["--allow-partial", "--format", "text"])
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .code(1)
        .stdout("~ /name \"b\"\n# status: ERROR\n");
}

#[test]
fn output_flag_writes_file() {
    let stored = write_tempfile(r#"{"a":1}"#);
    let edited = write_tempfile(r#"{}"#);
    let out_dir = tempfile::tempdir().expect("tempdir");
    let out_path = out_dir.path().join("patch.json");
    nodepatch()
        .arg("-o")
        .arg(&out_path)
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&out_path).expect("output written");
    let patch: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
    assert_eq!(patch, serde_json::json!([{"op": "remove", "path": "/a", "value": 1}]));
}

#[test]
fn invalid_json_reports_file_name() {
    let stored = write_tempfile("{not json");
    let edited = write_tempfile("{}");
    nodepatch()
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn missing_file_is_an_error() {
    nodepatch()
        .arg("/definitely/not/here.json")
        .arg("/nor/here.json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read /definitely/not/here.json"));
}

#[test]
fn verbose_flag_logs_to_stderr() {
    let stored = write_tempfile(r#"{"a":1}"#);
    let edited = write_tempfile(r#"{"a":1}"#);
    nodepatch()
        .arg("-v")
        .arg(stored.path())
        .arg(edited.path())
        .assert()
        .success()
        .stdout("[]\n")
        .stderr(predicate::str::contains("patch built"));
}
