use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const LEGACY_JENKINSFILE: &str = r#"@Library("github.com/RedHatInsights/insights-pipeline-lib") _

if (pipelineUtils.triggeredByComment()) {
    withStatusContext.unitTest {
        runPipenvInstall()
    }
}
"#;

fn migrate() -> Command {
    Command::cargo_bin("pipeline-migrate").unwrap()
}

#[test]
fn no_arguments_exits_with_1() {
    migrate()
        .assert()
        .code(1)
        .stdout("You didn't provide a filename\n");
}

#[test]
fn migrates_file_in_place_and_logs_diff() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Jenkinsfile");
    fs::write(&path, "node {\n    changedFiles()\n}\n").unwrap();

    migrate()
        .arg(&path)
        .assert()
        .success()
        .stdout(format!(
            "line 1 old:     changedFiles()\n\
             line 1 new:     gitUtils.getFilesChanged()\n\
             \n\
             Changes saved to {}\n",
            path.display()
        ));

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "node {\n    gitUtils.getFilesChanged()\n}\n"
    );
    assert!(!temp.path().join("Jenkinsfile-new").exists());
}

#[test]
fn untouched_file_only_prints_confirmation() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Jenkinsfile");
    let content = "pipeline {\n    agent any\n}\n";
    fs::write(&path, content).unwrap();

    migrate()
        .arg(&path)
        .assert()
        .success()
        .stdout(format!("Changes saved to {}\n", path.display()));

    assert_eq!(fs::read_to_string(&path).unwrap(), content);
    assert!(!temp.path().join("Jenkinsfile-new").exists());
}

#[test]
fn relative_path_is_reported_absolute() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("Jenkinsfile"), "slackNotify()\n").unwrap();

    migrate()
        .current_dir(temp.path())
        .arg("Jenkinsfile")
        .assert()
        .success()
        .stdout(predicate::str::ends_with(format!(
            "Changes saved to {}\n",
            temp.path().join("Jenkinsfile").display()
        )));
}

#[test]
fn multi_line_migration() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Jenkinsfile");
    fs::write(&path, LEGACY_JENKINSFILE).unwrap();

    migrate()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("line 0 old: @Library("))
        .stdout(predicate::str::contains(
            "line 3 new:     gitUtils.withStatusContext(\"unittest\") {",
        ))
        .stdout(predicate::str::contains(
            "line 4 new:         pythonUtils.runPipenvInstall()",
        ));

    let migrated = fs::read_to_string(&path).unwrap();
    assert!(migrated.starts_with(
        "@Library(\"github.com/RedHatInsights/insights-pipeline-lib@v3\") _\n"
    ));
    // Already-namespaced calls are a second-run hazard: the bare key still matches.
    assert!(migrated.contains("pipelineUtils.pipelineUtils.triggeredByComment()"));
}

#[test]
fn second_run_is_not_a_no_op() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Jenkinsfile");
    fs::write(&path, "ghNotify()\n").unwrap();

    migrate().arg(&path).assert().success();
    migrate().arg(&path).assert().success();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "gitUtils.gitUtils.ghNotify()\n"
    );
}

#[test]
fn missing_file_fails_without_touching_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Jenkinsfile");

    migrate()
        .arg(&path)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("internal.io_error"));

    assert!(!path.exists());
    assert!(!temp.path().join("Jenkinsfile-new").exists());
}

#[test]
fn directory_argument_exits_with_2() {
    let temp = TempDir::new().unwrap();

    migrate()
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is a directory"));
}

#[test]
fn dry_run_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Jenkinsfile");
    fs::write(&path, "runSmokeTest()\n").unwrap();

    migrate()
        .arg("--dry-run")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("line 0 new: execSmokeTest()"))
        .stdout(predicate::str::contains("left unchanged"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "runSmokeTest()\n");
}

#[test]
fn json_envelope_on_success() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Jenkinsfile");
    fs::write(&path, "withStatusContext.lint(\"flake8\") {\n").unwrap();

    let assert = migrate().arg("--json").arg(&path).assert().success();
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["data"]["command"], "migrate");
    assert_eq!(value["data"]["applied"], true);
    assert_eq!(value["data"]["changes"][0]["line"], 0);
    assert_eq!(
        value["data"]["changes"][0]["new"],
        "gitUtils.withStatusContext(\"lint\", \"flake8\") {"
    );
}

#[test]
fn json_envelope_on_missing_argument() {
    let assert = migrate().arg("--json").assert().code(1);
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(value["success"], false);
    assert_eq!(value["error"]["code"], "validation.missing_argument");
    assert_eq!(value["error"]["message"], "You didn't provide a filename");
}

#[test]
fn list_prints_table_in_order() {
    migrate()
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "cancelPriorBuilds -> pipelineUtils.cancelPriorBuilds\n\
             getFilesChanged -> gitUtils.getFilesChanged\n\
             changedFiles -> gitUtils.getFilesChanged\n",
        ));
}

#[test]
fn unwritable_scratch_file_exits_1_and_keeps_original() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Jenkinsfile");
    fs::write(&path, "ghNotify()\n").unwrap();
    // `<path>-new` cannot be created while a directory holds its name.
    fs::create_dir(temp.path().join("Jenkinsfile-new")).unwrap();

    migrate()
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("internal.io_error"))
        .stderr(predicate::str::contains("Jenkinsfile-new"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "ghNotify()\n");
}

#[test]
fn diff_lines_print_before_a_read_failure() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Jenkinsfile");
    let bytes = b"ghNotify()\n\xff\xfe\n".to_vec();
    fs::write(&path, &bytes).unwrap();

    migrate()
        .arg(&path)
        .assert()
        .code(1)
        .stdout("line 0 old: ghNotify()\nline 0 new: gitUtils.ghNotify()\n\n")
        .stderr(predicate::str::contains("internal.io_error"));

    assert_eq!(fs::read(&path).unwrap(), bytes);
}

#[test]
fn single_quoted_library_is_reported_but_unchanged() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Jenkinsfile");
    let content = "@Library('github.com/RedHatInsights/insights-pipeline-lib') _\n";
    fs::write(&path, content).unwrap();

    migrate()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "line 0 old: @Library('github.com/RedHatInsights/insights-pipeline-lib') _\n\
             line 0 new: @Library('github.com/RedHatInsights/insights-pipeline-lib') _\n",
        ));

    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn list_with_file_exits_2() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Jenkinsfile");
    fs::write(&path, "ghNotify()\n").unwrap();

    migrate()
        .arg("--list")
        .arg(&path)
        .assert()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("--list takes no FILE"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "ghNotify()\n");
}
