use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const STUDY: &str = r#"gender,race/ethnicity,parental level of education,lunch,test preparation course,math score,reading score,writing score
female,group B,bachelor's degree,standard,none,72,72,74
female,group C,some college,standard,completed,69,90,88
female,group B,master's degree,standard,none,90,95,93
male,group A,associate's degree,free/reduced,none,47,57,44
male,group C,some college,standard,none,76,78,75
"#;

const SINGLE_FACTOR: &str = "some_factor,math score\nresult 1,80\nresult 1,70\nresult 2,90\n";

const SINGLE_FACTOR_CONFIG: &str = r#"
[ingest]
factor_columns = 1

[populations]
math = "math score"
"#;

#[allow(deprecated)]
fn cohort(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cohort").expect("binary");
    cmd.current_dir(workdir).arg("--quiet");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn average_prints_rounded_mean() {
    let temp = tempdir().unwrap();
    write(temp.path(), "study.csv", STUDY);

    cohort(temp.path())
        .args(["average", "study.csv", "--subject", "math score"])
        .assert()
        .success()
        .stdout("math score: 70.80 (5 entities)\n");
}

#[test]
fn predict_matches_single_factor_golden_values() {
    let temp = tempdir().unwrap();
    write(temp.path(), "single.csv", SINGLE_FACTOR);
    write(temp.path(), "cohort.toml", SINGLE_FACTOR_CONFIG);

    let body = stdout_json(cohort(temp.path()).args([
        "--config",
        "cohort.toml",
        "predict",
        "single.csv",
        "--subject",
        "math score",
        "--json",
    ]));

    let predicted: Vec<f64> = body["cases"]
        .as_array()
        .expect("cases array")
        .iter()
        .map(|case| case["predicted"].as_f64().unwrap())
        .collect();
    assert_eq!(predicted, vec![75.0, 75.0, 90.0]);
    assert_eq!(body["evaluated"], 3);
    assert_eq!(body["mean_absolute_percentage_error"], 4.46);
}

#[test]
fn predict_uses_history_table_when_given() {
    let temp = tempdir().unwrap();
    write(temp.path(), "history.csv", SINGLE_FACTOR);
    write(
        temp.path(),
        "new.csv",
        "some_factor,math score\nresult 3,80\nresult 1,75\n",
    );
    write(temp.path(), "cohort.toml", SINGLE_FACTOR_CONFIG);

    cohort(temp.path())
        .args([
            "--config",
            "cohort.toml",
            "predict",
            "new.csv",
            "--history",
            "history.csv",
            "--subject",
            "math score",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "some_factor: result 3\nScore: 80\nPredicted Score: 80.0\n",
        ))
        .stdout(predicate::str::contains(
            "some_factor: result 1\nScore: 75\nPredicted Score: 75.0\n",
        ))
        .stdout(predicate::str::ends_with("Average absolute error: 0.0%\n"));
}

#[test]
fn correlate_json_groups_every_population_in_configured_order() {
    let temp = tempdir().unwrap();
    write(temp.path(), "study.csv", STUDY);

    let body = stdout_json(cohort(temp.path()).args([
        "correlate",
        "study.csv",
        "--factor",
        "lunch",
        "--format",
        "json",
    ]));

    assert_eq!(body["title"], "Score vs lunch");
    assert_eq!(body["category_order"][0], "free/reduced");
    assert_eq!(body["category_order"][1], "standard");
    assert_eq!(body["rows"].as_array().map(Vec::len), Some(15));

    let populations: Vec<&str> = body["populations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["population"].as_str().unwrap())
        .collect();
    assert_eq!(populations, vec!["math", "reading", "writing"]);

    let math_groups = &body["populations"][0]["groups"];
    assert_eq!(math_groups[0]["outcome"], "free/reduced");
    assert_eq!(math_groups[0]["stats"]["count"], 1);
    assert_eq!(math_groups[1]["stats"]["count"], 4);
    assert_eq!(math_groups[1]["stats"]["median"], 74.0);
}

#[test]
fn correlate_writes_markdown_to_file() {
    let temp = tempdir().unwrap();
    write(temp.path(), "study.csv", STUDY);

    cohort(temp.path())
        .args([
            "correlate",
            "study.csv",
            "--factor",
            "gender",
            "--title",
            "Score vs gender",
            "--out",
            "charts/gender.md",
        ])
        .assert()
        .success()
        .stdout("");

    let md = fs::read_to_string(temp.path().join("charts/gender.md")).unwrap();
    assert!(md.starts_with("# Score vs gender\n"));
    assert!(md.contains("## writing\n"));
    assert!(md.find("| `male` |").unwrap() < md.find("| `female` |").unwrap());
}

#[test]
fn correlate_rejects_factor_outside_the_table() {
    let temp = tempdir().unwrap();
    write(temp.path(), "study.csv", STUDY);

    cohort(temp.path())
        .args(["correlate", "study.csv", "--factor", "shoe size"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown factor: shoe size"));
}

#[test]
fn unknown_subject_fails_with_available_columns() {
    let temp = tempdir().unwrap();
    write(temp.path(), "study.csv", STUDY);

    cohort(temp.path())
        .args(["average", "study.csv", "--subject", "science score"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Subject not found: 'science score'"));
}

#[test]
fn stats_reports_branching_order() {
    let temp = tempdir().unwrap();
    write(temp.path(), "study.csv", STUDY);

    let body = stdout_json(cohort(temp.path()).args([
        "stats",
        "study.csv",
        "--subject",
        "reading score",
        "--json",
    ]));
    assert_eq!(body["entities"], 5);
    assert_eq!(body["leaves"], 5);
    assert_eq!(body["depth"], 5);
    assert_eq!(body["labels"][0], "gender");
    assert_eq!(body["labels"][4], "test preparation course");
}
