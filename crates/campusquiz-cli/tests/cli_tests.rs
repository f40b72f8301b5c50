//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const USERS: &str = r#"[
  {"username": "goose", "password": "honk", "permission": "Teacher",
   "totalScore": 40, "middlesexScore": 40, "naturalSciencesScore": 0, "talbotScore": 0},
  {"username": "JimmyJohn", "password": "sub", "permission": "Student",
   "totalScore": 900, "middlesexScore": 500, "naturalSciencesScore": 200, "talbotScore": 200},
  {"username": "ana", "password": "pw", "permission": "Student",
   "totalScore": 300, "middlesexScore": 100, "naturalSciencesScore": 0, "talbotScore": 200}
]"#;

const QUESTIONS: &str = r#"[
  {"id": 1, "miniGame": "middlesex", "question": "What is 2 + 2?", "type": "short",
   "options": [], "answer": ["4", "four"], "difficulty": 1},
  {"id": 2, "miniGame": "middlesex", "question": "What is 12 x 12?", "type": "short",
   "options": [], "answer": ["144"], "difficulty": 2}
]"#;

fn campusquiz() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("campusquiz").unwrap();
    cmd.env_remove("CAMPUSQUIZ_PROFILES")
        .env_remove("CAMPUSQUIZ_QUESTIONS")
        .env_remove("RUST_LOG");
    cmd
}

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("users.json"), USERS).unwrap();
    std::fs::write(dir.path().join("question.json"), QUESTIONS).unwrap();
    std::fs::write(
        dir.path().join("campusquiz.toml"),
        "profiles_path = \"users.json\"\nquestions_path = \"question.json\"\n",
    )
    .unwrap();
    dir
}

fn saved_profile(dir: &Path, username: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(dir.join("users.json")).unwrap();
    let users: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
    users
        .into_iter()
        .find(|u| u["username"] == username)
        .unwrap()
}

#[test]
fn init_creates_starter_files() {
    let dir = TempDir::new().unwrap();

    campusquiz()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created campusquiz.toml"));

    assert!(dir.path().join("campusquiz.toml").exists());
    let users = std::fs::read_to_string(dir.path().join("json_files/users.json")).unwrap();
    assert_eq!(users.trim(), "[]");
    assert!(dir.path().join("json_files/question.json").exists());

    campusquiz()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping."));
}

#[test]
fn sample_question_bank_is_valid() {
    let dir = TempDir::new().unwrap();
    campusquiz()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    campusquiz()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("12 questions"))
        .stdout(predicate::str::contains("All questions valid."));
}

#[test]
fn validate_reports_missing_tier() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--questions")
        .arg("question.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("no hard questions for minigame 'middlesex'"))
        .stdout(predicate::str::contains("1 warning(s) found."));
}

#[test]
fn validate_nonexistent_file() {
    campusquiz()
        .arg("validate")
        .arg("--questions")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_corrupt_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
    campusquiz()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--questions")
        .arg("bad.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt data"));
}

#[test]
fn leaderboard_orders_by_category() {
    let dir = data_dir();
    let output = campusquiz()
        .current_dir(dir.path())
        .arg("leaderboard")
        .arg("--category")
        .arg("talbot")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("TalbotScore"));
    // ana and JimmyJohn tie on 200; ties keep username order.
    let jimmy = stdout.find("JimmyJohn").unwrap();
    let ana = stdout.find("ana").unwrap();
    let goose = stdout.find("goose").unwrap();
    assert!(jimmy < ana && ana < goose);
}

#[test]
fn leaderboard_respects_limit() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .args(["leaderboard", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("JimmyJohn"))
        .stdout(predicate::str::contains("goose").not());
}

#[test]
fn leaderboard_unknown_category() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .args(["leaderboard", "--category", "speed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown rank category"));
}

#[test]
fn play_scores_and_saves() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .args(["play", "--username", "newbie", "--password", "pw"])
        .write_stdin("4\nfour\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created new account 'newbie'."))
        .stdout(predicate::str::contains("Q: What is 2 + 2?"))
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("Final score: 20"))
        .stdout(predicate::str::contains("newbie"));

    let profile = saved_profile(dir.path(), "newbie");
    assert_eq!(profile["middlesexScore"], 20);
    assert_eq!(profile["totalScore"], 20);
    assert_eq!(profile["permission"], "Student");
}

#[test]
fn play_wrong_answer_shows_expected() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .args(["play", "--username", "ana", "--password", "pw"])
        .write_stdin("5\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Incorrect. The answer was: 4"))
        .stdout(predicate::str::contains("nothing was saved"));

    assert_eq!(saved_profile(dir.path(), "ana")["middlesexScore"], 100);
}

#[test]
fn play_rejects_wrong_password() {
    let dir = data_dir();
    let before = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
    campusquiz()
        .current_dir(dir.path())
        .args(["play", "--username", "ana", "--password", "nope"])
        .write_stdin(":quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("incorrect password"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("users.json")).unwrap(),
        before
    );
}

#[test]
fn play_rejects_wrong_role() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .args(["play", "--username", "goose", "--password", "honk"])
        .write_stdin(":quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("incorrect role selected"));
}

#[test]
fn play_without_questions_for_minigame() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .args(["play", "--username", "ana", "--password", "pw", "--minigame", "talbot"])
        .write_stdin(":quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no easy questions available"));
}

#[test]
fn tier_override_needs_developer() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .args(["play", "--username", "ana", "--password", "pw"])
        .write_stdin(":tier 2\n:quit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Cannot change tier"));
    assert_eq!(saved_profile(dir.path(), "ana")["middlesexScore"], 100);
}

#[test]
fn developer_can_force_tier() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .args([
            "play",
            "--username",
            "dev",
            "--password",
            "root",
            "--role",
            "developer",
        ])
        .write_stdin(":tier 2\n144\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Difficulty forced to tier 2."))
        .stdout(predicate::str::contains("Final score: 515"));
    assert_eq!(saved_profile(dir.path(), "dev")["middlesexScore"], 515);
}

#[test]
fn students_requires_staff() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .args([
            "students",
            "--username",
            "ana",
            "--password",
            "pw",
            "--role",
            "student",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not permitted"));
}

#[test]
fn students_lists_and_exports() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .args([
            "students",
            "--username",
            "goose",
            "--password",
            "honk",
            "--search",
            "j",
            "--html",
            "out/class.html",
            "--json",
            "out/class.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("JimmyJohn"))
        .stdout(predicate::str::contains("Medium"))
        .stdout(predicate::str::contains("1 players"));

    let html = std::fs::read_to_string(dir.path().join("out/class.html")).unwrap();
    assert!(html.contains("Class progress"));
    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("out/class.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json["rows"][0]["username"], "JimmyJohn");
    assert_eq!(json["rows"][0]["level"], "medium");
}

#[test]
fn reset_zeroes_scores() {
    let dir = data_dir();
    campusquiz()
        .current_dir(dir.path())
        .args(["reset", "--username", "JimmyJohn", "--password", "sub"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reset to 0"));

    let profile = saved_profile(dir.path(), "JimmyJohn");
    assert_eq!(profile["totalScore"], 0);
    assert_eq!(profile["middlesexScore"], 0);
    assert_eq!(profile["naturalSciencesScore"], 0);
    assert_eq!(profile["talbotScore"], 0);
}

#[test]
fn missing_config_path_fails() {
    campusquiz()
        .args(["leaderboard", "--config", "/no/such/campusquiz.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}
