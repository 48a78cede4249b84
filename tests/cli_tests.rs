//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn course_quiz() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("course-quiz").unwrap()
}

fn content(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("sections")
        .join(name)
}

#[test]
fn validate_bundled_content() {
    course_quiz()
        .arg("validate")
        .arg("--path")
        .arg(content(""))
        .assert()
        .success()
        .stdout(predicate::str::contains("Capacitance in AC Circuits"))
        .stdout(predicate::str::contains("COSHH Awareness Mock Examination"))
        .stdout(predicate::str::contains("All 2 document(s) valid."));
}

#[test]
fn validate_reports_authoring_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{
            "kind": "section",
            "id": "broken",
            "title": "Broken",
            "quiz": { "questions": [{
                "id": 1,
                "question": "Unit of capacitance?",
                "options": ["Henry (H)", "Farad (F)"],
                "correctAnswer": { "byValue": "Farad" },
                "explanation": "Farads."
            }]}
        }"#,
    )
    .unwrap();

    course_quiz()
        .arg("validate")
        .arg("--path")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[1] ERROR"))
        .stderr(predicate::str::contains("1 authoring error(s)"));
}

#[test]
fn validate_nonexistent_file() {
    course_quiz()
        .arg("validate")
        .arg("--path")
        .arg("no_such_file.json")
        .assert()
        .failure()
        .stdout(predicate::str::contains("failed to read no_such_file.json"))
        .stderr(predicate::str::contains("1 file(s) could not be read or parsed"))
        .stderr(predicate::str::contains("authoring").not());
}

#[test]
fn grade_section_quiz() {
    course_quiz()
        .arg("grade")
        .arg("--file")
        .arg(content("capacitance.json"))
        .arg("--answers")
        .arg("B,A,1")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Capacitance in AC Circuits: Section 3 Knowledge Check",
        ))
        .stdout(predicate::str::contains("[1] correct"))
        .stdout(predicate::str::contains("[2] incorrect"))
        .stdout(predicate::str::contains("Score: 2 / 3 (67%)"));
}

#[test]
fn grade_partial_answers() {
    course_quiz()
        .arg("grade")
        .arg("--file")
        .arg(content("capacitance.json"))
        .arg("--answers")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Incomplete: answered 1 of 3 questions"))
        .stdout(predicate::str::contains("Score:").not());
}

#[test]
fn grade_too_many_answers() {
    course_quiz()
        .arg("grade")
        .arg("--file")
        .arg(content("capacitance.json"))
        .arg("--answers")
        .arg("1,1,1,1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("4 answers given"));
}

#[test]
fn grade_mock_exam_reports_verdict() {
    course_quiz()
        .arg("grade")
        .arg("--file")
        .arg(content("coshh-mock-exam.json"))
        .arg("--answers")
        .arg("A,A,A,A")
        .arg("--seed")
        .arg("11")
        .assert()
        .success()
        .stdout(predicate::str::contains("COSHH Awareness Mock Examination"))
        .stdout(predicate::str::contains("Score:"))
        .stdout(predicate::str::contains("(pass mark 80%)"));
}
