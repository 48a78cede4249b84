use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::validate::{ValidationIssue, validate_document};
use crate::models::Document;

/// Errors raised while loading content documents.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} has {} authoring error(s)", .path.display(), error_count(.issues))]
    Invalid {
        path: PathBuf,
        issues: Vec<ValidationIssue>,
    },
}

fn error_count(issues: &[ValidationIssue]) -> usize {
    issues.iter().filter(|i| i.is_error()).count()
}

/// Read, parse and validate a content document.
///
/// Documents with error-severity issues are rejected; warnings are logged.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document, LoadError> {
    let path = path.as_ref();
    let document = read_document(path)?;
    let issues = validate_document(&document);

    if issues.iter().any(ValidationIssue::is_error) {
        return Err(LoadError::Invalid {
            path: path.to_path_buf(),
            issues,
        });
    }
    for issue in &issues {
        warn!(file = %path.display(), "{}", issue);
    }

    info!(file = %path.display(), id = document.id(), "loaded {}", document.summary());
    Ok(document)
}

/// Read and parse a document without validating it.
pub fn read_document(path: &Path) -> Result<Document, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document_str(&content, path)
}

/// Parse a JSON document from memory. `source` is only used in errors.
pub fn parse_document_str(content: &str, source: &Path) -> Result<Document, LoadError> {
    serde_json::from_str(content).map_err(|err| LoadError::Parse {
        path: source.to_path_buf(),
        source: err,
    })
}

/// All `*.json` files in `dir`, sorted by file name.
pub fn json_files_in(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let read_err = |source: std::io::Error| LoadError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load and validate every document in `dir`.
pub fn load_directory(dir: &Path) -> Result<Vec<Document>, LoadError> {
    json_files_in(dir)?.iter().map(load_document).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CorrectAnswer, Selection};

    const SECTION: &str = r#"{
        "kind": "section",
        "id": "capacitors-1",
        "title": "Capacitors in AC circuits",
        "quickChecks": [
            {
                "id": "cap-unit",
                "question": "What is the SI unit of capacitance?",
                "options": ["Henry", "Farad", "Ohm"],
                "correctIndex": 1,
                "explanation": "Capacitance is measured in farads."
            }
        ],
        "quiz": {
            "title": "Section 1 Knowledge Check",
            "questions": [
                {
                    "id": 1,
                    "question": "Which unit is used for capacitance?",
                    "options": ["Henry (H)", "Farad (F)", "Tesla (T)"],
                    "correctAnswer": { "byValue": "Farad (F)" },
                    "explanation": "The farad is the SI unit of capacitance."
                }
            ]
        }
    }"#;

    #[test]
    fn parse_valid_section() {
        let doc = parse_document_str(SECTION, Path::new("inline.json")).unwrap();
        let Document::Section(section) = doc else {
            panic!("expected a section");
        };
        assert_eq!(section.quick_checks.len(), 1);
        let quiz = section.quiz.unwrap();
        assert_eq!(quiz.questions[0].correct, CorrectAnswer::ByValue("Farad (F)".to_string()));
        assert!(quiz.questions[0].evaluate(Selection::Value("Farad (F)")).is_correct);
    }

    #[test]
    fn parse_malformed_json() {
        let err = parse_document_str("{ not json", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().starts_with("failed to parse bad.json"));
    }

    #[test]
    fn duck_typed_correct_answer_is_rejected() {
        let json = SECTION.replace(r#"{ "byValue": "Farad (F)" }"#, "1");
        let err = parse_document_str(&json, Path::new("legacy.json")).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn load_rejects_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, SECTION.replace("\"correctIndex\": 1", "\"correctIndex\": 5")).unwrap();

        match load_document(&path) {
            Err(LoadError::Invalid { issues, .. }) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].location.as_deref(), Some("cap-unit"));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn load_rejects_missing_explanation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terse.json");
        fs::write(
            &path,
            r#"{
                "kind": "section",
                "id": "terse",
                "title": "Terse",
                "quiz": {
                    "questions": [{
                        "id": 1,
                        "question": "Q",
                        "options": ["a", "b"],
                        "correctAnswer": { "byIndex": 0 }
                    }]
                }
            }"#,
        )
        .unwrap();

        match load_document(&path) {
            Err(LoadError::Invalid { issues, .. }) => {
                assert_eq!(issues.len(), 1);
                assert!(issues[0].is_error());
                assert_eq!(issues[0].message, "explanation is empty");
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn loaded_questions_always_explain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("section.json");
        fs::write(&path, SECTION).unwrap();

        let Document::Section(section) = load_document(&path).unwrap() else {
            panic!("expected a section");
        };
        for question in section.quiz.unwrap().questions {
            for index in 0..question.options.len() {
                assert!(!question.evaluate(Selection::Index(index)).explanation.is_empty());
            }
        }
    }

    #[test]
    fn load_missing_file() {
        let err = load_document("does/not/exist.json").unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn load_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), SECTION.replace("capacitors-1", "b")).unwrap();
        fs::write(dir.path().join("a.json"), SECTION.replace("capacitors-1", "a")).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let docs = load_directory(dir.path()).unwrap();
        let ids: Vec<&str> = docs.iter().map(Document::id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
