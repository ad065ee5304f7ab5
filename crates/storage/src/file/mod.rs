//! TOML-backed question sets.
//!
//! One file per set. A directory is loaded once; files that fail to parse or
//! validate are skipped with a warning so one bad file does not hide the rest.

use async_trait::async_trait;
use exam_core::model::{QuestionSet, QuestionSetId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::repository::{
    InMemoryRepository, QuestionSetRepository, QuestionSetSummary, StorageError,
};

mod mapping;

use mapping::QuestionSetRecord;

/// Parse and validate a question set from TOML text.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed TOML or option labels and
/// `StorageError::Invalid` when the content breaks a question invariant.
pub fn parse_question_set(content: &str) -> Result<QuestionSet, StorageError> {
    let record: QuestionSetRecord =
        toml::from_str(content).map_err(|e| StorageError::Serialization(e.to_string()))?;
    record.into_question_set()
}

/// Read a single question set file.
///
/// # Errors
///
/// Returns `StorageError::Io` if the file cannot be read, plus the errors of
/// `parse_question_set`.
pub async fn load_question_set(path: &Path) -> Result<QuestionSet, StorageError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| io_error(path, source))?;
    let set = parse_question_set(&content)?;
    tracing::debug!(
        path = %path.display(),
        set_id = %set.id(),
        questions = set.len(),
        "loaded question set"
    );
    Ok(set)
}

/// Question sets loaded from a directory of `*.toml` files.
#[derive(Clone)]
pub struct FileRepository {
    root: PathBuf,
    sets: InMemoryRepository,
}

impl FileRepository {
    /// Load every `*.toml` file in `root`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be read. Individual
    /// files that fail to load are logged and skipped.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        let sets = InMemoryRepository::new();

        let mut entries = fs::read_dir(&root)
            .await
            .map_err(|source| io_error(&root, source))?;
        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| io_error(&root, source))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("toml") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            match load_question_set(&path).await {
                Ok(set) => sets.upsert_question_set(set)?,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping question set");
                }
            }
        }

        tracing::info!(root = %root.display(), "question sets loaded");
        Ok(Self { root, sets })
    }

    /// Repository holding exactly one file.
    ///
    /// # Errors
    ///
    /// Same as `load_question_set`.
    pub async fn single(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let set = load_question_set(&path).await?;
        let sets = InMemoryRepository::new();
        sets.upsert_question_set(set)?;
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self { root, sets })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl QuestionSetRepository for FileRepository {
    async fn get_question_set(
        &self,
        id: &QuestionSetId,
    ) -> Result<Arc<QuestionSet>, StorageError> {
        self.sets.get_question_set(id).await
    }

    async fn list_question_sets(&self) -> Result<Vec<QuestionSetSummary>, StorageError> {
        self.sets.list_question_sets().await
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{OptionLabel, QuestionId};

    const ANSWER_KEY: &str = r#"
id = "rust-basics"
title = "Rust basics"

[[questions]]
id = "q1"
body = "<p>Which keyword declares a binding?</p>"
answer = "A"
options = [
  { id = "A", text = "let" },
  { id = "B", text = "mut" },
  { id = "C", text = "var" },
  { id = "D", text = "const" },
]
"#;

    const FLAGGED: &str = r#"
id = "flagged"
title = "Flagged"

[[questions]]
id = "q1"
body = "2 + 2"
options = [
  { id = "A", text = "3" },
  { id = "B", text = "4", is_correct = true },
  { id = "C", text = "5" },
  { id = "D", text = "22" },
]
"#;

    #[test]
    fn parses_answer_key_form() {
        let set = parse_question_set(ANSWER_KEY).unwrap();
        assert_eq!(set.id().as_str(), "rust-basics");
        let question = set.find(&QuestionId::new("q1").unwrap()).unwrap();
        assert_eq!(question.correct_option(), OptionLabel::A);
        assert_eq!(question.option(OptionLabel::C).text, "var");
    }

    #[test]
    fn parses_flagged_option_form() {
        let set = parse_question_set(FLAGGED).unwrap();
        assert_eq!(set.questions()[0].correct_option(), OptionLabel::B);
    }

    #[test]
    fn rejects_question_without_correct_option() {
        let content = FLAGGED.replace(", is_correct = true", "");
        let err = parse_question_set(&content).unwrap_err();
        assert!(matches!(err, StorageError::Invalid(_)));
    }

    #[test]
    fn rejects_conflicting_answer_and_flag() {
        let content = FLAGGED.replace("body = \"2 + 2\"", "body = \"2 + 2\"\nanswer = \"C\"");
        let err = parse_question_set(&content).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn rejects_wrong_option_count() {
        let content = ANSWER_KEY.replace("  { id = \"D\", text = \"const\" },\n", "");
        let err = parse_question_set(&content).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(msg) if msg.contains("4 options")));
    }

    #[test]
    fn rejects_unknown_option_label() {
        let content = ANSWER_KEY.replace("id = \"D\"", "id = \"E\"");
        assert!(parse_question_set(&content).is_err());
    }

    #[test]
    fn set_without_questions_is_valid() {
        let set = parse_question_set("id = \"empty\"\ntitle = \"Empty\"\n").unwrap();
        assert!(set.is_empty());
    }
}
