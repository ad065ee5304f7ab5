use std::path::PathBuf;

use exam_core::model::QuestionSetId;
use storage::repository::{QuestionSetRepository, StorageError};
use storage::FileRepository;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("exam-storage-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn set_toml(id: &str, questions: usize) -> String {
    let mut out = format!("id = \"{id}\"\ntitle = \"Set {id}\"\n");
    for n in 1..=questions {
        out.push_str(&format!(
            "\n[[questions]]\nid = \"q{n}\"\nbody = \"Question {n}\"\nanswer = \"B\"\noptions = [\n  {{ id = \"A\", text = \"a\" }},\n  {{ id = \"B\", text = \"b\" }},\n  {{ id = \"C\", text = \"c\" }},\n  {{ id = \"D\", text = \"d\" }},\n]\n"
        ));
    }
    out
}

#[tokio::test]
async fn directory_loads_valid_sets_and_skips_broken_files() {
    let dir = scratch_dir("dir");
    std::fs::write(dir.join("one.toml"), set_toml("one", 2)).unwrap();
    std::fs::write(dir.join("two.toml"), set_toml("two", 5)).unwrap();
    std::fs::write(dir.join("broken.toml"), "id = \"broken\"\n[[questions]]\n").unwrap();
    std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let repo = FileRepository::open(&dir).await.unwrap();
    let listed = repo.list_question_sets().await.unwrap();

    let ids: Vec<_> = listed.iter().map(|s| s.id.as_str().to_owned()).collect();
    assert_eq!(ids, ["one", "two"]);

    let two = repo
        .get_question_set(&QuestionSetId::new("two").unwrap())
        .await
        .unwrap();
    assert_eq!(two.len(), 5);
    assert_eq!(two.title(), "Set two");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn single_file_repository_serves_one_set() {
    let dir = scratch_dir("single");
    let path = dir.join("solo.toml");
    std::fs::write(&path, set_toml("solo", 3)).unwrap();

    let repo = FileRepository::single(&path).await.unwrap();
    let set = repo
        .get_question_set(&QuestionSetId::new("solo").unwrap())
        .await
        .unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(repo.root(), dir.as_path());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn missing_directory_is_an_io_error() {
    let dir = std::env::temp_dir().join("exam-storage-does-not-exist");
    let err = FileRepository::open(&dir).await.err().unwrap();
    assert!(matches!(err, StorageError::Io { .. }));
}

#[test]
fn bundled_demo_set_is_valid() {
    let set = storage::parse_question_set(include_str!("../../../demos/rust_basics.toml")).unwrap();
    assert_eq!(set.id().as_str(), "rust-basics");
    assert_eq!(set.len(), 4);
}
