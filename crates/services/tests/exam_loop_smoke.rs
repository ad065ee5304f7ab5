use std::sync::Arc;
use std::time::Duration;

use exam_core::model::{
    AnswerOption, DetailKind, Direction, OptionLabel, Question, QuestionId, QuestionSet,
    QuestionSetId, SessionStatus,
};
use exam_core::time::fixed_now;
use services::{Clock, EngineConfig, ExamLoopService, SessionError};
use storage::InMemoryRepository;

fn build_set(id: &str, answers: &[OptionLabel]) -> QuestionSet {
    let questions = answers
        .iter()
        .enumerate()
        .map(|(i, answer)| {
            let options = OptionLabel::ALL.map(|label| {
                AnswerOption::new(label, format!("option {label}"), label == *answer)
            });
            Question::new(
                QuestionId::new(format!("q{}", i + 1)).unwrap(),
                format!("Question {}", i + 1),
                options,
            )
            .unwrap()
        })
        .collect();
    QuestionSet::new(QuestionSetId::new(id).unwrap(), "Smoke Set", questions).unwrap()
}

fn loop_service(repo: &InMemoryRepository) -> ExamLoopService {
    ExamLoopService::new(
        Clock::fixed(fixed_now()),
        EngineConfig::default(),
        Arc::new(repo.clone()),
    )
}

#[tokio::test(start_paused = true)]
async fn exam_loop_runs_a_full_attempt() {
    let repo = InMemoryRepository::new();
    repo.upsert_question_set(build_set(
        "smoke",
        &[OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D],
    ))
    .unwrap();
    let svc = loop_service(&repo);

    let runner = svc
        .start_exam(&QuestionSetId::new("smoke").unwrap())
        .await
        .unwrap();

    runner.select_current(OptionLabel::A).unwrap();
    runner.navigate(Direction::Next);
    runner.select_current(OptionLabel::B).unwrap();
    runner.navigate(Direction::Next);
    runner.select_current(OptionLabel::A).unwrap();
    runner.navigate(Direction::Next);

    tokio::time::sleep(Duration::from_millis(65_500)).await;

    let result = runner.submit().expect("result");
    assert_eq!(result.score(), 2);
    assert_eq!(result.total(), 4);
    assert_eq!(result.percentage(), 50);
    assert_eq!(result.correctly_answered().len(), 2);
    assert_eq!(result.incorrectly_answered().len(), 1);
    assert_eq!(result.elapsed_secs(), 65);
    assert_eq!(result.submitted_at(), fixed_now());

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(runner.elapsed_secs(), 65);

    runner.reveal_detail(DetailKind::Incorrect).unwrap();
    let view = runner.view();
    assert_eq!(view.detail, Some(DetailKind::Incorrect));
    assert_eq!(view.progress.status, SessionStatus::Submitted);

    assert!(runner.retry());
    let view = runner.view();
    assert_eq!(view.progress.answered, 0);
    assert_eq!(view.progress.index, Some(0));
    assert!(view.result.is_none());
    assert_ne!(view.attempt_id, result.attempt_id());
}

#[tokio::test]
async fn empty_set_cannot_be_started() {
    let repo = InMemoryRepository::new();
    repo.upsert_question_set(build_set("empty", &[])).unwrap();
    let svc = loop_service(&repo);

    let err = svc
        .start_exam(&QuestionSetId::new("empty").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Empty));
}

#[tokio::test]
async fn unknown_set_surfaces_storage_error() {
    let svc = loop_service(&InMemoryRepository::new());
    let err = svc
        .start_exam(&QuestionSetId::new("missing").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Storage(_)));

    assert!(svc.list_question_sets().await.unwrap().is_empty());
}
