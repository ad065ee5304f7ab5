use std::fmt::Write as _;

use exam_core::model::{AnsweredQuestion, DetailKind, SessionResult, SessionStatus};
use exam_core::time::format_elapsed;
use services::{ExamView, QuestionView};

pub(crate) fn render_view(view: &ExamView) -> String {
    let mut out = String::new();
    let progress = &view.progress;
    let _ = writeln!(
        out,
        "{} | answered {}/{} | Time: {}",
        view.title,
        progress.answered,
        progress.total,
        format_elapsed(progress.elapsed_secs)
    );

    match (&view.current, progress.index) {
        (Some(question), Some(index)) => {
            let _ = writeln!(out, "\nQuestion {}/{}", index + 1, progress.total);
            render_question(&mut out, question);
        }
        _ => {
            let _ = writeln!(out, "\nThis question set has no questions.");
        }
    }

    if progress.status == SessionStatus::Submitted {
        if let Some(result) = &view.result {
            render_result(&mut out, result, view.detail);
        }
    }
    out
}

fn render_question(out: &mut String, question: &QuestionView) {
    let _ = writeln!(out, "{}", question.body);
    for option in &question.options {
        let selected = if question.selected == Some(option.id) {
            '>'
        } else {
            ' '
        };
        let verdict = match question.correct {
            Some(correct) if correct == option.id => "  (correct)",
            _ => "",
        };
        let _ = writeln!(out, " {selected} {}. {}{verdict}", option.id, option.text);
    }
}

fn render_result(out: &mut String, result: &SessionResult, detail: Option<DetailKind>) {
    let _ = writeln!(
        out,
        "\nScore: {}/{} ({}%) in {}",
        result.score(),
        result.total(),
        result.percentage(),
        format_elapsed(result.elapsed_secs())
    );
    let _ = writeln!(
        out,
        "Correct: {}  Incorrect: {}  Unanswered: {}",
        result.correctly_answered().len(),
        result.incorrectly_answered().len(),
        (result.total() as usize).saturating_sub(result.answered())
    );

    if let Some(kind) = detail {
        let heading = match kind {
            DetailKind::Correct => "Correctly answered",
            DetailKind::Incorrect => "Incorrectly answered",
        };
        let _ = writeln!(out, "\n{heading}:");
        let entries = result.detail(kind);
        if entries.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for entry in entries {
            render_entry(out, entry);
        }
    }
}

fn render_entry(out: &mut String, entry: &AnsweredQuestion) {
    if entry.is_correct() {
        let _ = writeln!(out, "  {}: {}", entry.question_id, entry.selected);
    } else {
        let _ = writeln!(
            out,
            "  {}: chose {}, answer {}",
            entry.question_id, entry.selected, entry.correct
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{
        AnswerOption, ExamSession, OptionLabel, Question, QuestionId, QuestionSet, QuestionSetId,
    };
    use exam_core::time::fixed_clock;
    use std::sync::Arc;

    fn session(count: usize) -> ExamSession {
        let questions = (1..=count)
            .map(|n| {
                let options = OptionLabel::ALL.map(|label| {
                    AnswerOption::new(label, format!("opt {label}"), label == OptionLabel::B)
                });
                Question::new(QuestionId::new(format!("q{n}")).unwrap(), format!("Q{n}?"), options)
                    .unwrap()
            })
            .collect();
        let set = QuestionSet::new(QuestionSetId::new("s").unwrap(), "Demo", questions).unwrap();
        ExamSession::new(Arc::new(set), fixed_clock())
    }

    #[test]
    fn in_progress_view_marks_selection_only() {
        let mut session = session(2);
        session.select_current(OptionLabel::C).unwrap();
        for _ in 0..65 {
            session.tick();
        }

        let out = render_view(&ExamView::from_session(&session));
        assert!(out.contains("Demo | answered 1/2 | Time: 1:05"));
        assert!(out.contains("Question 1/2"));
        assert!(out.contains(" > C. opt C"));
        assert!(!out.contains("(correct)"));
    }

    #[test]
    fn submitted_view_shows_score_and_detail() {
        let mut session = session(2);
        session.select_current(OptionLabel::A).unwrap();
        session.submit();
        session.reveal_detail(DetailKind::Incorrect).unwrap();

        let out = render_view(&ExamView::from_session(&session));
        assert!(out.contains("Score: 0/2 (0%)"));
        assert!(out.contains("Unanswered: 1"));
        assert!(out.contains("q1: chose A, answer B"));
        assert!(out.contains("B. opt B  (correct)"));
    }

    #[test]
    fn empty_set_says_so() {
        let out = render_view(&ExamView::from_session(&session(0)));
        assert!(out.contains("no questions"));
    }
}
