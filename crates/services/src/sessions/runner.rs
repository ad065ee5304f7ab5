use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use exam_core::model::{
    DetailKind, Direction, ExamError, ExamSession, OptionLabel, QuestionId, QuestionSet,
    SessionProgress, SessionResult,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::view::ExamView;
use crate::Clock;
use crate::config::EngineConfig;

/// Drives one `ExamSession` with a live elapsed-time ticker.
///
/// Every operation goes through the same mutex, so the ticker and the caller
/// never mutate the session concurrently. The ticker is armed while the
/// attempt is in progress, stopped on submit and re-armed on retry.
///
/// The ticker needs a tokio runtime. Outside one the runner still works, but
/// elapsed time stays at zero.
pub struct ExamRunner {
    session: Arc<Mutex<ExamSession>>,
    tick_interval: Duration,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl ExamRunner {
    #[must_use]
    pub fn start(questions: Arc<QuestionSet>, clock: Clock, config: &EngineConfig) -> Self {
        let session = ExamSession::new(questions, clock);
        info!(
            set_id = %session.question_set().id(),
            questions = session.total_questions(),
            attempt_id = %session.attempt_id(),
            "exam attempt started"
        );

        let runner = Self {
            session: Arc::new(Mutex::new(session)),
            tick_interval: config.tick_interval,
            ticker: Mutex::new(None),
        };
        runner.arm_ticker();
        runner
    }

    /// Run `f` against the session under the lock.
    pub fn with_session<R>(&self, f: impl FnOnce(&ExamSession) -> R) -> R {
        f(&*lock(&self.session))
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.with_session(ExamSession::progress)
    }

    #[must_use]
    pub fn result(&self) -> Option<SessionResult> {
        self.with_session(|session| session.result().cloned())
    }

    #[must_use]
    pub fn view(&self) -> ExamView {
        self.with_session(ExamView::from_session)
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.with_session(ExamSession::elapsed_secs)
    }

    /// Whether a ticker task is currently counting for this attempt.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        lock(&self.ticker)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// # Errors
    ///
    /// See `ExamSession::select_answer`.
    pub fn select_answer(
        &self,
        question_id: &QuestionId,
        label: OptionLabel,
    ) -> Result<Option<OptionLabel>, ExamError> {
        let result = lock(&self.session).select_answer(question_id, label);
        log_rejection("select_answer", &result);
        result
    }

    /// # Errors
    ///
    /// See `ExamSession::select_answer_str`.
    pub fn select_answer_str(
        &self,
        question_id: &QuestionId,
        raw: &str,
    ) -> Result<Option<OptionLabel>, ExamError> {
        let result = lock(&self.session).select_answer_str(question_id, raw);
        log_rejection("select_answer", &result);
        result
    }

    /// # Errors
    ///
    /// See `ExamSession::select_current`.
    pub fn select_current(&self, label: OptionLabel) -> Result<Option<OptionLabel>, ExamError> {
        let result = lock(&self.session).select_current(label);
        log_rejection("select_current", &result);
        result
    }

    pub fn navigate(&self, direction: Direction) -> Option<usize> {
        lock(&self.session).navigate(direction)
    }

    pub fn jump_to(&self, index: usize) -> Option<usize> {
        lock(&self.session).jump_to(index)
    }

    /// Submit the attempt and stop the ticker. Repeated calls return the same
    /// frozen result.
    pub fn submit(&self) -> Option<SessionResult> {
        let (result, transitioned) = {
            let mut session = lock(&self.session);
            let was_submitted = session.is_submitted();
            let result = session.submit().cloned();
            (result, !was_submitted && session.is_submitted())
        };

        if transitioned {
            self.stop_ticker();
            if let Some(result) = &result {
                info!(
                    attempt_id = %result.attempt_id(),
                    score = result.score(),
                    total = result.total(),
                    percentage = result.percentage(),
                    elapsed_secs = result.elapsed_secs(),
                    "exam attempt submitted"
                );
            }
        }
        result
    }

    /// Start a fresh attempt over the same questions. Only valid after submit.
    pub fn retry(&self) -> bool {
        let attempt_id = {
            let mut session = lock(&self.session);
            if !session.retry() {
                debug!("retry ignored: attempt not submitted");
                return false;
            }
            session.attempt_id()
        };

        info!(attempt_id = %attempt_id, "exam attempt restarted");
        self.arm_ticker();
        true
    }

    /// # Errors
    ///
    /// See `ExamSession::reveal_detail`.
    pub fn reveal_detail(&self, kind: DetailKind) -> Result<Option<DetailKind>, ExamError> {
        lock(&self.session).reveal_detail(kind)
    }

    fn arm_ticker(&self) {
        if !self.with_session(ExamSession::has_content) {
            debug!("no questions; ticker not armed");
            return;
        }
        let Ok(runtime) = Handle::try_current() else {
            warn!("no tokio runtime; ticker not armed");
            return;
        };
        let handle = spawn_ticker(&runtime, Arc::downgrade(&self.session), self.tick_interval);
        if let Some(previous) = lock(&self.ticker).replace(handle) {
            previous.abort();
        }
        debug!(period = ?self.tick_interval, "ticker armed");
    }

    fn stop_ticker(&self) {
        if let Some(handle) = lock(&self.ticker).take() {
            handle.abort();
            debug!("ticker stopped");
        }
    }
}

impl Drop for ExamRunner {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.ticker).take() {
            handle.abort();
        }
    }
}

impl fmt::Debug for ExamRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamRunner")
            .field("session", &*lock(&self.session))
            .field("tick_interval", &self.tick_interval)
            .field("ticking", &self.is_ticking())
            .finish()
    }
}

fn spawn_ticker(
    runtime: &Handle,
    session: Weak<Mutex<ExamSession>>,
    period: Duration,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let Some(live) = session.upgrade() else {
                break;
            };
            if !lock(&live).tick() {
                break;
            }
        }
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn log_rejection<T>(operation: &'static str, result: &Result<T, ExamError>) {
    if let Err(err) = result {
        debug!(operation, error = %err, "operation rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{AnswerOption, Question, QuestionSetId};
    use exam_core::time::fixed_clock;

    fn question_set(count: usize) -> Arc<QuestionSet> {
        let questions = (1..=count)
            .map(|n| {
                let options = OptionLabel::ALL
                    .map(|label| AnswerOption::new(label, label.as_str(), label == OptionLabel::A));
                Question::new(QuestionId::new(format!("q{n}")).unwrap(), "body", options).unwrap()
            })
            .collect();
        Arc::new(QuestionSet::new(QuestionSetId::new("set").unwrap(), "Set", questions).unwrap())
    }

    fn runner(count: usize) -> ExamRunner {
        ExamRunner::start(question_set(count), fixed_clock(), &EngineConfig::default())
    }

    #[test]
    fn runner_without_runtime_runs_untimed() {
        let runner = runner(2);
        assert!(!runner.is_ticking());

        runner.select_current(OptionLabel::A).unwrap();
        let result = runner.submit().unwrap();
        assert_eq!(result.score(), 1);
        assert_eq!(result.elapsed_secs(), 0);

        assert!(runner.retry());
        assert!(!runner.is_ticking());
        assert_eq!(runner.progress().answered, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_counts_seconds_while_in_progress() {
        let runner = runner(2);
        assert!(runner.is_ticking());

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(runner.elapsed_secs(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_freezes_elapsed_and_stops_ticker() {
        let runner = runner(2);
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        let result = runner.submit().unwrap();
        assert_eq!(result.elapsed_secs(), 2);
        assert!(!runner.is_ticking());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(runner.elapsed_secs(), 2);
        assert_eq!(runner.submit(), Some(result));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_rearms_a_fresh_ticker() {
        let runner = runner(1);
        tokio::time::sleep(Duration::from_millis(4_500)).await;
        runner.submit();

        assert!(runner.retry());
        assert!(runner.is_ticking());
        assert_eq!(runner.elapsed_secs(), 0);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(runner.elapsed_secs(), 1);
        assert!(!runner.retry());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_set_never_ticks() {
        let runner = runner(0);
        assert!(!runner.is_ticking());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(runner.elapsed_secs(), 0);
        assert!(runner.submit().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn operations_go_through_the_session() {
        let runner = runner(3);
        let q2 = QuestionId::new("q2").unwrap();

        assert_eq!(runner.navigate(Direction::Next), Some(1));
        runner.select_current(OptionLabel::A).unwrap();
        assert!(runner.select_answer_str(&q2, "Z").is_err());
        assert_eq!(runner.jump_to(10), Some(2));
        runner.select_answer(&QuestionId::new("q3").unwrap(), OptionLabel::B).unwrap();

        let result = runner.submit().unwrap();
        assert_eq!(result.score(), 1);
        assert_eq!(result.incorrectly_answered().len(), 1);
        assert_eq!(
            runner.reveal_detail(DetailKind::Incorrect),
            Ok(Some(DetailKind::Incorrect))
        );
        assert_eq!(runner.progress().answered, 2);
    }
}
