use std::fmt;

use exam_core::model::{
    AnswerLedger, AttemptSummary, Exam, ExamResult, OptionLabel, Question, ResumeSnapshot,
};
use exam_core::timer::{CountdownTimer, TimerTick};

use crate::error::SessionError;

/// How often an in-progress timed attempt is snapshotted.
pub const SAVE_INTERVAL_SECS: u32 = 10;

//
// ─── STAGES AND ACTIONS ───────────────────────────────────────────────────────
//

/// The four mutually exclusive screens a session can present, plus the
/// transient `Loading` it is born in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    Loading,
    Exam,
    Practice,
    Results,
    Solution,
}

/// What the caller wants from a new session.
#[derive(Debug, Clone)]
pub enum SessionAction {
    /// Fresh timed attempt.
    Start,
    /// Restore a timed attempt from the device snapshot when possible,
    /// silently falling back to `Start` otherwise.
    Resume,
    /// Re-enter a previously submitted attempt at its results.
    Result(ExamResult),
    /// Untimed practice run; never submits and never touches the
    /// resume store.
    Practice,
}

/// Outcome of one session tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTick {
    /// No live timer (practice/results, submission in flight, or
    /// already expired).
    Idle,
    /// Countdown advanced; `save_due` asks the owner to snapshot now.
    Running { remaining: u32, save_due: bool },
    /// The timer just hit zero. Reported exactly once; the ledger is
    /// frozen from here on.
    TimeUp,
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// State machine for one attempt at one exam.
///
/// Owns the answer ledger and the countdown exclusively; every mutation
/// goes through the event methods below, which run as discrete
/// non-overlapping handlers. Pure in-memory state: all I/O (snapshot
/// save/load, result persistence) lives in `SessionService`.
pub struct ExamSession {
    exam: Exam,
    stage: SessionStage,
    current_index: usize,
    ledger: AnswerLedger,
    timer: Option<CountdownTimer>,
    final_result: Option<ExamResult>,
    submitting: bool,
    legacy_answers: bool,
    ticks_since_save: u32,
}

impl ExamSession {
    /// Initializes session state for the given entry action.
    ///
    /// `snapshot` is only consulted for `SessionAction::Resume`; a
    /// missing or mismatched snapshot degrades to the `Start` behavior
    /// rather than failing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` when the exam has an empty
    /// question list. This is the fatal content-error path: no stage
    /// beyond `Loading` is ever reached.
    pub fn new(
        exam: Exam,
        action: SessionAction,
        snapshot: Option<ResumeSnapshot>,
    ) -> Result<Self, SessionError> {
        if exam.question_count() == 0 {
            return Err(SessionError::NoQuestions);
        }

        let mut session = Self {
            ledger: AnswerLedger::blank(exam.question_count()),
            exam,
            stage: SessionStage::Loading,
            current_index: 0,
            timer: None,
            final_result: None,
            submitting: false,
            legacy_answers: false,
            ticks_since_save: 0,
        };

        match action {
            SessionAction::Start => session.enter_fresh_attempt(),
            SessionAction::Resume => match snapshot {
                Some(snap)
                    if snap.exam_id == session.exam.id()
                        && snap.ledger.len() == session.exam.question_count() =>
                {
                    session.current_index = snap.current_index.min(session.last_index());
                    session.ledger = snap.ledger;
                    session.timer = Some(CountdownTimer::from_remaining(snap.seconds_remaining));
                    session.stage = SessionStage::Exam;
                }
                _ => session.enter_fresh_attempt(),
            },
            SessionAction::Result(result) => {
                session.adopt_result_ledger(&result);
                session.final_result = Some(result);
                session.stage = SessionStage::Results;
            }
            SessionAction::Practice => {
                session.stage = SessionStage::Practice;
            }
        }

        Ok(session)
    }

    fn enter_fresh_attempt(&mut self) {
        self.current_index = 0;
        self.ledger = AnswerLedger::blank(self.exam.question_count());
        self.timer = Some(CountdownTimer::new(self.exam.duration_seconds()));
        self.stage = SessionStage::Exam;
    }

    fn adopt_result_ledger(&mut self, result: &ExamResult) {
        match result.answers() {
            Some(answers) if answers.len() == self.exam.question_count() => {
                self.ledger = answers.clone();
                self.legacy_answers = false;
            }
            _ => {
                // Older results were stored without the ledger.
                self.ledger = AnswerLedger::blank(self.exam.question_count());
                self.legacy_answers = true;
            }
        }
    }

    fn last_index(&self) -> usize {
        self.exam.question_count() - 1
    }

    /// Ledger mutations and navigation are refused outside the live
    /// stages, once the timer has expired, and while a submission is in
    /// flight.
    fn interactions_locked(&self) -> bool {
        if self.submitting {
            return true;
        }
        match self.stage {
            SessionStage::Exam => self.timer.is_some_and(|t| t.is_expired()),
            SessionStage::Practice => false,
            _ => true,
        }
    }

    //
    // ─── ACCESSORS ────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    #[must_use]
    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.exam.question(self.current_index)
    }

    #[must_use]
    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.timer.map(|t| t.remaining())
    }

    /// True once the countdown has hit zero.
    #[must_use]
    pub fn time_up(&self) -> bool {
        self.timer.is_some_and(|t| t.is_expired())
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// True when the solution ledger had to be synthesized because the
    /// stored result predates ledger persistence.
    #[must_use]
    pub fn legacy_answers(&self) -> bool {
        self.legacy_answers
    }

    #[must_use]
    pub fn final_result(&self) -> Option<&ExamResult> {
        self.final_result.as_ref()
    }

    #[must_use]
    pub fn attempt_summary(&self) -> AttemptSummary {
        self.ledger.summary()
    }

    //
    // ─── LIVE-ATTEMPT EVENTS ──────────────────────────────────────────────
    //

    /// Selects/toggles an answer on the current question. Returns
    /// `false` when the interaction is locked.
    pub fn select_answer(&mut self, label: OptionLabel) -> bool {
        if self.interactions_locked() {
            return false;
        }
        self.ledger.select_answer(self.current_index, label)
    }

    /// Cycles the review mark on the current question. Returns `false`
    /// when the interaction is locked.
    pub fn toggle_mark(&mut self) -> bool {
        if self.interactions_locked() {
            return false;
        }
        self.ledger.toggle_mark(self.current_index)
    }

    /// Jumps to a question by palette index. Returns `false` when out
    /// of range or locked.
    pub fn goto(&mut self, index: usize) -> bool {
        if self.interactions_locked() || index >= self.exam.question_count() {
            return false;
        }
        self.current_index = index;
        true
    }

    pub fn next(&mut self) -> bool {
        let target = self.current_index + 1;
        target <= self.last_index() && self.goto(target)
    }

    pub fn previous(&mut self) -> bool {
        self.current_index > 0 && self.goto(self.current_index - 1)
    }

    /// Advances the countdown by one second.
    ///
    /// Only meaningful in the `Exam` stage; everywhere else (and while
    /// a submission is outstanding, which conceptually pauses the
    /// clock) the tick is `Idle`. Every `SAVE_INTERVAL_SECS` running
    /// ticks, `save_due` asks the owner to persist a snapshot.
    pub fn tick(&mut self) -> SessionTick {
        if self.stage != SessionStage::Exam || self.submitting {
            return SessionTick::Idle;
        }
        let Some(timer) = self.timer.as_mut() else {
            return SessionTick::Idle;
        };

        match timer.tick() {
            TimerTick::Running(remaining) => {
                self.ticks_since_save += 1;
                let save_due = self.ticks_since_save >= SAVE_INTERVAL_SECS;
                if save_due {
                    self.ticks_since_save = 0;
                }
                SessionTick::Running { remaining, save_due }
            }
            TimerTick::Expired => SessionTick::TimeUp,
            TimerTick::Stopped => SessionTick::Idle,
        }
    }

    /// Snapshot of the live attempt for the resume store; `None`
    /// outside the `Exam` stage.
    #[must_use]
    pub fn snapshot(&self) -> Option<ResumeSnapshot> {
        if self.stage != SessionStage::Exam {
            return None;
        }
        Some(ResumeSnapshot::new(
            self.exam.id(),
            self.current_index,
            self.ledger.clone(),
            self.remaining_seconds().unwrap_or(0),
        ))
    }

    //
    // ─── SUBMISSION TRANSITIONS ───────────────────────────────────────────
    //

    /// Marks a submission as in flight, blocking further interaction.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidStage` outside the `Exam` stage
    /// and `SessionError::SubmissionInFlight` when one is outstanding.
    pub fn begin_submit(&mut self) -> Result<(), SessionError> {
        if self.stage != SessionStage::Exam {
            return Err(SessionError::InvalidStage);
        }
        if self.submitting {
            return Err(SessionError::SubmissionInFlight);
        }
        self.submitting = true;
        Ok(())
    }

    /// Rolls back a failed submission: ledger, index, and timer are
    /// untouched, so the user can retry.
    pub fn fail_submit(&mut self) {
        self.submitting = false;
    }

    /// Finalizes a successful submission and moves to the results
    /// screen. The result is immutable from here on.
    pub fn complete_submit(&mut self, result: ExamResult) {
        self.submitting = false;
        self.final_result = Some(result);
        self.stage = SessionStage::Results;
    }

    //
    // ─── REVIEW TRANSITIONS ───────────────────────────────────────────────
    //

    /// Moves from results to the solution review, loading the result's
    /// stored ledger (or a synthesized blank one for legacy results).
    ///
    /// Returns `true` when the ledger had to be synthesized, so the
    /// screen can show the "detailed answers unavailable" notice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidStage` unless the session sits at
    /// `Results` with a final result.
    pub fn view_solutions(&mut self) -> Result<bool, SessionError> {
        if self.stage != SessionStage::Results {
            return Err(SessionError::InvalidStage);
        }
        let Some(result) = self.final_result.take() else {
            return Err(SessionError::InvalidStage);
        };
        self.adopt_result_ledger(&result);
        self.final_result = Some(result);
        self.current_index = 0;
        self.stage = SessionStage::Solution;
        Ok(self.legacy_answers)
    }

    /// Returns from the solution review to the results screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidStage` outside `Solution`.
    pub fn back_to_results(&mut self) -> Result<(), SessionError> {
        if self.stage != SessionStage::Solution {
            return Err(SessionError::InvalidStage);
        }
        self.stage = SessionStage::Results;
        Ok(())
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("exam_id", &self.exam.id())
            .field("stage", &self.stage)
            .field("current_index", &self.current_index)
            .field("ledger_len", &self.ledger.len())
            .field("remaining", &self.remaining_seconds())
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
