use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use course_core::model::{QuestionBank, SectionSlug};
use course_core::quiz::{QuizConfig, QuizSession};
use course_core::scoring::QuizResult;
use course_core::time::Clock;

use crate::catalog::ExamBank;
use crate::error::ExamError;
use crate::sampler::{DifficultyMix, sample_questions};

pub const DEFAULT_EXAM_SIZE: usize = 30;
pub const DEFAULT_PASS_MARK: u8 = 80;

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// One mock exam in progress: a quiz over freshly drawn questions plus its
/// start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamAttempt {
    exam: SectionSlug,
    quiz: QuizSession,
    started_at: DateTime<Utc>,
}

impl ExamAttempt {
    /// Slug of the exam bank the questions were drawn from.
    #[must_use]
    pub fn exam(&self) -> &SectionSlug {
        &self.exam
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizSession {
        &self.quiz
    }

    pub fn quiz_mut(&mut self) -> &mut QuizSession {
        &mut self.quiz
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Outcome of a finished attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamReport {
    pub result: QuizResult,
    pub pass_mark: u8,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl ExamReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.result.passed(self.pass_mark)
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Draws mock exams from a bank and times them.
#[derive(Debug, Clone)]
pub struct ExamService {
    clock: Clock,
    size: usize,
    pass_mark: u8,
    mix: DifficultyMix,
}

impl Default for ExamService {
    fn default() -> Self {
        Self {
            clock: Clock::default(),
            size: DEFAULT_EXAM_SIZE,
            pass_mark: DEFAULT_PASS_MARK,
            mix: DifficultyMix::default(),
        }
    }
}

impl ExamService {
    /// # Errors
    ///
    /// Returns `ExamError::ZeroSize` for an empty exam and
    /// `ExamError::InvalidPassMark` for a pass mark above 100.
    pub fn new(clock: Clock, size: usize, pass_mark: u8) -> Result<Self, ExamError> {
        if size == 0 {
            return Err(ExamError::ZeroSize);
        }
        if pass_mark > 100 {
            return Err(ExamError::InvalidPassMark {
                provided: pass_mark,
            });
        }
        Ok(Self {
            clock,
            size,
            pass_mark,
            mix: DifficultyMix::default(),
        })
    }

    #[must_use]
    pub fn with_mix(mut self, mix: DifficultyMix) -> Self {
        self.mix = mix;
        self
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn pass_mark(&self) -> u8 {
        self.pass_mark
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Start an attempt with a thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Quiz` when the bank is empty.
    pub fn start(&self, exam: &ExamBank) -> Result<ExamAttempt, ExamError> {
        self.start_with_rng(exam, &mut rand::rng())
    }

    /// Start an attempt, drawing questions with `rng`.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Quiz` when the bank is empty.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &self,
        exam: &ExamBank,
        rng: &mut R,
    ) -> Result<ExamAttempt, ExamError> {
        let drawn = sample_questions(exam.bank(), self.size, self.mix, rng);
        // Drawn records come from a bank with unique ids, so this cannot collide.
        let bank = QuestionBank::new(drawn).unwrap_or_default();
        let quiz = QuizSession::new(exam.title(), bank, QuizConfig::default())?;
        log::info!(
            "mock exam {:?} started with {} of {} question(s)",
            exam.title(),
            quiz.len(),
            exam.bank().len()
        );
        Ok(ExamAttempt {
            exam: exam.slug().clone(),
            quiz,
            started_at: self.clock.now(),
        })
    }

    /// Time elapsed in a running attempt.
    #[must_use]
    pub fn elapsed(&self, attempt: &ExamAttempt) -> Duration {
        self.clock.elapsed_since(attempt.started_at)
    }

    /// Submit the attempt and produce its report.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError::Incomplete` (wrapped in `ExamError::Quiz`) while
    /// questions remain unanswered.
    pub fn submit(&self, attempt: &mut ExamAttempt) -> Result<ExamReport, ExamError> {
        attempt.quiz.submit()?;
        self.report(attempt)
    }

    /// Report for an attempt that is already completed.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotCompleted` while the attempt is in progress.
    pub fn report(&self, attempt: &ExamAttempt) -> Result<ExamReport, ExamError> {
        let result = attempt.quiz.result().ok_or(ExamError::NotCompleted)?;
        let completed_at = self.clock.now();
        let report = ExamReport {
            result,
            pass_mark: self.pass_mark,
            started_at: attempt.started_at,
            completed_at,
            elapsed: self.clock.elapsed_since(attempt.started_at),
        };
        log::info!(
            "mock exam {:?} finished: {} ({}%), passed: {}",
            attempt.quiz.title(),
            result,
            result.percentage().unwrap_or(0),
            report.passed()
        );
        Ok(report)
    }
}
