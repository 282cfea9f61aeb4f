//! Two-stage spaced repetition scheduler.
//!
//! Cards start in the learning stage with ease 1. A first correct answer
//! doubles the ease and brings the card back a minute later; a second one
//! graduates it to the review stage. In review, each correct answer pushes
//! the due date out along a power curve of the ease and then doubles it,
//! while a wrong answer brings the card back within a minute and resets the
//! ease, counting a lapse if the ease had grown.

use crate::types::{Card, Stage};
use chrono::{DateTime, Duration, Utc};

/// What a grading event did to a card beyond the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeOutcome {
    /// The card moved from learning to review.
    pub graduated: bool,
    /// A review card with grown ease was answered wrong.
    pub lapsed: bool,
}

/// Scheduling policy with its constants.
///
/// `Scheduler::default()` is the published policy: 1 minute short delay,
/// 4 hour graduation delay, review due date `4h * ease^1.1`.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Delay after a learning step or any wrong answer.
    pub short_delay: Duration,
    /// Delay applied when a card graduates to review.
    pub initial_review_delay: Duration,
    /// Base interval of the review curve.
    pub review_base: Duration,
    pub review_exponent: f64,
    pub learning_growth: f64,
    pub review_growth: f64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            short_delay: Duration::minutes(1),
            initial_review_delay: Duration::hours(4),
            review_base: Duration::hours(4),
            review_exponent: 1.1,
            learning_growth: 2.0,
            review_growth: 2.0,
        }
    }
}

impl Scheduler {
    /// Apply a grading event using the entry point for the card's stage.
    pub fn grade(&self, card: &mut Card, correct: bool, now: DateTime<Utc>) -> GradeOutcome {
        match card.stage {
            Stage::Learning => self.update_learning(card, correct, now),
            Stage::Review => self.update_review(card, correct, now),
        }
    }

    /// Learning-stage update.
    pub fn update_learning(&self, card: &mut Card, correct: bool, now: DateTime<Utc>) -> GradeOutcome {
        let mut outcome = GradeOutcome::default();
        card.last_review_date = Some(now);

        if correct {
            card.correct += 1;
            if card.ease > 1 {
                // Graduation keeps the ease as is.
                card.ease = next_ease(card.ease, 1.0);
                card.stage = Stage::Review;
                card.review_due_date = add_clamped(now, self.initial_review_delay);
                outcome.graduated = true;
            } else {
                card.ease = next_ease(card.ease, self.learning_growth);
                card.review_due_date = add_clamped(now, self.short_delay);
            }
        } else {
            card.incorrect += 1;
            card.ease = 1;
            card.review_due_date = add_clamped(now, self.short_delay);
        }

        outcome
    }

    /// Review-stage update. The card never leaves the review stage.
    pub fn update_review(&self, card: &mut Card, correct: bool, now: DateTime<Utc>) -> GradeOutcome {
        let mut outcome = GradeOutcome::default();
        card.last_review_date = Some(now);

        if correct {
            card.correct += 1;
            // Due date from the ease the card arrived with, then grow it.
            card.review_due_date = self.next_review_due(card.ease, now);
            card.ease = next_ease(card.ease, self.review_growth);
        } else {
            card.incorrect += 1;
            card.review_due_date = add_clamped(now, self.short_delay);
            if card.ease != 1 {
                card.lapses += 1;
                card.ease = 1;
                outcome.lapsed = true;
            }
        }

        outcome
    }

    /// Interval of the review curve for the given ease, at whole seconds.
    pub fn review_interval(&self, ease: u32) -> Duration {
        let base = self.review_base.num_seconds() as f64;
        let factor = f64::from(ease.max(1)).powf(self.review_exponent);
        Duration::seconds((base * factor) as i64)
    }

    /// Due date of a review card answered correctly at `now` with `ease`.
    pub fn next_review_due(&self, ease: u32, now: DateTime<Utc>) -> DateTime<Utc> {
        add_clamped(now, self.review_interval(ease))
    }
}

/// `ceil(ease * growth)`, never below 1.
pub fn next_ease(ease: u32, growth: f64) -> u32 {
    let next = (f64::from(ease) * growth).ceil();
    // `as` saturates at u32::MAX
    (next as u32).max(1)
}

fn add_clamped(now: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
    now.checked_add_signed(delay)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
