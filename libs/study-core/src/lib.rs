//! Spaced repetition study engine shared by the backend.
//!
//! Provides:
//! - Two-stage scheduler (learning, review) with a power-curve review interval
//! - Most-due card selection
//! - Multiple-choice distractor sampling
//! - Answer grading
//! - Card store port with an in-memory implementation
//! - Study service exposing the above per request

pub mod batch;
pub mod error;
pub mod grader;
pub mod sampler;
pub mod scheduler;
pub mod selector;
pub mod service;
pub mod store;
pub mod types;

pub use batch::{parse_batch, ParsedBatch};
pub use error::{Result, StudyError};
pub use grader::is_correct;
pub use sampler::{distractor_limit, sample_choices, MAX_DISTRACTORS};
pub use scheduler::{GradeOutcome, Scheduler};
pub use selector::pick_most_due;
pub use service::{AnswerOutcome, BatchReport, Question, StudyService};
pub use store::{CardStore, DeckStore, MemoryStore, Store};
pub use types::{Card, CardEdit, Deck, NewCard, Stage, StudyMode};
