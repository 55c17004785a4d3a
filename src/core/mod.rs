pub mod attempt;
pub mod daily;
pub mod entry;
pub mod match_result;

pub use attempt::{Attempt, AttemptGuess, AttemptStatus};
pub use daily::{DailyGuessLog, DailyProgress, DailyStatus, DailyTarget, MAX_WRONG_ATTEMPTS};
pub use entry::{ReferenceEntry, ReferenceSet};
pub use match_result::{GuessFeedback, MatchResult, NoMatchReason};
