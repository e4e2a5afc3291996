//! Error types for the timetable model.

use chrono::{NaiveTime, Weekday};
use thiserror::Error;

/// Errors returned by courses, sections, time slots and the weekly index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimetableError {
    /// A time slot must end after it starts
    #[error("Invalid interval: {start} is not before {end}")]
    InvalidInterval { start: NaiveTime, end: NaiveTime },

    /// Removal of something that isn't there
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Day value outside of the seven weekdays
    #[error("Invalid weekday: {value}")]
    InvalidWeekday { value: String },

    /// An unregister expected an entry the index doesn't hold
    #[error("Inconsistent state: no {section} of {course} (slot #{slot}) on {weekday}")]
    InconsistentState {
        course: String,
        section: String,
        slot: usize,
        weekday: Weekday,
    },

    /// Unreadable meeting line
    #[error("Invalid meeting \"{line}\": {reason}")]
    InvalidMeeting { line: String, reason: String },
}

impl TimetableError {
    /// Returns true if the error comes from user input rather than from a
    /// misuse of the index.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TimetableError::InvalidInterval { .. }
                | TimetableError::InvalidWeekday { .. }
                | TimetableError::InvalidMeeting { .. }
        )
    }
}

pub type Result<T, E = TimetableError> = std::result::Result<T, E>;
