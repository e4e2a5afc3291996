//! Weekly timetable built from course sections and their meeting times.

pub mod error;
pub mod filter;
pub mod timetable;
pub mod utils;

pub use error::{Result, TimetableError};
pub use timetable::{
    models::{Course, Section, SectionKind, TimeSlot},
    Origin, WeeklyIndex,
};
