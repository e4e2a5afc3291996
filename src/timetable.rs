use chrono::Weekday;
use tracing::{debug, warn};

use crate::error::{Result, TimetableError};
use crate::utils::{
    self, format_duration, format_time_slot, weekday_from_number,
    models::{Position, TabChar},
};

pub mod models;

use models::{Course, Section, TimeSlot};

/// The seven weekdays, in the order of the buckets
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Where an entry of a bucket comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Origin {
    /// Code of the registered course, i.e.: CPSC 210
    pub course: String,

    /// Position of the slot in its section
    pub slot: usize,
}

/// Sections on the calendar, bucketed by the weekday they meet on.
///
/// Every weekday always has a bucket. A section appears in a bucket once per
/// slot recurring on that day, so a section meeting twice on Monday is listed
/// twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeeklyIndex {
    days: [Vec<Section>; 7],

    /// Same shape as `days`, one origin per entry
    origins: [Vec<Origin>; 7],
}

/// Every (weekday, section, slot position) a course puts on the calendar, in
/// section order, then slot order, then the slot's own weekday order
fn occurrences(course: &Course) -> impl Iterator<Item = (Weekday, &Section, usize)> {
    course.sections().iter().flat_map(|section| {
        section
            .time_slots()
            .iter()
            .enumerate()
            .flat_map(move |(position, slot)| {
                slot.weekdays()
                    .iter()
                    .map(move |day| (*day, section, position))
            })
    })
}

fn slot_of(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

impl WeeklyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put every section of the course under each day its slots recur on
    pub fn register(&mut self, course: &Course) {
        let code = course.code();
        let mut count = 0;
        for (day, section, position) in occurrences(course) {
            self.days[slot_of(day)].push(section.clone());
            self.origins[slot_of(day)].push(Origin {
                course: code.clone(),
                slot: position,
            });
            count += 1;
        }

        debug!(course = %code, entries = count, "Registered course");
    }

    /// Undo a previous `register` of the same course.
    ///
    /// Each expected entry is removed once, starting from the end of the
    /// bucket, so registering then unregistering leaves buckets as they were.
    /// Nothing is changed if any entry is missing.
    ///
    /// # Errors
    ///
    /// `InconsistentState` naming the first (section, slot, weekday) the index
    /// doesn't hold for this course.
    pub fn unregister(&mut self, course: &Course) -> Result<()> {
        let code = course.code();
        let mut days = self.days.clone();
        let mut origins = self.origins.clone();

        for (day, section, position) in occurrences(course) {
            let bucket = &mut days[slot_of(day)];
            let from = &mut origins[slot_of(day)];
            let Some(index) = (0..bucket.len()).rev().find(|&i| {
                bucket[i] == *section && from[i].course == code && from[i].slot == position
            }) else {
                warn!(
                    course = %code,
                    section = section.identifier(),
                    slot = position,
                    weekday = %day,
                    "Unregister rejected, entry is missing"
                );
                return Err(TimetableError::InconsistentState {
                    course: code,
                    section: section.identifier().to_owned(),
                    slot: position,
                    weekday: day,
                });
            };
            bucket.remove(index);
            from.remove(index);
        }

        self.days = days;
        self.origins = origins;
        debug!(course = %code, "Unregistered course");

        Ok(())
    }

    /// Sections meeting on that day
    pub fn bucket(&self, weekday: Weekday) -> &[Section] {
        &self.days[slot_of(weekday)]
    }

    /// Course and slot behind each entry of `bucket(weekday)`, in the same order
    pub fn origins(&self, weekday: Weekday) -> &[Origin] {
        &self.origins[slot_of(weekday)]
    }

    /// Same as `bucket`, with Monday as 0 and Sunday as 6
    ///
    /// # Errors
    ///
    /// `InvalidWeekday` when `day` is above 6.
    pub fn bucket_at(&self, day: u8) -> Result<&[Section]> {
        Ok(self.bucket(weekday_from_number(day)?))
    }

    /// All the buckets, from Monday to Sunday
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &[Section])> {
        WEEK.iter().map(|day| (*day, self.bucket(*day)))
    }

    /// Number of entries over the whole week
    pub fn len(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }
}

/// One line of the displayed timetable
struct Row<'a> {
    slot: &'a TimeSlot,
    course: &'a str,
    section: &'a Section,
}

/// Entries of a day with the slot that put each of them there, by start time
fn rows(index: &WeeklyIndex, weekday: Weekday) -> Vec<Row<'_>> {
    let mut rows: Vec<_> = index
        .bucket(weekday)
        .iter()
        .zip(index.origins(weekday))
        .filter_map(|(section, origin)| {
            section.time_slots().get(origin.slot).map(|slot| Row {
                slot,
                course: &origin.course,
                section,
            })
        })
        .collect();

    // Stable, ties keep the registration order
    rows.sort_by_key(|row| row.slot.start());

    rows
}

/// Display the timetable
pub fn display(index: &WeeklyIndex) {
    let widths = [11, 13, 7, 16, 10, 10];
    let sep = TabChar::Bv.val();

    // Top of the tab
    utils::line_table(&widths, Position::Top);

    print!("{sep}");
    for (title, width) in ["Day", "Time", "Length", "Course", "Section", "Kind"]
        .iter()
        .zip(widths)
    {
        print!("{title:^width$}{sep}");
    }
    println!();

    for weekday in WEEK {
        utils::line_table(&widths, Position::Middle);

        let rows = rows(index, weekday);
        if rows.is_empty() {
            print!("{sep}{:^w$}{sep}", utils::weekday_name(weekday), w = widths[0]);
            for &width in &widths[1..] {
                print!("{:^width$}{sep}", "");
            }
            println!();
            continue;
        }

        for (i, row) in rows.iter().enumerate() {
            // Only name the day on its first line
            let day = if i == 0 { utils::weekday_name(weekday) } else { "" };
            let length = row
                .slot
                .duration()
                .map_or_else(|_| "?".to_owned(), format_duration);

            println!(
                "{sep}{day:^w0$}{sep}{:^w1$}{sep}{length:^w2$}{sep}{:^w3$}{sep}{:^w4$}{sep}{:^w5$}{sep}",
                format_time_slot(row.slot),
                row.course,
                row.section.identifier(),
                row.section.kind().to_string(),
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3],
                w4 = widths[4],
                w5 = widths[5],
            );
        }
    }

    // Bottom of the table
    utils::line_table(&widths, Position::Bottom);
}
