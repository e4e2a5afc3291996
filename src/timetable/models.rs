use std::{fmt, str::FromStr};

use chrono::{Duration, NaiveTime, Weekday};

use crate::error::{Result, TimetableError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Lecture,
    Lab,
    Tutorial,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lecture => "Lecture",
            Self::Lab => "Lab",
            Self::Tutorial => "Tutorial",
        })
    }
}

impl FromStr for SectionKind {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lecture" | "lec" => Ok(Self::Lecture),
            "lab" => Ok(Self::Lab),
            "tutorial" | "tut" => Ok(Self::Tutorial),
            other => Err(TimetableError::InvalidMeeting {
                line: s.to_owned(),
                reason: format!("unknown section kind `{other}`"),
            }),
        }
    }
}

/// One recurring weekly meeting time
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    /// Time the meeting starts
    start: NaiveTime,

    /// Time the meeting ends, always after `start`
    end: NaiveTime,

    /// Days the meeting happens on, without duplicates and in insertion order
    weekdays: Vec<Weekday>,
}

impl TimeSlot {
    /// Build a slot
    ///
    /// # Errors
    ///
    /// `InvalidInterval` if `end` isn't after `start`.
    pub fn new(
        start: NaiveTime,
        end: NaiveTime,
        weekdays: impl IntoIterator<Item = Weekday>,
    ) -> Result<Self> {
        check_interval(start, end)?;

        let mut slot = Self {
            start,
            end,
            weekdays: Vec::new(),
        };
        slot.set_weekdays(weekdays);

        Ok(slot)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    pub fn recurs_on(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday)
    }

    /// # Errors
    ///
    /// `InvalidInterval` if `start` isn't before the end, the slot is left as is.
    pub fn set_start(&mut self, start: NaiveTime) -> Result<()> {
        check_interval(start, self.end)?;
        self.start = start;
        Ok(())
    }

    /// # Errors
    ///
    /// `InvalidInterval` if `end` isn't after the start, the slot is left as is.
    pub fn set_end(&mut self, end: NaiveTime) -> Result<()> {
        check_interval(self.start, end)?;
        self.end = end;
        Ok(())
    }

    /// Move both bounds at once, useful when the new interval doesn't overlap
    /// the current one
    ///
    /// # Errors
    ///
    /// `InvalidInterval` if `end` isn't after `start`.
    pub fn set_interval(&mut self, start: NaiveTime, end: NaiveTime) -> Result<()> {
        check_interval(start, end)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Replace the days, dropping repeated ones
    pub fn set_weekdays(&mut self, weekdays: impl IntoIterator<Item = Weekday>) {
        self.weekdays.clear();
        for day in weekdays {
            self.add_weekday(day);
        }
    }

    /// Returns false if the day was already there
    pub fn add_weekday(&mut self, weekday: Weekday) -> bool {
        if self.recurs_on(weekday) {
            return false;
        }
        self.weekdays.push(weekday);
        true
    }

    /// # Errors
    ///
    /// `NotFound` if the slot doesn't recur on that day.
    pub fn remove_weekday(&mut self, weekday: Weekday) -> Result<()> {
        let position = self
            .weekdays
            .iter()
            .position(|day| *day == weekday)
            .ok_or_else(|| TimetableError::NotFound {
                what: format!("weekday {weekday}"),
            })?;
        self.weekdays.remove(position);

        Ok(())
    }

    /// Length of the meeting
    ///
    /// # Errors
    ///
    /// `InvalidInterval` if the slot doesn't end after it starts.
    pub fn duration(&self) -> Result<Duration> {
        check_interval(self.start, self.end)?;
        Ok(self.end - self.start)
    }
}

fn check_interval(start: NaiveTime, end: NaiveTime) -> Result<()> {
    if end > start {
        Ok(())
    } else {
        Err(TimetableError::InvalidInterval { start, end })
    }
}

/// Lecture, lab or tutorial of a course
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Section {
    /// Section's name, i.e.: L1A
    identifier: String,

    kind: SectionKind,

    /// Meeting times, a section without any isn't schedulable yet
    time_slots: Vec<TimeSlot>,
}

impl Section {
    pub fn new(identifier: impl Into<String>, kind: SectionKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            time_slots: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn is_lecture(&self) -> bool {
        self.kind == SectionKind::Lecture
    }

    pub fn is_lab(&self) -> bool {
        self.kind == SectionKind::Lab
    }

    pub fn is_tutorial(&self) -> bool {
        self.kind == SectionKind::Tutorial
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    /// Append a meeting time to the section
    pub fn add_time_slot(&mut self, slot: TimeSlot) {
        self.time_slots.push(slot);
    }

    /// Remove the first slot equal to `slot` and give it back
    ///
    /// # Errors
    ///
    /// `NotFound` if the section has no such slot.
    pub fn remove_time_slot(&mut self, slot: &TimeSlot) -> Result<TimeSlot> {
        let position = self
            .time_slots
            .iter()
            .position(|it| it == slot)
            .ok_or_else(|| TimetableError::NotFound {
                what: format!(
                    "time slot {}-{} in section {}",
                    slot.start, slot.end, self.identifier
                ),
            })?;

        Ok(self.time_slots.remove(position))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Course {
    /// i.e.: CPSC, MATH
    department: String,

    /// i.e.: 210
    course_number: String,

    /// i.e.: Software Construction
    title: Option<String>,

    /// Ordered list of the sections, the same section may appear twice
    sections: Vec<Section>,
}

impl Course {
    pub fn new(department: impl Into<String>, course_number: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            course_number: course_number.into(),
            title: None,
            sections: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn course_number(&self) -> &str {
        &self.course_number
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Course's code, i.e.: CPSC 210
    pub fn code(&self) -> String {
        format!("{} {}", self.department, self.course_number)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section with this identifier
    pub fn section_mut(&mut self, identifier: &str) -> Option<&mut Section> {
        self.sections
            .iter_mut()
            .find(|section| section.identifier == identifier)
    }

    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Keep only the sections `keep` returns true for, visited in order
    pub fn retain_sections(&mut self, keep: impl FnMut(&Section) -> bool) {
        self.sections.retain(keep);
    }

    /// Remove the first section equal to `section` and give it back
    ///
    /// # Errors
    ///
    /// `NotFound` if the course has no such section.
    pub fn remove_section(&mut self, section: &Section) -> Result<Section> {
        let position = self
            .sections
            .iter()
            .position(|it| it == section)
            .ok_or_else(|| TimetableError::NotFound {
                what: format!("section {} in {}", section.identifier, self.code()),
            })?;

        Ok(self.sections.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_duration() {
        let slot = TimeSlot::new(hm(15, 0), hm(17, 30), [Weekday::Thu]).unwrap();
        assert_eq!(slot.duration().unwrap(), Duration::minutes(150));
    }

    #[test]
    fn test_reversed_interval_is_rejected() {
        assert_eq!(
            TimeSlot::new(hm(13, 0), hm(12, 0), [Weekday::Tue]),
            Err(TimetableError::InvalidInterval {
                start: hm(13, 0),
                end: hm(12, 0)
            })
        );
        assert!(TimeSlot::new(hm(12, 0), hm(12, 0), [Weekday::Mon]).is_err());
    }

    #[test]
    fn test_setters_keep_interval() {
        let mut slot = TimeSlot::new(hm(12, 0), hm(13, 0), [Weekday::Tue]).unwrap();

        assert!(slot.set_start(hm(14, 0)).is_err());
        assert!(slot.set_end(hm(11, 0)).is_err());
        assert_eq!((slot.start(), slot.end()), (hm(12, 0), hm(13, 0)));

        slot.set_interval(hm(14, 0), hm(16, 0)).unwrap();
        slot.set_start(hm(15, 0)).unwrap();
        assert_eq!(slot.duration().unwrap(), Duration::hours(1));
    }

    #[test]
    fn test_weekdays_are_unique() {
        let mut slot = TimeSlot::new(
            hm(9, 0),
            hm(10, 0),
            [Weekday::Wed, Weekday::Mon, Weekday::Wed],
        )
        .unwrap();
        assert_eq!(slot.weekdays(), &[Weekday::Wed, Weekday::Mon]);

        assert!(!slot.add_weekday(Weekday::Mon));
        assert!(slot.add_weekday(Weekday::Fri));
        slot.remove_weekday(Weekday::Wed).unwrap();
        assert_eq!(slot.weekdays(), &[Weekday::Mon, Weekday::Fri]);
        assert!(matches!(
            slot.remove_weekday(Weekday::Sun),
            Err(TimetableError::NotFound { .. })
        ));
    }

    #[test]
    fn test_section_kind() {
        let lab = Section::new("L1A", SectionKind::Lab);
        assert!(lab.is_lab());
        assert!(!lab.is_lecture());
        assert!(!lab.is_tutorial());

        assert_eq!("TUT".parse::<SectionKind>(), Ok(SectionKind::Tutorial));
        assert!("seminar".parse::<SectionKind>().is_err());
    }

    #[test]
    fn test_add_and_remove_time_slot() {
        let mut section = Section::new("L1A", SectionKind::Lab);
        assert_eq!(section.time_slots().len(), 0);

        let first = TimeSlot::new(hm(12, 0), hm(13, 0), [Weekday::Tue]).unwrap();
        let second = TimeSlot::new(hm(13, 0), hm(14, 0), [Weekday::Tue]).unwrap();
        section.add_time_slot(first.clone());
        section.add_time_slot(second.clone());
        assert_eq!(section.time_slots().len(), 2);

        assert_eq!(section.remove_time_slot(&first).unwrap(), first);
        assert_eq!(section.time_slots(), &[second]);
        assert!(matches!(
            section.remove_time_slot(&first),
            Err(TimetableError::NotFound { .. })
        ));
    }

    #[test]
    fn test_add_and_remove_section() {
        let mut course = Course::new("CPSC", "210").with_title("Software Construction");
        assert_eq!(course.code(), "CPSC 210");
        assert_eq!(course.title(), Some("Software Construction"));

        let lab = Section::new("L1A", SectionKind::Lab);
        let tutorial = Section::new("T1B", SectionKind::Tutorial);
        course.add_section(lab.clone());
        course.add_section(tutorial.clone());
        course.add_section(lab.clone());
        assert_eq!(course.sections().len(), 3);

        course.remove_section(&lab).unwrap();
        assert_eq!(course.sections(), &[tutorial.clone(), lab.clone()]);

        course.remove_section(&lab).unwrap();
        course.remove_section(&tutorial).unwrap();
        assert!(course.sections().is_empty());
        assert!(matches!(
            course.remove_section(&lab),
            Err(TimetableError::NotFound { .. })
        ));
    }

    #[test]
    fn test_section_mut() {
        let mut course = Course::new("MATH", "221");
        course.add_section(Section::new("101", SectionKind::Lecture));

        let slot = TimeSlot::new(hm(8, 0), hm(9, 0), [Weekday::Mon]).unwrap();
        course.section_mut("101").unwrap().add_time_slot(slot);
        assert_eq!(course.sections()[0].time_slots().len(), 1);
        assert!(course.section_mut("102").is_none());
    }
}
