use std::sync::LazyLock;

use chrono::{Duration, NaiveTime, Weekday};
use regex::{Captures, Regex};

use crate::error::{Result, TimetableError};
use crate::timetable::{
    models::{Course, Section, SectionKind, TimeSlot},
    WEEK,
};

pub mod models;

use models::{Meeting, Position, TabChar};

// dept => department  | number => course number
// h1 => starting hour  | m1 => starting minute
// h2 => ending hour    | m2 => ending minute
static MEETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^\s*
        (?P<dept>[[:alpha:]]+)\s+(?P<number>\w+)\s+
        (?P<section>\w+)\s+(?P<kind>[[:alpha:]]+)\s+
        (?P<days>[[:alpha:]]+(?:,[[:alpha:]]+)*)\s+
        (?P<h1>\d{1,2})(?:h|:)(?P<m1>\d{2})?-(?P<h2>\d{1,2})(?:h|:)(?P<m2>\d{2})?
        \s*$",
    )
    .expect("meeting pattern is valid")
});

fn invalid(line: &str, reason: impl Into<String>) -> TimetableError {
    TimetableError::InvalidMeeting {
        line: line.to_owned(),
        reason: reason.into(),
    }
}

/// Weekday from its name, i.e.: `mon` or `Monday`
///
/// # Errors
///
/// `InvalidWeekday` for anything else.
pub fn parse_weekday(day: &str) -> Result<Weekday> {
    day.trim()
        .parse()
        .map_err(|_| TimetableError::InvalidWeekday {
            value: day.to_owned(),
        })
}

/// Weekday from its number, Monday being 0 and Sunday 6
///
/// # Errors
///
/// `InvalidWeekday` above 6.
pub fn weekday_from_number(day: u8) -> Result<Weekday> {
    WEEK.get(usize::from(day))
        .copied()
        .ok_or_else(|| TimetableError::InvalidWeekday {
            value: day.to_string(),
        })
}

/// Full english name of the day
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn parse_time(line: &str, captures: &Captures, hour: &str, minute: &str) -> Result<NaiveTime> {
    let h = captures
        .name(hour)
        .map_or(Ok(0), |h| h.as_str().parse::<u32>())
        .map_err(|_| invalid(line, "hour out of range"))?;
    let m = captures
        .name(minute)
        .map_or(Ok(0), |m| m.as_str().parse::<u32>())
        .map_err(|_| invalid(line, "minute out of range"))?;

    NaiveTime::from_hms_opt(h, m, 0).ok_or_else(|| invalid(line, format!("no such time {h}h{m:02}")))
}

/// Read a meeting line: `DEPT NUMBER SECTION KIND DAYS START-END`
///
/// # Errors
///
/// `InvalidWeekday` for an unknown day, `InvalidInterval` when the meeting
/// ends before it starts, `InvalidMeeting` for anything else.
pub fn parse_meeting(line: &str) -> Result<Meeting> {
    let captures = MEETING
        .captures(line)
        .ok_or_else(|| invalid(line, "expected `DEPT NUMBER SECTION KIND DAYS START-END`"))?;

    let kind = captures["kind"]
        .parse::<SectionKind>()
        .map_err(|_| invalid(line, format!("unknown section kind `{}`", &captures["kind"])))?;

    let weekdays = captures["days"]
        .split(',')
        .map(parse_weekday)
        .collect::<Result<Vec<_>>>()?;

    let start = parse_time(line, &captures, "h1", "m1")?;
    let end = parse_time(line, &captures, "h2", "m2")?;

    Ok(Meeting {
        department: captures["dept"].to_uppercase(),
        course_number: captures["number"].to_owned(),
        section: captures["section"].to_owned(),
        kind,
        slot: TimeSlot::new(start, end, weekdays)?,
    })
}

/// Group meetings into courses and sections, keeping the order they first
/// appear in
///
/// # Errors
///
/// `InvalidMeeting` when a section is given two kinds.
pub fn courses_from_meetings(meetings: impl IntoIterator<Item = Meeting>) -> Result<Vec<Course>> {
    let mut courses: Vec<Course> = Vec::new();

    for meeting in meetings {
        let position = match courses.iter().position(|course| {
            course.department() == meeting.department
                && course.course_number() == meeting.course_number
        }) {
            Some(position) => position,
            None => {
                courses.push(Course::new(
                    meeting.department.clone(),
                    meeting.course_number.clone(),
                ));
                courses.len() - 1
            }
        };
        let course = &mut courses[position];
        let code = course.code();

        match course.section_mut(&meeting.section) {
            Some(section) if section.kind() != meeting.kind => {
                return Err(invalid(
                    &format!("{code} {}", meeting.section),
                    format!(
                        "section is both {} and {}",
                        section.kind(),
                        meeting.kind
                    ),
                ));
            }
            Some(section) => section.add_time_slot(meeting.slot),
            None => {
                let mut section = Section::new(meeting.section, meeting.kind);
                section.add_time_slot(meeting.slot);
                course.add_section(section);
            }
        }
    }

    Ok(courses)
}

/// Time of day as shown in the table, i.e.: 08h30
pub fn format_time(time: NaiveTime) -> String {
    time.format("%Hh%M").to_string()
}

/// Start and end of the slot, i.e.: 12h00-13h00
pub fn format_time_slot(slot: &TimeSlot) -> String {
    format!("{}-{}", format_time(slot.start()), format_time(slot.end()))
}

/// Length of a meeting, i.e.: 1h30
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    format!("{}h{:02}", minutes / 60, minutes % 60)
}

/// Draw a horizontal line of the table
pub fn line_table(widths: &[usize], position: Position) {
    let (left, middle, right) = match position {
        Position::Top => (TabChar::Jtl, TabChar::Jtb, TabChar::Jtr),
        Position::Middle => (TabChar::Jl, TabChar::Jm, TabChar::Jr),
        Position::Bottom => (TabChar::Jbl, TabChar::Jtt, TabChar::Jbr),
    };

    let line = widths
        .iter()
        .map(|width| TabChar::Bh.val().to_string().repeat(*width))
        .collect::<Vec<_>>()
        .join(middle.val().to_string().as_str());

    println!("{}{line}{}", left.val(), right.val());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("tue").unwrap(), Weekday::Tue);
        assert_eq!(parse_weekday("Thursday").unwrap(), Weekday::Thu);
        assert_eq!(
            parse_weekday("funday"),
            Err(TimetableError::InvalidWeekday {
                value: "funday".into()
            })
        );
    }

    #[test]
    fn test_weekday_from_number() {
        assert_eq!(weekday_from_number(0).unwrap(), Weekday::Mon);
        assert_eq!(weekday_from_number(6).unwrap(), Weekday::Sun);
        assert!(matches!(
            weekday_from_number(7),
            Err(TimetableError::InvalidWeekday { .. })
        ));
    }

    #[test]
    fn test_parse_meeting() {
        let meeting = parse_meeting("cpsc 210 L1A lab tue,thu 12h00-13h30").unwrap();

        assert_eq!(meeting.department, "CPSC");
        assert_eq!(meeting.course_number, "210");
        assert_eq!(meeting.section, "L1A");
        assert_eq!(meeting.kind, SectionKind::Lab);
        assert_eq!(meeting.slot.weekdays(), &[Weekday::Tue, Weekday::Thu]);
        assert_eq!(meeting.slot.start(), hm(12, 0));
        assert_eq!(meeting.slot.end(), hm(13, 30));

        let short = parse_meeting("MATH 200 101 lecture mon 9:-10h").unwrap();
        assert_eq!(short.slot.duration().unwrap(), Duration::hours(1));
    }

    #[test]
    fn test_parse_meeting_errors() {
        assert!(matches!(
            parse_meeting("CPSC 210 L1A lab tue"),
            Err(TimetableError::InvalidMeeting { .. })
        ));
        assert!(matches!(
            parse_meeting("CPSC 210 L1A seminar tue 12h00-13h00"),
            Err(TimetableError::InvalidMeeting { .. })
        ));
        assert!(matches!(
            parse_meeting("CPSC 210 L1A lab tue 25h00-26h00"),
            Err(TimetableError::InvalidMeeting { .. })
        ));
        assert!(matches!(
            parse_meeting("CPSC 210 L1A lab tue,someday 12h00-13h00"),
            Err(TimetableError::InvalidWeekday { .. })
        ));
        assert!(matches!(
            parse_meeting("CPSC 210 L1A lab tue 13h00-12h00"),
            Err(TimetableError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn test_courses_from_meetings() {
        let meetings = [
            "CPSC 210 L1A lab tue 12h00-13h00",
            "MATH 200 101 lecture mon,wed,fri 9h00-10h00",
            "CPSC 210 L1A lab thu 15h00-17h00",
            "CPSC 210 T1B tut fri 10h00-11h00",
        ]
        .into_iter()
        .map(parse_meeting)
        .collect::<Result<Vec<_>>>()
        .unwrap();

        let courses = courses_from_meetings(meetings).unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].code(), "CPSC 210");
        assert_eq!(courses[1].code(), "MATH 200");

        let sections = courses[0].sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].identifier(), "L1A");
        assert_eq!(sections[0].time_slots().len(), 2);
        assert!(sections[1].is_tutorial());
    }

    #[test]
    fn test_section_with_two_kinds() {
        let meetings = [
            parse_meeting("CPSC 210 L1A lab tue 12h00-13h00").unwrap(),
            parse_meeting("CPSC 210 L1A lecture thu 12h00-13h00").unwrap(),
        ];

        assert!(matches!(
            courses_from_meetings(meetings),
            Err(TimetableError::InvalidMeeting { .. })
        ));
    }

    #[test]
    fn test_format() {
        let slot = TimeSlot::new(hm(8, 30), hm(10, 0), [Weekday::Mon]).unwrap();

        assert_eq!(format_time_slot(&slot), "08h30-10h00");
        assert_eq!(format_duration(slot.duration().unwrap()), "1h30");
    }
}
