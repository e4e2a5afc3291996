use std::collections::HashMap;

use dialoguer::MultiSelect;
use tracing::info;

use crate::timetable::models::{Course, Section, SectionKind};
use crate::utils::format_time_slot;

const DISCLAIMER: &str = "(select with SPACE, ENTER to confirm)";

/// A section the user can drop because its course offers others of the same kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alternative {
    /// Position of the course in the list
    pub course: usize,
    /// Position of the section in the course
    pub section: usize,
    /// Names showed to the users
    pub label: String,
}

/// Filter the courses, then the sections
///
/// # Errors
///
/// When a prompt can't be shown or read.
pub fn timetable(selection: Vec<Course>) -> dialoguer::Result<Vec<Course>> {
    let mut my_courses = selection;

    courses(&mut my_courses)?;
    sections(&mut my_courses)?;

    Ok(my_courses)
}

/// Exclude some courses
fn courses(list: &mut Vec<Course>) -> dialoguer::Result<()> {
    let multiselected: Vec<String> = list
        .iter()
        .map(|course| match course.title() {
            Some(title) => format!("{} - {title}", course.code()),
            None => course.code(),
        })
        .collect();

    let defaults = vec![true; multiselected.len()];
    let selections = MultiSelect::new()
        .with_prompt(format!("Pick your courses {DISCLAIMER}"))
        .items(&multiselected[..])
        .defaults(&defaults[..])
        .interact()?;

    let mut position = 0;
    list.retain(|_| {
        let keep = selections.contains(&position);
        position += 1;
        keep
    });

    Ok(())
}

/// Choose between the sections of a same kind
fn sections(list: &mut [Course]) -> dialoguer::Result<()> {
    let choices = alternatives(list);
    if choices.is_empty() {
        return Ok(());
    }

    let multiselected: Vec<&str> = choices.iter().map(|it| it.label.as_str()).collect();
    let defaults = vec![false; multiselected.len()];
    let selections = MultiSelect::new()
        .with_prompt(format!("Pick your sections {DISCLAIMER}"))
        .items(&multiselected[..])
        .defaults(&defaults[..])
        .interact()?;

    let dropped: Vec<_> = choices
        .iter()
        .enumerate()
        .filter(|(i, _)| !selections.contains(i))
        .map(|(_, it)| it.clone())
        .collect();
    info!(dropped = dropped.len(), "Sections filtered");

    retain_sections(list, &dropped);

    Ok(())
}

fn label(course: &Course, section: &Section) -> String {
    let times = section
        .time_slots()
        .iter()
        .map(|slot| {
            let days: Vec<String> = slot.weekdays().iter().map(ToString::to_string).collect();
            format!("{} {}", days.join(","), format_time_slot(slot))
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} - {} {} {times}",
        course.code(),
        section.kind(),
        section.identifier()
    )
}

/// Sections whose course has at least another section of the same kind.
/// A lone section of its kind is always kept, so it's never listed.
pub fn alternatives(list: &[Course]) -> Vec<Alternative> {
    // How many sections of each kind a course has
    let mut counts: HashMap<(usize, SectionKind), usize> = HashMap::new();
    for (i, course) in list.iter().enumerate() {
        for section in course.sections() {
            *counts.entry((i, section.kind())).or_insert(0) += 1;
        }
    }

    list.iter()
        .enumerate()
        .flat_map(|(i, course)| {
            course
                .sections()
                .iter()
                .enumerate()
                .map(move |(j, section)| (i, course, j, section))
        })
        .filter(|(i, _, _, section)| counts[&(*i, section.kind())] > 1)
        .map(|(i, course, j, section)| Alternative {
            course: i,
            section: j,
            label: label(course, section),
        })
        .collect()
}

/// Remove the given sections from their courses
pub fn retain_sections(list: &mut [Course], dropped: &[Alternative]) {
    for (i, course) in list.iter_mut().enumerate() {
        let mut position = 0;
        course.retain_sections(|_| {
            let keep = !dropped
                .iter()
                .any(|it| it.course == i && it.section == position);
            position += 1;
            keep
        });
    }
}
