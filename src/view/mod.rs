//! Text table rendering for the roster.
//!
//! Records are first mapped onto [StudentRow](StudentRow) view models, then laid out with
//! columns sized to their widest cell.

use std::fmt::Display;

use crate::storage::Student;

/// Shown in place of rows when the roster is empty
pub const EMPTY_PLACEHOLDER: &str = "No students found";

const HEADERS: [&str; 8] = [
    "ID", "Name", "Age", "Course", "Skills", "Email", "Enrolled", "Actions",
];

/// Action available on a rendered row, bound to the row's student
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Update(u64),
    Delete(u64),
}

impl Display for RowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Update(id) => write!(f, "update {id}"),
            Self::Delete(id) => write!(f, "delete {id}"),
        }
    }
}

/// Display-ready projection of a [Student](Student)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub age: String,
    pub course: String,
    pub skills: String,
    pub email: String,
    pub enrolled: String,
    pub actions: [RowAction; 2],
}

impl From<&Student> for StudentRow {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.to_string(),
            name: student.name.clone(),
            age: student.age.to_string(),
            course: student.course.clone(),
            skills: student.skills.join(", "),
            email: student.email.clone(),
            enrolled: if student.is_enrolled { "yes" } else { "no" }.to_string(),
            actions: [RowAction::Update(student.id), RowAction::Delete(student.id)],
        }
    }
}

impl StudentRow {
    fn cells(&self) -> [String; 8] {
        [
            self.id.clone(),
            self.name.clone(),
            self.age.clone(),
            self.course.clone(),
            self.skills.clone(),
            self.email.clone(),
            self.enrolled.clone(),
            format!("{} | {}", self.actions[0], self.actions[1]),
        ]
    }
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    format!("| {} |", padded.join(" | "))
}

fn separator(widths: &[usize]) -> String {
    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    format!("|-{}-|", dashes.join("-|-"))
}

/// Single full-width row spanning the whole table
fn spanning_line(text: &str, widths: &[usize]) -> String {
    let inner = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    let inner = inner.max(text.chars().count());
    format!("| {text:<inner$} |")
}

fn header_widths() -> Vec<usize> {
    HEADERS.iter().map(|h| h.chars().count()).collect()
}

/// Rebuilds the full table for `students`.
pub fn render(students: &[Student]) -> String {
    let headers: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let rows: Vec<[String; 8]> = students
        .iter()
        .map(|s| StudentRow::from(s).cells())
        .collect();

    let mut widths = header_widths();
    for row in rows.iter() {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = vec![line(&headers, &widths), separator(&widths)];
    if rows.is_empty() {
        out.push(spanning_line(EMPTY_PLACEHOLDER, &widths));
    }
    out.extend(rows.iter().map(|row| line(row, &widths)));

    out.join("\n")
}

/// Table holding only an inline error row, `heading: err`
pub fn render_error(heading: &str, err: &impl Display) -> String {
    let headers: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let widths = header_widths();

    [
        line(&headers, &widths),
        separator(&widths),
        spanning_line(&format!("{heading}: {err}"), &widths),
    ]
    .join("\n")
}
