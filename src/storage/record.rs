use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

/// A single student entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub course: String,
    pub skills: Vec<String>,
    pub email: String,
    pub is_enrolled: bool,
}

/// Complete field set submitted when adding a student.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentFields {
    pub name: String,
    pub age: u32,
    pub course: String,
    pub skills: Vec<String>,
    pub email: String,
    pub is_enrolled: bool,
}

/// Edited fields for an existing student; `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub course: Option<String>,
    pub skills: Option<Vec<String>>,
    pub email: Option<String>,
    pub is_enrolled: Option<bool>,
}

fn check_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RosterError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn check_age(age: u32) -> Result<()> {
    if age == 0 {
        return Err(RosterError::validation("age", "must be a positive number"));
    }
    Ok(())
}

fn check_skills(skills: &[String]) -> Result<()> {
    if skills.is_empty() || skills.iter().any(|s| s.trim().is_empty()) {
        return Err(RosterError::validation(
            "skills",
            "must list at least one skill",
        ));
    }
    Ok(())
}

/// Splits a comma separated list, dropping blank entries.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl StudentFields {
    pub fn validate(&self) -> Result<()> {
        check_text("name", &self.name)?;
        check_age(self.age)?;
        check_text("course", &self.course)?;
        check_skills(&self.skills)?;
        check_text("email", &self.email)
    }

    pub(crate) fn into_student(self, id: u64) -> Student {
        Student {
            id,
            name: self.name.trim().to_string(),
            age: self.age,
            course: self.course.trim().to_string(),
            skills: self.skills,
            email: self.email.trim().to_string(),
            is_enrolled: self.is_enrolled,
        }
    }
}

impl StudentPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            check_text("name", name)?;
        }
        if let Some(age) = self.age {
            check_age(age)?;
        }
        if let Some(course) = &self.course {
            check_text("course", course)?;
        }
        if let Some(skills) = &self.skills {
            check_skills(skills)?;
        }
        if let Some(email) = &self.email {
            check_text("email", email)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the provided fields over `student`. The identifier is never touched.
    pub(crate) fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name.trim().to_string();
        }
        if let Some(age) = self.age {
            student.age = age;
        }
        if let Some(course) = self.course {
            student.course = course.trim().to_string();
        }
        if let Some(skills) = self.skills {
            student.skills = skills;
        }
        if let Some(email) = self.email {
            student.email = email.trim().to_string();
        }
        if let Some(is_enrolled) = self.is_enrolled {
            student.is_enrolled = is_enrolled;
        }
    }
}

impl Student {
    /// Checks a record read from storage or the seed document
    pub(crate) fn validate(&self) -> Result<()> {
        if self.id == 0 {
            return Err(RosterError::validation("id", "must be a positive number"));
        }
        check_text("name", &self.name)?;
        check_age(self.age)?;
        check_text("course", &self.course)?;
        check_skills(&self.skills)?;
        check_text("email", &self.email)
    }
}
