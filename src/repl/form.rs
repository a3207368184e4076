use crate::{
    error::{Result, RosterError},
    storage::{parse_skills, StudentFields, StudentPatch},
};

/// Splits input on whitespace, keeping double quoted runs together.
///
/// `name="Ann Lee" age=20` yields `name=Ann Lee` and `age=20`.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }

    if in_quotes {
        return Err(RosterError::validation("input", "unterminated quote"));
    }
    if pending {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Edit form contents as submitted on the command line
#[derive(Debug, Default)]
struct Form {
    name: Option<String>,
    age: Option<u32>,
    course: Option<String>,
    skills: Option<Vec<String>>,
    email: Option<String>,
    is_enrolled: Option<bool>,
}

fn parse_age(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| RosterError::validation("age", format!("`{raw}` is not a positive number")))
}

fn parse_enrolled(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(RosterError::validation(
            "enrolled",
            format!("`{raw}` is not yes or no"),
        )),
    }
}

impl Form {
    fn parse(tokens: &[String]) -> Result<Self> {
        let mut form = Self::default();

        for token in tokens {
            let (key, value) = token.split_once('=').ok_or_else(|| {
                RosterError::validation("input", format!("expected field=value, got `{token}`"))
            })?;

            match key {
                "name" => form.name = Some(value.to_string()),
                "age" => form.age = Some(parse_age(value)?),
                "course" => form.course = Some(value.to_string()),
                "skills" => form.skills = Some(parse_skills(value)),
                "email" => form.email = Some(value.to_string()),
                "enrolled" | "isEnrolled" => form.is_enrolled = Some(parse_enrolled(value)?),
                _ => {
                    return Err(RosterError::validation(
                        "input",
                        format!("unknown field `{key}`"),
                    ))
                }
            }
        }

        Ok(form)
    }
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| RosterError::validation(field, "is required"))
}

/// Parses the add form. Every field except `enrolled` must be given.
pub fn parse_fields(tokens: &[String]) -> Result<StudentFields> {
    let form = Form::parse(tokens)?;

    Ok(StudentFields {
        name: required("name", form.name)?,
        age: required("age", form.age)?,
        course: required("course", form.course)?,
        skills: required("skills", form.skills)?,
        email: required("email", form.email)?,
        is_enrolled: form.is_enrolled.unwrap_or(false),
    })
}

/// Parses the edit form; omitted fields are left unchanged.
pub fn parse_patch(tokens: &[String]) -> Result<StudentPatch> {
    let form = Form::parse(tokens)?;

    Ok(StudentPatch {
        name: form.name,
        age: form.age,
        course: form.course,
        skills: form.skills,
        email: form.email,
        is_enrolled: form.is_enrolled,
    })
}
