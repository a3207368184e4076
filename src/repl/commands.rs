use crate::{
    error::{Result, RosterError},
    storage::{StudentFields, StudentPatch},
};

use super::form::{parse_fields, parse_patch, tokenize};

/// Commands that are not part of the roster itself.
///
/// These commands mostly control what the REPL session does
#[derive(Debug, Clone, PartialEq)]
pub enum MetaCommand {
    /// Close the current REPL session
    Exit,
    /// Prints the list of available commands
    Help,
}

impl MetaCommand {
    pub fn help() -> &'static str {
        "\
load                                 load and display all students
add name=.. age=.. course=.. skills=a,b email=.. [enrolled=yes|no]
                                     add a student; quote values containing spaces
update <id> [field=value ...]        change the given fields of a student
delete <id>                          delete a student after confirmation
.help                                show this message
.exit                                close the session"
    }
}

impl TryFrom<&str> for MetaCommand {
    type Error = RosterError;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            ".exit" => Ok(Self::Exit),
            ".help" => Ok(Self::Help),
            _ => Err(RosterError::UnknownCommand(value.to_string())),
        }
    }
}

/// Roster operations
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Load,
    Add(StudentFields),
    Update(u64, StudentPatch),
    Delete(u64),
}

fn parse_id(raw: Option<&String>) -> Result<u64> {
    let raw = raw.ok_or_else(|| RosterError::validation("id", "is required"))?;
    raw.parse::<u64>()
        .map_err(|_| RosterError::validation("id", format!("`{raw}` is not a student id")))
}

impl TryFrom<&str> for Statement {
    type Error = RosterError;

    fn try_from(value: &str) -> Result<Self> {
        let tokens = tokenize(value)?;
        let Some((keyword, rest)) = tokens.split_first() else {
            return Err(RosterError::UnknownCommand(value.to_string()));
        };

        match keyword.as_str() {
            "load" if rest.is_empty() => Ok(Self::Load),
            "add" => Ok(Self::Add(parse_fields(rest)?)),
            "update" => {
                let id = parse_id(rest.first())?;
                let patch = parse_patch(&rest[1..])?;
                if patch.is_empty() {
                    return Err(RosterError::validation("update", "no fields given"));
                }
                Ok(Self::Update(id, patch))
            }
            "delete" if rest.len() <= 1 => Ok(Self::Delete(parse_id(rest.first())?)),
            _ => Err(RosterError::UnknownCommand(value.to_string())),
        }
    }
}
