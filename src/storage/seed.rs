use std::{fs, path::PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, RosterError};

use super::Student;

/// Source of the seed document used when storage holds no students.
pub trait SeedSource {
    /// Retrieves the raw seed document
    fn fetch(&self) -> Result<String>;
}

/// Seed document read from a JSON file
#[derive(Debug, Clone)]
pub struct FileSeed(pub PathBuf);

impl SeedSource for FileSeed {
    fn fetch(&self) -> Result<String> {
        fs::read_to_string(&self.0).map_err(|source| RosterError::Fetch {
            path: self.0.display().to_string(),
            source,
        })
    }
}

/// Seed document held in memory
#[derive(Debug, Clone)]
pub struct InlineSeed(pub String);

impl SeedSource for InlineSeed {
    fn fetch(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Deserialize)]
struct SeedDocument {
    students: Value,
}

/// Extracts the `students` array from a seed document.
pub fn parse_seed(raw: &str) -> Result<Vec<Student>> {
    let doc: SeedDocument = serde_json::from_str(raw)
        .map_err(|e| RosterError::Data(format!("seed document has no `students` field; {e}")))?;

    if !doc.students.is_array() {
        return Err(RosterError::Data(
            "seed document field `students` is not an array".into(),
        ));
    }

    Ok(serde_json::from_value(doc.students)?)
}
