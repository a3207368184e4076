use std::collections::HashSet;

use log::{debug, info, warn};

use crate::error::{Result, RosterError};

use super::{
    seed::parse_seed, SeedSource, Storage, Student, StudentFields, StudentPatch, STORAGE_KEY,
};

/// Ordered sequence of students mirrored to a storage slot.
pub struct RecordStore<S, D> {
    storage: S,
    seed: D,
    students: Vec<Student>,
    loaded: bool,
}

impl<S: Storage, D: SeedSource> RecordStore<S, D> {
    pub fn new(storage: S, seed: D) -> Self {
        Self {
            storage,
            seed,
            students: Vec::new(),
            loaded: false,
        }
    }

    /// Reads the students from storage, falling back to the seed document when storage is empty.
    ///
    /// On failure the in-memory sequence is left empty. A failed seed still marks the store
    /// as loaded, since there is no stored roster that a later write could clobber.
    pub fn load(&mut self) -> Result<&[Student]> {
        self.students.clear();
        self.loaded = false;

        let (students, seeded) = match self.storage.get_item(STORAGE_KEY)? {
            Some(raw) => {
                debug!("reading students from storage");
                let students = serde_json::from_str::<Vec<Student>>(&raw)
                    .map_err(|e| RosterError::Data(format!("stored students; {e}")))?;
                check_records(&students)?;
                (students, false)
            }
            None => {
                info!("no stored students, reading seed document");
                match self.seed_students() {
                    Ok(students) => (students, true),
                    Err(e) => {
                        self.loaded = true;
                        return Err(e);
                    }
                }
            }
        };

        if seeded {
            self.storage
                .set_item(STORAGE_KEY, &serde_json::to_string(&students)?)?;
        }

        info!("loaded {} students", students.len());
        self.students = students;
        self.loaded = true;
        Ok(&self.students)
    }

    fn seed_students(&self) -> Result<Vec<Student>> {
        let students = parse_seed(&self.seed.fetch()?)?;
        check_records(&students)?;
        Ok(students)
    }

    /// Loads only if no load has succeeded yet.
    ///
    /// A seed failure is logged and the store continues from an empty roster; failures
    /// reading stored students are returned.
    pub fn ensure_loaded(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }

        let result = self.load().map(|_| ());
        match result {
            Err(e) if self.loaded => {
                warn!("{e}; starting from an empty roster");
                Ok(())
            }
            result => result,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn records(&self) -> &[Student] {
        &self.students
    }

    pub fn get(&self, id: u64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    fn next_id(&self) -> Result<u64> {
        self.students
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| RosterError::Data("student id space exhausted".into()))
    }

    /// Writes `students` to the slot and adopts them only once the write succeeded
    fn commit(&mut self, students: Vec<Student>) -> Result<()> {
        let raw = serde_json::to_string(&students)?;
        self.storage.set_item(STORAGE_KEY, &raw)?;
        self.students = students;
        Ok(())
    }

    /// Validates and appends a new student, returning the stored record
    pub fn add(&mut self, fields: StudentFields) -> Result<&Student> {
        fields.validate()?;

        let student = fields.into_student(self.next_id()?);
        debug!("adding student {}", student.id);
        let mut students = self.students.clone();
        students.push(student);
        self.commit(students)?;

        Ok(&self.students[self.students.len() - 1])
    }

    /// Merges `patch` over the student with the given identifier
    pub fn update(&mut self, id: u64, patch: StudentPatch) -> Result<&Student> {
        patch.validate()?;

        let index = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or(RosterError::NotFound(id))?;
        let mut students = self.students.clone();
        patch.apply(&mut students[index]);
        self.commit(students)?;
        debug!("updated student {id}");

        Ok(&self.students[index])
    }

    /// Removes the student with the given identifier.
    ///
    /// Returns whether a student was removed; removing an unknown identifier is a no-op.
    pub fn remove(&mut self, id: u64) -> Result<bool> {
        let students: Vec<Student> = self
            .students
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        let removed = students.len() != self.students.len();
        if !removed {
            warn!("student {id} was already absent");
        }
        self.commit(students)?;

        Ok(removed)
    }

    /// Serializes the whole sequence into the storage slot
    pub fn persist(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.students)?;
        self.storage.set_item(STORAGE_KEY, &raw)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn check_records(students: &[Student]) -> Result<()> {
    let mut seen = HashSet::with_capacity(students.len());
    for student in students {
        student
            .validate()
            .map_err(|e| RosterError::Data(format!("student {}; {e}", student.id)))?;
        if !seen.insert(student.id) {
            return Err(RosterError::Data(format!(
                "duplicate student id {}",
                student.id
            )));
        }
    }
    Ok(())
}
