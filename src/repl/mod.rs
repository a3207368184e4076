pub mod commands;
pub mod form;

pub use commands::{MetaCommand, Statement};
use log::error;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use crate::{
    error::RosterError,
    storage::{FileSeed, FileStorage, RecordStore, SeedSource, Storage},
    view,
};

/// Interactive roster session reading commands from `input`
pub struct Session<S, D, R, W> {
    name: String,
    store: RecordStore<S, D>,
    input: R,
    output: W,
}

impl<S, D, R, W> Session<S, D, R, W>
where
    S: Storage,
    D: SeedSource,
    R: BufRead,
    W: Write,
{
    pub fn new(name: String, store: RecordStore<S, D>, input: R, output: W) -> Self {
        Self {
            name,
            store,
            input,
            output,
        }
    }

    pub fn store(&self) -> &RecordStore<S, D> {
        &self.store
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Runs until `.exit` or end of input
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{} > ", self.name)?;
            self.output.flush()?;

            let Some(input) = self.read_line()? else {
                writeln!(self.output)?;
                return Ok(());
            };
            if input.is_empty() {
                continue;
            }

            if input.starts_with('.') {
                match MetaCommand::try_from(input.as_str()) {
                    Ok(MetaCommand::Exit) => return Ok(()),
                    Ok(MetaCommand::Help) => writeln!(self.output, "{}", MetaCommand::help())?,
                    Err(e) => self.alert(&e)?,
                }
                continue;
            }

            match Statement::try_from(input.as_str()) {
                Ok(statement) => self.execute(statement)?,
                Err(e) => self.alert(&e)?,
            }
        }
    }

    /// Runs a single statement and re-renders the table on success
    pub fn execute(&mut self, statement: Statement) -> io::Result<()> {
        let result = match statement {
            Statement::Load => self.store.load().map(|_| ()),
            Statement::Add(fields) => self
                .store
                .ensure_loaded()
                .and_then(|_| self.store.add(fields).map(|_| ())),
            Statement::Update(id, patch) => self
                .store
                .ensure_loaded()
                .and_then(|_| self.store.update(id, patch).map(|_| ())),
            Statement::Delete(id) => {
                if let Err(e) = self.store.ensure_loaded() {
                    return self.alert(&e);
                }
                match self.store.get(id) {
                    Some(student) => {
                        write!(self.output, "Delete student {id} ({})? [y/N] ", student.name)?
                    }
                    None => write!(self.output, "Delete student {id}? [y/N] ")?,
                }
                self.output.flush()?;
                let answer = self.read_line()?.unwrap_or_default().to_lowercase();
                if answer != "y" && answer != "yes" {
                    writeln!(self.output, "cancelled")?;
                    return Ok(());
                }
                self.store.remove(id).map(|_| ())
            }
        };

        match result {
            Ok(()) => writeln!(self.output, "{}", view::render(self.store.records())),
            Err(e) => self.alert(&e),
        }
    }

    /// Reports a failure; data and storage failures also replace the table with an error row.
    fn alert(&mut self, err: &RosterError) -> io::Result<()> {
        error!("{err}");
        let heading = match err {
            RosterError::Data(_) | RosterError::Fetch { .. } => Some("Failed to load students"),
            RosterError::Io(_) => Some("Storage failure"),
            _ => None,
        };
        if let Some(heading) = heading {
            writeln!(self.output, "{}", view::render_error(heading, err))?;
        }
        writeln!(self.output, "error: {err}")
    }
}

/// Starts a roster REPL session over stdin and stdout
pub fn start_repl(name: String, file: PathBuf, seed: PathBuf) -> Result<(), RosterError> {
    let storage = FileStorage::open(file);
    let store = RecordStore::new(storage, FileSeed(seed));

    let stdin = io::stdin();
    let mut session = Session::new(name, store, stdin.lock(), io::stdout());
    session.run()?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::storage::{InlineSeed, MemoryStorage};

    const SEED: &str = r#"{"students":[{"id":1,"name":"Ann","age":20,"course":"Rust",
        "skills":["cargo"],"email":"ann@example.com","isEnrolled":true}]}"#;

    fn run(seed: &str, input: &str) -> (String, Vec<crate::storage::Student>) {
        let store = RecordStore::new(MemoryStorage::new(), InlineSeed(seed.into()));
        let mut output = Vec::new();
        let mut session = Session::new("roster".into(), store, input.as_bytes(), &mut output);
        session.run().unwrap();
        let records = session.store().records().to_vec();
        drop(session);

        (String::from_utf8(output).unwrap(), records)
    }

    #[test]
    fn load_renders_seed() {
        let (out, records) = run(SEED, "load\n.exit\n");
        assert!(out.contains("ann@example.com"));
        assert!(out.contains("update 1 | delete 1"));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn add_then_update() {
        let (out, records) = run(
            SEED,
            "add name=\"Bo Li\" age=19 course=Math skills=a,b email=bo@x.io enrolled=no\n\
             update 2 course=Physics\n",
        );
        assert!(out.contains("Bo Li"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, 2);
        assert_eq!(records[1].course, "Physics");
    }

    #[test]
    fn delete_needs_confirmation() {
        let (out, records) = run(SEED, "delete 1\nn\n");
        assert!(out.contains("cancelled"));
        assert_eq!(records.len(), 1);

        let (out, records) = run(SEED, "delete 1\ny\n");
        assert!(out.contains(view::EMPTY_PLACEHOLDER));
        assert!(records.is_empty());
    }

    #[test]
    fn errors_keep_session_alive() {
        let (out, records) = run(SEED, "update 9 age=3\nfrobnicate\nload\n");
        assert!(out.contains("error: student 9 not found"));
        assert!(out.contains("error: unknown command `frobnicate`."));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn malformed_seed_shows_error_row() {
        let (out, records) = run("{}", "load\n");
        assert!(out.contains("Failed to load students"));
        assert!(out.contains("error: malformed data"));
        assert!(records.is_empty());
    }

    #[test]
    fn add_after_failed_seed() {
        let (out, records) = run(
            "{}",
            "load
add name=Bo age=19 course=Math skills=a email=bo@x.io
",
        );
        assert!(out.contains("error: malformed data"));
        assert!(out.contains("update 1 | delete 1"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 1);
    }

    #[test]
    fn delete_prompt_names_student() {
        let (out, _) = run(SEED, "delete 1
no
delete 7
no
");
        assert!(out.contains("Delete student 1 (Ann)? [y/N]"));
        assert!(out.contains("Delete student 7? [y/N]"));
    }
}
