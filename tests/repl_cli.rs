use assert_cmd::prelude::*;
use assert_fs::{fixture::ChildPath, prelude::*, TempDir};
use predicates::prelude::*;
use std::{
    io::Write,
    process::{Command, Stdio},
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const SEED: &str = r#"{
  "students": [
    {"id": 1, "name": "Ann Lee", "age": 20, "course": "Rust", "skills": ["cargo", "traits"],
     "email": "ann@example.com", "isEnrolled": true}
  ]
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(seed: &str) -> Result<Self> {
        let dir = TempDir::new()?;
        dir.child("students.json").write_str(seed)?;
        Ok(Self { dir })
    }

    fn storage(&self) -> ChildPath {
        self.dir.child("storage.json")
    }

    /// Runs the binary, feeding it `lines` on stdin
    fn run(&self, lines: &[&str]) -> Result<std::process::Output> {
        let mut cmd = Command::cargo_bin("roster")?
            .arg("-f")
            .arg(self.storage().path())
            .arg("-s")
            .arg(self.dir.child("students.json").path())
            .stdin(Stdio::piped())
            .stderr(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        let stdin = cmd.stdin.as_mut().unwrap();
        for line in lines {
            stdin.write_all(format!("{line}\n").as_bytes())?;
        }

        Ok(cmd.wait_with_output()?)
    }
}

#[test]
fn loads_seed_document() -> Result<()> {
    let fixture = Fixture::new(SEED)?;

    fixture
        .run(&["load", ".exit"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("Ann Lee"))
        .stdout(predicate::str::contains("cargo, traits"))
        .stdout(predicate::str::contains("update 1 | delete 1"));

    fixture
        .storage()
        .assert(predicate::str::contains("ann@example.com"));
    Ok(())
}

#[test]
fn persists_data() -> Result<()> {
    let fixture = Fixture::new(SEED)?;

    fixture
        .run(&[
            r#"add name="Bo Li" age=19 course=Math skills=algebra email=bo@example.com"#,
            r#"add name=Cy age=22 course=Art skills=paint,clay email=cy@example.com enrolled=yes"#,
            ".exit",
        ])?
        .assert()
        .success();

    // Seed is gone; the stored roster must be used from now on
    std::fs::remove_file(fixture.dir.child("students.json").path())?;

    fixture
        .run(&["load", ".exit"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("Bo Li"))
        .stdout(predicate::str::contains("paint, clay"))
        .stdout(predicate::str::contains("delete 3"));

    Ok(())
}

#[test]
fn updates_fields() -> Result<()> {
    let fixture = Fixture::new(SEED)?;

    fixture
        .run(&[r#"update 1 course="Systems Programming" enrolled=no"#, ".exit"])?
        .assert()
        .success();

    fixture
        .run(&["load", ".exit"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("Systems Programming"))
        .stdout(predicate::str::contains("Ann Lee"));

    Ok(())
}

#[test]
fn deletes_after_confirmation() -> Result<()> {
    let fixture = Fixture::new(SEED)?;

    fixture
        .run(&["delete 1", "no", "delete 1", "y", ".exit"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("cancelled"))
        .stdout(predicate::str::contains("No students found"));

    fixture
        .run(&["load", ".exit"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("Ann Lee").not());

    Ok(())
}

#[test]
fn invalid_input_is_reported() -> Result<()> {
    let fixture = Fixture::new(SEED)?;

    fixture
        .run(&[
            "add name=Bo age=19 course=Math skills=a",
            "add name=Bo age=zero course=Math skills=a email=b@x",
            "update 42 age=30",
            "delete 42",
            "y",
            "load",
            ".exit",
        ])?
        .assert()
        .success()
        .stdout(predicate::str::contains("error: invalid email: is required"))
        .stdout(predicate::str::contains("error: invalid age"))
        .stdout(predicate::str::contains("error: student 42 not found"))
        .stdout(predicate::str::contains("Ann Lee"));

    Ok(())
}

#[test]
fn malformed_seed_is_reported() -> Result<()> {
    let fixture = Fixture::new(r#"{"people": []}"#)?;

    fixture
        .run(&["load", ".exit"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to load students"))
        .stdout(predicate::str::contains("error: malformed data"));

    fixture.storage().assert(predicate::path::missing());
    Ok(())
}

#[test]
fn missing_seed_is_reported() -> Result<()> {
    let fixture = Fixture::new(SEED)?;
    std::fs::remove_file(fixture.dir.child("students.json").path())?;

    fixture
        .run(&["load", ".exit"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("error: failed to fetch seed document"));

    Ok(())
}

#[test]
fn adds_without_seed_document() -> Result<()> {
    let fixture = Fixture::new(SEED)?;
    std::fs::remove_file(fixture.dir.child("students.json").path())?;

    fixture
        .run(&[
            r#"add name="Bo Li" age=19 course=Math skills=algebra email=bo@example.com"#,
            ".exit",
        ])?
        .assert()
        .success()
        .stdout(predicate::str::contains("Bo Li"))
        .stdout(predicate::str::contains("update 1 | delete 1"));

    fixture.storage().assert(predicate::str::contains("Bo Li"));
    Ok(())
}

#[test]
fn corrupt_storage_keeps_session_alive() -> Result<()> {
    let fixture = Fixture::new(SEED)?;
    fixture.storage().write_str("not json")?;

    fixture
        .run(&[
            "load",
            r#"add name=Bo age=19 course=Math skills=a email=bo@example.com"#,
            ".help",
            ".exit",
        ])?
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to load students"))
        .stdout(predicate::str::contains("error: malformed data; storage file"))
        .stdout(predicate::str::contains("delete <id>"));

    fixture.storage().assert("not json");
    Ok(())
}
