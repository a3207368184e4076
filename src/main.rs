use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use roster::start_repl;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional name shown in the prompt
    name: Option<String>,

    /// Optionally, sets the storage file to use
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Seed document read when storage holds no students
    #[arg(short, long, value_name = "FILE")]
    seed: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let name = cli.name.unwrap_or("roster".into());
    let path = cli.file.unwrap_or("/tmp/roster.json".into());
    let seed = cli.seed.unwrap_or("students.json".into());

    match start_repl(name, path, seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
