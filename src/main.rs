use std::io::{stdin, stdout};
use std::process::ExitCode;

use clap::Parser;
use color_print::ceprintln;
use tracing::error;

use cli::{Command, CommandLine};
use config::Config;
use error::StoreError;
use shell::{Shell, ShellErr, ShellExit};
use store::{capitalize, Candidate, RecordStore, SortOrder};

mod cli;
mod config;
mod error;
mod logging;
mod render;
mod shell;
mod store;

fn run_command(store: &mut RecordStore, command: Command) -> Result<(), StoreError> {
    match command {
        Command::Lookup { rollno, json } => {
            let record = store.lookup(&rollno)?;
            if json {
                let text = render::record_json(&record).map_err(std::io::Error::from)?;
                println!("{}", text);
            } else {
                println!("{}", render::record(&record));
            }
        }
        Command::Add { rollno, name, english, maths, science } => {
            let candidate = Candidate {
                rollno: rollno.trim().to_string(),
                name: capitalize(name.trim()),
                english: english.trim().to_string(),
                maths: maths.trim().to_string(),
                science: science.trim().to_string(),
            };
            let rollno = candidate.rollno.clone();
            store.append(candidate)?;
            println!("{}", render::success(&format!("Record {} added", rollno)));
        }
        Command::Average => {
            let count = store.compute_averages()?;
            println!("{}", render::success(&format!("Average computed and saved for {} records", count)));
        }
        Command::List { column, descending } => {
            let set = store.list_sorted(&column, SortOrder::from_ascending(!descending))?;
            println!("{}", render::table(&set));
        }
        Command::Shell => {
            let exit = Shell::new(store, stdin().lock(), stdout()).start();
            match exit {
                Ok(ShellExit::Quit) | Ok(ShellExit::EndOfInput) => {}
                Err(ShellErr::Io(e)) => return Err(StoreError::Io(e)),
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = CommandLine::parse();
    let config = match Config::resolve(&args) {
        Ok(config) => config,
        Err(e) => {
            ceprintln!("<red>{}</red>", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config);

    let mut store = match RecordStore::open(&config) {
        Ok(store) => store,
        Err(e) => {
            ceprintln!("<red>{}</red>", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = run_command(&mut store, args.command.unwrap_or(Command::Shell));
    drop(store);
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ceprintln!("<red>{}</red>", e);
            ExitCode::FAILURE
        }
    }
}
