mod parser;
mod command;
use std::io::{BufRead, Write};

use tracing::{debug, info};

use super::error::{Result, StoreError};
use super::render;
use super::shell::parser::Parser;
use super::store::{capitalize, Candidate, Record, RecordSet, RecordStore, SortOrder};

/// What the shell needs from whoever owns the records.
pub trait Host {
    fn lookup(&mut self, rollno: &str) -> Result<Record>;
    fn add(&mut self, candidate: Candidate) -> Result<()>;
    fn compute_averages(&mut self) -> Result<usize>;
    fn list_sorted(&mut self, column: &str, order: SortOrder) -> Result<RecordSet>;
}

impl Host for RecordStore {
    fn lookup(&mut self, rollno: &str) -> Result<Record> {
        RecordStore::lookup(self, rollno)
    }

    fn add(&mut self, candidate: Candidate) -> Result<()> {
        self.append(candidate)
    }

    fn compute_averages(&mut self) -> Result<usize> {
        RecordStore::compute_averages(self)
    }

    fn list_sorted(&mut self, column: &str, order: SortOrder) -> Result<RecordSet> {
        RecordStore::list_sorted(self, column, order)
    }
}

#[derive(Debug)]
pub enum ShellErr {
    Io(std::io::Error),
}

impl core::fmt::Display for ShellErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Terminal I/O failed: {e}"),
        }
    }
}

impl From<std::io::Error> for ShellErr {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl std::error::Error for ShellErr {}

/// How the loop ended. The caller decides what to do with the process.
#[derive(Debug, PartialEq, Eq)]
pub enum ShellExit {
    Quit,
    EndOfInput,
}

const HELP: &str = "\
1 | lookup [ROLLNO]            show one record
2 | add                        enter a new record
3 | average                    compute and save each student's Average
4 | list [COLUMN] [asc|desc]   list records sorted by a column
5 | quit                       leave";

pub struct Shell<'a, T, R, W> where T: Host, R: BufRead, W: Write {
    host: &'a mut T,
    input: R,
    output: W,
    prompt: String,
}

impl<'a, T, R, W> Shell<'a, T, R, W> where T: Host, R: BufRead, W: Write {
    pub fn new(host_: &'a mut T, input_: R, output_: W) -> Self {
        Self {
            host: host_,
            input: input_,
            output: output_,
            prompt: String::from("(roster)> "),
        }
    }

    pub fn start(&mut self) -> core::result::Result<ShellExit, ShellErr> {
        writeln!(self.output, "{}", HELP)?;
        self.main_loop()
    }

    fn print_prompt(&mut self, prompt: &str) -> core::result::Result<(), ShellErr> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        Ok(())
    }

    /// The line as typed, minus its line ending. `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> core::result::Result<Option<String>, ShellErr> {
        self.print_prompt(prompt)?;
        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn read_answer(&mut self, prompt: &str) -> core::result::Result<Option<String>, ShellErr> {
        Ok(self.read_line(prompt)?.map(|line| line.trim().to_string()))
    }

    fn report(&mut self, err: &StoreError) -> core::result::Result<(), ShellErr> {
        writeln!(self.output, "{}", render::failure(&err.to_string()))?;
        Ok(())
    }

    pub fn main_loop(&mut self) -> core::result::Result<ShellExit, ShellErr> {
        let mut parser = Parser {};
        loop {
            let prompt = self.prompt.clone();
            let input = match self.read_answer(&prompt)? {
                Some(inner) => inner,
                None => {
                    info!("Input closed, leaving shell");
                    return Ok(ShellExit::EndOfInput)
                },
            };

            let command = match parser.parse(&input) {
                Ok(inner) => inner,
                Err(parser::ParseErr::IncorrectNArguments(command, actual, expected)) => {
                    writeln!(self.output, "Incorrect number of args for command: {}, {}/{}", command, actual, expected)?;
                    continue;
                },
                Err(parser::ParseErr::UnknownCommand(command)) => {
                    writeln!(self.output, "Unknown command: {} (try help)", command)?;
                    continue;
                },
                Err(parser::ParseErr::InvalidDirection(word)) => {
                    writeln!(self.output, "Unknown sort direction: {} (use asc or desc)", word)?;
                    continue;
                },
                Err(parser::ParseErr::EmptyLine) => continue,
            };
            debug!("Shell command: {:?}", command);

            let finished = match command {
                command::Command::Lookup { rollno } => self.lookup(rollno)?,
                command::Command::Add => self.add()?,
                command::Command::Average => self.average()?,
                command::Command::List { column, ascending } => self.list(column, ascending)?,
                command::Command::Help => {
                    writeln!(self.output, "{}", HELP)?;
                    false
                },
                command::Command::Quit => {
                    info!("Leaving shell");
                    return Ok(ShellExit::Quit)
                },
            };

            if finished {
                return Ok(ShellExit::EndOfInput)
            }
        }
    }

    // Each handler returns true when input ran out part way through.

    fn lookup(&mut self, rollno: Option<String>) -> core::result::Result<bool, ShellErr> {
        let rollno = match rollno {
            Some(rollno) => rollno,
            // Rollno is matched exactly, so keep the answer as typed.
            None => match self.read_line("Enter the Rollno: ")? {
                Some(rollno) => rollno,
                None => return Ok(true),
            },
        };

        match self.host.lookup(&rollno) {
            Ok(record) => writeln!(self.output, "{}", render::record(&record))?,
            Err(e) => self.report(&e)?,
        }
        Ok(false)
    }

    fn add(&mut self) -> core::result::Result<bool, ShellErr> {
        let mut answers = vec![];
        for prompt in [
            "Enter the Rollno: ",
            "Enter the name: ",
            "Enter the english score: ",
            "Enter the maths score: ",
            "Enter the science score: ",
        ] {
            match self.read_answer(prompt)? {
                Some(answer) => answers.push(answer),
                None => return Ok(true),
            }
        }

        let mut answers = answers.into_iter();
        let mut next = || answers.next().unwrap_or_default();
        let candidate = Candidate {
            rollno: next(),
            name: capitalize(&next()),
            english: next(),
            maths: next(),
            science: next(),
        };

        let rollno = candidate.rollno.clone();
        match self.host.add(candidate) {
            Ok(()) => writeln!(self.output, "{}", render::success(&format!("Record {} added", rollno)))?,
            Err(e) => self.report(&e)?,
        }
        Ok(false)
    }

    fn average(&mut self) -> core::result::Result<bool, ShellErr> {
        match self.host.compute_averages() {
            Ok(count) => {
                let message = format!("Average computed and saved for {} records", count);
                writeln!(self.output, "{}", render::success(&message))?
            }
            Err(e) => self.report(&e)?,
        }
        Ok(false)
    }

    fn list(&mut self, column: Option<String>, ascending: Option<bool>) -> core::result::Result<bool, ShellErr> {
        let column = match column {
            Some(column) => column,
            None => match self.read_answer("Sort by column: ")? {
                Some(column) => column,
                None => return Ok(true),
            },
        };

        let ascending = match ascending {
            Some(ascending) => ascending,
            None => loop {
                let answer = match self.read_answer("Sort ascending? (y/n): ")? {
                    Some(answer) => answer,
                    None => return Ok(true),
                };
                match parser::parse_direction(&answer) {
                    Some(ascending) => break ascending,
                    None => writeln!(self.output, "Please answer y or n")?,
                }
            },
        };

        match self.host.list_sorted(&column, SortOrder::from_ascending(ascending)) {
            Ok(set) => writeln!(self.output, "{}", render::table(&set))?,
            Err(e) => self.report(&e)?,
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::config::Config;

    fn store() -> (RecordStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.csv");
        fs::copy(Path::new("test_data").join("students.csv"), &path).unwrap();
        let config = Config { data_file: path, ..Config::default() };
        (RecordStore::open(&config).unwrap(), dir)
    }

    fn run(store: &mut RecordStore, script: &str) -> (ShellExit, String) {
        let mut out = Vec::new();
        let exit = Shell::new(store, Cursor::new(script.as_bytes()), &mut out).start().unwrap();
        (exit, String::from_utf8(out).unwrap())
    }

    #[test]
    fn quit_is_returned_not_exited() {
        let (mut store, _dir) = store();
        let (exit, out) = run(&mut store, "quit\nlookup 1\n");
        assert_eq!(exit, ShellExit::Quit);
        assert!(!out.contains("Karthik"));
    }

    #[test]
    fn end_of_input() {
        let (mut store, _dir) = store();
        let (exit, _) = run(&mut store, "help\n");
        assert_eq!(exit, ShellExit::EndOfInput);
    }

    #[test]
    fn lookup_prompts_when_no_argument() {
        let (mut store, _dir) = store();
        let (_, out) = run(&mut store, "1\n2\nlookup 42\nquit\n");
        assert!(out.contains("Enter the Rollno: "));
        assert!(out.contains("name    : Priya"));
        assert!(out.contains("No records found for rollno: 42"));
    }

    #[test]
    fn prompted_rollno_is_not_trimmed() {
        let (mut store, _dir) = store();
        let (_, out) = run(&mut store, "lookup\n 2\nlookup\n2\r\nquit\n");
        assert!(out.contains("No records found for rollno:  2"));
        assert!(out.contains("name    : Priya"));
    }

    #[test]
    fn add_capitalizes_and_persists() {
        let (mut store, _dir) = store();
        let (_, out) = run(&mut store, "add\n 9 \nsaanvi\n70\n80\n90\nquit\n");
        assert!(out.contains("Record 9 added"));
        let record = store.lookup("9").unwrap();
        assert_eq!(record.get("name"), Some("Saanvi"));
        assert_eq!(record.get("english"), Some("70"));
    }

    #[test]
    fn add_rejections_keep_going() {
        let (mut store, _dir) = store();
        let before = store.read_all().unwrap().len();
        let (exit, out) = run(&mut store, "add\n10\n\n70\n\n90\nadd\n1\nDup\n1\n1\n1\nquit\n");
        assert_eq!(exit, ShellExit::Quit);
        assert!(out.contains("Missing required fields: name, maths"));
        assert!(out.contains("A record with Rollno 1 already exists"));
        assert_eq!(store.read_all().unwrap().len(), before);
    }

    #[test]
    fn add_interrupted_by_end_of_input() {
        let (mut store, _dir) = store();
        let before = store.read_all().unwrap().len();
        let (exit, _) = run(&mut store, "add\n11\nasha\n");
        assert_eq!(exit, ShellExit::EndOfInput);
        assert_eq!(store.read_all().unwrap().len(), before);
    }

    #[test]
    fn average_then_list_descending() {
        let (mut store, _dir) = store();
        let (_, out) = run(&mut store, "average\nlist Average\nn\nquit\n");
        assert!(out.contains("Average computed and saved for 4 records"));
        assert!(out.contains("Sort ascending? (y/n): "));

        let table_start = out.find("Rollno").unwrap();
        let rows: Vec<&str> = out[table_start..].lines().skip(2).take(4).collect();
        let ids: Vec<&str> = rows.iter().map(|row| row.split_whitespace().next().unwrap()).collect();
        assert_eq!(ids, vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn list_reprompts_on_bad_direction() {
        let (mut store, _dir) = store();
        let (_, out) = run(&mut store, "list name\nsideways\ny\nquit\n");
        assert!(out.contains("Please answer y or n"));
        assert!(out.contains("Arjun"));
    }

    #[test]
    fn list_unknown_column() {
        let (mut store, _dir) = store();
        let (_, out) = run(&mut store, "list age asc\nquit\n");
        assert!(out.contains("Invalid column: age"));
        assert!(!out.contains("-----"));
    }

    #[test]
    fn parse_errors_are_reported() {
        let (mut store, _dir) = store();
        let (exit, out) = run(&mut store, "\nfrobnicate\naverage twice\nlist a b c\nquit\n");
        assert_eq!(exit, ShellExit::Quit);
        assert!(out.contains("Unknown command: frobnicate"));
        assert!(out.contains("Incorrect number of args for command: average, 1/0"));
        assert!(out.contains("Incorrect number of args for command: list, 3/2"));
    }
}
