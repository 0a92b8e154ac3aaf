use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(name = "roster", about = "Manage a roster of student records kept in a CSV file")]
pub struct CommandLine {
    /// JSON file with data_file, log_file and log_level.
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Backing CSV file (default: Student_data.csv).
    #[clap(long)]
    pub file: Option<PathBuf>,
    #[clap(long = "log-file")]
    pub log_file: Option<PathBuf>,
    #[clap(long = "log-level")]
    pub log_level: Option<String>,
    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    Lookup {
        rollno: String,
        #[clap(long, action)]
        json: bool,
    },
    Add {
        #[clap(long, default_value = "")]
        rollno: String,
        #[clap(long, default_value = "")]
        name: String,
        #[clap(long, default_value = "")]
        english: String,
        #[clap(long, default_value = "")]
        maths: String,
        #[clap(long, default_value = "")]
        science: String,
    },
    Average,
    List {
        column: String,
        #[clap(long, action)]
        descending: bool,
    },
    Shell,
}
