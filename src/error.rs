use std::path::PathBuf;

pub type Result<T> = core::result::Result<T, StoreError>;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Rejection {
    Incomplete { missing: Vec<String> },
    Duplicate { rollno: String },
}

impl core::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incomplete { missing } => {
                write!(f, "Missing required fields: {}", missing.join(", "))
            }
            Self::Duplicate { rollno } => {
                write!(f, "A record with Rollno {} already exists", rollno)
            }
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    Open { path: PathBuf, source: std::io::Error },
    NotFound(String),
    Rejected(Rejection),
    ParseFailure { rollno: String, field: String, value: String },
    InvalidColumn(String),
    MissingColumns(Vec<String>),
    MalformedRow { line: u64, expected: usize, found: usize },
    Io(std::io::Error),
    Csv(csv::Error),
}

impl StoreError {
    /// Everything except a failed open is reported and survived.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "Error while opening the file {}: {}", path.display(), source)
            }
            Self::NotFound(rollno) => write!(f, "No records found for rollno: {}", rollno),
            Self::Rejected(reason) => write!(f, "Record rejected. {}", reason),
            Self::ParseFailure { rollno, field, value } => {
                write!(f, "Could not parse {} score \"{}\" for rollno {}", field, value, rollno)
            }
            Self::InvalidColumn(column) => write!(f, "Invalid column: {}", column),
            Self::MissingColumns(columns) => {
                write!(f, "Backing file is missing columns: {}", columns.join(", "))
            }
            Self::MalformedRow { line, expected, found } => {
                write!(f, "Row on line {} has {} fields, header has {}", line, found, expected)
            }
            Self::Io(e) => write!(f, "{e}"),
            Self::Csv(e) => write!(f, "{e}"),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for StoreError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<Rejection> for StoreError {
    fn from(value: Rejection) -> Self {
        Self::Rejected(value)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            Self::Csv(e) => Some(e),
            _ => None,
        }
    }
}
