use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{Rejection, Result, StoreError};
use super::record::{Candidate, Record, Schema, AVERAGE, SCORE_FIELDS};
use super::sort::{sort_records, SortOrder};

/// Schema plus every row, in file order.
#[derive(Debug, PartialEq, Clone)]
pub struct RecordSet {
    pub schema: Schema,
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn find(&self, rollno: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.rollno() == rollno)
    }
}

/// All access to the backing CSV file. The read handle lives as long as the
/// store; every scan starts again from offset 0.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    file: File,
}

impl RecordStore {
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.data_file.clone();
        match File::open(&path) {
            Ok(file) => {
                info!("{} opened Successfully", path.display());
                Ok(Self { path, file })
            }
            Err(source) => {
                error!("Error while opening the file {}: {}", path.display(), source);
                Err(StoreError::Open { path, source })
            }
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_all(&self) -> Result<RecordSet> {
        let mut handle = &self.file;
        handle.seek(SeekFrom::Start(0))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(handle);

        let schema = Schema::new(reader.headers()?.iter().map(|h| h.to_string()).collect());
        let mut records = vec![];
        for row in reader.records() {
            let row = row?;
            if row.len() > schema.columns.len() {
                return Err(StoreError::MalformedRow {
                    line: row.position().map_or(0, |p| p.line()),
                    expected: schema.columns.len(),
                    found: row.len(),
                });
            }
            records.push(Record::from_row(&schema, row.iter()));
        }

        Ok(RecordSet { schema, records })
    }

    pub fn lookup(&self, rollno: &str) -> Result<Record> {
        let set = self.read_all()?;
        match set.find(rollno) {
            Some(record) => {
                info!("Retrieved record for rollno: {}", rollno);
                Ok(record.clone())
            }
            None => {
                error!("No records found for rollno: {}", rollno);
                Err(StoreError::NotFound(rollno.to_string()))
            }
        }
    }

    /// Completeness is checked before uniqueness.
    pub fn validate_new(&self, candidate: &Candidate) -> Result<()> {
        let missing = candidate.missing_fields();
        if !missing.is_empty() {
            warn!("Rejected record, missing fields: {}", missing.join(", "));
            return Err(Rejection::Incomplete { missing }.into());
        }

        let set = self.read_all()?;
        if set.find(&candidate.rollno).is_some() {
            warn!("Rejected record, duplicate rollno: {}", candidate.rollno);
            return Err(Rejection::Duplicate { rollno: candidate.rollno.clone() }.into());
        }
        Ok(())
    }

    pub fn append(&mut self, candidate: Candidate) -> Result<()> {
        self.validate_new(&candidate)?;

        let mut set = self.read_all()?;
        let write_header = set.schema.is_empty();
        if write_header {
            set.schema = Schema::canonical();
        }
        let missing = set.schema.missing_required();
        if !missing.is_empty() {
            error!("Cannot append to {}, missing columns: {}", self.path.display(), missing.join(", "));
            return Err(StoreError::MissingColumns(missing));
        }

        let rollno = candidate.rollno.clone();
        let record = candidate.into_record();

        let mut buffer = vec![];
        if !write_header && !self.ends_with_newline()? {
            buffer.push(b'\n');
        }
        {
            let mut writer = csv::Writer::from_writer(&mut buffer);
            if write_header {
                writer.write_record(&set.schema.columns)?;
            }
            writer.write_record(record.row(&set.schema))?;
            writer.flush()?;
        }

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(&buffer)?;
        file.flush()?;

        info!("Appended record for rollno: {}", rollno);
        Ok(())
    }

    /// Rewrites the whole file with an `Average` column. Nothing is written
    /// unless every row parses. Returns the number of rows updated.
    pub fn compute_averages(&mut self) -> Result<usize> {
        let mut set = self.read_all()?;
        let missing: Vec<String> = SCORE_FIELDS.iter()
            .filter(|field| !set.schema.contains(field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            error!("Cannot compute averages, missing columns: {}", missing.join(", "));
            return Err(StoreError::MissingColumns(missing));
        }

        let mut averages = Vec::with_capacity(set.len());
        for record in &set.records {
            averages.push(average_of(record)?);
        }

        set.schema.ensure(AVERAGE);
        for (record, average) in set.records.iter_mut().zip(averages) {
            record.set(AVERAGE, format_average(average));
        }

        let mut buffer = vec![];
        {
            let mut writer = csv::Writer::from_writer(&mut buffer);
            writer.write_record(&set.schema.columns)?;
            for record in &set.records {
                writer.write_record(record.row(&set.schema))?;
            }
            writer.flush()?;
        }

        self.replace_contents(&buffer)?;

        info!("Average computed and written for {} records", set.len());
        Ok(set.len())
    }

    pub fn list_sorted(&self, column: &str, order: SortOrder) -> Result<RecordSet> {
        let mut set = self.read_all()?;
        if !set.schema.contains(column) {
            error!("Invalid column: {}", column);
            return Err(StoreError::InvalidColumn(column.to_string()));
        }
        sort_records(&mut set.records, column, order);
        info!("Listed {} records sorted by {} ({:?})", set.len(), column, order);
        Ok(set)
    }

    /// Stages `contents` beside the backing file and renames it into place,
    /// so a failed write leaves the old file untouched. The read handle is
    /// reopened on the new file afterwards.
    fn replace_contents(&mut self, contents: &[u8]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(contents)?;
        staged.as_file().sync_all()?;
        fs::set_permissions(staged.path(), fs::metadata(&self.path)?.permissions())?;
        staged.persist(&self.path).map_err(|e| e.error)?;

        self.file = File::open(&self.path)?;
        Ok(())
    }

    fn ends_with_newline(&self) -> Result<bool> {
        let mut handle = &self.file;
        let len = handle.seek(SeekFrom::End(0))?;
        if len == 0 {
            return Ok(true);
        }
        handle.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        handle.read_exact(&mut last)?;
        Ok(last[0] == b'\n')
    }
}

fn average_of(record: &Record) -> Result<f64> {
    let mut total = 0.0;
    for field in SCORE_FIELDS {
        let value = record.get(field).unwrap_or("");
        match value.trim().parse::<f64>() {
            Ok(score) if score.is_finite() => total += score,
            _ => {
                error!("Could not parse {} score \"{}\" for rollno {}", field, value, record.rollno());
                return Err(StoreError::ParseFailure {
                    rollno: record.rollno().to_string(),
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }
    }
    Ok(((total / 3.0) * 100.0).round() / 100.0)
}

/// Whole numbers keep one decimal place (`80.0`); others print as short as
/// they round-trip (`83.33`).
pub fn format_average(average: f64) -> String {
    if average.fract() == 0.0 {
        format!("{average:.1}")
    } else {
        format!("{average}")
    }
}
