use serde::ser::{Serialize, SerializeMap, Serializer};

pub const ROLLNO: &str = "Rollno";
pub const NAME: &str = "name";
pub const ENGLISH: &str = "english";
pub const MATHS: &str = "maths";
pub const SCIENCE: &str = "science";
pub const AVERAGE: &str = "Average";

/// Columns every written row must carry, in header order.
pub const REQUIRED_FIELDS: [&str; 5] = [ROLLNO, NAME, ENGLISH, MATHS, SCIENCE];
pub const SCORE_FIELDS: [&str; 3] = [ENGLISH, MATHS, SCIENCE];

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Schema {
    pub columns: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn canonical() -> Self {
        Self::new(REQUIRED_FIELDS.iter().map(|c| c.to_string()).collect())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn missing_required(&self) -> Vec<String> {
        REQUIRED_FIELDS.iter()
            .filter(|field| !self.contains(field))
            .map(|field| field.to_string())
            .collect()
    }

    /// Appends `column` unless it is already present. Returns true if added.
    pub fn ensure(&mut self, column: &str) -> bool {
        if self.contains(column) {
            return false;
        }
        self.columns.push(column.to_string());
        true
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Record {
    pub fields: Vec<(String, String)>,
}

impl Record {
    pub fn from_row<'a>(schema: &Schema, values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut values = values.into_iter();
        Self {
            fields: schema.columns.iter()
                .map(|column| (column.clone(), values.next().unwrap_or("").to_string()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.iter()
            .find(|search| search.0 == field)
            .map(|search| search.1.as_str())
    }

    pub fn rollno(&self) -> &str {
        self.get(ROLLNO).unwrap_or("")
    }

    pub fn set(&mut self, field: &str, value: String) {
        match self.fields.iter_mut().find(|search| search.0 == field) {
            Some(existing) => existing.1 = value,
            None => self.fields.push((field.to_string(), value)),
        }
    }

    /// Values in `schema` order, blank where the record has no such field.
    pub fn row<'a>(&'a self, schema: &'a Schema) -> impl Iterator<Item = &'a str> + 'a {
        schema.columns.iter().map(move |column| self.get(column).unwrap_or(""))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// A record gathered at data entry, before it has been validated.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Candidate {
    pub rollno: String,
    pub name: String,
    pub english: String,
    pub maths: String,
    pub science: String,
}

impl Candidate {
    pub fn value(&self, field: &str) -> Option<&str> {
        match field {
            ROLLNO => Some(&self.rollno),
            NAME => Some(&self.name),
            ENGLISH => Some(&self.english),
            MATHS => Some(&self.maths),
            SCIENCE => Some(&self.science),
            _ => None,
        }
    }

    pub fn missing_fields(&self) -> Vec<String> {
        REQUIRED_FIELDS.iter()
            .filter(|field| self.value(field).map_or(true, |v| v.trim().is_empty()))
            .map(|field| field.to_string())
            .collect()
    }

    pub fn into_record(self) -> Record {
        Record {
            fields: vec![
                (ROLLNO.to_string(), self.rollno),
                (NAME.to_string(), self.name),
                (ENGLISH.to_string(), self.english),
                (MATHS.to_string(), self.maths),
                (SCIENCE.to_string(), self.science),
            ],
        }
    }
}

/// Uppercases the first character and leaves the rest as typed.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
