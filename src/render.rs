use color_print::cformat;

use crate::store::{Record, RecordSet};

pub fn success(message: &str) -> String {
    cformat!("<green>{}</green>", message)
}

pub fn failure(message: &str) -> String {
    cformat!("<red>{}</red>", message)
}

pub fn record(record: &Record) -> String {
    let width = record.fields.iter().map(|(field, _)| field.chars().count()).max().unwrap_or(0);
    record.fields.iter()
        .map(|(field, value)| format!("{:<width$} : {}", field, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn record_json(record: &Record) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

/// Header row, a rule, then one line per record.
pub fn table(set: &RecordSet) -> String {
    let mut widths: Vec<usize> = set.schema.columns.iter().map(|c| c.chars().count()).collect();
    for record in &set.records {
        for (width, value) in widths.iter_mut().zip(record.row(&set.schema)) {
            *width = (*width).max(value.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells.iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(set.schema.columns.iter().map(String::as_str).collect())];
    out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    for record in &set.records {
        out.push(line(record.row(&set.schema).collect()));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Schema;

    #[test]
    fn aligned_table() {
        let schema = Schema::new(vec!["Rollno".to_string(), "name".to_string()]);
        let set = RecordSet {
            records: vec![
                Record::from_row(&schema, ["1", "Ravi"]),
                Record::from_row(&schema, ["10", "Annapoorna"]),
            ],
            schema,
        };
        assert_eq!(
            table(&set),
            "Rollno  name\n\
             ------  ----------\n\
             1       Ravi\n\
             10      Annapoorna"
        );
    }

    #[test]
    fn record_lines() {
        let schema = Schema::new(vec!["Rollno".to_string(), "name".to_string()]);
        let shown = record(&Record::from_row(&schema, ["4", "Meena"]));
        assert_eq!(shown, "Rollno : 4\nname   : Meena");
    }
}
