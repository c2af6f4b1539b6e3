//! Flat delimited text storage.
//!
//! The file has a header row naming the columns followed by one record per line:
//!
//! ```text
//! sex,age,sum_assured,id
//! M,34,120500,1
//! F,NA,310000,2
//! ```
//!
//! A missing age is written as `NA`. When reading, `NA`, `"NA"` and an empty field
//! are all treated as missing. Columns are located by header name, so column
//! order may differ and extra columns (such as a row-name column) are ignored.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::{Dataset, PolicyRecord, Sex};
use crate::error::{Error, Result};

/// Column names, in the order they are written.
pub const COLUMNS: [&str; 4] = ["sex", "age", "sum_assured", "id"];

const DELIMITER: char = ',';
const MISSING: &str = "NA";

/// Write `dataset` as delimited text.
pub fn write_dataset<W: Write>(dataset: &Dataset, mut writer: W) -> Result<()> {
    writeln!(writer, "{}", COLUMNS.join(","))?;
    for r in dataset.records() {
        match r.age {
            Some(age) => writeln!(writer, "{},{},{},{}", r.sex, age, r.sum_assured, r.id)?,
            None => writeln!(writer, "{},{},{},{}", r.sex, MISSING, r.sum_assured, r.id)?,
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write `dataset` to a file at `path`, replacing any existing file.
pub fn save_dataset<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_dataset(dataset, BufWriter::new(file))?;
    log::debug!(
        "wrote {} records to {}",
        dataset.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Read a dataset from a file at `path`.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let file = File::open(path.as_ref())?;
    let dataset = read_dataset(BufReader::new(file))?;
    log::debug!(
        "loaded {} records from {}",
        dataset.len(),
        path.as_ref().display()
    );
    Ok(dataset)
}

/// Positions of the required columns within a row.
struct Layout {
    sex: usize,
    age: usize,
    sum_assured: usize,
    id: usize,
    width: usize,
}

impl Layout {
    fn from_header(header: &str) -> Result<Self> {
        let names: Vec<String> = header
            .split(DELIMITER)
            .map(|h| unquote(h).to_ascii_lowercase())
            .collect();
        let find = |column: &str| {
            names
                .iter()
                .position(|n| n == column)
                .ok_or_else(|| Error::MissingColumn {
                    column: column.to_string(),
                })
        };
        Ok(Self {
            sex: find("sex")?,
            age: find("age")?,
            sum_assured: find("sum_assured")?,
            id: find("id")?,
            width: names.len(),
        })
    }
}

fn unquote(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}

fn parse_int<T: std::str::FromStr>(field: &str, column: &str, line: usize) -> Result<T> {
    let value = unquote(field);
    value.parse::<T>().map_err(|_| Error::Parse {
        line,
        message: format!("invalid {column} value {value:?}"),
    })
}

fn parse_record(fields: &[&str], layout: &Layout, line: usize) -> Result<PolicyRecord> {
    let sex = fields[layout.sex].parse::<Sex>().map_err(|_| Error::Parse {
        line,
        message: format!("invalid sex value {:?}", unquote(fields[layout.sex])),
    })?;

    let age_field = unquote(fields[layout.age]);
    let age = if age_field.is_empty() || age_field == MISSING {
        None
    } else {
        Some(parse_int::<i64>(age_field, "age", line)?)
    };

    Ok(PolicyRecord {
        sex,
        age,
        sum_assured: parse_int(fields[layout.sum_assured], "sum_assured", line)?,
        id: parse_int(fields[layout.id], "id", line)?,
    })
}

/// Read a dataset from delimited text.
///
/// The header is validated before any record is parsed; a missing required
/// column is [`Error::MissingColumn`].
pub fn read_dataset<R: BufRead>(reader: R) -> Result<Dataset> {
    let mut lines = reader.lines().enumerate();

    let layout = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break Layout::from_header(&line)?;
                }
            }
            None => return Err(Error::EmptyInput),
        }
    };

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for (idx, line) in lines {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() != layout.width {
            return Err(Error::Parse {
                line: line_no,
                message: format!("expected {} fields, found {}", layout.width, fields.len()),
            });
        }

        let record = parse_record(&fields, &layout, line_no)?;
        if !seen.insert(record.id) {
            return Err(Error::Parse {
                line: line_no,
                message: format!("duplicate id {}", record.id),
            });
        }
        records.push(record);
    }

    Ok(Dataset::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Generator;

    fn read_str(text: &str) -> Result<Dataset> {
        read_dataset(text.as_bytes())
    }

    #[test]
    fn round_trip_preserves_records() {
        let dataset = Generator::default()
            .with_count_per_cluster(20)
            .with_seed(5)
            .generate()
            .unwrap();

        let mut buf = Vec::new();
        write_dataset(&dataset, &mut buf).unwrap();
        let loaded = read_dataset(buf.as_slice()).unwrap();

        assert_eq!(loaded, dataset);
        assert_eq!(loaded.missing_age_count(), 10);
    }

    #[test]
    fn writes_header_and_na() {
        let dataset = Dataset::new(vec![
            PolicyRecord {
                sex: Sex::Male,
                age: Some(30),
                sum_assured: 1000,
                id: 1,
            },
            PolicyRecord {
                sex: Sex::Female,
                age: None,
                sum_assured: 2000,
                id: 2,
            },
        ]);
        let mut buf = Vec::new();
        write_dataset(&dataset, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "sex,age,sum_assured,id\nM,30,1000,1\nF,NA,2000,2\n");
    }

    #[test]
    fn reads_reordered_quoted_columns_and_missing_markers() {
        let text = "\"\",\"id\",\"sum_assured\",\"age\",\"sex\"\n\
                    \"1\",3,5000,\"NA\",\"M\"\n\
                    \"2\",1,7000,,\"F\"\n\
                    \n\
                    \"3\",2,9000,44,\"F\"\n";
        let dataset = read_str(text).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.ids(), vec![3, 1, 2]);
        assert_eq!(dataset.records()[0].age, None);
        assert_eq!(dataset.records()[1].age, None);
        assert_eq!(dataset.records()[2].age, Some(44));
        assert_eq!(dataset.records()[2].sex, Sex::Female);
    }

    #[test]
    fn missing_column_is_schema_error() {
        let err = read_str("sex,age,id\nM,30,1\n").unwrap_err();
        match err {
            Error::MissingColumn { column } => assert_eq!(column, "sum_assured"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_rows_report_line() {
        let err = read_str("sex,age,sum_assured,id\nM,30,1000,1\nM,abc,1000,2\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));

        let err = read_str("sex,age,sum_assured,id\nM,30,1000\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));

        let err = read_str("sex,age,sum_assured,id\nQ,30,1000,1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = read_str("sex,age,sum_assured,id\nM,30,1000,1\nF,31,1000,1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn empty_input() {
        assert!(matches!(read_str(""), Err(Error::EmptyInput)));
        let header_only = read_str("sex,age,sum_assured,id\n").unwrap();
        assert!(header_only.is_empty());
    }
}
