// src/table/mod.rs
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use tracing::debug;

use crate::error::AnalysisError;

pub mod columns;

pub use columns::ColumnMap;

/// One parsed record and the source line it starts on (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub line: u64,
    pub fields: Vec<String>,
}

/// Reads a tab-delimited file into rows of owned fields, header row included.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_tsv<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>> {
    Ok(read_tsv_records(path)?
        .into_iter()
        .map(|record| record.fields)
        .collect())
}

/// Like [`read_tsv`], keeping each record's source line.
pub fn read_tsv_records<P: AsRef<Path>>(path: P) -> Result<Vec<SourceRecord>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open TSV file: {:?}", path.as_ref()))?;
    parse_tsv_records(file)
        .with_context(|| format!("Failed to parse TSV file: {:?}", path.as_ref()))
}

/// Parses tab-delimited records from any reader. Rows may differ in length.
pub fn parse_tsv<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    Ok(parse_tsv_records(reader)?
        .into_iter()
        .map(|record| record.fields)
        .collect())
}

/// Parses records with the source line each starts on. Blank lines yield no
/// record but still count towards later line numbers.
pub fn parse_tsv_records<R: Read>(mut reader: R) -> Result<Vec<SourceRecord>> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .context("Failed to read TSV input")?;

    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_slice());

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("TSV parse error at record {}", idx))?;
        let line = match record.position() {
            // the reader marks a record where the previous one ended, before
            // any blank lines it skipped
            Some(pos) => {
                let start = (pos.byte() as usize).min(data.len());
                let skipped = data[start..]
                    .iter()
                    .take_while(|&&b| b == b'\n' || b == b'\r')
                    .filter(|&&b| b == b'\n')
                    .count() as u64;
                pos.line() + skipped
            }
            None => idx as u64 + 1,
        };
        rows.push(SourceRecord {
            line,
            fields: record.iter().map(|s| s.to_string()).collect(),
        });
    }
    Ok(rows)
}

/// Synthetic label for a row starting on source line `line`.
pub fn line_label(line: u64) -> String {
    format!("line {}", line)
}

/// A movement's annotation table with a line label prepended to every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationTable {
    /// Position 0 is the header.
    rows: Vec<Vec<String>>,
}

/// Borrowed view of one row together with its position in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRow<'a> {
    pub position: usize,
    pub fields: &'a [String],
}

impl<'a> TableRow<'a> {
    /// Field at `index`, or `""` when the row is shorter than that.
    pub fn field(&self, index: usize) -> &'a str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn label(&self) -> &'a str {
        self.field(0)
    }
}

impl AnnotationTable {
    /// Load and label the annotation TSV at `path`.
    #[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let records = read_tsv_records(&path)?;
        if records.is_empty() {
            return Err(AnalysisError::EmptyTable {
                path: path.as_ref().display().to_string(),
            }
            .into());
        }
        let table = Self::from_source_records(records);
        debug!(rows = table.len(), "annotation table loaded");
        Ok(table)
    }

    /// Label raw records (header first) as if they sat on consecutive lines.
    pub fn from_records(records: Vec<Vec<String>>) -> Self {
        Self::from_source_records(
            records
                .into_iter()
                .enumerate()
                .map(|(idx, fields)| SourceRecord {
                    line: idx as u64 + 1,
                    fields,
                })
                .collect(),
        )
    }

    /// Label parsed records (header first) with the line each started on.
    pub fn from_source_records(records: Vec<SourceRecord>) -> Self {
        let rows = records
            .into_iter()
            .map(|record| {
                let mut labelled = Vec::with_capacity(record.fields.len() + 1);
                labelled.push(line_label(record.line));
                labelled.extend(record.fields);
                labelled
            })
            .collect();
        Self { rows }
    }

    /// Labelled header row, empty if the table has no rows at all.
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, position: usize) -> Option<TableRow<'_>> {
        self.rows.get(position).map(|fields| TableRow {
            position,
            fields: fields.as_slice(),
        })
    }

    /// Every row after the header, in file order.
    pub fn data_rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(position, fields)| TableRow {
                position,
                fields: fields.as_slice(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn parse_keeps_ragged_rows_and_quotes() -> Result<()> {
        let content = "mn\tchord\tcadence\n1\t\"V(64)\"\n2\tI\tPAC\n";
        let rows = parse_tsv(Cursor::new(content))?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["1", "V(64)"]);
        assert_eq!(rows[2], vec!["2", "I", "PAC"]);
        Ok(())
    }

    #[test]
    fn labels_follow_row_position() {
        let table = AnnotationTable::from_records(vec![
            vec!["mn".into(), "chord".into()],
            vec!["1".into(), "I".into()],
            vec!["2".into(), "V".into()],
        ]);
        assert_eq!(table.header(), ["line 1", "mn", "chord"]);
        let labels: Vec<&str> = table.data_rows().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["line 2", "line 3"]);
        assert_eq!(table.row(2).map(|r| r.field(2)), Some("V"));
    }

    #[test]
    fn labels_keep_source_lines_across_blank_lines() -> Result<()> {
        let content = "mn\tnumeral\n1\tI\n\n3\tii\n";
        let table = AnnotationTable::from_source_records(parse_tsv_records(Cursor::new(content))?);
        let labels: Vec<&str> = table.data_rows().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["line 2", "line 4"]);
        assert_eq!(table.row(2).map(|r| r.field(2)), Some("ii"));
        Ok(())
    }

    #[test]
    fn quoted_newline_keeps_following_lines_aligned() -> Result<()> {
        let content = "mn\tchord\n1\t\"I\nI\"\n2\tV\n";
        let table = AnnotationTable::from_source_records(parse_tsv_records(Cursor::new(content))?);
        let labels: Vec<&str> = table.data_rows().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["line 2", "line 4"]);
        Ok(())
    }

    #[test]
    fn load_labels_rows_after_blank_line_by_file_line() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "mn\tnumeral\n1\tI\n\n\n5\tIV\n")?;

        let table = AnnotationTable::load(tmp.path())?;
        assert_eq!(table.len(), 3);
        assert_eq!(table.row(2).map(|r| r.label()), Some("line 5"));
        Ok(())
    }

    #[test]
    fn missing_field_reads_as_empty() {
        let table = AnnotationTable::from_records(vec![
            vec!["mn".into(), "cadence".into()],
            vec!["1".into()],
        ]);
        let row = table.row(1).expect("data row");
        assert_eq!(row.field(2), "");
        assert_eq!(row.field(99), "");
    }

    #[test]
    fn load_reads_and_labels_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "mn\tnumeral\n1\tI\n1\tii\n")?;

        let table = AnnotationTable::load(tmp.path())?;
        assert_eq!(table.len(), 3);
        assert_eq!(table.row(2).map(|r| r.fields.to_vec()), Some(vec![
            "line 3".to_string(),
            "1".to_string(),
            "ii".to_string()
        ]));
        Ok(())
    }

    #[test]
    fn load_rejects_empty_file() -> Result<()> {
        let tmp = NamedTempFile::new()?;
        let err = AnnotationTable::load(tmp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::EmptyTable { .. })
        ));
        Ok(())
    }

    #[test]
    fn load_missing_file_names_path() {
        let err = AnnotationTable::load("/definitely/not/here.tsv").unwrap_err();
        assert!(format!("{:#}", err).contains("/definitely/not/here.tsv"));
    }
}
