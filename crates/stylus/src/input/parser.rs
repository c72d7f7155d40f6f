//! CSV/TSV readers for line and translation rows.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::source::{FlatLineRecord, LineTable, SourceMetadata, TranslationRecord, TranslationTable};
use crate::error::{Result, StylusError};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<char>,
    /// Quote character.
    pub quote: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: '"',
        }
    }
}

/// Reads delimited files into per-tablet record tables.
pub struct RecordReader {
    config: InputConfig,
}

impl RecordReader {
    /// Create a reader with default configuration.
    pub fn new() -> Self {
        Self {
            config: InputConfig::default(),
        }
    }

    /// Create a reader with custom configuration.
    pub fn with_config(config: InputConfig) -> Self {
        Self { config }
    }

    /// Read line rows from a file.
    ///
    /// Rows of each tablet are ordered by column, then by id, which is the
    /// order the structurer and the line catalogue expect.
    pub fn read_lines(&self, path: impl AsRef<Path>) -> Result<(LineTable, SourceMetadata)> {
        let path = path.as_ref();
        let (contents, hash) = read_with_hash(path)?;
        let delimiter = self.delimiter_for(&contents)?;
        let mut table = self.parse_lines(&contents, delimiter)?;
        table.sort_rows_by_key(|line| (line.column_number, line.id));

        debug!(
            path = %path.display(),
            tablets = table.tablet_count(),
            rows = table.row_count(),
            "loaded line rows"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format_name(delimiter),
            table.row_count(),
            table.tablet_count(),
        );
        Ok((table, metadata))
    }

    /// Read translation rows from a file. Rows of each tablet are ordered by id.
    pub fn read_translations(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(TranslationTable, SourceMetadata)> {
        let path = path.as_ref();
        let (contents, hash) = read_with_hash(path)?;
        let delimiter = self.delimiter_for(&contents)?;
        let mut table = self.parse_translations(&contents, delimiter)?;
        table.sort_rows_by_key(|t| t.id);

        debug!(
            path = %path.display(),
            tablets = table.tablet_count(),
            rows = table.row_count(),
            "loaded translation rows"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format_name(delimiter),
            table.row_count(),
            table.tablet_count(),
        );
        Ok((table, metadata))
    }

    fn delimiter_for(&self, contents: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(c) if c.is_ascii() => Ok(c as u8),
            Some(c) => Err(StylusError::Config(format!(
                "delimiter must be an ASCII character, got '{}'",
                c
            ))),
            None => detect_delimiter(contents),
        }
    }

    fn reader<'a>(&self, bytes: &'a [u8], delimiter: u8) -> csv::Reader<&'a [u8]> {
        let quote = if self.config.quote.is_ascii() {
            self.config.quote as u8
        } else {
            b'"'
        };
        csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(quote)
            .flexible(true)
            .from_reader(bytes)
    }

    /// Parse line rows from bytes.
    fn parse_lines(&self, bytes: &[u8], delimiter: u8) -> Result<LineTable> {
        let mut reader = self.reader(bytes, delimiter);
        let columns = HeaderIndex::new(reader.headers()?);

        let tablet_col = columns.require(&["tablet_id", "p_number", "tablet"])?;
        let line_number_col = columns.require(&["line_number", "line_no", "number"])?;
        let raw_text_col = columns.require(&["raw_text", "text", "content"])?;
        let id_col = columns.find(&["id", "line_id"]);
        let ruling_col = columns.find(&["is_ruling", "ruling"]);
        let blank_col = columns.find(&["is_blank", "blank"]);
        let surface_col = columns.find(&["surface_type", "surface"]);
        let column_col = columns.find(&["column_number", "column"]);

        let mut table = LineTable::new();
        for (idx, result) in reader.records().enumerate() {
            let row = idx + 1;
            let record = result?;
            let cell = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("");

            let tablet_id = cell(Some(tablet_col)).trim().to_string();
            if tablet_id.is_empty() {
                warn!(row, "skipping line row without tablet id");
                continue;
            }

            let surface = cell(surface_col).trim();
            let line = FlatLineRecord {
                id: parse_id(cell(id_col), row)?,
                tablet_id: tablet_id.clone(),
                line_number: cell(Some(line_number_col)).trim().to_string(),
                raw_text: cell(Some(raw_text_col)).to_string(),
                is_ruling: parse_flag(cell(ruling_col), row)?,
                is_blank: parse_flag(cell(blank_col), row)?,
                surface_type: (!surface.is_empty()).then(|| surface.to_string()),
                column_number: parse_column(cell(column_col), row)?,
            };
            table.push(tablet_id, line);
        }

        if table.is_empty() {
            return Err(StylusError::EmptyData("No line rows found".to_string()));
        }
        Ok(table)
    }

    /// Parse translation rows from bytes.
    fn parse_translations(&self, bytes: &[u8], delimiter: u8) -> Result<TranslationTable> {
        let mut reader = self.reader(bytes, delimiter);
        let columns = HeaderIndex::new(reader.headers()?);

        let tablet_col = columns.require(&["tablet_id", "p_number", "tablet"])?;
        let text_col = columns.require(&["text", "translation", "translation_text"])?;
        let id_col = columns.find(&["id", "translation_id"]);
        let language_col = columns.find(&["language", "lang"]);

        let mut table = TranslationTable::new();
        for (idx, result) in reader.records().enumerate() {
            let row = idx + 1;
            let record = result?;
            let cell = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("");

            let tablet_id = cell(Some(tablet_col)).trim().to_string();
            if tablet_id.is_empty() {
                warn!(row, "skipping translation row without tablet id");
                continue;
            }

            let translation = TranslationRecord {
                id: parse_id(cell(id_col), row)?,
                tablet_id: tablet_id.clone(),
                text: cell(Some(text_col)).to_string(),
                language: cell(language_col).trim().to_string(),
            };
            table.push(tablet_id, translation);
        }

        if table.is_empty() {
            return Err(StylusError::EmptyData("No translation rows found".to_string()));
        }
        Ok(table)
    }
}

impl Default for RecordReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive header lookup with aliases.
struct HeaderIndex {
    headers: Vec<String>,
}

impl HeaderIndex {
    fn new(record: &csv::StringRecord) -> Self {
        Self {
            headers: record.iter().map(|h| h.trim().to_lowercase()).collect(),
        }
    }

    fn find(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|name| self.headers.iter().position(|h| h == name))
    }

    fn require(&self, names: &[&str]) -> Result<usize> {
        self.find(names).ok_or_else(|| StylusError::Parse {
            row: 0,
            message: format!("missing required column '{}'", names[0]),
        })
    }
}

fn read_with_hash(path: &Path) -> Result<(Vec<u8>, String)> {
    let mut file = File::open(path).map_err(|e| StylusError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(|e| StylusError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    let hash = format!("sha256:{:x}", hasher.finalize());

    Ok((contents, hash))
}

fn format_name(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
    .to_string()
}

/// Parse a row id. A missing id falls back to the row ordinal.
fn parse_id(value: &str, row: usize) -> Result<u64> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(row as u64);
    }
    value.parse().map_err(|_| StylusError::Parse {
        row,
        message: format!("invalid id '{}'", value),
    })
}

fn parse_column(value: &str, row: usize) -> Result<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value.parse().map_err(|_| StylusError::Parse {
        row,
        message: format!("invalid column number '{}'", value),
    })
}

fn parse_flag(value: &str, row: usize) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "f" | "no" | "n" => Ok(false),
        "1" | "true" | "t" | "yes" | "y" => Ok(true),
        other => Err(StylusError::Parse {
            row,
            message: format!("invalid boolean '{}'", other),
        }),
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(StylusError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts beat raw frequency; tabs get a small bonus since
        // transliterations often contain commas.
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"tablet_id\tline_number\traw_text\nP1\t1.\ta-na, lugal\nP1\t2.\tx";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_csv_with_quoted_commas() {
        let data = b"tablet_id,line_number,raw_text\nP1,1.,\"a, b\"\nP1,2.,c";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_parse_lines() {
        let reader = RecordReader::new();
        let data = b"tablet_id,id,line_number,raw_text,is_ruling,is_blank,surface_type,column_number\n\
                     P1,10,1.,lugal,0,0,obverse,\n\
                     P1,11,,,1,0,obverse,\n\
                     P2,12,1',{d}utu,false,false,,2\n";
        let table = reader.parse_lines(data, b',').unwrap();

        assert_eq!(table.tablet_count(), 2);
        let p1 = table.get("P1").unwrap();
        assert_eq!(p1[0].id, 10);
        assert_eq!(p1[0].raw_text, "lugal");
        assert!(p1[1].is_ruling);
        let p2 = table.get("P2").unwrap();
        assert_eq!(p2[0].surface_type, None);
        assert_eq!(p2[0].column_number, 2);
    }

    #[test]
    fn test_parse_lines_missing_id_uses_row_ordinal() {
        let reader = RecordReader::new();
        let data = b"tablet_id,line_number,raw_text\nP1,1.,a\nP1,2.,b\n";
        let table = reader.parse_lines(data, b',').unwrap();
        let ids: Vec<u64> = table.get("P1").unwrap().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_parse_lines_missing_required_column() {
        let reader = RecordReader::new();
        let data = b"tablet_id,raw_text\nP1,a\n";
        assert!(matches!(
            reader.parse_lines(data, b','),
            Err(StylusError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE", 1).unwrap());
        assert!(parse_flag("1", 1).unwrap());
        assert!(!parse_flag("", 1).unwrap());
        assert!(!parse_flag("no", 1).unwrap());
        assert!(parse_flag("maybe", 1).is_err());
    }

    #[test]
    fn test_parse_translations() {
        let reader = RecordReader::new();
        let data = b"tablet_id\tid\ttext\tlanguage\nP1\t5\to 1. the king\ten\n";
        let table = reader.parse_translations(data, b'\t').unwrap();
        let rows = table.get("P1").unwrap();
        assert_eq!(rows[0].id, 5);
        assert_eq!(rows[0].text, "o 1. the king");
        assert_eq!(rows[0].language, "en");
    }
}
