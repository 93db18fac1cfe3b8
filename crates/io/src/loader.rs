// Pipe-delimited feature table import

use std::io::Read;
use std::path::{Path, PathBuf};

use feataudit_recon::{AttributeSet, Table};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::header::true_header_len;

/// Quote characters stripped (one layer per side) from every data cell.
const QUOTES: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found at {}!", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is empty (no header line)", path.display())]
    Empty { path: PathBuf },

    #[error("{} does not have a valid table header", path.display())]
    InvalidHeader { path: PathBuf },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A malformed data row, kept verbatim for the diagnostic listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    /// 1-based line number in the source file.
    pub line: u64,
    pub raw: String,
}

/// A parsed table plus the row diagnostics collected while loading it.
#[derive(Debug)]
pub struct LoadedTable {
    pub path: PathBuf,
    pub table: Table,
    /// Rows whose key cell is empty, blank lines included. Always collected
    /// since such rows cannot be stored; only reported for validated tables.
    pub nameless_rows: Vec<RowDiagnostic>,
    /// Rows with values beyond the header's width. Only collected when
    /// validating.
    pub overwide_rows: Vec<RowDiagnostic>,
}

impl LoadedTable {
    pub fn has_diagnostics(&self) -> bool {
        !self.nameless_rows.is_empty() || !self.overwide_rows.is_empty()
    }
}

/// Load one feature table. `validate` enables the too-many-attributes check.
pub fn load_table(path: &Path, validate: bool) -> Result<LoadedTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound { path: path.to_path_buf() });
    }
    let content = read_file_as_utf8(path)?;
    parse_table(&content, path, validate)
}

/// Read file and convert to UTF-8 if needed (spreadsheet exports are often
/// Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let read_err = |source| LoadError::Read { path: path.to_path_buf(), source };

    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            debug!(path = %path.display(), "decoded as windows-1252");
            Ok(decoded.into_owned())
        }
    }
}

/// Parse table content. `path` is only used for error messages and logging.
pub fn parse_table(content: &str, path: &Path, validate: bool) -> Result<LoadedTable, LoadError> {
    let parse_err = |source| LoadError::Parse { path: path.to_path_buf(), source };

    // No quoting: a `"` is data, and `|` always separates cells.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .quoting(false)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(parse_err)?,
        None => return Err(LoadError::Empty { path: path.to_path_buf() }),
    };
    // The reader skips blank lines, so a blank first line shows up as a
    // header starting further down.
    if header.position().is_some_and(|p| p.line() != 1) {
        return Err(LoadError::InvalidHeader { path: path.to_path_buf() });
    }
    let header_cells: Vec<&str> = header.iter().collect();
    let attr_num = true_header_len(&header_cells)
        .ok_or_else(|| LoadError::InvalidHeader { path: path.to_path_buf() })?;
    let attribute_names: Vec<String> =
        header_cells[1..attr_num].iter().map(|c| c.to_string()).collect();

    let mut table = Table::new(attribute_names.iter().cloned());
    let mut nameless_rows = Vec::new();
    let mut overwide_rows = Vec::new();

    let mut next_line = 2;
    for record in records {
        let record = record.map_err(parse_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(next_line);
        // Lines skipped since the previous record were blank: name-less rows.
        nameless_rows.extend(blank_rows(next_line..line));
        next_line = line + 1;
        let cells: Vec<String> = record.iter().map(clean_cell).collect();
        let raw = || record.iter().collect::<Vec<_>>().join("|");

        if validate {
            let last_value_idx = cells
                .iter()
                .enumerate()
                .skip(1)
                .filter(|(_, c)| !c.is_empty())
                .map(|(i, _)| i)
                .last()
                .unwrap_or(0);
            if last_value_idx + 1 > attr_num {
                overwide_rows.push(RowDiagnostic { line, raw: raw() });
            }
        }

        let key = cells.first().map(String::as_str).unwrap_or("");
        // Short rows leave trailing attributes empty.
        let attrs: AttributeSet = attribute_names
            .iter()
            .enumerate()
            .map(|(j, name)| (name.as_str(), cells.get(j + 1).map(String::as_str).unwrap_or("")))
            .collect();

        if !table.insert(key, attrs) {
            nameless_rows.push(RowDiagnostic { line, raw: raw() });
        }
    }

    let last_line = content.lines().count() as u64;
    nameless_rows.extend(blank_rows(next_line..last_line + 1));

    info!(
        path = %path.display(),
        features = table.len(),
        attributes = attr_num - 1,
        "loaded table"
    );
    if validate && (!nameless_rows.is_empty() || !overwide_rows.is_empty()) {
        warn!(
            path = %path.display(),
            nameless = nameless_rows.len(),
            overwide = overwide_rows.len(),
            "malformed rows"
        );
    }

    Ok(LoadedTable {
        path: path.to_path_buf(),
        table,
        nameless_rows,
        overwide_rows,
    })
}

fn blank_rows(lines: std::ops::Range<u64>) -> impl Iterator<Item = RowDiagnostic> {
    lines.map(|line| RowDiagnostic { line, raw: String::new() })
}

/// Trim surrounding whitespace, then one quote character from each end.
pub fn clean_cell(raw: &str) -> String {
    let s = raw.trim();
    let s = s.strip_prefix(QUOTES).unwrap_or(s);
    let s = s.strip_suffix(QUOTES).unwrap_or(s);
    s.to_string()
}
