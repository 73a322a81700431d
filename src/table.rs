// src/table.rs - robust delimited-table reading and safe writing
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

use crate::models::{Result, RowStatus};

const DELIMITER_CANDIDATES: [char; 4] = [',', ';', '\t', '|'];

/// Columns the pipeline writes; added with these defaults when absent.
const OUTPUT_COLUMNS: [(&str, &str); 8] = [
    ("email", ""),
    ("source_url", ""),
    ("method", ""),
    ("status", RowStatus::NotProcessed.as_str()),
    ("confidence", ""),
    ("external_urls", ""),
    ("primary_domain", ""),
    ("discovery_source", ""),
];

/// In-memory table: header row plus string cells, one Vec per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cell value by column name; "" for absent columns or rows.
    pub fn get(&self, row: usize, column: &str) -> &str {
        self.column_index(column)
            .and_then(|col| self.rows.get(row).and_then(|cells| cells.get(col)))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set(&mut self, row: usize, column: &str, value: &str) {
        if let Some(col) = self.column_index(column) {
            if let Some(cell) = self.rows.get_mut(row).and_then(|cells| cells.get_mut(col)) {
                *cell = value.to_string();
            }
        }
    }

    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    fn add_column(&mut self, name: &str, default: &str) {
        if self.column_index(name).is_some() {
            return;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(default.to_string());
        }
    }

    /// Make sure every output column exists before processing.
    pub fn ensure_columns(&mut self) {
        for (name, default) in OUTPUT_COLUMNS {
            self.add_column(name, default);
        }
    }
}

/// Read a delimited table with delimiter detection and encoding fallbacks.
/// Returns the table and the delimiter actually used.
pub fn read_table(path: &Path, delimiter: Option<char>) -> Result<(Table, char)> {
    let bytes = fs::read(path)?;
    let text = decode_text(&bytes);

    let used = delimiter.unwrap_or_else(|| detect_delimiter(&text));
    let mut records = parse_delimited(&text, used);
    if records.is_empty() {
        return Err("Input table is empty. Please provide a file with headers.".into());
    }

    let headers: Vec<String> = records
        .remove(0)
        .into_iter()
        .map(|header| header.trim().to_string())
        .collect();
    if headers.iter().all(|header| header.is_empty()) {
        return Err("Input table has no columns. Please provide a file with headers.".into());
    }

    let mut table = Table::new(headers);
    for record in records {
        table.push_row(record);
    }

    Ok((table, used))
}

/// Write the table Excel-friendly (UTF-8 BOM, every field quoted). If the
/// target cannot be written, fall back to a timestamped sibling path and
/// return the path actually written.
pub fn write_table(table: &Table, path: &Path, delimiter: char) -> Result<PathBuf> {
    match write_to(table, path, delimiter) {
        Ok(()) => Ok(path.to_path_buf()),
        Err(e) => {
            let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
            let stem = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("output");
            let extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("csv");
            let alternate = path.with_file_name(format!("{stem}_{timestamp}.{extension}"));

            warn!(
                "Could not write '{}' ({}). Writing '{}' instead.",
                path.display(),
                e,
                alternate.display()
            );
            write_to(table, &alternate, delimiter)?;
            Ok(alternate)
        }
    }
}

/// Default output path: `<input stem>_enriched.csv` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}_enriched.csv"))
}

fn write_to(table: &Table, path: &Path, delimiter: char) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all("\u{feff}".as_bytes())?;

    let separator = delimiter.to_string();
    writeln!(
        file,
        "{}",
        table
            .headers
            .iter()
            .map(|header| quoted(header))
            .collect::<Vec<_>>()
            .join(&separator)
    )?;

    for row in &table.rows {
        writeln!(
            file,
            "{}",
            row.iter()
                .map(|cell| quoted(cell))
                .collect::<Vec<_>>()
                .join(&separator)
        )?;
    }

    Ok(())
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Pick the candidate delimiter that occurs most in the header line.
fn detect_delimiter(text: &str) -> char {
    let header = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    let mut best = ',';
    let mut best_count = 0;
    for candidate in DELIMITER_CANDIDATES {
        let count = header.matches(candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// UTF-8 (BOM-stripped) first; otherwise Windows-1252, which decodes any
/// byte sequence and covers the Latin-1 range.
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&byte| cp1252_char(byte)).collect(),
    }
}

fn cp1252_char(byte: u8) -> char {
    // 0x80..=0x9F is where cp1252 and Latin-1 disagree
    const HIGH: [char; 32] = [
        '€', '\u{81}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{8d}', 'Ž',
        '\u{8f}', '\u{90}', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ', '\u{9d}',
        'ž', 'Ÿ',
    ];
    match byte {
        0x80..=0x9f => HIGH[(byte - 0x80) as usize],
        _ => byte as char,
    }
}

/// Quote-aware parse: RFC-4180 quoting, doubled-quote escapes, embedded
/// delimiters and newlines. Blank lines are skipped.
fn parse_delimited(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        if c == '"' && field.is_empty() {
            in_quotes = true;
        } else if c == delimiter {
            record.push(std::mem::take(&mut field));
        } else if c == '\r' || c == '\n' {
            if c == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            record.push(std::mem::take(&mut field));
            records.push(std::mem::take(&mut record));
        } else {
            field.push(c);
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    records
}
