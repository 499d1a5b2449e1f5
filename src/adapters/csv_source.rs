use crate::domain::model::HostRecord;
use crate::utils::error::{Result, UninstallError};
use std::fs::File;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// Tab for `.tsv`/`.tab` files, comma for everything else.
pub fn delimiter_for_path(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") | Some("tab") => b'\t',
        _ => b',',
    }
}

/// Checks that `path` names an existing regular file.
pub fn ensure_input_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(UninstallError::InputNotFound {
            path: path.display().to_string(),
        })
    }
}

fn record_start_line(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(1)
}

/// Number of physical lines a record occupies, counting newlines inside quoted fields.
fn record_line_span(record: &csv::StringRecord) -> u64 {
    1 + record
        .iter()
        .map(|field| field.matches('\n').count() as u64)
        .sum::<u64>()
}

/// Reads every data row of a delimited file with a header line, in file order.
pub fn load_host_records(path: &Path, delimiter: u8) -> Result<Vec<HostRecord>> {
    ensure_input_exists(path)?;

    let parse_error = |message: String| UninstallError::InputParseError {
        path: path.display().to_string(),
        message,
    };

    let file = File::open(path).map_err(|e| parse_error(e.to_string()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let header_record = reader
        .headers()
        .map_err(|e| parse_error(e.to_string()))?
        .clone();
    let headers: Vec<String> = header_record
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches(UTF8_BOM) } else { h };
            h.trim().to_string()
        })
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(parse_error("missing header row".to_string()));
    }

    // The csv reader drops empty lines; they are kept as empty rows so each one is reported.
    let mut next_line = record_start_line(&header_record) + record_line_span(&header_record);
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| parse_error(e.to_string()))?;
        let line = record_start_line(&row);

        for blank in next_line..line {
            records.push(HostRecord::empty(blank as usize));
        }

        let data: Vec<(String, String)> = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        records.push(HostRecord::new(line as usize, data));
        next_line = line + record_line_span(&row);
    }

    tracing::debug!("Parsed {} columns: {:?}", headers.len(), headers);
    Ok(records)
}
