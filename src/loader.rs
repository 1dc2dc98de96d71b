use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, info};

use crate::calendar::{self, UTC_TIME};
use crate::error::LoadError;
use crate::table::{Column, ColumnData, ColumnKind, Table};

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Drop a leading column whose header is blank (a serialized row index).
    pub index_column: bool,
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            index_column: false,
            delimiter: b',',
        }
    }
}

pub fn load_table(path: &Path, options: LoadOptions) -> Result<Table, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let table = read_table(file, &name, options)?;
    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded table"
    );
    Ok(table)
}

/// Loads the canonical match dataset and adds the calendar columns.
pub fn load_match_table(path: &Path) -> Result<Table, LoadError> {
    let mut table = load_table(
        path,
        LoadOptions {
            index_column: true,
            ..LoadOptions::default()
        },
    )?;
    calendar::derive_calendar_columns(&mut table)?;
    Ok(table)
}

pub fn read_table<R: Read>(
    reader: R,
    name: &str,
    options: LoadOptions,
) -> Result<Table, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| LoadError::Parse {
            origin: name.to_string(),
            source,
        })?
        .clone();
    if headers.is_empty() {
        return Err(LoadError::Empty {
            origin: name.to_string(),
        });
    }

    let skip_index = options.index_column && headers.get(0).is_some_and(|h| h.trim().is_empty());
    let first = usize::from(skip_index);
    let names: Vec<String> = headers
        .iter()
        .enumerate()
        .skip(first)
        .map(|(idx, h)| {
            let trimmed = h.trim();
            if trimmed.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                trimmed.to_string()
            }
        })
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for record in csv_reader.records() {
        let record = record.map_err(|source| LoadError::Parse {
            origin: name.to_string(),
            source,
        })?;
        for (slot, field) in cells.iter_mut().zip(record.iter().skip(first)) {
            let trimmed = field.trim();
            slot.push((!trimmed.is_empty()).then(|| trimmed.to_string()));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| {
            let data = infer_column(raw);
            debug!(column = %name, kind = data.kind().label(), "inferred column type");
            Column::new(name, data)
        })
        .collect();
    Ok(Table::from_columns(name, columns)?)
}

/// Picks the narrowest type every present cell parses as:
/// integer, then float, then timestamp, falling back to text.
pub fn infer_column(raw: Vec<Option<String>>) -> ColumnData {
    if raw.iter().all(Option::is_none) {
        return ColumnData::Float(vec![None; raw.len()]);
    }
    if let Some(values) = parse_all(&raw, |s| s.parse::<i64>().ok()) {
        return ColumnData::Integer(values);
    }
    if let Some(values) = parse_all(&raw, |s| s.parse::<f64>().ok()) {
        return ColumnData::Float(values);
    }
    if let Some(values) = parse_all(&raw, parse_timestamp) {
        return ColumnData::Timestamp(values);
    }
    ColumnData::Text(raw)
}

fn parse_all<T>(
    raw: &[Option<String>],
    parse: impl Fn(&str) -> Option<T>,
) -> Option<Vec<Option<T>>> {
    raw.iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => parse(text).map(Some),
        })
        .collect()
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"];
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Verifies the canonical timestamp column before calendar derivation.
pub(crate) fn require_timestamp(table: &Table) -> Result<&[Option<DateTime<Utc>>], LoadError> {
    let column = table.column(UTC_TIME).ok_or_else(|| LoadError::MissingColumn {
        origin: table.name().to_string(),
        column: UTC_TIME.to_string(),
    })?;
    match &column.data {
        ColumnData::Timestamp(times) => Ok(times),
        other => Err(LoadError::ColumnType {
            origin: table.name().to_string(),
            column: UTC_TIME.to_string(),
            expected: ColumnKind::Timestamp,
            found: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_with_offsets_normalize_to_utc() {
        let ts = parse_timestamp("2023-08-11 19:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-08-11T17:30:00+00:00");
        assert!(parse_timestamp("2023-08-11").is_some());
        assert!(parse_timestamp("17").is_none());
    }

    #[test]
    fn inference_prefers_narrowest_type() {
        let ints = infer_column(vec![Some("1".into()), None, Some("3".into())]);
        assert_eq!(ints.kind(), ColumnKind::Integer);
        let floats = infer_column(vec![Some("1".into()), Some("2.5".into())]);
        assert_eq!(floats.kind(), ColumnKind::Float);
        let text = infer_column(vec![Some("H".into()), Some("2".into())]);
        assert_eq!(text.kind(), ColumnKind::Text);
    }
}
