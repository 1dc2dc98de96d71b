use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{SelectionError, ShapeError};

pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
    Timestamp,
    Ordered,
}

impl ColumnKind {
    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Text => "text",
            ColumnKind::Timestamp => "datetime",
            ColumnKind::Ordered => "categorical",
        }
    }
}

/// Cell storage for one column. Missing cells are `None`.
///
/// `Ordered` holds a categorical column with a declared level order; each
/// code indexes into `levels`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Timestamp(Vec<Option<DateTime<Utc>>>),
    Ordered {
        levels: Vec<String>,
        codes: Vec<Option<usize>>,
    },
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Integer(_) => ColumnKind::Integer,
            ColumnData::Float(_) => ColumnKind::Float,
            ColumnData::Text(_) => ColumnKind::Text,
            ColumnData::Timestamp(_) => ColumnKind::Timestamp,
            ColumnData::Ordered { .. } => ColumnKind::Ordered,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
            ColumnData::Ordered { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Integer(_) | ColumnData::Float(_))
    }

    pub fn numeric(&self, row: usize) -> Option<f64> {
        match self {
            ColumnData::Integer(v) => v.get(row).copied().flatten().map(|x| x as f64),
            ColumnData::Float(v) => v
                .get(row)
                .copied()
                .flatten()
                .filter(|x| !x.is_nan()),
            _ => None,
        }
    }

    /// Group label of a cell, used for breakdowns and box plot categories.
    pub fn label(&self, row: usize) -> Option<Cow<'_, str>> {
        match self {
            ColumnData::Text(v) => v.get(row)?.as_deref().map(Cow::Borrowed),
            ColumnData::Ordered { levels, codes } => {
                let code = (*codes.get(row)?)?;
                levels.get(code).map(|s| Cow::Borrowed(s.as_str()))
            }
            ColumnData::Integer(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|x| Cow::Owned(x.to_string())),
            ColumnData::Float(_) => self.numeric(row).map(|x| Cow::Owned(format_float(x))),
            ColumnData::Timestamp(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|ts| Cow::Owned(ts.format(TIMESTAMP_DISPLAY_FORMAT).to_string())),
        }
    }

    /// Grid rendering of a cell; missing cells render empty.
    pub fn display(&self, row: usize) -> String {
        self.label(row).map(Cow::into_owned).unwrap_or_default()
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.is_missing(row)).count()
    }

    fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Integer(v) => v[row].is_none(),
            ColumnData::Float(v) => v[row].is_none_or(|x| x.is_nan()),
            ColumnData::Text(v) => v[row].is_none(),
            ColumnData::Timestamp(v) => v[row].is_none(),
            ColumnData::Ordered { codes, .. } => codes[row].is_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }
}

/// Column-oriented, immutable-after-load table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn from_columns(
        name: impl Into<String>,
        columns: Vec<Column>,
    ) -> Result<Self, ShapeError> {
        let rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        let mut seen = HashSet::new();
        for column in &columns {
            if column.data.len() != rows {
                return Err(ShapeError::RowCount {
                    column: column.name.clone(),
                    expected: rows,
                    found: column.data.len(),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(ShapeError::Duplicate {
                    column: column.name.clone(),
                });
            }
        }
        Ok(Self {
            name: name.into(),
            columns,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn add_column(&mut self, column: Column) -> Result<(), ShapeError> {
        if self.has_column(&column.name) {
            return Err(ShapeError::Duplicate {
                column: column.name,
            });
        }
        if !self.columns.is_empty() && column.data.len() != self.rows {
            return Err(ShapeError::RowCount {
                column: column.name,
                expected: self.rows,
                found: column.data.len(),
            });
        }
        self.rows = column.data.len();
        self.columns.push(column);
        Ok(())
    }

    /// Looks a column up by name, failing the way a stale selection should.
    pub fn require(&self, name: &str) -> Result<&Column, SelectionError> {
        self.column(name).ok_or_else(|| SelectionError::UnknownColumn {
            column: name.to_string(),
        })
    }

    /// Present values of a numeric column, in row order.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<f64>, SelectionError> {
        let column = self.require(name)?;
        if !column.data.is_numeric() {
            return Err(SelectionError::NotNumerical {
                column: name.to_string(),
            });
        }
        Ok((0..self.rows).filter_map(|row| column.data.numeric(row)).collect())
    }
}

pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        let text = format!("{value:.6}");
        text.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_formatting_trims_noise() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(-1.5), "-1.5");
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        let err = Table::from_columns(
            "t",
            vec![
                Column::new("a", ColumnData::Integer(vec![Some(1), Some(2)])),
                Column::new("b", ColumnData::Integer(vec![Some(1)])),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ShapeError::RowCount { found: 1, .. }));
    }

    #[test]
    fn ordered_labels_follow_levels() {
        let data = ColumnData::Ordered {
            levels: vec!["Mon".to_string(), "Tue".to_string()],
            codes: vec![Some(1), None, Some(0)],
        };
        assert_eq!(data.display(0), "Tue");
        assert_eq!(data.display(1), "");
        assert_eq!(data.display(2), "Mon");
        assert_eq!(data.missing_count(), 1);
    }
}
