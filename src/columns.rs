use serde::Serialize;

use crate::error::SelectionError;
use crate::table::Table;

pub const ROUND: &str = "round";

/// Columns that make sense as breakdown categories. Team and result columns
/// only; other text columns are not offered.
pub const CATEGORICAL_COLUMNS: [&str; 4] = [
    "full_time_result",
    "half_time_result",
    "home_team",
    "away_team",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnClassification {
    numerical: Vec<String>,
    categorical: Vec<String>,
}

impl ColumnClassification {
    pub fn classify(table: &Table) -> Self {
        let numerical = table
            .columns()
            .iter()
            .filter(|c| c.data.is_numeric())
            .map(|c| c.name.clone())
            .collect();
        let categorical = CATEGORICAL_COLUMNS
            .iter()
            .filter(|name| table.has_column(name))
            .map(|name| name.to_string())
            .collect();
        Self {
            numerical,
            categorical,
        }
    }

    pub fn numerical(&self) -> &[String] {
        &self.numerical
    }

    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }

    /// Metrics offered for trends: every numerical column except `round`.
    pub fn trend_metrics(&self) -> Vec<String> {
        self.numerical
            .iter()
            .filter(|name| name.as_str() != ROUND)
            .cloned()
            .collect()
    }

    pub fn is_numerical(&self, column: &str) -> bool {
        self.numerical.iter().any(|c| c == column)
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.iter().any(|c| c == column)
    }

    pub fn require_numerical(&self, column: &str) -> Result<(), SelectionError> {
        if self.is_numerical(column) {
            Ok(())
        } else {
            Err(SelectionError::NotNumerical {
                column: column.to_string(),
            })
        }
    }

    pub fn require_categorical(&self, column: &str) -> Result<(), SelectionError> {
        if self.is_categorical(column) {
            Ok(())
        } else {
            Err(SelectionError::NotCategorical {
                column: column.to_string(),
            })
        }
    }
}
