use std::path::Path;

use tracing::{debug, info, warn};

use crate::columns::ColumnClassification;
use crate::error::{LoadError, SelectionError};
use crate::loader;
use crate::table::Table;
use crate::views::{self, CorrelationMatrix, DerivedView, Selection, TrendGroup};

/// Immutable season dataset handed to every view computation.
///
/// Built once; views that take no user input are computed here and reused.
#[derive(Debug, Clone)]
pub struct DatasetContext {
    table: Table,
    classes: ColumnClassification,
    correlation: CorrelationMatrix,
}

impl DatasetContext {
    pub fn new(table: Table) -> Self {
        let classes = ColumnClassification::classify(&table);
        let correlation = views::correlation_matrix(&table, &classes);
        info!(
            rows = table.row_count(),
            numerical = classes.numerical().len(),
            categorical = classes.categorical().len(),
            "dataset context ready"
        );
        Self {
            table,
            classes,
            correlation,
        }
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Ok(Self::new(loader::load_match_table(path)?))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn classes(&self) -> &ColumnClassification {
        &self.classes
    }

    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    /// Derives the view for a selection. Stale or invalid selections yield
    /// `DerivedView::Empty`.
    pub fn derive(&self, selection: &Selection) -> DerivedView {
        match self.try_derive(selection) {
            Ok(view) => view,
            Err(err) => {
                warn!(%err, ?selection, "selection rejected");
                DerivedView::Empty
            }
        }
    }

    pub fn try_derive(&self, selection: &Selection) -> Result<DerivedView, SelectionError> {
        debug!(?selection, "deriving view");
        let (table, classes) = (&self.table, &self.classes);
        let view = match selection {
            Selection::Distribution { column: Some(column) } => {
                match views::distribution(table, classes, column)? {
                    Some(histogram) => DerivedView::Histogram(histogram),
                    None => DerivedView::Empty,
                }
            }
            Selection::Categorical {
                column: Some(column),
            } => DerivedView::Breakdown(views::categorical_breakdown(table, classes, column)?),
            Selection::BoxPlot {
                numerical: Some(numerical),
                categorical: Some(categorical),
            } => DerivedView::BoxPlot(views::grouped_summary(
                table,
                classes,
                numerical,
                categorical,
            )?),
            Selection::Scatter {
                x: Some(x),
                y: Some(y),
            } => DerivedView::Scatter(views::pairwise(table, classes, x, y)?),
            Selection::Heatmap => DerivedView::Correlation(self.correlation.clone()),
            Selection::Trend {
                metric: Some(metric),
                group_by: Some(group_by),
            } => {
                let group_by: TrendGroup = group_by.parse()?;
                DerivedView::Trend(views::trend(table, classes, metric, group_by)?)
            }
            _ => DerivedView::Empty,
        };
        Ok(view)
    }
}
