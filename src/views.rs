use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::Serialize;

use crate::calendar::{DAY_OF_WEEK, MONTH_NAME};
use crate::columns::{ColumnClassification, ROUND};
use crate::error::{FitError, SelectionError};
use crate::summary;
use crate::table::{ColumnData, Table};

pub const HISTOGRAM_BINS: usize = 38;
const WHISKER_IQR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub column: String,
    pub slices: Vec<Slice>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub category: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlot {
    pub numerical: String,
    pub categorical: String,
    pub groups: Vec<BoxSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: Option<f64>,
    pub start: (f64, f64),
    pub end: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter {
    pub x: String,
    pub y: String,
    pub points: Vec<(f64, f64)>,
    pub fit: Result<LinearFit, FitError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major; `None` where the coefficient is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i)?.get(j).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendGroup {
    Round,
    DayOfWeek,
    MonthName,
}

impl TrendGroup {
    pub const ALL: [TrendGroup; 3] = [
        TrendGroup::Round,
        TrendGroup::DayOfWeek,
        TrendGroup::MonthName,
    ];

    pub fn column(self) -> &'static str {
        match self {
            TrendGroup::Round => ROUND,
            TrendGroup::DayOfWeek => DAY_OF_WEEK,
            TrendGroup::MonthName => MONTH_NAME,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrendGroup::Round => "Match Round",
            TrendGroup::DayOfWeek => "Day of the Week",
            TrendGroup::MonthName => "Month",
        }
    }
}

impl FromStr for TrendGroup {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrendGroup::ALL
            .into_iter()
            .find(|g| g.column() == s)
            .ok_or_else(|| SelectionError::UnsupportedGrouping {
                column: s.to_string(),
            })
    }
}

impl fmt::Display for TrendGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub group: String,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub metric: String,
    pub group_by: TrendGroup,
    pub points: Vec<TrendPoint>,
}

/// What the user has picked on one visualization tab. `None` means the
/// control is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Distribution {
        column: Option<String>,
    },
    Categorical {
        column: Option<String>,
    },
    BoxPlot {
        numerical: Option<String>,
        categorical: Option<String>,
    },
    Scatter {
        x: Option<String>,
        y: Option<String>,
    },
    Heatmap,
    Trend {
        metric: Option<String>,
        group_by: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "view", rename_all = "snake_case")]
pub enum DerivedView {
    Empty,
    Histogram(Histogram),
    Breakdown(Breakdown),
    BoxPlot(BoxPlot),
    Scatter(Scatter),
    Correlation(CorrelationMatrix),
    Trend(Trend),
}

impl DerivedView {
    pub fn is_empty(&self) -> bool {
        matches!(self, DerivedView::Empty)
    }
}

/// Fixed-width histogram over the present values of a numerical column.
///
/// Bins are half-open except the last, which also takes the maximum.
/// `None` when the column has no values.
pub fn distribution(
    table: &Table,
    classes: &ColumnClassification,
    column: &str,
) -> Result<Option<Histogram>, SelectionError> {
    table.require(column)?;
    classes.require_numerical(column)?;
    let values = table.numeric_values(column)?;
    if values.is_empty() {
        return Ok(None);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (start, width) = if max > min {
        (min, (max - min) / HISTOGRAM_BINS as f64)
    } else {
        (min - 0.5, 1.0 / HISTOGRAM_BINS as f64)
    };

    let mut counts = [0usize; HISTOGRAM_BINS];
    for v in &values {
        let idx = ((v - start) / width).floor() as usize;
        counts[idx.min(HISTOGRAM_BINS - 1)] += 1;
    }
    let bins = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| HistogramBin {
            start: start + i as f64 * width,
            end: start + (i + 1) as f64 * width,
            count,
        })
        .collect();

    Ok(Some(Histogram {
        column: column.to_string(),
        bins,
        total: values.len(),
    }))
}

/// Value counts, most frequent first; ties keep first-appearance order.
pub fn categorical_breakdown(
    table: &Table,
    classes: &ColumnClassification,
    column: &str,
) -> Result<Breakdown, SelectionError> {
    let data = &table.require(column)?.data;
    classes.require_categorical(column)?;

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in 0..table.row_count() {
        let Some(label) = data.label(row) else {
            continue;
        };
        let slot = counts.entry(label.to_string()).or_insert_with(|| {
            order.push(label.to_string());
            0
        });
        *slot += 1;
    }

    let mut slices: Vec<Slice> = order
        .into_iter()
        .map(|value| {
            let count = counts.get(&value).copied().unwrap_or(0);
            Slice { value, count }
        })
        .collect();
    slices.sort_by(|a, b| b.count.cmp(&a.count));
    let total = slices.iter().map(|s| s.count).sum();

    Ok(Breakdown {
        column: column.to_string(),
        slices,
        total,
    })
}

/// Five-number summary of `numerical` per category of `categorical`,
/// categories in order of first appearance.
pub fn grouped_summary(
    table: &Table,
    classes: &ColumnClassification,
    numerical: &str,
    categorical: &str,
) -> Result<BoxPlot, SelectionError> {
    let values = &table.require(numerical)?.data;
    let categories = &table.require(categorical)?.data;
    classes.require_numerical(numerical)?;
    classes.require_categorical(categorical)?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
    for row in 0..table.row_count() {
        let (Some(category), Some(value)) = (categories.label(row), values.numeric(row)) else {
            continue;
        };
        groups
            .entry(category.to_string())
            .or_insert_with(|| {
                order.push(category.to_string());
                Vec::new()
            })
            .push(value);
    }

    let groups = order
        .into_iter()
        .filter_map(|category| {
            let mut values = groups.remove(&category)?;
            values.sort_by(f64::total_cmp);
            box_summary(category, &values)
        })
        .collect();

    Ok(BoxPlot {
        numerical: numerical.to_string(),
        categorical: categorical.to_string(),
        groups,
    })
}

fn box_summary(category: String, sorted: &[f64]) -> Option<BoxSummary> {
    let q1 = summary::quantile_sorted(sorted, 0.25)?;
    let median = summary::quantile_sorted(sorted, 0.5)?;
    let q3 = summary::quantile_sorted(sorted, 0.75)?;
    let iqr = q3 - q1;
    let low_fence = q1 - WHISKER_IQR * iqr;
    let high_fence = q3 + WHISKER_IQR * iqr;

    let inside = sorted.iter().copied().filter(|v| *v >= low_fence && *v <= high_fence);
    let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
    let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxSummary {
        category,
        count: sorted.len(),
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Paired points plus an ordinary least-squares line across the x range.
pub fn pairwise(
    table: &Table,
    classes: &ColumnClassification,
    x: &str,
    y: &str,
) -> Result<Scatter, SelectionError> {
    let xs = &table.require(x)?.data;
    let ys = &table.require(y)?.data;
    classes.require_numerical(x)?;
    classes.require_numerical(y)?;

    let points: Vec<(f64, f64)> = (0..table.row_count())
        .filter_map(|row| Some((xs.numeric(row)?, ys.numeric(row)?)))
        .collect();

    let fit = summary::ordinary_least_squares(&points).map(|ols| {
        let lo = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let hi = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        LinearFit {
            slope: ols.slope,
            intercept: ols.intercept,
            r_squared: ols.r_squared,
            start: (lo, ols.intercept + ols.slope * lo),
            end: (hi, ols.intercept + ols.slope * hi),
        }
    });

    Ok(Scatter {
        x: x.to_string(),
        y: y.to_string(),
        points,
        fit,
    })
}

/// Pearson matrix over every numerical column, using the rows where both
/// columns of a pair are present. The diagonal is exactly 1.0.
pub fn correlation_matrix(table: &Table, classes: &ColumnClassification) -> CorrelationMatrix {
    let columns: Vec<String> = classes.numerical().to_vec();
    let data: Vec<&ColumnData> = columns
        .iter()
        .filter_map(|name| table.column(name).map(|c| &c.data))
        .collect();
    let n = data.len();

    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();
    let coefficients: Vec<Option<f64>> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let paired: Vec<(f64, f64)> = (0..table.row_count())
                .filter_map(|row| Some((data[i].numeric(row)?, data[j].numeric(row)?)))
                .collect();
            summary::pearson(&paired)
        })
        .collect();

    let mut values = vec![vec![None; n]; n];
    for (i, row) in values.iter_mut().enumerate() {
        row[i] = Some(1.0);
    }
    for (&(i, j), r) in pairs.iter().zip(coefficients) {
        values[i][j] = r;
        values[j][i] = r;
    }

    CorrelationMatrix {
        columns: columns.into_iter().take(n).collect(),
        values,
    }
}

/// Mean of `metric` per group value that occurs in the data. Rounds ascend
/// numerically; days and months follow their declared order.
pub fn trend(
    table: &Table,
    classes: &ColumnClassification,
    metric: &str,
    group_by: TrendGroup,
) -> Result<Trend, SelectionError> {
    let values = &table.require(metric)?.data;
    if metric == ROUND {
        return Err(SelectionError::ExcludedMetric {
            column: metric.to_string(),
        });
    }
    classes.require_numerical(metric)?;
    let groups = &table.require(group_by.column())?.data;

    let points = match groups {
        ColumnData::Integer(keys) => {
            let mut acc: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
            for (row, key) in keys.iter().enumerate() {
                let (Some(key), Some(v)) = (key, values.numeric(row)) else {
                    continue;
                };
                let slot = acc.entry(*key).or_insert((0.0, 0));
                slot.0 += v;
                slot.1 += 1;
            }
            acc.into_iter()
                .map(|(key, (sum, count))| TrendPoint {
                    group: key.to_string(),
                    mean: sum / count as f64,
                    count,
                })
                .collect()
        }
        ColumnData::Ordered { levels, codes } => {
            let mut acc = vec![(0.0, 0usize); levels.len()];
            for (row, code) in codes.iter().enumerate() {
                let (Some(code), Some(v)) = (code, values.numeric(row)) else {
                    continue;
                };
                acc[*code].0 += v;
                acc[*code].1 += 1;
            }
            levels
                .iter()
                .zip(acc)
                .filter(|(_, (_, count))| *count > 0)
                .map(|(level, (sum, count))| TrendPoint {
                    group: level.clone(),
                    mean: sum / count as f64,
                    count,
                })
                .collect()
        }
        _ => {
            return Err(SelectionError::UnsupportedGrouping {
                column: group_by.column().to_string(),
            });
        }
    };

    Ok(Trend {
        metric: metric.to_string(),
        group_by,
        points,
    })
}
