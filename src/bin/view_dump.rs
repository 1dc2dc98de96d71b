use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use laliga_dashboard::config::{self, DashboardConfig};
use laliga_dashboard::context::DatasetContext;
use laliga_dashboard::logging;
use laliga_dashboard::state::{VizControls, VizTab};
use laliga_dashboard::views::Selection;

fn main() -> Result<()> {
    let settings = DashboardConfig::load();
    logging::init_stderr_logging(&settings.log_filter);

    let csv_path = config::arg_value("csv")
        .map(PathBuf::from)
        .unwrap_or(settings.matches_csv);
    let tab_arg = config::arg_value("tab").unwrap_or_else(|| "distribution".to_string());
    let tab = VizTab::from_key(&tab_arg).ok_or_else(|| {
        let known = VizTab::ALL.map(VizTab::key).join(", ");
        anyhow!("unknown tab {tab_arg:?} (expected one of: {known})")
    })?;

    let ctx = DatasetContext::load(&csv_path)
        .with_context(|| format!("load match dataset {}", csv_path.display()))?;
    let selection = selection_from_args(VizControls::new(ctx.classes()).selection(tab));
    let view = ctx
        .try_derive(&selection)
        .with_context(|| format!("derive {} view", tab.key()))?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &view).context("serialize view")?;
    writeln!(stdout)?;
    Ok(())
}

/// Overrides the default selection with whatever flags were given.
fn selection_from_args(defaults: Selection) -> Selection {
    let arg = config::arg_value;
    match defaults {
        Selection::Distribution { column } => Selection::Distribution {
            column: arg("column").or(column),
        },
        Selection::Categorical { column } => Selection::Categorical {
            column: arg("column").or(column),
        },
        Selection::BoxPlot {
            numerical,
            categorical,
        } => Selection::BoxPlot {
            numerical: arg("numerical").or(numerical),
            categorical: arg("categorical").or(categorical),
        },
        Selection::Scatter { x, y } => Selection::Scatter {
            x: arg("x").or(x),
            y: arg("y").or(y),
        },
        Selection::Heatmap => Selection::Heatmap,
        Selection::Trend { metric, group_by } => Selection::Trend {
            metric: arg("metric").or(metric),
            group_by: arg("group").or(group_by),
        },
    }
}
