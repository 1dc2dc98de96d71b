use std::collections::VecDeque;

use crate::columns::ColumnClassification;
use crate::context::DatasetContext;
use crate::stats_browser::{self, StatsFile, StatsPane};
use crate::views::{DerivedView, Selection, TrendGroup};

const MAX_LOGS: usize = 50;
const DEFAULT_TREND_METRIC: &str = "full_time_home_team_goals";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Overview,
    Dataset,
    Stats,
    Visualization,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Home,
        Screen::Overview,
        Screen::Dataset,
        Screen::Stats,
        Screen::Visualization,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Overview => "Overview",
            Screen::Dataset => "Dataset",
            Screen::Stats => "Stats",
            Screen::Visualization => "Visualization",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VizTab {
    Distribution,
    Categorical,
    BoxPlot,
    Scatter,
    Heatmap,
    Trend,
}

impl VizTab {
    pub const ALL: [VizTab; 6] = [
        VizTab::Distribution,
        VizTab::Categorical,
        VizTab::BoxPlot,
        VizTab::Scatter,
        VizTab::Heatmap,
        VizTab::Trend,
    ];

    pub fn title(self) -> &'static str {
        match self {
            VizTab::Distribution => "Distribution",
            VizTab::Categorical => "Categorical",
            VizTab::BoxPlot => "Comparison (Box Plot)",
            VizTab::Scatter => "Correlation (Scatter Plot)",
            VizTab::Heatmap => "Correlation Heatmap",
            VizTab::Trend => "Trend Analysis",
        }
    }

    /// Short name used on the command line.
    pub fn key(self) -> &'static str {
        match self {
            VizTab::Distribution => "distribution",
            VizTab::Categorical => "categorical",
            VizTab::BoxPlot => "box",
            VizTab::Scatter => "scatter",
            VizTab::Heatmap => "heatmap",
            VizTab::Trend => "trend",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|tab| tab.key() == key)
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A dropdown: a fixed option list and the current choice, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub label: &'static str,
    options: Vec<String>,
    selected: Option<usize>,
}

impl Picker {
    pub fn new(label: &'static str, options: Vec<String>, default: Option<usize>) -> Self {
        let selected = default.filter(|idx| *idx < options.len());
        Self {
            label,
            options,
            selected,
        }
    }

    pub fn with_value(label: &'static str, options: Vec<String>, value: &str) -> Self {
        let default = options.iter().position(|o| o == value).or(Some(0));
        Self::new(label, options, default)
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn value(&self) -> Option<&str> {
        self.selected.and_then(|idx| self.options.get(idx)).map(String::as_str)
    }

    pub fn next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |idx| (idx + 1) % self.options.len()));
    }

    pub fn prev(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len();
        self.selected = Some(self.selected.map_or(len - 1, |idx| (idx + len - 1) % len));
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

/// Selector state for every visualization tab, initialised like a fresh page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VizControls {
    pub distribution: Picker,
    pub categorical: Picker,
    pub box_numerical: Picker,
    pub box_categorical: Picker,
    pub scatter_x: Picker,
    pub scatter_y: Picker,
    pub trend_metric: Picker,
    pub trend_group: Picker,
}

impl VizControls {
    pub fn new(classes: &ColumnClassification) -> Self {
        let numerical = classes.numerical().to_vec();
        let categorical = classes.categorical().to_vec();
        let first = |v: &Vec<String>| (!v.is_empty()).then_some(0);
        let second = (numerical.len() > 1).then_some(1);
        let groups = TrendGroup::ALL
            .iter()
            .map(|g| g.column().to_string())
            .collect();

        Self {
            distribution: Picker::new("Column", numerical.clone(), first(&numerical)),
            categorical: Picker::new("Column", categorical.clone(), first(&categorical)),
            box_numerical: Picker::new("Numerical (Y)", numerical.clone(), first(&numerical)),
            box_categorical: Picker::new(
                "Categorical (X)",
                categorical.clone(),
                first(&categorical),
            ),
            scatter_x: Picker::new("X axis", numerical.clone(), first(&numerical)),
            scatter_y: Picker::new("Y axis", numerical, second),
            trend_metric: Picker::with_value(
                "Metric",
                classes.trend_metrics(),
                DEFAULT_TREND_METRIC,
            ),
            trend_group: Picker::new("Group by", groups, Some(0)),
        }
    }

    pub fn pickers(&self, tab: VizTab) -> (Option<&Picker>, Option<&Picker>) {
        match tab {
            VizTab::Distribution => (Some(&self.distribution), None),
            VizTab::Categorical => (Some(&self.categorical), None),
            VizTab::BoxPlot => (Some(&self.box_numerical), Some(&self.box_categorical)),
            VizTab::Scatter => (Some(&self.scatter_x), Some(&self.scatter_y)),
            VizTab::Heatmap => (None, None),
            VizTab::Trend => (Some(&self.trend_metric), Some(&self.trend_group)),
        }
    }

    fn pickers_mut(&mut self, tab: VizTab) -> (Option<&mut Picker>, Option<&mut Picker>) {
        match tab {
            VizTab::Distribution => (Some(&mut self.distribution), None),
            VizTab::Categorical => (Some(&mut self.categorical), None),
            VizTab::BoxPlot => (Some(&mut self.box_numerical), Some(&mut self.box_categorical)),
            VizTab::Scatter => (Some(&mut self.scatter_x), Some(&mut self.scatter_y)),
            VizTab::Heatmap => (None, None),
            VizTab::Trend => (Some(&mut self.trend_metric), Some(&mut self.trend_group)),
        }
    }

    pub fn selection(&self, tab: VizTab) -> Selection {
        let owned = |p: &Picker| p.value().map(str::to_string);
        match tab {
            VizTab::Distribution => Selection::Distribution {
                column: owned(&self.distribution),
            },
            VizTab::Categorical => Selection::Categorical {
                column: owned(&self.categorical),
            },
            VizTab::BoxPlot => Selection::BoxPlot {
                numerical: owned(&self.box_numerical),
                categorical: owned(&self.box_categorical),
            },
            VizTab::Scatter => Selection::Scatter {
                x: owned(&self.scatter_x),
                y: owned(&self.scatter_y),
            },
            VizTab::Heatmap => Selection::Heatmap,
            VizTab::Trend => Selection::Trend {
                metric: owned(&self.trend_metric),
                group_by: owned(&self.trend_group),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerSlot {
    Primary,
    Secondary,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub viz_tab: VizTab,
    pub controls: VizControls,
    pub view: DerivedView,
    pub page_size: usize,
    pub dataset_page: usize,
    pub stats_files: Vec<StatsFile>,
    pub stats_selected: Option<usize>,
    pub stats_pane: Option<StatsPane>,
    pub stats_page: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(ctx: &DatasetContext, stats_files: Vec<StatsFile>, page_size: usize) -> Self {
        let controls = VizControls::new(ctx.classes());
        let stats_selected = (!stats_files.is_empty()).then_some(0);
        let mut state = Self {
            screen: Screen::Home,
            viz_tab: VizTab::Distribution,
            controls,
            view: DerivedView::Empty,
            page_size: page_size.max(1),
            dataset_page: 0,
            stats_files,
            stats_selected,
            stats_pane: None,
            stats_page: 0,
            logs: VecDeque::new(),
            help_overlay: false,
        };
        state.refresh_view(ctx);
        state.load_selected_stats();
        state
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn selection(&self) -> Selection {
        self.controls.selection(self.viz_tab)
    }

    /// Recomputes the active tab's view from the current selection.
    pub fn refresh_view(&mut self, ctx: &DatasetContext) {
        self.view = ctx.derive(&self.selection());
        if self.view.is_empty() && self.viz_tab != VizTab::Heatmap {
            self.push_log(format!("[INFO] {}: nothing to plot", self.viz_tab.title()));
        }
    }

    pub fn set_tab(&mut self, tab: VizTab, ctx: &DatasetContext) {
        if self.viz_tab != tab {
            self.viz_tab = tab;
            self.refresh_view(ctx);
        }
    }

    pub fn next_tab(&mut self, ctx: &DatasetContext) {
        self.set_tab(self.viz_tab.next(), ctx);
    }

    pub fn prev_tab(&mut self, ctx: &DatasetContext) {
        self.set_tab(self.viz_tab.prev(), ctx);
    }

    /// Moves one selector on the active tab and recomputes when it changed.
    pub fn cycle_picker(&mut self, slot: PickerSlot, forward: bool, ctx: &DatasetContext) {
        let (primary, secondary) = self.controls.pickers_mut(self.viz_tab);
        let picker = match slot {
            PickerSlot::Primary => primary,
            PickerSlot::Secondary => secondary,
        };
        let Some(picker) = picker else {
            return;
        };
        let before = picker.selected_index();
        if forward {
            picker.next();
        } else {
            picker.prev();
        }
        if picker.selected_index() != before {
            self.refresh_view(ctx);
        }
    }

    /// Trend pickers always hold a value; clearing only applies to the other tabs.
    pub fn clear_picker(&mut self, slot: PickerSlot, ctx: &DatasetContext) {
        if self.viz_tab == VizTab::Trend {
            return;
        }
        let (primary, secondary) = self.controls.pickers_mut(self.viz_tab);
        let picker = match slot {
            PickerSlot::Primary => primary,
            PickerSlot::Secondary => secondary,
        };
        if let Some(picker) = picker {
            if picker.selected_index().is_some() {
                picker.clear();
                self.refresh_view(ctx);
            }
        }
    }

    pub fn selected_stats_file(&self) -> Option<&StatsFile> {
        self.stats_selected.and_then(|idx| self.stats_files.get(idx))
    }

    pub fn select_stats_file(&mut self, forward: bool) {
        if self.stats_files.is_empty() {
            return;
        }
        let len = self.stats_files.len();
        self.stats_selected = Some(match (self.stats_selected, forward) {
            (None, _) => 0,
            (Some(idx), true) => (idx + 1) % len,
            (Some(idx), false) => (idx + len - 1) % len,
        });
        self.load_selected_stats();
    }

    fn load_selected_stats(&mut self) {
        self.stats_page = 0;
        let Some((label, path)) = self
            .selected_stats_file()
            .map(|file| (file.label.clone(), file.path.clone()))
        else {
            self.stats_pane = None;
            return;
        };
        let pane = stats_browser::load_stats_file(&path);
        if let StatsPane::Error(msg) = &pane {
            self.push_log(format!("[WARN] {label}: {msg}"));
        }
        self.stats_pane = Some(pane);
    }

    pub fn stats_rows(&self) -> usize {
        match &self.stats_pane {
            Some(StatsPane::Table(table)) => table.row_count(),
            _ => 0,
        }
    }

    pub fn page(&mut self, forward: bool, ctx: &DatasetContext) {
        let (page, rows) = match self.screen {
            Screen::Dataset => (&mut self.dataset_page, ctx.table().row_count()),
            Screen::Stats => {
                let rows = self.stats_rows();
                (&mut self.stats_page, rows)
            }
            _ => return,
        };
        let last = stats_browser::page_count(rows, self.page_size) - 1;
        *page = if forward {
            (*page + 1).min(last)
        } else {
            page.saturating_sub(1)
        };
    }
}
