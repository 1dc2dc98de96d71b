use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Clear, Dataset, GraphType,
    Paragraph, Row, Table as Grid, Tabs, Wrap,
};

use laliga_dashboard::calendar::{DAY_OF_WEEK, MONTH_NAME};
use laliga_dashboard::catalog::{self, COLUMN_GROUPS};
use laliga_dashboard::config::DashboardConfig;
use laliga_dashboard::context::DatasetContext;
use laliga_dashboard::logging;
use laliga_dashboard::season_checks::check_season;
use laliga_dashboard::state::{AppState, Picker, PickerSlot, Screen, VizTab};
use laliga_dashboard::stats_browser::{self, StatsPane};
use laliga_dashboard::table::{Column, Table, format_float};
use laliga_dashboard::views::{
    BoxPlot, BoxSummary, Breakdown, CorrelationMatrix, DerivedView, Histogram, Scatter, Trend,
    TrendGroup,
};

const MAX_CELL_WIDTH: usize = 24;

struct App {
    ctx: DatasetContext,
    state: AppState,
    config: DashboardConfig,
    season_summary: String,
    should_quit: bool,
}

impl App {
    fn new(ctx: DatasetContext, config: DashboardConfig, season_summary: String) -> Self {
        let stats_files = stats_browser::list_stats_files(&config.stats_dir);
        let state = AppState::new(&ctx, stats_files, config.page_size);
        Self {
            ctx,
            state,
            config,
            season_summary,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('?') | KeyCode::Esc => self.state.help_overlay = false,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('1') | KeyCode::Char('h') | KeyCode::Esc => {
                self.state.screen = Screen::Home
            }
            KeyCode::Char('2') => self.state.screen = Screen::Overview,
            KeyCode::Char('3') => self.state.screen = Screen::Dataset,
            KeyCode::Char('4') => self.state.screen = Screen::Stats,
            KeyCode::Char('5') => self.state.screen = Screen::Visualization,
            KeyCode::Tab | KeyCode::Right => {
                if self.state.screen == Screen::Visualization {
                    self.state.next_tab(&self.ctx);
                }
            }
            KeyCode::BackTab | KeyCode::Left => {
                if self.state.screen == Screen::Visualization {
                    self.state.prev_tab(&self.ctx);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_primary(true),
            KeyCode::Char('k') | KeyCode::Up => self.move_primary(false),
            KeyCode::Char('J') => self.move_secondary(true),
            KeyCode::Char('K') => self.move_secondary(false),
            KeyCode::Char('x') => self.clear(PickerSlot::Primary),
            KeyCode::Char('X') => self.clear(PickerSlot::Secondary),
            KeyCode::Char('n') | KeyCode::PageDown => self.state.page(true, &self.ctx),
            KeyCode::Char('p') | KeyCode::PageUp => self.state.page(false, &self.ctx),
            _ => {}
        }
    }

    fn move_primary(&mut self, forward: bool) {
        match self.state.screen {
            Screen::Visualization => {
                self.state
                    .cycle_picker(PickerSlot::Primary, forward, &self.ctx)
            }
            Screen::Stats => self.state.select_stats_file(forward),
            _ => {}
        }
    }

    fn move_secondary(&mut self, forward: bool) {
        if self.state.screen == Screen::Visualization {
            self.state
                .cycle_picker(PickerSlot::Secondary, forward, &self.ctx);
        }
    }

    fn clear(&mut self, slot: PickerSlot) {
        if self.state.screen == Screen::Visualization {
            self.state.clear_picker(slot, &self.ctx);
        }
    }
}

fn main() -> Result<()> {
    let config = DashboardConfig::load();
    if let Some(path) = &config.log_file {
        if let Err(err) = logging::init_file_logging(&config.log_filter, path) {
            eprintln!("warning: {err:#}");
        }
    }

    let ctx = DatasetContext::load(&config.matches_csv)
        .with_context(|| format!("load match dataset {}", config.matches_csv.display()))?;
    let report = check_season(ctx.table());
    report.log_warnings();

    let mut app = App::new(ctx, config, report.summary_line());
    app.state.push_log(format!(
        "[INFO] Loaded {} matches from {}",
        app.ctx.table().row_count(),
        app.config.matches_csv.display()
    ));
    for warning in report.warnings() {
        app.state.push_log(format!("[WARN] {warning}"));
    }

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("dashboard loop")
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Home => render_home(frame, chunks[1], app),
        Screen::Overview => render_overview(frame, chunks[1]),
        Screen::Dataset => render_dataset(frame, chunks[1], app),
        Screen::Stats => render_stats(frame, chunks[1], app),
        Screen::Visualization => render_visualization(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let nav = Screen::ALL
        .iter()
        .enumerate()
        .map(|(idx, screen)| {
            if *screen == state.screen {
                format!("[{} {}]", idx + 1, screen.title())
            } else {
                format!(" {} {} ", idx + 1, screen.title())
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!(" LALIGA 23/24 | {}\n {nav}", state.screen.title().to_uppercase())
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Dataset => "1-5 Screens | n/p Page | ? Help | q Quit".to_string(),
        Screen::Stats => "1-5 Screens | j/k File | n/p Page | ? Help | q Quit".to_string(),
        Screen::Visualization => {
            "1-5 Screens | ←/→ Chart | j/k Primary | J/K Secondary | x/X Clear | ? Help | q Quit"
                .to_string()
        }
        _ => "1-5 Screens | h Home | ? Help | q Quit".to_string(),
    }
}

fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(5)])
        .split(area);

    let table = app.ctx.table();
    let classes = app.ctx.classes();
    let mut lines = vec![
        Line::styled(
            "LaLiga 23/24 Season Dashboard",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::raw(format!(
            "{} matches | {} columns | {} numerical | {} categorical | {} stats files",
            table.row_count(),
            table.column_count(),
            classes.numerical().len(),
            classes.categorical().len(),
            app.state.stats_files.len()
        )),
        Line::raw(app.season_summary.clone()),
        Line::raw(""),
    ];
    for (idx, screen) in Screen::ALL.iter().enumerate() {
        lines.push(Line::raw(format!("  {}  {}", idx + 1, screen.title())));
    }

    let home = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Home").borders(Borders::ALL));
    frame.render_widget(home, sections[0]);

    let console = Paragraph::new(console_text(&app.state, 3))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, sections[1]);
}

fn render_overview(frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::styled(
            catalog::OVERVIEW_TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
    ];
    lines.extend(catalog::OVERVIEW_TEXT.lines().map(Line::raw));

    let overview = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Overview").borders(Borders::ALL));
    frame.render_widget(overview, area);
}

fn render_dataset(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Min(5)])
        .split(area);

    let mut lines = Vec::new();
    for group in COLUMN_GROUPS {
        lines.push(Line::styled(
            group.title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        for doc in group.columns {
            lines.push(Line::raw(format!(
                "  {:<28} {:<12} {}",
                doc.name, doc.semantic_type, doc.description
            )));
        }
    }
    let about = Paragraph::new(Text::from(lines))
        .block(Block::default().title("About the dataset").borders(Borders::ALL));
    frame.render_widget(about, sections[0]);

    let table = app.ctx.table();
    render_grid(
        frame,
        sections[1],
        &file_columns(table),
        table.row_count(),
        (app.state.dataset_page, app.state.page_size),
        "Matches",
    );
}

/// Columns as stored in the match file; the derived calendar columns are left out.
fn file_columns(table: &Table) -> Vec<&Column> {
    table
        .columns()
        .iter()
        .filter(|c| c.name != DAY_OF_WEEK && c.name != MONTH_NAME)
        .collect()
}

fn render_stats(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(10)])
        .split(area);

    let state = &app.state;
    let files: Vec<Line> = state
        .stats_files
        .iter()
        .enumerate()
        .map(|(idx, file)| {
            if Some(idx) == state.stats_selected {
                Line::styled(
                    format!("> {}", file.label),
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                )
            } else {
                Line::raw(format!("  {}", file.label))
            }
        })
        .collect();
    let list = Paragraph::new(Text::from(files))
        .block(Block::default().title("Stats files").borders(Borders::ALL));
    frame.render_widget(list, columns[0]);

    match (&state.stats_pane, state.selected_stats_file()) {
        (Some(StatsPane::Table(table)), Some(file)) => render_grid(
            frame,
            columns[1],
            &table.columns().iter().collect::<Vec<_>>(),
            table.row_count(),
            (state.stats_page, state.page_size),
            &file.label,
        ),
        (Some(StatsPane::Error(msg)), _) => {
            let error = Paragraph::new(msg.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(Block::default().title("Stats").borders(Borders::ALL));
            frame.render_widget(error, columns[1]);
        }
        _ => {
            let empty = Paragraph::new(format!(
                "No stats files found in {}",
                app.config.stats_dir.display()
            ))
            .block(Block::default().title("Stats").borders(Borders::ALL));
            frame.render_widget(empty, columns[1]);
        }
    }
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    columns: &[&Column],
    rows: usize,
    (page, page_size): (usize, usize),
    title: &str,
) {
    let pages = stats_browser::page_count(rows, page_size);
    let range = stats_browser::page_range(rows, page_size, page);
    let shown_page = page.min(pages - 1) + 1;
    let title = if range.is_empty() {
        format!("{title} | no rows")
    } else {
        format!(
            "{title} | page {shown_page}/{pages} | rows {}-{} of {rows}",
            range.start + 1,
            range.end
        )
    };

    let widths: Vec<Constraint> = columns
        .iter()
        .map(|column| {
            let widest = range
                .clone()
                .map(|row| column.data.display(row).chars().count())
                .chain(std::iter::once(column.name.chars().count()))
                .max()
                .unwrap_or(4);
            Constraint::Length(widest.clamp(3, MAX_CELL_WIDTH) as u16)
        })
        .collect();

    let header = Row::new(columns.iter().map(|c| Cell::from(c.name.clone())))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let body: Vec<Row> = range
        .map(|row| Row::new(columns.iter().map(|c| c.data.display(row))))
        .collect();

    let grid = Grid::new(body, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(grid, area);
}

fn render_visualization(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(area);

    let tabs = Tabs::new(VizTab::ALL.iter().map(|tab| tab.title()).collect::<Vec<_>>())
        .select(state.viz_tab.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(tabs, sections[0]);

    let selectors = Paragraph::new(selector_text(state))
        .block(Block::default().title("Selection").borders(Borders::ALL));
    frame.render_widget(selectors, sections[1]);

    let chart_area = sections[2];
    match &state.view {
        DerivedView::Empty => render_empty(frame, chart_area, state.viz_tab),
        DerivedView::Histogram(histogram) => render_histogram(frame, chart_area, histogram),
        DerivedView::Breakdown(breakdown) => render_breakdown(frame, chart_area, breakdown),
        DerivedView::BoxPlot(plot) => render_box_plot(frame, chart_area, plot),
        DerivedView::Scatter(scatter) => render_scatter(frame, chart_area, scatter),
        DerivedView::Correlation(matrix) => render_heatmap(frame, chart_area, matrix),
        DerivedView::Trend(trend) => render_trend(frame, chart_area, trend),
    }

    let console = Paragraph::new(console_text(state, 2))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, sections[3]);
}

fn selector_text(state: &AppState) -> String {
    let (primary, secondary) = state.controls.pickers(state.viz_tab);
    let parts: Vec<String> = [primary, secondary]
        .into_iter()
        .flatten()
        .map(picker_label)
        .collect();
    let mut text = if parts.is_empty() {
        "All numerical columns".to_string()
    } else {
        parts.join("   ")
    };
    if let Some(doc) = primary
        .and_then(Picker::value)
        .and_then(catalog::describe)
    {
        text.push_str(&format!("\n{}: {}", doc.name, doc.description));
    }
    text
}

fn picker_label(picker: &Picker) -> String {
    match (picker.value(), picker.selected_index()) {
        (Some(value), Some(idx)) => format!(
            "{}: [{value}] ({}/{})",
            picker.label,
            idx + 1,
            picker.options().len()
        ),
        _ => format!("{}: [ - ]", picker.label),
    }
}

fn render_empty(frame: &mut Frame, area: Rect, tab: VizTab) {
    let empty = Paragraph::new("No data for the current selection")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().title(tab.title()).borders(Borders::ALL));
    frame.render_widget(empty, area);
}

fn render_histogram(frame: &mut Frame, area: Rect, histogram: &Histogram) {
    let bins = histogram.bins.len().max(1) as u16;
    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / bins).saturating_sub(1).max(1);

    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .map(|bin| {
            Bar::default()
                .value(bin.count as u64)
                .label(Line::from(axis_label(bin.start)))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .block(
            Block::default()
                .title(format!(
                    "Distribution of {} ({} values)",
                    histogram.column, histogram.total
                ))
                .borders(Borders::ALL),
        );
    frame.render_widget(chart, area);
}

fn render_breakdown(frame: &mut Frame, area: Rect, breakdown: &Breakdown) {
    let total = breakdown.total.max(1) as f64;
    let bars: Vec<Bar> = breakdown
        .slices
        .iter()
        .map(|slice| {
            let pct = slice.count as f64 * 100.0 / total;
            Bar::default()
                .value(slice.count as u64)
                .label(Line::from(slice.value.clone()))
                .text_value(format!("{} ({pct:.1}%)", slice.count))
                .style(Style::default().fg(Color::Green))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .block(
            Block::default()
                .title(format!(
                    "Breakdown of {} ({} values)",
                    breakdown.column, breakdown.total
                ))
                .borders(Borders::ALL),
        );
    frame.render_widget(chart, area);
}

fn render_box_plot(frame: &mut Frame, area: Rect, plot: &BoxPlot) {
    if plot.groups.is_empty() {
        render_empty(frame, area, VizTab::BoxPlot);
        return;
    }
    let lo = plot
        .groups
        .iter()
        .map(|g| g.min)
        .fold(f64::INFINITY, f64::min);
    let hi = plot
        .groups
        .iter()
        .map(|g| g.max)
        .fold(f64::NEG_INFINITY, f64::max);
    let label_width = plot
        .groups
        .iter()
        .map(|g| g.category.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_CELL_WIDTH);
    let strip_width = (area.width as usize).saturating_sub(label_width + 40).max(10);

    let mut lines = vec![Line::styled(
        format!(
            "{:<label_width$}  {} .. {}   median [q1, q3]",
            "",
            format_float(lo),
            format_float(hi)
        ),
        Style::default().fg(Color::DarkGray),
    )];
    for group in &plot.groups {
        let name: String = group.category.chars().take(label_width).collect();
        lines.push(Line::raw(format!(
            "{name:<label_width$}  {}  {} [{}, {}] n={}",
            box_strip(group, lo, hi, strip_width),
            format_float(group.median),
            format_float(group.q1),
            format_float(group.q3),
            group.count
        )));
    }

    let chart = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .title(format!("{} by {}", plot.numerical, plot.categorical))
            .borders(Borders::ALL),
    );
    frame.render_widget(chart, area);
}

fn box_strip(summary: &BoxSummary, lo: f64, hi: f64, width: usize) -> String {
    let mut cells = vec![' '; width];
    let span = hi - lo;
    let last = width.saturating_sub(1);
    let pos = |value: f64| {
        if span <= 0.0 {
            return last / 2;
        }
        (((value - lo) / span) * last as f64).round().clamp(0.0, last as f64) as usize
    };

    for cell in &mut cells[pos(summary.lower_whisker)..=pos(summary.upper_whisker)] {
        *cell = '-';
    }
    for cell in &mut cells[pos(summary.q1)..=pos(summary.q3)] {
        *cell = '=';
    }
    cells[pos(summary.lower_whisker)] = '|';
    cells[pos(summary.upper_whisker)] = '|';
    cells[pos(summary.median)] = '#';
    for &outlier in &summary.outliers {
        cells[pos(outlier)] = 'o';
    }
    cells.into_iter().collect()
}

fn render_scatter(frame: &mut Frame, area: Rect, scatter: &Scatter) {
    let (x_bounds, y_bounds) = bounds(&scatter.points);
    let fit_line: Vec<(f64, f64)> = match &scatter.fit {
        Ok(fit) => vec![fit.start, fit.end],
        Err(_) => Vec::new(),
    };
    let fit_title = match &scatter.fit {
        Ok(fit) => format!(
            "y = {:.3}x + {:.3}, R² = {}",
            fit.slope,
            fit.intercept,
            fit.r_squared
                .map(|r| format!("{r:.3}"))
                .unwrap_or_else(|| "n/a".to_string())
        ),
        Err(err) => format!("no trend line: {err}"),
    };

    let datasets = vec![
        Dataset::default()
            .name("matches")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Cyan))
            .data(&scatter.points),
        Dataset::default()
            .name("OLS")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&fit_line),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!("{} vs {} | {fit_title}", scatter.y, scatter.x))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title(scatter.x.as_str())
                .bounds(x_bounds)
                .labels(bound_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(scatter.y.as_str())
                .bounds(y_bounds)
                .labels(bound_labels(y_bounds)),
        );
    frame.render_widget(chart, area);
}

fn render_heatmap(frame: &mut Frame, area: Rect, matrix: &CorrelationMatrix) {
    if matrix.is_empty() {
        render_empty(frame, area, VizTab::Heatmap);
        return;
    }
    let name_width = matrix
        .columns
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_CELL_WIDTH) as u16;

    let mut widths = vec![Constraint::Length(name_width + 4)];
    widths.extend(std::iter::repeat(Constraint::Length(5)).take(matrix.len()));

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain((1..=matrix.len()).map(|idx| Cell::from(format!("c{idx}")))),
    )
    .style(Style::default().fg(Color::Yellow));

    let rows: Vec<Row> = matrix
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let label: String = name.chars().take(MAX_CELL_WIDTH).collect();
            let mut cells = vec![Cell::from(format!("c{:<3}{label}", i + 1))];
            cells.extend((0..matrix.len()).map(|j| match matrix.get(i, j) {
                Some(r) => Cell::from(format!("{r:+.2}")).style(heat_style(r)),
                None => Cell::from("  -").style(Style::default().fg(Color::DarkGray)),
            }));
            Row::new(cells)
        })
        .collect();

    let grid = Grid::new(rows, widths)
        .header(header)
        .column_spacing(0)
        .block(
            Block::default()
                .title("Correlation Heatmap (Pearson)")
                .borders(Borders::ALL),
        );
    frame.render_widget(grid, area);
}

fn heat_style(r: f64) -> Style {
    let color = match r {
        r if r >= 0.6 => Color::LightGreen,
        r if r >= 0.2 => Color::Green,
        r if r <= -0.6 => Color::LightRed,
        r if r <= -0.2 => Color::Red,
        _ => Color::Gray,
    };
    Style::default().fg(color)
}

fn render_trend(frame: &mut Frame, area: Rect, trend: &Trend) {
    let points = trend_points(trend);
    let (_, y_bounds) = bounds(&points);
    let first_x = points.first().map_or(0.0, |p| p.0);
    let last_x = points.last().map_or(0.0, |p| p.0);
    let x_bounds = [first_x, last_x.max(first_x + 1.0)];

    let x_labels: Vec<Span> = if trend.group_by == TrendGroup::Round {
        bound_labels(x_bounds)
    } else {
        let last = trend.points.len().saturating_sub(1);
        let mut labels = Vec::new();
        if let Some(first) = trend.points.first() {
            labels.push(Span::raw(first.group.clone()));
        }
        if last >= 2 {
            labels.push(Span::raw(trend.points[last / 2].group.clone()));
        }
        if last >= 1 {
            labels.push(Span::raw(trend.points[last].group.clone()));
        }
        labels
    };

    let datasets = vec![Dataset::default()
        .name(format!("mean {}", trend.metric))
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Yellow))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(
                    "Average {} by {}",
                    trend.metric,
                    trend.group_by.label()
                ))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title(trend.group_by.label())
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("mean")
                .bounds(y_bounds)
                .labels(bound_labels(y_bounds)),
        );
    frame.render_widget(chart, area);
}

/// Rounds sit at their round number; days and months at their position.
fn trend_points(trend: &Trend) -> Vec<(f64, f64)> {
    trend
        .points
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let x = match trend.group_by {
                TrendGroup::Round => p.group.parse::<f64>().unwrap_or(idx as f64),
                TrendGroup::DayOfWeek | TrendGroup::MonthName => idx as f64,
            };
            (x, p.mean)
        })
        .collect()
}

/// Axis bounds padded by 5% so points do not sit on the frame.
fn bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let pad = |lo: f64, hi: f64| {
        if !lo.is_finite() || !hi.is_finite() {
            return [0.0, 1.0];
        }
        let margin = ((hi - lo) * 0.05).max(0.5);
        [lo - margin, hi + margin]
    };
    let (mut x_lo, mut x_hi, mut y_lo, mut y_hi) = (
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
    );
    for &(x, y) in points {
        x_lo = x_lo.min(x);
        x_hi = x_hi.max(x);
        y_lo = y_lo.min(y);
        y_hi = y_hi.max(y);
    }
    (pad(x_lo, x_hi), pad(y_lo, y_hi))
}

fn bound_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Span::raw(axis_label(v)))
        .collect()
}

fn axis_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn console_text(state: &AppState, lines: usize) -> String {
    if state.logs.is_empty() {
        return "No notices yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(lines);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "LaLiga 23/24 Dashboard - Help",
        "",
        "Screens:",
        "  1 / h        Home",
        "  2            Overview",
        "  3            Dataset",
        "  4            Stats",
        "  5            Visualization",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Dataset / Stats:",
        "  n/p, PgDn/PgUp  Next/previous page",
        "  j/k or ↓/↑      Next/previous stats file",
        "",
        "Visualization:",
        "  Tab/Shift-Tab, →/←  Next/previous chart",
        "  j/k or ↓/↑          Cycle primary selector",
        "  J/K                 Cycle secondary selector",
        "  x / X               Clear primary / secondary (not on Trend)",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use laliga_dashboard::calendar::derive_calendar_columns;
    use laliga_dashboard::sample_season::generate_season;
    use laliga_dashboard::views::TrendPoint;

    use super::*;

    #[test]
    fn box_strip_marks_quartiles_and_outliers() {
        let summary = BoxSummary {
            category: "H".to_string(),
            count: 5,
            min: 0.0,
            q1: 2.0,
            median: 5.0,
            q3: 7.0,
            max: 10.0,
            lower_whisker: 1.0,
            upper_whisker: 8.0,
            outliers: vec![0.0, 10.0],
        };
        let strip = box_strip(&summary, 0.0, 10.0, 11);
        assert_eq!(strip, "o|===#==| o");
    }

    fn trend_of(group_by: TrendGroup, groups: &[&str]) -> Trend {
        Trend {
            metric: "home_team_corners".to_string(),
            group_by,
            points: groups
                .iter()
                .map(|g| TrendPoint {
                    group: g.to_string(),
                    mean: 1.0,
                    count: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn round_trend_spaces_points_by_round() {
        let rounds = trend_of(TrendGroup::Round, &["1", "2", "5"]);
        let xs: Vec<f64> = trend_points(&rounds).iter().map(|p| p.0).collect();
        assert_eq!(xs, [1.0, 2.0, 5.0]);

        let days = trend_of(TrendGroup::DayOfWeek, &["Friday", "Sunday"]);
        let xs: Vec<f64> = trend_points(&days).iter().map(|p| p.0).collect();
        assert_eq!(xs, [0.0, 1.0]);
    }

    #[test]
    fn dataset_grid_hides_calendar_columns() {
        let mut table = generate_season(1).expect("sample season");
        derive_calendar_columns(&mut table).expect("calendar columns");
        assert_eq!(table.column_count(), 24);

        let names: Vec<&str> = file_columns(&table).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), 22);
        assert!(names.iter().copied().eq(catalog::canonical_columns()));
    }

    #[test]
    fn selector_describes_the_primary_column() {
        let mut table = generate_season(1).expect("sample season");
        derive_calendar_columns(&mut table).expect("calendar columns");
        let ctx = DatasetContext::new(table);
        let state = AppState::new(&ctx, Vec::new(), 20);

        let column = &ctx.classes().numerical()[0];
        let doc = catalog::describe(column).expect("documented column");
        let text = selector_text(&state);
        assert!(text.ends_with(&format!("\n{column}: {}", doc.description)), "{text}");
    }
}
