use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::loader::{self, LoadOptions};
use crate::table::Table;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsFile {
    pub label: String,
    pub path: PathBuf,
}

/// What the stats screen shows for the selected file.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsPane {
    Table(Table),
    Error(String),
}

/// CSV files in `dir`, sorted by file name. An unreadable directory lists nothing.
pub fn list_stats_files(dir: &Path) -> Vec<StatsFile> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %dir.display(), %err, "stats directory unavailable");
            return Vec::new();
        }
    };

    let mut files: Vec<StatsFile> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .map(|path| StatsFile {
            label: format_label(&path),
            path,
        })
        .collect();
    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    info!(dir = %dir.display(), files = files.len(), "listed stats files");
    files
}

/// `top_scorers.csv` -> `Top Scorers`.
pub fn format_label(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    title_case(&stem.replace('_', " "))
}

/// Upper-cases the first letter of every run of letters and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Loads a stats file for display; failures become an inline message.
pub fn load_stats_file(path: &Path) -> StatsPane {
    match loader::load_table(path, LoadOptions::default()) {
        Ok(table) => StatsPane::Table(table),
        Err(err) => {
            warn!(path = %path.display(), %err, "stats file failed to load");
            StatsPane::Error(format!("Error loading file: {err}"))
        }
    }
}

pub fn page_count(rows: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    rows.div_ceil(page_size).max(1)
}

/// Row range of `page`, clamped to the last page.
pub fn page_range(rows: usize, page_size: usize, page: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let page = page.min(page_count(rows, page_size) - 1);
    let start = page * page_size;
    start.min(rows)..(start + page_size).min(rows)
}
