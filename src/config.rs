use std::env;
use std::path::PathBuf;

use crate::stats_browser::DEFAULT_PAGE_SIZE;

const APP_DIR: &str = "laliga_dashboard";
const LOG_FILE: &str = "dashboard.log";

pub const DEFAULT_MATCHES_CSV: &str = "datasets/matches/laliga2324_matches.csv";
pub const DEFAULT_STATS_DIR: &str = "datasets/stats";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub matches_csv: PathBuf,
    pub stats_dir: PathBuf,
    pub page_size: usize,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            matches_csv: PathBuf::from(DEFAULT_MATCHES_CSV),
            stats_dir: PathBuf::from(DEFAULT_STATS_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            log_filter: "info".to_string(),
            log_file: app_cache_dir().map(|dir| dir.join(LOG_FILE)),
        }
    }
}

impl DashboardConfig {
    /// Reads `.env.local` and `.env` (if present) and then the environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            matches_csv: env_path("LALIGA_MATCHES_CSV").unwrap_or(defaults.matches_csv),
            stats_dir: env_path("LALIGA_STATS_DIR").unwrap_or(defaults.stats_dir),
            page_size: env::var("LALIGA_PAGE_SIZE")
                .ok()
                .and_then(|val| val.trim().parse::<usize>().ok())
                .unwrap_or(defaults.page_size)
                .clamp(5, 200),
            log_filter: env::var("LALIGA_LOG")
                .ok()
                .filter(|val| !val.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            log_file: env_path("LALIGA_LOG_FILE").or(defaults.log_file),
        }
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
        .map(PathBuf::from)
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(APP_DIR))
}

/// `--name value` or `--name=value` from the process arguments.
pub fn arg_value(name: &str) -> Option<String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    find_arg(&args, name)
}

pub fn find_arg(args: &[String], name: &str) -> Option<String> {
    let flag = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.clone());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_both_arg_spellings() {
        let args = vec![
            "--column=home_team_shots".to_string(),
            "--tab".to_string(),
            "trend".to_string(),
        ];
        assert_eq!(find_arg(&args, "column").as_deref(), Some("home_team_shots"));
        assert_eq!(find_arg(&args, "tab").as_deref(), Some("trend"));
        assert_eq!(find_arg(&args, "x"), None);
    }
}
