use std::io;

use anyhow::{Context, Result};

use laliga_dashboard::config;
use laliga_dashboard::logging;
use laliga_dashboard::sample_season::{generate_season, write_csv};

const DEFAULT_SEED: u64 = 2324;

fn main() -> Result<()> {
    logging::init_stderr_logging("info");

    let seed = match config::arg_value("seed") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid --seed {raw:?}"))?,
        None => DEFAULT_SEED,
    };
    let with_index = config::arg_value("index").map_or(true, |val| val != "false");

    let season = generate_season(seed).context("build sample season")?;
    tracing::info!(seed, rows = season.row_count(), "sample season generated");
    write_csv(&season, io::stdout().lock(), with_index)
}
