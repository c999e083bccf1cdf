//! Price list update orchestration.
//!
//! Fetches the market feed and reference documents, runs the pricing
//! pipeline (normalize -> merge -> validate) per game mode, and writes the
//! resulting price list for the server.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use flea_core::{config::manual_overrides, validate_price_list, Config};
use flea_fetcher::{GameMode, MarketApiClient};

#[derive(Debug, Parser)]
#[command(name = "flea-pricer", about = "Derive a flea price list for the game server")]
struct Args {
    /// Game mode(s) to process.
    #[arg(long, value_enum, default_value = "pve")]
    mode: ModeArg,

    /// Reuse cached documents instead of fetching.
    #[arg(long)]
    offline: bool,

    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for cached documents and output price lists.
    /// Overrides the configured data directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Pve,
    Regular,
    Both,
}

impl ModeArg {
    fn modes(self) -> Vec<GameMode> {
        match self {
            ModeArg::Pve => vec![GameMode::Pve],
            ModeArg::Regular => vec![GameMode::Regular],
            ModeArg::Both => vec![GameMode::Regular, GameMode::Pve],
        }
    }
}

/// The command-line directory wins over the configured one.
fn resolve_data_dir(config: &Config, out_dir: Option<PathBuf>) -> PathBuf {
    out_dir.unwrap_or_else(|| PathBuf::from(&config.sources.data_dir))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let body = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config = toml::from_str(&body)
                .with_context(|| format!("parsing config {}", path.display()))?;
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let data_dir = resolve_data_dir(&config, args.out_dir.clone());
    let handbook_path = data_dir.join("handbook.json");
    let baseline_path = data_dir.join("baseline-prices.json");

    if !args.offline {
        let client = reqwest::Client::new();
        flea_fetcher::download_file(&client, &config.sources.handbook_url, &handbook_path)
            .await
            .context("downloading handbook")?;
        flea_fetcher::download_file(
            &client,
            &config.sources.baseline_prices_url,
            &baseline_path,
        )
        .await
        .context("downloading baseline prices")?;
    }

    for mode in args.mode.modes() {
        run_mode(mode, &config, &data_dir, &handbook_path, &baseline_path, args.offline)
            .await
            .with_context(|| format!("processing {} mode", mode.as_str()))?;
    }

    Ok(())
}

async fn run_mode(
    mode: GameMode,
    config: &Config,
    data_dir: &Path,
    handbook_path: &Path,
    baseline_path: &Path,
    offline: bool,
) -> Result<()> {
    tracing::info!(mode = mode.as_str(), "updating price list");

    let feed_path = data_dir.join(format!("feed-{}.json", mode.as_str()));
    let items = if offline {
        flea_fetcher::load_market_items(&feed_path).context("loading cached feed")?
    } else {
        let api = MarketApiClient::new(&config.sources.market_api_url);
        let items = api.fetch_items(mode).await?;
        flea_fetcher::save_market_items(&feed_path, &items).context("caching feed")?;
        items
    };

    let baseline = flea_fetcher::load_baseline_prices(baseline_path)
        .context("loading baseline prices")?;
    let handbook = flea_fetcher::load_handbook(handbook_path).context("loading handbook")?;
    let catalog = flea_fetcher::load_catalog(&config.sources.templates_path)
        .context("loading item templates")?;

    let now = chrono::Utc::now().timestamp_millis();
    let (normalized, stats) =
        flea_ingestion::normalize_with_stats(&items, now, &config.estimator);
    tracing::info!(
        mode = mode.as_str(),
        total = stats.total_items,
        emitted = stats.emitted,
        no_history = stats.skipped_no_history,
        no_estimate = stats.skipped_no_estimate,
        zero_durability = stats.skipped_zero_durability,
        large_swings = stats.large_swings,
        "normalized market feed"
    );

    let outcome = flea_merge::merge(
        &baseline,
        &normalized,
        &catalog,
        &handbook,
        &manual_overrides(),
        &config.pack_rule,
    );
    for failure in &outcome.pack_failures {
        tracing::error!(mode = mode.as_str(), %failure, "pack price derivation failed");
    }

    validate_price_list(&outcome.prices).context("validating merged price list")?;

    let out_path = data_dir.join(format!("prices-{}.json", mode.as_str()));
    flea_fetcher::save_price_list(&out_path, &outcome.prices)?;
    tracing::info!(
        mode = mode.as_str(),
        items = outcome.prices.len(),
        failures = outcome.pack_failures.len(),
        path = %out_path.display(),
        "price list updated"
    );

    Ok(())
}
