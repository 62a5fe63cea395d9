use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::time::Duration;

use RateInfra::config::loader::AppConfig;
use RateInfra::exchange::bybit::BybitOtcClient;
use RateInfra::exchange::PairConfig;
use RateInfra::observability;
use RateInfra::poller::RatePoller;
use RateInfra::sampler::PriceSampler;
use RateInfra::storage::sqlite::SqliteRateStore;
use RateInfra::storage::RateStore;

#[derive(Parser)]
#[command(author, version, about = "Fiat OTC median rate sampler")]
struct Cli {
    /// Configuration environment, resolved as config/{env}.toml.
    #[arg(long, default_value = "default", env = "RATEINFRA_ENV")]
    env: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the exchange and record median rates.
    Run {
        /// Run a single pass over the pair list and exit.
        #[arg(long)]
        once: bool,
    },
    /// Print the most recent observation for one pair, or for every
    /// configured pair when no pair is given.
    Latest {
        #[arg(requires = "to_currency")]
        from_currency: Option<String>,
        to_currency: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::tracing::init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.env)?;

    let store = Arc::new(SqliteRateStore::connect(&config.storage.database_url).await?);

    let result = match cli.command.unwrap_or(Command::Run { once: false }) {
        Command::Run { once } => run(config, store.clone(), once).await,
        Command::Latest {
            from_currency: Some(from_currency),
            to_currency: Some(to_currency),
        } => show_latest(store.as_ref(), &from_currency, &to_currency).await,
        Command::Latest { .. } => show_latest_per_pair(store.as_ref(), &config.pairs).await,
    };

    store.close().await;
    result
}

async fn run(config: AppConfig, store: Arc<SqliteRateStore>, once: bool) -> anyhow::Result<()> {
    let source = Arc::new(BybitOtcClient::new(&config.exchange)?);
    let sampler = PriceSampler::new(config.sampler.window());
    let poll_interval = config.sampler.poll_interval_secs;
    let window = sampler.window();

    tracing::info!(
        "Starting poller: {} pairs, window [{}, {}), database {}",
        config.pairs.len(),
        window.start,
        window.end,
        config.storage.database_url
    );

    let poller = RatePoller::new(source, store, sampler, config.pairs);

    match poll_interval {
        Some(secs) if !once => poller.run(Duration::from_secs(secs)).await?,
        _ => {
            let summary = poller.run_once().await;
            tracing::info!(
                "Single pass done: {} recorded, {} skipped, {} failed of {} pairs",
                summary.recorded,
                summary.skipped,
                summary.failed,
                summary.pairs
            );
        }
    }

    Ok(())
}

async fn show_latest(
    store: &SqliteRateStore,
    from_currency: &str,
    to_currency: &str,
) -> anyhow::Result<()> {
    match store.latest(from_currency, to_currency).await? {
        Some(record) => println!(
            "{} -> {}: {} (amount {}, payment method {}, observed at {})",
            record.from_currency,
            record.to_currency,
            record.median_price,
            record.amount,
            record.payment_method_id,
            record.observed_at.to_rfc3339()
        ),
        None => println!(
            "No observations recorded for {} -> {}",
            from_currency, to_currency
        ),
    }
    Ok(())
}

async fn show_latest_per_pair(
    store: &SqliteRateStore,
    pairs: &[PairConfig],
) -> anyhow::Result<()> {
    for pair in pairs {
        show_latest(store, &pair.from_currency, &pair.to_currency).await?;
    }
    Ok(())
}
