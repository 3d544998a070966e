use anyhow::Context;
use dotenvy::dotenv;
use tracing::{debug, info, warn};

use common::config::Config;
use common::logger;
use market_data::remote::CoinglassClient;
use market_data::services::{CollectionPlan, Collector};
use storage::DataManager;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::from_env().context("Invalid configuration")?;
    let _log_guard = logger::setup_logger(&config.log_level, config.log_file.as_deref())
        .context("Failed to open log file")?;
    debug!("Collector starting up...");
    if config.api_key.is_empty() {
        warn!("COINGLASS_API_KEY is not set, upstream requests will be rejected");
    }

    let plan = CollectionPlan::from_config(&config)?;
    info!(
        "Collecting {:?} at {} ({} on {})",
        plan.symbols,
        plan.interval,
        plan.ratio_categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("+"),
        plan.exchange
    );

    let mut client =
        CoinglassClient::from_config(&config).context("Failed to build Coinglass client")?;
    let store = DataManager::open(&config.db_path)
        .await
        .with_context(|| format!("Failed to open store at {}", config.db_path))?;

    let summary = Collector::new(&mut client, &store).run(&plan).await;
    store.close().await;

    if summary.symbols_ok == 0 && summary.symbols_failed > 0 {
        warn!("Every symbol failed this run");
    }
    info!("Data pipeline run completed.");
    Ok(())
}
