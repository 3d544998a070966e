use common::models::{
    FundingRatePoint, LiquidationPoint, LongShortRatioPoint, MetricRows, OpenInterestPoint,
    RatioCategory,
};
use serde_json::json;
use storage::DataManager;

fn open_interest(time: i64, close: f64) -> OpenInterestPoint {
    OpenInterestPoint {
        symbol: "BTC".into(),
        time,
        open: 1.0,
        high: 2.0,
        low: 0.5,
        close,
    }
}

fn ratio(time: i64, category: RatioCategory, long_percent: f64) -> LongShortRatioPoint {
    LongShortRatioPoint {
        symbol: "BTC".into(),
        exchange: "Binance".into(),
        time,
        long_percent,
        short_percent: 100.0 - long_percent,
        long_short_ratio: long_percent / (100.0 - long_percent),
        category,
    }
}

fn sample_batches() -> Vec<MetricRows> {
    vec![
        MetricRows::OpenInterest(vec![open_interest(1000, 1.5), open_interest(2000, 1.6)]),
        MetricRows::FundingRate(vec![FundingRatePoint {
            symbol: "BTC".into(),
            time: 1000,
            open: 0.01,
            high: 0.02,
            low: 0.005,
            close: 0.01,
        }]),
        MetricRows::LongShortRatio(vec![
            ratio(1000, RatioCategory::Top, 60.0),
            ratio(2000, RatioCategory::Top, 55.0),
        ]),
        MetricRows::Liquidation(vec![LiquidationPoint {
            symbol: "BTC".into(),
            time: 1000,
            long_liquidation_usd: 125_000.0,
            short_liquidation_usd: 98_000.5,
        }]),
    ]
}

#[tokio::test]
async fn upserting_twice_leaves_counts_unchanged() {
    let store = DataManager::in_memory().await.unwrap();

    for batch in sample_batches() {
        let presented = store.upsert("BTC", &batch).await.unwrap();
        assert_eq!(presented, batch.len());
        let after_first = store.count(batch.table()).await.unwrap();
        assert_eq!(after_first, batch.len() as i64);

        // Duplicates are reported as presented, but nothing new lands.
        let presented = store.upsert("BTC", &batch).await.unwrap();
        assert_eq!(presented, batch.len());
        assert_eq!(store.count(batch.table()).await.unwrap(), after_first);
    }
}

#[tokio::test]
async fn existing_rows_are_not_overwritten() {
    let store = DataManager::in_memory().await.unwrap();

    store
        .upsert("BTC", &MetricRows::OpenInterest(vec![open_interest(1000, 1.5)]))
        .await
        .unwrap();
    store
        .upsert("BTC", &MetricRows::OpenInterest(vec![open_interest(1000, 99.0)]))
        .await
        .unwrap();

    let close: f64 = sqlx::query_scalar("SELECT close FROM open_interest WHERE time = 1000")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(close, 1.5);
}

#[tokio::test]
async fn ratio_rows_differing_only_by_category_both_persist() {
    let store = DataManager::in_memory().await.unwrap();
    let rows = MetricRows::LongShortRatio(vec![
        ratio(1000, RatioCategory::Top, 60.0),
        ratio(1000, RatioCategory::Global, 52.0),
    ]);

    store.upsert("BTC", &rows).await.unwrap();

    assert_eq!(store.count("long_short_ratio").await.unwrap(), 2);
    let categories: Vec<String> =
        sqlx::query_scalar("SELECT category FROM long_short_ratio ORDER BY category")
            .fetch_all(store.pool())
            .await
            .unwrap();
    assert_eq!(categories, vec!["global", "top"]);
}

#[tokio::test]
async fn empty_batch_is_a_no_op() {
    let store = DataManager::in_memory().await.unwrap();
    let presented = store
        .upsert("ETH", &MetricRows::Liquidation(Vec::new()))
        .await
        .unwrap();
    assert_eq!(presented, 0);
    assert_eq!(store.count("liquidations").await.unwrap(), 0);
}

#[tokio::test]
async fn failed_batch_leaves_nothing_behind() {
    let store = DataManager::in_memory().await.unwrap();
    sqlx::query(
        "CREATE TRIGGER reject_late BEFORE INSERT ON open_interest
         WHEN NEW.time > 2000 BEGIN SELECT RAISE(ABORT, 'rejected'); END",
    )
    .execute(store.pool())
    .await
    .unwrap();

    let rows = MetricRows::OpenInterest(vec![
        open_interest(1000, 1.0),
        open_interest(2000, 1.0),
        open_interest(3000, 1.0),
    ]);
    assert!(store.upsert("BTC", &rows).await.is_err());
    assert_eq!(store.count("open_interest").await.unwrap(), 0);
}

#[tokio::test]
async fn raw_snapshots_are_appended() {
    let store = DataManager::in_memory().await.unwrap();
    let records = vec![json!({"symbol": "BTC"}), json!({"symbol": "ETH"})];

    store
        .insert_raw("futures_supported_coins", &json!({}), &records)
        .await
        .unwrap();
    store
        .insert_raw("futures_supported_coins", &json!({}), &records)
        .await
        .unwrap();

    assert_eq!(store.count("raw_api_data").await.unwrap(), 4);
    let stored: String = sqlx::query_scalar("SELECT data FROM raw_api_data LIMIT 1")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&stored).unwrap()["symbol"], "BTC");
}
