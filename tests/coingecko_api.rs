use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use market_price_notifier::providers::CoinGeckoProvider;
use market_price_notifier::{MarketPriceProvider, ProviderError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

type SeenQuery = Arc<Mutex<Option<HashMap<String, String>>>>;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn fetches_quotes_with_all_fields() {
    let seen: SeenQuery = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route(
            "/simple/price",
            get(
                |State(seen): State<SeenQuery>, Query(q): Query<HashMap<String, String>>| async move {
                    *seen.lock().unwrap() = Some(q);
                    Json(serde_json::json!({
                        "ethereum": {"usd": 3500.25, "usd_market_cap": 4.2e11, "usd_24h_vol": 1.5e10, "usd_24h_change": -2.1},
                        "bitcoin": {"usd": 65000.0, "usd_market_cap": 1.28e12, "usd_24h_vol": 3.4e10, "usd_24h_change": 3.2}
                    }))
                },
            ),
        )
        .with_state(seen.clone());
    let base = serve(app).await;

    let provider = CoinGeckoProvider::with_base_url(base).unwrap();
    let snapshot = provider
        .fetch_snapshot(&ids(&["bitcoin", "ethereum"]))
        .await
        .unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.quotes()[0].identifier, "bitcoin");
    let eth = snapshot.get("ethereum").unwrap();
    assert_eq!(eth.price_usd, 3500.25);
    assert_eq!(eth.change_24h_pct, -2.1);
    assert_eq!(eth.market_cap_usd, 4.2e11);
    assert_eq!(eth.volume_24h_usd, 1.5e10);

    let query = seen.lock().unwrap().clone().unwrap();
    assert_eq!(query.get("ids").map(String::as_str), Some("bitcoin,ethereum"));
    assert_eq!(query.get("vs_currencies").map(String::as_str), Some("usd"));
    assert_eq!(query.get("include_24hr_change").map(String::as_str), Some("true"));
    assert_eq!(query.get("include_market_cap").map(String::as_str), Some("true"));
    assert_eq!(query.get("include_24hr_vol").map(String::as_str), Some("true"));
}

#[tokio::test]
async fn server_error_is_api_error() {
    let app = Router::new().route(
        "/simple/price",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
    );
    let provider = CoinGeckoProvider::with_base_url(serve(app).await).unwrap();

    let err = provider.fetch_snapshot(&ids(&["bitcoin"])).await.unwrap_err();
    match err {
        ProviderError::ApiError(msg) => assert!(msg.contains("500") && msg.contains("boom")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn too_many_requests_is_rate_limit() {
    let app = Router::new().route(
        "/simple/price",
        get(|| async { StatusCode::TOO_MANY_REQUESTS }),
    );
    let provider = CoinGeckoProvider::with_base_url(serve(app).await).unwrap();

    let err = provider.fetch_snapshot(&ids(&["bitcoin"])).await.unwrap_err();
    assert!(matches!(err, ProviderError::RateLimitExceeded));
}

#[tokio::test]
async fn malformed_and_empty_bodies_are_invalid() {
    let app = Router::new()
        .route("/bad/simple/price", get(|| async { "not json" }))
        .route(
            "/empty/simple/price",
            get(|| async { Json(serde_json::json!({})) }),
        );
    let base = serve(app).await;

    let bad = CoinGeckoProvider::with_base_url(format!("{base}/bad")).unwrap();
    let err = bad.fetch_snapshot(&ids(&["bitcoin"])).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));

    let empty = CoinGeckoProvider::with_base_url(format!("{base}/empty")).unwrap();
    let err = empty.fetch_snapshot(&ids(&["bitcoin"])).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = CoinGeckoProvider::with_base_url(format!("http://{addr}")).unwrap();
    let err = provider.fetch_snapshot(&ids(&["bitcoin"])).await.unwrap_err();
    assert!(matches!(err, ProviderError::NetworkError(_)));
}

#[tokio::test]
async fn slow_server_times_out_as_network_error() {
    let app = Router::new().route(
        "/simple/price",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(serde_json::json!({"bitcoin": {"usd": 1.0}}))
        }),
    );
    let base = serve(app).await;
    let provider = CoinGeckoProvider::with_options(base, Duration::from_millis(200)).unwrap();

    let start = Instant::now();
    let err = provider.fetch_snapshot(&ids(&["bitcoin"])).await.unwrap_err();

    assert!(start.elapsed() < Duration::from_secs(5));
    match err {
        ProviderError::NetworkError(e) => assert!(e.is_timeout()),
        other => panic!("unexpected error: {other}"),
    }
}
