use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use market_price_notifier::notifiers::DiscordNotifier;
use market_price_notifier::{Notifier, NotifyError};
use serde_json::Value;
use std::sync::{Arc, Mutex};

type Received = Arc<Mutex<Vec<Value>>>;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Webhook that records each body and answers with `status`
fn webhook(status: StatusCode, received: Received) -> Router {
    Router::new()
        .route(
            "/hook",
            post(
                move |State(received): State<Received>, Json(body): Json<Value>| async move {
                    received.lock().unwrap().push(body);
                    (status, "rejected").into_response()
                },
            ),
        )
        .with_state(received)
}

fn notifier(url: String) -> DiscordNotifier {
    DiscordNotifier::with_identity(Some(url), "Price Bot", "https://example.com/avatar.png")
        .unwrap()
}

#[tokio::test]
async fn no_content_is_success() {
    let received: Received = Arc::default();
    let base = serve(webhook(StatusCode::NO_CONTENT, received.clone())).await;

    notifier(format!("{base}/hook"))
        .notify("market update")
        .await
        .unwrap();

    let bodies = received.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        serde_json::json!({
            "content": "market update",
            "username": "Price Bot",
            "avatar_url": "https://example.com/avatar.png"
        })
    );
}

#[tokio::test]
async fn any_other_status_is_failure() {
    for status in [StatusCode::OK, StatusCode::BAD_REQUEST, StatusCode::INTERNAL_SERVER_ERROR] {
        let received: Received = Arc::default();
        let base = serve(webhook(status, received.clone())).await;

        let err = notifier(format!("{base}/hook"))
            .notify("market update")
            .await
            .unwrap_err();

        match err {
            NotifyError::BadStatus { status: code, body } => {
                assert_eq!(code, status.as_u16());
                assert_eq!(body, "rejected");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Exactly one attempt, no retry
        assert_eq!(received.lock().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn unreachable_webhook_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = notifier(format!("http://{addr}/hook"))
        .notify("market update")
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::NetworkError(_)));
}
