//! API Integration Tests
//!
//! Drive the wallet routes end-to-end through the router. Requires
//! DATABASE_URL.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware,
};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use wallet_ledger::api::{self, AppState};
use wallet_ledger::fx::mock::FixedRateConverter;

mod common;

fn test_state(pool: sqlx::PgPool) -> AppState {
    let converter = Arc::new(FixedRateConverter::with_usd_quotes(&[
        ("NGN", dec!(1500)),
        ("EUR", dec!(0.92)),
    ]));
    AppState::new(pool, converter)
}

fn router(state: AppState) -> axum::Router {
    api::create_router()
        .layer(middleware::from_fn(api::middleware::auth_middleware))
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_balance_lazily_creates_wallet() {
    let pool = common::setup_test_db().await;
    let app = router(test_state(pool));
    let user_id = Uuid::new_v4();

    // First query creates the wallet
    let req = Request::builder()
        .method("GET")
        .uri("/wallet/balance?currency=EUR")
        .header("X-User-Id", user_id.to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["balance"], "0.00");
    assert_eq!(json["currency"], "EUR");

    // Second query finds it
    let req = Request::builder()
        .method("GET")
        .uri("/wallet/balance?currency=EUR")
        .header("X-User-Id", user_id.to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_user_header_is_unauthorized() {
    let pool = common::setup_test_db().await;
    let app = router(test_state(pool));

    let req = Request::builder()
        .method("GET")
        .uri("/wallet/balance?currency=USD")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_currency_conflict_on_duplicate() {
    let pool = common::setup_test_db().await;
    let app = router(test_state(pool));
    let user_id = Uuid::new_v4();

    let make_req = || {
        Request::builder()
            .method("POST")
            .uri("/wallet/currencies")
            .header("content-type", "application/json")
            .header("X-User-Id", user_id.to_string())
            .body(Body::from(json!({ "currency": "GBP" }).to_string()))
            .unwrap()
    };

    let response = app.clone().oneshot(make_req()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(make_req()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error_code"], "duplicate_wallet");
}

#[tokio::test]
async fn test_fund_withdraw_e2e() {
    let pool = common::setup_test_db().await;
    let app = router(test_state(pool));
    let user_id = Uuid::new_v4();

    // Open a USD wallet
    let req = Request::builder()
        .method("GET")
        .uri("/wallet/balance?currency=USD")
        .header("X-User-Id", user_id.to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Fund 100.00
    let req = Request::builder()
        .method("POST")
        .uri("/wallet/fund")
        .header("content-type", "application/json")
        .header("X-User-Id", user_id.to_string())
        .body(Body::from(
            json!({ "amount": "100.00", "currency": "USD" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Fund failed");
    let json = body_json(response).await;
    assert_eq!(json["balance"], "100.00");

    // Withdraw 40.00
    let req = Request::builder()
        .method("POST")
        .uri("/wallet/withdraw")
        .header("content-type", "application/json")
        .header("X-User-Id", user_id.to_string())
        .body(Body::from(
            json!({ "amount": "40.00", "currency": "USD" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Withdraw failed");
    let json = body_json(response).await;
    assert_eq!(json["balance"], "60.00");

    // Overdraw is a 400 with a distinguishable code
    let req = Request::builder()
        .method("POST")
        .uri("/wallet/withdraw")
        .header("content-type", "application/json")
        .header("X-User-Id", user_id.to_string())
        .body(Body::from(
            json!({ "amount": "100.00", "currency": "USD" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error_code"], "insufficient_funds");
}

#[tokio::test]
async fn test_send_and_statement_e2e() {
    let pool = common::setup_test_db().await;
    let app = router(test_state(pool));
    let sender_id = Uuid::new_v4();
    let recipient_id = Uuid::new_v4();

    // Sender: USD wallet with 100.00
    let req = Request::builder()
        .method("GET")
        .uri("/wallet/balance?currency=USD")
        .header("X-User-Id", sender_id.to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let req = Request::builder()
        .method("POST")
        .uri("/wallet/fund")
        .header("content-type", "application/json")
        .header("X-User-Id", sender_id.to_string())
        .body(Body::from(
            json!({ "amount": "100.00", "currency": "USD" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Recipient: NGN wallet
    let req = Request::builder()
        .method("GET")
        .uri("/wallet/balance?currency=NGN")
        .header("X-User-Id", recipient_id.to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let recipient_wallet_id = body_json(response).await["wallet_id"]
        .as_str()
        .unwrap()
        .to_string();

    // Send 100 USD -> NGN
    let req = Request::builder()
        .method("POST")
        .uri("/wallet/send")
        .header("content-type", "application/json")
        .header("X-User-Id", sender_id.to_string())
        .body(Body::from(
            json!({
                "amount": "100.00",
                "account_type": "wallet",
                "account_id": recipient_wallet_id,
                "currency": "USD",
                "receiving_currency": "NGN",
                "description": "Invoice 42"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "Send failed");
    let json = body_json(response).await;
    assert_eq!(json["amount_received"], "150000.00");
    assert_eq!(json["rate"], "1500.000000");
    assert_eq!(json["status"], "completed");

    // Structured statement shows the debit
    let req = Request::builder()
        .method("GET")
        .uri("/wallet/statement?currency=USD&start_date=2020-01-01T00:00:00Z&end_date=2100-01-01T00:00:00Z")
        .header("X-User-Id", sender_id.to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Newest first: the send debit precedes the fund credit
    assert_eq!(entries[0]["direction"], "debit");
    assert_eq!(entries[0]["description"], "Invoice 42");

    // Tabular export
    let req = Request::builder()
        .method("GET")
        .uri("/wallet/statement?currency=USD&start_date=2020-01-01T00:00:00Z&end_date=2100-01-01T00:00:00Z&format=csv")
        .header("X-User-Id", sender_id.to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/csv"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(body.to_vec()).unwrap();
    assert!(csv.starts_with("id,created_at,direction,amount,currency,status,description"));
    assert!(csv.contains("Invoice 42"));

    // Summary over all the sender's wallets
    let req = Request::builder()
        .method("GET")
        .uri("/wallet/summary")
        .header("X-User-Id", sender_id.to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_income"], "100.00");
    assert_eq!(json["total_expenses"], "100.00");
}

#[tokio::test]
async fn test_statement_requires_existing_wallet() {
    let pool = common::setup_test_db().await;
    let app = router(test_state(pool));

    let req = Request::builder()
        .method("GET")
        .uri("/wallet/statement?currency=GHS&start_date=2020-01-01T00:00:00Z&end_date=2100-01-01T00:00:00Z")
        .header("X-User-Id", Uuid::new_v4().to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error_code"], "wallet_not_found");
}

#[tokio::test]
async fn test_statement_rejects_inverted_date_range() {
    let pool = common::setup_test_db().await;
    let app = router(test_state(pool.clone()));
    let user_id = Uuid::new_v4();

    // Wallet exists, range is inverted
    let req = Request::builder()
        .method("GET")
        .uri("/wallet/balance?currency=USD")
        .header("X-User-Id", user_id.to_string())
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap();

    let req = Request::builder()
        .method("GET")
        .uri("/wallet/statement?currency=USD&start_date=2100-01-01T00:00:00Z&end_date=2020-01-01T00:00:00Z")
        .header("X-User-Id", user_id.to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error_code"], "invalid_date_range");
}

#[tokio::test]
async fn test_send_same_currency_uses_identity_rate() {
    let pool = common::setup_test_db().await;
    let app = router(test_state(pool));
    let sender_id = Uuid::new_v4();
    let recipient_id = Uuid::new_v4();

    // Sender USD wallet with 50.00
    let req = Request::builder()
        .method("GET")
        .uri("/wallet/balance?currency=USD")
        .header("X-User-Id", sender_id.to_string())
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/wallet/fund")
        .header("content-type", "application/json")
        .header("X-User-Id", sender_id.to_string())
        .body(Body::from(
            json!({ "amount": "50.00", "currency": "USD" }).to_string(),
        ))
        .unwrap();
    app.clone().oneshot(req).await.unwrap();

    // Recipient USD wallet
    let req = Request::builder()
        .method("GET")
        .uri("/wallet/balance?currency=USD")
        .header("X-User-Id", recipient_id.to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let recipient_wallet_id = body_json(response).await["wallet_id"]
        .as_str()
        .unwrap()
        .to_string();

    let req = Request::builder()
        .method("POST")
        .uri("/wallet/send")
        .header("content-type", "application/json")
        .header("X-User-Id", sender_id.to_string())
        .body(Body::from(
            json!({
                "amount": "50.00",
                "account_type": "wallet",
                "account_id": recipient_wallet_id,
                "currency": "USD",
                "receiving_currency": "USD"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["amount_received"], "50.00");
    assert_eq!(json["rate"], "1.000000");
}
