//! API Routes
//!
//! HTTP endpoint definitions and request/response types.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Coins;
use crate::error::AppError;

use super::middleware::AuthenticatedAccount;
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BuyResponse {
    pub item: String,
    #[serde(rename = "remainingCoins")]
    pub remaining_coins: u64,
}

#[derive(Debug, Deserialize)]
pub struct SendCoinRequest {
    #[serde(rename = "toUser")]
    pub to_user: String,
    pub amount: u64,
}

#[derive(Debug, Serialize)]
pub struct InventoryItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct ReceivedCoins {
    #[serde(rename = "fromUser")]
    pub from_user: String,
    pub amount: u64,
}

#[derive(Debug, Serialize)]
pub struct SentCoins {
    #[serde(rename = "toUser")]
    pub to_user: String,
    pub amount: u64,
}

#[derive(Debug, Serialize)]
pub struct CoinHistory {
    pub received: Vec<ReceivedCoins>,
    pub sent: Vec<SentCoins>,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub coins: u64,
    pub inventory: Vec<InventoryItem>,
    #[serde(rename = "coinHistory")]
    pub coin_history: CoinHistory,
}

// =========================================================================
// Routers
// =========================================================================

/// Routes that require an authenticated session
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/info", get(info))
        .route("/buy/:item", get(buy))
        .route("/sendCoin", post(send_coin))
}

// =========================================================================
// POST /api/auth
// =========================================================================

/// Login or signup; unknown usernames are created with the initial grant
pub async fn auth(
    State(state): State<AppState>,
    Json(request): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = state
        .session
        .login_or_signup(&request.username, &request.password)
        .await?;

    Ok(Json(AuthResponse {
        token: session.token,
        expires_at: session.expires_at,
    }))
}

// =========================================================================
// GET /api/info
// =========================================================================

/// Aggregated balance, inventory, and coin history for the caller
async fn info(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
) -> Result<Json<InfoResponse>, AppError> {
    let report = state.report.info(account.id).await?;

    Ok(Json(InfoResponse {
        coins: report.coins.value(),
        inventory: report
            .inventory
            .into_iter()
            .map(|entry| InventoryItem {
                item_type: entry.item_name,
                quantity: entry.quantity,
            })
            .collect(),
        coin_history: CoinHistory {
            received: report
                .received
                .into_iter()
                .map(|entry| ReceivedCoins {
                    from_user: entry.from_username,
                    amount: entry.amount.value(),
                })
                .collect(),
            sent: report
                .sent
                .into_iter()
                .map(|entry| SentCoins {
                    to_user: entry.to_username,
                    amount: entry.amount.value(),
                })
                .collect(),
        },
    }))
}

// =========================================================================
// GET /api/buy/:item
// =========================================================================

/// Purchase one catalog item for the caller
async fn buy(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    Path(item): Path<String>,
) -> Result<Json<BuyResponse>, AppError> {
    let purchase = state.purchase.purchase(account.id, &item);

    let record = match tokio::time::timeout(state.operation_timeout, purchase).await {
        Ok(result) => result?,
        // The in-flight transaction is rolled back when the cancelled
        // future drops its unit of work
        Err(_) => return Err(AppError::Timeout),
    };

    let remaining = state.report.info(account.id).await?.coins;

    Ok(Json(BuyResponse {
        item: record.item_name,
        remaining_coins: remaining.value(),
    }))
}

// =========================================================================
// POST /api/sendCoin
// =========================================================================

/// Transfer coins from the caller to another user
async fn send_coin(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    Json(request): Json<SendCoinRequest>,
) -> Result<StatusCode, AppError> {
    let transfer = state
        .transfer
        .transfer(&account.username, &request.to_user, Coins::new(request.amount));

    match tokio::time::timeout(state.operation_timeout, transfer).await {
        Ok(result) => {
            result?;
        }
        Err(_) => return Err(AppError::Timeout),
    }

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_request_deserialize() {
        let json = r#"{"username": "alice", "password": "secret"}"#;
        let request: AuthRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.username, "alice");
        assert_eq!(request.password, "secret");
    }

    #[test]
    fn test_send_coin_request_deserialize() {
        let json = r#"{"toUser": "bob", "amount": 300}"#;
        let request: SendCoinRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.to_user, "bob");
        assert_eq!(request.amount, 300);
    }

    #[test]
    fn test_info_response_shape() {
        let response = InfoResponse {
            coins: 800,
            inventory: vec![InventoryItem {
                item_type: "powerbank".to_string(),
                quantity: 1,
            }],
            coin_history: CoinHistory {
                received: vec![],
                sent: vec![SentCoins {
                    to_user: "bob".to_string(),
                    amount: 300,
                }],
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["coins"], 800);
        assert_eq!(json["inventory"][0]["type"], "powerbank");
        assert_eq!(json["coinHistory"]["sent"][0]["toUser"], "bob");
    }
}
