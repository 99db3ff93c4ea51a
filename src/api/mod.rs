//! API module
//!
//! HTTP delivery layer: router, shared state, and middleware. Thin
//! adapters only; all business behavior lives in the usecases.

pub mod middleware;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::repository::{
    PgAccountRepository, PgCatalogRepository, PgLedgerRepository, PgSessionRepository,
    SessionRepository,
};
use crate::uow::PgUowFactory;
use crate::usecase::{PurchaseUsecase, ReportUsecase, SessionUsecase, TransferUsecase};

/// Shared application state: repositories and usecases wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub purchase: Arc<PurchaseUsecase>,
    pub transfer: Arc<TransferUsecase>,
    pub report: Arc<ReportUsecase>,
    pub session: Arc<SessionUsecase>,
    pub sessions: Arc<dyn SessionRepository>,
    pub operation_timeout: Duration,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let accounts = Arc::new(PgAccountRepository::new(pool.clone()));
        let catalog = Arc::new(PgCatalogRepository::new(pool.clone()));
        let ledger = Arc::new(PgLedgerRepository::new(pool.clone()));
        let sessions = Arc::new(PgSessionRepository::new(pool.clone()));
        let uow_factory = Arc::new(PgUowFactory::new(pool.clone()));

        Self {
            purchase: Arc::new(PurchaseUsecase::new(
                accounts.clone(),
                catalog,
                ledger.clone(),
                uow_factory.clone(),
            )),
            transfer: Arc::new(TransferUsecase::new(
                accounts.clone(),
                ledger.clone(),
                uow_factory,
            )),
            report: Arc::new(ReportUsecase::new(accounts.clone(), ledger)),
            session: Arc::new(SessionUsecase::new(
                accounts,
                sessions.clone(),
                config.initial_grant(),
                config.session_ttl(),
            )),
            sessions,
            operation_timeout: config.operation_timeout(),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Axum layers run in reverse registration order: logging -> auth -> handler
    let protected = routes::protected_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::logging_middleware));

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/api/auth", axum::routing::post(routes::auth))
        .nest("/api", protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
