//! Read-only endpoints: the info page and the health check.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{AppState, RepoClients};
use crate::effects::UserData;
use crate::reconcile::Strategy;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct InfoPage {
    pub user: UserData,
    /// `kind:pattern` lines per login.
    pub rules: BTreeMap<String, Vec<String>>,
    pub fallback: Option<String>,
    pub strategy: Strategy,
    pub dry_run: bool,
}

/// Info handler.
///
/// Shows who the server acts as and which rules it applies.
pub async fn info_handler<C: RepoClients>(State(app_state): State<AppState<C>>) -> Json<InfoPage> {
    let config = app_state.config();
    Json(InfoPage {
        user: app_state.user().clone(),
        rules: config.rules.to_lines(),
        fallback: config.fallback.as_ref().map(|f| f.label.clone()),
        strategy: config.strategy,
        dry_run: config.dry_run,
    })
}

/// Health check handler for liveness probes.
///
/// ```ignore
/// GET /health HTTP/1.1
///
/// HTTP/1.1 200 OK
/// Content-Type: text/plain
///
/// OK
/// ```
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
