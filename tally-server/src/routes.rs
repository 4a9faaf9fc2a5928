//! HTTP routes for the Tally server

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{Json, Redirect},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::auth::require_admin;
use crate::state::AppContext;
use crate::sync;

/// Build the HTTP router for the Tally server
pub fn build_router(ctx: AppContext) -> Router {
    let admin = Router::new()
        .route("/projects/populate", post(populate_projects))
        .route("/issues/populate", post(populate_issues))
        .route_layer(middleware::from_fn_with_state(ctx.clone(), require_admin));

    Router::new()
        .nest("/admin", admin)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Seed the project table from the configured repository list
async fn populate_projects(
    State(ctx): State<AppContext>,
) -> Result<Redirect, (StatusCode, Json<Value>)> {
    let summary = sync::populate_projects(&ctx).await.map_err(|e| {
        error!(error = %e, "Project seeding failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    info!(
        created = summary.created,
        existing = summary.existing,
        "Seeded projects"
    );

    Ok(Redirect::to(&ctx.config.server.redirect_to))
}

/// Mirror issues for every tracked project
async fn populate_issues(
    State(ctx): State<AppContext>,
) -> Result<Redirect, (StatusCode, Json<Value>)> {
    let summary = sync::populate_issues(&ctx).await.map_err(|e| {
        error!(error = %e, "Issue sync failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    info!(
        projects = summary.projects,
        fetched = summary.fetched,
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped(),
        "Synced issues"
    );

    Ok(Redirect::to(&ctx.config.server.redirect_to))
}
