// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public routes: leaderboard and emission estimates.

use crate::error::Result;
use crate::models::{TravelMode, User};
use crate::routes::extract::ValidJson;
use crate::services::leaderboard::{self, LeaderboardEntry};
use crate::services::RouteComparison;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/emissions/estimate", post(estimate_emissions))
        .route("/api/emissions/compare", post(compare_emissions))
}

// ─── Leaderboard ─────────────────────────────────────────────

#[derive(Deserialize)]
struct LeaderboardQuery {
    /// Number of entries (default 10, capped at 100)
    limit: Option<usize>,
}

/// Global ranking by eco points.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
    let top_n = leaderboard::leaderboard_size(params.limit);
    let stats = state.db.top_stats(top_n).await?;

    let user_ids: Vec<String> = stats.iter().map(|s| s.user_id.clone()).collect();
    let directory: HashMap<String, User> = state
        .db
        .get_users(&user_ids)
        .await?
        .into_iter()
        .map(|u| (u.user_id.clone(), u))
        .collect();

    tracing::debug!(
        top_n,
        rows = stats.len(),
        profiles = directory.len(),
        "Building leaderboard"
    );

    Ok(Json(leaderboard::rank(stats, &directory, top_n)))
}

// ─── Emission Estimates ──────────────────────────────────────

#[derive(Deserialize, Validate)]
struct EstimateRequest {
    #[validate(length(min = 1, max = 32))]
    mode: String,
    #[validate(range(max = 100_000.0))]
    distance_km: Option<f64>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EstimateResponse {
    /// Canonical mode name, or the submitted name if it is not recognized
    pub mode: String,
    /// False when the fallback factor was used
    pub known_mode: bool,
    pub distance_km: f64,
    pub co2_kg: f64,
}

/// Emissions for one mode over a distance.
///
/// Unrecognized modes are priced with the fallback factor rather than rejected.
async fn estimate_emissions(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<EstimateRequest>,
) -> Result<Json<EstimateResponse>> {
    let calculator = state.trip_service.calculator();
    let co2_kg = calculator.emissions_for_name(&req.mode, req.distance_km);

    let (mode, known_mode) = match TravelMode::parse(&req.mode) {
        Ok(mode) => (mode.as_str().to_string(), true),
        Err(_) => (req.mode.trim().to_ascii_lowercase(), false),
    };

    Ok(Json(EstimateResponse {
        mode,
        known_mode,
        distance_km: crate::rounding::non_negative_or_zero(req.distance_km),
        co2_kg,
    }))
}

#[derive(Deserialize, Validate)]
struct CompareRequest {
    #[validate(length(min = 1, max = 32))]
    mode_a: String,
    #[validate(range(max = 100_000.0))]
    distance_a_km: Option<f64>,
    #[validate(length(min = 1, max = 32))]
    mode_b: String,
    #[validate(range(max = 100_000.0))]
    distance_b_km: Option<f64>,
}

/// Compare two itineraries with caller-supplied distances.
async fn compare_emissions(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CompareRequest>,
) -> Result<Json<RouteComparison>> {
    let mode_a = TravelMode::parse(&req.mode_a)?;
    let mode_b = TravelMode::parse(&req.mode_b)?;

    Ok(Json(state.comparison_calculator.compare_routes(
        mode_a,
        req.distance_a_km,
        mode_b,
        req.distance_b_km,
    )))
}
