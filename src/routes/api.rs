// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::stats::{current_streak, monthly_series, summarize};
use crate::models::{MonthlyPoint, TravelMode, TripSummary, User};
use crate::routes::extract::ValidJson;
use crate::routes::views::{BadgeView, TripView, UserResponse};
use crate::services::{NewTrip, RouteComparison};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Trips shown on the dashboard.
const RECENT_TRIPS: usize = 5;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/auth/me", get(get_me))
        .route("/api/trips", get(get_trips).post(create_trip))
        .route("/api/trips/stats", get(get_trip_stats))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/dashboard/progress", get(get_progress))
        .route("/api/leaderboard/update", post(update_leaderboard))
        .route("/api/routes/compare", post(compare_routes))
}

// ─── User Profile ────────────────────────────────────────────

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(profile.into()))
}

#[derive(Deserialize, Validate)]
struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(email)]
    email: Option<String>,
    #[validate(length(max = 20))]
    favorite_routes: Option<Vec<String>>,
}

/// Create or replace the current user's profile.
///
/// `favorite_routes` is left unchanged when omitted.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    let now = format_utc_rfc3339(chrono::Utc::now());
    let existing = state.db.get_user(&user.user_id).await?;

    let profile = match existing {
        Some(mut profile) => {
            profile.name = req.name;
            profile.email = req.email;
            if let Some(routes) = req.favorite_routes {
                profile.favorite_routes = routes;
            }
            profile.updated_at = now;
            profile
        }
        None => User {
            user_id: user.user_id.clone(),
            name: req.name,
            email: req.email,
            favorite_routes: req.favorite_routes.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        },
    };

    state.db.upsert_user(&profile).await?;
    tracing::info!(user_id = %user.user_id, "Profile updated");

    Ok(Json(profile.into()))
}

// ─── Trips ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct CreateTripRequest {
    #[validate(length(min = 1, max = 32))]
    mode: String,
    #[validate(length(min = 1, max = 32))]
    baseline_mode: Option<String>,
    /// Negative values are treated as zero; the cap keeps savings inside the
    /// per-award bound.
    #[validate(range(max = 100_000.0))]
    distance_km: Option<f64>,
    duration_min: Option<f64>,
    #[validate(length(min = 1, max = 200))]
    origin: Option<String>,
    #[validate(length(min = 1, max = 200))]
    destination: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TripCreatedResponse {
    pub trip: TripView,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points_awarded: i64,
    /// User totals after this trip's award
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub eco_points: i64,
    pub total_co2_saved_kg: f64,
    pub badge: BadgeView,
}

/// Log a trip and award eco points for the CO2 it saved.
async fn create_trip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<CreateTripRequest>,
) -> Result<(StatusCode, Json<TripCreatedResponse>)> {
    let new_trip = NewTrip {
        mode: TravelMode::parse(&req.mode)?,
        baseline_mode: req
            .baseline_mode
            .as_deref()
            .map(TravelMode::parse)
            .transpose()?,
        distance_km: req.distance_km,
        duration_min: req.duration_min,
        origin: req.origin,
        destination: req.destination,
    };

    let logged = state.trip_service.log_trip(&user.user_id, new_trip).await?;

    Ok((
        StatusCode::CREATED,
        Json(TripCreatedResponse {
            points_awarded: logged.award.points,
            eco_points: logged.stats.eco_points,
            total_co2_saved_kg: logged.stats.total_co2_saved_kg,
            badge: BadgeView::for_points(logged.stats.eco_points),
            trip: logged.trip.into(),
        }),
    ))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TripsResponse {
    pub trips: Vec<TripView>,
}

/// All of the user's trips, newest first.
async fn get_trips(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TripsResponse>> {
    let trips = state.db.get_trips_for_user(&user.user_id).await?;
    tracing::debug!(user_id = %user.user_id, count = trips.len(), "Fetched trips");

    Ok(Json(TripsResponse {
        trips: trips.into_iter().map(TripView::from).collect(),
    }))
}

/// Trip count, distance and CO2 totals.
async fn get_trip_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TripSummary>> {
    let trips = state.db.get_trips_for_user(&user.user_id).await?;
    Ok(Json(summarize(&trips)))
}

// ─── Dashboard ───────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardResponse {
    /// None until the user has saved a profile
    pub user: Option<UserResponse>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub eco_points: i64,
    pub total_co2_saved_kg: f64,
    pub badge: BadgeView,
    pub summary: TripSummary,
    pub monthly: Vec<MonthlyPoint>,
    /// Consecutive days (UTC) with at least one trip
    pub streak_days: u32,
    pub recent_trips: Vec<TripView>,
}

/// Everything the dashboard page renders, in one call.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let (profile, (stats, trips)) = tokio::try_join!(
        state.db.get_user(&user.user_id),
        state.db.get_user_activity(&user.user_id),
    )?;
    let stats = stats.unwrap_or_default();
    let today = chrono::Utc::now().date_naive();

    Ok(Json(DashboardResponse {
        user: profile.map(UserResponse::from),
        eco_points: stats.eco_points,
        total_co2_saved_kg: crate::rounding::round_dp(stats.total_co2_saved_kg, 2),
        badge: BadgeView::for_points(stats.eco_points),
        summary: summarize(&trips),
        monthly: monthly_series(&trips),
        streak_days: current_streak(&trips, today),
        recent_trips: trips
            .into_iter()
            .take(RECENT_TRIPS)
            .map(TripView::from)
            .collect(),
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressResponse {
    /// Oldest month first
    pub monthly: Vec<MonthlyPoint>,
}

/// CO2 saved per calendar month, for charting.
async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProgressResponse>> {
    let trips = state.db.get_trips_for_user(&user.user_id).await?;
    Ok(Json(ProgressResponse {
        monthly: monthly_series(&trips),
    }))
}

// ─── Eco Points ──────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct UpdateLeaderboardRequest {
    co2_saved: f64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AwardResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points_awarded: i64,
    /// Savings credited after the negative-savings policy
    pub co2_saved_kg: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub eco_points: i64,
    pub total_co2_saved_kg: f64,
    pub badge: BadgeView,
}

/// Credit CO2 saved outside of a logged trip (e.g. from the comparison page).
async fn update_leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<UpdateLeaderboardRequest>,
) -> Result<Json<AwardResponse>> {
    let result = state
        .trip_service
        .award_points(&user.user_id, req.co2_saved)
        .await?;

    Ok(Json(AwardResponse {
        points_awarded: result.award.points,
        co2_saved_kg: result.award.co2_saved_kg,
        eco_points: result.stats.eco_points,
        total_co2_saved_kg: result.stats.total_co2_saved_kg,
        badge: BadgeView::for_points(result.stats.eco_points),
    }))
}

// ─── Route Comparison ────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct CompareRoutesRequest {
    #[validate(length(min = 1, max = 200))]
    origin: String,
    #[validate(length(min = 1, max = 200))]
    destination: String,
    #[validate(length(min = 1, max = 32))]
    mode_a: String,
    #[validate(length(min = 1, max = 32))]
    mode_b: String,
}

/// Route both modes through the routing provider and compare emissions.
async fn compare_routes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<CompareRoutesRequest>,
) -> Result<Json<RouteComparison>> {
    let mode_a = TravelMode::parse(&req.mode_a)?;
    let mode_b = TravelMode::parse(&req.mode_b)?;

    tracing::debug!(
        user_id = %user.user_id,
        origin = %req.origin,
        destination = %req.destination,
        %mode_a,
        %mode_b,
        "Comparing routes"
    );

    let (leg_a, leg_b) = state
        .routing_client
        .route_pair(&req.origin, &req.destination, mode_a, mode_b)
        .await?;

    let mut comparison = state.comparison_calculator.compare_routes(
        mode_a,
        Some(leg_a.distance_km),
        mode_b,
        Some(leg_b.distance_km),
    );
    comparison.a.duration_min = Some(leg_a.duration_min);
    comparison.b.duration_min = Some(leg_b.duration_min);

    Ok(Json(comparison))
}
