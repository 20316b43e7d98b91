// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip logging and eco-points award workflow.
//!
//! Handles the core flow:
//! 1. Compute emissions for the chosen mode and savings against the baseline
//! 2. Turn savings into an award with the eco-points policy
//! 3. Store the trip and apply the award in one storage operation

use chrono::{DateTime, Utc};

use crate::db::Database;
use crate::error::Result;
use crate::models::{TravelMode, TripRecord, UserEcoStats};
use crate::services::eco_points::{EcoAward, EcoPolicy};
use crate::services::emissions::EmissionsCalculator;

/// A trip as submitted by a client, after mode normalization.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub mode: TravelMode,
    /// Defaults to car
    pub baseline_mode: Option<TravelMode>,
    /// Missing or degenerate distances count as 0
    pub distance_km: Option<f64>,
    pub duration_min: Option<f64>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

/// Outcome of logging a trip.
#[derive(Debug, Clone)]
pub struct LoggedTrip {
    pub trip: TripRecord,
    pub award: EcoAward,
    pub stats: UserEcoStats,
}

/// Outcome of a direct points award.
#[derive(Debug, Clone)]
pub struct AwardResult {
    pub award: EcoAward,
    pub stats: UserEcoStats,
}

pub const DEFAULT_BASELINE_MODE: TravelMode = TravelMode::Car;

/// Logs trips and awards eco points.
#[derive(Clone)]
pub struct TripService {
    calculator: EmissionsCalculator,
    policy: EcoPolicy,
    db: Database,
}

impl TripService {
    pub fn new(calculator: EmissionsCalculator, policy: EcoPolicy, db: Database) -> Self {
        Self {
            calculator,
            policy,
            db,
        }
    }

    pub fn calculator(&self) -> &EmissionsCalculator {
        &self.calculator
    }

    pub fn policy(&self) -> &EcoPolicy {
        &self.policy
    }

    /// Build the record for a trip without storing it.
    pub fn build_trip(
        &self,
        user_id: &str,
        new_trip: NewTrip,
        now: DateTime<Utc>,
    ) -> Result<(TripRecord, EcoAward)> {
        let baseline = new_trip.baseline_mode.unwrap_or(DEFAULT_BASELINE_MODE);
        let distance_km = crate::rounding::non_negative_or_zero(new_trip.distance_km);

        let co2_kg = self.calculator.emissions_for(new_trip.mode, Some(distance_km));
        let co2_saved_kg = self
            .calculator
            .savings_for(new_trip.mode, baseline, Some(distance_km));
        let award = self.policy.award(co2_saved_kg)?;

        let trip = TripRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            origin: new_trip.origin,
            destination: new_trip.destination,
            mode: new_trip.mode,
            baseline_mode: baseline,
            distance_km,
            duration_min: new_trip
                .duration_min
                .map(|d| crate::rounding::non_negative_or_zero(Some(d))),
            co2_kg,
            co2_saved_kg,
            co2_credited_kg: Some(award.co2_saved_kg),
            points_awarded: award.points,
            created_at: now,
        };

        Ok((trip, award))
    }

    /// Compute, store and award a trip.
    pub async fn log_trip(&self, user_id: &str, new_trip: NewTrip) -> Result<LoggedTrip> {
        let (trip, award) = self.build_trip(user_id, new_trip, Utc::now())?;

        tracing::info!(
            user_id,
            trip_id = %trip.id,
            mode = %trip.mode,
            distance_km = trip.distance_km,
            co2_saved_kg = trip.co2_saved_kg,
            points = award.points,
            "Logging trip"
        );

        let stats = self
            .db
            .record_trip(&trip, award.points, award.co2_saved_kg)
            .await?;

        Ok(LoggedTrip { trip, award, stats })
    }

    /// Award points for an externally computed CO2 saving.
    ///
    /// Non-finite savings are rejected before storage is touched.
    pub async fn award_points(&self, user_id: &str, co2_saved_kg: f64) -> Result<AwardResult> {
        let award = self.policy.award(co2_saved_kg)?;

        let stats = self
            .db
            .upsert_increment(user_id, award.points, award.co2_saved_kg)
            .await?;

        tracing::info!(
            user_id,
            points = award.points,
            eco_points = stats.eco_points,
            "Eco points awarded"
        );

        Ok(AwardResult { award, stats })
    }
}
