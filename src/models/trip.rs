// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::TravelMode;

/// Stored trip record in Firestore.
///
/// Trips are immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TripRecord {
    /// Trip ID (also used as document ID)
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub mode: TravelMode,
    /// Mode the savings were measured against
    pub baseline_mode: TravelMode,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Duration in minutes
    pub duration_min: Option<f64>,
    /// Emissions of the chosen mode (kg CO2)
    pub co2_kg: f64,
    /// Emissions avoided compared to the baseline (kg CO2, negative if dirtier)
    pub co2_saved_kg: f64,
    /// Savings credited to the user's totals after the negative-savings policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_credited_kg: Option<f64>,
    /// Eco points awarded for this trip
    #[serde(default)]
    pub points_awarded: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
}

impl TripRecord {
    /// CO2 this trip added to the user's totals.
    ///
    /// Records written before the credited amount was stored fall back to the
    /// default clamp of negative savings to zero.
    pub fn credited_co2_kg(&self) -> f64 {
        self.co2_credited_kg
            .unwrap_or_else(|| self.co2_saved_kg.max(0.0))
    }
}
