// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Response bodies shared by several routes.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{TravelMode, TripRecord, User};
use crate::services::Badge;
use crate::time_utils::format_utc_rfc3339;

/// Badge tier with its display strings.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BadgeView {
    pub tier: Badge,
    pub name: String,
    pub icon: String,
}

impl BadgeView {
    pub fn for_points(eco_points: i64) -> Self {
        let tier = Badge::for_points(eco_points);
        Self {
            tier,
            name: tier.name().to_string(),
            icon: tier.icon().to_string(),
        }
    }
}

/// A stored trip as returned to the client.
#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TripView {
    pub id: String,
    pub mode: TravelMode,
    pub baseline_mode: TravelMode,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub distance_km: f64,
    pub duration_min: Option<f64>,
    pub co2_kg: f64,
    pub co2_saved_kg: f64,
    /// Amount added to the user's totals
    pub co2_credited_kg: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points_awarded: i64,
    pub created_at: String,
}

impl From<TripRecord> for TripView {
    fn from(trip: TripRecord) -> Self {
        let co2_credited_kg = trip.credited_co2_kg();
        Self {
            id: trip.id,
            mode: trip.mode,
            baseline_mode: trip.baseline_mode,
            origin: trip.origin,
            destination: trip.destination,
            distance_km: trip.distance_km,
            duration_min: trip.duration_min,
            co2_kg: trip.co2_kg,
            co2_credited_kg,
            co2_saved_kg: trip.co2_saved_kg,
            points_awarded: trip.points_awarded,
            created_at: format_utc_rfc3339(trip.created_at),
        }
    }
}

/// Current user profile.
#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub favorite_routes: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            favorite_routes: user.favorite_routes,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_badge_view_carries_display_strings() {
        let view = BadgeView::for_points(250);
        assert_eq!(view.tier, Badge::GreenGuardian);
        assert_eq!(view.name, "Green Guardian");
    }

    #[test]
    fn test_trip_view_formats_timestamp() {
        let trip = TripRecord {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            origin: None,
            destination: None,
            mode: TravelMode::Bus,
            baseline_mode: TravelMode::Car,
            distance_km: 10.0,
            duration_min: None,
            co2_kg: 0.89,
            co2_saved_kg: 1.03,
            co2_credited_kg: Some(1.03),
            points_awarded: 10,
            created_at: chrono::Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap(),
        };

        let view = TripView::from(trip);
        assert_eq!(view.created_at, "2026-03-04T05:06:07Z");
        assert_eq!(view.co2_credited_kg, 1.03);
    }
}
