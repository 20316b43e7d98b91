// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Eco statistics: the per-user running totals and the reducers that fold
//! trip history into dashboard summaries.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::TripRecord;
use crate::rounding::round_dp;

/// Running eco totals for a user.
///
/// Stored at: `user_eco_stats/{user_id}`
///
/// Exactly one document per user. Created lazily by the first award and only
/// ever changed through `Database::upsert_increment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserEcoStats {
    /// Owning user (document ID; filled in on read)
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub eco_points: i64,
    #[serde(default)]
    pub total_co2_saved_kg: f64,
}

/// Totals over a user's trip history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TripSummary {
    pub total_trips: u32,
    /// Rounded to 2 decimal places
    pub total_distance_km: f64,
    /// Rounded to 2 decimal places
    pub total_co2_saved_kg: f64,
}

/// CO2 saved within one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthlyPoint {
    /// "YYYY-MM"
    pub period: String,
    pub co2_saved_kg: f64,
}

/// Fold trips into count and distance/CO2 totals.
///
/// CO2 is the credited amount, so the total agrees with the stats document.
pub fn summarize(trips: &[TripRecord]) -> TripSummary {
    let (distance, saved) = trips.iter().fold((0.0, 0.0), |(d, s), trip| {
        (d + trip.distance_km, s + trip.credited_co2_kg())
    });

    TripSummary {
        total_trips: trips.len() as u32,
        total_distance_km: round_dp(distance, 2),
        total_co2_saved_kg: round_dp(saved, 2),
    }
}

/// Sum credited CO2 per calendar month (UTC), oldest month first.
pub fn monthly_series(trips: &[TripRecord]) -> Vec<MonthlyPoint> {
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
    for trip in trips {
        *by_month.entry(month_key(trip)).or_insert(0.0) += trip.credited_co2_kg();
    }

    by_month
        .into_iter()
        .map(|(period, saved)| MonthlyPoint {
            period,
            co2_saved_kg: round_dp(saved, 3),
        })
        .collect()
}

/// Consecutive days (UTC) with at least one trip, counting back from `today`.
///
/// A streak survives until the end of the day after the last trip, so a user
/// who travelled yesterday but not yet today still has an active streak.
pub fn current_streak(trips: &[TripRecord], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = trips.iter().map(|t| t.created_at.date_naive()).collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.checked_sub_days(Days::new(1)) {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.checked_sub_days(Days::new(1)) {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

/// Extract "YYYY-MM" from a trip's creation time.
fn month_key(trip: &TripRecord) -> String {
    trip.created_at.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TravelMode;
    use chrono::{TimeZone, Utc};

    fn make_trip(id: u32, date: &str, distance: f64, saved: f64) -> TripRecord {
        let created_at = chrono::DateTime::parse_from_rfc3339(date)
            .unwrap()
            .with_timezone(&Utc);
        TripRecord {
            id: format!("trip-{}", id),
            user_id: "user-1".to_string(),
            origin: None,
            destination: None,
            mode: TravelMode::Bike,
            baseline_mode: TravelMode::Car,
            distance_km: distance,
            duration_min: None,
            co2_kg: 0.0,
            co2_saved_kg: saved,
            co2_credited_kg: Some(saved.max(0.0)),
            points_awarded: 0,
            created_at,
        }
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(
            summary,
            TripSummary {
                total_trips: 0,
                total_distance_km: 0.0,
                total_co2_saved_kg: 0.0,
            }
        );
    }

    #[test]
    fn test_summarize_rounds_to_two_places() {
        let trips = vec![
            make_trip(1, "2024-01-15T10:00:00Z", 10.004, 1.921),
            make_trip(2, "2024-01-16T10:00:00Z", 5.0, 0.96),
            make_trip(3, "2024-02-01T10:00:00Z", 2.5, 0.48),
        ];

        let summary = summarize(&trips);

        assert_eq!(summary.total_trips, 3);
        assert_eq!(summary.total_distance_km, 17.5);
        assert_eq!(summary.total_co2_saved_kg, 3.36);
    }

    #[test]
    fn test_monthly_series_groups_and_orders_ascending() {
        let trips = vec![
            make_trip(1, "2024-03-02T10:00:00Z", 1.0, 0.5),
            make_trip(2, "2023-12-31T23:00:00Z", 1.0, 2.0),
            make_trip(3, "2024-03-20T10:00:00Z", 1.0, 0.25),
            make_trip(4, "2024-01-05T10:00:00Z", 1.0, 1.0),
        ];

        let series = monthly_series(&trips);

        let periods: Vec<&str> = series.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["2023-12", "2024-01", "2024-03"]);
        assert_eq!(series[2].co2_saved_kg, 0.75);
    }

    #[test]
    fn test_monthly_series_keeps_years_apart() {
        let trips = vec![
            make_trip(1, "2023-05-10T10:00:00Z", 1.0, 1.0),
            make_trip(2, "2024-05-10T10:00:00Z", 1.0, 3.0),
        ];

        let series = monthly_series(&trips);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].period, "2023-05");
        assert_eq!(series[1].period, "2024-05");
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let today = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap().date_naive();
        let trips = vec![
            make_trip(1, "2024-06-10T08:00:00Z", 1.0, 0.1),
            make_trip(2, "2024-06-10T18:00:00Z", 1.0, 0.1),
            make_trip(3, "2024-06-09T08:00:00Z", 1.0, 0.1),
            make_trip(4, "2024-06-08T08:00:00Z", 1.0, 0.1),
            make_trip(5, "2024-06-05T08:00:00Z", 1.0, 0.1),
        ];

        assert_eq!(current_streak(&trips, today), 3);
    }

    #[test]
    fn test_streak_survives_until_end_of_next_day() {
        let today = Utc.with_ymd_and_hms(2024, 6, 11, 0, 0, 0).unwrap().date_naive();
        let trips = vec![
            make_trip(1, "2024-06-10T08:00:00Z", 1.0, 0.1),
            make_trip(2, "2024-06-09T08:00:00Z", 1.0, 0.1),
        ];

        assert_eq!(current_streak(&trips, today), 2);
    }

    #[test]
    fn test_streak_broken() {
        let today = Utc.with_ymd_and_hms(2024, 6, 12, 0, 0, 0).unwrap().date_naive();
        let trips = vec![make_trip(1, "2024-06-10T08:00:00Z", 1.0, 0.1)];

        assert_eq!(current_streak(&trips, today), 0);
        assert_eq!(current_streak(&[], today), 0);
    }

    #[test]
    fn test_reducers_use_credited_savings() {
        let mut dirtier = make_trip(2, "2024-04-02T10:00:00Z", 100.0, -10.3);
        dirtier.co2_credited_kg = Some(0.0);
        let trips = vec![make_trip(1, "2024-04-01T10:00:00Z", 5.0, 0.96), dirtier];

        assert_eq!(summarize(&trips).total_co2_saved_kg, 0.96);
        assert_eq!(monthly_series(&trips)[0].co2_saved_kg, 0.96);
    }

    #[test]
    fn test_missing_credited_amount_clamps_negative() {
        let mut legacy = make_trip(1, "2024-04-01T10:00:00Z", 10.0, -1.5);
        legacy.co2_credited_kg = None;
        assert_eq!(legacy.credited_co2_kg(), 0.0);

        legacy.co2_saved_kg = 1.5;
        assert_eq!(legacy.credited_co2_kg(), 1.5);
    }
}
