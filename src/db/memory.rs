// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process storage backed by `DashMap`.
//!
//! Each user's trips and eco totals live in one ledger entry, so a trip and
//! its award are written under a single entry lock and readers never see one
//! without the other.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::db::Credential;
use crate::models::{TripRecord, User, UserEcoStats};

/// Everything stored for one user besides the profile.
#[derive(Clone, Default)]
struct UserLedger {
    /// None until the first award
    stats: Option<UserEcoStats>,
    trips: Vec<TripRecord>,
}

impl UserLedger {
    fn apply(&mut self, user_id: &str, points_delta: i64, co2_delta_kg: f64) -> UserEcoStats {
        let stats = self.stats.get_or_insert_with(|| UserEcoStats {
            user_id: user_id.to_string(),
            ..UserEcoStats::default()
        });
        stats.eco_points = stats.eco_points.saturating_add(points_delta);
        stats.total_co2_saved_kg += co2_delta_kg;
        stats.clone()
    }
}

#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<String, User>>,
    /// Keyed by normalized email
    credentials: Arc<DashMap<String, Credential>>,
    ledgers: Arc<DashMap<String, UserLedger>>,
}

impl MemoryDb {
    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|u| u.clone())
    }

    pub fn upsert_user(&self, user: &User) {
        self.users.insert(user.user_id.clone(), user.clone());
    }

    pub fn get_users(&self, user_ids: &[String]) -> Vec<User> {
        user_ids.iter().filter_map(|id| self.get_user(id)).collect()
    }

    /// Insert a credential unless its email is taken. Returns false if taken.
    pub fn create_credential(&self, credential: &Credential) -> bool {
        match self.credentials.entry(credential.email.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(credential.clone());
                true
            }
        }
    }

    pub fn get_credential(&self, email: &str) -> Option<Credential> {
        self.credentials.get(email).map(|c| c.clone())
    }

    pub fn record_trip(&self, trip: &TripRecord, points_delta: i64, co2_delta_kg: f64) -> UserEcoStats {
        let mut ledger = self.ledgers.entry(trip.user_id.clone()).or_default();
        ledger.trips.push(trip.clone());
        ledger.apply(&trip.user_id, points_delta, co2_delta_kg)
    }

    pub fn get_trips_for_user(&self, user_id: &str) -> Vec<TripRecord> {
        self.ledgers
            .get(user_id)
            .map(|l| l.trips.clone())
            .unwrap_or_default()
    }

    pub fn upsert_increment(&self, user_id: &str, points_delta: i64, co2_delta_kg: f64) -> UserEcoStats {
        self.ledgers
            .entry(user_id.to_string())
            .or_default()
            .apply(user_id, points_delta, co2_delta_kg)
    }

    pub fn get_user_stats(&self, user_id: &str) -> Option<UserEcoStats> {
        self.ledgers.get(user_id).and_then(|l| l.stats.clone())
    }

    /// Stats and trips read under one lock.
    pub fn get_activity(&self, user_id: &str) -> (Option<UserEcoStats>, Vec<TripRecord>) {
        self.ledgers
            .get(user_id)
            .map(|l| (l.stats.clone(), l.trips.clone()))
            .unwrap_or_default()
    }

    pub fn top_stats(&self, n: usize) -> Vec<UserEcoStats> {
        let mut all: Vec<UserEcoStats> = self
            .ledgers
            .iter()
            .filter_map(|l| l.value().stats.clone())
            .collect();
        all.sort_by(crate::services::leaderboard::compare_standing);
        all.truncate(n);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TravelMode;

    fn trip(user_id: &str, id: usize, points: i64) -> TripRecord {
        TripRecord {
            id: format!("t{id}"),
            user_id: user_id.to_string(),
            origin: None,
            destination: None,
            mode: TravelMode::Bike,
            baseline_mode: TravelMode::Car,
            distance_km: 1.0,
            duration_min: None,
            co2_kg: 0.0,
            co2_saved_kg: 0.192,
            co2_credited_kg: Some(0.192),
            points_awarded: points,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_upsert_increment_creates_then_accumulates() {
        let db = MemoryDb::default();
        assert!(db.get_user_stats("u1").is_none());

        let first = db.upsert_increment("u1", 10, 1.0);
        assert_eq!(first.user_id, "u1");
        assert_eq!(first.eco_points, 10);

        let second = db.upsert_increment("u1", 5, 0.5);
        assert_eq!(second.eco_points, 15);
        assert_eq!(second.total_co2_saved_kg, 1.5);
    }

    #[test]
    fn test_upsert_increment_saturates_instead_of_overflowing() {
        let db = MemoryDb::default();
        db.upsert_increment("whale", i64::MAX - 1, 0.0);
        let stats = db.upsert_increment("whale", 10, 0.0);
        assert_eq!(stats.eco_points, i64::MAX);

        db.upsert_increment("debtor", i64::MIN + 1, 0.0);
        let stats = db.upsert_increment("debtor", -10, 0.0);
        assert_eq!(stats.eco_points, i64::MIN);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let db = MemoryDb::default();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = db.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        db.upsert_increment("shared", 3, 0.5);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let stats = db.get_user_stats("shared").unwrap();
        assert_eq!(stats.eco_points, 8 * 250 * 3);
        assert_eq!(stats.total_co2_saved_kg, 8.0 * 250.0 * 0.5);
    }

    #[test]
    fn test_trip_and_award_are_seen_together() {
        let db = MemoryDb::default();
        let writers: Vec<_> = (0..4)
            .map(|w| {
                let db = db.clone();
                std::thread::spawn(move || {
                    for i in 0..200 {
                        db.record_trip(&trip("rider", w * 1000 + i, 2), 2, 0.192);
                    }
                })
            })
            .collect();

        // Every snapshot must show points equal to the trips it contains.
        while writers.iter().any(|w| !w.is_finished()) {
            let (stats, trips) = db.get_activity("rider");
            let listed: i64 = trips.iter().map(|t| t.points_awarded).sum();
            assert_eq!(stats.map(|s| s.eco_points).unwrap_or(0), listed);
        }
        for w in writers {
            w.join().unwrap();
        }

        let (stats, trips) = db.get_activity("rider");
        assert_eq!(trips.len(), 800);
        assert_eq!(stats.unwrap().eco_points, 1600);
    }

    #[test]
    fn test_credential_email_is_unique() {
        let db = MemoryDb::default();
        let credential = Credential {
            email: "a@example.com".to_string(),
            user_id: "u1".to_string(),
            password_hash: "hash".to_string(),
        };
        assert!(db.create_credential(&credential));

        let duplicate = Credential {
            user_id: "u2".to_string(),
            ..credential
        };
        assert!(!db.create_credential(&duplicate));
        assert_eq!(db.get_credential("a@example.com").unwrap().user_id, "u1");
    }

    #[test]
    fn test_top_stats_orders_and_caps() {
        let db = MemoryDb::default();
        db.upsert_increment("a", 10, 1.0);
        db.upsert_increment("b", 30, 3.0);
        db.upsert_increment("c", 20, 2.0);

        let top: Vec<String> = db.top_stats(2).into_iter().map(|s| s.user_id).collect();
        assert_eq!(top, vec!["b", "c"]);
    }
}
