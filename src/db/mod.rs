// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Database`] is the persistence collaborator the handlers talk to. It
//! dispatches to Firestore in production and to an in-process store for
//! local development and tests.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
pub use crate::models::Credential;
use crate::models::{TripRecord, User, UserEcoStats};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Password logins (keyed by normalized email)
    pub const CREDENTIALS: &str = "credentials";
    pub const TRIPS: &str = "trips";
    /// Per-user eco totals (keyed by user_id)
    pub const USER_ECO_STATS: &str = "user_eco_stats";
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

/// Storage handle shared by all request handlers.
#[derive(Clone)]
pub struct Database {
    backend: Option<Backend>,
}

impl Database {
    /// Connect to Firestore.
    pub async fn firestore(project_id: &str) -> Result<Self, AppError> {
        Ok(Self {
            backend: Some(Backend::Firestore(FirestoreDb::new(project_id).await?)),
        })
    }

    /// Process-local storage.
    pub fn in_memory() -> Self {
        Self {
            backend: Some(Backend::Memory(MemoryDb::default())),
        }
    }

    /// Offline handle for testing failure paths.
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { backend: None }
    }

    fn backend(&self) -> Result<&Backend, AppError> {
        self.backend
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Users ───────────────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match self.backend()? {
            Backend::Firestore(db) => db.get_user(user_id).await,
            Backend::Memory(db) => Ok(db.get_user(user_id)),
        }
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        match self.backend()? {
            Backend::Firestore(db) => db.upsert_user(user).await,
            Backend::Memory(db) => {
                db.upsert_user(user);
                Ok(())
            }
        }
    }

    /// Look up several users; IDs with no profile are skipped.
    pub async fn get_users(&self, user_ids: &[String]) -> Result<Vec<User>, AppError> {
        match self.backend()? {
            Backend::Firestore(db) => db.get_users(user_ids).await,
            Backend::Memory(db) => Ok(db.get_users(user_ids)),
        }
    }

    // ─── Credentials ─────────────────────────────────────────────

    /// Store a credential unless its email is already registered.
    ///
    /// Returns false when the email is taken.
    pub async fn create_credential(&self, credential: &Credential) -> Result<bool, AppError> {
        match self.backend()? {
            Backend::Firestore(db) => db.create_credential(credential).await,
            Backend::Memory(db) => Ok(db.create_credential(credential)),
        }
    }

    /// Look up a credential by normalized email.
    pub async fn get_credential(&self, email: &str) -> Result<Option<Credential>, AppError> {
        match self.backend()? {
            Backend::Firestore(db) => db.get_credential(email).await,
            Backend::Memory(db) => Ok(db.get_credential(email)),
        }
    }

    // ─── Trips ───────────────────────────────────────────────────

    /// Store a new trip and apply its eco award as one unit.
    ///
    /// Returns the user's totals after the award.
    pub async fn record_trip(
        &self,
        trip: &TripRecord,
        points_delta: i64,
        co2_delta_kg: f64,
    ) -> Result<UserEcoStats, AppError> {
        match self.backend()? {
            Backend::Firestore(db) => db.record_trip_atomic(trip, points_delta, co2_delta_kg).await,
            Backend::Memory(db) => Ok(db.record_trip(trip, points_delta, co2_delta_kg)),
        }
    }

    /// All trips for a user, newest first.
    pub async fn get_trips_for_user(&self, user_id: &str) -> Result<Vec<TripRecord>, AppError> {
        let mut trips = match self.backend()? {
            Backend::Firestore(db) => db.get_trips_for_user(user_id).await?,
            Backend::Memory(db) => db.get_trips_for_user(user_id),
        };
        sort_newest_first(&mut trips);
        Ok(trips)
    }

    /// A user's totals together with their trips (newest first).
    ///
    /// The in-memory store reads both under one lock. Firestore issues the
    /// two reads concurrently, so a trip committed between them can appear
    /// in one and not the other.
    pub async fn get_user_activity(
        &self,
        user_id: &str,
    ) -> Result<(Option<UserEcoStats>, Vec<TripRecord>), AppError> {
        let (stats, mut trips) = match self.backend()? {
            Backend::Firestore(db) => tokio::try_join!(
                db.get_user_stats(user_id),
                db.get_trips_for_user(user_id)
            )?,
            Backend::Memory(db) => db.get_activity(user_id),
        };
        sort_newest_first(&mut trips);
        Ok((stats, trips))
    }

    // ─── Eco Stats ───────────────────────────────────────────────

    /// Create-or-increment a user's eco totals in one atomic step.
    ///
    /// Returns the totals after the increment.
    pub async fn upsert_increment(
        &self,
        user_id: &str,
        points_delta: i64,
        co2_delta_kg: f64,
    ) -> Result<UserEcoStats, AppError> {
        match self.backend()? {
            Backend::Firestore(db) => db.upsert_increment(user_id, points_delta, co2_delta_kg).await,
            Backend::Memory(db) => Ok(db.upsert_increment(user_id, points_delta, co2_delta_kg)),
        }
    }

    pub async fn get_user_stats(&self, user_id: &str) -> Result<Option<UserEcoStats>, AppError> {
        match self.backend()? {
            Backend::Firestore(db) => db.get_user_stats(user_id).await,
            Backend::Memory(db) => Ok(db.get_user_stats(user_id)),
        }
    }

    /// Highest `n` stats rows by eco points (ordering finalized by the ranker).
    pub async fn top_stats(&self, n: usize) -> Result<Vec<UserEcoStats>, AppError> {
        match self.backend()? {
            Backend::Firestore(db) => db.top_stats(n).await,
            Backend::Memory(db) => Ok(db.top_stats(n)),
        }
    }
}

fn sort_newest_first(trips: &mut [TripRecord]) {
    trips.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
