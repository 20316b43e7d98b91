// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (identity directory)
//! - Credentials (password logins)
//! - Trips (immutable trip log)
//! - User eco stats (running points and CO2 totals)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Credential, TripRecord, User, UserEcoStats};
use firestore::{path, paths};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.user_id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Fetch several user profiles concurrently, skipping unknown IDs.
    pub async fn get_users(&self, user_ids: &[String]) -> Result<Vec<User>, AppError> {
        let results = stream::iter(user_ids.to_vec())
            .map(|user_id| async move { self.get_user(&user_id).await })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<User>, AppError>>>()
            .await;

        let mut users = Vec::with_capacity(results.len());
        for result in results {
            if let Some(user) = result? {
                users.push(user);
            }
        }
        Ok(users)
    }

    // ─── Credential Operations ───────────────────────────────────

    /// Create a credential document; false if the email already has one.
    pub async fn create_credential(&self, credential: &Credential) -> Result<bool, AppError> {
        let result: Result<Credential, firestore::errors::FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collections::CREDENTIALS)
            .document_id(&credential.email)
            .object(credential)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Get a credential by normalized email.
    pub async fn get_credential(&self, email: &str) -> Result<Option<Credential>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::CREDENTIALS)
            .obj()
            .one(email)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Trip Operations ─────────────────────────────────────────

    /// Get all trips for a user (unordered).
    pub async fn get_trips_for_user(&self, user_id: &str) -> Result<Vec<TripRecord>, AppError> {
        let user_id = user_id.to_string();
        self.client
            .fluent()
            .select()
            .from(collections::TRIPS)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Eco Stats Operations ──────────────────────────────

    /// Get a user's eco stats document.
    pub async fn get_user_stats(&self, user_id: &str) -> Result<Option<UserEcoStats>, AppError> {
        let stats: Option<UserEcoStats> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::USER_ECO_STATS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(stats.map(|mut s| {
            s.user_id = user_id.to_string();
            s
        }))
    }

    /// Atomically create-or-increment a user's eco totals.
    ///
    /// The increment is a server-side field transform, so Firestore applies
    /// concurrent awards one after another instead of letting a stale read
    /// overwrite a newer total. A missing document is created by the same write.
    pub async fn upsert_increment(
        &self,
        user_id: &str,
        points_delta: i64,
        co2_delta_kg: f64,
    ) -> Result<UserEcoStats, AppError> {
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.add_increment_to_transaction(&mut transaction, user_id, points_delta, co2_delta_kg)?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::debug!(user_id, points_delta, co2_delta_kg, "Eco stats incremented");

        self.stats_after_increment(user_id).await
    }

    /// Store a trip and apply its award in one transaction.
    ///
    /// Either both the trip document and the stats increment are committed,
    /// or neither is.
    pub async fn record_trip_atomic(
        &self,
        trip: &TripRecord,
        points_delta: i64,
        co2_delta_kg: f64,
    ) -> Result<UserEcoStats, AppError> {
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.client
            .fluent()
            .update()
            .in_col(collections::TRIPS)
            .document_id(&trip.id)
            .object(trip)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add trip to transaction: {}", e)))?;

        self.add_increment_to_transaction(
            &mut transaction,
            &trip.user_id,
            points_delta,
            co2_delta_kg,
        )?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            user_id = %trip.user_id,
            trip_id = %trip.id,
            points_delta,
            "Trip recorded atomically"
        );

        self.stats_after_increment(&trip.user_id).await
    }

    /// Queue a create-or-increment of the user's stats document.
    fn add_increment_to_transaction(
        &self,
        transaction: &mut firestore::FirestoreTransaction<'_>,
        user_id: &str,
        points_delta: i64,
        co2_delta_kg: f64,
    ) -> Result<(), AppError> {
        let seed = UserEcoStats {
            user_id: user_id.to_string(),
            ..UserEcoStats::default()
        };

        // Only `user_id` is written from the object; the totals come from the transforms.
        self.client
            .fluent()
            .update()
            .fields(paths!(UserEcoStats::{user_id}))
            .in_col(collections::USER_ECO_STATS)
            .document_id(user_id)
            .object(&seed)
            .transforms(|t| {
                t.fields([
                    t.field(path!(UserEcoStats::eco_points))
                        .increment(points_delta),
                    t.field(path!(UserEcoStats::total_co2_saved_kg))
                        .increment(co2_delta_kg),
                ])
            })
            .add_to_transaction(transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add increment to transaction: {}", e))
            })?;
        Ok(())
    }

    async fn stats_after_increment(&self, user_id: &str) -> Result<UserEcoStats, AppError> {
        self.get_user_stats(user_id).await?.ok_or_else(|| {
            AppError::Database(format!("Eco stats for {} missing after increment", user_id))
        })
    }

    /// Highest `n` stats documents by eco points.
    ///
    /// The ordering mirrors the leaderboard so ties at the cutoff are decided
    /// by CO2 saved and then document ID.
    pub async fn top_stats(&self, n: usize) -> Result<Vec<UserEcoStats>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::USER_ECO_STATS)
            .order_by([
                ("eco_points", firestore::FirestoreQueryDirection::Descending),
                (
                    "total_co2_saved_kg",
                    firestore::FirestoreQueryDirection::Descending,
                ),
                ("__name__", firestore::FirestoreQueryDirection::Ascending),
            ])
            .limit(n as u32)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
