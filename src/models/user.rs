// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
///
/// The profile is the identity directory used to denormalize leaderboard
/// entries; it is never written by the eco-points flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (also used as document ID, matches the JWT subject)
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// Saved origin/destination pairs ("Home → Office")
    #[serde(default)]
    pub favorite_routes: Vec<String>,
    /// When the profile was created (ISO 8601)
    pub created_at: String,
    /// Last profile update (ISO 8601)
    pub updated_at: String,
}
