// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard ranking over per-user eco totals.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{User, UserEcoStats};
use crate::rounding::round_dp;
use crate::services::eco_points::Badge;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;
pub const MAX_LEADERBOARD_SIZE: usize = 100;

/// One ranked row, denormalized with display identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: u32,
    pub user_id: String,
    /// None when the user has no profile in the directory
    pub name: Option<String>,
    pub email: Option<String>,
    pub eco_points: i64,
    pub total_co2_saved_kg: f64,
    pub badge: Badge,
}

/// Leaderboard ordering: eco points desc, then CO2 saved desc, then user ID asc.
pub fn compare_standing(a: &UserEcoStats, b: &UserEcoStats) -> Ordering {
    b.eco_points
        .cmp(&a.eco_points)
        .then_with(|| b.total_co2_saved_kg.total_cmp(&a.total_co2_saved_kg))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Sort, cap at `top_n`, and join display identity from `directory`.
///
/// The ordering is total, so identical input always yields identical output.
pub fn rank(
    mut stats: Vec<UserEcoStats>,
    directory: &HashMap<String, User>,
    top_n: usize,
) -> Vec<LeaderboardEntry> {
    stats.sort_by(compare_standing);
    stats.truncate(top_n);

    stats
        .into_iter()
        .enumerate()
        .map(|(idx, s)| {
            let user = directory.get(&s.user_id);
            LeaderboardEntry {
                rank: idx as u32 + 1,
                name: user.map(|u| u.name.clone()),
                email: user.and_then(|u| u.email.clone()),
                eco_points: s.eco_points,
                total_co2_saved_kg: round_dp(s.total_co2_saved_kg, 3),
                badge: Badge::for_points(s.eco_points),
                user_id: s.user_id,
            }
        })
        .collect()
}

/// Clamp a requested leaderboard size into `1..=MAX_LEADERBOARD_SIZE`.
pub fn leaderboard_size(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
        .clamp(1, MAX_LEADERBOARD_SIZE)
}
