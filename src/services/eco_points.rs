// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Eco-points policy: converts CO2 savings into points and badges.
//!
//! The policy only computes the award. Applying it is a single
//! `Database::upsert_increment` call so concurrent awards for the same user
//! never lose updates.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::rounding::round_dp;

/// Points awarded per kg of CO2 saved.
pub const POINTS_PER_KG_CO2: f64 = 10.0;

/// Largest CO2 amount, in either direction, a single award may carry.
///
/// Keeps points well inside `i64` and the running totals meaningful.
pub const MAX_CO2_PER_AWARD_KG: f64 = 100_000.0;

/// Negative savings (choosing a dirtier mode than the baseline) earn nothing
/// and do not reduce the running CO2 total.
pub const DEFAULT_NEGATIVE_SAVINGS: NegativeSavings = NegativeSavings::ClampToZero;

/// What to do with a negative CO2 saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegativeSavings {
    /// Award zero points and record zero CO2 saved.
    ClampToZero,
    /// Award negative points and subtract from the CO2 total.
    Penalize,
}

/// Eco-points policy errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EcoError {
    #[error("co2Saved must be a finite number")]
    NonFiniteSavings,
    #[error("co2Saved must be between -{max} and {max} kg", max = MAX_CO2_PER_AWARD_KG)]
    SavingsOutOfRange,
}

/// The increment to apply to a user's running totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EcoAward {
    pub points: i64,
    pub co2_saved_kg: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct EcoPolicy {
    pub points_per_kg: f64,
    pub negative_savings: NegativeSavings,
}

impl Default for EcoPolicy {
    fn default() -> Self {
        Self {
            points_per_kg: POINTS_PER_KG_CO2,
            negative_savings: DEFAULT_NEGATIVE_SAVINGS,
        }
    }
}

impl EcoPolicy {
    /// Points for a CO2 amount, rounded to the nearest integer.
    pub fn points_for(&self, co2_saved_kg: f64) -> i64 {
        (co2_saved_kg * self.points_per_kg).round() as i64
    }

    /// Validate a saving and turn it into an award.
    ///
    /// Rejects non-finite or out-of-range input before anything touches
    /// storage.
    pub fn award(&self, co2_saved_kg: f64) -> Result<EcoAward, EcoError> {
        if !co2_saved_kg.is_finite() {
            return Err(EcoError::NonFiniteSavings);
        }
        if co2_saved_kg.abs() > MAX_CO2_PER_AWARD_KG {
            return Err(EcoError::SavingsOutOfRange);
        }

        let applied = match self.negative_savings {
            NegativeSavings::ClampToZero => co2_saved_kg.max(0.0),
            NegativeSavings::Penalize => co2_saved_kg,
        };

        Ok(EcoAward {
            points: self.points_for(applied),
            co2_saved_kg: round_dp(applied, 3),
        })
    }
}

/// Badge tier earned from accumulated eco points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Badge {
    BeginnerEcoWalker,
    EcoRider,
    GreenGuardian,
    EarthSaverLegend,
}

impl Badge {
    pub fn for_points(points: i64) -> Self {
        match points {
            p if p >= 500 => Badge::EarthSaverLegend,
            p if p >= 200 => Badge::GreenGuardian,
            p if p >= 50 => Badge::EcoRider,
            _ => Badge::BeginnerEcoWalker,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Badge::BeginnerEcoWalker => "Beginner Eco Walker",
            Badge::EcoRider => "Eco Rider",
            Badge::GreenGuardian => "Green Guardian",
            Badge::EarthSaverLegend => "Earth Saver Legend",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Badge::BeginnerEcoWalker => "🌱",
            Badge::EcoRider => "🚲",
            Badge::GreenGuardian => "🌍",
            Badge::EarthSaverLegend => "🦅",
        }
    }
}
