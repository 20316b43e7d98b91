// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CO2 emission factors and trip emission calculations.
//!
//! Every calculation here is total: missing, negative or non-finite
//! distances are treated as zero rather than rejected, so routing-provider
//! output can be fed in without pre-validation.

use serde::Serialize;
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::TravelMode;
use crate::rounding::{non_negative_or_zero, round_dp};

/// Decimal places kept on every CO2 mass the calculator returns.
const CO2_DECIMALS: i32 = 3;

/// Emission factors in kg CO2 per km, keyed by mode.
#[derive(Debug, Clone)]
pub struct EmissionFactors {
    factors: HashMap<TravelMode, f64>,
    /// Used for modes missing from the table and for unrecognized mode names.
    fallback_kg_per_km: f64,
}

impl EmissionFactors {
    /// Build a table. Negative or non-finite factors are stored as zero.
    pub fn new(
        factors: impl IntoIterator<Item = (TravelMode, f64)>,
        fallback_kg_per_km: f64,
    ) -> Self {
        Self {
            factors: factors
                .into_iter()
                .map(|(mode, f)| (mode, non_negative_or_zero(Some(f))))
                .collect(),
            fallback_kg_per_km: non_negative_or_zero(Some(fallback_kg_per_km)),
        }
    }

    /// Per-trip factors used for logged trips and eco points.
    pub fn standard() -> Self {
        const CAR: f64 = 0.192;
        Self::new(
            [
                (TravelMode::Car, CAR),
                (TravelMode::Bus, 0.089),
                (TravelMode::Train, 0.041),
                (TravelMode::Bike, 0.0),
                (TravelMode::Walk, 0.0),
                (TravelMode::Ev, 0.075),
                (TravelMode::Scooter, 0.06),
                (TravelMode::Motorcycle, 0.11),
            ],
            CAR,
        )
    }

    /// Factors used when comparing two routed itineraries.
    pub fn comparison() -> Self {
        const CAR: f64 = 0.21;
        Self::new(
            [
                (TravelMode::Car, CAR),
                (TravelMode::Motorcycle, 0.11),
                (TravelMode::Bus, 0.09),
                (TravelMode::Train, 0.04),
                (TravelMode::Bike, 0.0),
                (TravelMode::Walk, 0.0),
            ],
            CAR,
        )
    }

    /// kg CO2 per km for a mode, falling back to the default factor.
    pub fn factor_for(&self, mode: TravelMode) -> f64 {
        self.factors
            .get(&mode)
            .copied()
            .unwrap_or(self.fallback_kg_per_km)
    }

    /// Like [`factor_for`](Self::factor_for), for raw mode names. Unknown names
    /// get the fallback factor, never zero.
    pub fn factor_for_name(&self, raw: &str) -> f64 {
        TravelMode::parse(raw)
            .map(|mode| self.factor_for(mode))
            .unwrap_or(self.fallback_kg_per_km)
    }

    pub fn fallback_kg_per_km(&self) -> f64 {
        self.fallback_kg_per_km
    }
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self::standard()
    }
}

/// Which side of a comparison emits less.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Greener {
    A,
    B,
    /// Both sides emit the same amount.
    Tie,
}

/// One side of a route comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ComparedLeg {
    pub mode: TravelMode,
    pub distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    pub co2_kg: f64,
}

/// Result of comparing two itineraries for the same origin/destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RouteComparison {
    pub a: ComparedLeg,
    pub b: ComparedLeg,
    /// Higher emissions minus lower emissions, never negative.
    pub co2_saved_kg: f64,
    pub greener: Greener,
}

impl RouteComparison {
    /// The leg with lower emissions (`a` on a tie).
    pub fn greener_leg(&self) -> &ComparedLeg {
        match self.greener {
            Greener::B => &self.b,
            Greener::A | Greener::Tie => &self.a,
        }
    }
}

/// Converts distances into CO2 masses using an injected factor table.
#[derive(Debug, Clone, Default)]
pub struct EmissionsCalculator {
    factors: EmissionFactors,
}

impl EmissionsCalculator {
    pub fn new(factors: EmissionFactors) -> Self {
        Self { factors }
    }

    pub fn factors(&self) -> &EmissionFactors {
        &self.factors
    }

    /// kg CO2 emitted travelling `distance_km` by `mode`, rounded to 3 places.
    pub fn emissions_for(&self, mode: TravelMode, distance_km: Option<f64>) -> f64 {
        let distance = non_negative_or_zero(distance_km);
        round_dp(self.factors.factor_for(mode) * distance, CO2_DECIMALS)
    }

    /// Emissions for a raw mode name (unknown names use the fallback factor).
    pub fn emissions_for_name(&self, mode: &str, distance_km: Option<f64>) -> f64 {
        let distance = non_negative_or_zero(distance_km);
        round_dp(self.factors.factor_for_name(mode) * distance, CO2_DECIMALS)
    }

    /// CO2 avoided by taking `candidate` instead of `baseline` over the same
    /// distance. Negative when the candidate is dirtier; clamping is the
    /// eco-points policy's decision, not the calculator's.
    pub fn savings_for(
        &self,
        candidate: TravelMode,
        baseline: TravelMode,
        distance_km: Option<f64>,
    ) -> f64 {
        let baseline_co2 = self.emissions_for(baseline, distance_km);
        let candidate_co2 = self.emissions_for(candidate, distance_km);
        round_dp(baseline_co2 - candidate_co2, CO2_DECIMALS)
    }

    /// Compare two itineraries that may have different distances (e.g. from
    /// different routing providers).
    pub fn compare_routes(
        &self,
        mode_a: TravelMode,
        distance_a_km: Option<f64>,
        mode_b: TravelMode,
        distance_b_km: Option<f64>,
    ) -> RouteComparison {
        let a = ComparedLeg {
            mode: mode_a,
            distance_km: non_negative_or_zero(distance_a_km),
            duration_min: None,
            co2_kg: self.emissions_for(mode_a, distance_a_km),
        };
        let b = ComparedLeg {
            mode: mode_b,
            distance_km: non_negative_or_zero(distance_b_km),
            duration_min: None,
            co2_kg: self.emissions_for(mode_b, distance_b_km),
        };

        let greener = if a.co2_kg < b.co2_kg {
            Greener::A
        } else if b.co2_kg < a.co2_kg {
            Greener::B
        } else {
            Greener::Tie
        };
        let co2_saved_kg = round_dp(a.co2_kg.max(b.co2_kg) - a.co2_kg.min(b.co2_kg), CO2_DECIMALS);

        RouteComparison {
            a,
            b,
            co2_saved_kg,
            greener,
        }
    }
}
