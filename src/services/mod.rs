// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod eco_points;
pub mod emissions;
pub mod leaderboard;
pub mod password;
pub mod routing;
pub mod trips;

pub use eco_points::{Badge, EcoAward, EcoError, EcoPolicy, NegativeSavings};
pub use emissions::{EmissionFactors, EmissionsCalculator, Greener, RouteComparison};
pub use routing::{RouteLeg, RoutingClient};
pub use trips::{NewTrip, TripService};
