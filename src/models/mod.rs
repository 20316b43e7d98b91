// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod credential;
pub mod mode;
pub mod stats;
pub mod trip;
pub mod user;

pub use credential::Credential;
pub use mode::{TravelMode, UnknownMode};
pub use stats::{MonthlyPoint, TripSummary, UserEcoStats};
pub use trip::TripRecord;
pub use user::User;
