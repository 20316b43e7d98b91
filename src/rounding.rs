// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for display rounding.

/// Round to `places` decimal places, halves away from zero.
pub fn round_dp(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Treat untrusted quantities (distance, duration) as zero when they are
/// missing, negative, or not finite.
pub fn non_negative_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
