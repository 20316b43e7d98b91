// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Travel mode vocabulary.
//!
//! Clients and routing providers use several spellings for the same mode
//! ("bicycle", "cycling-regular", "bike"). Everything is folded into
//! [`TravelMode`] at the HTTP boundary so the rest of the crate only ever
//! sees one enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Canonical travel mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TravelMode {
    Car,
    Bus,
    Train,
    Bike,
    Walk,
    Ev,
    Scooter,
    Motorcycle,
}

/// Returned when a mode string matches no known mode or alias.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown travel mode: {0}")]
pub struct UnknownMode(pub String);

impl TravelMode {
    pub const ALL: [TravelMode; 8] = [
        TravelMode::Car,
        TravelMode::Bus,
        TravelMode::Train,
        TravelMode::Bike,
        TravelMode::Walk,
        TravelMode::Ev,
        TravelMode::Scooter,
        TravelMode::Motorcycle,
    ];

    /// Resolve a mode name or alias (case-insensitive).
    pub fn parse(raw: &str) -> Result<Self, UnknownMode> {
        let normalized = raw.trim().to_ascii_lowercase();
        let mode = match normalized.as_str() {
            "car" | "driving" | "driving-car" | "auto" => TravelMode::Car,
            "bus" | "transit" | "driving-hgv" => TravelMode::Bus,
            "train" | "rail" | "metro" => TravelMode::Train,
            "bike" | "bicycle" | "bicycling" | "cycling" | "cycling-regular" => TravelMode::Bike,
            "walk" | "walking" | "foot" | "foot-walking" => TravelMode::Walk,
            "ev" | "electric" | "electric-car" => TravelMode::Ev,
            "scooter" => TravelMode::Scooter,
            "motorcycle" | "motorbike" => TravelMode::Motorcycle,
            _ => return Err(UnknownMode(raw.to_string())),
        };
        Ok(mode)
    }

    /// Canonical lower-case name (matches the serialized form).
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Car => "car",
            TravelMode::Bus => "bus",
            TravelMode::Train => "train",
            TravelMode::Bike => "bike",
            TravelMode::Walk => "walk",
            TravelMode::Ev => "ev",
            TravelMode::Scooter => "scooter",
            TravelMode::Motorcycle => "motorcycle",
        }
    }

    /// OpenRouteService directions profile, if ORS has one for this mode.
    pub fn ors_profile(self) -> Option<&'static str> {
        match self {
            TravelMode::Car => Some("driving-car"),
            TravelMode::Bus => Some("driving-hgv"),
            TravelMode::Bike => Some("cycling-regular"),
            TravelMode::Walk => Some("foot-walking"),
            _ => None,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TravelMode::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases_fold_to_one_mode() {
        assert_eq!(TravelMode::parse("bicycle").unwrap(), TravelMode::Bike);
        assert_eq!(TravelMode::parse("cycling-regular").unwrap(), TravelMode::Bike);
        assert_eq!(TravelMode::parse("walking").unwrap(), TravelMode::Walk);
        assert_eq!(TravelMode::parse("driving").unwrap(), TravelMode::Car);
        assert_eq!(TravelMode::parse("transit").unwrap(), TravelMode::Bus);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(TravelMode::parse("  Car ").unwrap(), TravelMode::Car);
        assert_eq!(TravelMode::parse("EV").unwrap(), TravelMode::Ev);
    }

    #[test]
    fn test_parse_unknown_mode() {
        let err = TravelMode::parse("hovercraft").unwrap_err();
        assert_eq!(err, UnknownMode("hovercraft".to_string()));
    }

    #[test]
    fn test_canonical_names_round_trip() {
        for mode in TravelMode::ALL {
            assert_eq!(TravelMode::parse(mode.as_str()).unwrap(), mode);
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }
}
