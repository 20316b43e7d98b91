// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GreenWays: compare travel modes by CO2 emissions and reward greener trips
//!
//! This crate provides the backend API for logging trips, converting CO2
//! savings into eco points, and ranking users on a leaderboard.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod rounding;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::{EcoPolicy, EmissionFactors, EmissionsCalculator, RoutingClient, TripService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub trip_service: TripService,
    /// Calculator for routed comparisons (comparison factor table)
    pub comparison_calculator: EmissionsCalculator,
    pub routing_client: RoutingClient,
}

impl AppState {
    /// Wire services around a config and storage handle.
    pub fn new(config: Config, db: Database) -> Self {
        let trip_service = TripService::new(
            EmissionsCalculator::new(EmissionFactors::standard()),
            EcoPolicy::default(),
            db.clone(),
        );
        let routing_client = RoutingClient::new(&config.ors_base_url, config.ors_api_key.clone());

        Self {
            config,
            db,
            trip_service,
            comparison_calculator: EmissionsCalculator::new(EmissionFactors::comparison()),
            routing_client,
        }
    }
}
