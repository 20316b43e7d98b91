// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST). The emulator is shared, so every test uses
//! fresh user IDs.

use chrono::TimeZone;
use greenways::models::{TravelMode, TripRecord, User};

mod common;
use common::{test_db, unique_user_id};

/// Helper to create a basic test user
fn test_user(user_id: &str) -> User {
    User {
        user_id: user_id.to_string(),
        name: "Test User".to_string(),
        email: Some("test@example.com".to_string()),
        favorite_routes: vec!["Home → Office".to_string()],
        created_at: chrono::Utc::now().to_rfc3339(),
        updated_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn test_trip(user_id: &str, id: &str, day: u32) -> TripRecord {
    TripRecord {
        id: id.to_string(),
        user_id: user_id.to_string(),
        origin: Some("Home".to_string()),
        destination: Some("Office".to_string()),
        mode: TravelMode::Bus,
        baseline_mode: TravelMode::Car,
        distance_km: 10.0,
        duration_min: Some(25.0),
        co2_kg: 0.89,
        co2_saved_kg: 1.03,
        co2_credited_kg: Some(1.03),
        points_awarded: 10,
        created_at: chrono::Utc.with_ymd_and_hms(2026, 5, day, 8, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_user_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id("user");
    db.upsert_user(&test_user(&user_id)).await.unwrap();

    let user = db.get_user(&user_id).await.unwrap().expect("User missing");
    assert_eq!(user.name, "Test User");
    assert_eq!(user.favorite_routes, vec!["Home → Office".to_string()]);

    let missing = db.get_user(&unique_user_id("ghost")).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_get_users_skips_missing_profiles() {
    require_emulator!();

    let db = test_db().await;
    let present = unique_user_id("present");
    db.upsert_user(&test_user(&present)).await.unwrap();

    let users = db
        .get_users(&[present.clone(), unique_user_id("absent")])
        .await
        .unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].user_id, present);
}

#[tokio::test]
async fn test_record_trip_applies_award() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id("trips");

    db.record_trip(&test_trip(&user_id, &unique_user_id("t"), 1), 10, 1.03)
        .await
        .unwrap();
    let stats = db
        .record_trip(&test_trip(&user_id, &unique_user_id("t"), 2), 10, 1.03)
        .await
        .unwrap();

    assert_eq!(stats.eco_points, 20);
    assert!((stats.total_co2_saved_kg - 2.06).abs() < 1e-9);

    let trips = db.get_trips_for_user(&user_id).await.unwrap();
    assert_eq!(trips.len(), 2);
    assert!(trips[0].created_at > trips[1].created_at, "newest first");
}

#[tokio::test]
async fn test_upsert_increment_creates_stats() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id("stats");
    assert!(db.get_user_stats(&user_id).await.unwrap().is_none());

    let stats = db.upsert_increment(&user_id, 42, 4.2).await.unwrap();
    assert_eq!(stats.user_id, user_id);
    assert_eq!(stats.eco_points, 42);

    let stored = db.get_user_stats(&user_id).await.unwrap().unwrap();
    assert_eq!(stored, stats);
}

#[tokio::test]
async fn test_top_stats_ordering() {
    require_emulator!();

    let db = test_db().await;
    // Time-based deltas keep these rows above leftovers from earlier runs.
    let base = chrono::Utc::now().timestamp_micros();
    let first = unique_user_id("first");
    let second = unique_user_id("second");
    db.upsert_increment(&second, base, 1.0).await.unwrap();
    db.upsert_increment(&first, base + 1, 1.0).await.unwrap();

    let top = db.top_stats(2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].user_id, first);
    assert_eq!(top[1].user_id, second);
}
