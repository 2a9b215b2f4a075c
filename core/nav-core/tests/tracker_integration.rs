//! Integration tests for the navigation pipeline.
//!
//! These drive the real [`MonitoringClient`] and [`OutboxSink`] through a
//! [`NavigationTracker`] and read the outbox back from disk.
//!
//! # Key Invariants Tested
//!
//! 1. **Run collapsing**: one page view per maximal run of equal locations
//! 2. **Single init**: the delivery worker starts once per state lifetime
//! 3. **Empty notifications**: never emitted, never recorded
//! 4. **Degradation**: a disabled or broken backend never disturbs navigation

use nav_core::monitoring::{read_outbox, PAGEVIEW_EVENT};
use nav_core::{
    LocationOutcome, MonitoringClient, MonitoringConfig, NavigationObserver, NavigationTracker,
    OutboxSink, TrackerState,
};
use std::path::Path;
use tempfile::tempdir;

fn enabled_config(outbox: &Path) -> MonitoringConfig {
    MonitoringConfig {
        api_key: Some("phc_integration".to_string()),
        outbox_path: Some(outbox.to_path_buf()),
        ..MonitoringConfig::default()
    }
}

fn page_view_paths(outbox: &Path) -> Vec<String> {
    read_outbox(outbox)
        .unwrap()
        .into_iter()
        .filter(|e| e.event == PAGEVIEW_EVENT)
        .map(|e| e.properties["path"].as_str().unwrap().to_string())
        .collect()
}

/// Reference model: drop empties, then collapse consecutive duplicates.
fn expected_emissions(notifications: &[Option<&str>]) -> Vec<String> {
    let mut emitted: Vec<String> = Vec::new();
    for location in notifications.iter().flatten() {
        if location.is_empty() {
            continue;
        }
        if emitted.last().map(String::as_str) != Some(*location) {
            emitted.push(location.to_string());
        }
    }
    emitted
}

// =============================================================================
// INVARIANT 1: One emission per run of equal locations
// =============================================================================

#[test]
fn invariant_runs_collapse_to_single_page_view() {
    let temp = tempdir().unwrap();
    let outbox = temp.path().join("outbox.jsonl");
    let client = MonitoringClient::new(enabled_config(&outbox));
    let mut state = TrackerState::new();
    let mut tracker = NavigationTracker::new(&mut state, &client);

    tracker.on_mount();
    for location in ["/a", "/a", "/b", "/b", "/b", "/a"] {
        tracker.on_location_change(Some(location));
    }
    client.flush().unwrap();

    assert_eq!(page_view_paths(&outbox), vec!["/a", "/b", "/a"]);
}

#[test]
fn invariant_matches_reference_model_for_mixed_sequences() {
    let sequences: Vec<Vec<Option<&str>>> = vec![
        vec![],
        vec![None, Some(""), None],
        vec![Some("/"), Some("/"), Some("/")],
        vec![Some("/a"), None, Some("/a"), Some(""), Some("/b")],
        vec![Some("/a"), Some("/b"), Some("/a"), Some("/b")],
        vec![Some("/x?q=1"), Some("/x?q=2"), Some("/x?q=2"), Some("/x")],
        vec![Some("/bills"), Some("/bills#history"), Some("/bills")],
    ];

    for notifications in sequences {
        let temp = tempdir().unwrap();
        let outbox = temp.path().join("outbox.jsonl");
        let client = MonitoringClient::new(enabled_config(&outbox));
        let mut state = TrackerState::new();
        let mut tracker = NavigationTracker::new(&mut state, &client);

        tracker.on_mount();
        for location in &notifications {
            tracker.on_location_change(*location);
        }
        client.flush().unwrap();

        assert_eq!(
            page_view_paths(&outbox),
            expected_emissions(&notifications),
            "sequence: {:?}",
            notifications
        );
    }
}

// =============================================================================
// INVARIANT 2: Single init
// =============================================================================

#[test]
fn invariant_repeated_mounts_start_one_worker() {
    let temp = tempdir().unwrap();
    let outbox = temp.path().join("outbox.jsonl");
    let client = MonitoringClient::new(enabled_config(&outbox));
    let mut state = TrackerState::new();

    for _ in 0..3 {
        let mut tracker = NavigationTracker::new(&mut state, &client);
        tracker.on_mount();
        tracker.on_location_change(Some("/home"));
    }
    client.flush().unwrap();

    assert!(state.is_initialized());
    assert!(client.is_running());
    assert_eq!(page_view_paths(&outbox), vec!["/home"]);
}

// =============================================================================
// INVARIANT 3: Empty notifications
// =============================================================================

#[test]
fn invariant_empty_notifications_leave_state_untouched() {
    let temp = tempdir().unwrap();
    let outbox = temp.path().join("outbox.jsonl");
    let client = MonitoringClient::new(enabled_config(&outbox));
    let mut state = TrackerState::new();
    let mut tracker = NavigationTracker::new(&mut state, &client);

    tracker.on_mount();
    assert_eq!(tracker.on_location_change(None), LocationOutcome::Empty);
    assert_eq!(tracker.on_location_change(Some("")), LocationOutcome::Empty);
    client.flush().unwrap();

    assert_eq!(state.last_location(), None);
    assert!(page_view_paths(&outbox).is_empty());
}

// =============================================================================
// INVARIANT 4: Degradation
// =============================================================================

#[test]
fn disabled_client_still_advances_state() {
    let temp = tempdir().unwrap();
    let outbox = temp.path().join("outbox.jsonl");
    let config = MonitoringConfig {
        outbox_path: Some(outbox.clone()),
        ..MonitoringConfig::default()
    };
    let client = MonitoringClient::new(config);
    let mut state = TrackerState::new();
    let mut tracker = NavigationTracker::new(&mut state, &client);

    tracker.on_mount();
    assert_eq!(
        tracker.on_location_change(Some("/a")),
        LocationOutcome::Emitted
    );
    assert_eq!(
        tracker.on_location_change(Some("/a")),
        LocationOutcome::Duplicate
    );

    assert_eq!(state.last_location(), Some("/a"));
    assert!(!outbox.exists());
}

#[test]
fn navigation_before_mount_fails_quietly_then_recovers() {
    let temp = tempdir().unwrap();
    let outbox = temp.path().join("outbox.jsonl");
    let client = MonitoringClient::new(enabled_config(&outbox));
    let mut state = TrackerState::new();
    let mut tracker = NavigationTracker::new(&mut state, &client);

    // Not initialized yet: the client refuses, the tracker swallows it.
    assert_eq!(
        tracker.on_location_change(Some("/early")),
        LocationOutcome::Emitted
    );
    tracker.on_mount();
    tracker.on_location_change(Some("/early"));
    tracker.on_location_change(Some("/later"));
    client.flush().unwrap();

    assert_eq!(page_view_paths(&outbox), vec!["/later"]);
}

#[test]
fn unwritable_outbox_does_not_reach_navigation() {
    let temp = tempdir().unwrap();
    // A directory where the outbox file should be makes every append fail.
    let outbox = temp.path().join("outbox.jsonl");
    std::fs::create_dir_all(&outbox).unwrap();

    let client = MonitoringClient::with_sink(enabled_config(&outbox), OutboxSink::new(&outbox));
    let mut state = TrackerState::new();
    let mut tracker = NavigationTracker::new(&mut state, &client);

    tracker.on_mount();
    let outcomes: Vec<_> = ["/a", "/b", "/c"]
        .into_iter()
        .map(|l| tracker.on_location_change(Some(l)))
        .collect();
    client.flush().unwrap();

    assert!(outcomes.iter().all(|o| *o == LocationOutcome::Emitted));
    assert_eq!(state.last_location(), Some("/c"));
}
