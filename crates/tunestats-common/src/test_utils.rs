//! Test utilities and shared test helpers.
//!
//! Entity builders with sensible defaults, the reference scenario used across
//! the workspace, and proptest strategies for generated collections.

use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

use crate::types::{
    AudioFeatures, Favorite, FavoriteId, Rating, Timestamp, Track, TrackId, User, UserId,
};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call multiple times.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating a UTC timestamp.
pub fn mock_timestamp(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
        .expect("valid fixture timestamp")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// A user with placeholder personal data.
pub fn user(id: u64, username: &str, country: &str) -> User {
    User {
        id: UserId(id),
        username: username.to_string(),
        first_name: format!("First{id}"),
        last_name: format!("Last{id}"),
        email: format!("{username}@example.com"),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid fixture date"),
        country: country.to_string(),
    }
}

/// A track with the given genre and danceability; other features defaulted.
pub fn track(id: &str, genre: &str, danceability: f64) -> Track {
    Track {
        id: TrackId::new(id),
        name: format!("Track {id}"),
        artists: format!("Artist {id}"),
        album_name: format!("Album {id}"),
        genre: genre.to_string(),
        popularity: 50,
        duration_ms: 180_000,
        explicit: false,
        features: AudioFeatures {
            danceability,
            ..AudioFeatures::default()
        },
    }
}

/// A public favorite created at 2024-01-01 00:00 UTC.
pub fn favorite(id: u64, user_id: u64, track_id: &str, rating: u8, last_played: Option<Timestamp>) -> Favorite {
    Favorite {
        id: FavoriteId(id),
        user_id: UserId(user_id),
        track_id: TrackId::new(track_id),
        rating: Rating::new(rating).expect("fixture rating within 1..=5"),
        created_at: mock_timestamp(2024, 1, 1, 0, 0, 0),
        last_played,
        is_public: true,
        comment: None,
    }
}

/// Users, tracks and favorites of the reference scenario.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub users: Vec<User>,
    pub tracks: Vec<Track>,
    pub favorites: Vec<Favorite>,
}

/// Two users (USA, UK), three tracks (Pop, Rock, Pop) and three favorites:
/// user 1 → t1 rated 5, user 1 → t2 rated 3, user 2 → t1 rated 4.
///
/// All favorites were last played on 2024-01-03 at 10:00, 14:00 and 22:00.
pub fn reference_scenario() -> Scenario {
    Scenario {
        users: vec![user(1, "alice", "USA"), user(2, "bob", "UK")],
        tracks: vec![
            track("t1", "Pop", 0.8),
            track("t2", "Rock", 0.5),
            track("t3", "Pop", 0.6),
        ],
        favorites: vec![
            favorite(1, 1, "t1", 5, Some(mock_timestamp(2024, 1, 3, 10, 0, 0))),
            favorite(2, 1, "t2", 3, Some(mock_timestamp(2024, 1, 3, 14, 0, 0))),
            favorite(3, 2, "t1", 4, Some(mock_timestamp(2024, 1, 3, 22, 0, 0))),
        ],
    }
}

/// Property-based testing strategies.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use super::*;
    use proptest::prelude::*;

    const GENRES: [&str; 4] = ["Pop", "Rock", "Jazz", "Classical"];
    const COUNTRIES: [&str; 3] = ["USA", "UK", "Canada"];

    /// Generates a referentially consistent scenario.
    ///
    /// Last-played instants fall within 60 days before 2024-03-01 or are absent.
    pub fn scenario_strategy() -> impl Strategy<Value = Scenario> {
        let users = prop::collection::vec(0..COUNTRIES.len(), 0..8);
        let tracks = prop::collection::vec((0..GENRES.len(), 0.0f64..1.0), 1..6);
        (users, tracks).prop_flat_map(|(user_countries, track_specs)| {
            let user_count = user_countries.len();
            let track_count = track_specs.len();
            let favorites = if user_count == 0 {
                Just(Vec::new()).boxed()
            } else {
                prop::collection::vec(
                    (
                        0..user_count,
                        0..track_count,
                        1u8..=5,
                        prop::option::of(0i64..60 * 24 * 3600),
                    ),
                    0..30,
                )
                .boxed()
            };
            favorites.prop_map(move |specs| {
                let anchor = mock_timestamp(2024, 3, 1, 0, 0, 0);
                let users = user_countries
                    .iter()
                    .enumerate()
                    .map(|(i, c)| user(i as u64 + 1, &format!("user{i}"), COUNTRIES[*c]))
                    .collect();
                let tracks = track_specs
                    .iter()
                    .enumerate()
                    .map(|(i, (g, d))| track(&format!("t{i}"), GENRES[*g], *d))
                    .collect();
                let favorites = specs
                    .iter()
                    .enumerate()
                    .map(|(i, (u, t, r, offset))| {
                        favorite(
                            i as u64 + 1,
                            *u as u64 + 1,
                            &format!("t{t}"),
                            *r,
                            offset.map(|secs| anchor - chrono::Duration::seconds(secs)),
                        )
                    })
                    .collect();
                Scenario {
                    users,
                    tracks,
                    favorites,
                }
            })
        })
    }
}
