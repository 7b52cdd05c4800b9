//! Report records returned by the analyzers.
//!
//! Every record serializes with camelCase field names and is built only from
//! maps and sequences. Maps are key-sorted so output is deterministic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tunestats_common::{DayOfWeek, Favorite, FavoriteId, Timestamp, Track, TrackId, User, UserId};

/// A track with the number of favorites that matched it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackWithCount {
    pub id: TrackId,
    pub name: String,
    pub artist: String,
    pub genre: String,
    pub popularity: i32,
    pub count: u64,
}

impl TrackWithCount {
    pub fn new(track: &Track, count: u64) -> Self {
        Self {
            id: track.id.clone(),
            name: track.name.clone(),
            artist: track.artists.clone(),
            genre: track.genre.clone(),
            popularity: track.popularity,
            count,
        }
    }
}

/// A user with their favorite count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUser {
    pub id: UserId,
    pub username: String,
    pub country: String,
    pub favorites_count: u64,
}

impl ActiveUser {
    pub fn new(user: &User, favorites_count: u64) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            country: user.country.clone(),
            favorites_count,
        }
    }
}

/// Compact form of a favorite for ranked listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedFavorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub track_id: TrackId,
    pub rating: u8,
    pub last_played: Option<Timestamp>,
}

impl From<&Favorite> for RatedFavorite {
    fn from(favorite: &Favorite) -> Self {
        Self {
            id: favorite.id,
            user_id: favorite.user_id,
            track_id: favorite.track_id.clone(),
            rating: favorite.rating.get(),
            last_played: favorite.last_played,
        }
    }
}

/// Per-user activity summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementReport {
    pub average_favorites_per_user: f64,
    pub most_active_users: Vec<ActiveUser>,
    pub popular_genres: BTreeMap<String, u64>,
}

/// Per-track and per-genre popularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularityReport {
    pub most_favorited_tracks: Vec<TrackWithCount>,
    pub average_rating_by_genre: BTreeMap<String, f64>,
    /// Mean of `rating × danceability` per genre.
    pub feature_correlations: BTreeMap<String, f64>,
}

/// Per-country taste summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceReport {
    pub genre_preferences_by_country: BTreeMap<String, BTreeMap<String, u64>>,
    pub average_features_by_country: BTreeMap<String, f64>,
}

/// What was played recently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingReport {
    pub recently_popular_tracks: Vec<TrackWithCount>,
    pub emerging_genres: BTreeMap<String, u64>,
    pub user_activity_by_country: BTreeMap<String, u64>,
}

/// Activity bucketed by date, hour and weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineReport {
    pub daily_activity: BTreeMap<NaiveDate, u64>,
    pub peak_activity_hours: BTreeMap<u32, u64>,
    pub weekly_patterns: BTreeMap<DayOfWeek, u64>,
}

/// Secondary per-entity aggregations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownReport {
    pub favorites_by_rating: BTreeMap<u8, u64>,
    pub average_rating_by_track: BTreeMap<String, f64>,
    pub top_rated_favorites_by_track: BTreeMap<String, Vec<RatedFavorite>>,
    pub users_by_country: BTreeMap<String, u64>,
    /// Age in whole years at the reference instant, from birth year alone.
    pub users_by_age: BTreeMap<i32, u64>,
    pub average_favorites_by_country: BTreeMap<String, f64>,
    pub average_age_by_country: BTreeMap<String, f64>,
    pub top_users_by_country: BTreeMap<String, Vec<ActiveUser>>,
    pub average_popularity_by_genre: BTreeMap<String, f64>,
    pub top_tracks_by_genre: BTreeMap<String, Vec<TrackWithCount>>,
    pub average_energy_by_artist: BTreeMap<String, f64>,
    pub average_danceability_by_genre: BTreeMap<String, f64>,
    pub average_valence_by_genre: BTreeMap<String, f64>,
}

/// Every report, computed against one reference instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    pub reference_time: Timestamp,
    pub engagement: EngagementReport,
    pub popularity: PopularityReport,
    pub preferences: PreferenceReport,
    pub trending: TrendingReport,
    pub timeline: TimelineReport,
    pub breakdown: BreakdownReport,
}
