//! Secondary per-entity aggregations over favorites, users and tracks.
//!
//! Each aggregation is also available on its own; [`BreakdownAnalyzer`]
//! bundles them into one report using a single ranking limit.

use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use tunestats_common::{Result, Timestamp, User};
use tunestats_config::DEFAULT_BREAKDOWN_LIMIT;

use crate::analyzer::Analyzer;
use crate::grouping::{count_by, group_by, mean_by, top_n_by};
use crate::reports::{ActiveUser, BreakdownReport, RatedFavorite, TrackWithCount};
use crate::snapshot::Snapshot;

/// Rating value → number of favorites with that rating.
pub fn favorites_by_rating(snapshot: &Snapshot) -> BTreeMap<u8, u64> {
    count_by(snapshot.favorites(), |favorite| favorite.rating.get()).into_btree_map()
}

/// Track name → mean rating of its favorites.
pub fn average_rating_by_track(snapshot: &Snapshot) -> BTreeMap<String, f64> {
    mean_by(
        snapshot.views(),
        |view| view.track.name.clone(),
        |view| view.favorite.rating.as_f64(),
    )
    .into_btree_map()
}

/// Track name → up to `limit` of its favorites, best rated first.
pub fn top_rated_favorites_by_track(snapshot: &Snapshot, limit: usize) -> BTreeMap<String, Vec<RatedFavorite>> {
    group_by(snapshot.views(), |view| view.track.name.clone())
        .map_values(|views| {
            top_n_by(views, limit, |view| view.favorite.rating)
                .into_iter()
                .map(|view| RatedFavorite::from(view.favorite))
                .collect()
        })
        .into_btree_map()
}

/// Country → number of users.
pub fn users_by_country(snapshot: &Snapshot) -> BTreeMap<String, u64> {
    count_by(snapshot.users(), |user| user.country.clone()).into_btree_map()
}

/// Country → mean favorite count of its users.
pub fn average_favorites_by_country(snapshot: &Snapshot) -> BTreeMap<String, f64> {
    mean_by(
        snapshot.users(),
        |user| user.country.clone(),
        |user| snapshot.favorite_count(user.id) as f64,
    )
    .into_btree_map()
}

/// Whole calendar years between a user's birth year and the reference year.
fn age_at(user: &User, reference: Timestamp) -> i32 {
    reference.year() - user.date_of_birth.year()
}

/// Age in years at `reference` → number of users.
pub fn users_by_age(snapshot: &Snapshot, reference: Timestamp) -> BTreeMap<i32, u64> {
    count_by(snapshot.users(), |user| age_at(user, reference)).into_btree_map()
}

/// Country → mean age of its users at `reference`.
pub fn average_age_by_country(snapshot: &Snapshot, reference: Timestamp) -> BTreeMap<String, f64> {
    mean_by(
        snapshot.users(),
        |user| user.country.clone(),
        |user| f64::from(age_at(user, reference)),
    )
    .into_btree_map()
}

/// Country → up to `limit` users with the most favorites.
pub fn top_users_by_country(snapshot: &Snapshot, limit: usize) -> BTreeMap<String, Vec<ActiveUser>> {
    group_by(snapshot.users(), |user| user.country.clone())
        .map_values(|users| {
            top_n_by(
                users
                    .into_iter()
                    .map(|user| ActiveUser::new(user, snapshot.favorite_count(user.id))),
                limit,
                |user| user.favorites_count,
            )
        })
        .into_btree_map()
}

/// Genre → mean catalog popularity of its tracks.
pub fn average_popularity_by_genre(snapshot: &Snapshot) -> BTreeMap<String, f64> {
    mean_by(
        snapshot.tracks(),
        |track| track.genre.clone(),
        |track| f64::from(track.popularity),
    )
    .into_btree_map()
}

/// Artist string → mean energy of its tracks.
pub fn average_energy_by_artist(snapshot: &Snapshot) -> BTreeMap<String, f64> {
    mean_by(
        snapshot.tracks(),
        |track| track.artists.clone(),
        |track| track.features.energy,
    )
    .into_btree_map()
}

/// Genre → mean danceability of its tracks.
pub fn average_danceability_by_genre(snapshot: &Snapshot) -> BTreeMap<String, f64> {
    mean_by(
        snapshot.tracks(),
        |track| track.genre.clone(),
        |track| track.features.danceability,
    )
    .into_btree_map()
}

/// Genre → mean valence of its tracks.
pub fn average_valence_by_genre(snapshot: &Snapshot) -> BTreeMap<String, f64> {
    mean_by(
        snapshot.tracks(),
        |track| track.genre.clone(),
        |track| track.features.valence,
    )
    .into_btree_map()
}

/// Genre → up to `limit` tracks with the highest catalog popularity, each with
/// its favorite count.
pub fn top_tracks_by_genre(snapshot: &Snapshot, limit: usize) -> BTreeMap<String, Vec<TrackWithCount>> {
    let favorite_counts = count_by(snapshot.favorites(), |favorite| favorite.track_id.clone());

    group_by(snapshot.tracks(), |track| track.genre.clone())
        .map_values(|tracks| {
            top_n_by(tracks, limit, |track| track.popularity)
                .into_iter()
                .map(|track| {
                    let count = favorite_counts.get(&track.id).copied().unwrap_or(0);
                    TrackWithCount::new(track, count)
                })
                .collect()
        })
        .into_btree_map()
}

/// Bundles every breakdown aggregation.
#[derive(Debug, Clone)]
pub struct BreakdownAnalyzer {
    limit: usize,
}

impl BreakdownAnalyzer {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for BreakdownAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKDOWN_LIMIT)
    }
}

impl Analyzer for BreakdownAnalyzer {
    type Report = BreakdownReport;

    #[instrument(skip(self, snapshot), fields(limit = self.limit))]
    fn analyze(&self, snapshot: &Snapshot, reference: Timestamp) -> Result<BreakdownReport> {
        let report = BreakdownReport {
            favorites_by_rating: favorites_by_rating(snapshot),
            average_rating_by_track: average_rating_by_track(snapshot),
            top_rated_favorites_by_track: top_rated_favorites_by_track(snapshot, self.limit),
            users_by_country: users_by_country(snapshot),
            users_by_age: users_by_age(snapshot, reference),
            average_favorites_by_country: average_favorites_by_country(snapshot),
            average_age_by_country: average_age_by_country(snapshot, reference),
            top_users_by_country: top_users_by_country(snapshot, self.limit),
            average_popularity_by_genre: average_popularity_by_genre(snapshot),
            top_tracks_by_genre: top_tracks_by_genre(snapshot, self.limit),
            average_energy_by_artist: average_energy_by_artist(snapshot),
            average_danceability_by_genre: average_danceability_by_genre(snapshot),
            average_valence_by_genre: average_valence_by_genre(snapshot),
        };

        debug!(
            "Breakdown over {} tracks and {} countries",
            report.average_rating_by_track.len(),
            report.users_by_country.len()
        );
        Ok(report)
    }

    fn name(&self) -> &'static str {
        "breakdown"
    }

    fn description(&self) -> &'static str {
        "Rating, country and genre breakdowns of favorites, users and tracks"
    }
}
