//! Per-user activity summary.

use tracing::{debug, instrument};
use tunestats_common::{Result, Timestamp};
use tunestats_config::DEFAULT_MOST_ACTIVE_USERS_LIMIT;

use crate::analyzer::Analyzer;
use crate::grouping::{count_by, mean, top_n_by};
use crate::reports::{ActiveUser, EngagementReport};
use crate::snapshot::Snapshot;

/// Averages and ranks users by how many favorites they hold.
#[derive(Debug, Clone)]
pub struct EngagementAnalyzer {
    most_active_limit: usize,
}

impl EngagementAnalyzer {
    pub fn new(most_active_limit: usize) -> Self {
        Self { most_active_limit }
    }
}

impl Default for EngagementAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_MOST_ACTIVE_USERS_LIMIT)
    }
}

impl Analyzer for EngagementAnalyzer {
    type Report = EngagementReport;

    #[instrument(skip(self, snapshot, _reference), fields(limit = self.most_active_limit))]
    fn analyze(&self, snapshot: &Snapshot, _reference: Timestamp) -> Result<EngagementReport> {
        let average_favorites_per_user = mean(
            snapshot
                .users()
                .iter()
                .map(|user| snapshot.favorite_count(user.id) as f64),
        );

        let most_active_users = top_n_by(
            snapshot
                .users()
                .iter()
                .map(|user| ActiveUser::new(user, snapshot.favorite_count(user.id))),
            self.most_active_limit,
            |user| user.favorites_count,
        );

        let popular_genres =
            count_by(snapshot.views(), |view| view.track.genre.clone()).into_btree_map();

        debug!(
            "Engagement over {} users: {} most active, {} genres",
            snapshot.users().len(),
            most_active_users.len(),
            popular_genres.len()
        );

        Ok(EngagementReport {
            average_favorites_per_user,
            most_active_users,
            popular_genres,
        })
    }

    fn name(&self) -> &'static str {
        "engagement"
    }

    fn description(&self) -> &'static str {
        "Average favorites per user, most active users and favorites per genre"
    }
}
