//! Engine facade binding a store, aggregation settings and a reference clock.

use chrono::Utc;
use tracing::{debug, instrument};
use tunestats_common::{Result, Timestamp};
use tunestats_config::StatsConfig;
use tunestats_store::EntityStore;

use crate::analyzer::Analyzer;
use crate::breakdown::BreakdownAnalyzer;
use crate::engagement::EngagementAnalyzer;
use crate::popularity::PopularityAnalyzer;
use crate::preference::PreferenceAnalyzer;
use crate::reports::{
    BreakdownReport, EngagementReport, PopularityReport, PreferenceReport, StatisticsSummary,
    TimelineReport, TrendingReport,
};
use crate::snapshot::Snapshot;
use crate::timeline::TimelineAnalyzer;
use crate::trend::TrendAnalyzer;

/// The instant time windows are measured back from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceTime {
    /// The wall clock, read when a report is computed.
    #[default]
    Now,
    /// A fixed instant.
    At(Timestamp),
}

impl ReferenceTime {
    /// The concrete instant; `Now` reads the clock on every call.
    pub fn resolve(self) -> Timestamp {
        match self {
            Self::Now => Utc::now(),
            Self::At(instant) => instant,
        }
    }
}

impl From<Timestamp> for ReferenceTime {
    fn from(instant: Timestamp) -> Self {
        Self::At(instant)
    }
}

impl From<Option<Timestamp>> for ReferenceTime {
    fn from(instant: Option<Timestamp>) -> Self {
        instant.map_or(Self::Now, Self::At)
    }
}

/// Computes reports from the current contents of an [`EntityStore`].
///
/// Every report call captures its own snapshot, so calls are independent of
/// each other and may run concurrently.
#[derive(Debug)]
pub struct StatisticsEngine<S> {
    store: S,
    settings: StatsConfig,
}

impl<S: EntityStore> StatisticsEngine<S> {
    /// Creates an engine with default settings.
    pub fn new(store: S) -> Self {
        Self::with_settings(store, StatsConfig::default())
    }

    /// Creates an engine with explicit settings.
    pub fn with_settings(store: S, settings: StatsConfig) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &StatsConfig {
        &self.settings
    }

    /// The configured reference instant, or the wall clock when none is set.
    pub fn default_reference(&self) -> ReferenceTime {
        self.settings.reference_time.into()
    }

    /// Captures a fresh snapshot from the store.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Snapshot::capture(&self.store)
    }

    /// Runs one analyzer against a fresh snapshot.
    #[instrument(skip(self, analyzer), fields(report = analyzer.name()))]
    pub fn run<A: Analyzer>(&self, analyzer: &A, reference: ReferenceTime) -> Result<A::Report> {
        let reference = reference.resolve();
        let snapshot = self.snapshot()?;
        let report = analyzer.analyze(&snapshot, reference)?;
        debug!(%reference, "Computed {} report", analyzer.name());
        Ok(report)
    }

    pub fn engagement_analyzer(&self) -> EngagementAnalyzer {
        EngagementAnalyzer::new(self.settings.most_active_users_limit)
    }

    pub fn trend_analyzer(&self) -> TrendAnalyzer {
        TrendAnalyzer::new(
            self.settings.trending_week_days,
            self.settings.trending_month_days,
        )
    }

    pub fn timeline_analyzer(&self) -> TimelineAnalyzer {
        TimelineAnalyzer::new(self.settings.timeline_window_days)
    }

    pub fn breakdown_analyzer(&self) -> BreakdownAnalyzer {
        BreakdownAnalyzer::new(self.settings.breakdown_limit)
    }

    /// Average favorites per user, most active users and favorites per genre.
    pub fn user_engagement(&self) -> Result<EngagementReport> {
        self.run(&self.engagement_analyzer(), ReferenceTime::Now)
    }

    /// Favorite counts per track and rating statistics per genre.
    pub fn track_popularity(&self) -> Result<PopularityReport> {
        self.run(&PopularityAnalyzer::new(), ReferenceTime::Now)
    }

    /// Genre counts and average danceability per country.
    pub fn user_preferences(&self) -> Result<PreferenceReport> {
        self.run(&PreferenceAnalyzer::new(), ReferenceTime::Now)
    }

    /// Activity within the recent windows ending at `reference`.
    pub fn trending(&self, reference: ReferenceTime) -> Result<TrendingReport> {
        self.run(&self.trend_analyzer(), reference)
    }

    /// [`Self::trending`] at a fixed instant.
    pub fn trending_at(&self, reference: Timestamp) -> Result<TrendingReport> {
        self.trending(ReferenceTime::At(reference))
    }

    /// Plays per recent day, hour of day and weekday.
    pub fn user_activity_timeline(&self, reference: ReferenceTime) -> Result<TimelineReport> {
        self.run(&self.timeline_analyzer(), reference)
    }

    /// [`Self::user_activity_timeline`] at a fixed instant.
    pub fn user_activity_timeline_at(&self, reference: Timestamp) -> Result<TimelineReport> {
        self.user_activity_timeline(ReferenceTime::At(reference))
    }

    /// Secondary breakdowns of favorites, users and tracks.
    pub fn breakdown(&self) -> Result<BreakdownReport> {
        self.run(&self.breakdown_analyzer(), ReferenceTime::Now)
    }

    /// Every report from a single snapshot and a single reference instant.
    #[instrument(skip(self))]
    pub fn summary(&self, reference: ReferenceTime) -> Result<StatisticsSummary> {
        let reference_time = reference.resolve();
        let snapshot = self.snapshot()?;

        Ok(StatisticsSummary {
            reference_time,
            engagement: self.engagement_analyzer().analyze(&snapshot, reference_time)?,
            popularity: PopularityAnalyzer::new().analyze(&snapshot, reference_time)?,
            preferences: PreferenceAnalyzer::new().analyze(&snapshot, reference_time)?,
            trending: self.trend_analyzer().analyze(&snapshot, reference_time)?,
            timeline: self.timeline_analyzer().analyze(&snapshot, reference_time)?,
            breakdown: self.breakdown_analyzer().analyze(&snapshot, reference_time)?,
        })
    }
}
