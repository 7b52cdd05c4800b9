//! Computes the requested reports and renders them.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use tunestats_common::Result as StatsResult;
use tunestats_config::Config;
use tunestats_stats::{ObjectResponse, ReferenceTime, StatisticsEngine, StatisticsSummary};
use tunestats_store::{Dataset, InMemoryStore};

use crate::cli::{OutputFormat, ReportKind};
use crate::error::{CliError, CliResult};

type Engine = StatisticsEngine<InMemoryStore>;

/// Runs reports against an engine over an in-memory store.
#[derive(Debug, Clone)]
pub struct ReportRunner {
    engine: Arc<Engine>,
}

impl ReportRunner {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Loads the configured dataset and builds an engine with the configured settings.
    pub fn from_config(config: &Config) -> CliResult<Self> {
        let path = config
            .data
            .dataset_path
            .as_ref()
            .ok_or(CliError::MissingDataset)?;
        let dataset = Dataset::load(path)?;
        let store = InMemoryStore::from_dataset(dataset);
        Ok(Self::new(StatisticsEngine::with_settings(
            store,
            config.stats.clone(),
        )))
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Computes one report, or all of them, wrapped in a response envelope.
    #[instrument(skip(self))]
    pub async fn run(&self, kind: ReportKind) -> CliResult<ObjectResponse<serde_json::Value>> {
        let engine = &self.engine;
        let reference = engine.default_reference();

        let content = match kind {
            ReportKind::Engagement => to_value(engine.user_engagement())?,
            ReportKind::Popularity => to_value(engine.track_popularity())?,
            ReportKind::Preferences => to_value(engine.user_preferences())?,
            ReportKind::Trending => to_value(engine.trending(reference))?,
            ReportKind::Timeline => to_value(engine.user_activity_timeline(reference))?,
            ReportKind::Breakdown => to_value(engine.breakdown())?,
            ReportKind::All => serde_json::to_value(self.run_all(reference).await?)?,
        };

        info!("Computed {} report", kind);
        Ok(ObjectResponse::new(content))
    }

    /// Computes every report concurrently on the blocking pool against one
    /// reference instant.
    pub async fn run_all(&self, reference: ReferenceTime) -> CliResult<StatisticsSummary> {
        let reference_time = reference.resolve();
        let at = ReferenceTime::At(reference_time);

        let engagement = self.spawn(|engine| engine.user_engagement());
        let popularity = self.spawn(|engine| engine.track_popularity());
        let preferences = self.spawn(|engine| engine.user_preferences());
        let trending = self.spawn(move |engine| engine.trending(at));
        let timeline = self.spawn(move |engine| engine.user_activity_timeline(at));
        let breakdown = self.spawn(|engine| engine.breakdown());

        let (engagement, popularity, preferences, trending, timeline, breakdown) =
            tokio::try_join!(engagement, popularity, preferences, trending, timeline, breakdown)?;

        Ok(StatisticsSummary {
            reference_time,
            engagement: engagement?,
            popularity: popularity?,
            preferences: preferences?,
            trending: trending?,
            timeline: timeline?,
            breakdown: breakdown?,
        })
    }

    fn spawn<T, F>(&self, report: F) -> tokio::task::JoinHandle<StatsResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(&Engine) -> StatsResult<T> + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || report(&*engine))
    }
}

fn to_value<T: Serialize>(report: StatsResult<T>) -> CliResult<serde_json::Value> {
    Ok(serde_json::to_value(report?)?)
}

/// Serializes a response in the requested format.
pub fn render<T: Serialize>(response: &T, format: OutputFormat) -> CliResult<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(response)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(response)?,
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunestats_common::test_utils::{mock_timestamp, reference_scenario};
    use tunestats_config::StatsConfig;

    fn reference_runner() -> ReportRunner {
        let scenario = reference_scenario();
        let store = InMemoryStore::from_dataset(Dataset::new(
            scenario.users,
            scenario.tracks,
            scenario.favorites,
        ));
        ReportRunner::new(StatisticsEngine::with_settings(
            store,
            StatsConfig {
                reference_time: Some(mock_timestamp(2024, 1, 4, 0, 0, 0)),
                ..StatsConfig::default()
            },
        ))
    }

    #[tokio::test]
    async fn test_single_report_envelope() {
        let response = reference_runner().run(ReportKind::Engagement).await.unwrap();
        assert_eq!(response.version, 1);
        assert_eq!(response.content["averageFavoritesPerUser"], 1.5);
    }

    #[tokio::test]
    async fn test_all_matches_sequential_summary() {
        let runner = reference_runner();
        let reference = ReferenceTime::At(mock_timestamp(2024, 1, 4, 0, 0, 0));

        let concurrent = runner.run_all(reference).await.unwrap();
        let sequential = runner.engine().summary(reference).unwrap();
        assert_eq!(concurrent, sequential);
    }

    #[test]
    fn test_trending_uses_configured_reference() {
        let response = tokio_test::block_on(reference_runner().run(ReportKind::Trending)).unwrap();
        assert_eq!(response.content["userActivityByCountry"]["USA"], 2);
    }

    #[test]
    fn test_missing_dataset() {
        let err = ReportRunner::from_config(&Config::default()).unwrap_err();
        assert!(matches!(err, CliError::MissingDataset));
    }

    #[test]
    fn test_render_formats() {
        let response = ObjectResponse::new(serde_json::json!({"a": 1}));
        assert_eq!(
            render(&response, OutputFormat::Json).unwrap(),
            r#"{"content":{"a":1},"version":1}"#
        );
        assert!(render(&response, OutputFormat::Pretty).unwrap().contains("\n  \"content\""));
    }
}
