//! Integration tests for tunestats-cli crate.

use clap::Parser;
use std::io::Write;
use tunestats_cli::{render, Cli, OutputFormat, ReportKind, ReportRunner};
use tunestats_common::test_utils::reference_scenario;
use tunestats_config::ConfigLoader;
use tunestats_store::Dataset;

fn write_dataset(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let scenario = reference_scenario();
    let dataset = Dataset::new(scenario.users, scenario.tracks, scenario.favorites);
    let path = dir.path().join("seed.json");
    std::fs::write(&path, serde_json::to_string(&dataset).unwrap()).unwrap();
    path
}

#[tokio::test]
async fn test_all_reports_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(&dir);

    let config_path = dir.path().join("tunestats.yaml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    write!(
        file,
        "data:\n  dataset_path: {:?}\nstats:\n  most_active_users_limit: 1\n",
        dataset.display().to_string()
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "tunestats",
        "--config",
        config_path.to_str().unwrap(),
        "--at",
        "2024-01-04T00:00:00Z",
        "all",
    ])
    .unwrap();

    let mut config = ConfigLoader::parse_file(&config_path).unwrap();
    cli.apply_overrides(&mut config);
    config.validate().unwrap();

    let runner = ReportRunner::from_config(&config).unwrap();
    let response = runner.run(cli.report).await.unwrap();
    let content = &response.content;

    assert_eq!(content["referenceTime"], "2024-01-04T00:00:00Z");
    assert_eq!(content["engagement"]["mostActiveUsers"].as_array().unwrap().len(), 1);
    assert_eq!(content["popularity"]["mostFavoritedTracks"][0]["count"], 2);
    assert_eq!(content["preferences"]["genrePreferencesByCountry"]["UK"]["Pop"], 1);
    assert_eq!(content["trending"]["emergingGenres"]["Rock"], 1);
    assert_eq!(content["timeline"]["weeklyPatterns"]["WEDNESDAY"], 3);
    assert_eq!(content["breakdown"]["usersByCountry"]["USA"], 1);
}

#[tokio::test]
async fn test_single_report_rendered_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(&dir);

    let cli = Cli::try_parse_from([
        "tunestats",
        "--dataset",
        dataset.to_str().unwrap(),
        "--format",
        "json",
        "popularity",
    ])
    .unwrap();
    assert_eq!(cli.report, ReportKind::Popularity);

    let mut config = tunestats_config::Config::default();
    cli.apply_overrides(&mut config);

    let runner = ReportRunner::from_config(&config).unwrap();
    let response = runner.run(cli.report).await.unwrap();
    let rendered = render(&response, OutputFormat::Json).unwrap();

    assert!(!rendered.contains('\n'));
    assert!(rendered.starts_with(r#"{"content":{"#));
    assert!(rendered.contains(r#""mostFavoritedTracks":[{"artist":"Artist t1""#));
    assert!(rendered.ends_with(r#""version":1}"#));
}

#[test]
fn test_unreadable_dataset_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = tunestats_config::Config::default();
    config.data.dataset_path = Some(dir.path().join("missing.yaml"));

    let err = ReportRunner::from_config(&config).unwrap_err();
    assert!(err.to_string().starts_with("Store error"));
}
