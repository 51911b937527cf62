use std::str::FromStr;

use serde::Deserialize;
use strum::{Display, EnumString};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub elasticsearch: ElasticsearchSettings,
    pub embedder: EmbedderSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub statistics: StatisticsSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ElasticsearchSettings {
    pub url: String,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct EmbedderSettings {
    pub url: String,
    pub model: String,
    pub dimensions: usize,
}

/// Tuning knobs for query construction.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SearchSettings {
    /// Fixed result-page size for lexical and phrase search.
    pub page_size: usize,
    /// Percentage of query terms that must match in the abstract field.
    pub abstract_min_should_match: u8,
    pub semantic_default_limit: usize,
    pub semantic_max_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: 50,
            abstract_min_should_match: 60,
            semantic_default_limit: 10,
            semantic_max_limit: 100,
        }
    }
}

/// Tuning knobs for statistics aggregation.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StatisticsSettings {
    /// Upper bound on documents fetched per aggregation scan.
    pub scan_size: usize,
    /// A thesis counts as recent when its year is within this many years
    /// of the newest observed year.
    pub recent_window_years: i32,
    /// Stand-in for the newest year when no document carries one.
    pub fallback_max_year: i32,
    pub recent_limit: usize,
    pub supervisor_recent_limit: usize,
}

impl Default for StatisticsSettings {
    fn default() -> Self {
        Self {
            scan_size: 10_000,
            recent_window_years: 2,
            fallback_max_year: 2023,
            recent_limit: 10,
            supervisor_recent_limit: 20,
        }
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .expect("Failed to parse APP_ENVIRONMENT");
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("THESES")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
