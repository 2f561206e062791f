pub mod cli;
pub mod toml_config;

use crate::core::report::OutputFormat;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::core::engine::ListingEngine;
#[cfg(feature = "cli")]
use crate::core::report::{
    country_overview, render_groups, render_listings, render_statistics, render_values, Report,
    StatisticsSummary,
};
#[cfg(feature = "cli")]
use crate::domain::attribute::{Attribute, SearchKey};
#[cfg(feature = "cli")]
use crate::utils::error::EngineError;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "listing-analytics")]
#[command(about = "Query, group and audit a listing data set")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listing data file (.json or .csv)
    #[arg(long)]
    pub data: Option<String>,

    /// Output format: json, csv, tsv or table
    #[arg(short, long)]
    pub format: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Listings whose color or language equals VALUE (case-insensitive)
    Filter { key: SearchKey, value: String },
    /// Listings with no value for an attribute
    Missing { key: Attribute },
    /// Listing counts per country
    Groups {
        #[arg(long, requires = "highlight_value")]
        highlight_key: Option<SearchKey>,
        #[arg(long, requires = "highlight_key")]
        highlight_value: Option<String>,
    },
    /// Sorted distinct values of color or language
    Values { key: SearchKey },
    /// Distinct countries in first-seen order
    Countries,
    /// Totals and missing-data counts
    Stats,
    /// Statistics plus the country overview as one JSON document
    Report {
        #[arg(long, requires = "highlight_value")]
        highlight_key: Option<SearchKey>,
        #[arg(long, requires = "highlight_key")]
        highlight_value: Option<String>,
    },
    /// A single listing by id
    Show { id: u64 },
}

#[cfg(feature = "cli")]
impl Command {
    /// Runs the query against `engine` and renders the result in `format`.
    pub fn execute(&self, engine: &ListingEngine, format: OutputFormat) -> Result<String> {
        match self {
            Command::Filter { key, value } => {
                let results = engine.filter_by_attribute(*key, value);
                tracing::info!("{} listings with {} = {:?}", results.len(), key, value);
                render_listings(&results, format)
            }
            Command::Missing { key } => {
                let results = engine.listings_missing(*key);
                tracing::info!("{} listings missing {}", results.len(), key);
                render_listings(&results, format)
            }
            Command::Groups {
                highlight_key,
                highlight_value,
            } => {
                let highlighted = match (highlight_key, highlight_value) {
                    (Some(key), Some(value)) => engine.filter_by_attribute(*key, value),
                    _ => Vec::new(),
                };
                let groups = country_overview(engine.group_by_country(), &highlighted);
                render_groups(&groups, format)
            }
            Command::Values { key } => render_values(&engine.distinct_values(*key), format),
            Command::Countries => render_values(&engine.distinct_countries(), format),
            Command::Stats => {
                let summary = StatisticsSummary::from(&engine.statistics());
                render_statistics(&summary, format)
            }
            Command::Report {
                highlight_key,
                highlight_value,
            } => {
                let highlight = highlight_key.zip(highlight_value.as_deref());
                let report = Report::build(engine, highlight);
                Ok(serde_json::to_string_pretty(&report)?)
            }
            Command::Show { id } => {
                let listing = engine
                    .get(*id)
                    .ok_or(EngineError::ListingNotFound { id: *id })?;
                render_listings(&[listing], format)
            }
        }
    }
}

/// Effective settings after layering CLI flags over the config file over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: String,
    pub output_format: String,
    pub verbose: bool,
    pub json_logs: bool,
}

impl Settings {
    pub fn resolve(
        file: Option<&TomlConfig>,
        data: Option<&str>,
        format: Option<&str>,
        verbose: bool,
    ) -> Self {
        let defaults = TomlConfig::default();
        let base = file.unwrap_or(&defaults);
        Self {
            data_path: data.unwrap_or(base.data_path()).to_string(),
            output_format: format.unwrap_or(base.output_format()).to_string(),
            verbose: verbose || base.verbose(),
            json_logs: base.logging.json,
        }
    }

    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &CliConfig, file: Option<&TomlConfig>) -> Self {
        Self::resolve(file, cli.data.as_deref(), cli.format.as_deref(), cli.verbose)
    }

    pub fn format(&self) -> Result<OutputFormat> {
        self.output_format.parse()
    }
}

impl ConfigProvider for Settings {
    fn data_path(&self) -> &str {
        &self.data_path
    }

    fn output_format(&self) -> &str {
        &self.output_format
    }

    fn verbose(&self) -> bool {
        self.verbose
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("data", &self.data_path)?;
        validate_file_extension("data", &self.data_path, &crate::core::loader::SUPPORTED_EXTENSIONS)?;
        self.format()?;
        Ok(())
    }
}
