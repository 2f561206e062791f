pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig, Settings};

pub use crate::core::engine::{ListingEngine, UNKNOWN_COUNTRY};
pub use crate::core::loader::{load_engine, FileListingSource, StaticListingSource};
pub use crate::core::report::OutputFormat;
pub use crate::domain::attribute::{Attribute, SearchKey};
pub use crate::domain::model::{Listing, NullCounts, Statistics};
pub use crate::utils::error::{EngineError, Result};
