pub mod engine;
pub mod loader;
pub mod report;

pub use crate::domain::attribute::{Attribute, SearchKey};
pub use crate::domain::model::{CountryGroups, Listing, NullCounts, Statistics};
pub use crate::domain::ports::{ConfigProvider, ListingSource, Storage};
pub use crate::utils::error::Result;
