//! Closed sets of listing attributes that queries can be keyed on.

use crate::domain::model::Listing;
use crate::utils::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Attributes that may be absent on a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Color,
    Language,
    Country,
}

/// Attributes that support value search and distinct-value catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKey {
    Color,
    Language,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Color, Attribute::Language, Attribute::Country];

    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Color => "color",
            Attribute::Language => "language",
            Attribute::Country => "country",
        }
    }

    /// Capitalised name used in labels such as "Missing: Color".
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Color => "Color",
            Attribute::Language => "Language",
            Attribute::Country => "Country",
        }
    }

    pub fn get(self, listing: &Listing) -> Option<&str> {
        match self {
            Attribute::Color => listing.color.as_deref(),
            Attribute::Language => listing.language.as_deref(),
            Attribute::Country => listing.country.as_deref(),
        }
    }
}

impl SearchKey {
    pub const ALL: [SearchKey; 2] = [SearchKey::Color, SearchKey::Language];

    pub fn as_str(self) -> &'static str {
        Attribute::from(self).as_str()
    }

    pub fn get(self, listing: &Listing) -> Option<&str> {
        Attribute::from(self).get(listing)
    }
}

impl From<SearchKey> for Attribute {
    fn from(key: SearchKey) -> Self {
        match key {
            SearchKey::Color => Attribute::Color,
            SearchKey::Language => Attribute::Language,
        }
    }
}

impl TryFrom<Attribute> for SearchKey {
    type Error = EngineError;

    fn try_from(attribute: Attribute) -> Result<Self, Self::Error> {
        match attribute {
            Attribute::Color => Ok(SearchKey::Color),
            Attribute::Language => Ok(SearchKey::Language),
            Attribute::Country => Err(unknown_search_key(attribute.as_str())),
        }
    }
}

fn allowed_names(names: impl IntoIterator<Item = &'static str>) -> String {
    names.into_iter().collect::<Vec<_>>().join(", ")
}

fn unknown_search_key(key: &str) -> EngineError {
    EngineError::UnknownAttribute {
        key: key.to_string(),
        allowed: allowed_names(SearchKey::ALL.map(SearchKey::as_str)),
    }
}

impl FromStr for Attribute {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|attribute| attribute.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownAttribute {
                key: s.to_string(),
                allowed: allowed_names(Attribute::ALL.map(Attribute::as_str)),
            })
    }
}

impl FromStr for SearchKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| unknown_search_key(s))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
