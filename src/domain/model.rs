use crate::domain::attribute::Attribute;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: Option<String>,
    pub language: Option<String>,
    pub color: Option<String>,
}

impl Listing {
    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        attribute.get(self)
    }

    /// Absent attributes, in color, language, country order.
    pub fn missing_attributes(&self) -> Vec<Attribute> {
        Attribute::ALL
            .into_iter()
            .filter(|attribute| attribute.get(self).is_none())
            .collect()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Listings partitioned by country label, in first-occurrence order.
pub type CountryGroups<'a> = IndexMap<String, Vec<&'a Listing>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullCounts {
    pub color: usize,
    pub language: usize,
    pub country: usize,
}

impl NullCounts {
    pub fn get(&self, attribute: Attribute) -> usize {
        match attribute {
            Attribute::Color => self.color,
            Attribute::Language => self.language,
            Attribute::Country => self.country,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_listings: usize,
    pub unique_countries: usize,
    pub unique_colors: usize,
    pub unique_languages: usize,
    pub null_counts: NullCounts,
}
