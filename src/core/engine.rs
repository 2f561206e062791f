use crate::domain::attribute::{Attribute, SearchKey};
use crate::domain::model::{CountryGroups, Listing, NullCounts, Statistics};
use indexmap::IndexSet;
use std::collections::BTreeSet;

/// Label used for listings without a country.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Read-only query engine over a fixed listing collection.
///
/// Every operation is a full scan of the collection handed to [`ListingEngine::new`];
/// results borrow from the engine and preserve collection order unless stated otherwise.
#[derive(Debug, Clone, Default)]
pub struct ListingEngine {
    listings: Vec<Listing>,
}

impl ListingEngine {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id == id)
    }

    /// Listings whose `key` attribute is present and equal to `value`, ignoring case.
    ///
    /// An empty `value` only matches attributes that are themselves empty strings.
    pub fn filter_by_attribute(&self, key: SearchKey, value: &str) -> Vec<&Listing> {
        let needle = value.to_lowercase();
        self.listings
            .iter()
            .filter(|listing| {
                key.get(listing)
                    .is_some_and(|attribute| attribute.to_lowercase() == needle)
            })
            .collect()
    }

    pub fn listings_missing(&self, key: Attribute) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|listing| key.get(listing).is_none())
            .collect()
    }

    pub fn group_by_country(&self) -> CountryGroups<'_> {
        let mut groups = CountryGroups::new();
        for listing in &self.listings {
            let label = listing.country.as_deref().unwrap_or(UNKNOWN_COUNTRY);
            match groups.get_mut(label) {
                Some(group) => group.push(listing),
                None => {
                    groups.insert(label.to_string(), vec![listing]);
                }
            }
        }
        groups
    }

    /// Sorted, deduplicated values of `key`. Ordering is byte-wise, so case matters.
    pub fn distinct_values(&self, key: SearchKey) -> Vec<String> {
        self.listings
            .iter()
            .filter_map(|listing| key.get(listing))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Deduplicated countries in first-occurrence order.
    pub fn distinct_countries(&self) -> Vec<String> {
        self.listings
            .iter()
            .filter_map(|listing| listing.country.as_deref())
            .collect::<IndexSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn statistics(&self) -> Statistics {
        let null_counts = NullCounts {
            color: self.listings_missing(Attribute::Color).len(),
            language: self.listings_missing(Attribute::Language).len(),
            country: self.listings_missing(Attribute::Country).len(),
        };

        Statistics {
            total_listings: self.listings.len(),
            unique_countries: self.distinct_countries().len(),
            unique_colors: self.distinct_values(SearchKey::Color).len(),
            unique_languages: self.distinct_values(SearchKey::Language).len(),
            null_counts,
        }
    }
}

impl From<Vec<Listing>> for ListingEngine {
    fn from(listings: Vec<Listing>) -> Self {
        Self::new(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(
        id: u64,
        color: Option<&str>,
        language: Option<&str>,
        country: Option<&str>,
    ) -> Listing {
        Listing {
            id,
            first_name: format!("First{}", id),
            last_name: format!("Last{}", id),
            email: format!("user{}@example.com", id),
            country: country.map(str::to_string),
            language: language.map(str::to_string),
            color: color.map(str::to_string),
        }
    }

    fn ids(listings: &[&Listing]) -> Vec<u64> {
        listings.iter().map(|listing| listing.id).collect()
    }

    fn sample() -> ListingEngine {
        ListingEngine::new(vec![
            listing(1, Some("Red"), Some("French"), Some("France")),
            listing(2, Some("red"), None, Some("Brazil")),
            listing(3, None, Some("Portuguese"), Some("Brazil")),
            listing(4, Some("Teal"), Some("french"), None),
            listing(5, Some(""), Some("English"), Some("France")),
            listing(6, Some("RED"), Some("English"), None),
        ])
    }

    #[test]
    fn test_two_listing_scenario() {
        let engine = ListingEngine::new(vec![
            listing(1, Some("Red"), None, Some("France")),
            listing(2, None, Some("English"), None),
        ]);

        assert_eq!(ids(&engine.listings_missing(Attribute::Language)), vec![1]);

        let groups = engine.group_by_country();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["France", "Unknown"]);
        assert_eq!(ids(&groups["France"]), vec![1]);
        assert_eq!(ids(&groups["Unknown"]), vec![2]);

        let stats = engine.statistics();
        assert_eq!(
            stats.null_counts,
            NullCounts {
                color: 1,
                language: 1,
                country: 1
            }
        );
        assert_eq!(engine.distinct_values(SearchKey::Color), vec!["Red"]);
    }

    #[test]
    fn test_filter_is_case_insensitive_and_ordered() {
        let engine = sample();
        assert_eq!(ids(&engine.filter_by_attribute(SearchKey::Color, "red")), vec![1, 2, 6]);
        assert_eq!(ids(&engine.filter_by_attribute(SearchKey::Language, "FRENCH")), vec![1, 4]);
        assert!(engine.filter_by_attribute(SearchKey::Color, "purple").is_empty());
    }

    #[test]
    fn test_empty_value_matches_only_empty_strings() {
        let engine = sample();
        assert_eq!(ids(&engine.filter_by_attribute(SearchKey::Color, "")), vec![5]);
        assert!(engine.filter_by_attribute(SearchKey::Language, "").is_empty());
    }

    #[test]
    fn test_every_listing_found_by_its_own_color() {
        let engine = sample();
        for listing in engine.listings() {
            if let Some(color) = &listing.color {
                let matches = engine.filter_by_attribute(SearchKey::Color, &color.to_uppercase());
                assert!(matches.iter().any(|found| found.id == listing.id));
            }
        }
    }

    #[test]
    fn test_missing_and_present_partition_collection() {
        let engine = sample();
        for key in Attribute::ALL {
            let missing = engine.listings_missing(key);
            let present = engine
                .listings()
                .iter()
                .filter(|listing| listing.attribute(key).is_some())
                .count();
            assert_eq!(missing.len() + present, engine.len());
            assert!(missing.iter().all(|listing| listing.attribute(key).is_none()));
        }
    }

    #[test]
    fn test_group_by_country_first_occurrence_order() {
        let engine = sample();
        let groups = engine.group_by_country();

        assert_eq!(
            groups.keys().collect::<Vec<_>>(),
            vec!["France", "Brazil", "Unknown"]
        );
        assert_eq!(ids(&groups["France"]), vec![1, 5]);
        assert_eq!(ids(&groups["Unknown"]), vec![4, 6]);

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, engine.len());
    }

    #[test]
    fn test_distinct_values_sorted_and_case_preserving() {
        let engine = sample();
        assert_eq!(
            engine.distinct_values(SearchKey::Color),
            vec!["", "RED", "Red", "Teal", "red"]
        );
        assert_eq!(
            engine.distinct_values(SearchKey::Language),
            vec!["English", "French", "Portuguese", "french"]
        );
        assert_eq!(
            engine.distinct_values(SearchKey::Color),
            engine.distinct_values(SearchKey::Color)
        );
    }

    #[test]
    fn test_distinct_countries_stable_first_occurrence() {
        let engine = sample();
        assert_eq!(engine.distinct_countries(), vec!["France", "Brazil"]);
        assert_eq!(engine.distinct_countries(), engine.distinct_countries());
    }

    #[test]
    fn test_statistics_cross_checks() {
        let engine = sample();
        let stats = engine.statistics();

        assert_eq!(stats.total_listings, 6);
        assert_eq!(stats.unique_countries, 2);
        assert_eq!(stats.unique_colors, 5);
        assert_eq!(stats.unique_languages, 4);
        assert_eq!(stats.null_counts.get(Attribute::Color), 1);
        assert_eq!(stats.null_counts.get(Attribute::Language), 1);
        assert_eq!(stats.null_counts.get(Attribute::Country), 2);

        let folded: BTreeSet<String> = engine
            .distinct_values(SearchKey::Color)
            .iter()
            .map(|value| value.to_lowercase())
            .collect();
        let with_color: usize = folded
            .iter()
            .map(|value| engine.filter_by_attribute(SearchKey::Color, value).len())
            .sum();
        assert_eq!(stats.total_listings, stats.null_counts.color + with_color);
        assert_eq!(stats, engine.statistics());
    }

    #[test]
    fn test_empty_collection() {
        let engine = ListingEngine::default();
        assert!(engine.is_empty());
        assert!(engine.group_by_country().is_empty());
        assert_eq!(engine.statistics(), Statistics::default());
    }

    #[test]
    fn test_get_by_id() {
        let engine = sample();
        assert_eq!(engine.get(3).map(|listing| listing.id), Some(3));
        assert!(engine.get(42).is_none());
    }
}
