use crate::core::engine::{ListingEngine, UNKNOWN_COUNTRY};
use crate::domain::attribute::{Attribute, SearchKey};
use crate::domain::model::{CountryGroups, Listing, Statistics};
use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::str::FromStr;

const NOT_SPECIFIED: &str = "Not specified";
const LISTING_HEADER: [&str; 7] = [
    "id",
    "first_name",
    "last_name",
    "email",
    "country",
    "language",
    "color",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    Csv,
    Tsv,
    #[default]
    Table,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 4] = ["json", "csv", "tsv", "table"];
}

impl FromStr for OutputFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "table" => Ok(OutputFormat::Table),
            _ => Err(EngineError::UnsupportedFormat {
                format: s.to_string(),
                allowed: Self::NAMES.join(", "),
            }),
        }
    }
}

/// One row of the by-country view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryGroup<'a> {
    pub country: String,
    pub listing_count: usize,
    pub highlight_count: usize,
    pub listings: Vec<&'a Listing>,
}

/// Orders groups for display: most highlighted first, then "Unknown" last, then by name.
pub fn country_overview<'a>(
    groups: CountryGroups<'a>,
    highlighted: &[&Listing],
) -> Vec<CountryGroup<'a>> {
    let highlighted_ids: HashSet<u64> = highlighted.iter().map(|listing| listing.id).collect();

    let mut overview: Vec<CountryGroup<'a>> = groups
        .into_iter()
        .map(|(country, listings)| CountryGroup {
            highlight_count: listings
                .iter()
                .filter(|listing| highlighted_ids.contains(&listing.id))
                .count(),
            listing_count: listings.len(),
            country,
            listings,
        })
        .collect();

    overview.sort_by(|a, b| {
        b.highlight_count
            .cmp(&a.highlight_count)
            .then_with(|| match (a.country == UNKNOWN_COUNTRY, b.country == UNKNOWN_COUNTRY) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => a
                    .country
                    .to_lowercase()
                    .cmp(&b.country.to_lowercase())
                    .then_with(|| a.country.cmp(&b.country)),
            })
    });
    overview
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissingSummary {
    pub attribute: Attribute,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    #[serde(flatten)]
    pub statistics: Statistics,
    pub missing: Vec<MissingSummary>,
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

impl From<&Statistics> for StatisticsSummary {
    fn from(statistics: &Statistics) -> Self {
        let missing = Attribute::ALL
            .into_iter()
            .map(|attribute| {
                let count = statistics.null_counts.get(attribute);
                MissingSummary {
                    attribute,
                    count,
                    percentage: percentage(count, statistics.total_listings),
                }
            })
            .collect();
        Self {
            statistics: *statistics,
            missing,
        }
    }
}

/// "Missing: Color, Country" style label, or `None` when the listing is complete.
pub fn missing_label(listing: &Listing) -> Option<String> {
    let missing = listing.missing_attributes();
    if missing.is_empty() {
        return None;
    }
    let labels: Vec<&str> = missing.into_iter().map(Attribute::label).collect();
    Some(format!("Missing: {}", labels.join(", ")))
}

#[derive(Debug, Clone, Serialize)]
pub struct Highlight {
    pub key: SearchKey,
    pub value: String,
    pub matches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub generated_at: DateTime<Utc>,
    pub summary: StatisticsSummary,
    pub highlight: Option<Highlight>,
    pub countries: Vec<CountryGroup<'a>>,
}

impl<'a> Report<'a> {
    pub fn build(engine: &'a ListingEngine, highlight: Option<(SearchKey, &str)>) -> Self {
        let highlighted = highlight
            .map(|(key, value)| engine.filter_by_attribute(key, value))
            .unwrap_or_default();
        tracing::debug!("Building report with {} highlighted listings", highlighted.len());

        Self {
            generated_at: Utc::now(),
            summary: StatisticsSummary::from(&engine.statistics()),
            highlight: highlight.map(|(key, value)| Highlight {
                key,
                value: value.to_string(),
                matches: highlighted.len(),
            }),
            countries: country_overview(engine.group_by_country(), &highlighted),
        }
    }
}

fn listing_record(listing: &Listing) -> [String; 7] {
    [
        listing.id.to_string(),
        listing.first_name.clone(),
        listing.last_name.clone(),
        listing.email.clone(),
        listing.country.clone().unwrap_or_default(),
        listing.language.clone().unwrap_or_default(),
        listing.color.clone().unwrap_or_default(),
    ]
}

fn write_delimited<I, R>(header: &[&str], rows: I, delimiter: u8) -> Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| EngineError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| EngineError::ValidationError {
        message: format!("output is not valid UTF-8: {}", e),
    })
}

fn delimiter(format: OutputFormat) -> u8 {
    if format == OutputFormat::Tsv {
        b'\t'
    } else {
        b','
    }
}

fn display(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_SPECIFIED)
}

pub fn render_listings(listings: &[&Listing], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(listings)?),
        OutputFormat::Csv | OutputFormat::Tsv => write_delimited(
            &LISTING_HEADER,
            listings.iter().map(|listing| listing_record(listing)),
            delimiter(format),
        ),
        OutputFormat::Table => {
            let mut out = String::new();
            for listing in listings {
                let _ = writeln!(
                    out,
                    "#{:<5} {:<28} {:<34} {:<20} {:<16} {}",
                    listing.id,
                    listing.full_name(),
                    listing.email,
                    display(listing.country.as_deref()),
                    display(listing.language.as_deref()),
                    display(listing.color.as_deref()),
                );
            }
            let count = listings.len();
            let _ = writeln!(out, "{} result{}", count, if count == 1 { "" } else { "s" });
            Ok(out)
        }
    }
}

pub fn render_values(values: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(values)?),
        OutputFormat::Csv | OutputFormat::Tsv => {
            write_delimited(&["value"], values.iter().map(|value| [value]), delimiter(format))
        }
        OutputFormat::Table => Ok(values.iter().fold(String::new(), |mut out, value| {
            let _ = writeln!(out, "{}", value);
            out
        })),
    }
}

pub fn render_groups(groups: &[CountryGroup<'_>], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(groups)?),
        OutputFormat::Csv | OutputFormat::Tsv => write_delimited(
            &["country", "listings", "matches"],
            groups.iter().map(|group| {
                [
                    group.country.clone(),
                    group.listing_count.to_string(),
                    group.highlight_count.to_string(),
                ]
            }),
            delimiter(format),
        ),
        OutputFormat::Table => {
            let mut out = String::new();
            for group in groups {
                let _ = write!(out, "{:<32} {:>5} listings", group.country, group.listing_count);
                if group.highlight_count > 0 {
                    let plural = if group.highlight_count == 1 { "" } else { "es" };
                    let _ = write!(out, "  {} match{}", group.highlight_count, plural);
                }
                out.push('\n');
            }
            Ok(out)
        }
    }
}

pub fn render_statistics(summary: &StatisticsSummary, format: OutputFormat) -> Result<String> {
    let stats = &summary.statistics;
    let totals = [
        ("total_listings", stats.total_listings),
        ("unique_countries", stats.unique_countries),
        ("unique_colors", stats.unique_colors),
        ("unique_languages", stats.unique_languages),
    ];

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        OutputFormat::Csv | OutputFormat::Tsv => {
            let rows = totals
                .iter()
                .map(|(name, value)| [name.to_string(), value.to_string()])
                .chain(summary.missing.iter().map(|missing| {
                    [format!("missing_{}", missing.attribute), missing.count.to_string()]
                }));
            write_delimited(&["metric", "value"], rows, delimiter(format))
        }
        OutputFormat::Table => {
            let mut out = String::new();
            let _ = writeln!(out, "Total listings    {}", stats.total_listings);
            let _ = writeln!(out, "Countries         {}", stats.unique_countries);
            let _ = writeln!(out, "Colors            {}", stats.unique_colors);
            let _ = writeln!(out, "Languages         {}", stats.unique_languages);
            for missing in &summary.missing {
                let _ = writeln!(
                    out,
                    "Missing {:<9} {} ({:.1}%)",
                    missing.attribute.label(),
                    missing.count,
                    missing.percentage
                );
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NullCounts;

    fn listing(id: u64, country: Option<&str>, color: Option<&str>) -> Listing {
        Listing {
            id,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: format!("g{}@example.com", id),
            country: country.map(str::to_string),
            language: Some("English".to_string()),
            color: color.map(str::to_string),
        }
    }

    #[test]
    fn test_country_overview_ordering() {
        let engine = ListingEngine::new(vec![
            listing(1, Some("Peru"), Some("Blue")),
            listing(2, None, Some("Blue")),
            listing(3, Some("Chile"), Some("Green")),
            listing(4, Some("Argentina"), Some("Green")),
            listing(5, None, Some("Blue")),
        ]);

        let plain = country_overview(engine.group_by_country(), &[]);
        let names: Vec<&str> = plain.iter().map(|group| group.country.as_str()).collect();
        assert_eq!(names, vec!["Argentina", "Chile", "Peru", "Unknown"]);

        let blue = engine.filter_by_attribute(SearchKey::Color, "blue");
        let highlighted = country_overview(engine.group_by_country(), &blue);
        let names: Vec<&str> = highlighted.iter().map(|group| group.country.as_str()).collect();
        assert_eq!(names, vec!["Unknown", "Peru", "Argentina", "Chile"]);
        assert_eq!(highlighted[0].highlight_count, 2);
        assert_eq!(highlighted[0].listing_count, 2);
    }

    #[test]
    fn test_statistics_summary_percentages() {
        let stats = Statistics {
            total_listings: 3,
            unique_countries: 1,
            unique_colors: 1,
            unique_languages: 1,
            null_counts: NullCounts {
                color: 1,
                language: 0,
                country: 2,
            },
        };
        let summary = StatisticsSummary::from(&stats);
        assert_eq!(summary.missing[0].percentage, 33.3);
        assert_eq!(summary.missing[1].percentage, 0.0);
        assert_eq!(summary.missing[2].percentage, 66.7);

        let empty = StatisticsSummary::from(&Statistics::default());
        assert!(empty.missing.iter().all(|missing| missing.percentage == 0.0));
    }

    #[test]
    fn test_missing_label() {
        assert_eq!(
            missing_label(&listing(1, None, None)).as_deref(),
            Some("Missing: Color, Country")
        );
        assert_eq!(missing_label(&listing(1, Some("Peru"), Some("Red"))), None);
    }

    #[test]
    fn test_render_csv_and_tsv_leave_absent_cells_empty() {
        let a = listing(1, None, Some("Red"));
        let csv = render_listings(&[&a], OutputFormat::Csv).unwrap();
        assert_eq!(
            csv,
            "id,first_name,last_name,email,country,language,color\n\
             1,Grace,Hopper,g1@example.com,,English,Red\n"
        );

        let tsv = render_listings(&[&a], OutputFormat::Tsv).unwrap();
        assert!(tsv.lines().nth(1).unwrap().starts_with("1\tGrace\tHopper"));
    }

    #[test]
    fn test_render_table_marks_absence() {
        let a = listing(7, None, None);
        let table = render_listings(&[&a], OutputFormat::Table).unwrap();
        assert!(table.contains("Not specified"));
        assert!(table.ends_with("1 result\n"));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(EngineError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_report_highlight() {
        let engine = ListingEngine::new(vec![
            listing(1, Some("Peru"), Some("Blue")),
            listing(2, Some("Chile"), Some("Red")),
        ]);
        let report = Report::build(&engine, Some((SearchKey::Color, "RED")));
        assert_eq!(report.highlight.as_ref().map(|h| h.matches), Some(1));
        assert_eq!(report.countries[0].country, "Chile");
        assert_eq!(report.summary.statistics.total_listings, 2);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["total_listings"], 2);
        assert_eq!(json["highlight"]["key"], "color");
    }

    fn group<'a>(country: &str, listing_count: usize, highlight_count: usize) -> CountryGroup<'a> {
        CountryGroup {
            country: country.to_string(),
            listing_count,
            highlight_count,
            listings: Vec::new(),
        }
    }

    fn summary() -> StatisticsSummary {
        StatisticsSummary::from(&Statistics {
            total_listings: 4,
            unique_countries: 2,
            unique_colors: 3,
            unique_languages: 1,
            null_counts: NullCounts {
                color: 1,
                language: 0,
                country: 2,
            },
        })
    }

    #[test]
    fn test_country_names_compare_ignoring_case() {
        let engine = ListingEngine::new(vec![
            listing(1, Some("brazil"), None),
            listing(2, Some("Chile"), None),
            listing(3, Some("Argentina"), None),
            listing(4, Some("Brazil"), None),
        ]);
        let overview = country_overview(engine.group_by_country(), &[]);
        let names: Vec<&str> = overview.iter().map(|group| group.country.as_str()).collect();
        assert_eq!(names, vec!["Argentina", "Brazil", "brazil", "Chile"]);
    }

    #[test]
    fn test_render_values_formats() {
        let values = vec!["Red".to_string(), "Teal".to_string()];

        assert_eq!(render_values(&values, OutputFormat::Csv).unwrap(), "value\nRed\nTeal\n");
        assert_eq!(render_values(&values, OutputFormat::Tsv).unwrap(), "value\nRed\nTeal\n");
        assert_eq!(render_values(&values, OutputFormat::Table).unwrap(), "Red\nTeal\n");

        let json: Vec<String> =
            serde_json::from_str(&render_values(&values, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json, values);
    }

    #[test]
    fn test_render_groups_formats() {
        let groups = vec![group("Peru", 3, 2), group("Chile", 2, 1), group("Unknown", 1, 0)];

        assert_eq!(
            render_groups(&groups, OutputFormat::Csv).unwrap(),
            "country,listings,matches\nPeru,3,2\nChile,2,1\nUnknown,1,0\n"
        );
        assert_eq!(
            render_groups(&groups, OutputFormat::Tsv).unwrap(),
            "country\tlistings\tmatches\nPeru\t3\t2\nChile\t2\t1\nUnknown\t1\t0\n"
        );

        let table = render_groups(&groups, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("3 listings  2 matches"));
        assert!(lines[1].ends_with("2 listings  1 match"));
        assert!(lines[2].ends_with("1 listings"));

        let json: serde_json::Value =
            serde_json::from_str(&render_groups(&groups, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json[0]["country"], "Peru");
        assert_eq!(json[1]["highlight_count"], 1);
        assert_eq!(json[2]["listing_count"], 1);
    }

    #[test]
    fn test_render_statistics_formats() {
        let summary = summary();

        let csv = render_statistics(&summary, OutputFormat::Csv).unwrap();
        assert_eq!(
            csv,
            "metric,value\n\
             total_listings,4\n\
             unique_countries,2\n\
             unique_colors,3\n\
             unique_languages,1\n\
             missing_color,1\n\
             missing_language,0\n\
             missing_country,2\n"
        );
        let tsv = render_statistics(&summary, OutputFormat::Tsv).unwrap();
        assert!(tsv.contains("missing_country\t2\n"));

        let table = render_statistics(&summary, OutputFormat::Table).unwrap();
        assert!(table.contains("Total listings    4"));
        assert!(table.contains("Missing Color     1 (25.0%)"));
        assert!(table.contains("Missing Country   2 (50.0%)"));

        let json: serde_json::Value =
            serde_json::from_str(&render_statistics(&summary, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["total_listings"], 4);
        assert_eq!(json["null_counts"]["country"], 2);
        assert_eq!(json["missing"][0]["attribute"], "color");
        assert_eq!(json["missing"][2]["percentage"], 50.0);
    }
}
