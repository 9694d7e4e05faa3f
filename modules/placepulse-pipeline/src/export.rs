//! CSV export/import of reviews, place metadata and location summaries.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use placepulse_common::{
    format_utc, CollectedReview, LocationSummary, PlacePulseError, ReviewRecord,
};

use crate::aggregate::PlaceReport;
use crate::sentiment::{analyze_reviews, PolarityAnalyzer};
use crate::text::repair_mojibake;

pub type Result<T> = std::result::Result<T, PlacePulseError>;

/// Review export columns, in order.
pub const REVIEW_COLUMNS: [&str; 8] = [
    "place_id",
    "location_name",
    "author_name",
    "rating",
    "datetime_utc",
    "text",
    "text_clean",
    "sentiment",
];

/// Columns a file must carry to be re-cleaned; the rest default to empty.
pub const CLEAN_INPUT_COLUMNS: [&str; 2] = ["author_name", "text"];

fn require_columns(headers: &csv::StringRecord, columns: &[&str]) -> Result<()> {
    for column in columns {
        if !headers.iter().any(|h| h == *column) {
            return Err(PlacePulseError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

// --- Reviews ---

pub fn write_reviews_csv<W: Write>(writer: W, reviews: &[ReviewRecord]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if reviews.is_empty() {
        csv.write_record(REVIEW_COLUMNS)?;
    }
    for review in reviews {
        csv.serialize(review)?;
    }
    csv.flush()?;
    Ok(())
}

/// Read reviews previously written by [`write_reviews_csv`]. Every export
/// column must be present; extra columns are ignored.
pub fn read_reviews_csv<R: Read>(reader: R) -> Result<Vec<ReviewRecord>> {
    let mut csv = csv::Reader::from_reader(reader);
    require_columns(csv.headers()?, &REVIEW_COLUMNS)?;

    let mut reviews = Vec::new();
    for row in csv.deserialize() {
        reviews.push(row?);
    }
    Ok(reviews)
}

pub fn export_reviews(path: &Path, reviews: &[ReviewRecord]) -> Result<()> {
    let file = File::create(path)?;
    write_reviews_csv(file, reviews)?;
    info!(path = %path.display(), count = reviews.len(), "Reviews exported");
    Ok(())
}

pub fn load_reviews(path: &Path) -> Result<Vec<ReviewRecord>> {
    let file = File::open(path)?;
    let reviews = read_reviews_csv(file)?;
    info!(path = %path.display(), count = reviews.len(), "Reviews loaded");
    Ok(reviews)
}

/// Read raw reviews for re-cleaning. Only [`CLEAN_INPUT_COLUMNS`] are
/// required, so both a full export and a collector-only file are accepted.
/// Derived columns, if present, are ignored.
pub fn read_collected_csv<R: Read>(reader: R) -> Result<Vec<CollectedReview>> {
    let mut csv = csv::Reader::from_reader(reader);
    require_columns(csv.headers()?, &CLEAN_INPUT_COLUMNS)?;

    let mut reviews = Vec::new();
    for row in csv.deserialize() {
        reviews.push(row?);
    }
    Ok(reviews)
}

pub fn load_collected(path: &Path) -> Result<Vec<CollectedReview>> {
    let reviews = read_collected_csv(File::open(path)?)?;
    info!(path = %path.display(), count = reviews.len(), "Raw reviews loaded");
    Ok(reviews)
}

/// Repair double-encoded `author_name` / `text`, then recompute the derived fields.
pub fn reclean(
    reviews: Vec<CollectedReview>,
    analyzer: &dyn PolarityAnalyzer,
) -> Vec<ReviewRecord> {
    let repaired = reviews
        .into_iter()
        .map(|mut review| {
            review.author_name = repair_mojibake(&review.author_name).into_owned();
            review.text = repair_mojibake(&review.text).into_owned();
            review
        })
        .collect();
    analyze_reviews(repaired, analyzer)
}

// --- Summaries ---

const SUMMARY_COLUMNS: [&str; 5] = [
    "location_name",
    "review_count",
    "avg_rating",
    "pct_positive",
    "last_review_date",
];

pub fn write_summary_csv<W: Write>(
    writer: W,
    summaries: &BTreeMap<String, LocationSummary>,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if summaries.is_empty() {
        csv.write_record(SUMMARY_COLUMNS)?;
    }
    for summary in summaries.values() {
        csv.serialize(summary)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_summaries(path: &Path, summaries: &BTreeMap<String, LocationSummary>) -> Result<()> {
    write_summary_csv(File::create(path)?, summaries)?;
    info!(path = %path.display(), count = summaries.len(), "Location summaries exported");
    Ok(())
}

// --- Place metadata, joined with summaries ---

const METADATA_COLUMNS: [&str; 13] = [
    "place_id",
    "name",
    "rating",
    "user_ratings_total",
    "formatted_address",
    "types",
    "lat",
    "lng",
    "phone",
    "website",
    "price_level",
    "business_status",
    "open_now",
];

#[derive(Serialize)]
struct PlaceReportRow<'a> {
    place_id: &'a str,
    name: &'a str,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    formatted_address: Option<&'a str>,
    types: String,
    lat: Option<f64>,
    lng: Option<f64>,
    phone: Option<&'a str>,
    website: Option<&'a str>,
    price_level: Option<u8>,
    business_status: Option<&'a str>,
    open_now: Option<bool>,
    review_count: Option<usize>,
    avg_rating: Option<f64>,
    pct_positive: Option<f64>,
    last_review_date: Option<String>,
}

impl<'a> From<&'a PlaceReport> for PlaceReportRow<'a> {
    fn from(report: &'a PlaceReport) -> Self {
        let m = &report.metadata;
        let summary = report.summary.as_ref();
        Self {
            place_id: &m.place_id,
            name: &m.name,
            rating: m.rating,
            user_ratings_total: m.user_ratings_total,
            formatted_address: m.formatted_address.as_deref(),
            types: m.types.join("|"),
            lat: m.location.map(|p| p.lat),
            lng: m.location.map(|p| p.lng),
            phone: m.phone.as_deref(),
            website: m.website.as_deref(),
            price_level: m.price_level,
            business_status: m.business_status.as_deref(),
            open_now: m.open_now,
            review_count: summary.map(|s| s.review_count),
            avg_rating: summary.and_then(|s| s.avg_rating),
            pct_positive: summary.map(|s| s.pct_positive),
            last_review_date: summary
                .and_then(|s| s.last_review_date.as_ref())
                .map(format_utc),
        }
    }
}

/// Metadata columns followed by the summary columns (minus `location_name`).
/// `types` is joined with `|`. Summary fields stay empty for places whose
/// name matched no summary.
pub fn write_place_reports_csv<W: Write>(writer: W, reports: &[PlaceReport]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if reports.is_empty() {
        let header: Vec<&str> = METADATA_COLUMNS
            .iter()
            .chain(&SUMMARY_COLUMNS[1..])
            .copied()
            .collect();
        csv.write_record(header)?;
    }
    for report in reports {
        csv.serialize(PlaceReportRow::from(report))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_place_reports(path: &Path, reports: &[PlaceReport]) -> Result<()> {
    write_place_reports_csv(File::create(path)?, reports)?;
    let matched = reports.iter().filter(|r| r.summary.is_some()).count();
    info!(path = %path.display(), count = reports.len(), matched, "Place reports exported");
    Ok(())
}
