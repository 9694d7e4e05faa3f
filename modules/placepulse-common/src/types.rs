use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Fixed UTC timestamp layout used for `datetime_utc` everywhere (CSV, reports).
pub const UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert an upstream epoch-seconds value to a naive UTC timestamp.
/// Zero and out-of-range values are treated as absent.
pub fn datetime_from_epoch(secs: i64) -> Option<NaiveDateTime> {
    if secs == 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

pub fn format_utc(dt: &NaiveDateTime) -> String {
    dt.format(UTC_FORMAT).to_string()
}

/// Serde adapter for `Option<NaiveDateTime>` in [`UTC_FORMAT`]; absent is an empty field.
pub mod utc_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::UTC_FORMAT;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(UTC_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(s, UTC_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

// --- Sentiment ---

/// Three-way sentiment label. Never null for an analyzed review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// --- Reviews ---

/// A review as materialized by the collector, before text analysis.
/// Columns missing from an input file deserialize as empty/absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectedReview {
    pub place_id: String,
    pub location_name: String,
    pub author_name: String,
    pub rating: Option<u8>,
    #[serde(with = "utc_format")]
    pub datetime_utc: Option<NaiveDateTime>,
    pub text: String,
}

/// An analyzed review. Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub place_id: String,
    pub location_name: String,
    pub author_name: String,
    pub rating: Option<u8>,
    #[serde(with = "utc_format")]
    pub datetime_utc: Option<NaiveDateTime>,
    pub text: String,
    pub text_clean: String,
    pub sentiment: Sentiment,
}

impl ReviewRecord {
    pub fn from_collected(review: CollectedReview, text_clean: String, sentiment: Sentiment) -> Self {
        Self {
            place_id: review.place_id,
            location_name: review.location_name,
            author_name: review.author_name,
            rating: review.rating,
            datetime_utc: review.datetime_utc,
            text: review.text,
            text_clean,
            sentiment,
        }
    }
}

// --- Places ---

/// First candidate of a find-place lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub place_id: String,
    pub display_name: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Aggregate metadata for one place. Upstream omits fields freely, so
/// everything but the identifiers is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceMetadata {
    pub place_id: String,
    pub name: String,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub formatted_address: Option<String>,
    pub types: Vec<String>,
    pub location: Option<GeoPoint>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub price_level: Option<u8>,
    pub business_status: Option<String>,
    pub open_now: Option<bool>,
}

// --- Aggregates ---

/// Per-location rollup of analyzed reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub location_name: String,
    pub review_count: usize,
    /// Mean of present ratings; `None` when the group has no ratings.
    pub avg_rating: Option<f64>,
    /// Share of reviews labelled positive, 0-100.
    pub pct_positive: f64,
    #[serde(with = "utc_format")]
    pub last_review_date: Option<NaiveDateTime>,
}

impl fmt::Display for LocationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let avg = self
            .avg_rating
            .map(|r| format!("{r:.2}"))
            .unwrap_or_else(|| "-".to_string());
        let last = self
            .last_review_date
            .as_ref()
            .map(format_utc)
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} | reviews {} | avg {} | positive {:.1}% | last {}",
            self.location_name, self.review_count, avg, self.pct_positive, last
        )
    }
}
