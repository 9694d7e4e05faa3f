//! Batch orchestration: place tokens in, analyzed reviews and metadata out.
//!
//! Places are processed one at a time, in input order. A failure on one place
//! is logged and recorded in its [`PlaceOutcome`]; later places still run.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{info, warn};

use placepulse_common::{LocationSummary, PlaceMetadata, ReviewRecord};

use crate::aggregate::{
    join_metadata, kpis, sentiment_distribution, summarize, PlaceReport, ReviewKpis,
};
use crate::metadata::collect_metadata;
use crate::resolver::resolve;
use crate::reviews::{collect_reviews, ReviewOptions, StopReason};
use crate::sentiment::{analyze_reviews, PolarityAnalyzer};
use crate::traits::PlacesApi;

const PLACE_ID_PREFIX: &str = "pid:";

/// A caller-supplied place: either a raw place identifier or a name to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceToken {
    Id(String),
    Name(String),
}

impl PlaceToken {
    /// `pid:<id>` is an identifier, anything else is a name. Blank lines are skipped.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match line.strip_prefix(PLACE_ID_PREFIX) {
            Some(id) => Some(PlaceToken::Id(id.trim().to_string())),
            None => Some(PlaceToken::Name(line.to_string())),
        }
    }
}

impl fmt::Display for PlaceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceToken::Id(id) => write!(f, "{PLACE_ID_PREFIX}{id}"),
            PlaceToken::Name(name) => f.write_str(name),
        }
    }
}

/// Parse one token per line.
pub fn parse_tokens(input: &str) -> Vec<PlaceToken> {
    input.lines().filter_map(PlaceToken::parse).collect()
}

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub reviews: ReviewOptions,
    /// Also fetch aggregate metadata (one extra details call per place).
    pub include_metadata: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaceStatus {
    Complete,
    Partial(StopReason),
    Unresolved,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOutcome {
    pub token: PlaceToken,
    pub place_id: Option<String>,
    pub display_name: Option<String>,
    pub review_count: usize,
    pub status: PlaceStatus,
}

impl PlaceOutcome {
    /// User-facing warning for a place that did not fully succeed.
    pub fn warning(&self) -> Option<String> {
        match &self.status {
            PlaceStatus::Complete => None,
            PlaceStatus::Unresolved => Some(format!("No place_id found for '{}'", self.token)),
            PlaceStatus::Partial(reason) => Some(format!(
                "Reviews for '{}' may be incomplete ({} kept): {reason}",
                self.token, self.review_count
            )),
        }
    }
}

/// Everything one batch produced. Owned by the caller; nothing is kept between runs.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub reviews: Vec<ReviewRecord>,
    pub metadata: Vec<PlaceMetadata>,
    pub places: Vec<PlaceOutcome>,
}

impl BatchReport {
    pub fn summaries(&self) -> BTreeMap<String, LocationSummary> {
        summarize(&self.reviews)
    }

    /// Collected metadata joined with the per-location summaries by name.
    pub fn place_reports(&self) -> Vec<PlaceReport> {
        join_metadata(&self.metadata, &self.summaries())
    }

    pub fn kpis(&self) -> ReviewKpis {
        kpis(&self.reviews)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.places.iter().filter_map(PlaceOutcome::warning).collect()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Review Batch Complete ===")?;
        writeln!(f, "{}", self.kpis())?;

        writeln!(f, "\nSentiment:")?;
        writeln!(f, "{}", sentiment_distribution(&self.reviews))?;

        writeln!(f, "\nBy location:")?;
        for summary in self.summaries().values() {
            writeln!(f, "  {summary}")?;
        }

        let warnings = self.warnings();
        if !warnings.is_empty() {
            writeln!(f, "\nWarnings:")?;
            for w in warnings {
                writeln!(f, "  {w}")?;
            }
        }
        Ok(())
    }
}

/// Run the full pipeline over `tokens`: resolve names, collect reviews (and
/// optionally metadata), normalize and classify, and combine everything into
/// one report.
pub async fn run_batch(
    api: &dyn PlacesApi,
    analyzer: &dyn PolarityAnalyzer,
    tokens: &[PlaceToken],
    options: &BatchOptions,
) -> BatchReport {
    let mut report = BatchReport::default();
    info!(places = tokens.len(), "Starting review batch");

    for (idx, token) in tokens.iter().enumerate() {
        info!(index = idx + 1, token = %token, "Processing place");

        let place_id = match token {
            PlaceToken::Id(id) => id.clone(),
            PlaceToken::Name(name) => match resolve(api, name).await {
                Some(candidate) => candidate.place_id,
                None => {
                    warn!(token = %token, "Skipping place: no place_id");
                    report.places.push(PlaceOutcome {
                        token: token.clone(),
                        place_id: None,
                        display_name: None,
                        review_count: 0,
                        status: PlaceStatus::Unresolved,
                    });
                    continue;
                }
            },
        };

        let fetch = collect_reviews(api, &place_id, &options.reviews).await;
        let status = match fetch.stop_reason() {
            None => PlaceStatus::Complete,
            Some(reason) => PlaceStatus::Partial(reason.clone()),
        };
        let display_name = fetch.display_name.clone();
        let collected = fetch.into_reviews();
        info!(place_id = %place_id, count = collected.len(), "Reviews fetched");

        if options.include_metadata {
            if let Some(metadata) = collect_metadata(api, &place_id).await {
                report.metadata.push(metadata);
            }
        }

        report.places.push(PlaceOutcome {
            token: token.clone(),
            place_id: Some(place_id),
            display_name: Some(display_name),
            review_count: collected.len(),
            status,
        });
        report.reviews.extend(analyze_reviews(collected, analyzer));
    }

    if report.reviews.is_empty() {
        warn!("No reviews collected");
    }
    report
}
