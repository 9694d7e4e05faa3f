//! Review collection over the paginated details endpoint.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use placepulse_common::config::DEFAULT_PAGE_DELAY;
use placepulse_common::{datetime_from_epoch, CollectedReview, Config};
use places_client::{ApiStatus, DetailsRequest, Review, REVIEW_FIELDS};

use crate::traits::PlacesApi;

/// Location name used until a page supplies one.
pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct ReviewOptions {
    /// Language hint forwarded to the details endpoint.
    pub language: Option<String>,
    /// Pause before requesting a page with a continuation token.
    pub page_delay: Duration,
    /// Keep only the N most recent reviews. `None` keeps upstream order and count.
    pub most_recent: Option<usize>,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            language: None,
            page_delay: DEFAULT_PAGE_DELAY,
            most_recent: None,
        }
    }
}

impl ReviewOptions {
    /// Options from loaded config, with any explicitly given value taking
    /// precedence over its config counterpart.
    pub fn from_config(
        config: &Config,
        language: Option<String>,
        most_recent: Option<usize>,
        page_delay: Option<Duration>,
    ) -> Self {
        Self {
            language: language.or_else(|| config.language.clone()),
            page_delay: page_delay.unwrap_or(config.page_delay),
            most_recent: most_recent.or(config.most_recent),
        }
    }
}

/// Why pagination stopped before the last page.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    Status(ApiStatus),
    Transport(String),
    InvalidPlaceId,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Status(status) => write!(f, "API status {status}"),
            StopReason::Transport(err) => write!(f, "transport failure: {err}"),
            StopReason::InvalidPlaceId => write!(f, "empty place_id"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Complete(Vec<CollectedReview>),
    /// Pagination stopped early; reviews gathered so far are kept.
    Partial {
        reviews: Vec<CollectedReview>,
        reason: StopReason,
    },
}

/// Result of collecting one place's reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewFetch {
    pub display_name: String,
    pub outcome: FetchOutcome,
}

impl ReviewFetch {
    pub fn reviews(&self) -> &[CollectedReview] {
        match &self.outcome {
            FetchOutcome::Complete(reviews) => reviews,
            FetchOutcome::Partial { reviews, .. } => reviews,
        }
    }

    pub fn into_reviews(self) -> Vec<CollectedReview> {
        match self.outcome {
            FetchOutcome::Complete(reviews) => reviews,
            FetchOutcome::Partial { reviews, .. } => reviews,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Complete(_))
    }

    pub fn stop_reason(&self) -> Option<&StopReason> {
        match &self.outcome {
            FetchOutcome::Complete(_) => None,
            FetchOutcome::Partial { reason, .. } => Some(reason),
        }
    }
}

/// Collect every review for a place, following continuation tokens.
///
/// Pages are fetched strictly one after another with `page_delay` between
/// them. A non-OK status or transport failure ends pagination and the result
/// is `Partial` with whatever was already gathered.
pub async fn collect_reviews(
    api: &dyn PlacesApi,
    place_id: &str,
    options: &ReviewOptions,
) -> ReviewFetch {
    if place_id.trim().is_empty() {
        warn!("Empty place_id, skipping review download");
        return ReviewFetch {
            display_name: UNKNOWN_LOCATION.to_string(),
            outcome: FetchOutcome::Partial {
                reviews: Vec::new(),
                reason: StopReason::InvalidPlaceId,
            },
        };
    }

    let mut reviews = Vec::new();
    let mut display_name: Option<String> = None;
    let mut page_token: Option<String> = None;
    let mut pages = 0u32;

    let stopped = loop {
        let request = DetailsRequest::new(place_id, REVIEW_FIELDS)
            .language(options.language.as_deref())
            .page_token(page_token.as_deref());

        let response = match api.place_details(&request).await {
            Ok(r) => r,
            Err(e) => {
                warn!(place_id, error = %e, "Review download failed");
                break Some(StopReason::Transport(e.to_string()));
            }
        };
        pages += 1;

        if !response.status.is_ok() {
            warn!(
                place_id,
                status = %response.status,
                page = pages,
                "Details returned non-OK status, stopping"
            );
            break Some(StopReason::Status(response.status));
        }

        let result = response.result.unwrap_or_default();
        if display_name.is_none() {
            display_name = result.name;
        }
        let location_name = display_name.as_deref().unwrap_or(UNKNOWN_LOCATION);

        debug!(place_id, page = pages, count = result.reviews.len(), "Review page received");
        reviews.extend(
            result
                .reviews
                .into_iter()
                .map(|r| to_collected(place_id, location_name, r)),
        );

        match response.next_page_token.filter(|t| !t.is_empty()) {
            Some(token) => {
                debug!(place_id, delay = ?options.page_delay, "More reviews available, waiting for token");
                tokio::time::sleep(options.page_delay).await;
                page_token = Some(token);
            }
            None => break None,
        }
    };

    if let Some(limit) = options.most_recent {
        keep_most_recent(&mut reviews, limit);
    }

    let display_name = display_name.unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
    info!(place_id, name = %display_name, count = reviews.len(), "Reviews collected");

    let outcome = match stopped {
        None => FetchOutcome::Complete(reviews),
        Some(reason) => FetchOutcome::Partial { reviews, reason },
    };
    ReviewFetch {
        display_name,
        outcome,
    }
}

/// Sort newest first (absent timestamps last, ties keep upstream order) and truncate.
pub fn keep_most_recent(reviews: &mut Vec<CollectedReview>, limit: usize) {
    reviews.sort_by(|a, b| b.datetime_utc.cmp(&a.datetime_utc));
    reviews.truncate(limit);
}

fn to_collected(place_id: &str, location_name: &str, review: Review) -> CollectedReview {
    CollectedReview {
        place_id: place_id.to_string(),
        location_name: location_name.to_string(),
        author_name: review.author_name.unwrap_or_default(),
        rating: review.rating.and_then(star_rating),
        datetime_utc: review.time.and_then(datetime_from_epoch),
        text: review.text.unwrap_or_default(),
    }
}

/// Upstream ratings are whole stars 1-5; anything else is treated as absent.
fn star_rating(raw: f64) -> Option<u8> {
    let rounded = raw.round();
    if raw.is_finite() && (1.0..=5.0).contains(&rounded) {
        Some(rounded as u8)
    } else {
        None
    }
}
