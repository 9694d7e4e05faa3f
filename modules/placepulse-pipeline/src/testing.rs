// Test mocks for the review pipeline.
//
// - MockPlaces (PlacesApi): HashMap-based query/place_id -> canned response,
//   records every call so tests can count requests.
// - FixedPolarity (PolarityAnalyzer): constant score, counts invocations.
//
// Plus fixture builders for upstream payloads.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use places_client::{
    ApiStatus, Candidate, DetailsRequest, DetailsResponse, FindPlaceResponse, Geometry, LatLng,
    OpeningHours, PlaceDetails, PlacesError, Review,
};

use crate::sentiment::PolarityAnalyzer;
use crate::traits::PlacesApi;

// ---------------------------------------------------------------------------
// MockPlaces
// ---------------------------------------------------------------------------

/// One request seen by [`MockPlaces`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FindPlace {
        query: String,
    },
    Details {
        place_id: String,
        fields: Vec<String>,
        language: Option<String>,
        page_token: Option<String>,
    },
}

/// Returns `Err` for anything not registered.
/// Builder pattern: `.on_find()`, `.on_review_page()`, `.on_metadata()`, `.fail_details()`.
#[derive(Default)]
pub struct MockPlaces {
    finds: HashMap<String, FindPlaceResponse>,
    review_pages: HashMap<(String, Option<String>), DetailsResponse>,
    metadata: HashMap<String, DetailsResponse>,
    failing: HashSet<String>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_find(mut self, query: &str, response: FindPlaceResponse) -> Self {
        self.finds.insert(query.to_string(), response);
        self
    }

    /// Register a review page. `page_token` is the token the page is requested with
    /// (`None` for the first page).
    pub fn on_review_page(
        mut self,
        place_id: &str,
        page_token: Option<&str>,
        response: DetailsResponse,
    ) -> Self {
        self.review_pages.insert(
            (place_id.to_string(), page_token.map(String::from)),
            response,
        );
        self
    }

    pub fn on_metadata(mut self, place_id: &str, response: DetailsResponse) -> Self {
        self.metadata.insert(place_id.to_string(), response);
        self
    }

    /// Every details call for this place fails at the transport level.
    pub fn fail_details(mut self, place_id: &str) -> Self {
        self.failing.insert(place_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn find_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::FindPlace { .. }))
            .count()
    }

    pub fn details_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::Details { .. }))
            .count()
    }

    pub fn details_calls_for(&self, place_id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::Details { place_id: p, .. } if p == place_id))
            .count()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PlacesApi for MockPlaces {
    async fn find_place(&self, query: &str) -> places_client::Result<FindPlaceResponse> {
        self.record(ApiCall::FindPlace {
            query: query.to_string(),
        });
        self.finds.get(query).cloned().ok_or_else(|| {
            PlacesError::Network(format!("MockPlaces: no find_place registered for {query}"))
        })
    }

    async fn place_details(
        &self,
        request: &DetailsRequest,
    ) -> places_client::Result<DetailsResponse> {
        self.record(ApiCall::Details {
            place_id: request.place_id.clone(),
            fields: request.fields.clone(),
            language: request.language.clone(),
            page_token: request.page_token.clone(),
        });

        if self.failing.contains(&request.place_id) {
            return Err(PlacesError::Network(format!(
                "MockPlaces: connection reset for {}",
                request.place_id
            )));
        }

        let found = if request.fields.iter().any(|f| f == "reviews") {
            self.review_pages
                .get(&(request.place_id.clone(), request.page_token.clone()))
        } else {
            self.metadata.get(&request.place_id)
        };

        found.cloned().ok_or_else(|| {
            PlacesError::Network(format!(
                "MockPlaces: no details registered for {} (token {:?})",
                request.place_id, request.page_token
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// FixedPolarity
// ---------------------------------------------------------------------------

/// Returns the same score for every text.
pub struct FixedPolarity {
    score: f64,
    calls: AtomicUsize,
}

impl FixedPolarity {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PolarityAnalyzer for FixedPolarity {
    fn polarity(&self, _text: &str) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.score
    }
}

/// Scores by keyword: +0.8 for any positive word, -0.8 for any negative word, else 0.
pub struct KeywordPolarity;

impl PolarityAnalyzer for KeywordPolarity {
    fn polarity(&self, text: &str) -> f64 {
        const POSITIVE: [&str; 4] = ["excelente", "bueno", "great", "delicioso"];
        const NEGATIVE: [&str; 4] = ["malo", "terrible", "awful", "sucio"];

        if POSITIVE.iter().any(|w| text.contains(w)) {
            0.8
        } else if NEGATIVE.iter().any(|w| text.contains(w)) {
            -0.8
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn review(author: &str, rating: Option<f64>, text: &str, time: Option<i64>) -> Review {
    Review {
        author_name: Some(author.to_string()),
        rating,
        text: Some(text.to_string()),
        time,
        language: None,
        relative_time_description: None,
    }
}

pub fn review_page(name: Option<&str>, reviews: Vec<Review>, next: Option<&str>) -> DetailsResponse {
    DetailsResponse {
        status: ApiStatus::Ok,
        result: Some(PlaceDetails {
            name: name.map(String::from),
            reviews,
            ..Default::default()
        }),
        next_page_token: next.map(String::from),
        error_message: None,
    }
}

pub fn details_status(status: ApiStatus) -> DetailsResponse {
    DetailsResponse {
        status,
        result: None,
        next_page_token: None,
        error_message: None,
    }
}

pub fn metadata_page(name: &str, rating: f64, total: u32) -> DetailsResponse {
    DetailsResponse {
        status: ApiStatus::Ok,
        result: Some(PlaceDetails {
            name: Some(name.to_string()),
            rating: Some(rating),
            user_ratings_total: Some(total),
            formatted_address: Some(format!("{name} 123, Centro")),
            types: vec!["restaurant".to_string(), "food".to_string()],
            geometry: Some(Geometry {
                location: LatLng {
                    lat: 19.4326,
                    lng: -99.1332,
                },
            }),
            formatted_phone_number: Some("55 1234 5678".to_string()),
            website: None,
            price_level: Some(2),
            business_status: Some("OPERATIONAL".to_string()),
            opening_hours: Some(OpeningHours {
                open_now: Some(true),
            }),
            ..Default::default()
        }),
        next_page_token: None,
        error_message: None,
    }
}

pub fn find_ok(place_id: &str, name: &str, address: &str) -> FindPlaceResponse {
    FindPlaceResponse {
        status: ApiStatus::Ok,
        candidates: vec![Candidate {
            place_id: Some(place_id.to_string()),
            name: Some(name.to_string()),
            formatted_address: Some(address.to_string()),
        }],
        error_message: None,
    }
}

pub fn find_status(status: ApiStatus) -> FindPlaceResponse {
    FindPlaceResponse {
        status,
        candidates: Vec::new(),
        error_message: None,
    }
}
