use std::fmt;

use serde::{Deserialize, Serialize};

/// Fields requested when collecting a place's reviews.
pub const REVIEW_FIELDS: &[&str] = &["name", "reviews"];

/// Fields requested when collecting a place's aggregate metadata.
pub const METADATA_FIELDS: &[&str] = &[
    "name",
    "rating",
    "user_ratings_total",
    "formatted_address",
    "types",
    "geometry/location",
    "formatted_phone_number",
    "website",
    "price_level",
    "business_status",
    "opening_hours/open_now",
];

/// Fields requested from the find-place endpoint.
pub const CANDIDATE_FIELDS: &[&str] = &["place_id", "name", "formatted_address"];

// --- Status ---

/// Top-level `status` string returned by every Places endpoint.
/// Only `Ok` means the payload can be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApiStatus {
    Ok,
    ZeroResults,
    NotFound,
    InvalidRequest,
    OverQueryLimit,
    RequestDenied,
    UnknownError,
    Other(String),
}

impl ApiStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ApiStatus::Ok)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ApiStatus::Ok => "OK",
            ApiStatus::ZeroResults => "ZERO_RESULTS",
            ApiStatus::NotFound => "NOT_FOUND",
            ApiStatus::InvalidRequest => "INVALID_REQUEST",
            ApiStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            ApiStatus::RequestDenied => "REQUEST_DENIED",
            ApiStatus::UnknownError => "UNKNOWN_ERROR",
            ApiStatus::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for ApiStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OK" => ApiStatus::Ok,
            "ZERO_RESULTS" => ApiStatus::ZeroResults,
            "NOT_FOUND" => ApiStatus::NotFound,
            "INVALID_REQUEST" => ApiStatus::InvalidRequest,
            "OVER_QUERY_LIMIT" => ApiStatus::OverQueryLimit,
            "REQUEST_DENIED" => ApiStatus::RequestDenied,
            "UNKNOWN_ERROR" => ApiStatus::UnknownError,
            _ => ApiStatus::Other(s),
        }
    }
}

impl From<&str> for ApiStatus {
    fn from(s: &str) -> Self {
        ApiStatus::from(s.to_string())
    }
}

impl From<ApiStatus> for String {
    fn from(status: ApiStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Find place ---

/// Response from `findplacefromtext`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindPlaceResponse {
    pub status: ApiStatus,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// A single match from the find-place lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
}

// --- Place details ---

/// Parameters for one call to the details endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsRequest {
    pub place_id: String,
    pub fields: Vec<String>,
    pub language: Option<String>,
    pub page_token: Option<String>,
}

impl DetailsRequest {
    pub fn new(place_id: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            place_id: place_id.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            language: None,
            page_token: None,
        }
    }

    pub fn language(mut self, language: Option<&str>) -> Self {
        self.language = language.map(String::from);
        self
    }

    pub fn page_token(mut self, token: Option<&str>) -> Self {
        self.page_token = token.map(String::from);
        self
    }

    /// Comma-joined field mask as sent on the wire.
    pub fn field_mask(&self) -> String {
        self.fields.join(",")
    }
}

/// Response from the details endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailsResponse {
    pub status: ApiStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PlaceDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// The `result` object of a details response. Which fields are populated
/// depends on the requested field mask.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub name: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub geometry: Option<Geometry>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub price_level: Option<u8>,
    pub business_status: Option<String>,
    pub opening_hours: Option<OpeningHours>,
}

/// A review as returned by the details endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Review {
    pub author_name: Option<String>,
    /// Usually an integer 1-5; kept as a float so odd payloads still decode.
    pub rating: Option<f64>,
    pub text: Option<String>,
    /// UNIX epoch seconds.
    pub time: Option<i64>,
    pub language: Option<String>,
    pub relative_time_description: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_preserved() {
        let status: ApiStatus = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(status, ApiStatus::Other("SOMETHING_NEW".to_string()));
        assert!(!status.is_ok());
        assert_eq!(status.to_string(), "SOMETHING_NEW");
    }

    #[test]
    fn details_response_decodes_reviews_and_token() {
        let body = r#"{
            "status": "OK",
            "next_page_token": "tok-2",
            "result": {
                "name": "Café Luna",
                "reviews": [
                    {"author_name": "Ana", "rating": 5, "text": "¡Excelente!", "time": 1700000000},
                    {"author_name": "Luis", "text": "meh"}
                ]
            }
        }"#;
        let resp: DetailsResponse = serde_json::from_str(body).unwrap();
        assert!(resp.status.is_ok());
        assert_eq!(resp.next_page_token.as_deref(), Some("tok-2"));
        let result = resp.result.unwrap();
        assert_eq!(result.name.as_deref(), Some("Café Luna"));
        assert_eq!(result.reviews.len(), 2);
        assert_eq!(result.reviews[0].rating, Some(5.0));
        assert_eq!(result.reviews[1].time, None);
    }

    #[test]
    fn details_response_without_result_decodes() {
        let resp: DetailsResponse =
            serde_json::from_str(r#"{"status": "INVALID_REQUEST"}"#).unwrap();
        assert_eq!(resp.status, ApiStatus::InvalidRequest);
        assert!(resp.result.is_none());
    }

    #[test]
    fn metadata_fields_decode() {
        let body = r#"{
            "status": "OK",
            "result": {
                "name": "Taquería Don Pepe",
                "rating": 4.4,
                "user_ratings_total": 812,
                "formatted_address": "Av. Siempre Viva 742",
                "types": ["restaurant", "food"],
                "geometry": {"location": {"lat": 19.43, "lng": -99.13}},
                "price_level": 1,
                "business_status": "OPERATIONAL",
                "opening_hours": {"open_now": true}
            }
        }"#;
        let resp: DetailsResponse = serde_json::from_str(body).unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result.types, vec!["restaurant", "food"]);
        assert_eq!(result.geometry.unwrap().location.lat, 19.43);
        assert_eq!(result.opening_hours.unwrap().open_now, Some(true));
    }

    #[test]
    fn details_request_builds_field_mask() {
        let req = DetailsRequest::new("ABC", REVIEW_FIELDS)
            .language(Some("es"))
            .page_token(None);
        assert_eq!(req.field_mask(), "name,reviews");
        assert_eq!(req.language.as_deref(), Some("es"));
        assert!(req.page_token.is_none());
    }
}
