pub mod error;
pub mod types;

pub use error::{PlacesError, Result};
pub use types::{
    ApiStatus, Candidate, DetailsRequest, DetailsResponse, FindPlaceResponse, Geometry, LatLng,
    OpeningHours, PlaceDetails, Review, CANDIDATE_FIELDS, METADATA_FIELDS, REVIEW_FIELDS,
};

use std::time::Duration;

use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

pub struct PlacesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PlacesClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Look up candidates for a free-text query via `findplacefromtext`.
    /// The API-level `status` is returned as-is; callers decide what it means.
    pub async fn find_place(&self, query: &str) -> Result<FindPlaceResponse> {
        let url = format!("{}/findplacefromtext/json", self.base_url);
        let fields = CANDIDATE_FIELDS.join(",");
        let params = [
            ("key", self.api_key.as_str()),
            ("input", query),
            ("inputtype", "textquery"),
            ("fields", fields.as_str()),
        ];

        tracing::debug!(query, "Places find_place request");
        self.get_json(&url, &params).await
    }

    /// Fetch one page of place details.
    pub async fn place_details(&self, request: &DetailsRequest) -> Result<DetailsResponse> {
        let url = format!("{}/details/json", self.base_url);
        let fields = request.field_mask();
        let mut params = vec![
            ("key", self.api_key.as_str()),
            ("place_id", request.place_id.as_str()),
            ("fields", fields.as_str()),
        ];
        if let Some(ref language) = request.language {
            params.push(("language", language.as_str()));
        }
        if let Some(ref token) = request.page_token {
            params.push(("pagetoken", token.as_str()));
        }

        tracing::debug!(
            place_id = %request.place_id,
            fields = %fields,
            paged = request.page_token.is_some(),
            "Places details request"
        );
        self.get_json(&url, &params).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<T> {
        let resp = self.client.get(url).query(params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlacesError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
