// Trait abstraction for the hosted Places API.
//
// PlacesApi wraps PlacesClient so the resolver and collectors can run
// against MockPlaces in tests: no network, no API key.

use async_trait::async_trait;

use places_client::{DetailsRequest, DetailsResponse, FindPlaceResponse, PlacesClient};

#[async_trait]
pub trait PlacesApi: Send + Sync {
    /// Free-text lookup (`findplacefromtext`).
    async fn find_place(&self, query: &str) -> places_client::Result<FindPlaceResponse>;

    /// One page of place details.
    async fn place_details(
        &self,
        request: &DetailsRequest,
    ) -> places_client::Result<DetailsResponse>;
}

#[async_trait]
impl PlacesApi for PlacesClient {
    async fn find_place(&self, query: &str) -> places_client::Result<FindPlaceResponse> {
        PlacesClient::find_place(self, query).await
    }

    async fn place_details(
        &self,
        request: &DetailsRequest,
    ) -> places_client::Result<DetailsResponse> {
        PlacesClient::place_details(self, request).await
    }
}
