use tracing::{info, warn};

use placepulse_common::{GeoPoint, PlaceMetadata};
use places_client::{DetailsRequest, METADATA_FIELDS};

use crate::reviews::UNKNOWN_LOCATION;
use crate::traits::PlacesApi;

/// Fetch aggregate metadata for a place. Single request; no pagination, no retry.
pub async fn collect_metadata(api: &dyn PlacesApi, place_id: &str) -> Option<PlaceMetadata> {
    if place_id.trim().is_empty() {
        warn!("Empty place_id, skipping metadata download");
        return None;
    }

    let request = DetailsRequest::new(place_id, METADATA_FIELDS);
    let response = match api.place_details(&request).await {
        Ok(r) => r,
        Err(e) => {
            warn!(place_id, error = %e, "Metadata download failed");
            return None;
        }
    };

    if !response.status.is_ok() {
        warn!(place_id, status = %response.status, "Metadata request returned non-OK status");
        return None;
    }

    let Some(details) = response.result else {
        warn!(place_id, "Metadata response had no result");
        return None;
    };

    let metadata = PlaceMetadata {
        place_id: place_id.to_string(),
        name: details.name.unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        rating: details.rating,
        user_ratings_total: details.user_ratings_total,
        formatted_address: details.formatted_address,
        types: details.types,
        location: details.geometry.map(|g| GeoPoint {
            lat: g.location.lat,
            lng: g.location.lng,
        }),
        phone: details.formatted_phone_number,
        website: details.website,
        price_level: details.price_level,
        business_status: details.business_status,
        open_now: details.opening_hours.and_then(|h| h.open_now),
    };
    info!(place_id, name = %metadata.name, "Metadata collected");
    Some(metadata)
}
