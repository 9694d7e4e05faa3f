use tracing::{info, warn};

use placepulse_common::PlaceCandidate;

use crate::traits::PlacesApi;

/// Resolve a business name to its first find-place candidate.
///
/// One request, never retried. Transport failures, non-OK statuses and empty
/// candidate lists are logged and yield `None`.
pub async fn resolve(api: &dyn PlacesApi, name: &str) -> Option<PlaceCandidate> {
    let response = match api.find_place(name).await {
        Ok(r) => r,
        Err(e) => {
            warn!(query = name, error = %e, "Place lookup failed");
            return None;
        }
    };

    if !response.status.is_ok() {
        warn!(
            query = name,
            status = %response.status,
            message = response.error_message.as_deref().unwrap_or(""),
            "No place found"
        );
        return None;
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        warn!(query = name, "Place lookup returned no candidates");
        return None;
    };

    let place_id = match candidate.place_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            warn!(query = name, "First candidate has no place_id");
            return None;
        }
    };

    let resolved = PlaceCandidate {
        place_id,
        display_name: candidate.name.unwrap_or_default(),
        address: candidate.formatted_address.unwrap_or_default(),
    };
    info!(
        query = name,
        place_id = %resolved.place_id,
        name = %resolved.display_name,
        "Resolved place"
    );
    Some(resolved)
}
