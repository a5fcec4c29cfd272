pub mod google_maps;
pub mod itinerary_service;

#[cfg(test)]
pub(crate) mod fakes;

use async_trait::async_trait;

use crate::{
    auth::Credential,
    entities::{Coordinates, Place},
    error::Error,
};

pub use google_maps::GoogleMaps;
pub use itinerary_service::{ItineraryForm, ItineraryService, RemoteItinerary};

/// Place search in both directions.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Best match for free text, optionally biased towards a point.
    async fn resolve_forward(
        &self,
        text: &str,
        bias: Option<Coordinates>,
    ) -> Result<Option<Place>, Error>;

    /// Human readable address for a coordinate pair.
    async fn resolve_reverse(&self, coordinates: Coordinates) -> Result<String, Error>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum SaveResponse {
    Saved(RemoteItinerary),
    /// Structured field errors, e.g. `{"name": ["This field is required."]}`.
    FieldErrors(serde_json::Value),
    Unauthorized,
    Failed { status: u16, message: String },
}

#[async_trait]
pub trait PersistenceService: Send + Sync {
    async fn fetch(&self, id: i64, credential: &Credential) -> Result<RemoteItinerary, Error>;

    /// Creates the itinerary when `id` is absent, replaces it otherwise.
    async fn save(
        &self,
        id: Option<i64>,
        form: ItineraryForm,
        credential: &Credential,
    ) -> Result<SaveResponse, Error>;
}
