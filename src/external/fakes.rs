use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    auth::Credential,
    entities::{Coordinates, Place},
    error::{not_found_error, upstream_error, Error},
    external::{ItineraryForm, LocationResolver, PersistenceService, RemoteItinerary, SaveResponse},
};

#[derive(Default)]
pub struct FakeResolver {
    pub addresses: HashMap<String, String>,
    pub places: HashMap<String, Place>,
    pub delay: Option<Duration>,
    pub reverse_calls: Mutex<Vec<Coordinates>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeResolver {
    pub fn with_address(mut self, coordinates: Coordinates, address: &str) -> Self {
        self.addresses.insert(coordinates.to_string(), address.into());
        self
    }

    pub fn with_place(mut self, text: &str, place: Place) -> Self {
        self.places.insert(text.into(), place);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn reverse_call_count(&self) -> usize {
        self.reverse_calls.lock().unwrap().len()
    }

    /// Highest number of reverse lookups that were pending at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationResolver for FakeResolver {
    async fn resolve_forward(
        &self,
        text: &str,
        _bias: Option<Coordinates>,
    ) -> Result<Option<Place>, Error> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self.places.get(text).cloned())
    }

    async fn resolve_reverse(&self, coordinates: Coordinates) -> Result<String, Error> {
        self.reverse_calls.lock().unwrap().push(coordinates);

        let pending = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(pending, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.addresses
            .get(&coordinates.to_string())
            .cloned()
            .ok_or_else(|| upstream_error())
    }
}

#[derive(Default)]
pub struct FakeService {
    pub itinerary: Option<RemoteItinerary>,
    pub responses: Mutex<VecDeque<Result<SaveResponse, Error>>>,
    pub saved: Mutex<Vec<(Option<i64>, ItineraryForm)>>,
}

impl FakeService {
    pub fn with_itinerary(mut self, itinerary: RemoteItinerary) -> Self {
        self.itinerary = Some(itinerary);
        self
    }

    pub fn respond(self, response: Result<SaveResponse, Error>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }

    pub fn last_saved(&self) -> Option<(Option<i64>, ItineraryForm)> {
        self.saved.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PersistenceService for FakeService {
    async fn fetch(&self, _id: i64, _credential: &Credential) -> Result<RemoteItinerary, Error> {
        self.itinerary.clone().ok_or_else(|| not_found_error())
    }

    async fn save(
        &self,
        id: Option<i64>,
        form: ItineraryForm,
        _credential: &Credential,
    ) -> Result<SaveResponse, Error> {
        self.saved.lock().unwrap().push((id, form));

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(upstream_error()))
    }
}
