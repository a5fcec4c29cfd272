mod backfill_api;
mod day_api;
mod draft_api;
mod duration_api;
mod helpers;
mod search_api;
mod stop_api;
mod submission_api;
mod validator;

use std::sync::Arc;
use std::time::Duration;

use crate::{
    api::API,
    auth::SessionProvider,
    config::Config,
    entities::{DaySnapshot, ErrorMap, ItineraryDraft},
    error::{unauthorized_error, Error},
    external::{GoogleMaps, ItineraryService, LocationResolver, PersistenceService},
};

pub use backfill_api::{BackfillOutcome, BackfillRequest, BackfillResult, BackfillTask, DiscardReason};
pub use duration_api::Reconciliation;
pub use search_api::{PlaceSearch, PlaceSearchResult, SearchOutcome, SearchTarget};
pub use submission_api::{merge_remote_errors, SubmitOutcome};
pub use validator::{validate, EditSurface};

const DEFAULT_RESOLVER_TIMEOUT: Duration = Duration::from_secs(5);

/// The external services an editor talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub resolver: Arc<dyn LocationResolver>,
    pub service: Arc<dyn PersistenceService>,
    pub session: Arc<dyn SessionProvider>,
    pub resolver_timeout: Duration,
}

impl Collaborators {
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        service: Arc<dyn PersistenceService>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            resolver,
            service,
            session,
            resolver_timeout: DEFAULT_RESOLVER_TIMEOUT,
        }
    }

    /// Wires the Google Maps resolver and the itinerary service.
    pub fn from_config(config: &Config, session: Arc<dyn SessionProvider>) -> Result<Self, Error> {
        let resolver = Arc::new(GoogleMaps::from_config(config));
        let service = Arc::new(ItineraryService::from_config(config)?);

        Ok(Self::new(resolver, service, session).with_resolver_timeout(config.resolver_timeout))
    }

    pub fn with_resolver_timeout(mut self, timeout: Duration) -> Self {
        self.resolver_timeout = timeout;
        self
    }
}

/// Editing session over a single itinerary draft. The only writer of the
/// draft; the snapshot is written only at load, truncation and save.
pub struct Editor {
    draft: ItineraryDraft,
    snapshot: DaySnapshot,
    errors: ErrorMap,
    active_day: usize,
    surface: EditSurface,
    collaborators: Collaborators,
}

impl Editor {
    pub fn new(collaborators: Collaborators) -> Self {
        Self::with_draft(ItineraryDraft::new(), DaySnapshot::empty(), collaborators)
    }

    fn with_draft(draft: ItineraryDraft, snapshot: DaySnapshot, collaborators: Collaborators) -> Self {
        Self {
            draft,
            snapshot,
            errors: ErrorMap::new(),
            active_day: 0,
            surface: EditSurface::DaysAndStops,
            collaborators,
        }
    }

    /// Loads a persisted itinerary for editing. Only its owner may edit it.
    #[tracing::instrument(name = "Editor::load", skip(collaborators))]
    pub async fn load(id: i64, collaborators: Collaborators) -> Result<Self, Error> {
        let session = collaborators.session.clone();

        let credential = session.credential().await.ok_or_else(|| unauthorized_error())?;
        let user = session.user().await.ok_or_else(|| unauthorized_error())?;

        let remote = collaborators.service.fetch(id, &credential).await?;

        let owner_id = remote.user.as_ref().and_then(|owner| owner.id);
        if !user.id_equals_nullable_id(owner_id) {
            tracing::warn!("user {} is not the owner of itinerary {}", user.id, id);
            return Err(unauthorized_error());
        }

        let (draft, known_days) = helpers::draft_from_remote(remote);
        let snapshot = DaySnapshot::capture(&known_days);

        tracing::info!(
            "loaded itinerary {} with {} days, {} cached",
            id,
            draft.days.len(),
            snapshot.len()
        );

        Ok(Self::with_draft(draft, snapshot, collaborators))
    }

    pub fn draft(&self) -> &ItineraryDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn snapshot(&self) -> &DaySnapshot {
        &self.snapshot
    }

    pub fn active_day(&self) -> usize {
        self.active_day
    }

    pub fn surface(&self) -> EditSurface {
        self.surface
    }

    pub fn set_surface(&mut self, surface: EditSurface) {
        self.surface = surface;
    }
}

impl API for Editor {}


#[cfg(test)]
mod tests {
    use tokio_test::block_on;

    use super::testing::*;
    use super::*;
    use crate::auth::{Credential, StaticSession, User};
    use crate::entities::Coordinates;
    use crate::error::not_found_error;
    use crate::external::fakes::{FakeResolver, FakeService};
    use crate::external::RemoteItinerary;

    fn remote(owner: i64) -> RemoteItinerary {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "user": {"id": owner, "username": "ana"},
            "name": "Paris",
            "description": "Three days in Paris",
            "duration": 3,
            "destination": "Paris, France",
            "price": "1000.00",
            "latitude": "48.856600",
            "longitude": "2.352200",
            "days": [
                {"day_number": 1, "title": "Arrival", "description": "", "stops": []},
                {"day_number": 2, "title": "Museums", "description": "", "stops": [
                    {"id": 9, "name": "Louvre", "stop_type": "activity",
                     "latitude": "48.860600", "longitude": "2.337600", "order": 1}
                ]},
                {"day_number": 3, "title": "Departure", "description": "", "stops": []}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn wires_collaborators_from_config() {
        let config = Config {
            api_url: "http://localhost:8000".into(),
            google_maps_api_base: "maps.googleapis.com".into(),
            google_maps_api_key: "key".into(),
            resolver_timeout: std::time::Duration::from_millis(750),
            submit_timeout: std::time::Duration::from_secs(30),
        };

        let collaborators = Collaborators::from_config(&config, Arc::new(signed_in())).unwrap();

        assert_eq!(collaborators.resolver_timeout, std::time::Duration::from_millis(750));
    }

    #[test]
    fn load_captures_snapshot() {
        init_tracing();
        let service = FakeService::default().with_itinerary(remote(7));

        let editor = block_on(Editor::load(42, collaborators(FakeResolver::default(), service))).unwrap();

        assert_eq!(editor.draft().id, Some(42));
        assert_eq!(editor.draft().duration_days, 3);
        assert!(editor.draft().is_consistent());
        assert_eq!(editor.snapshot().len(), 3);

        let louvre = &editor.draft().days[1].stops[0];
        assert_eq!(louvre.location_text, "48.8606, 2.3376");
        assert_eq!(louvre.coordinates, Some(Coordinates::new(48.8606, 2.3376)));
        assert!(louvre.needs_backfill());
    }

    #[test]
    fn load_refuses_other_owners() {
        let service = FakeService::default().with_itinerary(remote(8));

        let result = block_on(Editor::load(42, collaborators(FakeResolver::default(), service)));

        assert_eq!(result.err(), Some(unauthorized_error()));
    }

    #[test]
    fn load_requires_session() {
        let service = FakeService::default().with_itinerary(remote(7));
        let collaborators =
            collaborators_with_session(FakeResolver::default(), service, StaticSession::anonymous());

        let result = block_on(Editor::load(42, collaborators));

        assert_eq!(result.err(), Some(unauthorized_error()));
    }

    #[test]
    fn load_propagates_missing_itinerary() {
        let session = StaticSession::new(User::new(7), Credential::new("t"));
        let collaborators =
            collaborators_with_session(FakeResolver::default(), FakeService::default(), session);

        let result = block_on(Editor::load(42, collaborators));

        assert_eq!(result.err(), Some(not_found_error()));
    }
}
