use std::sync::Arc;
use std::time::Duration;

use super::Editor;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::{DraftAPI, PlaceSearchAPI},
    entities::{Coordinates, Place, StopField},
    error::Error,
    external::LocationResolver,
};

/// What a picked place is applied to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchTarget {
    Destination,
    Stop { stop_key: Uuid },
}

/// A free text place search that owns everything it needs. Running it does
/// not borrow the editor.
pub struct PlaceSearch {
    resolver: Arc<dyn LocationResolver>,
    timeout: Duration,
    query: String,
    bias: Option<Coordinates>,
    target: SearchTarget,
}

impl PlaceSearch {
    pub fn target(&self) -> SearchTarget {
        self.target
    }

    /// A failed or slow search counts as no match.
    #[tracing::instrument(name = "PlaceSearch::run", skip(self), fields(query = %self.query))]
    pub async fn run(self) -> PlaceSearchResult {
        let lookup = self.resolver.resolve_forward(&self.query, self.bias);

        let place = match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(place)) => place,
            Ok(Err(err)) => {
                tracing::warn!("place search for {:?} failed: {}", self.query, err);
                None
            }
            Err(_) => {
                tracing::warn!("place search for {:?} timed out", self.query);
                None
            }
        };

        PlaceSearchResult {
            target: self.target,
            place,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaceSearchResult {
    pub target: SearchTarget,
    pub place: Option<Place>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchOutcome {
    Applied,
    /// Nothing matched; the typed text stays as it is.
    NoMatch,
    /// The stop was removed, or its day truncated, before the result arrived.
    StopRemoved,
}

impl Editor {
    fn place_search(&self, query: &str, bias: Option<Coordinates>, target: SearchTarget) -> PlaceSearch {
        PlaceSearch {
            resolver: self.collaborators.resolver.clone(),
            timeout: self.collaborators.resolver_timeout,
            query: query.to_string(),
            bias,
            target,
        }
    }

    fn stop_position(&self, key: &Uuid) -> Option<(usize, usize)> {
        self.draft.days.iter().enumerate().find_map(|(day_index, day)| {
            day.stops
                .iter()
                .position(|stop| stop.key == *key)
                .map(|stop_index| (day_index, stop_index))
        })
    }
}

#[async_trait]
impl PlaceSearchAPI for Editor {
    fn destination_search(&self, query: &str) -> PlaceSearch {
        self.place_search(query, None, SearchTarget::Destination)
    }

    fn stop_location_search(
        &self,
        day_index: usize,
        stop_index: usize,
        query: &str,
    ) -> Result<PlaceSearch, Error> {
        let stop_key = self.draft.day(day_index)?.stop(stop_index)?.key;

        Ok(self.place_search(
            query,
            self.draft.destination_coordinates,
            SearchTarget::Stop { stop_key },
        ))
    }

    /// Applies a match to its target. A stop is found by key, so it may
    /// have moved since the search was issued.
    #[tracing::instrument(skip(self))]
    fn apply_place_search(&mut self, result: PlaceSearchResult) -> SearchOutcome {
        let place = match result.place {
            Some(place) => place,
            None => return SearchOutcome::NoMatch,
        };

        match result.target {
            SearchTarget::Destination => {
                self.set_destination_from_place(place);
                SearchOutcome::Applied
            }
            SearchTarget::Stop { stop_key } => match self.stop_position(&stop_key) {
                Some((day_index, stop_index)) => {
                    self.draft.days[day_index].stops[stop_index].set_place(place);
                    self.errors
                        .clear_stop(day_index, stop_index, StopField::Location);
                    SearchOutcome::Applied
                }
                None => {
                    tracing::debug!("discarding place pick for removed stop {}", stop_key);
                    SearchOutcome::StopRemoved
                }
            },
        }
    }

    async fn pick_destination(&mut self, query: &str) -> SearchOutcome {
        let result = self.destination_search(query).run().await;

        self.apply_place_search(result)
    }

    async fn pick_stop_location(
        &mut self,
        day_index: usize,
        stop_index: usize,
        query: &str,
    ) -> Result<SearchOutcome, Error> {
        let result = self
            .stop_location_search(day_index, stop_index, query)?
            .run()
            .await;

        Ok(self.apply_place_search(result))
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::block_on;

    use super::super::testing::{collaborators, editor};
    use super::*;
    use crate::api::{DurationAPI, StopAPI, ValidationAPI};
    use crate::entities::DraftEdit;
    use crate::error::invalid_input_error;
    use crate::external::fakes::{FakeResolver, FakeService};

    fn paris() -> Place {
        Place::new("Paris, France", Coordinates::new(48.856613, 2.352222))
    }

    fn orsay() -> Place {
        Place::new("1 Rue de la Legion d'Honneur, Paris", Coordinates::new(48.86, 2.3266))
    }

    fn searching_editor(resolver: FakeResolver) -> Editor {
        super::super::testing::init_tracing();
        Editor::new(collaborators(resolver, FakeService::default()))
    }

    #[test]
    fn search_applies_match() {
        let resolver = FakeResolver::default().with_place("paris", paris());
        let mut editor = searching_editor(resolver);
        editor.add_stop(0).unwrap();

        assert_eq!(block_on(editor.pick_destination("paris")), SearchOutcome::Applied);
        assert_eq!(editor.draft().destination_text, "Paris, France");

        assert_eq!(
            block_on(editor.pick_stop_location(0, 0, "paris")),
            Ok(SearchOutcome::Applied)
        );
        assert!(editor.draft().days[0].stops[0].location_resolved);
    }

    #[test]
    fn stop_search_follows_moved_stop() {
        let mut editor = searching_editor(FakeResolver::default().with_place("orsay", orsay()));
        editor.add_stop(0).unwrap();
        editor.add_stop(0).unwrap();
        editor.validate();
        let key = editor.draft().days[0].stops[0].key;

        let search = editor.stop_location_search(0, 0, "orsay").unwrap();
        editor.move_stop(0, 0, 1).unwrap();
        let result = block_on(search.run());

        assert_eq!(editor.apply_place_search(result), SearchOutcome::Applied);
        let stop = &editor.draft().days[0].stops[1];
        assert_eq!(stop.key, key);
        assert_eq!(stop.location_text, orsay().address);
        assert!(editor.errors().stop(0, 1, StopField::Location).is_none());
        assert!(editor.errors().stop(0, 0, StopField::Location).is_some());
    }

    #[test]
    fn stop_search_for_removed_stop_is_discarded() {
        let mut editor = searching_editor(FakeResolver::default().with_place("orsay", orsay()));
        editor.set_duration(2).unwrap();
        editor.add_stop(1).unwrap();

        let search = editor.stop_location_search(1, 0, "orsay").unwrap();
        editor.set_duration(1).unwrap();
        let before = editor.draft().clone();

        assert_eq!(
            editor.apply_place_search(block_on(search.run())),
            SearchOutcome::StopRemoved
        );
        assert_eq!(editor.draft(), &before);
    }

    #[test]
    fn search_without_match_keeps_typed_text() {
        let mut editor = editor();
        editor.update_draft_field(DraftEdit::DestinationText("Atlantis".into()));

        assert_eq!(block_on(editor.pick_destination("Atlantis")), SearchOutcome::NoMatch);

        assert_eq!(editor.draft().destination_text, "Atlantis");
        assert!(editor.draft().destination_coordinates.is_none());
    }

    #[test]
    fn slow_search_counts_as_no_match() {
        let resolver = FakeResolver::default()
            .with_place("paris", paris())
            .with_delay(Duration::from_secs(5));
        let mut editor = searching_editor(resolver);

        assert_eq!(block_on(editor.pick_destination("paris")), SearchOutcome::NoMatch);
        assert!(editor.draft().destination_coordinates.is_none());
    }

    #[test]
    fn stop_search_needs_existing_stop() {
        let editor = editor();

        assert_eq!(
            editor.stop_location_search(0, 0, "orsay").err(),
            Some(invalid_input_error())
        );
    }
}
