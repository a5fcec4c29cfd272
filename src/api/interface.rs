use async_trait::async_trait;
use uuid::Uuid;

use crate::engine::{
    BackfillOutcome, BackfillRequest, BackfillResult, BackfillTask, PlaceSearch,
    PlaceSearchResult, Reconciliation, SearchOutcome, SubmitOutcome,
};
use crate::entities::{DayEdit, DraftEdit, ErrorMap, Place, Stop, StopEdit};
use crate::error::Error;

pub trait DraftAPI {
    fn update_draft_field(&mut self, edit: DraftEdit);
    fn set_destination_from_place(&mut self, place: Place);
    fn set_active_day(&mut self, day_index: usize) -> Result<(), Error>;
}

#[async_trait]
pub trait PlaceSearchAPI {
    fn destination_search(&self, query: &str) -> PlaceSearch;
    fn stop_location_search(
        &self,
        day_index: usize,
        stop_index: usize,
        query: &str,
    ) -> Result<PlaceSearch, Error>;
    fn apply_place_search(&mut self, result: PlaceSearchResult) -> SearchOutcome;
    async fn pick_destination(&mut self, query: &str) -> SearchOutcome;
    async fn pick_stop_location(
        &mut self,
        day_index: usize,
        stop_index: usize,
        query: &str,
    ) -> Result<SearchOutcome, Error>;
}

pub trait DayAPI {
    fn update_day_field(&mut self, day_index: usize, edit: DayEdit) -> Result<(), Error>;
}

pub trait StopAPI {
    fn add_stop(&mut self, day_index: usize) -> Result<Uuid, Error>;
    fn remove_stop(&mut self, day_index: usize, stop_index: usize) -> Result<Stop, Error>;
    fn move_stop(&mut self, day_index: usize, from: usize, to: usize) -> Result<(), Error>;
    fn update_stop_field(
        &mut self,
        day_index: usize,
        stop_index: usize,
        edit: StopEdit,
    ) -> Result<(), Error>;
    fn set_stop_location_from_place(
        &mut self,
        day_index: usize,
        stop_index: usize,
        place: Place,
    ) -> Result<(), Error>;
}

pub trait DurationAPI {
    fn set_duration(&mut self, duration_days: u32) -> Result<Reconciliation, Error>;
}

#[async_trait]
pub trait BackfillAPI {
    fn pending_backfills(&self) -> Vec<BackfillRequest>;
    fn backfill_task(&self, requests: Vec<BackfillRequest>) -> BackfillTask;
    fn apply_backfill(&mut self, result: BackfillResult) -> BackfillOutcome;
    async fn backfill_locations(&mut self) -> Vec<BackfillOutcome>;
}

pub trait ValidationAPI {
    fn validate(&mut self) -> &ErrorMap;
}

#[async_trait]
pub trait SubmissionAPI {
    async fn submit(&mut self) -> SubmitOutcome;
}

pub trait API:
    DraftAPI + PlaceSearchAPI + DayAPI + StopAPI + DurationAPI + BackfillAPI + ValidationAPI + SubmissionAPI
{
}
