mod day;
mod errors;
mod itinerary;
mod location;
mod snapshot;
mod stop;

pub use day::{Day, DayEdit, DayField};
pub use errors::ErrorMap;
pub use itinerary::{
    DraftEdit, DraftField, ImageAsset, ItineraryDraft, PriceTier, MAX_DURATION_DAYS,
};
pub use location::{is_raw_coordinate_text, Coordinates, Place};
pub use snapshot::DaySnapshot;
pub use stop::{Category, Stop, StopEdit, StopField};
