use super::Editor;

use crate::{
    api::ValidationAPI,
    entities::{DayField, DraftField, ErrorMap, ItineraryDraft, Stop, StopField},
};

/// Which part of the draft the user can currently edit. Days and stops
/// are only checked when they are on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditSurface {
    DetailsOnly,
    DaysAndStops,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn stop_location_error(stop: &Stop) -> Option<&'static str> {
    if is_blank(&stop.location_text) {
        Some("Location is required.")
    } else if stop.coordinates.is_none() {
        Some("Please select a location from the suggestions.")
    } else {
        None
    }
}

pub fn validate(draft: &ItineraryDraft, surface: EditSurface) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if is_blank(&draft.title) {
        errors.set_field(DraftField::Title, "Name is required.");
    }

    if is_blank(&draft.description) {
        errors.set_field(DraftField::Description, "Description is required.");
    }

    if is_blank(&draft.destination_text) {
        errors.set_field(DraftField::DestinationText, "Destination is required.");
    }

    if draft.destination_coordinates.is_none() {
        errors.set_field(
            DraftField::DestinationCoordinates,
            "Please select a valid destination from the suggestions.",
        );
    }

    if surface == EditSurface::DetailsOnly {
        return errors;
    }

    for (day_index, day) in draft.days.iter().enumerate() {
        if is_blank(&day.title) {
            errors.set_day(day_index, DayField::Title, "Day title is required.");
        }

        for (stop_index, stop) in day.stops.iter().enumerate() {
            if is_blank(&stop.name) {
                errors.set_stop(day_index, stop_index, StopField::Name, "Stop name is required.");
            }

            if let Some(message) = stop_location_error(stop) {
                errors.set_stop(day_index, stop_index, StopField::Location, message);
            }
        }
    }

    errors
}

impl ValidationAPI for Editor {
    #[tracing::instrument(skip(self))]
    fn validate(&mut self) -> &ErrorMap {
        self.errors = validate(&self.draft, self.surface);

        if !self.errors.is_empty() {
            tracing::debug!("draft has validation errors: {:?}", self.errors);
        }

        &self.errors
    }
}
