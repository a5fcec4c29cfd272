use super::Editor;

use crate::{
    api::DraftAPI,
    entities::{DraftEdit, DraftField, Place},
    error::{invalid_input_error, Error},
};

impl DraftAPI for Editor {
    #[tracing::instrument(skip(self))]
    fn update_draft_field(&mut self, edit: DraftEdit) {
        for field in edit.fields() {
            self.errors.clear_field(*field);
        }

        self.draft.apply(edit);
    }

    #[tracing::instrument(skip(self))]
    fn set_destination_from_place(&mut self, place: Place) {
        self.draft.set_destination(place);
        self.errors.clear_field(DraftField::DestinationText);
        self.errors.clear_field(DraftField::DestinationCoordinates);
    }

    fn set_active_day(&mut self, day_index: usize) -> Result<(), Error> {
        if day_index >= self.draft.days.len() {
            return Err(invalid_input_error());
        }

        self.active_day = day_index;

        Ok(())
    }
}
