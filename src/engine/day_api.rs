use super::Editor;

use crate::{api::DayAPI, entities::DayEdit, error::Error};

impl DayAPI for Editor {
    #[tracing::instrument(skip(self))]
    fn update_day_field(&mut self, day_index: usize, edit: DayEdit) -> Result<(), Error> {
        let field = edit.field();

        self.draft.day_mut(day_index)?.apply(edit);
        self.errors.clear_day(day_index, field);

        Ok(())
    }
}
