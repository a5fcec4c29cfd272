use super::Editor;

use uuid::Uuid;

use crate::{
    api::StopAPI,
    entities::{Place, Stop, StopEdit, StopField},
    error::Error,
};

impl StopAPI for Editor {
    #[tracing::instrument(skip(self))]
    fn add_stop(&mut self, day_index: usize) -> Result<Uuid, Error> {
        let stop = self.draft.day_mut(day_index)?.push_stop();

        Ok(stop.key)
    }

    #[tracing::instrument(skip(self))]
    fn remove_stop(&mut self, day_index: usize, stop_index: usize) -> Result<Stop, Error> {
        let removed = self.draft.day_mut(day_index)?.remove_stop(stop_index)?;
        self.errors.remove_stop(day_index, stop_index);

        Ok(removed)
    }

    #[tracing::instrument(skip(self))]
    fn move_stop(&mut self, day_index: usize, from: usize, to: usize) -> Result<(), Error> {
        self.draft.day_mut(day_index)?.move_stop(from, to)?;
        self.errors.move_stop(day_index, from, to);

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn update_stop_field(
        &mut self,
        day_index: usize,
        stop_index: usize,
        edit: StopEdit,
    ) -> Result<(), Error> {
        let field = edit.field();

        self.draft.stop_mut(day_index, stop_index)?.apply(edit);
        self.errors.clear_stop(day_index, stop_index, field);

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn set_stop_location_from_place(
        &mut self,
        day_index: usize,
        stop_index: usize,
        place: Place,
    ) -> Result<(), Error> {
        self.draft.stop_mut(day_index, stop_index)?.set_place(place);
        self.errors
            .clear_stop(day_index, stop_index, StopField::Location);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::editor;
    use super::*;
    use crate::api::{DurationAPI, ValidationAPI};
    use crate::entities::{Category, Coordinates};
    use crate::error::invalid_input_error;

    fn orders(editor: &Editor, day_index: usize) -> Vec<u32> {
        editor.draft().days[day_index]
            .stops
            .iter()
            .map(|stop| stop.order_within_day)
            .collect()
    }

    #[test]
    fn added_stop_defaults() {
        let mut editor = editor();

        let key = editor.add_stop(0).unwrap();

        let stop = &editor.draft().days[0].stops[0];
        assert_eq!(stop.key, key);
        assert_eq!(stop.category, Category::Activity);
        assert_eq!(stop.order_within_day, 1);
        assert!(stop.name.is_empty());
    }

    #[test]
    fn orders_are_dense_after_add_and_remove() {
        let mut editor = editor();
        editor.set_duration(2).unwrap();

        for _ in 0..5 {
            editor.add_stop(1).unwrap();
        }
        editor.remove_stop(1, 4).unwrap();
        editor.remove_stop(1, 0).unwrap();
        editor.add_stop(1).unwrap();
        editor.remove_stop(1, 2).unwrap();

        assert_eq!(orders(&editor, 1), vec![1, 2, 3]);
        assert!(editor.draft().is_consistent());
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut editor = editor();
        editor.add_stop(0).unwrap();
        editor.validate();
        assert!(editor.errors().stop(0, 0, StopField::Name).is_some());
        assert!(editor.errors().stop(0, 0, StopField::Location).is_some());

        editor
            .update_stop_field(0, 0, StopEdit::Name("Musee d'Orsay".into()))
            .unwrap();

        assert!(editor.errors().stop(0, 0, StopField::Name).is_none());
        assert!(editor.errors().stop(0, 0, StopField::Location).is_some());
    }

    #[test]
    fn picking_a_place_sets_location_atomically() {
        let mut editor = editor();
        editor.add_stop(0).unwrap();
        editor.validate();
        let place = Place::new("1 Rue de la Legion d'Honneur, Paris", Coordinates::new(48.86, 2.3266));

        editor.set_stop_location_from_place(0, 0, place.clone()).unwrap();

        let stop = &editor.draft().days[0].stops[0];
        assert_eq!(stop.location_text, place.address);
        assert_eq!(stop.coordinates, Some(place.coordinates));
        assert!(stop.location_resolved);
        assert!(editor.errors().stop(0, 0, StopField::Location).is_none());
    }

    #[test]
    fn typing_after_a_pick_drops_coordinates() {
        let mut editor = editor();
        editor.add_stop(0).unwrap();
        editor
            .set_stop_location_from_place(0, 0, Place::new("Orsay", Coordinates::new(48.86, 2.3266)))
            .unwrap();

        editor
            .update_stop_field(0, 0, StopEdit::LocationText("Orsay museum".into()))
            .unwrap();

        assert!(editor.draft().days[0].stops[0].coordinates.is_none());
    }

    #[test]
    fn removing_keeps_errors_attached() {
        let mut editor = editor();
        for _ in 0..3 {
            editor.add_stop(0).unwrap();
        }
        editor.update_stop_field(0, 1, StopEdit::Name("named".into())).unwrap();
        editor.validate();

        editor.remove_stop(0, 0).unwrap();

        assert!(editor.errors().stop(0, 0, StopField::Name).is_none());
        assert!(editor.errors().stop(0, 1, StopField::Name).is_some());
        assert!(editor.errors().stop(0, 2, StopField::Name).is_none());
    }

    #[test]
    fn invalid_indices_are_rejected() {
        let mut editor = editor();

        assert_eq!(editor.add_stop(3), Err(invalid_input_error()));
        assert_eq!(
            editor.update_stop_field(0, 0, StopEdit::Name("x".into())),
            Err(invalid_input_error())
        );
        assert!(editor.remove_stop(0, 0).is_err());
    }
}
