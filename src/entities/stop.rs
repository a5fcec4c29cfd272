use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::location::{is_raw_coordinate_text, Coordinates, Place};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub key: Uuid,
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub location_text: String,
    pub coordinates: Option<Coordinates>,
    pub location_resolved: bool,
    pub order_within_day: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Activity,
    Food,
    Accommodation,
    Transport,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Food => "food",
            Self::Accommodation => "accommodation",
            Self::Transport => "transport",
        }
    }

    /// Unknown server categories (the service also knows "other") fall back
    /// to an activity.
    pub fn from_name(name: &str) -> Self {
        match name {
            "food" => Self::Food,
            "accommodation" => Self::Accommodation,
            "transport" => Self::Transport,
            _ => Self::Activity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopField {
    Name,
    Description,
    Category,
    Location,
}

/// A single-field edit of a stop.
#[derive(Clone, Debug, PartialEq)]
pub enum StopEdit {
    Name(String),
    Description(String),
    Category(Category),
    LocationText(String),
}

impl StopEdit {
    pub fn field(&self) -> StopField {
        match self {
            Self::Name(_) => StopField::Name,
            Self::Description(_) => StopField::Description,
            Self::Category(_) => StopField::Category,
            Self::LocationText(_) => StopField::Location,
        }
    }
}

impl Stop {
    pub fn new(order_within_day: u32) -> Self {
        Self {
            key: Uuid::new_v4(),
            id: None,
            name: String::new(),
            description: String::new(),
            category: Category::default(),
            location_text: String::new(),
            coordinates: None,
            location_resolved: false,
            order_within_day,
        }
    }

    pub fn apply(&mut self, edit: StopEdit) {
        match edit {
            StopEdit::Name(name) => self.name = name,
            StopEdit::Description(description) => self.description = description,
            StopEdit::Category(category) => self.category = category,
            StopEdit::LocationText(text) => {
                // typed text is not geocoded until a place is picked
                self.location_text = text;
                self.coordinates = None;
                self.location_resolved = false;
            }
        }
    }

    pub fn set_place(&mut self, place: Place) {
        self.location_text = place.address;
        self.coordinates = Some(place.coordinates);
        self.location_resolved = true;
    }

    /// Whether the location text is still the raw coordinate form of a
    /// stop that has coordinates but no human readable address.
    pub fn needs_backfill(&self) -> bool {
        self.coordinates.is_some()
            && !self.location_resolved
            && is_raw_coordinate_text(&self.location_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn louvre() -> Place {
        Place::new("Rue de Rivoli, 75001 Paris", Coordinates::new(48.8606, 2.3376))
    }

    #[test]
    fn new_stop_defaults() {
        let stop = Stop::new(3);

        assert_eq!(stop.order_within_day, 3);
        assert_eq!(stop.category, Category::Activity);
        assert!(stop.id.is_none());
        assert!(stop.coordinates.is_none());
    }

    #[test]
    fn typed_location_clears_coordinates() {
        let mut stop = Stop::new(1);
        stop.set_place(louvre());
        assert!(stop.location_resolved);

        stop.apply(StopEdit::LocationText("somewhere near the river".into()));

        assert_eq!(stop.location_text, "somewhere near the river");
        assert!(stop.coordinates.is_none());
        assert!(!stop.location_resolved);
    }

    #[test]
    fn backfill_needs_raw_text_and_coordinates() {
        let mut stop = Stop::new(1);
        stop.location_text = "48.8606, 2.3376".into();
        assert!(!stop.needs_backfill());

        stop.coordinates = Some(Coordinates::new(48.8606, 2.3376));
        assert!(stop.needs_backfill());

        stop.location_resolved = true;
        assert!(!stop.needs_backfill());
    }

    #[test]
    fn picked_numeric_address_is_not_backfilled() {
        let mut stop = Stop::new(1);
        stop.set_place(Place::new("12, 34", Coordinates::new(12.0, 34.0)));

        assert!(!stop.needs_backfill());
    }

    #[test]
    fn category_names() {
        assert_eq!(Category::from_name("food"), Category::Food);
        assert_eq!(Category::from_name("other"), Category::Activity);
        assert_eq!(Category::Transport.name(), "transport");
    }
}
