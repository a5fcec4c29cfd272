use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::day::Day;
use crate::entities::location::{Coordinates, Place};
use crate::entities::stop::Stop;
use crate::error::{invalid_input_error, Error};

pub const MAX_DURATION_DAYS: u32 = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct ItineraryDraft {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub destination_text: String,
    pub destination_coordinates: Option<Coordinates>,
    pub duration_days: u32,
    pub price_tier: PriceTier,
    pub cover_image: Option<ImageAsset>,
    pub days: Vec<Day>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    #[default]
    Budget,
    Moderate,
    Luxury,
}

impl PriceTier {
    pub fn representative_price(&self) -> f64 {
        match self {
            Self::Budget => 500.0,
            Self::Moderate => 1000.0,
            Self::Luxury => 2000.0,
        }
    }

    pub fn from_price(price: f64) -> Self {
        if price <= 500.0 {
            Self::Budget
        } else if price <= 1000.0 {
            Self::Moderate
        } else {
            Self::Luxury
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct ImageAsset {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAsset")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Title,
    Description,
    DestinationText,
    DestinationCoordinates,
    Duration,
    Price,
    CoverImage,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DraftEdit {
    Title(String),
    Description(String),
    DestinationText(String),
    PriceTier(PriceTier),
    CoverImage(Option<ImageAsset>),
}

impl DraftEdit {
    /// The error keys an edit invalidates.
    pub fn fields(&self) -> &'static [DraftField] {
        match self {
            Self::Title(_) => &[DraftField::Title],
            Self::Description(_) => &[DraftField::Description],
            Self::DestinationText(_) => &[
                DraftField::DestinationText,
                DraftField::DestinationCoordinates,
            ],
            Self::PriceTier(_) => &[DraftField::Price],
            Self::CoverImage(_) => &[DraftField::CoverImage],
        }
    }
}

impl ItineraryDraft {
    pub fn new() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            destination_text: String::new(),
            destination_coordinates: None,
            duration_days: 1,
            price_tier: PriceTier::default(),
            cover_image: None,
            days: vec![Day::new(1)],
        }
    }

    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Title(title) => self.title = title,
            DraftEdit::Description(description) => self.description = description,
            DraftEdit::DestinationText(text) => {
                self.destination_text = text;
                self.destination_coordinates = None;
            }
            DraftEdit::PriceTier(tier) => self.price_tier = tier,
            DraftEdit::CoverImage(image) => self.cover_image = image,
        }
    }

    pub fn set_destination(&mut self, place: Place) {
        self.destination_text = place.address;
        self.destination_coordinates = Some(place.coordinates.rounded());
    }

    pub fn day(&self, index: usize) -> Result<&Day, Error> {
        self.days.get(index).ok_or_else(|| invalid_input_error())
    }

    pub fn day_mut(&mut self, index: usize) -> Result<&mut Day, Error> {
        self.days.get_mut(index).ok_or_else(|| invalid_input_error())
    }

    pub fn stop_mut(&mut self, day_index: usize, stop_index: usize) -> Result<&mut Stop, Error> {
        self.day_mut(day_index)?.stop_mut(stop_index)
    }

    pub fn find_stop_mut(&mut self, key: &Uuid) -> Option<&mut Stop> {
        self.days.iter_mut().find_map(|day| day.find_stop_mut(key))
    }

    /// Checks the structural invariants the reconciler maintains.
    pub fn is_consistent(&self) -> bool {
        self.days.len() == self.duration_days as usize
            && self.days.iter().enumerate().all(|(position, day)| {
                day.day_number == position as u32 + 1
                    && day
                        .stops
                        .iter()
                        .enumerate()
                        .all(|(order, stop)| stop.order_within_day == order as u32 + 1)
            })
    }
}

impl Default for ItineraryDraft {
    fn default() -> Self {
        Self::new()
    }
}
