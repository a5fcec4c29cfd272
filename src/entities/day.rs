use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::stop::Stop;
use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub day_number: u32,
    pub title: String,
    pub description: String,
    pub stops: Vec<Stop>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayField {
    Title,
    Description,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DayEdit {
    Title(String),
    Description(String),
}

impl DayEdit {
    pub fn field(&self) -> DayField {
        match self {
            Self::Title(_) => DayField::Title,
            Self::Description(_) => DayField::Description,
        }
    }
}

impl Day {
    pub fn new(day_number: u32) -> Self {
        Self {
            day_number,
            title: format!("Day {}", day_number),
            description: String::new(),
            stops: Vec::new(),
        }
    }

    pub fn apply(&mut self, edit: DayEdit) {
        match edit {
            DayEdit::Title(title) => self.title = title,
            DayEdit::Description(description) => self.description = description,
        }
    }

    pub fn stop(&self, index: usize) -> Result<&Stop, Error> {
        self.stops.get(index).ok_or_else(|| invalid_input_error())
    }

    pub fn stop_mut(&mut self, index: usize) -> Result<&mut Stop, Error> {
        self.stops.get_mut(index).ok_or_else(|| invalid_input_error())
    }

    pub fn find_stop_mut(&mut self, key: &Uuid) -> Option<&mut Stop> {
        self.stops.iter_mut().find(|stop| &stop.key == key)
    }

    pub fn push_stop(&mut self) -> &Stop {
        let stop = Stop::new(self.stops.len() as u32 + 1);
        self.stops.push(stop);

        &self.stops[self.stops.len() - 1]
    }

    pub fn remove_stop(&mut self, index: usize) -> Result<Stop, Error> {
        if index >= self.stops.len() {
            return Err(invalid_input_error());
        }

        let removed = self.stops.remove(index);
        self.renumber_stops();

        Ok(removed)
    }

    pub fn move_stop(&mut self, from: usize, to: usize) -> Result<(), Error> {
        if from >= self.stops.len() || to >= self.stops.len() {
            return Err(invalid_input_error());
        }

        let stop = self.stops.remove(from);
        self.stops.insert(to, stop);
        self.renumber_stops();

        Ok(())
    }

    fn renumber_stops(&mut self) {
        for (position, stop) in self.stops.iter_mut().enumerate() {
            stop.order_within_day = position as u32 + 1;
        }
    }
}
