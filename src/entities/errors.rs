use std::collections::BTreeMap;

use crate::entities::day::DayField;
use crate::entities::itinerary::DraftField;
use crate::entities::stop::StopField;

/// Field scoped error messages for a whole draft, shared by local
/// validation and remote validation responses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorMap {
    pub fields: BTreeMap<DraftField, String>,
    pub days: BTreeMap<usize, BTreeMap<DayField, String>>,
    pub stops: BTreeMap<(usize, usize), BTreeMap<StopField, String>>,
    pub general: Option<String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.days.is_empty()
            && self.stops.is_empty()
            && self.general.is_none()
    }

    pub fn field(&self, field: DraftField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn day(&self, day_index: usize, field: DayField) -> Option<&str> {
        self.days
            .get(&day_index)
            .and_then(|errors| errors.get(&field))
            .map(String::as_str)
    }

    pub fn stop(&self, day_index: usize, stop_index: usize, field: StopField) -> Option<&str> {
        self.stops
            .get(&(day_index, stop_index))
            .and_then(|errors| errors.get(&field))
            .map(String::as_str)
    }

    pub fn set_field(&mut self, field: DraftField, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub fn set_day(&mut self, day_index: usize, field: DayField, message: impl Into<String>) {
        self.days
            .entry(day_index)
            .or_default()
            .insert(field, message.into());
    }

    pub fn set_stop(
        &mut self,
        day_index: usize,
        stop_index: usize,
        field: StopField,
        message: impl Into<String>,
    ) {
        self.stops
            .entry((day_index, stop_index))
            .or_default()
            .insert(field, message.into());
    }

    /// Appends to the general message rather than replacing it.
    pub fn push_general(&mut self, message: impl Into<String>) {
        let message = message.into();

        self.general = Some(match self.general.take() {
            Some(existing) => format!("{}, {}", existing, message),
            None => message,
        });
    }

    pub fn clear_field(&mut self, field: DraftField) {
        self.fields.remove(&field);
    }

    pub fn clear_day(&mut self, day_index: usize, field: DayField) {
        if let Some(errors) = self.days.get_mut(&day_index) {
            errors.remove(&field);
            if errors.is_empty() {
                self.days.remove(&day_index);
            }
        }
    }

    pub fn clear_stop(&mut self, day_index: usize, stop_index: usize, field: StopField) {
        if let Some(errors) = self.stops.get_mut(&(day_index, stop_index)) {
            errors.remove(&field);
            if errors.is_empty() {
                self.stops.remove(&(day_index, stop_index));
            }
        }
    }

    /// Drops the errors of a removed stop and shifts the errors of the
    /// stops after it so they stay attached to the same stops.
    pub fn remove_stop(&mut self, day_index: usize, stop_index: usize) {
        let stops = std::mem::take(&mut self.stops);

        self.stops = stops
            .into_iter()
            .filter_map(|((day, stop), errors)| {
                if day != day_index || stop < stop_index {
                    Some(((day, stop), errors))
                } else if stop == stop_index {
                    None
                } else {
                    Some(((day, stop - 1), errors))
                }
            })
            .collect();
    }

    pub fn move_stop(&mut self, day_index: usize, from: usize, to: usize) {
        let stops = std::mem::take(&mut self.stops);

        self.stops = stops
            .into_iter()
            .map(|((day, stop), errors)| {
                if day != day_index {
                    return ((day, stop), errors);
                }

                let position = if stop == from {
                    to
                } else if from < to && stop > from && stop <= to {
                    stop - 1
                } else if to < from && stop >= to && stop < from {
                    stop + 1
                } else {
                    stop
                };

                ((day, position), errors)
            })
            .collect();
    }

    /// Drops day and stop errors for days at or beyond `day_count`.
    pub fn truncate_days(&mut self, day_count: usize) {
        self.days.retain(|day, _| *day < day_count);
        self.stops.retain(|(day, _), _| *day < day_count);
    }

    pub fn merge(&mut self, other: ErrorMap) {
        self.fields.extend(other.fields);

        for (day, errors) in other.days {
            self.days.entry(day).or_default().extend(errors);
        }

        for (stop, errors) in other.stops {
            self.stops.entry(stop).or_default().extend(errors);
        }

        if let Some(general) = other.general {
            self.push_general(general);
        }
    }
}
