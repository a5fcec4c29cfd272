use super::helpers::form_from_draft;
use super::Editor;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    api::{SubmissionAPI, ValidationAPI},
    entities::{DayField, DraftField, ErrorMap, StopField},
    external::SaveResponse,
};

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Submitted { id: i64 },
    /// Local or remote field errors. Nothing was saved.
    Rejected(ErrorMap),
    /// The session has no credential, or the service refused it.
    AuthExpired,
    Failed { message: String },
}

/// Flattens a field error value into one message. The service sends
/// either a string or a list of strings per field.
fn message(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        _ => None,
    }
}

fn general(errors: &mut ErrorMap, key: &str, value: &Value) {
    let text = message(value).unwrap_or_else(|| value.to_string());

    match key {
        "detail" | "non_field_errors" => errors.push_general(text),
        _ => errors.push_general(format!("{}: {}", key, text)),
    }
}

fn draft_field(key: &str) -> Option<DraftField> {
    match key {
        "name" => Some(DraftField::Title),
        "description" => Some(DraftField::Description),
        "destination" => Some(DraftField::DestinationText),
        "latitude" | "longitude" => Some(DraftField::DestinationCoordinates),
        "duration" => Some(DraftField::Duration),
        "price" => Some(DraftField::Price),
        "image" => Some(DraftField::CoverImage),
        _ => None,
    }
}

fn day_field(key: &str) -> Option<DayField> {
    match key {
        "title" => Some(DayField::Title),
        "description" => Some(DayField::Description),
        _ => None,
    }
}

fn stop_field(key: &str) -> Option<StopField> {
    match key {
        "name" => Some(StopField::Name),
        "description" => Some(StopField::Description),
        "stop_type" => Some(StopField::Category),
        "location" | "latitude" | "longitude" => Some(StopField::Location),
        _ => None,
    }
}

/// Nested errors arrive as a list with one entry per item; a list of plain
/// strings is a message about the list itself.
fn nested(value: &Value) -> Option<&Vec<Value>> {
    value
        .as_array()
        .filter(|items| items.iter().any(Value::is_object))
}

fn merge_stop_errors(errors: &mut ErrorMap, day_index: usize, stops: &[Value]) {
    for (stop_index, stop) in stops.iter().enumerate() {
        let stop = match stop.as_object() {
            Some(stop) => stop,
            None => {
                if message(stop).is_some() {
                    general(errors, "stops", stop);
                }
                continue;
            }
        };

        for (key, value) in stop {
            match (stop_field(key), message(value)) {
                (Some(field), Some(text)) => errors.set_stop(day_index, stop_index, field, text),
                _ => general(errors, key, value),
            }
        }
    }
}

fn merge_day_errors(errors: &mut ErrorMap, days: &[Value]) {
    for (day_index, day) in days.iter().enumerate() {
        let day = match day.as_object() {
            Some(day) => day,
            None => {
                if message(day).is_some() {
                    general(errors, "days", day);
                }
                continue;
            }
        };

        for (key, value) in day {
            if key == "stops" {
                if let Some(stops) = nested(value) {
                    merge_stop_errors(errors, day_index, stops);
                    continue;
                }
            }

            match (day_field(key), message(value)) {
                (Some(field), Some(text)) => errors.set_day(day_index, field, text),
                _ => general(errors, key, value),
            }
        }
    }
}

/// Maps a field error payload from the itinerary service onto the same
/// shape local validation produces. Keys with no editable counterpart end
/// up in the general message.
pub fn merge_remote_errors(payload: &Value) -> ErrorMap {
    let mut errors = ErrorMap::new();

    let fields = match payload.as_object() {
        Some(fields) => fields,
        None => {
            general(&mut errors, "detail", payload);
            return errors;
        }
    };

    for (key, value) in fields {
        if key == "days" {
            if let Some(days) = nested(value) {
                merge_day_errors(&mut errors, days);
                continue;
            }
        }

        match (draft_field(key), message(value)) {
            (Some(field), Some(text)) => errors.set_field(field, text),
            _ => general(&mut errors, key, value),
        }
    }

    errors
}

#[async_trait]
impl SubmissionAPI for Editor {
    #[tracing::instrument(skip(self))]
    async fn submit(&mut self) -> SubmitOutcome {
        if !self.validate().is_empty() {
            return SubmitOutcome::Rejected(self.errors.clone());
        }

        let credential = match self.collaborators.session.credential().await {
            Some(credential) => credential,
            None => {
                tracing::warn!("submit without a credential");
                return SubmitOutcome::AuthExpired;
            }
        };

        let form = match form_from_draft(&self.draft) {
            Ok(form) => form,
            Err(err) => {
                tracing::error!("failed to serialize draft: {}", err);
                return self.failed(err.message);
            }
        };

        let response = self
            .collaborators
            .service
            .save(self.draft.id, form, &credential)
            .await;

        match response {
            Ok(SaveResponse::Saved(remote)) => {
                self.draft.id = Some(remote.id);
                self.snapshot.refresh(&self.draft.days);
                self.errors = ErrorMap::new();

                tracing::info!("saved itinerary {}", remote.id);

                SubmitOutcome::Submitted { id: remote.id }
            }
            Ok(SaveResponse::FieldErrors(payload)) => {
                let remote_errors = merge_remote_errors(&payload);
                tracing::info!("itinerary service rejected the draft: {:?}", remote_errors);

                self.errors.merge(remote_errors);
                SubmitOutcome::Rejected(self.errors.clone())
            }
            Ok(SaveResponse::Unauthorized) => {
                tracing::warn!("itinerary service refused the credential");
                SubmitOutcome::AuthExpired
            }
            Ok(SaveResponse::Failed { status, message }) => {
                tracing::error!("itinerary service failed with {}: {}", status, message);
                self.failed(message)
            }
            Err(err) => {
                tracing::error!("failed to reach itinerary service: {}", err);
                self.failed(err.message)
            }
        }
    }
}

impl Editor {
    fn failed(&mut self, message: String) -> SubmitOutcome {
        self.errors.push_general(message.clone());

        SubmitOutcome::Failed { message }
    }
}
