use uuid::Uuid;

use crate::{
    entities::{Category, Coordinates, Day, ItineraryDraft, PriceTier, Stop, MAX_DURATION_DAYS},
    error::Error,
    external::itinerary_service::{
        Decimal, ItineraryForm, RemoteDay, RemoteItinerary, RemoteStop, WireDay, WireStop,
    },
};

fn coordinates(latitude: &Option<Decimal>, longitude: &Option<Decimal>) -> Option<Coordinates> {
    match (
        latitude.as_ref().and_then(Decimal::value),
        longitude.as_ref().and_then(Decimal::value),
    ) {
        (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
        _ => None,
    }
}

fn stop_from_remote(remote: RemoteStop, order_within_day: u32) -> Stop {
    let coordinates = coordinates(&remote.latitude, &remote.longitude);

    // the service stores coordinates only; their text form is back-filled later
    let location_text = match remote.location {
        Some(text) if !text.trim().is_empty() => text,
        _ => coordinates.map(|c| c.to_string()).unwrap_or_default(),
    };

    Stop {
        key: Uuid::new_v4(),
        id: remote.id,
        name: remote.name,
        description: remote.description,
        category: Category::from_name(&remote.stop_type),
        location_text,
        coordinates,
        location_resolved: false,
        order_within_day,
    }
}

fn day_from_remote(remote: RemoteDay) -> Day {
    let mut stops = remote.stops;
    stops.sort_by_key(|stop| stop.order);

    Day {
        day_number: remote.day_number,
        title: remote.title,
        description: remote.description,
        stops: stops
            .into_iter()
            .enumerate()
            .map(|(position, stop)| stop_from_remote(stop, position as u32 + 1))
            .collect(),
    }
}

/// Builds a draft from a persisted itinerary. Returns every day the
/// service knows about, including days beyond the stored duration, so
/// they can be cached for restoration.
pub fn draft_from_remote(remote: RemoteItinerary) -> (ItineraryDraft, Vec<Day>) {
    let duration_days = remote.duration.clamp(1, MAX_DURATION_DAYS);

    let mut known: Vec<Day> = remote
        .days
        .into_iter()
        .filter(|day| day.day_number >= 1)
        .map(day_from_remote)
        .collect();
    known.sort_by_key(|day| day.day_number);
    known.dedup_by_key(|day| day.day_number);

    let days = (1..=duration_days)
        .map(|n| {
            known
                .iter()
                .find(|day| day.day_number == n)
                .cloned()
                .unwrap_or_else(|| Day::new(n))
        })
        .collect();

    let draft = ItineraryDraft {
        id: Some(remote.id),
        title: remote.name,
        description: remote.description,
        destination_text: remote.destination,
        destination_coordinates: coordinates(&remote.latitude, &remote.longitude)
            .map(|c| c.rounded()),
        duration_days,
        price_tier: PriceTier::from_price(remote.price.value().unwrap_or_default()),
        cover_image: None,
        days,
    };

    (draft, known)
}

fn wire_stop(stop: &Stop) -> WireStop {
    WireStop {
        id: stop.id,
        name: stop.name.clone(),
        description: stop.description.clone(),
        stop_type: stop.category.name().into(),
        location: stop.location_text.clone(),
        latitude: stop.coordinates.map(|c| c.fixed_latitude()),
        longitude: stop.coordinates.map(|c| c.fixed_longitude()),
        order: stop.order_within_day,
    }
}

fn wire_day(day: &Day) -> WireDay {
    WireDay {
        day_number: day.day_number,
        title: day.title.clone(),
        description: day.description.clone(),
        stops: day.stops.iter().map(wire_stop).collect(),
    }
}

pub fn form_from_draft(draft: &ItineraryDraft) -> Result<ItineraryForm, Error> {
    let days: Vec<WireDay> = draft.days.iter().map(wire_day).collect();

    Ok(ItineraryForm {
        name: draft.title.clone(),
        description: draft.description.clone(),
        destination: draft.destination_text.clone(),
        duration: draft.duration_days.to_string(),
        price: format!("{:.2}", draft.price_tier.representative_price()),
        latitude: draft.destination_coordinates.map(|c| c.fixed_latitude()),
        longitude: draft.destination_coordinates.map(|c| c.fixed_longitude()),
        days: serde_json::to_string(&days)?,
        image: draft.cover_image.clone(),
    })
}
