use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Rounds both components to six decimal places, the precision the
    /// itinerary service stores.
    pub fn rounded(&self) -> Self {
        let round = |v: f64| (v * 1e6).round() / 1e6;

        Self {
            latitude: round(self.latitude),
            longitude: round(self.longitude),
        }
    }

    pub fn fixed_latitude(&self) -> String {
        format!("{:.6}", self.latitude)
    }

    pub fn fixed_longitude(&self) -> String {
        format!("{:.6}", self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.latitude, coordinates.longitude)
    }
}

/// A location confirmed by the resolver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub address: String,
    pub coordinates: Coordinates,
}

impl Place {
    pub fn new(address: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            address: address.into(),
            coordinates,
        }
    }
}

/// Whether `text` is shaped like `"{lat}, {lng}"`: two comma separated
/// numbers and nothing alphabetic. Purely syntactic.
pub fn is_raw_coordinate_text(text: &str) -> bool {
    if text.chars().any(char::is_alphabetic) {
        return false;
    }

    let parts: Vec<&str> = text.split(',').map(str::trim).collect();

    parts.len() == 2
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.parse::<f64>().is_ok())
}
