use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    entities::{Coordinates, Place},
    error::{invalid_input_error, upstream_error, Error},
    external::LocationResolver,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct GooglePlace {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<GooglePlace> for Place {
    fn from(place: GooglePlace) -> Self {
        let LatLng { lat, lng } = place.geometry.location;

        Place::new(place.formatted_address, Coordinates::new(lat, lng))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    results: Option<T>,
    candidates: Option<T>,
}

/// Place search and reverse geocoding backed by the Google Maps web APIs.
#[derive(Clone, Debug)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    key: String,
}

impl GoogleMaps {
    pub fn new(api_base: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            key: key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.google_maps_api_base.clone(),
            config.google_maps_api_key.clone(),
        )
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Response<T>, Error> {
        let url = format!("https://{}{}", self.api_base, path);

        let res = self
            .client
            .get(url)
            .query(&[("key", &self.key)])
            .query(query)
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response<T> = res.json().await?;

        if !(data.status == "OK" || data.status == "ZERO_RESULTS") {
            tracing::warn!("google maps returned status {}", data.status);
            return Err(upstream_error());
        }

        Ok(data)
    }
}

#[async_trait]
impl LocationResolver for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn resolve_forward(
        &self,
        text: &str,
        bias: Option<Coordinates>,
    ) -> Result<Option<Place>, Error> {
        let mut query = vec![
            ("input", text.to_string()),
            ("inputtype", "textquery".to_string()),
            ("fields", "formatted_address,geometry".to_string()),
        ];

        if let Some(bias) = bias {
            let point: String = bias.into();
            query.push(("locationbias", format!("point:{}", point)));
        }

        let data: Response<Vec<GooglePlace>> = self
            .get("/maps/api/place/findplacefromtext/json", &query)
            .await?;

        Ok(data
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Place::from))
    }

    #[tracing::instrument(skip(self))]
    async fn resolve_reverse(&self, coordinates: Coordinates) -> Result<String, Error> {
        let latlng: String = coordinates.into();

        let data: Response<Vec<GooglePlace>> = self
            .get("/maps/api/geocode/json", &[("latlng", latlng)])
            .await?;

        data.results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|place| place.formatted_address)
            .ok_or_else(|| upstream_error())
    }
}
