use async_trait::async_trait;
use reqwest::{multipart, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    auth::Credential,
    config::Config,
    entities::ImageAsset,
    error::{not_found_error, unauthorized_error, upstream_error, Error},
    external::{PersistenceService, SaveResponse},
};

/// Decimal fields arrive either as JSON numbers or as strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Decimal {
    Number(f64),
    Text(String),
}

impl Decimal {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RemoteItinerary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub destination: String,
    pub duration: u32,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub user: Option<RemoteOwner>,
    #[serde(default)]
    pub days: Vec<RemoteDay>,
    #[serde(default)]
    pub latitude: Option<Decimal>,
    #[serde(default)]
    pub longitude: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RemoteOwner {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RemoteDay {
    pub day_number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stops: Vec<RemoteStop>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RemoteStop {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stop_type: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<Decimal>,
    #[serde(default)]
    pub longitude: Option<Decimal>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WireDay {
    pub day_number: u32,
    pub title: String,
    pub description: String,
    pub stops: Vec<WireStop>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WireStop {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub stop_type: String,
    pub location: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub order: u32,
}

/// The multipart body the itinerary service accepts: scalar fields, the
/// days encoded as a JSON string and an optional cover image.
#[derive(Clone, Debug, PartialEq)]
pub struct ItineraryForm {
    pub name: String,
    pub description: String,
    pub destination: String,
    pub duration: String,
    pub price: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub days: String,
    pub image: Option<ImageAsset>,
}

impl ItineraryForm {
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("destination", self.destination.clone()),
            ("duration", self.duration.clone()),
            ("price", self.price.clone()),
            ("days", self.days.clone()),
        ];

        if let (Some(latitude), Some(longitude)) = (&self.latitude, &self.longitude) {
            fields.push(("latitude", latitude.clone()));
            fields.push(("longitude", longitude.clone()));
        }

        fields
    }

    fn into_multipart(self) -> Result<multipart::Form, Error> {
        let mut form = multipart::Form::new();

        for (name, value) in self.text_fields() {
            form = form.text(name, value);
        }

        if let Some(image) = self.image {
            let part = multipart::Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.mime_type)?;
            form = form.part("image", part);
        }

        Ok(form)
    }
}

/// HTTP client for the itinerary service's user endpoints.
#[derive(Clone, Debug)]
pub struct ItineraryService {
    client: reqwest::Client,
    api_url: String,
}

impl ItineraryService {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.submit_timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/api/user/itineraries/", self.api_url)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/api/user/itineraries/{}/", self.api_url, id)
    }
}

#[async_trait]
impl PersistenceService for ItineraryService {
    #[tracing::instrument(skip(self, credential))]
    async fn fetch(&self, id: i64, credential: &Credential) -> Result<RemoteItinerary, Error> {
        let res = self
            .client
            .get(self.item_url(id))
            .header(reqwest::header::AUTHORIZATION, credential.authorization_header())
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => Ok(res.json().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(unauthorized_error()),
            StatusCode::NOT_FOUND => Err(not_found_error()),
            status => {
                tracing::warn!("itinerary fetch failed with status {}", status);
                Err(upstream_error())
            }
        }
    }

    #[tracing::instrument(skip(self, form, credential))]
    async fn save(
        &self,
        id: Option<i64>,
        form: ItineraryForm,
        credential: &Credential,
    ) -> Result<SaveResponse, Error> {
        let request = match id {
            Some(id) => self.client.put(self.item_url(id)),
            None => self.client.post(self.collection_url()),
        };

        let res = request
            .header(reqwest::header::AUTHORIZATION, credential.authorization_header())
            .multipart(form.into_multipart()?)
            .send()
            .await?;

        let status = res.status();

        if status.is_success() {
            return Ok(SaveResponse::Saved(res.json().await?));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(SaveResponse::Unauthorized);
        }

        let body = res.text().await.unwrap_or_default();

        if status == StatusCode::BAD_REQUEST {
            if let Ok(payload) = serde_json::from_str::<serde_json::Value>(&body) {
                if payload.is_object() {
                    return Ok(SaveResponse::FieldErrors(payload));
                }
            }
        }

        Ok(SaveResponse::Failed {
            status: status.as_u16(),
            message: format!("API error: {}", status.as_u16()),
        })
    }
}
