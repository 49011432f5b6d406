//! Pluggable lookup client.
//!
//! The engine depends only on [`TrainApi`]; the HTTP implementation below
//! mirrors the staging API's endpoints.

use std::future::Future;
use std::pin::Pin;

use chrono::{NaiveDate, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::types::{Journey, StationLocation};

pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Remote station/train lookups
pub trait TrainApi: Send + Sync {
    /// Coordinates for a single location code
    fn lookup_station<'a>(&'a self, code: &'a str) -> ApiFuture<'a, StationLocation>;

    /// Today's services calling at a location code
    fn lookup_schedule<'a>(&'a self, code: &'a str) -> ApiFuture<'a, Vec<Journey>>;

    /// Every calling point of one service, as returned by the API
    fn lookup_full_schedule<'a>(&'a self, train_id: &'a str) -> ApiFuture<'a, serde_json::Value>;
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct LocationsRequest {
    tiplocs: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationsResponse {
    #[serde(default)]
    tiplocs_locations: Vec<StationLocation>,
}

pub struct HttpTrainApi {
    client: Client,
    config: ApiConfig,
}

impl HttpTrainApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        endpoint(&self.config.base_url, segments)
    }

    /// Fetch locations for several codes in one request
    pub async fn lookup_stations(&self, codes: &[&str]) -> Result<Vec<StationLocation>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint(&["Tiploc", "TiplocLocations"])?;
        let body = LocationsRequest {
            tiplocs: codes.iter().map(|c| c.to_uppercase()).collect(),
        };

        tracing::debug!(%url, count = codes.len(), "requesting locations");
        let response = self
            .client
            .post(url)
            .header("X-ApiKey", self.config.require_key()?)
            .json(&body)
            .send()
            .await?;

        let text = read_body(response, "Multi-location fetch failed").await?;
        decode_locations(&text)
    }

    async fn fetch_station(&self, code: &str) -> Result<StationLocation> {
        self.lookup_stations(&[code])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(code.to_owned()))
    }

    async fn fetch_schedule(&self, code: &str) -> Result<Vec<Journey>> {
        let (start, end) = schedule_window(Utc::now().date_naive());
        let code = code.to_uppercase();
        let url = self.endpoint(&["trains", "tiploc", &code, &start, &end])?;

        tracing::debug!(%url, "requesting schedule");
        let response = self
            .client
            .get(url)
            .header("X-ApiKey", self.config.require_key()?)
            .send()
            .await?;

        let text = read_body(response, "Schedule fetch failed").await?;
        decode_schedule(&text)
    }

    async fn fetch_full_schedule(&self, train_id: &str) -> Result<serde_json::Value> {
        let url = self.endpoint(&["trains", train_id.trim()])?;

        tracing::debug!(%url, "requesting full schedule");
        let response = self
            .client
            .get(url)
            .header("X-ApiKey", self.config.require_key()?)
            .send()
            .await?;

        let text = read_body(response, "Full schedule fetch failed").await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl TrainApi for HttpTrainApi {
    fn lookup_station<'a>(&'a self, code: &'a str) -> ApiFuture<'a, StationLocation> {
        Box::pin(self.fetch_station(code))
    }

    fn lookup_schedule<'a>(&'a self, code: &'a str) -> ApiFuture<'a, Vec<Journey>> {
        Box::pin(self.fetch_schedule(code))
    }

    fn lookup_full_schedule<'a>(&'a self, train_id: &'a str) -> ApiFuture<'a, serde_json::Value> {
        Box::pin(self.fetch_full_schedule(train_id))
    }
}

async fn read_body(response: reqwest::Response, context: &'static str) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), context, "lookup request rejected");
        return Err(ApiError::Status {
            context,
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidUrl(base.to_owned()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Whole-day query window for a service date
fn schedule_window(date: NaiveDate) -> (String, String) {
    let day = date.format("%Y-%m-%d");
    (format!("{day} 00:00:00"), format!("{day} 23:59:59"))
}

fn decode_locations(body: &str) -> Result<Vec<StationLocation>> {
    let response: LocationsResponse = serde_json::from_str(body)?;
    Ok(response.tiplocs_locations)
}

/// Anything other than a JSON array decodes to an empty schedule
fn decode_schedule(body: &str) -> Result<Vec<Journey>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_array() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(value)?)
}
