//! HTTP client for the Foursquare v2 venues API.
//!
//! Every call appends the static client id/secret, the API version date and
//! the `m=foursquare` mode. The JSON envelope's `meta.code` decides success;
//! the HTTP status alone is not trusted because the API reports its own
//! errors in the body.

pub mod types;

use crate::core::query::VenueQuery;
use crate::domain::model::{SearchResults, Venue, VenueDetails};
use crate::domain::ports::VenueProvider;
use crate::utils::error::{MapError, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use types::{DetailPayload, Envelope, SearchPayload};

pub const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v2/";
pub const DEFAULT_API_VERSION: &str = "20160716";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "venues/explore";

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Value of the `v` parameter.
    pub version: String,
    pub search_endpoint: String,
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            version: DEFAULT_API_VERSION.to_string(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub struct FoursquareClient {
    client: Client,
    base_url: Url,
    settings: ProviderSettings,
}

impl FoursquareClient {
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("neighborhood-map/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // 確保結尾只有一個斜線，join 才不會吃掉最後一段路徑
        let normalised = format!("{}/", settings.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| MapError::InvalidConfigValueError {
            field: "provider.base_url".to_string(),
            value: settings.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            settings,
        })
    }

    fn credential_pairs(&self) -> [(&str, &str); 4] {
        [
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("v", self.settings.version.as_str()),
            ("m", "foursquare"),
        ]
    }

    fn endpoint_url<I, K, V>(&self, path: &str, params: I) -> Result<Url>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| MapError::ConfigError {
                message: format!("invalid endpoint path '{}': {}", path, e),
            })?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .extend_pairs(self.credential_pairs());
        Ok(url)
    }

    /// The URL a search for `query` is sent to.
    pub fn search_url(&self, query: &VenueQuery) -> Result<Url> {
        self.endpoint_url(&self.settings.search_endpoint, query.params())
    }

    fn detail_url(&self, venue_id: &str) -> Result<Url> {
        let mut url = self.endpoint_url("venues/", std::iter::empty::<(&str, &str)>())?;
        url.path_segments_mut()
            .map_err(|_| MapError::ConfigError {
                message: "provider base URL cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .push(venue_id);
        Ok(url)
    }

    /// One GET, body parsed as an envelope. An empty body counts as `{}`,
    /// which then fails the `meta` check.
    async fn get_envelope<T: DeserializeOwned + Send>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", redact(&url));
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, bytes = body.len(), "provider answered");

        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        let value: serde_json::Value = serde_json::from_str(body)?;

        let code = value
            .get("meta")
            .and_then(|m| m.get("code"))
            .and_then(serde_json::Value::as_i64);
        if code != Some(200) {
            let message = serde_json::from_value::<Envelope<serde_json::Value>>(value)
                .map(|e| e.meta.describe())
                .unwrap_or_else(|_| "response has no meta block".to_string());
            return Err(MapError::Provider {
                code: code.unwrap_or_else(|| i64::from(status.as_u16())),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_value(value)?;
        envelope.response.ok_or_else(|| MapError::InvalidResponse {
            message: "envelope has no response block".to_string(),
        })
    }

    async fn fetch_details(&self, venue: &Venue) -> Result<VenueDetails> {
        let url = self.detail_url(&venue.id)?;
        let payload: DetailPayload = self.get_envelope(url).await?;
        let fallback = VenueDetails::fallback(&venue.name);

        Ok(VenueDetails {
            phone: payload
                .venue
                .contact
                .and_then(|c| c.formatted_phone)
                .unwrap_or(fallback.phone),
            website: payload.venue.url.unwrap_or(fallback.website),
        })
    }
}

#[async_trait]
impl VenueProvider for FoursquareClient {
    async fn search(&self, query: &VenueQuery) -> Result<SearchResults> {
        let url = self.search_url(query)?;
        let payload: SearchPayload = self.get_envelope(url).await?;

        let center = payload.geocode.as_ref().and_then(|g| g.center);
        let venues = payload.into_venues();
        tracing::debug!(venues = venues.len(), ?center, "parsed venue search");

        Ok(SearchResults { venues, center })
    }

    async fn venue_details(&self, venue: &Venue) -> VenueDetails {
        match self.fetch_details(venue).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(venue = %venue.id, "detail lookup failed, using placeholders: {}", e);
                VenueDetails::fallback(&venue.name)
            }
        }
    }
}

/// Log-safe rendering of a request URL.
fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "client_secret" { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Coordinate;

    fn client() -> FoursquareClient {
        FoursquareClient::new(
            ProviderSettings::new("id123", "secret456").with_base_url("http://localhost:9000/v2"),
        )
        .unwrap()
    }

    #[test]
    fn search_url_carries_query_then_credentials() {
        let query = VenueQuery::from_text("pizza near downtown", Coordinate::new(0.0, 0.0));
        let url = client().search_url(&query).unwrap();

        assert_eq!(url.path(), "/v2/venues/explore");
        assert_eq!(
            url.query().unwrap(),
            "near=downtown&query=pizza&intent=checkin&radius=3200\
             &client_id=id123&client_secret=secret456&v=20160716&m=foursquare"
        );
    }

    #[test]
    fn detail_url_appends_venue_id() {
        let url = client().detail_url("4b5c/x").unwrap();
        assert_eq!(url.path(), "/v2/venues/4b5c%2Fx");
        assert!(url.query().unwrap().contains("client_id=id123"));
    }

    #[test]
    fn redact_hides_secret() {
        let url = client()
            .endpoint_url("venues/explore", [("query", "tacos")])
            .unwrap();
        let shown = redact(&url);
        assert!(shown.contains("client_id=id123"));
        assert!(!shown.contains("secret456"));
    }

    #[test]
    fn bad_base_url_is_a_config_error() {
        let err = FoursquareClient::new(ProviderSettings::new("a", "b").with_base_url("::nope"))
            .err()
            .unwrap();
        assert!(matches!(err, MapError::InvalidConfigValueError { .. }));
    }
}
