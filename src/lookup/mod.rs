//! Informational lookups backed by public HTTP APIs

mod catfact;
mod geo;

pub use catfact::CatFact;
pub use geo::GeoLocation;

use crate::config::LookupConfig;
use crate::error::{FunBotError, Result};

pub struct LookupClient {
    http: reqwest::Client,
    catfact_url: String,
    geo_api_url: String,
}

impl LookupClient {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http,
            catfact_url: config.catfact_url.clone(),
            geo_api_url: config.geo_api_url.clone(),
        })
    }

    /// Fetch a random cat fact
    pub async fn cat_fact(&self) -> Result<CatFact> {
        tracing::debug!(url = %self.catfact_url, "Fetching cat fact");

        let fact: CatFact = self
            .http
            .get(&self.catfact_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if fact.fact.trim().is_empty() {
            return Err(FunBotError::Lookup("the cat fact service returned nothing".to_string()));
        }
        Ok(fact)
    }

    /// Geolocate an IPv4 or IPv6 address
    pub async fn geolocate(&self, address: &str) -> Result<GeoLocation> {
        let ip = geo::parse_address(address)?;
        let url = format!("{}/{}", self.geo_api_url, ip);
        tracing::debug!(url = %url, "Fetching IP geolocation");

        let location: GeoLocation = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        location.into_result()
    }
}
