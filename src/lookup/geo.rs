use crate::error::{FunBotError, Result};
use serde::Deserialize;
use std::net::IpAddr;

/// Response of the ip-api.com JSON endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoLocation {
    pub status: String,
    pub message: Option<String>,
    pub query: String,
    pub country: Option<String>,
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
}

pub(crate) fn parse_address(address: &str) -> Result<IpAddr> {
    let address = address.trim();
    address
        .parse()
        .map_err(|_| FunBotError::InvalidArgument(format!("'{}' is not an IP address", address)))
}

impl GeoLocation {
    pub(crate) fn into_result(self) -> Result<Self> {
        if self.status == "success" {
            Ok(self)
        } else {
            Err(FunBotError::Lookup(format!(
                "no location for {}: {}",
                self.query,
                self.message.as_deref().unwrap_or("unknown error")
            )))
        }
    }

    pub fn render(&self) -> String {
        let unknown = "unknown";
        let mut lines = vec![format!("🌍 *IP lookup for `{}`*", self.query)];

        let place = [&self.city, &self.region_name, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "• Location: {}",
            if place.is_empty() { unknown } else { place.as_str() }
        ));

        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            lines.push(format!("• Coordinates: {:.4}, {:.4}", lat, lon));
        }
        lines.push(format!(
            "• Timezone: {}",
            self.timezone.as_deref().unwrap_or(unknown)
        ));
        lines.push(format!("• ISP: {}", self.isp.as_deref().unwrap_or(unknown)));
        if let Some(org) = self.org.as_deref().filter(|o| !o.is_empty()) {
            lines.push(format!("• Organization: {}", org));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert!(parse_address("8.8.8.8").is_ok());
        assert!(parse_address(" 2001:4860:4860::8888 ").is_ok());
        assert!(matches!(
            parse_address("example.com"),
            Err(FunBotError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_success_response() {
        let location: GeoLocation = serde_json::from_str(
            r#"{"status":"success","country":"United States","regionName":"Virginia",
                "city":"Ashburn","lat":39.03,"lon":-77.5,"timezone":"America/New_York",
                "isp":"Google LLC","org":"","query":"8.8.8.8"}"#,
        )
        .unwrap();
        let location = location.into_result().unwrap();
        let rendered = location.render();

        assert!(rendered.contains("IP lookup for `8.8.8.8`"));
        assert!(rendered.contains("• Location: Ashburn, Virginia, United States"));
        assert!(rendered.contains("• Coordinates: 39.0300, -77.5000"));
        assert!(rendered.contains("• ISP: Google LLC"));
        assert!(!rendered.contains("Organization"));
    }

    #[test]
    fn test_failure_response() {
        let location: GeoLocation = serde_json::from_str(
            r#"{"status":"fail","message":"private range","query":"10.0.0.1"}"#,
        )
        .unwrap();
        let err = location.into_result().unwrap_err();
        assert!(err.to_string().contains("private range"));
    }
}
