/* src/provider.rs */

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{ProviderConfig, ProxySettings};
use crate::error::{GeoIpError, Result};

/// Geolocation of an address, as returned to API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub ip: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub isp: String,
}

/// Something that can geolocate an address.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Locate `ip`, or the provider's view of our own egress address when `None`.
    async fn locate(&self, ip: Option<&str>) -> Result<LocationRecord>;
}

/// Raw ip-api.com response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    #[serde(default)]
    query: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    region_name: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    isp: String,
}

impl IpApiResponse {
    fn into_record(self) -> std::result::Result<LocationRecord, String> {
        if self.status == "fail" {
            return Err(self
                .message
                .unwrap_or_else(|| "Invalid IP address".to_string()));
        }

        Ok(LocationRecord {
            ip: self.query,
            country: self.country,
            region: self.region_name,
            city: self.city,
            latitude: self.lat,
            longitude: self.lon,
            timezone: self.timezone,
            isp: self.isp,
        })
    }
}

/// Lookup against the ip-api.com JSON endpoint.
#[derive(Debug, Clone)]
pub struct IpApiProvider {
    client: Client,
    base_url: String,
}

impl IpApiProvider {
    /// Build the HTTP client once, routing through `proxy` when configured.
    pub fn new(config: &ProviderConfig, proxy: &ProxySettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("iplocate/", env!("CARGO_PKG_VERSION")))
            .no_proxy();

        if let Some(url) = &proxy.http {
            builder = builder.proxy(
                Proxy::http(url).map_err(|e| GeoIpError::Config(format!("invalid HTTP proxy: {e}")))?,
            );
        }
        if let Some(url) = &proxy.https {
            builder = builder.proxy(
                Proxy::https(url)
                    .map_err(|e| GeoIpError::Config(format!("invalid HTTPS proxy: {e}")))?,
            );
        }

        let client = builder
            .build()
            .map_err(|e| GeoIpError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, ip: Option<&str>) -> String {
        format!("{}/json/{}", self.base_url, ip.unwrap_or_default())
    }

    async fn fetch(&self, url: &str) -> std::result::Result<LocationRecord, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let body: IpApiResponse = response.json().await.map_err(|e| e.to_string())?;
        body.into_record()
    }
}

#[async_trait]
impl LocationProvider for IpApiProvider {
    async fn locate(&self, ip: Option<&str>) -> Result<LocationRecord> {
        let url = self.url_for(ip);
        debug!(url = %url, "querying location provider");

        self.fetch(&url).await.map_err(|reason| {
            warn!(ip = ip.unwrap_or("<egress>"), reason = %reason, "location lookup failed");
            match ip {
                Some(ip) => GeoIpError::lookup_failed(ip, reason),
                None => GeoIpError::current_lookup_failed(reason),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> IpApiResponse {
        serde_json::from_str(body).expect("fixture parses")
    }

    #[test]
    fn success_response_maps_to_record() {
        let body = r#"{
            "status": "success",
            "country": "United States",
            "countryCode": "US",
            "region": "VA",
            "regionName": "Virginia",
            "city": "Ashburn",
            "zip": "20149",
            "lat": 39.03,
            "lon": -77.5,
            "timezone": "America/New_York",
            "isp": "Google LLC",
            "org": "Google Public DNS",
            "as": "AS15169 Google LLC",
            "query": "8.8.8.8"
        }"#;

        let record = parse(body).into_record().expect("success");
        assert_eq!(
            record,
            LocationRecord {
                ip: "8.8.8.8".into(),
                country: "United States".into(),
                region: "Virginia".into(),
                city: "Ashburn".into(),
                latitude: 39.03,
                longitude: -77.5,
                timezone: "America/New_York".into(),
                isp: "Google LLC".into(),
            }
        );
    }

    #[test]
    fn fail_status_carries_provider_message() {
        let body = r#"{"status":"fail","message":"reserved range","query":"10.0.0.1"}"#;
        assert_eq!(parse(body).into_record(), Err("reserved range".to_string()));
    }

    #[test]
    fn fail_status_without_message() {
        let body = r#"{"status":"fail"}"#;
        assert_eq!(parse(body).into_record(), Err("Invalid IP address".to_string()));
    }

    #[test]
    fn urls() {
        let provider = IpApiProvider::new(
            &ProviderConfig {
                base_url: "http://ip-api.com/".into(),
                timeout_secs: 5,
            },
            &ProxySettings::default(),
        )
        .expect("client builds");

        assert_eq!(provider.url_for(Some("1.1.1.1")), "http://ip-api.com/json/1.1.1.1");
        assert_eq!(provider.url_for(None), "http://ip-api.com/json/");
    }

    #[test]
    fn invalid_proxy_is_a_config_error() {
        let proxy = ProxySettings {
            http: Some("not a url".into()),
            https: None,
        };
        let err = IpApiProvider::new(&ProviderConfig::default(), &proxy).unwrap_err();
        assert!(matches!(err, GeoIpError::Config(_)));
    }

    #[test]
    fn record_serializes_with_public_field_names() {
        let record = LocationRecord {
            ip: "1.1.1.1".into(),
            country: "Australia".into(),
            region: "Queensland".into(),
            city: "South Brisbane".into(),
            latitude: -27.47,
            longitude: 153.02,
            timezone: "Australia/Brisbane".into(),
            isp: "Cloudflare, Inc".into(),
        };
        let json = serde_json::to_value(&record).expect("serializes");
        assert_eq!(json["region"], "Queensland");
        assert_eq!(json["isp"], "Cloudflare, Inc");
    }
}
