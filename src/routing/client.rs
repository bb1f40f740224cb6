use crate::core::config::ClientConfig;
use crate::core::geo::LatLng;
use crate::data::geojson::GeoJson;
use crate::layers::registry::LayerId;
use crate::routing::response::RouteResponse;
use crate::suggest::selection::{DestinationSelection, StartSelection};
use crate::{Error, Result};
use async_trait::async_trait;

/// Parameters of a zip-to-zip routing query, built from the endpoint
/// selections. Address and city details ride along when the user accepted
/// concrete suggestions, enabling precise routing on the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ZipRouteQuery {
    pub start_zip: String,
    /// Comma-joined destination postcodes
    pub end_zips: String,
    pub start_address: String,
    pub start_city: String,
    pub end_addresses: Vec<String>,
    pub end_cities: Vec<String>,
}

impl ZipRouteQuery {
    /// Validates and assembles a query; both endpoints must be filled in
    /// before anything is sent.
    pub fn from_selections(
        start: &StartSelection,
        destinations: &DestinationSelection,
    ) -> Result<Self> {
        let start_record = start.record().ok_or_else(|| {
            Error::Input("Both start and end zipcode fields need to be filled".to_string())
        })?;
        if destinations.is_empty() {
            return Err(Error::Input(
                "Both start and end zipcode fields need to be filled".to_string(),
            ));
        }

        let records = destinations.records();
        Ok(Self {
            start_zip: start_record.postcode.clone(),
            end_zips: destinations.zip_text(),
            start_address: start_record.address.clone(),
            start_city: start_record.city.clone(),
            end_addresses: records.iter().map(|r| r.address.clone()).collect(),
            end_cities: records.iter().map(|r| r.city.clone()).collect(),
        })
    }

    /// Query-string pairs; `dest_key` is "endZip" for multiple destinations
    /// and "waypoints" for round trips.
    fn params(&self, dest_key: &str) -> Vec<(String, String)> {
        vec![
            ("startZip".to_string(), self.start_zip.clone()),
            (dest_key.to_string(), self.end_zips.clone()),
            ("startAddress".to_string(), self.start_address.clone()),
            ("startCity".to_string(), self.start_city.clone()),
            ("endAddresses".to_string(), self.end_addresses.join("|")),
            ("endCities".to_string(), self.end_cities.join("|")),
        ]
    }
}

/// The external route-computation service.
///
/// Every call is a single request/response exchange; failures are terminal
/// for the triggering user action and nothing retries.
#[async_trait]
pub trait RoutingBackend: Send + Sync {
    /// Routes from the origin to each destination independently
    async fn zip_routes(&self, query: &ZipRouteQuery) -> Result<RouteResponse>;

    /// Plans a circular tour through all destinations
    async fn zip_roundtrip(&self, query: &ZipRouteQuery) -> Result<RouteResponse>;

    /// Routes between two geocoded addresses
    async fn address_route(&self, start: &LatLng, end: &LatLng) -> Result<RouteResponse>;

    /// Persists a drawn or uploaded layer
    async fn store_layer(&self, id: LayerId, data: &GeoJson) -> Result<()>;

    /// Deletes a previously stored layer
    async fn delete_layer(&self, id: LayerId) -> Result<()>;

    /// Fetches the stored feature data of a layer
    async fn layer_data(&self, id: LayerId) -> Result<GeoJson>;
}

/// HTTP implementation against the production backend routes
pub struct HttpRoutingBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRoutingBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_route(&self, path: &str, params: &[(String, String)]) -> Result<RouteResponse> {
        log::debug!("route query {} ({} params)", path, params.len());
        let response = self
            .client
            .get(self.url(path))
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        let body: serde_json::Value = response.json().await?;
        RouteResponse::from_wire(body)
    }
}

#[async_trait]
impl RoutingBackend for HttpRoutingBackend {
    async fn zip_routes(&self, query: &ZipRouteQuery) -> Result<RouteResponse> {
        self.get_route("/get_zip_r", &query.params("endZip")).await
    }

    async fn zip_roundtrip(&self, query: &ZipRouteQuery) -> Result<RouteResponse> {
        self.get_route("/get_zip_roundtrip", &query.params("waypoints"))
            .await
    }

    async fn address_route(&self, start: &LatLng, end: &LatLng) -> Result<RouteResponse> {
        let params = [
            (
                "startPoint".to_string(),
                format!("{},{}", start.lat, start.lng),
            ),
            ("endPoint".to_string(), format!("{},{}", end.lat, end.lng)),
        ];
        self.get_route("/get_address_route", &params).await
    }

    async fn store_layer(&self, id: LayerId, data: &GeoJson) -> Result<()> {
        let mut body = serde_json::to_value(data)?;
        if let serde_json::Value::Object(map) = &mut body {
            map.insert("id".to_string(), serde_json::json!(id.0));
        }

        self.client
            .post(self.url("/add_to_db"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_layer(&self, id: LayerId) -> Result<()> {
        self.client
            .post(self.url("/delete"))
            .json(&serde_json::json!({ "id": id.0 }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn layer_data(&self, id: LayerId) -> Result<GeoJson> {
        let response = self
            .client
            .get(self.url(&format!("/get_layer_data/{}", id.0)))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
