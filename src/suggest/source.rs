use crate::data::geojson::GeoJson;
use crate::Result;
use async_trait::async_trait;

/// Source of the bulk location record set, fetched once at startup.
///
/// The production source is an HTTP route serving a static GeoJSON file;
/// tests and the demo app substitute an in-memory collection.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn fetch(&self) -> Result<GeoJson>;
}

/// Fetches the location data set over HTTP
pub struct HttpLocationSource {
    client: reqwest::Client,
    url: String,
}

impl HttpLocationSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl LocationSource for HttpLocationSource {
    async fn fetch(&self) -> Result<GeoJson> {
        let response = self.client.get(&self.url).send().await?;
        let response = response.error_for_status()?;
        let data: GeoJson = response.json().await?;
        Ok(data)
    }
}

/// Serves a fixed GeoJSON document, for tests and offline use
pub struct StaticLocationSource {
    data: GeoJson,
}

impl StaticLocationSource {
    pub fn new(data: GeoJson) -> Self {
        Self { data }
    }
}

#[async_trait]
impl LocationSource for StaticLocationSource {
    async fn fetch(&self) -> Result<GeoJson> {
        Ok(self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_round_trips() {
        let source = StaticLocationSource::new(GeoJson::empty());
        let data = source.fetch().await.unwrap();
        assert_eq!(data.features().len(), 0);
    }
}
