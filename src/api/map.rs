use anyhow::{Result, bail};
use serde_json::Value;

use super::decode;
use super::types::MapEnvelope;
use crate::credential::CredentialStore;
use crate::http::{RequestClient, RequestDescriptor, Transport};

impl MapEnvelope {
    /// The `data` payload, or an error carrying the server's message when `success` is false.
    pub fn into_data(self) -> Result<Value> {
        if !self.success {
            bail!(
                "{}",
                self.message
                    .unwrap_or_else(|| "map service request failed".to_string())
            );
        }
        Ok(self.data.unwrap_or(Value::Null))
    }
}

impl<T: Transport, S: CredentialStore> RequestClient<T, S> {
    async fn map_query(&self, path: &str, query: Vec<(&str, &str)>) -> Result<Value> {
        let descriptor = RequestDescriptor::get(path).with_query(query);
        let envelope: MapEnvelope = decode(self.execute(&descriptor).await?, "map response")?;
        envelope.into_data()
    }

    /// Address to coordinates.
    pub async fn geocode(&self, address: &str) -> Result<Value> {
        self.map_query("/map/geocode", vec![("address", address)]).await
    }

    /// Points of interest matching `query`, optionally narrowed by city and POI type.
    pub async fn search_poi(
        &self,
        query: &str,
        city: Option<&str>,
        types: Option<&str>,
    ) -> Result<Value> {
        let mut params = vec![("query", query)];
        if let Some(city) = city {
            params.push(("city", city));
        }
        if let Some(types) = types {
            params.push(("types", types));
        }
        self.map_query("/map/poi", params).await
    }

    /// Route between two `lng,lat` points; `mode` is `driving`, `walking` or `transit`.
    pub async fn route(&self, origin: &str, destination: &str, mode: &str) -> Result<Value> {
        self.map_query(
            "/map/route",
            vec![("origin", origin), ("destination", destination), ("mode", mode)],
        )
        .await
    }

    pub async fn weather(&self, city: &str) -> Result<Value> {
        self.map_query("/map/weather", vec![("city", city)]).await
    }
}
