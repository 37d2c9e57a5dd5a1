use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::traits::RemoteStore;
use crate::{
    rotation::{Item, Sequence},
    votemap::VoteMapConfig,
};

/// Envelope wrapping every console API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    result: Option<T>,
    #[serde(default)]
    failed: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    command: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the result, treating `failed: true` as an error even on HTTP 2xx
    fn into_result(self, endpoint: &str) -> Result<Option<T>> {
        if self.failed {
            let command = self.command.as_deref().unwrap_or(endpoint);
            let error = self.error.as_deref().unwrap_or("unknown error");
            anyhow::bail!("{} failed: {}", command, error);
        }
        Ok(self.result)
    }
}

#[derive(Debug, Serialize)]
struct SetMapRotation<'a> {
    map_names: &'a [String],
}

/// Remote backed by the console's REST API
pub struct HttpRemote {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRemote {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            token,
        })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}{}", self.base_url, name)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, name: &str, request: RequestBuilder) -> Result<Option<T>> {
        tracing::debug!("Calling {}", self.endpoint(name));

        let response = self
            .authorize(request)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", name))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} returned {}: {}", name, status, body.trim());
        }

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to decode {} response", name))?;
        envelope.into_result(name)
    }

    async fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let request = self.client.get(self.endpoint(name));
        self.send(name, request)
            .await?
            .with_context(|| format!("{} returned no result", name))
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

impl RemoteStore for HttpRemote {
    async fn fetch_rotation(&self) -> Result<Sequence> {
        let maps: Vec<Item> = self.get("get_map_rotation").await?;
        Ok(Sequence::new(maps))
    }

    async fn push_rotation(&self, ids: Vec<String>) -> Result<()> {
        let name = "set_maprotation";
        let request = self
            .client
            .post(self.endpoint(name))
            .json(&SetMapRotation { map_names: &ids });
        let _: Option<serde_json::Value> = self.send(name, request).await?;
        tracing::info!("Pushed rotation of {} map(s)", ids.len());
        Ok(())
    }

    async fn fetch_votemap_config(&self) -> Result<VoteMapConfig> {
        self.get("get_votemap_config").await
    }

    async fn fetch_catalog(&self) -> Result<Sequence> {
        let maps: Vec<Item> = self.get("get_maps").await?;
        Ok(Sequence::new(maps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://localhost:8010/api"), "http://localhost:8010/api/");
        assert_eq!(normalize_base_url("http://localhost:8010/api/"), "http://localhost:8010/api/");
    }

    #[test]
    fn test_envelope_failed_is_error() {
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(
            r#"{"result": null, "failed": true, "error": "bad map", "command": "set_maprotation"}"#,
        )
        .unwrap();
        let err = envelope.into_result("set_maprotation").unwrap_err();
        assert_eq!(err.to_string(), "set_maprotation failed: bad map");
    }

    #[test]
    fn test_envelope_rotation_result() {
        let envelope: ApiResponse<Vec<Item>> = serde_json::from_str(
            r#"{
                "result": [
                    {"id": "stmariedumont_warfare", "pretty_name": "St. Marie Du Mont Warfare"},
                    {"id": "hurtgenforest_warfare_V2", "pretty_name": "Hurtgen Forest Warfare"}
                ],
                "failed": false,
                "error": null,
                "command": "get_map_rotation"
            }"#,
        )
        .unwrap();
        let maps = envelope.into_result("get_map_rotation").unwrap().unwrap();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[1].label, "Hurtgen Forest Warfare");
    }

    #[test]
    fn test_endpoint_join() {
        let remote = HttpRemote::new("http://localhost:8010/api", None, Duration::from_secs(5)).unwrap();
        assert_eq!(remote.endpoint("get_maps"), "http://localhost:8010/api/get_maps");
    }
}
