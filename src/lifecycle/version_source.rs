//! Latest-version lookup
//!
//! The version endpoint answers a plain GET with a JSON object. Two of its
//! fields matter: the version string and the archive download URL. Their key
//! names come from the [`PackageSpec`]; everything else in the payload is ignored.
//!
//! ```json
//! { "windsurfVersion": "1.2.3", "url": "https://example.com/windsurf-1.2.3.tar.gz", "sha256hash": "..." }
//! ```
//!
//! Lookups are never retried and never cached.

use crate::config::PackageSpec;
use crate::core::LpmError;
use crate::lifecycle::http;
use anyhow::Result;
use reqwest::Client;
use serde_json::Value;

/// Latest release as announced by the version endpoint.
///
/// Built fresh from each query and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    /// Version string
    pub version: String,
    /// Where the archive for this version can be downloaded
    pub download_url: String,
}

/// Queries a JSON version endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpVersionSource {
    client: Client,
    url: String,
    version_field: String,
    url_field: String,
}

impl HttpVersionSource {
    /// Creates a source for the endpoint and field names of `spec`.
    #[must_use]
    pub fn new(client: Client, spec: &PackageSpec) -> Self {
        Self {
            client,
            url: spec.api_url.clone(),
            version_field: spec.version_field.clone(),
            url_field: spec.url_field.clone(),
        }
    }

    /// Fetches the latest version descriptor.
    ///
    /// # Errors
    ///
    /// - [`LpmError::NetworkError`] on transport failure or a non-success status
    /// - [`LpmError::MalformedResponse`] when the body is not a JSON object or
    ///   either field is missing or not a string
    pub async fn fetch_latest(&self) -> Result<VersionDescriptor> {
        let response = http::get(&self.client, &self.url).await?;
        let body = response.text().await.map_err(|e| http::network_error(&self.url, &e))?;

        let descriptor = self.parse(&body)?;
        tracing::debug!(
            target: "lifecycle",
            "Latest version {} at {}",
            descriptor.version,
            descriptor.download_url
        );
        Ok(descriptor)
    }

    fn parse(&self, body: &str) -> Result<VersionDescriptor, LpmError> {
        let payload: Value = serde_json::from_str(body).map_err(|e| LpmError::MalformedResponse {
            url: self.url.clone(),
            reason: format!("response is not valid JSON: {e}"),
        })?;

        if !payload.is_object() {
            return Err(LpmError::MalformedResponse {
                url: self.url.clone(),
                reason: "response is not a JSON object".to_string(),
            });
        }

        Ok(VersionDescriptor {
            version: self.string_field(&payload, &self.version_field)?,
            download_url: self.string_field(&payload, &self.url_field)?,
        })
    }

    fn string_field(&self, payload: &Value, field: &str) -> Result<String, LpmError> {
        match payload.get(field) {
            Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
            Some(Value::String(_)) => Err(LpmError::MalformedResponse {
                url: self.url.clone(),
                reason: format!("field '{field}' is empty"),
            }),
            Some(_) => Err(LpmError::MalformedResponse {
                url: self.url.clone(),
                reason: format!("field '{field}' is not a string"),
            }),
            None => Err(LpmError::MalformedResponse {
                url: self.url.clone(),
                reason: format!("field '{field}' is missing"),
            }),
        }
    }
}
