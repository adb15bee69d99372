// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Resource fetching
//!
//! One outbound request per call: no retry and no coalescing of duplicate
//! concurrent requests. Callers short-circuit repeats through the record
//! cache.

use crate::error::FetchError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Retrieves decoded JSON documents by fully-qualified URL
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch `url` and decode its body as JSON
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for std::sync::Arc<T> {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        (**self).get_json(url).await
    }
}

/// Fetch `url` and decode it into `T`
pub async fn fetch_as<T, F>(fetcher: &F, url: &str) -> Result<T, FetchError>
where
    T: DeserializeOwned,
    F: Fetch + ?Sized,
{
    let value = fetcher.get_json(url).await?;
    serde_json::from_value(value).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// HTTP implementation backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with an optional per-request timeout
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| FetchError::Transport {
            url: String::new(),
            message: e.to_string(),
        })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport { url: url.to_string(), message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Response { url: url.to_string(), status: status.as_u16() });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Decode { url: url.to_string(), message: e.to_string() }
            } else {
                FetchError::Transport { url: url.to_string(), message: e.to_string() }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NamedResource;
    use serde_json::json;

    struct Fixed(Value);

    #[async_trait]
    impl Fetch for Fixed {
        async fn get_json(&self, _url: &str) -> Result<Value, FetchError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_fetch_as_decodes() {
        let fetcher = Fixed(json!({ "name": "potion", "url": "https://x/item/17/" }));
        let res: NamedResource = fetch_as(&fetcher, "https://x").await.unwrap();
        assert_eq!(res.name, "potion");
    }

    #[tokio::test]
    async fn test_fetch_as_reports_decode_errors() {
        let fetcher = Fixed(json!([1, 2, 3]));
        let err = fetch_as::<NamedResource, _>(&fetcher, "https://x").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }
}
