use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

use super::traits::MetadataSource;
use crate::domain::HoundMetadata;
use crate::error::{RaffleError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Hound metadata API client (`GET {base_url}/{token_id}`)
#[derive(Clone)]
pub struct HoundMetadataClient {
    http: Client,
    base_url: String,
}

impl HoundMetadataClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent("collar-raffler/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn token_url(&self, asset_id: u64) -> String {
        format!("{}/{}", self.base_url, asset_id)
    }
}

#[async_trait]
impl MetadataSource for HoundMetadataClient {
    #[instrument(skip(self))]
    async fn fetch(&self, asset_id: u64) -> Result<HoundMetadata> {
        let failed = |reason: String| RaffleError::MetadataFetch { asset_id, reason };

        let response = self
            .http
            .get(self.token_url(asset_id))
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }

        response
            .json::<HoundMetadata>()
            .await
            .map_err(|e| failed(format!("invalid metadata: {}", e)))
    }
}
