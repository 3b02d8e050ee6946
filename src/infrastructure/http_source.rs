// HTTP implementation of the reachability feed source
use crate::application::reach_source::{ReachSource, SourceError};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpReachSource {
    url: String,
    client: reqwest::Client,
}

impl HttpReachSource {
    pub fn new(url: String, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            url,
            client: builder.build()?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ReachSource for HttpReachSource {
    async fn fetch_csv(&self) -> Result<String, SourceError> {
        tracing::debug!("Fetching reachability feed from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "text/csv, text/plain")
            .send()
            .await
            .map_err(|e| SourceError::Request {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| SourceError::Body {
            url: self.url.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!("Fetched {} bytes from {}", text.len(), self.url);
        Ok(text)
    }
}
