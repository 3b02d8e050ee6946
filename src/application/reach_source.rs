// Source port for the raw reachability feed
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read body from {url}: {message}")]
    Body { url: String, message: String },
}

#[async_trait]
pub trait ReachSource: Send + Sync {
    /// Fetch the whole CSV feed as text
    async fn fetch_csv(&self) -> Result<String, SourceError>;
}
