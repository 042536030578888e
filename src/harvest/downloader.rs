//! Image transfer
//!
//! Downloading is the run's one replaceable capability: the engine only needs
//! something that turns an address into a file on disk. Tests substitute a
//! recording fake; production uses the reqwest-backed client below. Transfer
//! failures are fatal upstream, so nothing here retries.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{QuireError, Result};

/// Persists one image from a remote address to a local file
#[async_trait]
pub trait Downloader {
    /// Performs a GET and writes the full response body to `destination`
    async fn fetch_and_store(&self, address: &str, destination: &Path) -> Result<()>;
}

/// HTTP downloader backed by a shared reqwest client
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Builds a client with the crate's user agent and the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn fetch_and_store(&self, address: &str, destination: &Path) -> Result<()> {
        let response = self
            .client
            .get(address)
            .send()
            .await
            .map_err(|source| QuireError::Transfer {
                address: address.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuireError::TransferStatus {
                address: address.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| QuireError::Transfer {
                address: address.to_string(),
                source,
            })?;
        tokio::fs::write(destination, &body).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_downloader() {
        let downloader = HttpDownloader::new(Duration::from_secs(30));
        assert!(downloader.is_ok());
    }

    // Transfer behavior is covered against a mock server in the integration
    // tests.
}
