//! Streaming downloads with progress reporting
//!
//! The body is written to the destination chunk by chunk; the payload is never
//! held in memory as a whole. A partially written file is left where it is; the
//! caller downloads into a staging [`TempDir`](crate::utils::fs::TempDir) whose
//! drop removes it.

use crate::core::LpmError;
use crate::lifecycle::http;
use crate::utils::progress::ProgressBar;
use anyhow::Result;
use reqwest::Client;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Downloads URLs to local files.
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    client: Client,
    label: String,
}

impl ArchiveFetcher {
    /// Creates a fetcher using `client`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            label: "Downloading".to_string(),
        }
    }

    /// Sets the message shown next to the progress indicator.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Streams `url` into `destination`, returning the number of bytes written.
    ///
    /// Shows a byte progress bar when the server sends a content length and a
    /// spinner otherwise.
    ///
    /// # Errors
    ///
    /// - [`LpmError::NetworkError`] on transport errors or a non-success status
    /// - [`LpmError::FileSystemError`] when the destination cannot be written
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        self.fetch_with(url, destination, ProgressBar::for_transfer).await
    }

    /// [`fetch`](Self::fetch) with the progress bar built by `make_progress`
    /// from the response's content length. The bar is cleared on every path.
    async fn fetch_with(
        &self,
        url: &str,
        destination: &Path,
        make_progress: impl FnOnce(Option<u64>) -> ProgressBar,
    ) -> Result<u64> {
        let response = http::get(&self.client, url).await?;

        let progress = make_progress(response.content_length());
        progress.set_message(self.label.clone());
        let result = stream_to_file(response, url, destination, &progress).await;
        progress.finish_and_clear();
        let written = result?;

        tracing::debug!(
            target: "lifecycle",
            "Downloaded {} bytes from {} to {}",
            written,
            url,
            destination.display()
        );
        Ok(written)
    }
}

async fn stream_to_file(
    mut response: reqwest::Response,
    url: &str,
    destination: &Path,
    progress: &ProgressBar,
) -> Result<u64> {
    let mut file =
        tokio::fs::File::create(destination).await.map_err(|e| write_error(destination, &e))?;

    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await.map_err(|e| http::network_error(url, &e))? {
        file.write_all(&chunk).await.map_err(|e| write_error(destination, &e))?;
        written += chunk.len() as u64;
        progress.inc(chunk.len() as u64);
    }

    file.flush().await.map_err(|e| write_error(destination, &e))?;
    file.sync_all().await.map_err(|e| write_error(destination, &e))?;
    Ok(written)
}

fn write_error(path: &Path, error: &std::io::Error) -> LpmError {
    LpmError::FileSystemError {
        operation: "download".to_string(),
        path: path.display().to_string(),
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use httpmock::prelude::*;

    fn fetcher() -> ArchiveFetcher {
        ArchiveFetcher::new(http::build_client(&NetworkConfig::default()).unwrap())
            .with_label("Downloading test payload")
    }

    #[tokio::test]
    async fn test_fetch_streams_body_to_file() {
        let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/archive.tar.gz");
                then.status(200).body(payload.clone());
            })
            .await;

        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("archive.tar.gz");

        let written = fetcher().fetch(&server.url("/archive.tar.gz"), &destination).await.unwrap();

        assert_eq!(written, payload.len() as u64);
        assert_eq!(std::fs::read(&destination).unwrap(), payload);
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_network_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("archive.tar.gz");

        let err = fetcher().fetch(&server.url("/missing"), &destination).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<LpmError>(), Some(LpmError::NetworkError { .. })));
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_fetch_into_missing_directory_is_filesystem_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/file");
                then.status(200).body("data");
            })
            .await;

        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("no-such-dir").join("file");

        let err = fetcher().fetch(&server.url("/file"), &destination).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<LpmError>(), Some(LpmError::FileSystemError { .. })));
    }

    #[tokio::test]
    async fn test_failed_write_clears_progress() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/file");
                then.status(200).body("data");
            })
            .await;

        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("no-such-dir").join("file");

        let shown = std::sync::Mutex::new(None);
        let result = fetcher()
            .fetch_with(&server.url("/file"), &destination, |len| {
                let bar = ProgressBar::for_transfer(len);
                *shown.lock().unwrap() = Some(bar.clone());
                bar
            })
            .await;

        assert!(result.is_err());
        let bar = shown.lock().unwrap().take().expect("progress bar was created");
        assert!(bar.is_finished());
    }
}
