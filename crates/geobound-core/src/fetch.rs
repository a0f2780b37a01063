//! Archive download.
//!
//! The pipeline talks to an [`ArchiveSource`] so tests and alternative mirrors
//! can replace the HTTP implementation.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::USER_AGENT;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("geobound/", env!("CARGO_PKG_VERSION"));

/// Errors raised while downloading an archive.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Human-readable error message.
        message: String,
    },
    /// The request failed before a response arrived, or the body was cut short.
    #[error("network error while fetching {url}: {source}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The archive could not be written locally.
    #[error("failed to write archive to {path:?}: {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The HTTP client could not be built.
    #[error("failed to initialise HTTP client: {message}")]
    Client {
        /// Description of the failure.
        message: String,
    },
}

/// Something that can place a country archive on disk.
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    /// Downloads `url` into `dest`, replacing any existing file, and returns
    /// the number of bytes written.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// HTTP implementation of [`ArchiveSource`].
#[derive(Debug, Clone)]
pub struct HttpArchiveSource {
    client: Client,
}

impl HttpArchiveSource {
    /// Builds a source whose connections time out after `connect_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialised.
    pub fn new(connect_timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|err| FetchError::Client {
                message: err.to_string(),
            })?;
        Ok(Self { client })
    }

    async fn stream_to_file(
        &self,
        response: reqwest::Response,
        url: &str,
        dest: &Path,
    ) -> Result<u64, FetchError> {
        let write_error = |source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        };

        let mut file = tokio::fs::File::create(dest).await.map_err(write_error)?;
        let mut body = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|err| convert_reqwest_error(err, url))?;
            file.write_all(&chunk).await.map_err(write_error)?;
            written += u64::try_from(chunk.len()).unwrap_or(u64::MAX);
        }
        file.flush().await.map_err(write_error)?;
        Ok(written)
    }
}

#[async_trait]
impl ArchiveSource for HttpArchiveSource {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(err, url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(err, url))?;

        let result = self.stream_to_file(response, url, dest).await;
        if result.is_err() && dest.exists() {
            if let Err(err) = tokio::fs::remove_file(dest).await {
                warn!("Could not remove partial download {}: {err}", dest.display());
            }
        }
        result
    }
}

fn convert_reqwest_error(error: reqwest::Error, url: &str) -> FetchError {
    if let Some(status) = error.status() {
        return FetchError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    let kind = if error.is_timeout() {
        io::ErrorKind::TimedOut
    } else {
        io::ErrorKind::Other
    };
    FetchError::Network {
        url: url.to_owned(),
        source: io::Error::new(kind, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source() -> HttpArchiveSource {
        HttpArchiveSource::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_download_streams_body_to_file() {
        let server = MockServer::start().await;
        let body = vec![7u8; 64 * 1024];
        Mock::given(method("GET"))
            .and(path("/PAK_adm_shp.zip"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("PAK.zip");
        let url = format!("{}/PAK_adm_shp.zip", server.uri());

        let written = source().download(&url, &dest).await.unwrap();
        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("PAK.zip");
        std::fs::write(&dest, b"a much longer stale archive").unwrap();

        source()
            .download(&format!("{}/x.zip", server.uri()), &dest)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_http_status_maps_to_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("XXX.zip");
        let err = source()
            .download(&format!("{}/XXX_adm_shp.zip", server.uri()), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Http { status: 404, .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_connection_failure_maps_to_network_error() {
        let server = MockServer::start().await;
        let url = format!("{}/PAK_adm_shp.zip", server.uri());
        drop(server);

        let temp_dir = TempDir::new().unwrap();
        let err = source()
            .download(&url, &temp_dir.path().join("PAK.zip"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
    }

    #[tokio::test]
    async fn test_unwritable_destination_maps_to_write_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zip".to_vec()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("missing-dir").join("PAK.zip");
        let err = source()
            .download(&format!("{}/PAK.zip", server.uri()), &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Write { .. }));
    }
}
