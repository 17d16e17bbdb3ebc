//! HTTP download adapter for the media fetch port.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tracing::{debug, warn};

use crate::domain::entities::RawAsset;
use crate::domain::errors::{PipelineError, PipelineResult};
use crate::domain::ports::MediaFetchPort;
use crate::infrastructure::config::PipelineConfig;

use super::urls::filename_from_url;

/// Configuration for [`HttpMediaFetcher`].
#[derive(Debug, Clone)]
pub struct MediaFetcherConfig {
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Body size above which the download is abandoned.
    pub max_bytes: usize,
}

impl From<&PipelineConfig> for MediaFetcherConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.request_timeout(),
            max_bytes: config.max_input_bytes,
        }
    }
}

/// Downloads media over HTTP(S) with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpMediaFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpMediaFetcher {
    /// Creates a fetcher with its own connection pool.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &MediaFetcherConfig) -> PipelineResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelineError::processing("failed to create HTTP client", e))?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }

    fn transport_error(url: &str, error: reqwest::Error) -> PipelineError {
        let message = if error.is_timeout() {
            "request timed out"
        } else if error.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        PipelineError::download_with_cause(url, message, error)
    }
}

#[async_trait]
impl MediaFetchPort for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> PipelineResult<RawAsset> {
        debug!(url, "Downloading media");

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::download(
                url,
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        let declared = response
            .content_length()
            .map(|len| usize::try_from(len).unwrap_or(usize::MAX));
        if let Some(declared) = declared.filter(|&len| len > self.max_bytes) {
            warn!(url, declared, max = self.max_bytes, "Declared body exceeds limit");
            return Err(PipelineError::too_large(declared, self.max_bytes));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Self::transport_error(url, e))?
        {
            let received = body.len() + chunk.len();
            if received > self.max_bytes {
                warn!(url, received, max = self.max_bytes, "Body exceeds limit");
                return Err(PipelineError::too_large(received, self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(PipelineError::download(url, "empty response body"));
        }

        debug!(url, size = body.len(), "Media downloaded");

        let mut asset = RawAsset::new(body.freeze());
        if let Some(ct) = content_type {
            asset = asset.with_content_type(ct);
        }
        if let Some(name) = filename_from_url(url) {
            asset = asset.with_filename(name);
        }
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::PipelineErrorKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    struct CannedResponse {
        status_line: &'static str,
        content_type: Option<&'static str>,
        body: Vec<u8>,
    }

    impl CannedResponse {
        fn ok(body: impl Into<Vec<u8>>) -> Self {
            Self {
                status_line: "200 OK",
                content_type: Some("image/png"),
                body: body.into(),
            }
        }
    }

    /// Serves one canned response and reports the raw request head.
    async fn serve_once(response: CannedResponse) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let _ = tx.send(String::from_utf8_lossy(&head).into_owned());

            let mut reply = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                response.status_line,
                response.body.len()
            );
            if let Some(ct) = response.content_type {
                reply.push_str(&format!("Content-Type: {ct}\r\n"));
            }
            reply.push_str("\r\n");
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.write_all(&response.body).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        (format!("http://{addr}/stickers/123.png?size=160"), rx)
    }

    fn fetcher(max_bytes: usize) -> HttpMediaFetcher {
        HttpMediaFetcher::new(&MediaFetcherConfig {
            user_agent: "stickerforge-test/1.0".to_string(),
            timeout: Duration::from_secs(5),
            max_bytes,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_success_carries_metadata_and_user_agent() {
        let (url, request) = serve_once(CannedResponse::ok(b"\x89PNG body".to_vec())).await;

        let asset = fetcher(1024).fetch(&url).await.unwrap();

        assert_eq!(asset.bytes().as_ref(), b"\x89PNG body");
        assert_eq!(asset.content_type(), Some("image/png"));
        assert_eq!(asset.filename(), Some("123.png"));

        let head = request.await.unwrap().to_ascii_lowercase();
        assert!(head.contains("user-agent: stickerforge-test/1.0"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_download_error() {
        let (url, _request) = serve_once(CannedResponse {
            status_line: "404 Not Found",
            content_type: Some("text/html"),
            body: b"<html>missing</html>".to_vec(),
        })
        .await;

        let err = fetcher(1024).fetch(&url).await.unwrap_err();
        assert_eq!(err.kind(), PipelineErrorKind::Download);
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_empty_body_is_download_error() {
        let (url, _request) = serve_once(CannedResponse {
            status_line: "200 OK",
            content_type: None,
            body: Vec::new(),
        })
        .await;

        let err = fetcher(1024).fetch(&url).await.unwrap_err();
        assert_eq!(err.kind(), PipelineErrorKind::Download);
    }

    #[tokio::test]
    async fn test_oversized_body_is_too_large() {
        let (url, _request) = serve_once(CannedResponse::ok(vec![7u8; 4096])).await;

        let err = fetcher(1000).fetch(&url).await.unwrap_err();
        assert!(matches!(err, PipelineError::TooLarge { max: 1000, .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_download_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetcher(1024)
            .fetch(&format!("http://{addr}/a.png"))
            .await
            .unwrap_err();
        assert!(err.is_network_error());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_timeout_is_download_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let fetcher = HttpMediaFetcher::new(&MediaFetcherConfig {
            user_agent: "stickerforge-test/1.0".to_string(),
            timeout: Duration::from_millis(200),
            max_bytes: 1024,
        })
        .unwrap();

        let err = fetcher
            .fetch(&format!("http://{addr}/slow.png"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), PipelineErrorKind::Download);
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_config_from_pipeline() {
        let pipeline = PipelineConfig {
            request_timeout_secs: 4,
            max_input_bytes: 99,
            ..PipelineConfig::default()
        };
        let config = MediaFetcherConfig::from(&pipeline);
        assert_eq!(config.timeout, Duration::from_secs(4));
        assert_eq!(config.max_bytes, 99);
    }
}
