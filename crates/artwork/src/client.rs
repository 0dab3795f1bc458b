//! HTTP download of cover artwork.
//!
//! Async client using `reqwest`. Only a `200 OK` response is accepted; the
//! body is capped in size, decoded in place and never cached.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use crate::cover::CoverImage;
use crate::error::ArtworkError;

/// Desktop Chrome user agent; the player serves a degraded page to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_0_0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Largest cover body accepted by default.
pub const DEFAULT_MAX_COVER_BYTES: usize = 8 * 1024 * 1024;

/// HTTP settings for cover downloads.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub timeout: Duration,
    /// Bodies above this size are rejected without being buffered.
    pub max_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.into(),
            accept_language: "fr-FR,fr;q=0.9,en;q=0.8".into(),
            timeout: Duration::from_secs(15),
            max_bytes: DEFAULT_MAX_COVER_BYTES,
        }
    }
}

/// Downloads and decodes cover images.
#[derive(Debug, Clone)]
pub struct CoverFetcher {
    http: reqwest::Client,
    max_bytes: usize,
}

impl CoverFetcher {
    /// Creates a fetcher with the given HTTP settings.
    pub fn new(config: &FetchConfig) -> Result<Self, ArtworkError> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
            headers.insert(ACCEPT_LANGUAGE, value);
        } else {
            tracing::warn!(value = %config.accept_language, "ignoring invalid Accept-Language");
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            max_bytes: config.max_bytes,
        })
    }

    /// Downloads the image at `url` and decodes it into a cover.
    pub async fn fetch(&self, url: &str) -> Result<CoverImage, ArtworkError> {
        let mut resp = self.http.get(url).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ArtworkError::Status(status.as_u16()));
        }

        let limit = self.max_bytes;
        if resp.content_length().is_some_and(|len| len > limit as u64) {
            return Err(ArtworkError::TooLarge { limit });
        }

        // Content-Length may be absent or wrong; enforce the cap while reading.
        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(ArtworkError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(url, bytes = body.len(), "cover downloaded");
        CoverImage::from_encoded(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover::tests::png_bytes;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a one-shot mock HTTP server answering with the given status and body.
    async fn mock_server(status: &str, body: Vec<u8>) -> (String, tokio::task::JoinHandle<String>) {
        mock_server_with(status, body, true).await
    }

    /// Like [`mock_server`]; without a length the body ends when the connection closes.
    async fn mock_server_with(
        status: &str,
        body: Vec<u8>,
        send_length: bool,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/cover.png");
        let status = status.to_string();

        let handle = tokio::spawn(async move {
            let Ok((mut stream, _)) = listener.accept().await else {
                return String::new();
            };
            let mut buf = vec![0u8; 8192];
            let n = stream.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let length = if send_length {
                format!("Content-Length: {}\r\n", body.len())
            } else {
                String::new()
            };
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: image/png\r\n{length}Connection: close\r\n\r\n"
            );
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(&body).await;
            let _ = stream.shutdown().await;
            request
        });

        (url, handle)
    }

    fn fetcher() -> CoverFetcher {
        CoverFetcher::new(&FetchConfig::default()).unwrap()
    }

    fn capped_fetcher(max_bytes: usize) -> CoverFetcher {
        CoverFetcher::new(&FetchConfig {
            max_bytes,
            ..FetchConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetch_valid_png() {
        let (url, server) = mock_server("200 OK", png_bytes(100, 100)).await;
        let cover = fetcher().fetch(&url).await.unwrap();
        assert!(!cover.is_placeholder());
        assert_eq!((cover.width(), cover.height()), (192, 192));

        let request = server.await.unwrap().to_lowercase();
        assert!(request.contains("user-agent: mozilla/5.0"));
        assert!(request.contains("accept-language: fr-fr"));
    }

    #[tokio::test]
    async fn fetch_not_found() {
        let (url, _server) = mock_server("404 Not Found", b"missing".to_vec()).await;
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, ArtworkError::Status(404)));
    }

    #[tokio::test]
    async fn fetch_non_200_success_rejected() {
        let (url, _server) = mock_server("204 No Content", Vec::new()).await;
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, ArtworkError::Status(204)));
    }

    #[tokio::test]
    async fn fetch_non_image_body() {
        let (url, _server) = mock_server("200 OK", b"<html></html>".to_vec()).await;
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, ArtworkError::Decode(_)));
    }

    #[tokio::test]
    async fn fetch_empty_body() {
        let (url, _server) = mock_server("200 OK", Vec::new()).await;
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, ArtworkError::Empty));
    }

    #[tokio::test]
    async fn fetch_rejects_declared_oversized_body() {
        let (url, _server) = mock_server("200 OK", vec![0u8; 4096]).await;
        let err = capped_fetcher(1024).fetch(&url).await.unwrap_err();
        assert!(matches!(err, ArtworkError::TooLarge { limit: 1024 }));
    }

    #[tokio::test]
    async fn fetch_caps_body_without_length() {
        let (url, _server) = mock_server_with("200 OK", vec![0u8; 64 * 1024], false).await;
        let err = capped_fetcher(1024).fetch(&url).await.unwrap_err();
        assert!(matches!(err, ArtworkError::TooLarge { limit: 1024 }));
    }

    #[tokio::test]
    async fn fetch_within_cap_succeeds() {
        let body = png_bytes(100, 100);
        let (url, _server) = mock_server_with("200 OK", body.clone(), false).await;
        let cover = capped_fetcher(body.len()).fetch(&url).await.unwrap();
        assert_eq!(cover.width(), 192);
    }

    #[tokio::test]
    async fn fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = fetcher()
            .fetch(&format!("http://127.0.0.1:{port}/cover.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ArtworkError::Http(_)));
    }

    #[test]
    fn default_config() {
        let config = FetchConfig::default();
        assert!(config.user_agent.contains("Chrome"));
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.max_bytes, DEFAULT_MAX_COVER_BYTES);
    }
}
