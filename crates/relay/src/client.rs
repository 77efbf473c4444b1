use aether_core::RelayRequest;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::RelayConfig;
use crate::error::RelayError;

/// JSON body accepted by the game server's ingestion endpoint.
#[derive(Debug, Serialize)]
struct IngestBody<'a> {
    message: &'a str,
}

/// Forwards operator and system messages to the game server.
///
/// Each call makes exactly one HTTP attempt. There is no retry and no
/// backoff; the configured timeout bounds how long a caller can wait.
#[derive(Debug, Clone)]
pub struct RelayClient {
    config: RelayConfig,
    url: String,
    client: Client,
}

impl RelayClient {
    /// Create a relay client with its own connection pool.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RelayError::Client(e.to_string()))?;
        Ok(Self::with_client(config, client))
    }

    /// Create a relay client around an existing HTTP client.
    pub fn with_client(config: RelayConfig, client: Client) -> Self {
        let url = config.url();
        Self {
            config,
            url,
            client,
        }
    }

    /// The ingestion URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Validate `text`, apply `prefix`, and deliver the result upstream.
    pub async fn relay(&self, text: &str, prefix: Option<&str>) -> Result<(), RelayError> {
        let request = RelayRequest::new(text, prefix.map(str::to_owned))?;
        self.send(&request).await
    }

    /// Deliver an already validated request upstream.
    #[instrument(skip(self, request), fields(url = %self.url))]
    pub async fn send(&self, request: &RelayRequest) -> Result<(), RelayError> {
        let rendered = request.rendered();
        debug!(chars = rendered.chars().count(), "relaying message");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.config.token)
            .json(&IngestBody { message: &rendered })
            .send()
            .await
            .inspect_err(|e| {
                if e.is_timeout() {
                    warn!("relay request timed out");
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "upstream rejected relay");
            return Err(RelayError::UpstreamStatus(status.as_u16()));
        }

        // Drain the body so the connection can be reused; its content is ignored.
        let _ = response.bytes().await;

        debug!("message relayed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// A minimal upstream that answers one request with a canned status.
    struct MockUpstream {
        listener: TcpListener,
        port: u16,
    }

    impl MockUpstream {
        async fn start() -> Self {
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("failed to bind mock upstream");
            let port = listener.local_addr().unwrap().port();
            Self { listener, port }
        }

        fn config(&self) -> RelayConfig {
            RelayConfig::new("127.0.0.1", self.port, "relay-secret")
        }

        /// Accept one connection, reply with `status_code`, and return the
        /// raw request (headers and body).
        async fn respond_once(self, status_code: u16) -> String {
            let (mut stream, _) = self.listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;

            let body = r#"{"ok":true}"#;
            let response = format!(
                "HTTP/1.1 {status_code} Status\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\
                 \r\n\
                 {body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            request
        }

        /// Accept one connection and never answer it.
        async fn hang(self) {
            let (_stream, _) = self.listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    }

    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn body_of(request: &str) -> serde_json::Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn relay_success_posts_rendered_text() {
        let upstream = MockUpstream::start().await;
        let client = RelayClient::new(upstream.config()).unwrap();
        let server = tokio::spawn(upstream.respond_once(200));

        client.relay("hello", Some("sys")).await.expect("relay should succeed");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/send-to-mc "));
        assert!(request.contains("Bearer relay-secret"));
        assert!(
            request
                .to_ascii_lowercase()
                .contains("content-type: application/json")
        );
        assert_eq!(body_of(&request)["message"], "[sys] hello");
    }

    #[tokio::test]
    async fn relay_without_prefix_sends_plain_text() {
        let upstream = MockUpstream::start().await;
        let client = RelayClient::new(upstream.config()).unwrap();
        let server = tokio::spawn(upstream.respond_once(200));

        client.relay("plain", None).await.unwrap();

        let request = server.await.unwrap();
        assert_eq!(body_of(&request)["message"], "plain");
    }

    #[tokio::test]
    async fn non_200_maps_to_upstream_status() {
        for code in [201, 401, 500, 503] {
            let upstream = MockUpstream::start().await;
            let client = RelayClient::new(upstream.config()).unwrap();
            let server = tokio::spawn(upstream.respond_once(code));

            let err = client.relay("hi", None).await.unwrap_err();
            server.await.unwrap();
            assert!(
                matches!(err, RelayError::UpstreamStatus(c) if c == code),
                "expected UpstreamStatus({code}), got {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn connection_refused_maps_to_transport() {
        let upstream = MockUpstream::start().await;
        let config = upstream.config();
        drop(upstream);

        let client = RelayClient::new(config).unwrap();
        let err = client.relay("hi", None).await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let upstream = MockUpstream::start().await;
        let config = upstream.config().with_timeout(Duration::from_millis(200));
        let client = RelayClient::new(config).unwrap();
        let server = tokio::spawn(upstream.hang());

        let err = client.relay("hi", None).await.unwrap_err();
        assert!(err.is_timeout(), "got {err:?}");
        server.abort();
    }

    #[tokio::test]
    async fn invalid_message_makes_no_request() {
        // Port 9 on loopback is never contacted: validation fails first.
        let client = RelayClient::new(RelayConfig::new("127.0.0.1", 9, "t")).unwrap();

        let err = client.relay("", Some("sys")).await.unwrap_err();
        assert!(err.is_invalid());

        let err = client.relay(&"x".repeat(257), None).await.unwrap_err();
        assert!(matches!(
            err,
            RelayError::Invalid(aether_core::ValidationError::TooLong { length: 257, .. })
        ));
    }
}
