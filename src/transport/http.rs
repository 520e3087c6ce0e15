//! reqwest-backed transport

use crate::error::{Error, Result};
use crate::transport::{OutgoingRequest, RequestBody, Transport, TransportResponse};
use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::{Client, Response};
use reqwest::multipart::Form;
use std::error::Error as _;
use tracing::debug;

/// HTTP transport using reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tofu-forms/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: &OutgoingRequest) -> Result<TransportResponse> {
        debug!(url = %request.url, timeout_ms = request.timeout.as_millis(), "sending POST");

        let mut builder = self.client.post(&request.url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.body {
            RequestBody::Multipart(data) => {
                let form = data.iter().fold(Form::new(), |form, (name, value)| {
                    form.text(name.to_string(), value.to_string())
                });
                builder.multipart(form)
            }
            RequestBody::Json(json) => builder.body(json.clone()),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(error_message(&e)))?;

        let status = response.status().as_u16();
        let status_text = status_text(&response);
        debug!(status, status_text = %status_text, "received response");
        Ok(TransportResponse { status, status_text })
    }
}

/// Reason phrase as sent on the wire
///
/// hyper only keeps the phrase when it differs from the canonical one, so a
/// missing extension means the canonical phrase was sent.
fn status_text(response: &Response) -> String {
    response.extensions().get::<ReasonPhrase>().map_or_else(
        || {
            response
                .status()
                .canonical_reason()
                .unwrap_or_default()
                .to_string()
        },
        |reason| String::from_utf8_lossy(reason.as_bytes()).into_owned(),
    )
}

/// reqwest's top-level message plus its source chain
fn error_message(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FormData;
    use mockito::Matcher;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn request(url: String, body: RequestBody) -> OutgoingRequest {
        OutgoingRequest {
            url,
            body,
            headers: Vec::new(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Server answering every request with `HTTP/1.1 <status_line>`
    async fn status_line_server(status_line: &'static str) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                read_request(&mut socket).await;
                let reply = format!(
                    "HTTP/1.1 {status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        addr
    }

    /// Read one request, headers plus a content-length body
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let Ok(n) = socket.read(&mut chunk).await else {
                return;
            };
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            if head.contains("transfer-encoding: chunked") {
                if buf.ends_with(b"0\r\n\r\n") {
                    return;
                }
                continue;
            }
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }

    #[tokio::test]
    async fn test_custom_reason_phrase_is_kept() {
        let addr = status_line_server("499 Client Closed Request").await;

        let transport = HttpTransport::new().unwrap();
        let response = transport
            .post(&request(
                format!("http://{addr}/v1/closed"),
                RequestBody::Json("{}".to_string()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status, 499);
        assert_eq!(response.status_text, "Client Closed Request");
    }

    #[tokio::test]
    async fn test_multipart_post_reports_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/test-id")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("name=\"name\"".to_string()),
                Matcher::Regex("Joe Bloggs".to_string()),
            ]))
            .with_status(200)
            .with_body("OK")
            .expect(1)
            .create_async()
            .await;

        let data: FormData = [("name", "Joe Bloggs")].into_iter().collect();
        let transport = HttpTransport::new().unwrap();
        let response = transport
            .post(&request(
                format!("{}/v1/test-id", server.url()),
                RequestBody::Multipart(data),
            ))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_json_post_sends_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/json-id")
            .match_header("content-type", "application/json")
            .match_header("accept", "application/json")
            .match_body(Matcher::JsonString(r#"{"email":"a@b.co"}"#.to_string()))
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let mut req = request(
            format!("{}/v1/json-id", server.url()),
            RequestBody::Json(r#"{"email":"a@b.co"}"#.to_string()),
        );
        req.headers = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];
        let response = transport.post(&req).await.unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.status_text, "Not Found");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        // Accept connections but never answer
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let transport = HttpTransport::new().unwrap();
        let mut req = request(
            format!("http://{addr}/v1/slow"),
            RequestBody::Json("{}".to_string()),
        );
        req.timeout = Duration::from_millis(100);

        let err = transport.post(&req).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    }
}
