//! JSON-over-HTTP Transport
//!
//! Thin wrapper around `reqwest` used by every live adapter that talks to
//! the remote service or the identity provider.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Transport-level failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Remote returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Whether the remote rejected the caller's credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TransportError::Status { status: 401, .. })
    }

    /// HTTP status returned by the remote, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// JSON client bound to one base URL
#[derive(Debug, Clone)]
pub struct JsonTransport {
    client: Client,
    base_url: Url,
}

impl JsonTransport {
    /// Create a transport for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        // Url::join drops the last segment unless the base ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// POST a JSON body and decode a JSON response
    pub async fn post_json<B, R>(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &B,
    ) -> Result<R, TransportError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let request = self.client.post(url).json(body);
        self.send(path, request, bearer).await
    }

    /// GET and decode a JSON response
    pub async fn get_json<R>(&self, path: &str, bearer: Option<&str>) -> Result<R, TransportError>
    where
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let request = self.client.get(url);
        self.send(path, request, bearer).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))
    }

    async fn send<R>(
        &self,
        path: &str,
        request: RequestBuilder,
        bearer: Option<&str>,
    ) -> Result<R, TransportError>
    where
        R: DeserializeOwned,
    {
        let request = match bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        tracing::debug!(path = %path, status = status.as_u16(), "Remote call completed");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<R>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::{Json, Router, routing::get, routing::post};
    use serde::Deserialize;
    use serde_json::{Value, json};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        message: String,
        bearer: Option<String>,
    }

    async fn spawn_server() -> String {
        async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
            let bearer = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_string);
            Json(json!({ "message": body["message"], "bearer": bearer }))
        }

        async fn denied() -> (StatusCode, &'static str) {
            (StatusCode::UNAUTHORIZED, "no session")
        }

        async fn garbage() -> &'static str {
            "not json"
        }

        async fn slow() -> Json<Value> {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({}))
        }

        let app = Router::new()
            .route("/api/echo", post(echo))
            .route("/api/denied", get(denied))
            .route("/api/garbage", get(garbage))
            .route("/api/slow", get(slow));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_invalid_url() {
        let result = JsonTransport::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let transport = JsonTransport::new("http://localhost:4943", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_url().as_str(), "http://localhost:4943/");
        assert_eq!(
            transport.endpoint("/api/whoami").unwrap().as_str(),
            "http://localhost:4943/api/whoami"
        );
    }

    #[tokio::test]
    async fn test_post_json_with_bearer() {
        let base = spawn_server().await;
        let transport = JsonTransport::new(&base, Duration::from_secs(5)).unwrap();

        let echo: Echo = transport
            .post_json("api/echo", Some("cred-1"), &json!({ "message": "hi" }))
            .await
            .unwrap();

        assert_eq!(
            echo,
            Echo {
                message: "hi".to_string(),
                bearer: Some("cred-1".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_status_error() {
        let base = spawn_server().await;
        let transport = JsonTransport::new(&base, Duration::from_secs(5)).unwrap();

        let err = transport
            .get_json::<Value>("api/denied", None)
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_decode_error() {
        let base = spawn_server().await;
        let transport = JsonTransport::new(&base, Duration::from_secs(5)).unwrap();

        let err = transport
            .get_json::<Value>("api/garbage", None)
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let base = spawn_server().await;
        let transport = JsonTransport::new(&base, Duration::from_millis(100)).unwrap();

        let err = transport.get_json::<Value>("api/slow", None).await.unwrap_err();

        assert_eq!(err, TransportError::Timeout);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport =
            JsonTransport::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = transport.get_json::<Value>("api/echo", None).await.unwrap_err();

        assert!(matches!(err, TransportError::Request(_)));
    }
}
