use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::ApiError;

#[cfg(test)]
use mockall::automock;

/// Trait for HTTP client operations (for mocking)
///
/// Works on raw JSON values to stay dyn-compatible; use [`HttpClientExt`]
/// for typed requests.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HttpClientTrait: Send + Sync {
    /// Sends one request to `path` relative to the backend base URL
    async fn send(&self, method: Method, path: &str, body: Option<Value>)
    -> Result<Value, ApiError>;
}

/// Typed request helpers for any [`HttpClientTrait`]
pub trait HttpClientExt: HttpClientTrait {
    fn get<'a, T>(
        &'a self,
        path: &'a str,
    ) -> impl std::future::Future<Output = Result<T, ApiError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        async move { decode(self.send(Method::GET, path, None).await?) }
    }

    fn post<'a, T, B>(
        &'a self,
        path: &'a str,
        body: &'a B,
    ) -> impl std::future::Future<Output = Result<T, ApiError>> + Send
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        async move {
            let body = encode(body)?;
            decode(self.send(Method::POST, path, Some(body)).await?)
        }
    }

    fn put<'a, T, B>(
        &'a self,
        path: &'a str,
        body: &'a B,
    ) -> impl std::future::Future<Output = Result<T, ApiError>> + Send
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        async move {
            let body = encode(body)?;
            decode(self.send(Method::PUT, path, Some(body)).await?)
        }
    }

    fn patch<'a, T, B>(
        &'a self,
        path: &'a str,
        body: &'a B,
    ) -> impl std::future::Future<Output = Result<T, ApiError>> + Send
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        async move {
            let body = encode(body)?;
            decode(self.send(Method::PATCH, path, Some(body)).await?)
        }
    }

    fn delete<'a, T>(
        &'a self,
        path: &'a str,
    ) -> impl std::future::Future<Output = Result<T, ApiError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        async move { decode(self.send(Method::DELETE, path, None).await?) }
    }
}

// Blanket implementation for all types implementing HttpClientTrait
impl<C: HttpClientTrait + ?Sized> HttpClientExt for C {}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::parse(format!("Failed to serialize request body: {}", e)))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::parse(format!("Unexpected response shape: {}", e)))
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL with exactly one slash between them
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');

        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url_for(path);
        debug!(method = %method, url = %url, "Sending API request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");

        // `json` also sets Content-Type: application/json
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &text);
            warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                error = %message,
                "API request failed"
            );
            return Err(ApiError::http(status.as_u16(), message));
        }

        parse_body(&text)
    }
}

/// Extracts `message` from a JSON error body, or falls back to the status code
fn error_message(status_code: u16, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| match value.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            Some(Value::Array(parts)) => {
                let parts: Vec<&str> = parts.iter().filter_map(Value::as_str).collect();
                Some(parts.join(", "))
            }
            _ => None,
        })
        .filter(|message| !message.is_empty());

    message.unwrap_or_else(|| format!("HTTP error! status: {}", status_code))
}

/// Parses a successful response body; an empty body reads as `null`
fn parse_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body)
        .map_err(|e| ApiError::parse(format!("Failed to parse response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
        name: String,
    }

    fn client_for(server: &MockServer) -> HttpClient {
        HttpClient::new(format!("{}/api", server.uri()))
    }

    #[test]
    fn test_url_for_normalizes_slashes() {
        let client = HttpClient::new("http://localhost:3000/api/");
        assert_eq!(client.url_for("/menu/items"), "http://localhost:3000/api/menu/items");
        assert_eq!(client.url_for("events"), "http://localhost:3000/api/events");
        assert_eq!(client.url_for(""), "http://localhost:3000/api");
    }

    #[test]
    fn test_error_message_variants() {
        assert_eq!(error_message(404, r#"{"message":"not found"}"#), "not found");
        assert_eq!(
            error_message(400, r#"{"message":["name is required","email is invalid"]}"#),
            "name is required, email is invalid"
        );
        assert_eq!(error_message(500, "<html>oops</html>"), "HTTP error! status: 500");
        assert_eq!(error_message(502, r#"{"error":"bad gateway"}"#), "HTTP error! status: 502");
        assert_eq!(error_message(503, r#"{"message":""}"#), "HTTP error! status: 503");
    }

    #[tokio::test]
    async fn test_get_parses_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/menu/items/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "Pie"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let item: Item = client.get("/menu/items/1").await.unwrap();

        assert_eq!(
            item,
            Item {
                id: 1,
                name: "Pie".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/contact"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"name": "Ada"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response: Value = client.post("/contact", &json!({"name": "Ada"})).await.unwrap();

        assert_eq!(response, json!({"success": true}));
    }

    #[tokio::test]
    async fn test_put_and_patch_use_their_methods() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/opening-hours/monday"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": "put"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/menu/items/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": "patch"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let put: Value = client.put("/opening-hours/monday", &json!({})).await.unwrap();
        let patch: Value = client.patch("/menu/items/2", &json!({})).await.unwrap();

        assert_eq!(put["ok"], "put");
        assert_eq!(patch["ok"], "patch");
    }

    #[tokio::test]
    async fn test_delete_with_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/menu/items/3"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.delete::<()>("/menu/items/3").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_404_uses_json_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.get::<Value>("/events/99").await.unwrap_err();

        assert_eq!(error, ApiError::http(404, "not found"));
    }

    #[tokio::test]
    async fn test_500_with_plain_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/specials"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.get::<Value>("/specials").await.unwrap_err();

        assert_eq!(error, ApiError::http(500, "HTTP error! status: 500"));
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/opening-hours"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.get::<Value>("/opening-hours").await.unwrap_err();

        assert!(matches!(error, ApiError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/menu/items/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "one"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.get::<Item>("/menu/items/1").await.unwrap_err();

        assert!(matches!(error, ApiError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Nothing listens on a port that was bound and released
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = HttpClient::new(format!("http://127.0.0.1:{}", port));
        let error = client.get::<Value>("/events").await.unwrap_err();

        assert!(matches!(error, ApiError::Network { .. }));
        assert_eq!(error.status_code(), None);
    }
}
