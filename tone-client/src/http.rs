//! [`Transport`] over HTTP/JSON using a blocking `ureq` agent.
//!
//! Each request runs on tokio's blocking pool. The bearer token and tenant id
//! from the stored session ride along as headers on every call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use tone_core::{ApiError, Session};
use tone_sync::transport::{Query, Transport};

use crate::config::Config;

const SESSION_EXPIRED: &str = "Your session has expired. Please login again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Credentials {
    token: Option<String>,
    tenant_id: Option<i64>,
}

struct Inner {
    agent: ureq::Agent,
    config: Config,
    credentials: Credentials,
}

#[derive(Clone)]
pub struct HttpTransport {
    inner: Arc<Inner>,
}

impl HttpTransport {
    /// Anonymous transport, used for login.
    pub fn new(config: Config) -> Self {
        Self::build(config, Credentials::default())
    }

    /// Transport that authenticates as `session`.
    pub fn for_session(config: Config, session: &Session) -> Self {
        Self::build(
            config,
            Credentials {
                token: session.bearer_token().map(str::to_owned),
                tenant_id: session.tenant_id,
            },
        )
    }

    fn build(config: Config, credentials: Credentials) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Self {
            inner: Arc::new(Inner {
                agent,
                config,
                credentials,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.credentials.token.is_some()
    }

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        query: Query<'_>,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let inner = Arc::clone(&self.inner);
        let path = path.to_string();
        let query: Vec<(String, String)> = query
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();

        tokio::task::spawn_blocking(move || inner.send_blocking(method, &path, &query, body))
            .await
            .map_err(|e| ApiError::Network(format!("request task failed: {e}")))?
    }
}

impl Inner {
    fn send_blocking(
        &self,
        method: &str,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = self.config.url(path);
        let mut request = self
            .agent
            .request(method, &url)
            .set("Accept", "application/json");
        if let Some(token) = &self.credentials.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        if let Some(tenant_id) = self.credentials.tenant_id {
            request = request.set("tenant_id", &tenant_id.to_string());
        }
        for (key, value) in query {
            request = request.query(key, value);
        }

        tracing::debug!(method, url = %url, "sending request");
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                let text = response
                    .into_string()
                    .map_err(|e| ApiError::Network(format!("failed to read response: {e}")))?;
                parse_body(&text)
            }
            Err(ureq::Error::Status(status, response)) => {
                let text = response.into_string().unwrap_or_default();
                let err = status_error(status, &text);
                tracing::debug!(method, url = %url, status, error = %err, "request rejected");
                Err(err)
            }
            Err(ureq::Error::Transport(transport)) => Err(ApiError::Network(transport.to_string())),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: Query<'_>) -> Result<Value, ApiError> {
        self.send("GET", path, query, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.send("POST", path, &[], Some(body)).await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.send("PATCH", path, &[], Some(body)).await
    }

    async fn delete(&self, path: &str, query: Query<'_>) -> Result<Value, ApiError> {
        self.send("DELETE", path, query, None).await
    }
}

// ---------------------------------------------------------------------------
// Response mapping
// ---------------------------------------------------------------------------

/// 2xx body → JSON. An empty body is `null`.
fn parse_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

fn status_error(status: u16, body: &str) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized {
            status,
            detail: extract_detail(body).unwrap_or_else(|| SESSION_EXPIRED.to_string()),
        },
        _ => ApiError::Status {
            status,
            detail: extract_detail(body).unwrap_or_else(|| "request failed".to_string()),
        },
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}`, field-error maps (`{"email": ["taken"]}`),
/// single-key objects and plain text.
fn extract_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let detail = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => object_detail(&map).unwrap_or_else(|| body.to_string()),
        Ok(Value::String(text)) => text,
        _ => body.to_string(),
    };
    Some(detail)
}

fn object_detail(map: &Map<String, Value>) -> Option<String> {
    if let Some(detail) = map.get("detail") {
        return Some(value_text(detail));
    }
    if matches!(map.values().next(), Some(Value::Array(_))) {
        let messages: Vec<String> = map
            .iter()
            .map(|(field, value)| format!("{field}: {}", value_text(value)))
            .collect();
        return Some(messages.join("; "));
    }
    if map.len() == 1 {
        return map.values().next().map(value_text);
    }
    None
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        // FastAPI validation errors: [{"loc": [...], "msg": "...", ...}]
        Value::Array(items) => items
            .iter()
            .map(|item| match item.get("msg") {
                Some(msg) => value_text(msg),
                None => value_text(item),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(parse_body("  \n"), Ok(Value::Null));
        assert_eq!(parse_body("[1]"), Ok(serde_json::json!([1])));
        assert!(matches!(parse_body("<html>"), Err(ApiError::Decode(_))));
    }

    #[rstest]
    #[case(r#"{"detail": "Channel not found"}"#, "Channel not found")]
    #[case(r#"{"email": ["already invited"], "role": ["invalid"]}"#, "email: already invited; role: invalid")]
    #[case(r#"{"error": "boom"}"#, "boom")]
    #[case(r#"{"detail": [{"loc": ["body", "name"], "msg": "field required"}]}"#, "field required")]
    #[case("Internal Server Error", "Internal Server Error")]
    #[case(r#""quoted""#, "quoted")]
    fn detail_is_extracted(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(extract_detail(body).as_deref(), Some(expected));
    }

    #[test]
    fn multi_key_object_falls_back_to_raw_body() {
        let body = r#"{"code": 7, "hint": "retry"}"#;
        assert_eq!(extract_detail(body).as_deref(), Some(body));
    }

    #[rstest]
    #[case(401)]
    #[case(403)]
    fn auth_statuses_map_to_unauthorized(#[case] status: u16) {
        let err = status_error(status, "");
        assert!(err.is_session_expired());
        assert_eq!(
            err,
            ApiError::Unauthorized {
                status,
                detail: SESSION_EXPIRED.to_string()
            }
        );
    }

    #[test]
    fn other_statuses_keep_backend_detail() {
        let err = status_error(422, r#"{"detail": "invalid role"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 422,
                detail: "invalid role".into()
            }
        );
    }

    #[test]
    fn session_credentials_are_attached() {
        let session: Session = serde_yaml::from_str(
            "access_token: abc\ntenant_id: 3\nsaved_at: 2024-01-01T00:00:00Z\n",
        )
        .unwrap();
        let transport = HttpTransport::for_session(Config::default(), &session);
        assert!(transport.is_authenticated());
        assert_eq!(
            transport.inner.credentials,
            Credentials {
                token: Some("abc".into()),
                tenant_id: Some(3),
            }
        );
        assert!(!HttpTransport::new(Config::default()).is_authenticated());
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let config = Config {
            backend_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
        };
        let err = HttpTransport::new(config)
            .get("/channel/list", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
