//! Login and logout.
//!
//! `login` exchanges email/password for a token and writes the session file;
//! `logout` removes it. Both have `_at(home)` forms for tests.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use tone_core::{session, LoginResponse, Session};
use tone_sync::endpoints;
use tone_sync::transport::Transport;

use crate::config::Config;
use crate::error::ClientError;
use crate::http::HttpTransport;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub async fn login_at(
    home: &Path,
    config: &Config,
    credentials: &Credentials,
) -> Result<Session, ClientError> {
    let transport = HttpTransport::new(config.clone());
    login_with(&transport, home, credentials).await
}

pub async fn login(config: &Config, credentials: &Credentials) -> Result<Session, ClientError> {
    let home = dirs::home_dir().ok_or(ClientError::HomeNotFound)?;
    login_at(&home, config, credentials).await
}

/// Post the credentials through `transport` and persist the resulting session.
pub async fn login_with(
    transport: &dyn Transport,
    home: &Path,
    credentials: &Credentials,
) -> Result<Session, ClientError> {
    let body = serde_json::to_value(credentials)
        .map_err(|e| ClientError::LoginResponse(e.to_string()))?;
    let response = transport.post(endpoints::LOGIN, body).await?;
    let session = parse_login(response)?;

    let path = session::save_at(home, &session)?;
    tracing::info!(
        email = %session.email,
        tenant_id = ?session.tenant_id,
        path = %path.display(),
        "logged in",
    );
    Ok(session)
}

fn parse_login(response: Value) -> Result<Session, ClientError> {
    let response: LoginResponse = serde_json::from_value(response)
        .map_err(|e| ClientError::LoginResponse(e.to_string()))?;
    let session = Session::from_login(response);
    if session.bearer_token().is_none() {
        return Err(ClientError::LoginResponse("empty access token".into()));
    }
    Ok(session)
}

/// Forget the stored session. `false` when there was none.
pub fn logout_at(home: &Path) -> Result<bool, ClientError> {
    let removed = session::clear_at(home)?;
    tracing::info!(removed, "logged out");
    Ok(removed)
}

pub fn logout() -> Result<bool, ClientError> {
    let home = dirs::home_dir().ok_or(ClientError::HomeNotFound)?;
    logout_at(&home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;
    use tone_core::ApiError;
    use tone_sync::transport::Query;

    struct LoginBackend {
        reply: Result<Value, ApiError>,
        posted: Mutex<Vec<(String, Value)>>,
    }

    #[async_trait]
    impl Transport for LoginBackend {
        async fn get(&self, _path: &str, _query: Query<'_>) -> Result<Value, ApiError> {
            unreachable!("login only posts")
        }

        async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
            self.posted.lock().unwrap().push((path.to_string(), body));
            self.reply.clone()
        }

        async fn patch(&self, _path: &str, _body: Value) -> Result<Value, ApiError> {
            unreachable!("login only posts")
        }

        async fn delete(&self, _path: &str, _query: Query<'_>) -> Result<Value, ApiError> {
            unreachable!("login only posts")
        }
    }

    fn backend(reply: Result<Value, ApiError>) -> LoginBackend {
        LoginBackend {
            reply,
            posted: Mutex::new(Vec::new()),
        }
    }

    fn creds() -> Credentials {
        Credentials {
            email: "ana@example.com".into(),
            password: "hunter2".into(),
        }
    }

    #[tokio::test]
    async fn login_saves_session_with_first_org_as_tenant() {
        let tmp = TempDir::new().unwrap();
        let backend = backend(Ok(json!({
            "access_token": "jwt-token",
            "user_id": 17,
            "email": "ana@example.com",
            "username": "ana",
            "organizations": [
                { "id": 4, "name": "Acme", "role": "owner" },
                { "id": 9, "name": "Side", "role": "viewer" }
            ]
        })));

        let session = login_with(&backend, tmp.path(), &creds()).await.unwrap();
        assert_eq!(session.tenant_id, Some(4));
        assert_eq!(session.user_id.as_deref(), Some("17"));

        let posted = backend.posted.lock().unwrap().clone();
        assert_eq!(posted[0].0, "/auth/login");
        assert_eq!(
            posted[0].1,
            json!({ "email": "ana@example.com", "password": "hunter2" })
        );

        let stored = session::load_at(tmp.path()).unwrap().expect("saved");
        assert_eq!(stored.access_token, "jwt-token");
    }

    #[tokio::test]
    async fn rejected_login_stores_nothing() {
        let tmp = TempDir::new().unwrap();
        let backend = backend(Err(ApiError::Unauthorized {
            status: 401,
            detail: "Incorrect email or password".into(),
        }));

        let err = login_with(&backend, tmp.path(), &creds()).await.unwrap_err();
        assert!(err.to_string().contains("Incorrect email or password"));
        assert!(session::load_at(tmp.path()).unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_token_is_refused() {
        let tmp = TempDir::new().unwrap();
        let backend = backend(Ok(json!({ "access_token": "  " })));
        let err = login_with(&backend, tmp.path(), &creds()).await.unwrap_err();
        assert!(matches!(err, ClientError::LoginResponse(_)));
    }

    #[test]
    fn logout_reports_whether_a_session_existed() {
        let tmp = TempDir::new().unwrap();
        assert!(!logout_at(tmp.path()).unwrap());
        let session = parse_login(json!({ "access_token": "t" })).unwrap();
        session::save_at(tmp.path(), &session).unwrap();
        assert!(logout_at(tmp.path()).unwrap());
        assert!(session::load_at(tmp.path()).unwrap().is_none());
    }
}
