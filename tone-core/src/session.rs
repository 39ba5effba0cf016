//! Persisted login session (the CLI's "client storage").
//!
//! # Storage layout
//!
//! ```text
//! ~/.tone/            (mode 0700)
//!   session.yaml      (mode 0600; bearer token, tenant, organizations)
//! ```
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::paths::{session_path, tone_root};
use crate::types::{LoginResponse, OrganizationMembership, Role};

/// What `POST /auth/login` handed us, kept between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub organizations: Vec<OrganizationMembership>,
    pub saved_at: DateTime<Utc>,
}

/// The logged-in user as seen from the current organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: Option<OrganizationMembership>,
    pub role: Option<Role>,
}

impl Session {
    /// Build a session from a login response. The first organization becomes
    /// the active tenant.
    pub fn from_login(response: LoginResponse) -> Self {
        Self {
            tenant_id: response.organizations.first().map(|org| org.id),
            access_token: response.access_token,
            user_id: response.user_id,
            email: response.email,
            username: response.username,
            first_name: response.first_name,
            last_name: response.last_name,
            organizations: response.organizations,
            saved_at: Utc::now(),
        }
    }

    /// Resolve the active organization (tenant id, else the first one) and
    /// the user's role there.
    pub fn current_user(&self) -> CurrentUser {
        let organization = match self.tenant_id {
            Some(tenant) => self.organizations.iter().find(|org| org.id == tenant),
            None => self.organizations.first(),
        }
        .cloned();
        let role = organization.as_ref().and_then(|org| org.role.parse().ok());

        CurrentUser {
            id: self.user_id.clone().unwrap_or_default(),
            email: self.email.clone(),
            username: self.username.clone(),
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone().unwrap_or_default(),
            organization,
            role,
        }
    }

    /// `None` for a blank token, which the gate treats as logged out.
    pub fn bearer_token(&self) -> Option<&str> {
        let token = self.access_token.trim();
        (!token.is_empty()).then_some(token)
    }
}

// ---------------------------------------------------------------------------
// Load / save / clear
// ---------------------------------------------------------------------------

/// Load `<home>/.tone/session.yaml`. `Ok(None)` when nobody is logged in.
pub fn load_at(home: &Path) -> Result<Option<Session>, SessionError> {
    let path = session_path(home);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(|e| SessionError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Option<Session>, SessionError> {
    load_at(&home()?)
}

/// Atomically save the session.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, session: &Session) -> Result<PathBuf, SessionError> {
    let dir = tone_root(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    let path = session_path(home);
    let tmp_path = path.with_extension("yaml.tmp");

    let yaml = serde_yaml::to_string(session)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(path)
}

/// `save_at` convenience wrapper.
pub fn save(session: &Session) -> Result<PathBuf, SessionError> {
    save_at(&home()?, session)
}

/// Remove the session file. Returns whether one existed.
pub fn clear_at(home: &Path) -> Result<bool, SessionError> {
    let path = session_path(home);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// `clear_at` convenience wrapper.
pub fn clear() -> Result<bool, SessionError> {
    clear_at(&home()?)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, SessionError> {
    dirs::home_dir().ok_or(SessionError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), SessionError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), SessionError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), SessionError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), SessionError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn membership(id: i64, role: &str) -> OrganizationMembership {
        OrganizationMembership {
            id,
            name: format!("org-{id}"),
            role: role.to_string(),
        }
    }

    fn session() -> Session {
        Session {
            access_token: "tok".to_string(),
            tenant_id: Some(2),
            user_id: Some("42".to_string()),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            organizations: vec![membership(1, "member"), membership(2, "owner")],
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn current_user_uses_tenant_organization() {
        let user = session().current_user();
        assert_eq!(user.role, Some(Role::Owner));
        assert_eq!(user.organization.map(|o| o.id), Some(2));
        assert_eq!(user.id, "42");
    }

    #[test]
    fn current_user_falls_back_to_first_organization() {
        let mut s = session();
        s.tenant_id = None;
        assert_eq!(s.current_user().role, Some(Role::Member));
    }

    #[test]
    fn blank_token_is_not_a_bearer() {
        let mut s = session();
        s.access_token = "   ".to_string();
        assert_eq!(s.bearer_token(), None);
    }

    #[test]
    fn save_load_clear_cycle() {
        let home = TempDir::new().expect("tempdir");
        assert_eq!(load_at(home.path()).expect("load"), None);

        let saved = session();
        let path = save_at(home.path(), &saved).expect("save");
        assert!(path.ends_with(".tone/session.yaml"));
        assert!(!path.with_extension("yaml.tmp").exists());

        let loaded = load_at(home.path()).expect("load").expect("present");
        assert_eq!(loaded, saved);

        assert!(clear_at(home.path()).expect("clear"));
        assert!(!clear_at(home.path()).expect("clear again"));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let home = TempDir::new().expect("tempdir");
        let path = save_at(home.path(), &session()).expect("save");
        let mode = std::fs::metadata(&path).expect("meta").permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
