//! Persistent session store.
//!
//! The session lives in a directory (default `~/.capstone/`):
//!
//! ```text
//! ~/.capstone/
//! ├── token        # raw session JWT
//! └── user.json    # cached user profile from login
//! ```
//!
//! [`SessionStore::init`] is the only place that reads these files; logout
//! removes both.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use capstone_domain::{Role, User};

use crate::claims::SessionClaims;
use crate::error::{ApiError, ApiResult};

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

/// An authenticated session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Option<User>,
    pub claims: SessionClaims,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Option<User>) -> ApiResult<Self> {
        let token = token.into();
        let claims = SessionClaims::decode(&token)?;
        Ok(Self {
            token,
            user,
            claims,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.claims.is_expired_at(now)
    }

    /// User id from the token, falling back to the cached profile.
    pub fn user_id(&self) -> Option<i64> {
        self.claims
            .user_id
            .or_else(|| self.user.as_ref().map(|u| u.user_id))
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.claims.has_role(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has_role(*r))
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.claims.roles.iter().map(String::as_str)
    }

    pub fn display_name(&self) -> String {
        match &self.user {
            Some(user) if !user.full_name.is_empty() => user.full_name.clone(),
            Some(user) => user.email.clone(),
            None => self
                .claims
                .email
                .clone()
                .unwrap_or_else(|| "unknown user".to_string()),
        }
    }
}

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }

    /// Load the stored session and validate it against the clock.
    ///
    /// An expired or unreadable session is cleared and reported as `None`.
    pub fn init(&self) -> ApiResult<Option<Session>> {
        self.init_at(Utc::now())
    }

    pub fn init_at(&self, now: DateTime<Utc>) -> ApiResult<Option<Session>> {
        let token = match fs::read_to_string(self.token_path()) {
            Ok(token) => token.trim().to_string(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let Some(claims) = SessionClaims::from_token(&token) else {
            warn!("Stored session token is unreadable, clearing it");
            self.logout()?;
            return Ok(None);
        };

        if claims.is_expired_at(now) {
            info!("Stored session expired, clearing it");
            self.logout()?;
            return Ok(None);
        }

        let user = self.load_user()?;
        debug!("Restored session for user {:?}", claims.user_id);

        Ok(Some(Session {
            token,
            user,
            claims,
        }))
    }

    /// Persist a fresh session.
    pub fn save(&self, token: &str, user: Option<&User>) -> ApiResult<Session> {
        let session = Session::new(token, user.cloned())?;

        fs::create_dir_all(&self.dir)?;
        write_private(&self.token_path(), token)?;

        match user {
            Some(user) => fs::write(self.user_path(), serde_json::to_string_pretty(user)?)?,
            None => remove_if_exists(&self.user_path())?,
        }

        Ok(session)
    }

    /// Remove both the token and the cached user.
    pub fn logout(&self) -> ApiResult<()> {
        remove_if_exists(&self.token_path())?;
        remove_if_exists(&self.user_path())?;
        Ok(())
    }

    fn load_user(&self) -> ApiResult<Option<User>> {
        let content = match fs::read_to_string(self.user_path()) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Cached user profile is corrupt, ignoring it: {}", e);
                Ok(None)
            }
        }
    }
}

fn remove_if_exists(path: &Path) -> ApiResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ApiError::Io(e)),
    }
}

#[cfg(unix)]
fn write_private(path: &Path, content: &str) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, content)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &str) -> io::Result<()> {
    fs::write(path, content)
}
