//! Persisted session and the context object that owns it.
//!
//! The session is read from storage once at start-up ([`SessionContext::init`])
//! and every later change goes through the context, which keeps storage,
//! the in-memory copy and the event bus in step.

use async_trait::async_trait;
use blogpilot_core::models::LoginResponse;
use blogpilot_core::{EventBroadcaster, Role, Session, SessionEvent};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};

/// Key the oldest clients stored a bare access token under.
const LEGACY_TOKEN_KEY: &str = "authToken";

#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<Session>>;

    async fn save(&self, session: &Session) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}

/// Decode a stored session, accepting the legacy single-token layout.
fn decode_session(value: Value) -> Result<Option<Session>> {
    let Value::Object(mut map) = value else {
        return Ok(None);
    };
    if !map.contains_key("accessToken") {
        match map.remove(LEGACY_TOKEN_KEY) {
            Some(token) => {
                debug!("restoring session from legacy token field");
                map.insert("accessToken".into(), token);
            }
            None => return Ok(None),
        }
    }
    let session: Session = serde_json::from_value(Value::Object(map))
        .map_err(|e| ClientError::Storage(format!("stored session is malformed: {e}")))?;
    if session.access_token.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(session))
}

/// JSON file per profile, e.g. `~/.blogpilot/session.default.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl AsRef<Path>, profile: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("session.{profile}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<Session>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(ClientError::Storage(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )));
            }
        };
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| ClientError::Storage(format!("{} is not JSON: {e}", self.path.display())))?;
        decode_session(value)
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| ClientError::Storage(format!("failed to create {}: {e}", dir.display())))?;
        }
        let content = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| ClientError::Storage(format!("failed to write {}: {e}", self.path.display())))
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ClientError::Storage(format!(
                "failed to remove {}: {err}",
                self.path.display()
            ))),
        }
    }
}

/// In-process storage for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    stored: Mutex<Option<Value>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: &Session) -> Self {
        Self {
            stored: Mutex::new(serde_json::to_value(session).ok()),
        }
    }

    /// Storage holding only a legacy bare token.
    pub fn with_legacy_token(token: &str) -> Self {
        let mut map = Map::new();
        map.insert(LEGACY_TOKEN_KEY.into(), Value::String(token.to_string()));
        Self {
            stored: Mutex::new(Some(Value::Object(map))),
        }
    }

    pub async fn raw(&self) -> Option<Value> {
        self.stored.lock().await.clone()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> Result<Option<Session>> {
        match self.stored.lock().await.clone() {
            Some(value) => decode_session(value),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.stored.lock().await = Some(serde_json::to_value(session)?);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.stored.lock().await = None;
        Ok(())
    }
}

/// The one active session of this client.
#[derive(Clone)]
pub struct SessionContext {
    storage: Arc<dyn SessionStorage>,
    current: Arc<RwLock<Option<Session>>>,
    events: EventBroadcaster,
    login_route: String,
}

impl SessionContext {
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        events: EventBroadcaster,
        login_route: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            current: Arc::new(RwLock::new(None)),
            events,
            login_route: login_route.into(),
        }
    }

    /// Load the persisted session. A corrupt store is treated as signed out.
    pub async fn init(&self) -> Option<Session> {
        let loaded = match self.storage.load().await {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "discarding unreadable session");
                None
            }
        };
        if let Some(session) = &loaded {
            debug!(email = %session.email, role = %session.role, "session restored");
        }
        *self.current.write().await = loaded.clone();
        loaded
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|s| s.can_refresh())
            .and_then(|s| s.refresh_token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    pub async fn role(&self) -> Option<Role> {
        self.current.read().await.as_ref().map(|s| s.role.clone())
    }

    pub async fn is_admin(&self) -> bool {
        self.role().await.is_some_and(|r| r.is_admin())
    }

    /// Persist a fresh login and announce it.
    pub async fn establish(&self, login: &LoginResponse) -> Result<Session> {
        let session = Session {
            user_id: Some(login.user_id),
            email: login.email.clone(),
            username: login.username.clone(),
            role: login.role.clone(),
            access_token: login.access_token.clone(),
            refresh_token: login.refresh_token.clone(),
        };
        self.storage.save(&session).await?;
        *self.current.write().await = Some(session.clone());
        info!(email = %session.email, role = %session.role, "signed in");
        self.events.send_session(SessionEvent::LoggedIn {
            email: session.email.clone(),
            role: session.role.clone(),
        });
        Ok(session)
    }

    pub async fn update_access_token(&self, token: String) -> Result<()> {
        let mut guard = self.current.write().await;
        let Some(session) = guard.as_mut() else {
            return Err(ClientError::SessionExpired);
        };
        session.access_token = token;
        self.storage.save(session).await
    }

    pub async fn update_user_name(&self, username: &str) -> Result<()> {
        let mut guard = self.current.write().await;
        if let Some(session) = guard.as_mut() {
            session.username = username.to_string();
            self.storage.save(session).await?;
        }
        Ok(())
    }

    /// Sign out on request.
    pub async fn clear(&self) -> Result<()> {
        *self.current.write().await = None;
        self.storage.clear().await?;
        self.events.send_session(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Drop a session that can no longer be used and send the front end to
    /// the login route.
    pub async fn expire(&self) {
        *self.current.write().await = None;
        if let Err(err) = self.storage.clear().await {
            warn!(error = %err, "failed to clear expired session");
        }
        warn!(redirect_to = %self.login_route, "session expired");
        self.events.send_session(SessionEvent::Expired {
            redirect_to: self.login_route.clone(),
        });
    }

    pub fn events(&self) -> &EventBroadcaster {
        &self.events
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("login_route", &self.login_route)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogpilot_core::ClientEvent;

    fn login() -> LoginResponse {
        LoginResponse {
            user_id: 11,
            email: "a@b.com".into(),
            username: "kim".into(),
            created_at: None,
            role: Role::User,
            access_token: "T1".into(),
            refresh_token: Some("R1".into()),
        }
    }

    #[tokio::test]
    async fn test_establish_persists_and_announces() {
        let storage = Arc::new(MemorySessionStorage::new());
        let events = EventBroadcaster::new();
        let mut rx = events.subscribe();
        let ctx = SessionContext::new(storage.clone(), events, "/auth");

        ctx.establish(&login()).await.unwrap();

        let raw = storage.raw().await.unwrap();
        assert_eq!(raw["accessToken"], "T1");
        assert_eq!(raw["refreshToken"], "R1");
        assert_eq!(raw["userEmail"], "a@b.com");
        assert_eq!(raw["userName"], "kim");
        assert_eq!(raw["userRole"], "USER");
        assert!(matches!(
            rx.recv().await.unwrap(),
            ClientEvent::Session(SessionEvent::LoggedIn { .. })
        ));
    }

    #[tokio::test]
    async fn test_legacy_token_restored_without_refresh() {
        let ctx = SessionContext::new(
            Arc::new(MemorySessionStorage::with_legacy_token("OLD")),
            EventBroadcaster::new(),
            "/auth",
        );
        let session = ctx.init().await.unwrap();
        assert_eq!(session.access_token, "OLD");
        assert!(!session.can_refresh());
        assert_eq!(ctx.refresh_token().await, None);
    }

    #[tokio::test]
    async fn test_expire_clears_and_redirects() {
        let storage = Arc::new(MemorySessionStorage::new());
        let events = EventBroadcaster::new();
        let ctx = SessionContext::new(storage.clone(), events.clone(), "/auth");
        ctx.establish(&login()).await.unwrap();

        let mut rx = events.subscribe();
        ctx.expire().await;

        assert!(storage.raw().await.is_none());
        assert!(!ctx.is_authenticated().await);
        assert_eq!(
            rx.recv().await.unwrap(),
            ClientEvent::Session(SessionEvent::Expired {
                redirect_to: "/auth".into()
            })
        );
    }

    #[tokio::test]
    async fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let storage = FileSessionStorage::new(dir.path().join("nested"), "staging");
        assert!(storage.load().await.unwrap().is_none());

        let ctx = SessionContext::new(Arc::new(storage.clone()), EventBroadcaster::new(), "/auth");
        ctx.establish(&login()).await.unwrap();
        ctx.update_access_token("T2".into()).await.unwrap();
        ctx.update_user_name("lee").await.unwrap();

        let restored = storage.load().await.unwrap().unwrap();
        assert_eq!(restored.access_token, "T2");
        assert_eq!(restored.username, "lee");
        assert!(storage.path().ends_with("session.staging.json"));

        ctx.clear().await.unwrap();
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_treated_as_signed_out() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let storage = FileSessionStorage::new(dir.path(), "default");
        std::fs::write(storage.path(), "{not json").unwrap();

        let ctx = SessionContext::new(Arc::new(storage), EventBroadcaster::new(), "/auth");
        assert!(ctx.init().await.is_none());
    }
}
