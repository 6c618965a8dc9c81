pub mod claims;
pub mod store;

use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};

pub use claims::TokenClaims;
pub use store::{MemorySessionStore, SessionStore, SqliteSessionStore};

pub const ACCESS_KEY: &str = "access";
pub const REFRESH_KEY: &str = "refresh";
pub const USERNAME_KEY: &str = "username";

/// The stored identity. Authenticated iff an access token is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub username: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn claims(&self) -> Option<TokenClaims> {
        self.access_token.as_deref().and_then(TokenClaims::decode)
    }
}

/// Explicit handle on the session, cloned into every client that needs it.
/// Reads go to the store on every call so no credential is cached.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// A manager over a fresh in-memory store.
    pub fn ephemeral() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Authenticate against the token endpoint and persist the result.
    pub async fn login(
        &self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> ClientResult<Session> {
        let pair = match api.obtain_token(username, password).await {
            Ok(pair) => pair,
            Err(ClientError::Validation(_))
            | Err(ClientError::Forbidden(_))
            | Err(ClientError::NotFound(_)) => {
                tracing::warn!("Login rejected for {}", username);
                return Err(ClientError::AuthFailed(
                    "Invalid credentials. Please try again.".to_string(),
                ));
            }
            Err(e) => return Err(e),
        };

        let session = Session {
            access_token: Some(pair.access),
            refresh_token: Some(pair.refresh),
            username: Some(username.to_string()),
        };
        self.persist(&session).await?;
        tracing::info!("Logged in as {}", username);
        Ok(session)
    }

    /// Clear access token, refresh token and username.
    pub async fn logout(&self) -> ClientResult<()> {
        self.store.remove(ACCESS_KEY).await?;
        self.store.remove(REFRESH_KEY).await?;
        self.store.remove(USERNAME_KEY).await?;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// Swap the stored access token for a fresh one from the refresh endpoint.
    pub async fn refresh(&self, api: &ApiClient) -> ClientResult<Session> {
        let session = self.current().await?.ok_or(ClientError::AuthRequired)?;
        let refresh_token = session
            .refresh_token
            .clone()
            .ok_or(ClientError::AuthRequired)?;

        let access = api.refresh_token(&refresh_token).await?;
        self.store.set(ACCESS_KEY, &access).await?;
        tracing::info!("Access token refreshed");

        Ok(Session {
            access_token: Some(access),
            ..session
        })
    }

    /// The stored session, if it holds an access token. A leftover session
    /// without one is cleared.
    pub async fn current(&self) -> ClientResult<Option<Session>> {
        let session = Session {
            access_token: self.store.get(ACCESS_KEY).await?,
            refresh_token: self.store.get(REFRESH_KEY).await?,
            username: self.store.get(USERNAME_KEY).await?,
        };

        if session.is_authenticated() {
            return Ok(Some(session));
        }
        if session.refresh_token.is_some() || session.username.is_some() {
            tracing::debug!("Clearing session without access token");
            self.logout().await?;
        }
        Ok(None)
    }

    pub async fn persist(&self, session: &Session) -> ClientResult<()> {
        let fields = [
            (ACCESS_KEY, &session.access_token),
            (REFRESH_KEY, &session.refresh_token),
            (USERNAME_KEY, &session.username),
        ];
        for (key, value) in fields {
            match value {
                Some(v) => self.store.set(key, v).await?,
                None => self.store.remove(key).await?,
            }
        }
        Ok(())
    }

    /// Read the access token at call time; fails locally when absent.
    pub async fn require_access_token(&self) -> ClientResult<String> {
        self.store
            .get(ACCESS_KEY)
            .await?
            .ok_or(ClientError::AuthRequired)
    }

    /// Username of the authenticated session, if any.
    pub async fn username(&self) -> ClientResult<Option<String>> {
        Ok(self.current().await?.and_then(|s| s.username))
    }

    pub async fn is_authenticated(&self) -> ClientResult<bool> {
        Ok(self.store.get(ACCESS_KEY).await?.is_some())
    }
}
