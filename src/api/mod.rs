pub mod account;
pub mod comments;
pub mod interactions;
pub mod models;
pub mod notifications;
pub mod posts;
pub mod profile;
pub mod response;
pub mod taxonomy;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionManager;

pub use account::{PasswordResetConfirm, Registration};
pub use comments::NewComment;
pub use interactions::AddOutcome;
pub use models::{Category, Comment, Notification, Post, PostAck, Profile, Tag, TokenPair};
pub use posts::{ImageUpload, PostForm, PostQuery};
pub use profile::ProfileForm;
pub use response::{extract_message, Listing, Page, PageControls};
pub use taxonomy::Taxonomy;

/// HTTP access to the blog API. Cheap to clone; every clone shares the
/// connection pool and the session handle.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: SessionManager,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionManager) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Self::with_client(http, &config.base_url, session)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        session: SessionManager,
    ) -> ClientResult<Self> {
        // Url::join drops the last segment unless the base ends in a slash
        let base = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };
        Ok(Self {
            http,
            base,
            session,
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub(crate) fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.url(path)?;
        tracing::debug!("{} {}", method, url);
        Ok(self.http.request(method, url))
    }

    /// Like `request`, with the bearer token read from the session right now.
    /// Fails with `AuthRequired` before anything is sent when logged out.
    pub(crate) async fn authed(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let token = self.session.require_access_token().await?;
        Ok(self.request(method, path)?.bearer_auth(token))
    }

    /// Send and turn non-success statuses into `ClientError`s carrying the
    /// server's message when it gave one.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body);
        tracing::warn!("Request failed with {}: {:?}", status, message);
        Err(ClientError::from_status(status, message))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> ClientResult<T> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
