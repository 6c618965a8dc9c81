// Token issuance, registration and password reset
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::models::TokenPair;
use super::ApiClient;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirm {
    pub uid: String,
    pub token: String,
    pub new_password: String,
    pub re_new_password: String,
}

#[derive(Deserialize)]
struct RefreshedAccess {
    access: String,
}

fn ensure_passwords_match(a: &str, b: &str) -> ClientResult<()> {
    if a != b {
        return Err(ClientError::Validation("Passwords do not match.".to_string()));
    }
    Ok(())
}

impl ApiClient {
    /// POST token/. Sessions are stored by `SessionManager::login`, not here.
    pub async fn obtain_token(&self, username: &str, password: &str) -> ClientResult<TokenPair> {
        let builder = self
            .request(Method::POST, "token/")?
            .json(&json!({ "username": username, "password": password }));
        self.send_json(builder).await
    }

    pub async fn refresh_token(&self, refresh: &str) -> ClientResult<String> {
        let builder = self
            .request(Method::POST, "token/refresh/")?
            .json(&json!({ "refresh": refresh }));
        let refreshed: RefreshedAccess = self.send_json(builder).await?;
        Ok(refreshed.access)
    }

    pub async fn register(&self, registration: &Registration) -> ClientResult<()> {
        ensure_passwords_match(&registration.password, &registration.password2)?;
        let builder = self.request(Method::POST, "register/")?.json(registration);
        self.send(builder).await?;
        tracing::info!("Registered {}", registration.username);
        Ok(())
    }

    pub async fn request_password_reset(&self, email: &str) -> ClientResult<()> {
        let builder = self
            .request(Method::POST, "password-reset/")?
            .json(&json!({ "email": email }));
        self.send(builder).await?;
        Ok(())
    }

    pub async fn confirm_password_reset(&self, confirm: &PasswordResetConfirm) -> ClientResult<()> {
        ensure_passwords_match(&confirm.new_password, &confirm.re_new_password)?;
        let builder = self
            .request(Method::POST, "password-reset-confirm/")?
            .json(confirm);
        self.send(builder).await?;
        Ok(())
    }
}
