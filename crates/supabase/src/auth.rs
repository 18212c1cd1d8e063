use async_trait::async_trait;
use chrono::{Duration, Utc};
use engine::{AuthError, AuthProvider, Session};
use serde::{Deserialize, Serialize};

use crate::{ClientError, SupabaseClient, error_message};

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Deserialize)]
struct User {
    #[serde(default)]
    email: Option<String>,
}

async fn auth_error(res: reqwest::Response) -> AuthError {
    let (status, message) = error_message(res).await;
    tracing::warn!(%status, "supabase auth request failed: {message}");
    if status.is_server_error() {
        AuthError::Transport(message)
    } else {
        AuthError::Rejected(message)
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
        let endpoint = self.endpoint("auth/v1/user")?;

        let res = self
            .authorized(self.http.get(endpoint), access_token)
            .send()
            .await
            .map_err(ClientError::Http)?;

        match res.status().as_u16() {
            401 | 403 => return Ok(None),
            _ if !res.status().is_success() => return Err(auth_error(res).await),
            _ => {}
        }

        let user = res.json::<User>().await.map_err(ClientError::Http)?;
        Ok(Some(Session {
            access_token: access_token.to_string(),
            email: user.email.unwrap_or_default(),
            expires_at: None,
        }))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let endpoint = self.endpoint("auth/v1/token")?;

        let res = self
            .public(self.http.post(endpoint))
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(ClientError::Http)?;

        if !res.status().is_success() {
            return Err(auth_error(res).await);
        }

        let token = res
            .json::<TokenResponse>()
            .await
            .map_err(ClientError::Http)?;
        Ok(Session {
            access_token: token.access_token,
            email: token
                .user
                .and_then(|user| user.email)
                .unwrap_or_else(|| email.to_string()),
            expires_at: token
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<(), AuthError> {
        let endpoint = self.endpoint("auth/v1/signup")?;

        let mut req = self.public(self.http.post(endpoint));
        if !redirect_to.is_empty() {
            req = req.query(&[("redirect_to", redirect_to)]);
        }
        let res = req
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(ClientError::Http)?;

        if !res.status().is_success() {
            return Err(auth_error(res).await);
        }
        Ok(())
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        let endpoint = self.endpoint("auth/v1/logout")?;

        let res = self
            .authorized(self.http.post(endpoint), &session.access_token)
            .send()
            .await
            .map_err(ClientError::Http)?;

        // An unknown or expired token is already signed out.
        match res.status().as_u16() {
            401 | 403 | 404 => Ok(()),
            _ if res.status().is_success() => Ok(()),
            _ => Err(auth_error(res).await),
        }
    }
}
