//! Collaborator traits for the external backend.
//!
//! [`RegistrationStore`] owns the `inscricoes` rows and [`AuthProvider`] owns
//! admin sessions. The site never talks to the backend any other way.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::{AuthError, StoreError},
    registration::{Registration, RegistrationNew, RegistrationPatch},
};

/// Order of a listing by creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListOrder {
    pub descending: bool,
}

impl ListOrder {
    /// Backend column the order applies to.
    pub const COLUMN: &'static str = "created_at";

    pub const NEWEST_FIRST: ListOrder = ListOrder { descending: true };
}

/// An authenticated admin session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub email: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Inserts a row. Open to the public, no session needed.
    async fn create(&self, registration: &RegistrationNew) -> Result<Registration, StoreError>;

    /// Returns every row in `order`. An empty table is `Ok(vec![])`.
    async fn list(&self, session: &Session, order: ListOrder)
    -> Result<Vec<Registration>, StoreError>;

    /// Applies `patch` to the row with `id`.
    async fn update(
        &self,
        session: &Session,
        id: &str,
        patch: &RegistrationPatch,
    ) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolves a token to a live session, `None` when unknown or expired.
    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
    -> Result<Session, AuthError>;

    /// Creates an admin account. `redirect_to` is where a confirmation link
    /// should land.
    async fn sign_up(&self, email: &str, password: &str, redirect_to: &str)
    -> Result<(), AuthError>;

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
}
