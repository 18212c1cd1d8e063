//! Self-hosted backend over a sea-orm connection (SQLite in practice).
//!
//! Implements [`RegistrationStore`] and [`AuthProvider`] with the same
//! behaviour the hosted backend shows to the site: rows are only readable
//! and writable with a live admin session, and rejections use the hosted
//! backend's wording so they are categorized the same way.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{ActiveValue, DatabaseConnection, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    error::{AuthError, StoreError},
    registration::{Registration, RegistrationNew, RegistrationPatch},
    store::{AuthProvider, ListOrder, RegistrationStore, Session},
};

mod admin_sessions;
mod admins;
mod registrations;

const DEFAULT_SESSION_TTL_SECS: i64 = 3600;
const ALREADY_REGISTERED: &str = "User already registered";
const INVALID_LOGIN: &str = "Invalid login credentials";

#[derive(Clone, Debug)]
pub struct LocalBackend {
    database: DatabaseConnection,
    session_ttl: Duration,
}

impl LocalBackend {
    /// Return a builder for `LocalBackend`.
    pub fn builder() -> LocalBackendBuilder {
        LocalBackendBuilder::default()
    }

    async fn live_session(&self, token: &str) -> Result<Option<admin_sessions::Model>, DbErr> {
        let Some(session) = admin_sessions::Entity::find_by_id(token.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };

        if session.is_live() {
            return Ok(Some(session));
        }

        admin_sessions::Entity::delete_by_id(session.token)
            .exec(&self.database)
            .await?;
        Ok(None)
    }

    async fn authorize(&self, session: &Session) -> Result<(), StoreError> {
        match self.live_session(&session.access_token).await? {
            Some(_) => Ok(()),
            None => Err(StoreError::Unauthorized),
        }
    }
}

#[async_trait]
impl RegistrationStore for LocalBackend {
    async fn create(&self, registration: &RegistrationNew) -> Result<Registration, StoreError> {
        let model = registrations::ActiveModel::new_row(
            Uuid::new_v4().to_string(),
            registration,
            Utc::now(),
        )
        .insert(&self.database)
        .await?;

        Registration::try_from(model)
    }

    async fn list(
        &self,
        session: &Session,
        order: ListOrder,
    ) -> Result<Vec<Registration>, StoreError> {
        self.authorize(session).await?;

        let query = registrations::Entity::find();
        let query = if order.descending {
            query.order_by_desc(registrations::Column::CreatedAt)
        } else {
            query.order_by_asc(registrations::Column::CreatedAt)
        };

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Registration::try_from)
            .collect()
    }

    async fn update(
        &self,
        session: &Session,
        id: &str,
        patch: &RegistrationPatch,
    ) -> Result<(), StoreError> {
        self.authorize(session).await?;

        let model = registrations::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut model: registrations::ActiveModel = model.into();
        if let Some(status) = patch.payment_status {
            model.payment_status = ActiveValue::Set(status.as_str().to_string());
        }
        model.updated_at = ActiveValue::Set(Utc::now());
        model.update(&self.database).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for LocalBackend {
    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
        Ok(self.live_session(access_token).await?.map(Session::from))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let admin = admins::Entity::find_by_id(email.to_string())
            .one(&self.database)
            .await?;
        if !admin.is_some_and(|admin| admin.verify(password)) {
            return Err(AuthError::Rejected(INVALID_LOGIN.to_string()));
        }

        let session = admin_sessions::ActiveModel {
            token: ActiveValue::Set(Uuid::new_v4().to_string()),
            email: ActiveValue::Set(email.to_string()),
            expires_at: ActiveValue::Set(Utc::now() + self.session_ttl),
        }
        .insert(&self.database)
        .await?;

        Ok(session.into())
    }

    /// Accounts are usable right away; there is no confirmation mail.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _redirect_to: &str,
    ) -> Result<(), AuthError> {
        let existing = admins::Entity::find_by_id(email.to_string())
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(AuthError::Rejected(ALREADY_REGISTERED.to_string()));
        }

        let salt = Uuid::new_v4().simple().to_string();
        admins::ActiveModel {
            email: ActiveValue::Set(email.to_string()),
            password_hash: ActiveValue::Set(admins::hash_password(&salt, password)),
            salt: ActiveValue::Set(salt),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(&self.database)
        .await?;

        tracing::info!(%email, "admin account created");
        Ok(())
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        admin_sessions::Entity::delete_by_id(session.access_token.clone())
            .exec(&self.database)
            .await?;
        Ok(())
    }
}

/// The builder for `LocalBackend`
#[derive(Default)]
pub struct LocalBackendBuilder {
    database: DatabaseConnection,
    session_ttl: Option<Duration>,
}

impl LocalBackendBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LocalBackendBuilder {
        self.database = db;
        self
    }

    /// How long a session stays valid after sign-in.
    pub fn session_ttl(mut self, ttl: Duration) -> LocalBackendBuilder {
        self.session_ttl = Some(ttl);
        self
    }

    /// Construct `LocalBackend`
    pub fn build(self) -> LocalBackend {
        LocalBackend {
            database: self.database,
            session_ttl: self
                .session_ttl
                .unwrap_or_else(|| Duration::seconds(DEFAULT_SESSION_TTL_SECS)),
        }
    }
}
