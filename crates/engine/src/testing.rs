//! In-memory collaborators for unit tests.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use crate::{
    AuthError, AuthProvider, ListOrder, Registration, RegistrationNew, RegistrationPatch,
    RegistrationStore, Session, StoreError,
};

pub(crate) fn session() -> Session {
    Session {
        access_token: "token".to_string(),
        email: "admin@semeando.org".to_string(),
        expires_at: None,
    }
}

#[derive(Default)]
pub(crate) struct FakeStore {
    pub rows: Mutex<Vec<Registration>>,
    pub created: Mutex<Vec<RegistrationNew>>,
    pub updates: Mutex<Vec<(String, RegistrationPatch)>>,
    pub list_calls: AtomicUsize,
    pub fail_create: AtomicBool,
    pub fail_list: AtomicBool,
    pub fail_update: AtomicBool,
}

impl FakeStore {
    pub fn with_rows(rows: Vec<Registration>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn create_calls(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

#[async_trait]
impl RegistrationStore for FakeStore {
    async fn create(&self, registration: &RegistrationNew) -> Result<Registration, StoreError> {
        self.created.lock().unwrap().push(registration.clone());
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("connection reset".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
            + Duration::minutes(rows.len() as i64);
        let row = Registration {
            id: format!("row-{}", rows.len() + 1),
            name: registration.name.clone(),
            phone: registration.phone.clone(),
            sex: registration.sex,
            age: registration.age,
            shirt_size: registration.shirt_size,
            payment_status: registration.payment_status,
            created_at: now,
            updated_at: now,
        };
        rows.insert(0, row.clone());
        Ok(row)
    }

    async fn list(
        &self,
        _session: &Session,
        _order: ListOrder,
    ) -> Result<Vec<Registration>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("boom".to_string()));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn update(
        &self,
        _session: &Session,
        id: &str,
        patch: &RegistrationPatch,
    ) -> Result<(), StoreError> {
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), patch.clone()));
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("boom".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(status) = patch.payment_status {
            row.payment_status = status;
        }
        Ok(())
    }
}

/// Accepts one admin and reports failures with the hosted backend's wording.
pub(crate) struct FakeAuth {
    pub email: String,
    pub password: String,
    pub signed_out: AtomicUsize,
    pub unreachable: AtomicBool,
}

impl FakeAuth {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            signed_out: AtomicUsize::new(0),
            unreachable: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AuthError::Transport("offline".to_string()));
        }
        Ok((access_token == "token").then(session))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AuthError::Transport("offline".to_string()));
        }
        if email == self.email && password == self.password {
            Ok(session())
        } else {
            Err(AuthError::Rejected("Invalid login credentials".to_string()))
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        _redirect_to: &str,
    ) -> Result<(), AuthError> {
        if email == self.email {
            Err(AuthError::Rejected("User already registered".to_string()))
        } else {
            Ok(())
        }
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
        self.signed_out.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
