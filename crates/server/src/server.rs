use axum::{
    Router, middleware,
    routing::{get, post},
};
use engine::{AdminController, AuthProvider, RegistrationStore};
use minijinja::Environment;
use tokio::sync::Mutex;

use std::sync::Arc;

use crate::{admin, auth, gate, public, templates};

/// Site-wide settings the handlers need.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Address the site is reached at, used to build the sign-up redirect.
    pub public_url: String,
    /// Mark cookies `Secure`; enable when served over HTTPS.
    pub secure_cookies: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            public_url: "http://127.0.0.1:3000".to_string(),
            secure_cookies: false,
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn RegistrationStore>,
    pub auth: Arc<dyn AuthProvider>,
    /// Last list fetched for the admin page, kept when a reload fails.
    pub admin: Arc<Mutex<AdminController>>,
    pub templates: Arc<Environment<'static>>,
    pub site: Arc<SiteConfig>,
}

impl ServerState {
    pub fn new(
        store: Arc<dyn RegistrationStore>,
        auth: Arc<dyn AuthProvider>,
        site: SiteConfig,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            store,
            auth,
            admin: Arc::new(Mutex::new(AdminController::default())),
            templates: Arc::new(templates::environment()?),
            site: Arc::new(site),
        })
    }

    /// Where a sign-up confirmation link lands.
    pub fn admin_url(&self) -> String {
        format!("{}/admin", self.site.public_url.trim_end_matches('/'))
    }
}

pub fn router(state: ServerState) -> Router {
    let admin = Router::new()
        .route("/admin", get(admin::page))
        .route("/admin/registrations/{id}/status", post(admin::update_status))
        .route("/logout", post(auth::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_session,
        ));

    Router::new()
        .route("/", get(public::index))
        .route("/inscricao", post(public::register))
        .route("/auth", get(auth::page).post(auth::submit))
        .merge(admin)
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}
