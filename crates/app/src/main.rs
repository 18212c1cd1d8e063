use std::sync::Arc;

use engine::{AuthProvider, RegistrationStore, local::LocalBackend};
use migration::{Migrator, MigratorTrait};
use server::{ServerState, SiteConfig};
use settings::Backend;

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "corrida={level},server={level},engine={level},supabase={level}",
            level = settings.app.level
        ))
        .init();

    let (store, auth) = backend(&settings.backend).await?;
    let site = SiteConfig {
        public_url: settings.server.public_url(),
        secure_cookies: settings.server.secure_cookies,
    };
    let state = ServerState::new(store, auth, site)?;

    let listener = tokio::net::TcpListener::bind(settings.server.address()).await?;
    server::run_with_listener(state, listener).await?;
    Ok(())
}

async fn backend(
    config: &Backend,
) -> Result<(Arc<dyn RegistrationStore>, Arc<dyn AuthProvider>), BoxError> {
    match config {
        Backend::Supabase {
            url,
            anon_key,
            table,
        } => {
            tracing::info!(%url, %table, "using supabase backend");
            let client =
                Arc::new(supabase::SupabaseClient::new(url, anon_key.clone())?.with_table(table));
            Ok(shared(client))
        }
        Backend::Sqlite {
            path,
            session_ttl_secs,
        } => {
            tracing::info!(%path, "using sqlite backend");
            let local =
                local_backend(&format!("sqlite:{path}?mode=rwc"), *session_ttl_secs).await?;
            Ok(shared(local))
        }
        Backend::Memory { session_ttl_secs } => {
            tracing::warn!("using in-memory backend, registrations are lost on exit");
            let local = local_backend("sqlite::memory:", *session_ttl_secs).await?;
            Ok(shared(local))
        }
    }
}

/// One backend serving as both store and auth provider.
fn shared<B>(backend: Arc<B>) -> (Arc<dyn RegistrationStore>, Arc<dyn AuthProvider>)
where
    B: RegistrationStore + AuthProvider + 'static,
{
    let store: Arc<dyn RegistrationStore> = backend.clone();
    let auth: Arc<dyn AuthProvider> = backend;
    (store, auth)
}

async fn local_backend(url: &str, session_ttl_secs: i64) -> Result<Arc<LocalBackend>, BoxError> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(Arc::new(
        LocalBackend::builder()
            .database(database)
            .session_ttl(chrono::Duration::seconds(session_ttl_secs))
            .build(),
    ))
}
