//! Admin access: the login form and the session check in front of the
//! admin page.

use crate::{
    error::AuthError,
    form::FormController,
    notice::{Notice, Notifier},
    store::{AuthProvider, Session},
    validation::{LoginDraft, LoginSchema},
};

const SIGNED_IN: &str = "Login realizado com sucesso!";
const SIGNED_UP: &str = "Conta criada! Verifique seu email para confirmar.";

/// What the login form does with valid credentials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AuthMode::SignIn => "signin",
            AuthMode::SignUp => "signup",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "signup" {
            AuthMode::SignUp
        } else {
            AuthMode::SignIn
        }
    }
}

/// Why sign-in or sign-up failed, as shown to the admin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthFailure {
    AlreadyRegistered,
    InvalidCredentials,
    Other(String),
    Unavailable,
}

impl AuthFailure {
    /// Sorts a collaborator error by the wording of its message.
    #[must_use]
    pub fn categorize(err: &AuthError) -> Self {
        match err {
            AuthError::Rejected(message) if message.contains("already registered") => {
                AuthFailure::AlreadyRegistered
            }
            AuthError::Rejected(message) if message.contains("Invalid login") => {
                AuthFailure::InvalidCredentials
            }
            AuthError::Rejected(message) => AuthFailure::Other(message.clone()),
            AuthError::Transport(_) | AuthError::Database(_) => AuthFailure::Unavailable,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            AuthFailure::AlreadyRegistered => "Este email já está cadastrado. Faça login.".to_string(),
            AuthFailure::InvalidCredentials => "Email ou senha incorretos".to_string(),
            AuthFailure::Other(message) => message.clone(),
            AuthFailure::Unavailable => "Erro ao processar. Tente novamente.".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Field errors are on the form; the collaborator was not called.
    Invalid,
    SignedIn(Session),
    /// Account created; the admin still has to confirm and sign in.
    SignedUp,
    Failed(AuthFailure),
}

pub struct LoginController {
    mode: AuthMode,
    form: FormController<LoginSchema>,
}

impl LoginController {
    #[must_use]
    pub fn new(mode: AuthMode, draft: LoginDraft) -> Self {
        Self {
            mode,
            form: FormController::new(draft),
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn form(&self) -> &FormController<LoginSchema> {
        &self.form
    }

    pub async fn submit(
        &mut self,
        auth: &dyn AuthProvider,
        redirect_to: &str,
        notifier: &mut dyn Notifier,
    ) -> LoginOutcome {
        let Some(credentials) = self.form.submit(notifier) else {
            return LoginOutcome::Invalid;
        };

        let result = match self.mode {
            AuthMode::SignIn => auth
                .sign_in_with_password(&credentials.email, &credentials.password)
                .await
                .map(LoginOutcome::SignedIn),
            AuthMode::SignUp => auth
                .sign_up(&credentials.email, &credentials.password, redirect_to)
                .await
                .map(|()| LoginOutcome::SignedUp),
        };

        match result {
            Ok(outcome) => {
                let message = match outcome {
                    LoginOutcome::SignedUp => SIGNED_UP,
                    _ => SIGNED_IN,
                };
                tracing::info!(email = %credentials.email, mode = self.mode.as_str(), "admin authenticated");
                notifier.notify(Notice::success(message));
                outcome
            }
            Err(err) => {
                tracing::warn!(email = %credentials.email, "admin authentication failed: {err}");
                let failure = AuthFailure::categorize(&err);
                notifier.notify(Notice::error(failure.message()));
                LoginOutcome::Failed(failure)
            }
        }
    }
}

/// Result of checking the session cookie on an admin request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Granted(Session),
    Denied,
}

/// Looks up `token`; anything but a live session denies access.
pub async fn check_access(auth: &dyn AuthProvider, token: Option<&str>) -> Access {
    let Some(token) = token.filter(|token| !token.is_empty()) else {
        return Access::Denied;
    };
    match auth.get_session(token).await {
        Ok(Some(session)) => Access::Granted(session),
        Ok(None) => Access::Denied,
        Err(err) => {
            tracing::warn!("session lookup failed: {err}");
            Access::Denied
        }
    }
}

/// Ends the session with the collaborator. The caller drops its copy of the
/// token whatever happens here.
pub async fn logout(auth: &dyn AuthProvider, session: &Session) {
    if let Err(err) = auth.sign_out(session).await {
        tracing::warn!(email = %session.email, "sign-out failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::{
        notice::Notices,
        testing::{FakeAuth, session},
        validation::field,
    };

    fn draft(email: &str, password: &str) -> LoginDraft {
        LoginDraft {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn categorizes_backend_wording() {
        assert_eq!(
            AuthFailure::categorize(&AuthError::Rejected("User already registered".into())),
            AuthFailure::AlreadyRegistered
        );
        assert_eq!(
            AuthFailure::categorize(&AuthError::Rejected("Invalid login credentials".into())),
            AuthFailure::InvalidCredentials
        );
        assert_eq!(
            AuthFailure::categorize(&AuthError::Rejected("Email not confirmed".into())),
            AuthFailure::Other("Email not confirmed".into())
        );
        assert_eq!(
            AuthFailure::categorize(&AuthError::Transport("timeout".into())),
            AuthFailure::Unavailable
        );
        assert_eq!(
            AuthFailure::InvalidCredentials.message(),
            "Email ou senha incorretos"
        );
    }

    #[tokio::test]
    async fn sign_in_returns_session() {
        let auth = FakeAuth::new("admin@semeando.org", "segredo");
        let mut notices = Notices::default();
        let mut login = LoginController::new(AuthMode::SignIn, draft("admin@semeando.org", "segredo"));

        let outcome = login.submit(&auth, "http://localhost/admin", &mut notices).await;
        assert_eq!(outcome, LoginOutcome::SignedIn(session()));
        assert_eq!(notices.as_slice(), &[Notice::success(SIGNED_IN)]);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let auth = FakeAuth::new("admin@semeando.org", "segredo");
        let mut notices = Notices::default();
        let mut login = LoginController::new(AuthMode::SignIn, draft("admin@semeando.org", "errado1"));

        let outcome = login.submit(&auth, "http://localhost/admin", &mut notices).await;
        assert_eq!(outcome, LoginOutcome::Failed(AuthFailure::InvalidCredentials));
        assert_eq!(notices.as_slice(), &[Notice::error("Email ou senha incorretos")]);
    }

    #[tokio::test]
    async fn sign_up_existing_email_is_already_registered() {
        let auth = FakeAuth::new("admin@semeando.org", "segredo");
        let mut notices = Notices::default();
        let mut login = LoginController::new(AuthMode::SignUp, draft("admin@semeando.org", "segredo"));

        let outcome = login.submit(&auth, "http://localhost/admin", &mut notices).await;
        assert_eq!(outcome, LoginOutcome::Failed(AuthFailure::AlreadyRegistered));

        let mut login = LoginController::new(AuthMode::SignUp, draft("nova@semeando.org", "segredo"));
        let outcome = login.submit(&auth, "http://localhost/admin", &mut notices).await;
        assert_eq!(outcome, LoginOutcome::SignedUp);
    }

    #[tokio::test]
    async fn invalid_form_skips_collaborator() {
        let auth = FakeAuth::new("admin@semeando.org", "segredo");
        auth.unreachable.store(true, Ordering::SeqCst);
        let mut notices = Notices::default();
        let mut login = LoginController::new(AuthMode::SignIn, draft("admin", "123"));

        let outcome = login.submit(&auth, "http://localhost/admin", &mut notices).await;
        assert_eq!(outcome, LoginOutcome::Invalid);
        assert!(login.form().errors().contains(field::EMAIL));
        assert!(login.form().errors().contains(field::PASSWORD));
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn unreachable_backend_is_generic_failure() {
        let auth = FakeAuth::new("admin@semeando.org", "segredo");
        auth.unreachable.store(true, Ordering::SeqCst);
        let mut login = LoginController::new(AuthMode::SignIn, draft("admin@semeando.org", "segredo"));

        let outcome = login
            .submit(&auth, "http://localhost/admin", &mut Notices::default())
            .await;
        assert_eq!(outcome, LoginOutcome::Failed(AuthFailure::Unavailable));
    }

    #[tokio::test]
    async fn access_needs_live_session() {
        let auth = FakeAuth::new("admin@semeando.org", "segredo");
        assert_eq!(check_access(&auth, None).await, Access::Denied);
        assert_eq!(check_access(&auth, Some("")).await, Access::Denied);
        assert_eq!(check_access(&auth, Some("stale")).await, Access::Denied);
        assert_eq!(
            check_access(&auth, Some("token")).await,
            Access::Granted(session())
        );

        auth.unreachable.store(true, Ordering::SeqCst);
        assert_eq!(check_access(&auth, Some("token")).await, Access::Denied);
    }

    #[tokio::test]
    async fn logout_signs_out() {
        let auth = FakeAuth::new("admin@semeando.org", "segredo");
        logout(&auth, &session()).await;
        assert_eq!(auth.signed_out.load(Ordering::SeqCst), 1);
    }
}
