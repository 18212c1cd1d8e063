//! Admin login, sign-up and logout.

use axum::{
    Extension, Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use engine::{AuthMode, LoginController, LoginDraft, LoginOutcome, Notices, Session};
use minijinja::context;
use serde::Deserialize;

use crate::{ServerError, cookies, server::ServerState, templates};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthQuery {
    mode: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthForm {
    email: String,
    password: String,
    mode: String,
}

pub async fn page(
    State(state): State<ServerState>,
    Query(query): Query<AuthQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), ServerError> {
    let (jar, notices) = cookies::take_notices(jar);
    let login = LoginController::new(AuthMode::parse(&query.mode), LoginDraft::default());
    Ok((jar, render(&state, &login, &notices)?))
}

/// Signs in (session cookie, then the admin page) or signs up (back to this
/// page with a notice).
pub async fn submit(
    State(state): State<ServerState>,
    jar: CookieJar,
    Form(form): Form<AuthForm>,
) -> Result<Response, ServerError> {
    let draft = LoginDraft {
        email: form.email,
        password: form.password,
    };
    let mut login = LoginController::new(AuthMode::parse(&form.mode), draft);
    let mut notices = Notices::default();

    match login
        .submit(state.auth.as_ref(), &state.admin_url(), &mut notices)
        .await
    {
        LoginOutcome::SignedIn(session) => {
            let jar = cookies::store_session(jar, &session, &state.site);
            let jar = cookies::stash_notices(jar, notices);
            Ok((jar, Redirect::to("/admin")).into_response())
        }
        LoginOutcome::SignedUp | LoginOutcome::Invalid | LoginOutcome::Failed(_) => {
            Ok(render(&state, &login, &notices)?.into_response())
        }
    }
}

pub async fn logout(
    State(state): State<ServerState>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    engine::logout(state.auth.as_ref(), &session).await;
    tracing::info!(email = %session.email, "admin signed out");
    (cookies::clear_session(jar), Redirect::to("/auth"))
}

fn render(
    state: &ServerState,
    login: &LoginController,
    notices: &Notices,
) -> Result<Html<String>, ServerError> {
    templates::render(
        &state.templates,
        "auth.html",
        context! {
            mode => login.mode().as_str(),
            signup => login.mode() == AuthMode::SignUp,
            draft => login.form().draft(),
            errors => login.form().errors(),
            notices => notices.as_slice(),
        },
    )
}
