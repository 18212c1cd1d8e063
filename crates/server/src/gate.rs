use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use engine::{Access, check_access};

use crate::{cookies, server::ServerState};

/// Lets a request through only with a live admin session, which is handed to
/// the handler as a `Session` extension. Anyone else goes to the login page.
pub async fn require_session(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let access = check_access(state.auth.as_ref(), cookies::session_token(&jar)).await;
    match access {
        Access::Granted(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Access::Denied => {
            let jar = if cookies::session_token(&jar).is_some() {
                cookies::clear_session(jar)
            } else {
                jar
            };
            (jar, Redirect::to("/auth")).into_response()
        }
    }
}
