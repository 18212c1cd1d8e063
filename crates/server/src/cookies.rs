//! Session and flash cookies.
//!
//! The flash cookie carries notices across a redirect: base64 (URL-safe, no
//! padding) of the JSON notice list, read once and cleared.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use engine::{Notice, Notices, Session};

use crate::server::SiteConfig;

pub const SESSION_COOKIE: &str = "corrida_session";
pub const FLASH_COOKIE: &str = "corrida_flash";

pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE).map(|cookie| cookie.value())
}

pub fn store_session(jar: CookieJar, session: &Session, site: &SiteConfig) -> CookieJar {
    let mut cookie = Cookie::build((SESSION_COOKIE, session.access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(site.secure_cookies)
        .build();
    if let Some(expires_at) = session.expires_at {
        let remaining = (expires_at - Utc::now()).num_seconds().max(0);
        cookie.set_max_age(time::Duration::seconds(remaining));
    }
    jar.add(cookie)
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Stores `notices` for the next page. An empty list stores nothing.
pub fn stash_notices(jar: CookieJar, notices: Notices) -> CookieJar {
    if notices.is_empty() {
        return jar;
    }
    let json = match serde_json::to_vec(notices.as_slice()) {
        Ok(json) => json,
        Err(err) => {
            tracing::error!("failed to encode flash notices: {err}");
            return jar;
        }
    };
    jar.add(
        Cookie::build((FLASH_COOKIE, URL_SAFE_NO_PAD.encode(json)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Reads and clears the flash cookie. A malformed cookie yields no notices.
pub fn take_notices(jar: CookieJar) -> (CookieJar, Notices) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, Notices::default());
    };
    let notices = decode(cookie.value()).unwrap_or_default();
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), notices.into())
}

fn decode(value: &str) -> Option<Vec<Notice>> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_survives_a_round_trip_once() {
        let notices = Notices::from(vec![Notice::success("Login realizado com sucesso!")]);
        let jar = stash_notices(CookieJar::new(), notices.clone());

        let value = jar.get(FLASH_COOKIE).unwrap().value().to_string();
        let incoming = CookieJar::new().add(Cookie::new(FLASH_COOKIE, value));
        let (jar, taken) = take_notices(incoming);
        assert_eq!(taken, notices);
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn garbage_flash_is_ignored() {
        let incoming = CookieJar::new().add(Cookie::new(FLASH_COOKIE, "%%%"));
        let (_, taken) = take_notices(incoming);
        assert!(taken.is_empty());
    }

    #[test]
    fn session_cookie_is_http_only() {
        let session = Session {
            access_token: "token".to_string(),
            email: "admin@semeando.org".to_string(),
            expires_at: None,
        };
        let jar = store_session(CookieJar::new(), &session, &SiteConfig::default());
        let cookie = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(session_token(&jar), Some("token"));
    }
}
