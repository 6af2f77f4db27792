//! Session cookie plumbing.
//!
//! The session travels in an encrypted+authenticated private cookie holding
//! the user id. No expiry or refresh: the cookie lives for the browser
//! session, and restarting the server rotates the signing key, which
//! invalidates every outstanding session.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};

pub const SESSION_COOKIE: &str = "brewdex_session";

/// Establish a logged-in session for the given user.
pub fn establish(jar: PrivateCookieJar, user_id: i64, insecure_cookie: bool) -> PrivateCookieJar {
    jar.add(build_cookie(user_id.to_string(), insecure_cookie))
}

/// Destroy the session, if any.
pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::from(SESSION_COOKIE))
}

/// The user id carried by the session cookie, if present and well-formed.
pub fn user_id(jar: &PrivateCookieJar) -> Option<i64> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| c.value().parse().ok())
}

fn build_cookie(value: String, insecure_cookie: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(!insecure_cookie)
        .same_site(SameSite::Lax)
        .build()
}
