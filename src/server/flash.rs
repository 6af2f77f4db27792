//! One-shot flash notices.
//!
//! A redirect-with-message stores the notice in a short-lived private cookie;
//! the next page render takes it and removes the cookie.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use time::Duration;

const FLASH_COOKIE: &str = "brewdex_flash";

/// Queue a notice for the next rendered page.
pub fn push(jar: PrivateCookieJar, message: &str, insecure_cookie: bool) -> PrivateCookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, message.to_string()))
        .path("/")
        .http_only(true)
        .secure(!insecure_cookie)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(5))
        .build();
    jar.add(cookie)
}

/// Take the pending notice, removing it from the jar.
pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<String>) {
    let message = jar.get(FLASH_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::from(FLASH_COOKIE));
    (jar, message)
}
