//! Registration, login, and logout handlers.
//!
//! The auth flows surface user-recoverable failures the way the forms do:
//! a duplicate email or a failed login queues a flash notice and redirects
//! to /login; only validation failures answer in place (422).

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde_json::json;
use tracing::info;

use crate::error::AppError;
use crate::forms::{LoginForm, RegisterForm};
use crate::server::flash;
use crate::server::router::AppState;
use crate::server::session;

/// GET /register
pub async fn register_form(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, notice) = flash::take(jar);
    (
        jar,
        Json(json!({
            "form": "register",
            "fields": ["name", "email", "password"],
            "flash": notice,
        })),
    )
}

/// POST /register
///
/// Creates the account and establishes a logged-in session in the same
/// request; a duplicate email redirects to /login with a notice instead.
pub async fn register(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    form.validate().map_err(AppError::Validation)?;

    match crate::auth::register(
        &state.db,
        form.name.trim(),
        form.email.trim(),
        &form.password,
    )
    .await
    {
        Ok(user_id) => {
            info!(user_id, "registered new account");
            let jar = session::establish(jar, user_id, state.insecure_cookie);
            Ok((jar, Redirect::to("/all")).into_response())
        }
        Err(AppError::DuplicateEmail) => {
            let jar = flash::push(
                jar,
                "There is already an account with that email. Please log in.",
                state.insecure_cookie,
            );
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(err) => Err(err),
    }
}

/// GET /login
pub async fn login_form(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, notice) = flash::take(jar);
    (
        jar,
        Json(json!({
            "form": "login",
            "fields": ["email", "password"],
            "flash": notice,
        })),
    )
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    form.validate().map_err(AppError::Validation)?;

    match crate::auth::login(&state.db, form.email.trim(), &form.password).await {
        Ok(user) => {
            info!(user_id = user.id, "login succeeded");
            let jar = session::establish(jar, user.id, state.insecure_cookie);
            Ok((jar, Redirect::to("/all")).into_response())
        }
        Err(AppError::InvalidEmail) => {
            let jar = flash::push(
                jar,
                "That email does not exist. Try again.",
                state.insecure_cookie,
            );
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(AppError::InvalidPassword) => {
            let jar = flash::push(jar, "Incorrect password. Try again", state.insecure_cookie);
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(err) => Err(err),
    }
}

/// GET /logout
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    let jar = session::clear(jar);
    (jar, Redirect::to("/"))
}
