//! Registration, login, and the admin policy.

pub mod password;

use serde::Serialize;

use crate::db::{DbHandle, DbUser, UserCreate};
use crate::error::AppError;

/// The distinguished first registrant is permanently and solely the admin.
/// There is no role table and no revocation.
pub const ADMIN_USER_ID: i64 = 1;

/// The resolved identity behind a request's session cookie.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.id == ADMIN_USER_ID
    }
}

impl From<DbUser> for Identity {
    fn from(user: DbUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Create a new account and return its id.
///
/// Email uniqueness is enforced only by this pre-check, not by a storage
/// constraint, so concurrent registrations with the same email can race.
pub async fn register(
    db: &DbHandle,
    name: &str,
    email: &str,
    raw_password: &str,
) -> Result<i64, AppError> {
    if db.find_user_by_email(email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = password::hash(raw_password)?;
    db.create_user(UserCreate {
        name: name.to_string(),
        email: email.to_string(),
        password_hash,
    })
    .await
}

/// Authenticate by email and raw password.
///
/// Unknown emails and wrong passwords fail with distinct errors; the split
/// discloses whether an email is registered. See DESIGN.md before
/// collapsing the two into one message.
pub async fn login(db: &DbHandle, email: &str, raw_password: &str) -> Result<DbUser, AppError> {
    let user = db
        .find_user_by_email(email)
        .await?
        .ok_or(AppError::InvalidEmail)?;

    if !password::verify(raw_password, &user.password_hash) {
        return Err(AppError::InvalidPassword);
    }

    Ok(user)
}
