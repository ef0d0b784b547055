//! Login, logout and registration flows.

use thiserror::Error;
use tracing::{debug, info};

use crate::session::{Session, SessionRegistry};
use crate::store::ContentStore;
use crate::{BoardError, Result};

/// Login-specific errors.
#[derive(Error, Debug)]
pub enum LoginError {
    /// Username was empty or otherwise unusable.
    #[error("invalid username")]
    InvalidUsername,

    /// The store rejected the username/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The store could not be consulted.
    #[error("content store error: {0}")]
    Store(String),
}

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Username was empty or otherwise unusable.
    #[error("invalid username")]
    InvalidUsername,

    /// Username already exists. Distinguishable from every other
    /// failure so callers can tell the user to pick another name.
    #[error("username already taken")]
    UsernameTaken,

    /// Password was empty.
    #[error("password cannot be empty")]
    EmptyPassword,

    /// The store could not be consulted.
    #[error("content store error: {0}")]
    Store(String),
}

/// Result of a successful registration.
///
/// Registration does not log the user in; `just_registered` is meant
/// for the one response that completes the flow, so the page can greet
/// the new account before the first login.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    /// The username that was created.
    pub username: String,
    /// Set on the response that completed registration.
    pub just_registered: bool,
}

fn login_store_err(e: BoardError) -> LoginError {
    match e {
        BoardError::InvalidUsername => LoginError::InvalidUsername,
        other => LoginError::Store(other.to_string()),
    }
}

fn registration_store_err(e: BoardError) -> RegistrationError {
    match e {
        BoardError::InvalidUsername => RegistrationError::InvalidUsername,
        other => RegistrationError::Store(other.to_string()),
    }
}

/// Log a user in.
///
/// An already-logged-in user gets their existing session back without
/// a credential round trip. Otherwise the store verifies the pair and
/// a session is registered on success.
pub async fn login(
    store: &dyn ContentStore,
    registry: &SessionRegistry,
    username: &str,
    password: &str,
) -> std::result::Result<Session, LoginError> {
    if username.trim().is_empty() {
        return Err(LoginError::InvalidUsername);
    }

    if let Some(session) = registry.find(username).await.map_err(login_store_err)? {
        debug!(username = %username, "login: session already active");
        return Ok(session);
    }

    let ok = store
        .check_credentials(username, password)
        .await
        .map_err(login_store_err)?;
    if !ok {
        debug!(username = %username, "login rejected");
        return Err(LoginError::InvalidCredentials);
    }

    let session = registry.register(username).await.map_err(login_store_err)?;
    info!(username = %username, "logged in");
    Ok(session)
}

/// Log a user out.
///
/// Returns true if a session was removed; logging out without a
/// session is a no-op, not an error.
pub async fn logout(registry: &SessionRegistry, username: &str) -> Result<bool> {
    let removed = registry.unregister(username).await?;
    if removed {
        info!(username = %username, "logged out");
    }
    Ok(removed)
}

/// Register a new account.
///
/// The user is not logged in afterwards; they go through [`login`]
/// like anyone else. A taken username is reported as
/// [`RegistrationError::UsernameTaken`], both when the pre-check sees
/// it and when a concurrent writer wins the append race.
pub async fn register_user(
    store: &dyn ContentStore,
    username: &str,
    password: &str,
) -> std::result::Result<RegistrationOutcome, RegistrationError> {
    if username.trim().is_empty() {
        return Err(RegistrationError::InvalidUsername);
    }
    if password.is_empty() {
        return Err(RegistrationError::EmptyPassword);
    }

    if store
        .username_exists(username)
        .await
        .map_err(registration_store_err)?
    {
        return Err(RegistrationError::UsernameTaken);
    }

    let created = store
        .create_user(username, password)
        .await
        .map_err(registration_store_err)?;
    if !created {
        return Err(RegistrationError::UsernameTaken);
    }

    info!(username = %username, "new user registered");
    Ok(RegistrationOutcome {
        username: username.to_string(),
        just_registered: true,
    })
}
