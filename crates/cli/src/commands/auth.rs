//! Account and session commands.

use farine_store::{AppState, AuthError};

/// Register an account and log in as it.
///
/// # Errors
///
/// Returns an [`AuthError`] for duplicate emails, invalid input, or
/// persistence failures.
pub fn register(
    state: &mut AppState,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), AuthError> {
    let session = state.auth.register(name, email, password)?;
    tracing::info!("Registered and logged in as {} <{}>", session.name, session.email);
    Ok(())
}

/// Log in with email and password.
///
/// # Errors
///
/// Returns an [`AuthError`] for unknown accounts, wrong passwords, or
/// persistence failures.
pub fn login(state: &mut AppState, email: &str, password: &str) -> Result<(), AuthError> {
    let session = state.auth.login(email, password)?;
    tracing::info!("Logged in as {} <{}>", session.name, session.email);
    Ok(())
}

/// Clear the current session.
///
/// # Errors
///
/// Returns an [`AuthError`] if persisting fails.
pub fn logout(state: &mut AppState) -> Result<(), AuthError> {
    state.auth.logout()?;
    tracing::info!("Logged out");
    Ok(())
}

/// Show the current session, if any.
pub fn whoami(state: &AppState) {
    match state.auth.current_user() {
        Some(session) => {
            tracing::info!("{} <{}> (id {})", session.name, session.email, session.id);
        }
        None => tracing::info!("Not logged in"),
    }
}

/// Ensure the demo account exists.
///
/// # Errors
///
/// Returns an [`AuthError`] if hashing or persisting fails.
pub fn seed_demo(state: &mut AppState) -> Result<(), AuthError> {
    state.auth.seed_demo()?;
    tracing::info!(
        "Demo account ready: {} / {}",
        farine_store::auth::DEMO_EMAIL,
        farine_store::auth::DEMO_PASSWORD
    );
    Ok(())
}
