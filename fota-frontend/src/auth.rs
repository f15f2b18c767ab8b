//! Login and registration.
//!
//! Passwords never leave the process in clear text: they are hashed with
//! SHA-256 and the backend is told so with `X-Password-Hashed`.

use fota_common::SessionContext;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

use crate::backend::FotaApi;
use crate::error::ApiError;

const LOGIN_FAILED: &str = "Login failed. Please check your callsign and password.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";
const REGISTER_OK: &str = "Registration successful. You can now log in.";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern is valid"));

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub callsign: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub callsign: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
    /// Session to persist after a successful login; anonymous otherwise.
    pub session: SessionContext,
}

impl AuthOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            session: SessionContext::anonymous(),
        }
    }
}

/// Lower-case hex SHA-256 of `input`.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

fn check_callsign(callsign: &str) -> Result<(), ApiError> {
    let len = callsign.chars().count();
    if !(2..=32).contains(&len) {
        return Err(ApiError::Validation(
            "Callsign must be 2 to 32 characters.".to_string(),
        ));
    }
    Ok(())
}

fn check_password(password: &str) -> Result<(), ApiError> {
    let len = password.chars().count();
    if !(8..=128).contains(&len) {
        return Err(ApiError::Validation(
            "Password must be 8 to 128 characters.".to_string(),
        ));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ApiError> {
    if email.chars().count() > 128 || !EMAIL_RE.is_match(email) {
        return Err(ApiError::Validation(
            "Enter a valid email address.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_credentials(credentials: &Credentials) -> Result<(), ApiError> {
    check_callsign(credentials.callsign.trim())?;
    check_password(&credentials.password)
}

pub fn validate_registration(registration: &Registration) -> Result<(), ApiError> {
    check_callsign(registration.callsign.trim())?;
    check_email(registration.email.trim())?;
    check_password(&registration.password)?;
    if registration.password != registration.confirm_password {
        return Err(ApiError::Validation("Passwords do not match.".to_string()));
    }
    Ok(())
}

/// Any 2xx answer counts as logged in.
pub async fn login(api: &dyn FotaApi, credentials: &Credentials) -> AuthOutcome {
    if let Err(e) = validate_credentials(credentials) {
        return AuthOutcome::failed(e.to_string());
    }

    let callsign = credentials.callsign.trim();
    let body = json!({
        "callsign": callsign,
        "password": sha256_hex(&credentials.password),
    });

    match api.login(&body).await {
        Ok(_) => {
            tracing::info!("Logged in as {}", callsign.to_uppercase());
            AuthOutcome {
                success: true,
                message: "Logged in".to_string(),
                session: SessionContext::for_callsign(callsign),
            }
        }
        Err(e) => {
            tracing::warn!("Login failed for {}: {}", callsign, e);
            AuthOutcome::failed(e.server_message().unwrap_or(LOGIN_FAILED))
        }
    }
}

pub async fn register(api: &dyn FotaApi, registration: &Registration) -> AuthOutcome {
    if let Err(e) = validate_registration(registration) {
        return AuthOutcome::failed(e.to_string());
    }

    let body = json!({
        "callsign": registration.callsign.trim(),
        "email": registration.email.trim(),
        "password": sha256_hex(&registration.password),
    });

    match api.register(&body).await {
        Ok(response) => {
            let message = response
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(REGISTER_OK);
            AuthOutcome {
                success: true,
                message: message.to_string(),
                session: SessionContext::anonymous(),
            }
        }
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            AuthOutcome::failed(e.server_message().unwrap_or(REGISTER_FAILED))
        }
    }
}
