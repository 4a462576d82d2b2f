// Credential bootstrap: log in with the configured account and fall back to
// registering it when login fails for any reason.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::api::{ApiClient, AuthRequest, RegisterRequest};
use crate::config::Config;
use crate::error::ApiError;

/// Account used for this run. Never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl From<&Config> for Credentials {
    fn from(config: &Config) -> Self {
        Credentials {
            email: config.email.clone(),
            password: config.password.clone(),
            full_name: config.full_name.clone(),
        }
    }
}

/// Which endpoint issued the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    Login,
    Registration,
}

impl fmt::Display for AuthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthSource::Login => f.write_str("login"),
            AuthSource::Registration => f.write_str("registration"),
        }
    }
}

/// An authenticated session: a non-empty bearer token for `email`.
#[derive(Debug, Clone)]
pub struct Session {
    pub email: String,
    pub token: String,
    pub source: AuthSource,
}

/// The registration error behind a failed [`authenticate`], printed the
/// same way as the login failure before it.
pub fn registration_failure(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api_err) => api_err.to_string(),
        None => err.to_string(),
    }
}

fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Obtain a token: login first, registration on any login failure.
///
/// Progress lines go to `out`. Returns an error only when both attempts
/// fail; the error carries both reasons. At most two requests are made.
pub fn authenticate(api: &ApiClient, creds: &Credentials, out: &mut impl Write) -> Result<Session> {
    writeln!(out, "Logging in as {}...", creds.email)?;
    let login = AuthRequest {
        email: creds.email.clone(),
        password: creds.password.clone(),
    };
    let pb = spinner("Logging in...");
    let login_result = api.login(&login);
    pb.finish_and_clear();

    let login_err = match login_result {
        Ok(token) => {
            writeln!(out, "Login successful. Token obtained.")?;
            info!(email = %creds.email, "authenticated via login");
            return Ok(Session {
                email: creds.email.clone(),
                token,
                source: AuthSource::Login,
            });
        }
        Err(e) => e,
    };
    writeln!(out, "Login failed: {}", login_err)?;
    warn!(error = %login_err, status = ?login_err.status(), "login failed, falling back to registration");

    writeln!(out, "Trying registration...")?;
    let register = RegisterRequest {
        email: creds.email.clone(),
        password: creds.password.clone(),
        full_name: creds.full_name.clone(),
    };
    let pb = spinner("Registering...");
    let register_result = api.register(&register);
    pb.finish_and_clear();

    match register_result {
        Ok(token) => {
            writeln!(out, "Registration successful. Token obtained.")?;
            info!(email = %creds.email, "authenticated via registration");
            Ok(Session {
                email: creds.email.clone(),
                token,
                source: AuthSource::Registration,
            })
        }
        Err(reg_err) => Err(anyhow!(reg_err)
            .context(format!("login failed ({login_err}), registration failed"))),
    }
}
