// Entrypoint: authenticate, probe the mobile endpoints, exit.
// Exit status is 1 only when neither login nor registration yields a token.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use mobile_probe::{
    api::ApiClient,
    config::Config,
    probe::run_probes,
    session::{authenticate, registration_failure, Credentials},
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs go to stderr so stdout carries only the probe output.
/// `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let config = Config::parse();
    info!(base_url = %config.base_url, "mobile-probe starting");

    let mut api = ApiClient::from_config(&config)?;
    let mut out = io::stdout().lock();

    let session = match authenticate(&api, &Credentials::from(&config), &mut out) {
        Ok(session) => session,
        Err(e) => {
            writeln!(out, "Registration failed: {}", registration_failure(&e))?;
            let chain = format!("{:#}", e);
            warn!(error = %chain, "no token obtained, giving up");
            return Ok(ExitCode::from(1));
        }
    };
    api.set_token(&session.token);

    let paths = config.probe_paths();
    let answered = run_probes(&api, &paths, &mut out)?;
    info!(answered, total = paths.len(), source = %session.source, "probes finished");
    Ok(ExitCode::SUCCESS)
}
