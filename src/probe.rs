// Diagnostic GETs against authenticated endpoints. A failed probe is
// reported and skipped; it never aborts the run.

use std::io::Write;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::ApiClient;

/// Outcome of one successful probe: the server answered with JSON.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub path: String,
    pub status: StatusCode,
    pub body: Value,
}

impl ProbeReport {
    /// Body as 2-space indented JSON, keys in the order the server sent.
    pub fn pretty_body(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.body)
    }
}

/// Issue one authenticated GET for `path` and print status and body to
/// `out`. Once the server answers, `Status: N` is printed even if the body
/// turns out not to be JSON. Transport errors and non-JSON bodies are
/// printed as `Request failed: ...` and returned as `None`.
///
/// Only a failure to write to `out` is an error.
pub fn probe(api: &ApiClient, path: &str, out: &mut impl Write) -> Result<Option<ProbeReport>> {
    writeln!(out, "\nTesting GET {}...", path)?;
    let res = match api.get(path) {
        Ok(res) => res,
        Err(e) => {
            warn!(path, error = %e, "probe failed");
            writeln!(out, "Request failed: {}", e)?;
            return Ok(None);
        }
    };
    writeln!(out, "Status: {}", res.status.as_u16())?;
    match res.json() {
        Ok(body) => {
            info!(path, status = %res.status, "probe answered");
            let report = ProbeReport {
                path: path.to_string(),
                status: res.status,
                body,
            };
            let pretty = report.pretty_body().context("formatting probe body")?;
            writeln!(out, "Response: {}", pretty)?;
            Ok(Some(report))
        }
        Err(e) => {
            warn!(path, status = %res.status, error = %e, "probe body is not json");
            writeln!(out, "Request failed: {}", e)?;
            Ok(None)
        }
    }
}

/// Probe each path in order. Returns how many probes got a JSON answer.
pub fn run_probes(api: &ApiClient, paths: &[String], out: &mut impl Write) -> Result<usize> {
    let mut answered = 0;
    for path in paths {
        if probe(api, path, out)?.is_some() {
            answered += 1;
        }
    }
    Ok(answered)
}
