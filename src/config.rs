// Run configuration. Every value has a built-in default matching the local
// development server, and can be overridden by a flag or an environment
// variable so the binary can be pointed at another instance.

use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_EMAIL: &str = "testmobile@temple.com";
pub const DEFAULT_PASSWORD: &str = "password123";
pub const DEFAULT_FULL_NAME: &str = "Test Mobile";

/// Endpoints probed after authenticating, in order.
pub const DEFAULT_PROBE_PATHS: [&str; 2] = ["/mobile/me/events", "/mobile/me/communities"];

/// Command-line arguments for `mobile-probe`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mobile-probe",
    version,
    about = "Log in (or register) against the API and probe the mobile endpoints"
)]
pub struct Config {
    /// API base URL, including the `/api` prefix.
    #[arg(long, env = "MOBILE_PROBE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "MOBILE_PROBE_EMAIL", default_value = DEFAULT_EMAIL)]
    pub email: String,

    #[arg(long, env = "MOBILE_PROBE_PASSWORD", default_value = DEFAULT_PASSWORD, hide_env_values = true)]
    pub password: String,

    /// Display name sent when falling back to registration.
    #[arg(long, env = "MOBILE_PROBE_FULL_NAME", default_value = DEFAULT_FULL_NAME)]
    pub full_name: String,

    /// Endpoint to probe. Repeat to probe several; replaces the default list.
    #[arg(long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    /// Request timeout in seconds. Unset keeps the HTTP client default.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Probe paths to run, falling back to the default mobile endpoints.
    pub fn probe_paths(&self) -> Vec<String> {
        if self.paths.is_empty() {
            DEFAULT_PROBE_PATHS.iter().map(|p| p.to_string()).collect()
        } else {
            self.paths.clone()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.into(),
            email: DEFAULT_EMAIL.into(),
            password: DEFAULT_PASSWORD.into(),
            full_name: DEFAULT_FULL_NAME.into(),
            paths: Vec::new(),
            timeout_secs: None,
        }
    }
}
