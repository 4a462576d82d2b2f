// Library root
// -----------
// The binary (`main.rs`) wires these modules together; keeping them in a
// library lets the integration tests drive the same code against a mock
// server.
//
// - `config`: flags, environment overrides and the built-in defaults.
// - `api`: blocking HTTP calls (login, register, authenticated GET).
// - `session`: login-then-register token bootstrap.
// - `probe`: diagnostic GETs and their printed reports.
// - `error`: classification of a single failed request.
pub mod api;
pub mod config;
pub mod error;
pub mod probe;
pub mod session;
