//! Window-installation job scheduling: conflict-checked bookings per team,
//! a status lifecycle, role-filtered calendar projections and a REST/SSE surface.

pub mod contract;
pub use contract::{client, error, model};

pub mod module;
pub use module::JobScheduler;

// Exposed for integration tests and the server binary; other crates
// should use `contract`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
