pub mod calendar;
pub mod error;
pub mod events;
pub mod ports;
pub mod refresh;
pub mod repo;
pub mod scheduling;
pub mod service;
pub mod session;
