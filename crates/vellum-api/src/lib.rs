//! HTTP layer: axum handlers over the vellum engine and store.
//! All rusqlite work runs under `spawn_blocking`.

pub mod articles;
pub mod auth;
pub mod browse;
pub mod error;
pub mod middleware;
pub mod profile;
pub mod summarize;
pub mod uploads;
pub mod views;
