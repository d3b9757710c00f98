/*
 * Responsibility
 * - crate の module 構成 (main.rs は起動だけ)
 */
pub mod api;
pub mod app;
pub mod authz;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
