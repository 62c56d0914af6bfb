//! SwitchTransact Client Viewer Library
//!
//! A small proxy that looks up a person by national ID number at the
//! SwitchTransact API and reshapes the answer for a browser front-end.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Domain models, errors and the status tracker.
//! - `integrations`: External service clients.
//! - `app`: Router assembly and shutdown handling.
//! - `config`: Configuration management.
//! - `errors`: Error taxonomy and JSON error envelope.
//! - `handlers`: HTTP request handlers.
//! - `models`: Request, response and upstream payload models.
//! - `status`: Process-wide upstream status tracker.
//! - `switchtransact_client`: SwitchTransact API client.
//! - `validation`: Inbound input validation.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and the binary
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod status;
pub mod switchtransact_client;
pub mod validation;
