//! ChatLens — local usage statistics and image-highlight companion for
//! web chat clients.
//!
//! This library crate exposes all modules for use by the driver binary
//! and integration tests.

pub mod app;
pub mod database;
pub mod dom;
pub mod engine;
pub mod managers;
pub mod platform;
pub mod router;
pub mod services;
pub mod types;
