// ChatLens shared type definitions
// Each submodule defines types used across the extension contexts.

pub mod download;
pub mod errors;
pub mod message;
pub mod settings;
pub mod stats;
