//! Heliops CLI Library
//!
//! Shared helpers for the command-line tools: building the caller identity
//! from the environment and guessing content types for local files.

pub mod identity;
pub mod mime;

pub use identity::identity_from_env;
pub use mime::content_type_for_path;
