//! Domain models shared across Heliops components.

pub mod identity;

pub use identity::{Profile, UserRole};
