//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod pihole;

pub use pihole::{PiholeClient, PiholeProvider};
