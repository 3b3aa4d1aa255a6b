//! Configuration types
//!
//! Board-agnostic configuration structures, embedded as postcard binary data.

pub mod types;

pub use types::*;
