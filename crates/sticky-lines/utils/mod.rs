//! Utility helpers shared across the crate

pub mod hashers;

pub use hashers::{create_hash_map, FastHashMap};
