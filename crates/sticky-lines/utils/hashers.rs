//! Hash map helpers
//!
//! Side tables keyed by range handles and document ids use ahash, which is
//! faster than SipHash for small keys while staying DoS resistant through
//! random seeds.

use ahash::RandomState;
use std::collections::HashMap;

/// `HashMap` using the ahash hasher
pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

/// Create a new `HashMap` with the ahash hasher
///
/// # Example
///
/// ```rust
/// use sticky_lines::utils::hashers::create_hash_map;
///
/// let mut map = create_hash_map::<String, i32>();
/// map.insert("key".to_string(), 42);
/// ```
#[must_use]
pub fn create_hash_map<K, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(RandomState::new())
}
