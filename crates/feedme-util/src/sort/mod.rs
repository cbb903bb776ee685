//! Canonical key ordering for JSON objects.

mod keys;

pub use keys::sorted_keys;
