//! feedme-util - JSON helpers shared by the Feedme delta engine.
//!
//! Nothing in here knows about feeds or deltas; these are the value-level
//! building blocks the engine composes: structural equality, JSON string
//! escaping and the key ordering used for canonical serialization.

pub mod json_equal;
pub mod obj_key_cmp;
pub mod sort;
pub mod strings;

pub use json_equal::{deep_equal, number_equal};
pub use obj_key_cmp::obj_key_cmp;
pub use sort::sorted_keys;
pub use strings::escape;
