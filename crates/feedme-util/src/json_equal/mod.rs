//! JSON equality utilities.
//!
//! Provides the structural equality used when a delta matches children by
//! value.

mod deep_equal;

pub use deep_equal::{deep_equal, number_equal};
