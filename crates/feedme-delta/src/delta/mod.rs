//! Feed-data deltas.
//!
//! # Operations
//!
//! Object/generic: `Set`, `Delete`, `DeleteValue`.
//! String: `Prepend`, `Append`. Number: `Increment`, `Decrement`.
//! Boolean: `Toggle`.
//! Array: `InsertFirst`, `InsertLast`, `InsertBefore`, `InsertAfter`,
//! `DeleteFirst`, `DeleteLast`.

pub mod types;
pub mod apply;
pub mod codec;

pub use types::{
    carries_payload, Delta, RootPolicy, OPERATION_NAMES, ROOT_ARRAY, ROOT_BOOLEAN, ROOT_DELETE,
    ROOT_NUMBER, ROOT_STRING,
};
pub use apply::{apply, apply_deltas, apply_mut, ApplyError, ApplyOptions, ReplayResult};
pub use codec::{from_json, from_json_deltas, to_json, to_json_deltas};
