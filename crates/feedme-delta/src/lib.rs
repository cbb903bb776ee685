//! feedme-delta - the feed-data mutation engine of the Feedme protocol.
//!
//! A server reveals an action on a feed as an ordered list of deltas. Every
//! party holding the previous feed data replays those deltas and must arrive
//! at an identical document; a canonical hash of the result lets them check
//! that without shipping the document itself.
//!
//! Modules, leaves first:
//! - [`path`]: structural legality of a delta path
//! - [`value`]: caller-supplied values and JSON-expressibility checks
//! - [`delta`]: the delta enum, its apply semantics and wire codec
//! - [`stable`]: canonical serialization
//! - [`hash`]: canonical digest of feed data
//! - [`revelation`]: [`ActionRevelation`], the delta-log builder
//! - [`message`]: the receiving side: decode, replay and verify
//! - [`cli`]: logic behind the `feed-delta` binary

pub mod error;
pub mod path;
pub mod value;
pub mod delta;
pub mod stable;
pub mod hash;
pub mod revelation;
pub mod message;
pub mod cli;

pub use delta::{apply, apply_deltas, apply_mut, ApplyError, ApplyOptions, Delta, ReplayResult, RootPolicy};
pub use error::RevelationError;
pub use hash::hash;
pub use message::RevelationMessage;
pub use path::{validate_path, Path, PathStep};
pub use revelation::ActionRevelation;
pub use value::{has_circular, has_undefined, validate_json_value, Ancestors, InputValue};
