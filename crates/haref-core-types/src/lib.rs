//! Small types shared by the validator crates
//!
//! - [`RunId`] tags the log events of one validation run
//! - [`Sensitive`] keeps `!secret` names out of rendered output
//! - [`schema`] spells the operation names and field keys of log events

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
