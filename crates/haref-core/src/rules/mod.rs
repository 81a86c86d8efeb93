//! Registry lookup and severity policy

pub mod checker;
pub mod classifier;

pub use checker::{check, Outcome};
pub use classifier::classify;
