//! Document walk: stable pre-order traversal with inherited context

pub mod classify;
pub mod walker;

pub use classify::{classify, declared_kind};
pub use walker::{walk_fn, Flow, Visitor, Walker, DEFAULT_MAX_DEPTH};
