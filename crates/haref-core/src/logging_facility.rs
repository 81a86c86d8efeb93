//! Structured logging for loaders and validation runs
//!
//! Library code only emits events through the lifecycle macros
//! (`log_op_start!`, `log_op_end!`, `log_op_error!`, `log_op_degraded!`).
//! Installing a subscriber is left to the binary, which calls `init` once
//! when `-v` or `--log-json` is given; otherwise every event is dropped.
//!
//! ```rust
//! use haref_core::logging_facility::{init, Profile};
//!
//! init(Profile::Production);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
