//! Redacting wrapper for `!secret` and `!env_var` references
//!
//! A secret reference names a key in `secrets.yaml`. The name alone can be
//! revealing (`alarm_code_front_door`), so it is kept out of every rendered
//! form of a tree: debug dumps, log fields and findings.

use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// Value that formats as `***REDACTED***` under both `{}` and `{:?}`
///
/// ```
/// use haref_core_types::Sensitive;
///
/// let name = Sensitive::new("mqtt_password");
/// assert_eq!(format!("{:?}", name), "***REDACTED***");
/// assert_eq!(name.to_string(), "***REDACTED***");
/// assert_eq!(*name.expose(), "mqtt_password");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// The wrapped value; callers must not log it
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
