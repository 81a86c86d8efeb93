//! Subscriber installation for the command line front end

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// How log events leave the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines at debug level (`-v`)
    Development,
    /// One JSON object per event at info level (`--log-json`)
    Production,
    /// Bare registry; tests attach their own capture layer
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset
    ///
    /// Only the validator's own crates are let through; `serde_yaml` and
    /// friends stay silent.
    pub fn default_directives(self) -> &'static str {
        match self {
            Profile::Development => "haref_core=debug,haref_store=debug,haref_cli=debug",
            Profile::Production | Profile::Test => {
                "haref_core=info,haref_store=info,haref_cli=info"
            }
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directives()))
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Only the first call in a process has any effect. Events go to stderr,
/// which keeps stdout free for the findings report and `--format json`.
///
/// ```
/// use haref_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(profile.filter())
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(profile.filter())
                .init();
        }
        Profile::Test => tracing_subscriber::registry().init(),
    });
}
