//! Runtime configuration
//!
//! Read once from the environment at `rc_runtime_init`; readable from any
//! thread afterwards.

use crate::logging::LogConfig;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

static CONFIG: Lazy<RwLock<RuntimeConfig>> = Lazy::new(|| RwLock::new(RuntimeConfig::default()));

/// What first/last return for a zero-length array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyAccessPolicy {
    /// Compatibility mode: `0` for integers, null for references
    #[default]
    ZeroSentinel,
    /// Report `EmptyContainerAccess`
    Strict,
}

impl EmptyAccessPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "zero" | "sentinel" | "compat" => Some(Self::ZeroSentinel),
            "strict" | "error" => Some(Self::Strict),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub empty_access: EmptyAccessPolicy,
    pub log: LogConfig,
}

impl RuntimeConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup
    ///
    /// RC_RUNTIME_EMPTY_ACCESS: zero (default) or strict. Unknown values keep
    /// the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let empty_access = lookup("RC_RUNTIME_EMPTY_ACCESS")
            .and_then(|v| EmptyAccessPolicy::parse(&v))
            .unwrap_or_default();

        Self {
            empty_access,
            log: LogConfig::from_lookup(&lookup),
        }
    }
}

/// Replace the process-wide configuration
pub fn set(config: RuntimeConfig) {
    *CONFIG.write() = config;
}

/// Snapshot of the process-wide configuration
pub fn get() -> RuntimeConfig {
    CONFIG.read().clone()
}

/// Policy consulted by the default first/last accessors
#[inline]
pub fn empty_access_policy() -> EmptyAccessPolicy {
    CONFIG.read().empty_access
}
