//! Fail-soft outcomes.
//!
//! A stage that must never fail still needs to say *why* it handed back a
//! reduced result. `FailSoft<T>` carries the value either way, plus the
//! diagnostic when the value is a fallback.

/// Result of a stage that degrades instead of erroring
#[derive(Debug, Clone, PartialEq)]
pub enum FailSoft<T> {
    /// The stage produced its real value
    Ok(T),
    /// The stage failed and produced `fallback` instead
    Degraded { fallback: T, reason: String },
}

impl<T> FailSoft<T> {
    pub fn degraded(fallback: T, reason: impl Into<String>) -> Self {
        FailSoft::Degraded {
            fallback,
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, FailSoft::Degraded { .. })
    }

    /// The diagnostic, if this outcome is a fallback.
    pub fn reason(&self) -> Option<&str> {
        match self {
            FailSoft::Ok(_) => None,
            FailSoft::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            FailSoft::Ok(value) => value,
            FailSoft::Degraded { fallback, .. } => fallback,
        }
    }

    /// Drop the diagnostic and keep whatever value was produced.
    pub fn into_inner(self) -> T {
        match self {
            FailSoft::Ok(value) => value,
            FailSoft::Degraded { fallback, .. } => fallback,
        }
    }

    /// Transform the carried value, keeping the diagnostic.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FailSoft<U> {
        match self {
            FailSoft::Ok(value) => FailSoft::Ok(f(value)),
            FailSoft::Degraded { fallback, reason } => FailSoft::Degraded {
                fallback: f(fallback),
                reason,
            },
        }
    }
}

impl<T: Default, E: std::fmt::Display> From<std::result::Result<T, E>> for FailSoft<T> {
    fn from(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(value) => FailSoft::Ok(value),
            Err(e) => FailSoft::degraded(T::default(), e.to_string()),
        }
    }
}
