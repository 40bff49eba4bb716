use std::fmt::Display;

use tracing::warn;

/// Result of a best-effort call.
///
/// `Unavailable` means the call was made and did not produce a value; callers
/// carry on without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort<T> {
    Success(T),
    Unavailable,
}

impl<T> BestEffort<T> {
    /// Collapse a fallible call, logging the failure.
    pub fn from_result<E: Display>(result: Result<T, E>, context: &str) -> Self {
        match result {
            Ok(value) => BestEffort::Success(value),
            Err(err) => {
                warn!(context, error = %err, "best-effort call failed");
                BestEffort::Unavailable
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BestEffort::Success(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            BestEffort::Success(value) => Some(value),
            BestEffort::Unavailable => None,
        }
    }
}
