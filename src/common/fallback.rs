use std::fmt::Display;

use tracing::{debug, warn};

use crate::common::FallbackError;

/// Try each candidate in order, once, and return the first success.
///
/// Failures are logged and the next candidate is tried; when every candidate fails the
/// last error is reported in [`FallbackError::Exhausted`].
pub fn attempt_with_fallback<C, T, E, F>(candidates: &[C], mut attempt: F) -> Result<T, FallbackError>
where
    C: Display,
    E: Display,
    F: FnMut(&C) -> Result<T, E>,
{
    let mut last = None;
    for (i, candidate) in candidates.iter().enumerate() {
        match attempt(candidate) {
            Ok(value) => {
                debug!(candidate = %candidate, attempt = i + 1, "fallback attempt succeeded");
                return Ok(value);
            }
            Err(e) => {
                warn!(candidate = %candidate, error = %e, "fallback attempt failed");
                last = Some(e.to_string());
            }
        }
    }

    match last {
        None => Err(FallbackError::NoCandidates),
        Some(last) => Err(FallbackError::Exhausted { attempts: candidates.len(), last }),
    }
}
