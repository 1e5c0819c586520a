use thiserror::Error;

use super::types::Phase;

/// Błędy maszyny stanów minigry. Oznaczają błąd integracji (ciało minigry,
/// host), a nie warunek do obsłużenia w trakcie gry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("`{op}` is not allowed while the session is {phase:?}")]
    InvalidState { op: &'static str, phase: Phase },

    #[error("time scale must be positive and finite, got {0}")]
    InvalidTimeScale(f64),
}

impl SessionError {
    pub(crate) fn invalid_state(op: &'static str, phase: Phase) -> Self {
        SessionError::InvalidState { op, phase }
    }
}
