//! Typed errors for the reminder and transport layers
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Replace blanket error swallowing with explicit error kinds

use thiserror::Error;

use crate::features::reminders::model::{ReminderStatus, MAX_MINUTES, MIN_MINUTES};

/// Errors produced by reminder validation and persistence
#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("minutes must be between 1 and 10080, got {0}")]
    InvalidMinutes(i64),

    #[error("reminder text is empty")]
    EmptyText,

    #[error("reminder {0} not found")]
    NotFound(String),

    #[error("reminder {0} belongs to another chat")]
    Forbidden(String),

    #[error("reminder {id} is already {status}")]
    AlreadyResolved { id: String, status: ReminderStatus },

    #[error("reminder store failure: {0}")]
    Store(String),
}

impl ReminderError {
    /// Validation errors are rejected locally and never retried
    pub fn is_validation(&self) -> bool {
        matches!(self, ReminderError::InvalidMinutes(_) | ReminderError::EmptyText)
    }

    /// Chat-facing text for this error.
    ///
    /// Store failures are reported generically; their detail only goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            ReminderError::InvalidMinutes(_) => format!(
                "Los minutos deben estar entre {MIN_MINUTES} y {MAX_MINUTES}."
            ),
            ReminderError::EmptyText => "El texto del recordatorio no puede estar vacio.".to_string(),
            ReminderError::NotFound(_) => {
                "No encontre ese recordatorio. Usa /listar para ver tus recordatorios.".to_string()
            }
            ReminderError::Forbidden(_) => "Ese recordatorio no te pertenece.".to_string(),
            ReminderError::AlreadyResolved { status, .. } => match status {
                ReminderStatus::Completed => "Ese recordatorio ya fue enviado.".to_string(),
                _ => "Ese recordatorio ya fue eliminado.".to_string(),
            },
            ReminderError::Store(_) => {
                "Ocurrio un error interno. Intenta de nuevo mas tarde.".to_string()
            }
        }
    }
}

impl From<sqlite::Error> for ReminderError {
    fn from(e: sqlite::Error) -> Self {
        ReminderError::Store(e.to_string())
    }
}

/// Errors talking to the messaging transport
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport API error: {0}")]
    Api(String),
}
