//! Error types for the clientes API client.
//!
//! # Design
//! Two layers. `ApiError` is the internal taxonomy: it keeps the status code,
//! reason phrase and raw body so the failure can be logged in full.
//! `ClienteError` is what callers of `ClienteService` see: a single
//! human-readable message produced by `ApiError::normalize`. The raw error is
//! dropped at that boundary.

use thiserror::Error;

/// Reason shown for an unmapped status that arrived without one.
const UNKNOWN_STATUS_TEXT: &str = "Unknown Error";

/// Failure of a single request/response exchange.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No HTTP response was obtained (connection refused, DNS, timeout...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} {status_text}: {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Map this failure to the message shown to the user.
    pub fn normalize(&self) -> ClienteError {
        let message = match self {
            ApiError::Transport(msg) | ApiError::Deserialization(msg) | ApiError::Serialization(msg) => {
                format!("Erro: {msg}")
            }
            ApiError::Http { status, status_text, .. } => match status {
                400 => "Dados inválidos fornecidos".to_string(),
                401 => "Não autorizado".to_string(),
                403 => "Acesso negado".to_string(),
                404 => "Cliente não encontrado".to_string(),
                409 => "Conflito: CPF ou email já cadastrado".to_string(),
                500 => "Erro interno do servidor".to_string(),
                other => {
                    let reason = match status_text.trim() {
                        "" => UNKNOWN_STATUS_TEXT,
                        text => text,
                    };
                    format!("Erro {other}: {reason}")
                }
            },
        };
        ClienteError { message }
    }
}

/// The normalized, user-facing error returned by every `ClienteService` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClienteError {
    message: String,
}

impl ClienteError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&ApiError> for ClienteError {
    fn from(err: &ApiError) -> Self {
        err.normalize()
    }
}

impl From<ApiError> for ClienteError {
    fn from(err: ApiError) -> Self {
        err.normalize()
    }
}

/// Invalid client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
