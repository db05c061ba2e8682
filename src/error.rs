use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::auth::dto::MessageResponse;
use crate::auth::repo::StoreError;

pub const INVALID_CREDENTIALS: &str = "Usuario, cédula o contraseña incorrectos.";
const DB_UNAVAILABLE: &str = "Servicio no disponible, intente más tarde.";
const INTERNAL_ERROR: &str = "Error en el servidor.";

/// Every way a register or login request can fail.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("a user with this {field} already exists")]
    DuplicateKey { field: &'static str },
    /// Unknown identifier and wrong password both land here.
    #[error("invalid credentials")]
    AuthenticationFailure,
    #[error("database unreachable")]
    Connection(#[source] StoreError),
    #[error("unexpected failure")]
    Unexpected(#[source] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey { field } => AuthError::DuplicateKey { field },
            StoreError::Validation(msg) => AuthError::Validation(msg),
            StoreError::Connection(_) => AuthError::Connection(e),
            StoreError::Unexpected(_) => AuthError::Unexpected(e.into()),
        }
    }
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::DuplicateKey { .. } => StatusCode::BAD_REQUEST,
            AuthError::AuthenticationFailure => StatusCode::UNAUTHORIZED,
            AuthError::Connection(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the caller. Server-side failures never carry their cause.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Validation(msg) => msg.clone(),
            AuthError::DuplicateKey { field } => {
                format!("Ya existe un usuario registrado con ese {field}.")
            }
            AuthError::AuthenticationFailure => INVALID_CREDENTIALS.to_string(),
            AuthError::Connection(_) => DB_UNAVAILABLE.to_string(),
            AuthError::Unexpected(_) => INTERNAL_ERROR.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AuthError::Connection(source) => {
                error!(error = ?source, "credential store unreachable");
            }
            AuthError::Unexpected(source) => {
                error!(error = ?source, "request failed unexpectedly");
            }
            _ => {}
        }
        (status, Json(MessageResponse::failure(self.public_message()))).into_response()
    }
}
