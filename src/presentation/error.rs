use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

pub const MISSING_FIELDS_MESSAGE: &str = "Todos los campos obligatorios deben ser completados.";
pub const ALREADY_REGISTERED_MESSAGE: &str = "El usuario ya está registrado.";
pub const INVALID_EMAIL_MESSAGE: &str = "El correo no es válido.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Credenciales inválidas.";
pub const ACCOUNT_NOT_FOUND_MESSAGE: &str = "Usuario no encontrado.";
pub const UNKNOWN_NFC_MESSAGE: &str = "NFC no asociado a ningún usuario.";
pub const NFC_IN_USE_MESSAGE: &str = "La tarjeta NFC ya está asignada a otro usuario.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor.";

/// json for every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// Body could not be read as JSON
    MalformedBody(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MalformedBody(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Domain(err) => match &err {
                DomainError::MissingField => {
                    (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE.to_string())
                }
                DomainError::InvalidEmail => {
                    (StatusCode::BAD_REQUEST, INVALID_EMAIL_MESSAGE.to_string())
                }
                DomainError::InvalidRole(role) => {
                    (StatusCode::BAD_REQUEST, format!("Rol no válido: {}", role))
                }
                DomainError::InvalidAccountId(id) => (
                    StatusCode::BAD_REQUEST,
                    format!("Identificador de usuario no válido: {}", id),
                ),
                DomainError::DuplicateAccount => {
                    (StatusCode::CONFLICT, ALREADY_REGISTERED_MESSAGE.to_string())
                }
                DomainError::NfcTokenInUse => {
                    (StatusCode::CONFLICT, NFC_IN_USE_MESSAGE.to_string())
                }
                DomainError::AccountNotFound => {
                    (StatusCode::NOT_FOUND, ACCOUNT_NOT_FOUND_MESSAGE.to_string())
                }
                DomainError::AuthenticationFailed => {
                    (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS_MESSAGE.to_string())
                }
                DomainError::UnknownNfcToken => {
                    (StatusCode::UNAUTHORIZED, UNKNOWN_NFC_MESSAGE.to_string())
                }
                DomainError::Repository(_)
                | DomainError::PasswordHashing(_)
                | DomainError::TokenGeneration(_) => {
                    tracing::error!(error = %err, "request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_ERROR_MESSAGE.to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
