use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::Role;

/// Request body for `/register`. Every field is optional on the wire so a
/// missing key surfaces as a validation failure naming the field.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub cedula: Option<String>,
    pub telefono: Option<String>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "nacimiento")]
    pub fecha_nacimiento: Option<String>,
    pub password: Option<String>,
}

/// Request body for `/login`. `user` is a cédula or an account name.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub user: Option<String>,
    pub pass: Option<String>,
}

/// `{success, message}` envelope shared by every non-login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Returned after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub role: Role,
    pub name: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}
