use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest},
        services,
    },
    error::AuthError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Unreadable bodies become the same `{success:false}` envelope as any
/// other validation failure.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AuthError> {
    payload.map(|Json(v)| v).map_err(|rejection| {
        warn!(error = %rejection, "rejected request body");
        AuthError::Validation("Cuerpo de la solicitud inválido".into())
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    let req = body(payload)?;
    services::register_user(state.store.as_ref(), &state.hasher, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok("Registro exitoso.")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let req = body(payload)?;
    let outcome = services::authenticate(state.store.as_ref(), &state.hasher, req).await?;
    Ok(Json(LoginResponse {
        success: true,
        message: "Login exitoso.".into(),
        role: outcome.role,
        name: outcome.name,
        user_id: outcome.user_id,
    }))
}
