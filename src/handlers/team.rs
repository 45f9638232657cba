// src/handlers/team.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        access::{self, Capability},
        auth::CurrentProfile,
    },
    models::auth::{Profile, Role},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRolePayload {
    pub role: Role,
}

// GET /api/team
pub async fn list_team(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
) -> Result<Json<Vec<Profile>>, AppError> {
    access::require(&profile, Capability::ManageTeam)?;
    Ok(Json(app_state.auth_service.list_team().await?))
}

// PATCH /api/team/{id}/role -- promove (ou rebaixa) um perfil.
#[utoipa::path(
    patch,
    path = "/api/team/{id}/role",
    tag = "Equipe",
    params(("id" = Uuid, Path, description = "ID do perfil")),
    request_body = UpdateRolePayload,
    responses(
        (status = 204, description = "Papel atualizado"),
        (status = 403, description = "Só admin gerencia a equipe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::ManageTeam)?;
    app_state.auth_service.update_role(id, payload.role).await?;
    Ok(StatusCode::NO_CONTENT)
}
