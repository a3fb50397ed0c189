use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateRoleRequest, PermissionDto, RoleDto, UpdateRoleRequest};
use crate::application::RoleService;
use crate::interfaces::http::common::{
    ok, ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson,
};

#[derive(Clone)]
pub struct RoleHandlerState {
    pub role_service: Arc<RoleService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/roles",
    tag = "Roles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All roles with their permissions", body = ApiResponse<Vec<RoleDto>>),
        (status = 403, description = "Missing role.view")
    )
)]
pub async fn list_roles(State(state): State<RoleHandlerState>) -> ApiResult<Vec<RoleDto>> {
    let roles = state.role_service.list().await?;
    ok(roles.into_iter().map(RoleDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role details", body = ApiResponse<RoleDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_role(
    State(state): State<RoleHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<RoleDto> {
    ok(state.role_service.get(&id).await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/roles",
    tag = "Roles",
    security(("bearer_auth" = [])),
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = ApiResponse<RoleDto>),
        (status = 400, description = "Unknown permission name"),
        (status = 409, description = "Name taken")
    )
)]
pub async fn create_role(
    State(state): State<RoleHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateRoleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RoleDto>>), ApiError> {
    let role = state.role_service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(role.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Role ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<RoleDto>),
        (status = 400, description = "Unknown permission name"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Name taken")
    )
)]
pub async fn update_role(
    State(state): State<RoleHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateRoleRequest>,
) -> ApiResult<RoleDto> {
    ok(state.role_service.update(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Role still assigned to users")
    )
)]
pub async fn delete_role(
    State(state): State<RoleHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.role_service.delete(&id).await?;
    ok(EmptyData {})
}

#[utoipa::path(
    get,
    path = "/api/v1/permissions",
    tag = "Permissions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Permission catalog with display names", body = ApiResponse<Vec<PermissionDto>>),
        (status = 403, description = "Missing permission.view")
    )
)]
pub async fn list_permissions(
    State(state): State<RoleHandlerState>,
) -> ApiResult<Vec<PermissionDto>> {
    let catalog = state.role_service.permission_catalog().await?;
    ok(catalog.into_iter().map(PermissionDto::from).collect())
}
