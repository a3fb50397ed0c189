//! User management API handlers
//!
//! Thin wrappers over `UserService`; route guards decide who may call
//! them.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateUserRequest, SetPermissionsRequest, UpdateUserRequest, UserDto};
use crate::application::UserService;
use crate::domain::table::TablePageParameter;
use crate::interfaces::http::common::{
    ok, ApiError, ApiResponse, ApiResult, EmptyData, TablePageRequest, TableResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/users/table",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = TablePageRequest,
    responses(
        (status = 200, description = "One page of users", body = ApiResponse<TableResponse<UserDto>>),
        (status = 400, description = "Invalid pager"),
        (status = 403, description = "Missing user.view")
    )
)]
pub async fn users_table(
    State(state): State<UserHandlerState>,
    Json(request): Json<TablePageRequest>,
) -> ApiResult<TableResponse<UserDto>> {
    let page = state
        .user_service
        .table(&TablePageParameter::from(request))
        .await?;
    ok(page.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<UserDto> {
    ok(state.user_service.get_user(&id).await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 400, description = "Unknown role"),
        (status = 409, description = "Username or email taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state.user_service.create_user(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Email taken")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<UserDto> {
    ok(state.user_service.update_user(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<EmptyData>),
        (status = 400, description = "Cannot delete yourself"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.user_service.delete_user(&id, &caller.user_id).await?;
    ok(EmptyData {})
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/permissions",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Direct grants of the user", body = ApiResponse<Vec<String>>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user_permissions(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<String>> {
    ok(state.user_service.permissions(&id).await?)
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/permissions",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = SetPermissionsRequest,
    responses(
        (status = 200, description = "Grants replaced", body = ApiResponse<Vec<String>>),
        (status = 400, description = "Unknown permission name"),
        (status = 404, description = "Not found")
    )
)]
pub async fn set_user_permissions(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<SetPermissionsRequest>,
) -> ApiResult<Vec<String>> {
    ok(state
        .user_service
        .set_permissions(&id, &request.permissions)
        .await?)
}
