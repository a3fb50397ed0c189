use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CustomerDto, CustomerRequest};
use crate::application::CustomerService;
use crate::domain::table::TablePageParameter;
use crate::interfaces::http::common::{
    ok, ApiError, ApiResponse, ApiResult, EmptyData, TablePageRequest, TableResponse,
    ValidatedJson,
};

#[derive(Clone)]
pub struct CustomerHandlerState {
    pub customer_service: Arc<CustomerService>,
}

/// Filter keys: `fullname`, `phone`, `email`, `address`.
/// Search covers name, phone and email.
#[utoipa::path(
    post,
    path = "/api/v1/customers/table",
    tag = "Customers",
    security(("bearer_auth" = [])),
    request_body = TablePageRequest,
    responses(
        (status = 200, description = "One page of customers", body = ApiResponse<TableResponse<CustomerDto>>),
        (status = 400, description = "Invalid pager")
    )
)]
pub async fn customers_table(
    State(state): State<CustomerHandlerState>,
    Json(request): Json<TablePageRequest>,
) -> ApiResult<TableResponse<CustomerDto>> {
    let page = state
        .customer_service
        .table(&TablePageParameter::from(request))
        .await?;
    ok(page.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer details", body = ApiResponse<CustomerDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_customer(
    State(state): State<CustomerHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<CustomerDto> {
    ok(state.customer_service.get(&id).await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "Customers",
    security(("bearer_auth" = [])),
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<CustomerDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_customer(
    State(state): State<CustomerHandlerState>,
    ValidatedJson(request): ValidatedJson<CustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerDto>>), ApiError> {
    let customer = state.customer_service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(customer.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Customer ID")),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<CustomerDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_customer(
    State(state): State<CustomerHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CustomerRequest>,
) -> ApiResult<CustomerDto> {
    ok(state.customer_service.update(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Customer still has cards or tickets")
    )
)]
pub async fn delete_customer(
    State(state): State<CustomerHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.customer_service.delete(&id).await?;
    ok(EmptyData {})
}
