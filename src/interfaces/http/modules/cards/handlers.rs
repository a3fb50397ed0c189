use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CardDto, CardRequest};
use crate::application::CardService;
use crate::domain::table::TablePageParameter;
use crate::interfaces::http::common::{
    ok, ApiError, ApiResponse, ApiResult, EmptyData, TablePageRequest, TableResponse,
    ValidatedJson,
};

#[derive(Clone)]
pub struct CardHandlerState {
    pub card_service: Arc<CardService>,
}

/// Filter keys: `cardnumber`, `cardtype` and the owner's `fullname` /
/// `phone`. Rows include the owning customer.
#[utoipa::path(
    post,
    path = "/api/v1/cards/table",
    tag = "Cards",
    security(("bearer_auth" = [])),
    request_body = TablePageRequest,
    responses(
        (status = 200, description = "One page of cards", body = ApiResponse<TableResponse<CardDto>>),
        (status = 400, description = "Invalid pager")
    )
)]
pub async fn cards_table(
    State(state): State<CardHandlerState>,
    Json(request): Json<TablePageRequest>,
) -> ApiResult<TableResponse<CardDto>> {
    let page = state
        .card_service
        .table(&TablePageParameter::from(request))
        .await?;
    ok(page.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/cards/{id}",
    tag = "Cards",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Card ID")),
    responses(
        (status = 200, description = "Card details", body = ApiResponse<CardDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_card(
    State(state): State<CardHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<CardDto> {
    ok(state.card_service.get(&id).await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/cards",
    tag = "Cards",
    security(("bearer_auth" = [])),
    request_body = CardRequest,
    responses(
        (status = 201, description = "Card issued", body = ApiResponse<CardDto>),
        (status = 400, description = "Unknown customer"),
        (status = 409, description = "Card number taken")
    )
)]
pub async fn create_card(
    State(state): State<CardHandlerState>,
    ValidatedJson(request): ValidatedJson<CardRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CardDto>>), ApiError> {
    let card = state.card_service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(card.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/cards/{id}",
    tag = "Cards",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Card ID")),
    request_body = CardRequest,
    responses(
        (status = 200, description = "Card updated", body = ApiResponse<CardDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Card number taken")
    )
)]
pub async fn update_card(
    State(state): State<CardHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CardRequest>,
) -> ApiResult<CardDto> {
    ok(state.card_service.update(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/cards/{id}",
    tag = "Cards",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Card ID")),
    responses(
        (status = 200, description = "Card deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Card is referenced by tickets")
    )
)]
pub async fn delete_card(
    State(state): State<CardHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.card_service.delete(&id).await?;
    ok(EmptyData {})
}
