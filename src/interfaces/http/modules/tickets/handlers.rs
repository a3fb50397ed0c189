use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{TicketDto, TicketRequest};
use crate::application::TicketService;
use crate::domain::table::TablePageParameter;
use crate::interfaces::http::common::{
    ok, ApiError, ApiResponse, ApiResult, EmptyData, TablePageRequest, TableResponse,
    ValidatedJson,
};

#[derive(Clone)]
pub struct TicketHandlerState {
    pub ticket_service: Arc<TicketService>,
}

/// Filter keys: `code`, `eventname`, `venue`, `seat`, `status`, the
/// customer's `fullname` / `phone` and the card's `cardnumber`. Search
/// covers code, event name and venue.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/table",
    tag = "Tickets",
    security(("bearer_auth" = [])),
    request_body = TablePageRequest,
    responses(
        (status = 200, description = "One page of tickets", body = ApiResponse<TableResponse<TicketDto>>),
        (status = 400, description = "Invalid pager")
    )
)]
pub async fn tickets_table(
    State(state): State<TicketHandlerState>,
    Json(request): Json<TablePageRequest>,
) -> ApiResult<TableResponse<TicketDto>> {
    let page = state
        .ticket_service
        .table(&TablePageParameter::from(request))
        .await?;
    ok(page.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/tickets/{id}",
    tag = "Tickets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket details", body = ApiResponse<TicketDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_ticket(
    State(state): State<TicketHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<TicketDto> {
    ok(state.ticket_service.get(&id).await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    tag = "Tickets",
    security(("bearer_auth" = [])),
    request_body = TicketRequest,
    responses(
        (status = 201, description = "Ticket created", body = ApiResponse<TicketDto>),
        (status = 400, description = "Unknown customer or card, or card not usable"),
        (status = 409, description = "Code taken")
    )
)]
pub async fn create_ticket(
    State(state): State<TicketHandlerState>,
    ValidatedJson(request): ValidatedJson<TicketRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TicketDto>>), ApiError> {
    let ticket = state.ticket_service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(ticket.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/tickets/{id}",
    tag = "Tickets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Ticket ID")),
    request_body = TicketRequest,
    responses(
        (status = 200, description = "Ticket updated", body = ApiResponse<TicketDto>),
        (status = 400, description = "Status change not allowed"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Code taken")
    )
)]
pub async fn update_ticket(
    State(state): State<TicketHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<TicketRequest>,
) -> ApiResult<TicketDto> {
    ok(state.ticket_service.update(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/tickets/{id}",
    tag = "Tickets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_ticket(
    State(state): State<TicketHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.ticket_service.delete(&id).await?;
    ok(EmptyData {})
}
