//! Message endpoint handlers

use axum::{
    extract::{Path, State},
    Json,
};
use courier_core::{MessageKind, Snowflake};
use courier_service::dto::{
    EditMessageRequest, MessageResponse, PaginatedResponse, SendMessageRequest,
};
use courier_service::MessageService;

use crate::extractors::{AuthUser, Pagination};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /api/v1/conversations/:conversation_id/messages
///
/// Pages through conversation history, newest first. Deleted messages
/// appear as tombstones with no content.
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<MessageResponse>>> {
    let conversation_id: Snowflake = conversation_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid conversation_id format"))?;

    let service = MessageService::new(state.service_context());
    let page = service
        .get_messages(
            conversation_id,
            auth.user_id,
            pagination.page,
            pagination.page_size,
        )
        .await?;

    Ok(Json(page))
}

/// POST /api/v1/conversations/:conversation_id/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let conversation_id: Snowflake = conversation_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid conversation_id format"))?;

    let kind = match request.kind.as_deref() {
        None => MessageKind::default(),
        Some(s) => MessageKind::parse(s)
            .ok_or_else(|| ApiError::invalid_query(format!("Unknown message type: {s}")))?,
    };

    let reply_to = request
        .reply_to
        .as_deref()
        .map(|id| {
            id.parse::<Snowflake>()
                .map_err(|_| ApiError::invalid_path("Invalid reply_to format"))
        })
        .transpose()?;

    let service = MessageService::new(state.service_context());
    let message = service
        .send_message(conversation_id, auth.user_id, request.content, kind, reply_to)
        .await?;

    Ok(Created(Json(message)))
}

/// PATCH /api/v1/messages/:message_id
pub async fn edit_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<String>,
    Json(request): Json<EditMessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let message_id: Snowflake = message_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid message_id format"))?;

    let service = MessageService::new(state.service_context());
    let message = service
        .edit_message(message_id, auth.user_id, request.content)
        .await?;

    Ok(Json(message))
}

/// DELETE /api/v1/messages/:message_id
///
/// Soft delete. The row stays in place as a tombstone so history
/// pagination keeps stable offsets.
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<String>,
) -> ApiResult<NoContent> {
    let message_id: Snowflake = message_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid message_id format"))?;

    let service = MessageService::new(state.service_context());
    service.delete_message(message_id, auth.user_id).await?;

    Ok(NoContent)
}
