//! Conversation endpoint handlers

use axum::{
    extract::{Path, State},
    Json,
};
use courier_core::Snowflake;
use courier_service::dto::{
    ConversationResponse, ConversationSummaryResponse, CreateDirectRequest, CreateGroupRequest,
    MembershipResponse, PaginatedResponse,
};
use courier_service::{ConversationService, MembershipService};

use crate::extractors::{AuthUser, Pagination, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /api/v1/conversations/direct
///
/// Opens a direct conversation with another user. Returns the existing
/// conversation when one is already open between the pair.
pub async fn create_direct(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateDirectRequest>,
) -> ApiResult<Created<Json<ConversationResponse>>> {
    let recipient_id: Snowflake = request
        .recipient_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid recipient_id format"))?;

    let service = ConversationService::new(state.service_context());
    let conversation = service.open_direct(auth.user_id, recipient_id).await?;

    Ok(Created(Json(conversation)))
}

/// POST /api/v1/conversations/group
pub async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateGroupRequest>,
) -> ApiResult<Created<Json<ConversationResponse>>> {
    let member_ids = request
        .member_ids
        .iter()
        .map(|id| {
            id.parse::<Snowflake>()
                .map_err(|_| ApiError::invalid_path("Invalid member_id format"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let service = ConversationService::new(state.service_context());
    let conversation = service
        .create_group(auth.user_id, request.title, request.image_url, member_ids)
        .await?;

    Ok(Created(Json(conversation)))
}

/// GET /api/v1/conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<ConversationSummaryResponse>>> {
    let service = ConversationService::new(state.service_context());
    let page = service
        .list_conversations(auth.user_id, pagination.page, pagination.page_size)
        .await?;

    Ok(Json(page))
}

/// GET /api/v1/conversations/:conversation_id
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<ConversationSummaryResponse>> {
    let conversation_id: Snowflake = conversation_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid conversation_id format"))?;

    let service = ConversationService::new(state.service_context());
    let summary = service
        .get_conversation(conversation_id, auth.user_id)
        .await?;

    Ok(Json(summary))
}

/// DELETE /api/v1/conversations/:conversation_id
pub async fn delete_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
) -> ApiResult<NoContent> {
    let conversation_id: Snowflake = conversation_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid conversation_id format"))?;

    let service = ConversationService::new(state.service_context());
    service
        .delete_conversation(conversation_id, auth.user_id)
        .await?;

    Ok(NoContent)
}

/// POST /api/v1/conversations/:conversation_id/read
///
/// Marks the conversation read for the caller, zeroing the unread
/// counter.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
) -> ApiResult<NoContent> {
    let conversation_id: Snowflake = conversation_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid conversation_id format"))?;

    let service = MembershipService::new(state.service_context());
    service.mark_read(conversation_id, auth.user_id).await?;

    Ok(NoContent)
}

/// GET /api/v1/conversations/:conversation_id/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<Vec<MembershipResponse>>> {
    let conversation_id: Snowflake = conversation_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid conversation_id format"))?;

    let service = MembershipService::new(state.service_context());
    let members = service.list_members(conversation_id, auth.user_id).await?;

    Ok(Json(members))
}
