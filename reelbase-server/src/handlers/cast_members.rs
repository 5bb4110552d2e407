use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use reelbase_model::{CastMember, CastMemberId, ListQuery, NewCastMember, Page, UpdateCastMember};

use crate::errors::AppResult;
use crate::state::AppState;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<CastMember>>> {
    Ok(Json(state.cast_members.list(query).await?))
}

pub async fn store(
    State(state): State<AppState>,
    Json(new): Json<NewCastMember>,
) -> AppResult<(StatusCode, Json<CastMember>)> {
    let member = state.cast_members.create(new).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CastMember>> {
    let id = CastMemberId::parse(&id)?;
    Ok(Json(state.cast_members.get(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<UpdateCastMember>,
) -> AppResult<Json<CastMember>> {
    let id = CastMemberId::parse(&id)?;
    Ok(Json(state.cast_members.update(id, changes).await?))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = CastMemberId::parse(&id)?;
    state.cast_members.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CastMember>> {
    let id = CastMemberId::parse(&id)?;
    Ok(Json(state.cast_members.restore(id).await?))
}
