use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use reelbase_model::{Category, CategoryId, ListQuery, NewCategory, Page, UpdateCategory};

use crate::errors::AppResult;
use crate::state::AppState;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Category>>> {
    Ok(Json(state.categories.list(query).await?))
}

pub async fn store(
    State(state): State<AppState>,
    Json(new): Json<NewCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.categories.create(new).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let id = CategoryId::parse(&id)?;
    Ok(Json(state.categories.get(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<UpdateCategory>,
) -> AppResult<Json<Category>> {
    let id = CategoryId::parse(&id)?;
    Ok(Json(state.categories.update(id, changes).await?))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = CategoryId::parse(&id)?;
    state.categories.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let id = CategoryId::parse(&id)?;
    Ok(Json(state.categories.restore(id).await?))
}
