use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use reelbase_model::{Genre, GenreId, ListQuery, NewGenre, Page, UpdateGenre};

use crate::errors::AppResult;
use crate::state::AppState;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Genre>>> {
    Ok(Json(state.genres.list(query).await?))
}

pub async fn store(
    State(state): State<AppState>,
    Json(new): Json<NewGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    let genre = state.genres.create(new).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Genre>> {
    let id = GenreId::parse(&id)?;
    Ok(Json(state.genres.get(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<UpdateGenre>,
) -> AppResult<Json<Genre>> {
    let id = GenreId::parse(&id)?;
    Ok(Json(state.genres.update(id, changes).await?))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = GenreId::parse(&id)?;
    state.genres.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Genre>> {
    let id = GenreId::parse(&id)?;
    Ok(Json(state.genres.restore(id).await?))
}
