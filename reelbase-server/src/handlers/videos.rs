//! Video handlers: multipart intake for the transactional writer.
//!
//! Create and update accept `multipart/form-data`. Scalar attributes arrive
//! as text parts, relation sets as repeated `*_id` parts, and files under
//! their slot names (`thumb_file`, `banner_file`, `trailer_file`,
//! `video_file`). An empty `*_id` part clears the relation set.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use tracing::warn;

use reelbase_core::storage::Upload;
use reelbase_core::writer::SlotUpload;
use reelbase_model::{
    CastMemberId, CategoryId, CreateVideo, GenreId, ListQuery, Page, Rating, UpdateVideo, Video,
    VideoFileSlot, VideoId,
};

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Everything a multipart request may carry; create and update share the
/// parser and differ only in which fields they require.
#[derive(Debug, Default)]
struct VideoForm {
    title: Option<String>,
    description: Option<String>,
    year_launched: Option<i16>,
    opened: Option<bool>,
    rating: Option<Rating>,
    duration: Option<i16>,
    categories: Option<Vec<CategoryId>>,
    genres: Option<Vec<GenreId>>,
    cast_members: Option<Vec<CastMemberId>>,
    uploads: Vec<SlotUpload>,
}

impl VideoForm {
    fn into_create(self) -> AppResult<(CreateVideo, Vec<SlotUpload>)> {
        let draft = CreateVideo {
            title: self.title.ok_or_else(|| missing("title"))?,
            description: self.description.ok_or_else(|| missing("description"))?,
            year_launched: self.year_launched.ok_or_else(|| missing("year_launched"))?,
            opened: self.opened.unwrap_or(false),
            rating: self.rating.ok_or_else(|| missing("rating"))?,
            duration: self.duration.ok_or_else(|| missing("duration"))?,
            categories: self.categories.unwrap_or_default(),
            genres: self.genres.unwrap_or_default(),
            cast_members: self.cast_members.unwrap_or_default(),
        };
        Ok((draft, self.uploads))
    }

    fn into_update(self) -> (UpdateVideo, Vec<SlotUpload>) {
        let changes = UpdateVideo {
            title: self.title,
            description: self.description,
            year_launched: self.year_launched,
            opened: self.opened,
            rating: self.rating,
            duration: self.duration,
            categories: self.categories,
            genres: self.genres,
            cast_members: self.cast_members,
        };
        (changes, self.uploads)
    }
}

fn missing(field: &str) -> AppError {
    AppError::unprocessable(format!("missing required field {field}"))
}

fn invalid(field: &str, detail: impl std::fmt::Display) -> AppError {
    AppError::unprocessable(format!("invalid value for {field}: {detail}"))
}

/// Push one relation ID onto a set, treating an empty value as "replace
/// with the empty set".
fn push_relation<T>(
    set: &mut Option<Vec<T>>,
    field: &str,
    raw: &str,
    parse: impl Fn(&str) -> Result<T, reelbase_model::ModelError>,
) -> AppResult<()> {
    let entries = set.get_or_insert_with(Vec::new);
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(());
    }
    entries.push(parse(raw).map_err(|e| invalid(field, e))?);
    Ok(())
}

async fn read_form(mut multipart: Multipart) -> AppResult<VideoForm> {
    let mut form = VideoForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Ok(slot) = name.parse::<VideoFileSlot>() {
            let original_name = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| invalid(&name, "file part without a filename"))?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(format!("failed reading {name}: {e}")))?;
            if bytes.len() as u64 > slot.max_bytes() {
                return Err(invalid(
                    slot.column(),
                    format!("file exceeds the {} byte limit", slot.max_bytes()),
                ));
            }
            form.uploads.push(SlotUpload {
                slot,
                upload: Upload::new(original_name, bytes.to_vec()),
            });
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::bad_request(format!("failed reading {name}: {e}")))?;

        match name.as_str() {
            "title" => form.title = Some(text),
            "description" => form.description = Some(text),
            "year_launched" => {
                form.year_launched = Some(text.parse().map_err(|e| invalid(&name, e))?)
            }
            "opened" => form.opened = Some(text.parse().map_err(|e| invalid(&name, e))?),
            "rating" => form.rating = Some(text.parse().map_err(|e| invalid(&name, e))?),
            "duration" => form.duration = Some(text.parse().map_err(|e| invalid(&name, e))?),
            "categories_id" => {
                push_relation(&mut form.categories, &name, &text, CategoryId::parse)?
            }
            "genres_id" => push_relation(&mut form.genres, &name, &text, GenreId::parse)?,
            "cast_members_id" => {
                push_relation(&mut form.cast_members, &name, &text, CastMemberId::parse)?
            }
            other => warn!(field = other, "ignoring unknown multipart field"),
        }
    }

    Ok(form)
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Video>>> {
    Ok(Json(state.videos.list(query).await?))
}

pub async fn store(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Video>)> {
    let (draft, uploads) = read_form(multipart).await?.into_create()?;
    let video = state.writer.create(draft, uploads).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Video>> {
    let id = VideoId::parse(&id)?;
    Ok(Json(state.videos.get(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Video>> {
    let id = VideoId::parse(&id)?;
    let (changes, uploads) = read_form(multipart).await?.into_update();
    Ok(Json(state.writer.update(id, changes, uploads).await?))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = VideoId::parse(&id)?;
    state.videos.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Video>> {
    let id = VideoId::parse(&id)?;
    Ok(Json(state.videos.restore(id).await?))
}
