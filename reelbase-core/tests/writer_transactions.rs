//! Behaviour tests for the transactional video writer: atomicity of
//! create, relation-set replacement, and the replace-then-cleanup ordering
//! of file fields.

mod support;

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use reelbase_core::database::ports::{GenresRepository, VideosRepository};
use reelbase_core::database::repositories::{PostgresGenresRepository, PostgresVideosRepository};
use reelbase_core::storage::{BlobStore, FsBlobStore, Upload};
use reelbase_core::writer::{VideoWriter, blob_path};
use reelbase_core::{CatalogError, relations};
use reelbase_model::{
    CastMemberKind, CategoryId, NewGenre, UpdateGenre, UpdateVideo, VideoFileSlot,
};

use support::{
    FailAfter, count_rows, draft, file_count_under, relation_targets, seed_cast_member,
    seed_category, seed_genre, upload,
};

fn fs_writer(pool: &PgPool, root: &std::path::Path) -> VideoWriter {
    VideoWriter::new(pool.clone(), Arc::new(FsBlobStore::new(root)))
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn create_with_relations_and_no_files(pool: PgPool) -> Result<()> {
    let c1 = seed_category(&pool, "Documentary").await;
    let g1 = seed_genre(&pool, "History", vec![]).await;

    let dir = tempfile::tempdir()?;
    let writer = fs_writer(&pool, dir.path());

    let mut video = draft("The Silent Era");
    video.categories = vec![c1.id];
    video.genres = vec![g1.id];

    let created = writer.create(video, vec![]).await?;

    assert_eq!(created.category_ids(), vec![c1.id]);
    assert_eq!(created.genre_ids(), vec![g1.id]);
    assert_eq!(created.categories[0].name, "Documentary");
    assert!(created.cast_members.is_empty());
    assert_eq!(created.thumb_file, None);
    assert_eq!(created.banner_file, None);
    assert_eq!(created.trailer_file, None);
    assert_eq!(created.video_file, None);

    assert_eq!(count_rows(&pool, "video_categories").await, 1);
    assert_eq!(count_rows(&pool, "video_genres").await, 1);
    assert_eq!(count_rows(&pool, "video_cast_members").await, 0);
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn create_rolls_back_on_unknown_relation_target(pool: PgPool) -> Result<()> {
    let dir = tempfile::tempdir()?;
    let writer = fs_writer(&pool, dir.path());

    let mut video = draft("Ghost Category");
    video.categories = vec![CategoryId(Uuid::now_v7())];

    let err = writer
        .create(video, vec![upload(VideoFileSlot::ThumbFile, "t.jpg", b"pixels")])
        .await
        .unwrap_err();

    assert!(err.is_constraint(), "expected constraint error, got {err}");
    assert_eq!(count_rows(&pool, "videos").await, 0);
    assert_eq!(count_rows(&pool, "video_categories").await, 0);
    assert_eq!(file_count_under(dir.path()), 0);
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn create_compensates_blobs_when_a_later_upload_fails(pool: PgPool) -> Result<()> {
    let dir = tempfile::tempdir()?;
    // First put succeeds, second put blows up: the first blob must be
    // deleted again on the failure path.
    let writer = VideoWriter::new(pool.clone(), Arc::new(FailAfter::new(dir.path(), 1)));

    let err = writer
        .create(
            draft("Half Uploaded"),
            vec![
                upload(VideoFileSlot::ThumbFile, "t.jpg", b"thumb bytes"),
                upload(VideoFileSlot::BannerFile, "b.png", b"banner bytes"),
            ],
        )
        .await
        .unwrap_err();

    assert!(err.is_storage(), "expected storage error, got {err}");
    assert_eq!(count_rows(&pool, "videos").await, 0);
    assert_eq!(file_count_under(dir.path()), 0);
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn relation_sync_is_idempotent(pool: PgPool) -> Result<()> {
    let c1 = seed_category(&pool, "Movies").await;
    let c2 = seed_category(&pool, "Series").await;

    let dir = tempfile::tempdir()?;
    let writer = fs_writer(&pool, dir.path());
    let video = writer.create(draft("Synced"), vec![]).await?;
    let owner = video.id.to_uuid();

    let set = vec![c1.id.to_uuid(), c2.id.to_uuid()];

    let mut tx = pool.begin().await?;
    relations::sync(&mut tx, relations::VIDEO_CATEGORIES, owner, &set).await?;
    tx.commit().await?;

    let first = relation_targets(&pool, "video_categories", "video_id", owner).await;

    // Same set again: no residue, no duplicates, no writes needed.
    let mut tx = pool.begin().await?;
    relations::sync(&mut tx, relations::VIDEO_CATEGORIES, owner, &set).await?;
    tx.commit().await?;

    let second = relation_targets(&pool, "video_categories", "video_id", owner).await;
    assert_eq!(first, second);
    assert_eq!(second.len(), 2);
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn update_replaces_relation_set_exactly(pool: PgPool) -> Result<()> {
    let c1 = seed_category(&pool, "One").await;
    let c2 = seed_category(&pool, "Two").await;
    let c3 = seed_category(&pool, "Three").await;

    let dir = tempfile::tempdir()?;
    let writer = fs_writer(&pool, dir.path());

    let mut video = draft("Recut");
    video.categories = vec![c1.id];
    let created = writer.create(video, vec![]).await?;

    let updated = writer
        .update(
            created.id,
            UpdateVideo {
                categories: Some(vec![c2.id, c3.id]),
                ..UpdateVideo::default()
            },
            vec![],
        )
        .await?;

    let mut expected = vec![c2.id, c3.id];
    expected.sort();
    assert_eq!(updated.category_ids(), expected);

    let rows = relation_targets(&pool, "video_categories", "video_id", created.id.to_uuid()).await;
    assert!(!rows.contains(&c1.id.to_uuid()));
    assert_eq!(rows.len(), 2);
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn update_swaps_thumb_and_cleans_up_old_blob(pool: PgPool) -> Result<()> {
    let dir = tempfile::tempdir()?;
    let writer = fs_writer(&pool, dir.path());
    let store = FsBlobStore::new(dir.path());

    let created = writer
        .create(
            draft("Replaceable"),
            vec![upload(VideoFileSlot::ThumbFile, "old.jpg", b"old pixels")],
        )
        .await?;
    let old_name = created.thumb_file.clone().expect("thumb stored");
    let old_path = blob_path(created.id, &old_name);
    assert!(store.contains(&old_path).await?);

    let updated = writer
        .update(
            created.id,
            UpdateVideo::default(),
            vec![upload(VideoFileSlot::ThumbFile, "new.jpg", b"new pixels")],
        )
        .await?;

    let new_name = updated.thumb_file.clone().expect("thumb replaced");
    assert_ne!(new_name, old_name);
    assert_eq!(
        new_name,
        Upload::new("new.jpg", b"new pixels".to_vec())
            .stored_name()
            .into_string()
    );

    assert!(store.contains(&blob_path(created.id, &new_name)).await?);
    assert!(!store.contains(&old_path).await?, "old blob must be gone");
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn update_keeps_old_blob_when_upload_fails(pool: PgPool) -> Result<()> {
    let dir = tempfile::tempdir()?;
    let writer = fs_writer(&pool, dir.path());
    let store = FsBlobStore::new(dir.path());

    let created = writer
        .create(
            draft("Sticky"),
            vec![upload(VideoFileSlot::ThumbFile, "old.jpg", b"old pixels")],
        )
        .await?;
    let old_path = blob_path(created.id, created.thumb_file.as_deref().unwrap());

    // Every put fails from here on.
    let failing = VideoWriter::new(pool.clone(), Arc::new(FailAfter::new(dir.path(), 0)));
    let err = failing
        .update(
            created.id,
            UpdateVideo::default(),
            vec![upload(VideoFileSlot::ThumbFile, "new.jpg", b"new pixels")],
        )
        .await
        .unwrap_err();

    assert!(err.is_storage(), "expected storage error, got {err}");
    // Old blob untouched: never deleted before the replacement exists.
    assert!(store.contains(&old_path).await?);

    // Acknowledged window: the committed row already references the new
    // name, which was never written.
    let videos = PostgresVideosRepository::new(pool.clone());
    let after = videos.get(created.id).await?;
    let new_name = Upload::new("new.jpg", b"new pixels".to_vec())
        .stored_name()
        .into_string();
    assert_eq!(after.thumb_file.as_deref(), Some(new_name.as_str()));
    assert!(!store.contains(&blob_path(created.id, &new_name)).await?);
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn update_with_identical_bytes_keeps_the_blob(pool: PgPool) -> Result<()> {
    let dir = tempfile::tempdir()?;
    let writer = fs_writer(&pool, dir.path());
    let store = FsBlobStore::new(dir.path());

    let created = writer
        .create(
            draft("Stable"),
            vec![upload(VideoFileSlot::ThumbFile, "thumb.jpg", b"same pixels")],
        )
        .await?;
    let path = blob_path(created.id, created.thumb_file.as_deref().unwrap());

    // Identical content derives the identical stored name; the write must
    // not be followed by a self-destructive cleanup.
    let updated = writer
        .update(
            created.id,
            UpdateVideo::default(),
            vec![upload(VideoFileSlot::ThumbFile, "thumb.jpg", b"same pixels")],
        )
        .await?;

    assert_eq!(updated.thumb_file, created.thumb_file);
    assert!(store.contains(&path).await?);
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn create_links_cast_members(pool: PgPool) -> Result<()> {
    let director = seed_cast_member(&pool, "Agnès Varda", CastMemberKind::Director).await;

    let dir = tempfile::tempdir()?;
    let writer = fs_writer(&pool, dir.path());

    let mut video = draft("Vagabond");
    video.cast_members = vec![director.id];
    let created = writer.create(video, vec![]).await?;

    assert_eq!(created.cast_member_ids(), vec![director.id]);
    assert_eq!(created.cast_members[0].kind, CastMemberKind::Director);
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn soft_deleted_category_remains_joinable(pool: PgPool) -> Result<()> {
    use reelbase_core::database::ports::CategoriesRepository;
    use reelbase_core::database::repositories::PostgresCategoriesRepository;

    let c1 = seed_category(&pool, "Retired").await;
    PostgresCategoriesRepository::new(pool.clone())
        .soft_delete(c1.id)
        .await?;

    let dir = tempfile::tempdir()?;
    let writer = fs_writer(&pool, dir.path());

    let mut video = draft("Archival");
    video.categories = vec![c1.id];
    let created = writer.create(video, vec![]).await?;

    // Resolved even though tombstoned.
    assert_eq!(created.category_ids(), vec![c1.id]);
    assert!(created.categories[0].is_deleted());
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn genre_create_rolls_back_on_unknown_category(pool: PgPool) -> Result<()> {
    let genres = PostgresGenresRepository::new(pool.clone());

    let err = genres
        .create(NewGenre {
            name: "Orphan".to_string(),
            is_active: true,
            categories: vec![CategoryId(Uuid::now_v7())],
        })
        .await
        .unwrap_err();

    assert!(err.is_constraint(), "expected constraint error, got {err}");
    assert_eq!(count_rows(&pool, "genres").await, 0);
    assert_eq!(count_rows(&pool, "genre_categories").await, 0);
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn genre_update_replaces_category_set(pool: PgPool) -> Result<()> {
    let c1 = seed_category(&pool, "A").await;
    let c2 = seed_category(&pool, "B").await;
    let genres = PostgresGenresRepository::new(pool.clone());

    let genre = seed_genre(&pool, "Drama", vec![c1.id]).await;
    let updated = genres
        .update(
            genre.id,
            UpdateGenre {
                categories: Some(vec![c2.id]),
                ..UpdateGenre::default()
            },
        )
        .await?;

    assert_eq!(updated.categories, vec![c2.id]);
    let rows = relation_targets(&pool, "genre_categories", "genre_id", genre.id.to_uuid()).await;
    assert_eq!(rows, vec![c2.id.to_uuid()]);
    Ok(())
}

#[sqlx::test(migrator = "reelbase_core::MIGRATOR")]
async fn writer_update_of_missing_video_is_not_found(pool: PgPool) -> Result<()> {
    let dir = tempfile::tempdir()?;
    let writer = fs_writer(&pool, dir.path());

    let err = writer
        .update(
            reelbase_model::VideoId::new(),
            UpdateVideo::default(),
            vec![],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::NotFound { .. }));
    Ok(())
}
