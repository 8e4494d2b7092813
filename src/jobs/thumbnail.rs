//! Thumbnail generation: one job fans out into one resize per configured
//! width, the widths run as independent concurrent subtasks, and the job
//! joins all of them before settling. A failed width never cancels its
//! siblings, and derivatives that were already written stay in place.

use std::io::Cursor;
use std::time::Duration;

use image::{DynamicImage, ImageFormat};
use uuid::Uuid;

use crate::content_store::ContentStore;
use crate::database::models::Document;

use super::{JobError, WorkerContext};

/// Derivative widths, in pixels. Height scales to keep aspect ratio.
pub const WIDTHS: [u32; 3] = [500, 250, 100];

/// Upper bound on a single resize-and-store subtask.
pub const RESIZE_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn generate(user_id: Uuid, file_id: Uuid, ctx: &WorkerContext) -> Result<(), JobError> {
    // The payload crossed a queue boundary; sanity-check it before touching
    // any store. A nil id is a producer bug, not a transient condition.
    if user_id.is_nil() {
        return Err(JobError::MissingUserId);
    }
    if file_id.is_nil() {
        return Err(JobError::MissingFileId);
    }

    // Ownership is re-checked at consumption time, not trusted from
    // enqueue time; the queue may run long after the upload.
    let document = Document::find_for_owner(file_id, user_id, &ctx.database)
        .await?
        .ok_or(JobError::FileNotFound)?;
    let local_path = document
        .local_path
        .clone()
        .ok_or_else(|| JobError::ContentMissing(document.id.to_string()))?;

    let bytes = ctx.content.read(&local_path).await?;
    let format = image::guess_format(&bytes)?;
    let source = image::load_from_memory(&bytes)?;

    let tasks: Vec<_> = WIDTHS
        .into_iter()
        .map(|width| {
            let source = source.clone();
            let content = ctx.content.clone();
            let local_path = local_path.clone();
            tokio::spawn(async move {
                match tokio::time::timeout(
                    RESIZE_TIMEOUT,
                    resize_and_store(source, format, width, local_path, content),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => Err(JobError::Timeout(RESIZE_TIMEOUT)),
                }
            })
        })
        .collect();

    // Join all widths; the job succeeds only if every one of them did.
    let mut first_error = None;
    for result in futures::future::join_all(tasks).await {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(join_err) => Err(JobError::Panicked(join_err.to_string())),
        };
        if let Err(err) = outcome {
            if first_error.is_none() {
                first_error = Some(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn resize_and_store(
    source: DynamicImage,
    format: ImageFormat,
    width: u32,
    source_path: String,
    content: ContentStore,
) -> Result<(), JobError> {
    let encoded = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, JobError> {
        // Bound only the width; height follows the aspect ratio.
        let resized = source.thumbnail(width, u32::MAX);

        let mut out = Vec::new();
        resized.write_to(&mut Cursor::new(&mut out), format)?;
        Ok(out)
    })
    .await
    .map_err(|err| JobError::Panicked(err.to_string()))??;

    content.write_derivative(&source_path, width, &encoded).await?;
    Ok(())
}
