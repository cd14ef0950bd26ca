//! Stage task entry points
//!
//! Each task checks the previous stage's artifact, does its work, writes its
//! own artifact and checks that too. Any failed check aborts the task with an
//! error so the invoking scheduler sees the stage as failed.

use crate::crawler::run_extraction;
use crate::pipeline::artifact::check_file_content;
use crate::pipeline::PipelineContext;
use crate::record::{read_record_set, write_record_set};
use crate::storage::{ObjectStore, CSV_CONTENT_TYPE};
use crate::transform::transform_records;
use crate::EtlError;
use std::sync::Arc;
use tracing::info;

/// Crawls the catalog and writes the extracted records as JSON
///
/// # Returns
///
/// * `Ok(())` - The extract artifact was written and is non-empty
/// * `Err(EtlError::NoLinks)` / `Err(EtlError::NoRecords)` - The crawl came back empty
/// * `Err(EtlError)` - Writing or checking the artifact failed
pub async fn extract(ctx: &PipelineContext) -> Result<(), EtlError> {
    let output = &ctx.config().artifacts.extracted_path;
    info!("Extract stage starting");

    let report = run_extraction(Arc::clone(ctx.shared_config())).await?;

    write_record_set(output, &report.records)?;
    let size = check_file_content(output)?;

    info!(
        "Extract stage finished: {} records written to {} ({} bytes)",
        report.records.len(),
        output.display(),
        size
    );
    Ok(())
}

/// Normalizes the extracted records and writes the CSV table
pub async fn transform(ctx: &PipelineContext) -> Result<(), EtlError> {
    let artifacts = &ctx.config().artifacts;
    info!("Transform stage starting");

    check_file_content(&artifacts.extracted_path)?;
    let records = read_record_set(&artifacts.extracted_path)?;
    info!(
        "Loaded {} records from {}",
        records.len(),
        artifacts.extracted_path.display()
    );

    let csv = transform_records(&records)?;

    if let Some(parent) = artifacts.transformed_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(&artifacts.transformed_path, &csv).await?;
    let size = check_file_content(&artifacts.transformed_path)?;

    info!(
        "Transform stage finished: {} rows written to {} ({} bytes)",
        records.len(),
        artifacts.transformed_path.display(),
        size
    );
    Ok(())
}

/// Uploads the CSV table and verifies the stored object
///
/// # Arguments
///
/// * `ctx` - Pipeline context
/// * `store` - Destination object store; its bucket is the upload target
///
/// # Returns
///
/// * `Ok(())` - The object exists with a nonzero size
/// * `Err(EtlError::UploadNotFound)` - The object is missing after upload
/// * `Err(EtlError::UploadEmpty)` - The object exists but is empty
pub async fn load<S>(ctx: &PipelineContext, store: &S) -> Result<(), EtlError>
where
    S: ObjectStore + ?Sized,
{
    let input = &ctx.config().artifacts.transformed_path;
    let key = ctx.config().storage.key.as_str();
    info!("Load stage starting");

    let size = check_file_content(input)?;

    info!(
        "Uploading {} ({} bytes) to s3://{}/{}",
        input.display(),
        size,
        store.bucket(),
        key
    );
    store.upload_file(key, input, CSV_CONTENT_TYPE).await?;

    let Some(object) = store.head(key).await? else {
        return Err(EtlError::UploadNotFound {
            bucket: store.bucket().to_string(),
            key: key.to_string(),
        });
    };

    if object.size == 0 {
        return Err(EtlError::UploadEmpty {
            bucket: store.bucket().to_string(),
            key: key.to_string(),
        });
    }

    info!(
        "Load stage finished: s3://{}/{} holds {} bytes",
        store.bucket(),
        key,
        object.size
    );
    Ok(())
}

/// Runs extract, transform and load in order, stopping at the first failure
pub async fn run_all<S>(ctx: &PipelineContext, store: &S) -> Result<(), EtlError>
where
    S: ObjectStore + ?Sized,
{
    extract(ctx).await?;
    transform(ctx).await?;
    load(ctx, store).await
}
