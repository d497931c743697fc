//! Multipart upload orchestrator
//!
//! Drives the three-phase negotiate -> upload-parts -> finalize protocol.
//! Each phase is a single round-trip that must succeed before the next
//! begins. There is no cross-phase resumability: a failure partway through
//! phase three requires restarting the whole sequence from phase one.

use crate::error::{ClientError, Result, TransportError, UploadPhase};
use crate::transport::ApiTransport;
use crate::upload::chunker::chunk_payload;
use crate::upload::scheduler::upload_chunks;
use crate::upload::types::{ProgressListener, UploadOptions, UploadSession};

/// Upload a payload via the multipart protocol, returning the download URL
pub async fn upload_multipart<T: ApiTransport + ?Sized>(
    transport: &T,
    session: &UploadSession,
    options: &UploadOptions,
    progress: Option<&dyn ProgressListener>,
) -> Result<String> {
    // Phase 1: negotiate an upload identifier, storage key, and part size.
    let init = transport
        .create_multipart_upload(&session.file_suffix, session.size)
        .await
        .map_err(phase_error(UploadPhase::Negotiate))?;

    if init.part_size == 0 {
        return Err(ClientError::InvalidPartSize(init.part_size));
    }

    let part_count = (session.size as usize).div_ceil(init.part_size as usize);
    let part_numbers: Vec<u32> = (1..=part_count as u32).collect();

    tracing::info!(
        upload_id = %init.upload_id,
        key = %init.key,
        part_size = init.part_size,
        parts = part_count,
        file_name = %session.file_name,
        "Multipart upload negotiated"
    );

    // Phase 2: one signed URL per part number.
    let mut presigned = transport
        .presign_part_urls(&init.upload_id, &init.key, &part_numbers)
        .await
        .map_err(phase_error(UploadPhase::Authorize))?;

    if presigned.len() != part_count {
        return Err(ClientError::PartCountMismatch {
            requested: part_count,
            returned: presigned.len(),
        });
    }
    presigned.sort_by_key(|part| part.part_number);

    // Phase 3: chunk, upload in batches, then finalize with the ordered
    // token list.
    let chunks = chunk_payload(&session.data, init.part_size)?;
    let parts = upload_chunks(transport, chunks, &presigned, options.concurrency, progress).await?;

    let download_url = transport
        .complete_multipart_upload(&init.upload_id, &init.key, &parts)
        .await
        .map_err(phase_error(UploadPhase::Finalize))?;

    tracing::info!(
        upload_id = %init.upload_id,
        key = %init.key,
        "Multipart upload finalized"
    );

    Ok(download_url)
}

/// Wrap status responses in a phase-tagged error; pass network-level
/// failures through as transport errors.
fn phase_error(phase: UploadPhase) -> impl FnOnce(TransportError) -> ClientError {
    move |err| match err {
        TransportError::Status { status, body } => ClientError::UploadPhase {
            phase,
            status,
            body,
        },
        other => ClientError::Transport(other),
    }
}
