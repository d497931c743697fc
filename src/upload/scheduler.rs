//! Concurrent part upload scheduler
//!
//! Uploads chunks against their signed URLs in sequential batches of at
//! most the concurrency limit. All parts of a batch are in flight at once;
//! the next batch starts only after the previous one has fully settled.
//! There is no sliding window and no per-part retry: any part failure
//! aborts the whole operation.

use futures::future::try_join_all;

use crate::error::{ClientError, Result};
use crate::transport::{ApiTransport, CompletedPart, PresignedPart};
use crate::upload::chunker::Chunk;
use crate::upload::types::{ProgressListener, UploadProgress};

/// Upload all chunks, returning integrity tokens sorted by part number
///
/// `urls` must hold one signed URL per chunk, keyed by part number. A
/// cumulative progress update is emitted after each fully successful batch.
pub async fn upload_chunks<T: ApiTransport + ?Sized>(
    transport: &T,
    chunks: Vec<Chunk>,
    urls: &[PresignedPart],
    concurrency: usize,
    progress: Option<&dyn ProgressListener>,
) -> Result<Vec<CompletedPart>> {
    let total_chunks = chunks.len();
    let total_bytes: u64 = chunks.iter().map(|c| c.size as u64).sum();
    let concurrency = concurrency.max(1);

    let mut paired = Vec::with_capacity(total_chunks);
    for chunk in chunks {
        let url = urls
            .iter()
            .find(|p| p.part_number == chunk.index)
            .ok_or(ClientError::PartCountMismatch {
                requested: total_chunks,
                returned: urls.len(),
            })?;
        paired.push((chunk, url.upload_url.clone()));
    }

    let mut completed: Vec<CompletedPart> = Vec::with_capacity(total_chunks);
    let mut uploaded_bytes = 0u64;
    let mut pending = paired.into_iter();

    loop {
        let batch: Vec<(Chunk, String)> = pending.by_ref().take(concurrency).collect();
        if batch.is_empty() {
            break;
        }

        let batch_bytes: u64 = batch.iter().map(|(c, _)| c.size as u64).sum();

        let uploads = batch.into_iter().map(|(chunk, url)| async move {
            let part_number = chunk.index;
            let token = transport.upload_part(&url, chunk.data).await?;
            // A success response without an integrity token cannot be
            // finalized, so it is a failure in its own right.
            token
                .map(|etag| CompletedPart { part_number, etag })
                .ok_or(ClientError::MissingIntegrityToken { part_number })
        });

        let batch_parts = try_join_all(uploads).await?;
        completed.extend(batch_parts);
        uploaded_bytes += batch_bytes;

        tracing::debug!(
            uploaded_chunks = completed.len(),
            total_chunks,
            uploaded_bytes,
            total_bytes,
            "Part batch uploaded"
        );

        if let Some(listener) = progress {
            listener.on_progress(&UploadProgress::Chunked {
                uploaded_bytes,
                total_bytes,
                percentage: percentage_of(uploaded_bytes, total_bytes),
                uploaded_chunks: completed.len(),
                total_chunks,
            });
        }
    }

    // The finalize call requires strictly ascending part numbers, no matter
    // in which order the in-flight requests of a batch completed.
    completed.sort_by_key(|part| part.part_number);
    Ok(completed)
}

fn percentage_of(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::transport::testing::MockTransport;
    use crate::upload::chunker::chunk_payload;

    fn presigned_for(chunks: &[Chunk]) -> Vec<PresignedPart> {
        chunks
            .iter()
            .map(|c| PresignedPart {
                part_number: c.index,
                upload_url: MockTransport::part_url(c.index),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_tokens_sorted_despite_completion_order() {
        let transport = MockTransport::new();
        let data = vec![9u8; 70];
        let chunks = chunk_payload(&data, 10).unwrap();
        let urls = presigned_for(&chunks);

        let parts = upload_chunks(&transport, chunks, &urls, 3, None)
            .await
            .unwrap();

        let numbers: Vec<u32> = parts.iter().map(|p| p.part_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(parts[2].etag, "\"etag-3\"");

        // The mock delays earlier parts longer, so at least one batch
        // completed out of order.
        let order = transport.uploaded_parts.lock().unwrap();
        let completion: Vec<u32> = order.iter().map(|(n, _)| *n).collect();
        assert_ne!(completion, numbers);
    }

    #[tokio::test]
    async fn test_concurrency_bound_and_batch_count() {
        let transport = MockTransport::new();
        let data = vec![1u8; 100];
        let chunks = chunk_payload(&data, 10).unwrap();
        let urls = presigned_for(&chunks);

        upload_chunks(&transport, chunks, &urls, 4, None)
            .await
            .unwrap();

        // 10 chunks at concurrency 4: never more than 4 in flight.
        assert!(transport.max_in_flight.load(Ordering::SeqCst) <= 4);
        assert_eq!(transport.uploaded_parts.lock().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_batches_are_sequential() {
        let transport = MockTransport::new();
        let data = vec![1u8; 60];
        let chunks = chunk_payload(&data, 10).unwrap();
        let urls = presigned_for(&chunks);

        upload_chunks(&transport, chunks, &urls, 2, None)
            .await
            .unwrap();

        // With a strict batch barrier, every part of batch N completes
        // before any part of batch N+1 starts.
        let order = transport.uploaded_parts.lock().unwrap();
        for (position, (part_number, _)) in order.iter().enumerate() {
            let batch = (part_number - 1) / 2;
            assert_eq!(position as u32 / 2, batch);
        }
    }

    #[tokio::test]
    async fn test_progress_emitted_per_batch() {
        let transport = MockTransport::new();
        let data = vec![1u8; 50];
        let chunks = chunk_payload(&data, 10).unwrap();
        let urls = presigned_for(&chunks);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener = move |p: &UploadProgress| sink.lock().unwrap().push(p.clone());

        upload_chunks(&transport, chunks, &urls, 2, Some(&listener))
            .await
            .unwrap();

        let updates = seen.lock().unwrap();
        // 5 chunks at concurrency 2: three batches, three updates.
        assert_eq!(updates.len(), 3);
        match &updates[0] {
            UploadProgress::Chunked {
                uploaded_bytes,
                total_bytes,
                percentage,
                uploaded_chunks,
                total_chunks,
            } => {
                assert_eq!(*uploaded_bytes, 20);
                assert_eq!(*total_bytes, 50);
                assert_eq!(*percentage, 40);
                assert_eq!(*uploaded_chunks, 2);
                assert_eq!(*total_chunks, 5);
            }
            other => panic!("expected chunked progress, got {other:?}"),
        }
        match &updates[2] {
            UploadProgress::Chunked { percentage, .. } => assert_eq!(*percentage, 100),
            other => panic!("expected chunked progress, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_single_part_failure_aborts() {
        let transport = MockTransport::new();
        transport.failing_parts.lock().unwrap().push(4);
        let data = vec![1u8; 60];
        let chunks = chunk_payload(&data, 10).unwrap();
        let urls = presigned_for(&chunks);

        let err = upload_chunks(&transport, chunks, &urls, 2, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));

        // Parts after the failing batch were never attempted.
        let order = transport.uploaded_parts.lock().unwrap();
        assert!(order.iter().all(|(n, _)| *n <= 4));
    }

    #[tokio::test]
    async fn test_missing_integrity_token_is_failure() {
        let transport = MockTransport::new();
        transport.tokenless_parts.lock().unwrap().push(2);
        let data = vec![1u8; 30];
        let chunks = chunk_payload(&data, 10).unwrap();
        let urls = presigned_for(&chunks);

        let err = upload_chunks(&transport, chunks, &urls, 3, None)
            .await
            .unwrap_err();
        match err {
            ClientError::MissingIntegrityToken { part_number } => assert_eq!(part_number, 2),
            other => panic!("expected missing token, got {other:?}"),
        }
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage_of(1, 3), 33);
        assert_eq!(percentage_of(2, 3), 67);
        assert_eq!(percentage_of(0, 10), 0);
        assert_eq!(percentage_of(10, 10), 100);
    }
}
