//! Single-shot uploader
//!
//! For payloads at or below the multipart threshold: one signed target plus
//! a set of opaque form fields, one multipart-form request carrying the
//! fields and the raw payload. The form POST is retried with linear backoff
//! (attempt index times a fixed base delay); this is the only retry in the
//! upload paths, the multipart scheduler has none.

use tokio::time::sleep;

use crate::error::{ClientError, Result, TransportError, UploadPhase};
use crate::transport::ApiTransport;
use crate::upload::types::{ProgressListener, UploadOptions, UploadProgress, UploadSession};

/// Upload a payload in one request, returning the download URL
pub async fn upload_single<T: ApiTransport + ?Sized>(
    transport: &T,
    session: &UploadSession,
    options: &UploadOptions,
    progress: Option<&dyn ProgressListener>,
) -> Result<String> {
    let presign = transport
        .presign_single_upload(&session.file_suffix)
        .await
        .map_err(|err| match err {
            TransportError::Status { status, body } => ClientError::UploadPhase {
                phase: UploadPhase::Negotiate,
                status,
                body,
            },
            other => ClientError::Transport(other),
        })?;

    let attempts = options.retry_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        let result = transport
            .upload_form(
                &presign.upload_url,
                &presign.fields,
                &session.file_name,
                session.content_type(),
                session.data.clone(),
            )
            .await;

        match result {
            Ok(()) => break,
            Err(err) if attempt < attempts => {
                let delay = options.retry_base_delay * attempt;
                tracing::warn!(
                    file_name = %session.file_name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Upload attempt failed, retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(ClientError::Transport(err)),
        }
    }

    if let Some(listener) = progress {
        listener.on_progress(&UploadProgress::Percentage(100));
    }

    tracing::info!(
        file_name = %session.file_name,
        size = session.size,
        attempts = attempt,
        "Single-shot upload completed"
    );

    Ok(presign.download_url)
}
