//! Tar-framed copy endpoints.
//!
//! TO_AGENT streams inbound chunks through a bounded pipe into a blocking
//! tar extractor below the destination root. FROM_AGENT walks the source into
//! a tar stream and frames it into outbound chunks, finishing with an EOF
//! chunk and a result frame. Path-traversal defense and the overwrite policy
//! live in `convoy_archive`.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Status, Streaming};
use tracing::{debug, info};

use convoy_archive::{pack, pipe, unpack, ArchiveError};
use convoy_protocol::v1::copy_request;
use convoy_protocol::{CopyDirection, CopyRequest, CopyResponse, CopyResult, CopyStart};

use crate::gate::Permit;

pub(crate) const RESULT_MESSAGE: &str = "copy completed successfully";

/// Depth of the chunk pipe between the RPC task and the blocking tar task.
const PIPE_DEPTH: usize = 16;

type StreamItem = Result<CopyResponse, Status>;

/// Dispatches a copy call after its start frame has been read.
pub(crate) async fn handle(
    start: CopyStart,
    inbound: Streaming<CopyRequest>,
    permit: Permit,
) -> Result<ReceiverStream<StreamItem>, Status> {
    let (tx, rx) = mpsc::channel(PIPE_DEPTH);

    match start.direction() {
        CopyDirection::ToAgent => {
            info!(path = %start.path, overwrite = start.overwrite, "copy to agent");
            tokio::spawn(async move {
                receive_tree(start, inbound, tx).await;
                drop(permit);
            });
        }
        CopyDirection::FromAgent => {
            if start.path.is_empty() {
                return Err(Status::invalid_argument(
                    "source path required for pull operation",
                ));
            }
            if let Err(err) = tokio::fs::metadata(&start.path).await {
                return Err(Status::not_found(format!("source path not found: {err}")));
            }
            info!(path = %start.path, "copy from agent");
            tokio::spawn(async move {
                send_tree(start, tx).await;
                drop(permit);
            });
        }
        CopyDirection::Unspecified => {
            return Err(Status::invalid_argument("invalid copy direction"));
        }
    }

    Ok(ReceiverStream::new(rx))
}

/// TO_AGENT: extract inbound tar chunks below the destination root.
async fn receive_tree(
    start: CopyStart,
    mut inbound: Streaming<CopyRequest>,
    tx: mpsc::Sender<StreamItem>,
) {
    let dest_root = if start.path.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(&start.path)
    };

    if let Err(err) = tokio::fs::create_dir_all(&dest_root).await {
        let _ = tx
            .send(Err(Status::internal(format!(
                "failed to create destination directory: {err}"
            ))))
            .await;
        return;
    }

    let (chunk_tx, chunk_rx) = mpsc::channel::<Vec<u8>>(PIPE_DEPTH);
    let overwrite = start.overwrite;
    let root = dest_root.clone();
    let extractor = tokio::task::spawn_blocking(move || {
        unpack::unpack_stream(pipe::ChunkReader::new(chunk_rx), &root, overwrite)
    });

    let mut recv_error = None;
    loop {
        match inbound.message().await {
            Ok(Some(frame)) => {
                let Some(copy_request::Payload::Chunk(chunk)) = frame.payload else {
                    continue;
                };
                if !chunk.data.is_empty() && chunk_tx.send(chunk.data).await.is_err() {
                    // Extractor stopped early; its error is reported after the
                    // remaining input is drained.
                    break;
                }
                if chunk.eof {
                    break;
                }
            }
            Ok(None) => break,
            Err(status) => {
                recv_error = Some(status);
                break;
            }
        }
    }
    drop(chunk_tx);

    // Drain whatever the client still has in flight before replying.
    if recv_error.is_none() {
        loop {
            match inbound.message().await {
                Ok(Some(frame)) => {
                    if matches!(
                        frame.payload,
                        Some(copy_request::Payload::Chunk(ref chunk)) if chunk.eof
                    ) {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    if let Some(status) = recv_error {
        let _ = tx
            .send(Err(Status::internal(format!("receive error: {status}"))))
            .await;
        return;
    }

    match extractor.await {
        Ok(Ok(stats)) => {
            debug!(
                dest = %dest_root.display(),
                bytes = stats.total_bytes,
                files = stats.file_count,
                "extraction complete"
            );
            let _ = tx
                .send(Ok(CopyResponse::result(CopyResult {
                    success: true,
                    message: RESULT_MESSAGE.to_string(),
                    total_bytes: stats.total_bytes as i64,
                    file_count: stats.file_count as i32,
                })))
                .await;
        }
        Ok(Err(err)) => {
            let _ = tx
                .send(Err(Status::internal(format!("extraction failed: {err}"))))
                .await;
        }
        Err(err) => {
            let _ = tx
                .send(Err(Status::internal(format!("extraction task failed: {err}"))))
                .await;
        }
    }
}

/// FROM_AGENT: stream the source as tar chunks, then an EOF chunk and the
/// result frame.
async fn send_tree(start: CopyStart, tx: mpsc::Sender<StreamItem>) {
    let (chunk_tx, mut chunk_rx) = mpsc::channel::<Vec<u8>>(PIPE_DEPTH);
    let src = PathBuf::from(&start.path);
    let packer = tokio::task::spawn_blocking(move || {
        let mut writer = pipe::ChunkWriter::new(chunk_tx);
        pack::pack_tree(&mut writer, &src)
    });

    while let Some(data) = chunk_rx.recv().await {
        if tx.send(Ok(CopyResponse::chunk(data, false))).await.is_err() {
            // Client went away; dropping the receiver aborts the packer with
            // a broken pipe.
            break;
        }
    }
    drop(chunk_rx);

    match packer.await {
        Ok(Ok(stats)) => {
            if tx
                .send(Ok(CopyResponse::chunk(Vec::new(), true)))
                .await
                .is_err()
            {
                return;
            }
            debug!(
                src = %start.path,
                bytes = stats.total_bytes,
                files = stats.file_count,
                "tar stream complete"
            );
            let _ = tx
                .send(Ok(CopyResponse::result(CopyResult {
                    success: true,
                    message: RESULT_MESSAGE.to_string(),
                    total_bytes: stats.total_bytes as i64,
                    file_count: stats.file_count as i32,
                })))
                .await;
        }
        Ok(Err(ArchiveError::Io(err))) if err.kind() == std::io::ErrorKind::NotFound => {
            let _ = tx
                .send(Err(Status::not_found(format!("source path not found: {err}"))))
                .await;
        }
        Ok(Err(err)) => {
            let _ = tx
                .send(Err(Status::internal(format!("tar creation failed: {err}"))))
                .await;
        }
        Err(err) => {
            let _ = tx
                .send(Err(Status::internal(format!("tar task failed: {err}"))))
                .await;
        }
    }
}
