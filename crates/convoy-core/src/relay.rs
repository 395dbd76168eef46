//! Client-side copy relay.
//!
//! Copy endpoints use the `container:path` grammar; anything starting with
//! `/`, `.`, or `~` is a local path. Three dispatch shapes exist:
//! host to containers (streamed tar push per destination), container to host
//! (streamed pull + local extract), and container to many (the archive is
//! pulled into memory once, then extracted locally or replayed per
//! destination).
//!
//! Per-destination failures are reported to stderr and folded into one
//! composite error after every destination has been attempted; a failure to
//! pull from the source aborts the whole operation before any push.

use std::io::Cursor;
use std::path::PathBuf;

use tokio::sync::mpsc;
use tonic::Streaming;
use tracing::info;

use convoy_archive::{pack, pipe, unpack, CHUNK_SIZE};
use convoy_protocol::v1::copy_response;
use convoy_protocol::{CopyDirection, CopyRequest, CopyResponse, CopyResult};

use crate::container::ContainerRecord;
use crate::error::{CoreError, Result};
use crate::rpc::RpcPool;

/// Depth of the chunk pipe between the stream task and blocking tar work.
const PIPE_DEPTH: usize = 16;

/// A source or destination of a copy operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyEndpoint {
    /// A path on the machine running the client.
    Local { path: String },
    /// A path inside a container, addressed by name or id.
    Container { container: String, path: String },
}

impl CopyEndpoint {
    /// Parses `container:path` versus local-path endpoint notation.
    ///
    /// Paths starting with `/`, `.`, or `~` are always local. Otherwise a
    /// colon past the first character splits container from path, with the
    /// path defaulting to `/` when empty.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(CoreError::InvalidInput("empty endpoint".into()));
        }

        if !s.starts_with('/') && !s.starts_with('.') && !s.starts_with('~') {
            if let Some(idx) = s.find(':') {
                if idx > 0 {
                    let container = s[..idx].to_string();
                    let mut path = s[idx + 1..].to_string();
                    if path.is_empty() {
                        path = "/".to_string();
                    }
                    return Ok(Self::Container { container, path });
                }
            }
        }

        Ok(Self::Local {
            path: s.to_string(),
        })
    }

    /// True for the container side of the grammar.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container { .. })
    }
}

/// Copies from `source` to every destination, relaying through this client.
///
/// # Errors
///
/// Fails fast on invalid endpoint combinations and on source-side failures;
/// per-destination failures are aggregated into [`CoreError::CopyFailed`].
pub async fn copy(
    pool: &RpcPool,
    containers: &[ContainerRecord],
    source: &CopyEndpoint,
    destinations: &[CopyEndpoint],
    overwrite: bool,
) -> Result<()> {
    let has_container =
        source.is_container() || destinations.iter().any(CopyEndpoint::is_container);
    if !has_container {
        return Err(CoreError::InvalidInput(
            "at least one endpoint must be a container".into(),
        ));
    }

    let host_destinations = destinations.iter().filter(|d| !d.is_container()).count();
    if host_destinations > 1 {
        return Err(CoreError::InvalidInput(
            "only one host destination allowed per invocation".into(),
        ));
    }

    match source {
        CopyEndpoint::Local { path } => {
            host_to_containers(pool, containers, path, destinations, overwrite).await
        }
        CopyEndpoint::Container { container, path } => {
            if let [CopyEndpoint::Local { path: dest_path }] = destinations {
                container_to_host(pool, containers, container, path, dest_path, overwrite).await
            } else {
                container_to_many(pool, containers, container, path, destinations, overwrite).await
            }
        }
    }
}

/// Finds a container by name first, then by id.
pub fn resolve<'a>(containers: &'a [ContainerRecord], reference: &str) -> Option<&'a ContainerRecord> {
    containers
        .iter()
        .find(|c| !c.name.is_empty() && c.name == reference)
        .or_else(|| containers.iter().find(|c| c.id == reference))
}

fn resolve_with_endpoint<'a>(
    containers: &'a [ContainerRecord],
    reference: &str,
) -> Result<&'a ContainerRecord> {
    let record =
        resolve(containers, reference).ok_or_else(|| CoreError::ContainerNotFound(reference.to_string()))?;
    if record.endpoint.is_empty() {
        return Err(CoreError::NoEndpoint(reference.to_string()));
    }
    Ok(record)
}

async fn host_to_containers(
    pool: &RpcPool,
    containers: &[ContainerRecord],
    src_path: &str,
    destinations: &[CopyEndpoint],
    overwrite: bool,
) -> Result<()> {
    tokio::fs::metadata(src_path)
        .await
        .map_err(|err| CoreError::InvalidInput(format!("source not found: {err}")))?;

    let mut failed = false;
    for dest in destinations {
        let CopyEndpoint::Container { container, path } = dest else {
            continue;
        };

        let record = match resolve_with_endpoint(containers, container) {
            Ok(record) => record,
            Err(err) => {
                eprintln!("{err}");
                failed = true;
                continue;
            }
        };

        info!(src = %src_path, container = %container, dest = %path, "copying to container");
        if let Err(err) = push_tree(pool, &record.endpoint, src_path, path, overwrite).await {
            eprintln!("failed to copy to {container}: {err}");
            failed = true;
        }
    }

    if failed {
        Err(CoreError::CopyFailed)
    } else {
        Ok(())
    }
}

async fn container_to_host(
    pool: &RpcPool,
    containers: &[ContainerRecord],
    container: &str,
    src_path: &str,
    dest_path: &str,
    overwrite: bool,
) -> Result<()> {
    let record = resolve_with_endpoint(containers, container)?;

    info!(container = %container, src = %src_path, dest = %dest_path, "copying from container");
    pull_to_dir(pool, &record.endpoint, src_path, dest_path, overwrite).await
}

async fn container_to_many(
    pool: &RpcPool,
    containers: &[ContainerRecord],
    source_container: &str,
    src_path: &str,
    destinations: &[CopyEndpoint],
    overwrite: bool,
) -> Result<()> {
    let record = resolve_with_endpoint(containers, source_container)?;

    info!(container = %source_container, src = %src_path, "pulling archive for relay");
    let tar_data = pull_archive(pool, &record.endpoint, src_path).await?;
    info!(bytes = tar_data.len(), "pulled archive from source container");

    let mut failed = false;
    for dest in destinations {
        match dest {
            CopyEndpoint::Local { path } => {
                info!(dest = %path, "extracting archive to local path");
                if let Err(err) = extract_archive_local(&tar_data, path, overwrite).await {
                    eprintln!("failed to extract to {path}: {err}");
                    failed = true;
                }
            }
            CopyEndpoint::Container { container, path } => {
                let dest_record = match resolve_with_endpoint(containers, container) {
                    Ok(record) => record,
                    Err(err) => {
                        eprintln!("{err}");
                        failed = true;
                        continue;
                    }
                };

                info!(container = %container, dest = %path, "pushing archive to container");
                if let Err(err) =
                    push_archive(pool, &dest_record.endpoint, &tar_data, path, overwrite).await
                {
                    eprintln!("failed to push to {container}: {err}");
                    failed = true;
                }
            }
        }
    }

    if failed {
        Err(CoreError::CopyFailed)
    } else {
        Ok(())
    }
}

/// Streams a local file or directory as tar chunks into a TO_AGENT copy.
pub async fn push_tree(
    pool: &RpcPool,
    endpoint: &str,
    src_path: &str,
    dest_path: &str,
    overwrite: bool,
) -> Result<CopyResult> {
    let (tx, mut inbound) = pool.copy(endpoint).await?;
    if tx
        .send(CopyRequest::start(
            CopyDirection::ToAgent,
            dest_path,
            overwrite,
        ))
        .await
        .is_err()
    {
        // The server closed the stream already; surface its status.
        return wait_for_result(&mut inbound).await.and_then(|_| {
            Err(CoreError::CopyProtocol(
                "stream closed before start frame".into(),
            ))
        });
    }

    let (chunk_tx, mut chunk_rx) = mpsc::channel::<Vec<u8>>(PIPE_DEPTH);
    let src = PathBuf::from(src_path);
    let packer = tokio::task::spawn_blocking(move || {
        let mut writer = pipe::ChunkWriter::new(chunk_tx);
        pack::pack_tree(&mut writer, &src)
    });

    let mut send_failed = false;
    while let Some(data) = chunk_rx.recv().await {
        if tx.send(CopyRequest::chunk(data, false)).await.is_err() {
            // Server side closed early; surface its status below.
            send_failed = true;
            break;
        }
    }
    drop(chunk_rx);

    let packer_result = packer.await;
    if send_failed {
        return wait_for_result(&mut inbound).await.and_then(|_| {
            Err(CoreError::CopyProtocol("copy stream closed early".into()))
        });
    }

    match packer_result {
        Ok(Ok(_)) => {}
        Ok(Err(err)) => return Err(err.into()),
        Err(err) => return Err(CoreError::Runtime(format!("tar task failed: {err}"))),
    }

    let _ = tx.send(CopyRequest::chunk(Vec::new(), true)).await;
    drop(tx);

    wait_for_result(&mut inbound).await
}

/// Pulls a container path through a FROM_AGENT copy and extracts it below a
/// local directory, with the same traversal defense the agent applies.
pub async fn pull_to_dir(
    pool: &RpcPool,
    endpoint: &str,
    src_path: &str,
    dest_dir: &str,
    overwrite: bool,
) -> Result<()> {
    let (tx, mut inbound) = pool.copy(endpoint).await?;
    let _ = tx
        .send(CopyRequest::start(
            CopyDirection::FromAgent,
            src_path,
            overwrite,
        ))
        .await;
    drop(tx);

    tokio::fs::create_dir_all(dest_dir).await?;

    let (chunk_tx, chunk_rx) = mpsc::channel::<Vec<u8>>(PIPE_DEPTH);
    let dest = PathBuf::from(dest_dir);
    let extractor = tokio::task::spawn_blocking(move || {
        unpack::unpack_stream(pipe::ChunkReader::new(chunk_rx), &dest, overwrite)
    });

    let mut stream_result = Ok(());
    loop {
        match inbound.message().await {
            Ok(Some(CopyResponse { payload })) => match payload {
                Some(copy_response::Payload::Chunk(chunk)) => {
                    if !chunk.data.is_empty() && chunk_tx.send(chunk.data).await.is_err() {
                        break;
                    }
                    if chunk.eof {
                        break;
                    }
                }
                Some(copy_response::Payload::Result(result)) if !result.success => {
                    stream_result = Err(CoreError::CopyProtocol(format!(
                        "copy failed: {}",
                        result.message
                    )));
                    break;
                }
                _ => {}
            },
            Ok(None) => break,
            Err(status) => {
                stream_result = Err(status.into());
                break;
            }
        }
    }
    drop(chunk_tx);

    let extract_result = extractor
        .await
        .map_err(|err| CoreError::Runtime(format!("extract task failed: {err}")))?;

    stream_result?;
    extract_result?;
    Ok(())
}

/// Pulls a container path through a FROM_AGENT copy as raw tar bytes.
pub async fn pull_archive(pool: &RpcPool, endpoint: &str, src_path: &str) -> Result<Vec<u8>> {
    let (tx, mut inbound) = pool.copy(endpoint).await?;
    let _ = tx
        .send(CopyRequest::start(CopyDirection::FromAgent, src_path, false))
        .await;
    drop(tx);

    let mut tar_data = Vec::new();
    loop {
        match inbound.message().await? {
            Some(CopyResponse { payload }) => match payload {
                Some(copy_response::Payload::Chunk(chunk)) => {
                    tar_data.extend_from_slice(&chunk.data);
                    if chunk.eof {
                        break;
                    }
                }
                Some(copy_response::Payload::Result(result)) if !result.success => {
                    return Err(CoreError::CopyProtocol(format!(
                        "copy failed: {}",
                        result.message
                    )));
                }
                _ => {}
            },
            None => break,
        }
    }

    Ok(tar_data)
}

/// Replays pre-built tar bytes into a TO_AGENT copy in 32 KiB chunks.
pub async fn push_archive(
    pool: &RpcPool,
    endpoint: &str,
    tar_data: &[u8],
    dest_path: &str,
    overwrite: bool,
) -> Result<CopyResult> {
    let (tx, mut inbound) = pool.copy(endpoint).await?;
    let _ = tx
        .send(CopyRequest::start(
            CopyDirection::ToAgent,
            dest_path,
            overwrite,
        ))
        .await;

    for chunk in tar_data.chunks(CHUNK_SIZE) {
        if tx.send(CopyRequest::chunk(chunk.to_vec(), false)).await.is_err() {
            break;
        }
    }
    let _ = tx.send(CopyRequest::chunk(Vec::new(), true)).await;
    drop(tx);

    wait_for_result(&mut inbound).await
}

/// Extracts in-memory tar bytes below a local directory.
pub async fn extract_archive_local(tar_data: &[u8], dest_path: &str, overwrite: bool) -> Result<()> {
    tokio::fs::create_dir_all(dest_path).await?;

    let data = tar_data.to_vec();
    let dest = PathBuf::from(dest_path);
    let stats = tokio::task::spawn_blocking(move || {
        unpack::unpack_stream(Cursor::new(data), &dest, overwrite)
    })
    .await
    .map_err(|err| CoreError::Runtime(format!("extract task failed: {err}")))??;

    info!(bytes = stats.total_bytes, files = stats.file_count, "extracted archive locally");
    Ok(())
}

/// Reads frames until the terminal result arrives.
async fn wait_for_result(inbound: &mut Streaming<CopyResponse>) -> Result<CopyResult> {
    loop {
        match inbound.message().await? {
            Some(CopyResponse {
                payload: Some(copy_response::Payload::Result(result)),
            }) => {
                if !result.success {
                    return Err(CoreError::CopyProtocol(format!(
                        "copy failed: {}",
                        result.message
                    )));
                }
                return Ok(result);
            }
            Some(_) => continue,
            None => {
                return Err(CoreError::CopyProtocol(
                    "stream ended without a result".into(),
                ))
            }
        }
    }
}
