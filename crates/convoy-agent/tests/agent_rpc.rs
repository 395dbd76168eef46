//! End-to-end tests driving a real agent over gRPC on loopback.

use std::collections::HashMap;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tonic::transport::{Channel, Endpoint, Server};
use tonic::{Code, Streaming};

use convoy_agent::{AgentConfig, AgentServer};
use convoy_protocol::v1::{copy_response, shell_response};
use convoy_protocol::{
    CommandRequest, ConvoyServiceClient, ConvoyServiceServer, CopyDirection, CopyRequest,
    CopyResponse, CopyResult, HealthRequest, HealthStatus, ShellRequest, ShellResponse, ShellStart,
    ShellStream,
};

fn test_config(max_concurrent: usize, exec_timeout: Duration) -> AgentConfig {
    AgentConfig {
        grpc_port: 1,
        shell_path: "/bin/sh".to_string(),
        max_concurrent,
        exec_timeout,
        agent_id: "test-agent".to_string(),
    }
}

async fn start_agent(cfg: AgentConfig) -> ConvoyServiceClient<Channel> {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(
        Server::builder()
            .add_service(ConvoyServiceServer::new(AgentServer::new(cfg)))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );

    let channel = Endpoint::from_shared(format!("http://{addr}"))
        .unwrap()
        .connect()
        .await
        .unwrap();
    ConvoyServiceClient::new(channel)
}

async fn open_shell(
    client: &mut ConvoyServiceClient<Channel>,
    first: ShellRequest,
) -> Result<(mpsc::Sender<ShellRequest>, Streaming<ShellResponse>), tonic::Status> {
    let (tx, rx) = mpsc::channel(16);
    tx.send(first).await.unwrap();
    let response = client.execute_shell(ReceiverStream::new(rx)).await?;
    Ok((tx, response.into_inner()))
}

async fn open_copy(
    client: &mut ConvoyServiceClient<Channel>,
    start: CopyRequest,
) -> Result<(mpsc::Sender<CopyRequest>, Streaming<CopyResponse>), tonic::Status> {
    let (tx, rx) = mpsc::channel(16);
    tx.send(start).await.unwrap();
    let response = client.copy(ReceiverStream::new(rx)).await?;
    Ok((tx, response.into_inner()))
}

async fn read_copy_result(inbound: &mut Streaming<CopyResponse>) -> CopyResult {
    loop {
        match inbound.message().await.unwrap() {
            Some(CopyResponse {
                payload: Some(copy_response::Payload::Result(result)),
            }) => return result,
            Some(_) => continue,
            None => panic!("stream ended without a result frame"),
        }
    }
}

// =============================================================================
// ExecuteCommand
// =============================================================================

#[tokio::test]
async fn execute_command_nonzero_exit_is_data_not_error() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let resp = client
        .execute_command(CommandRequest {
            args: vec!["sh".into(), "-c".into(), "echo hi && false".into()],
            ..Default::default()
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(resp.stdout, "hi\n");
    assert_eq!(resp.stderr, "");
    assert_eq!(resp.exit_code, 1);
    assert!(!resp.error_message.is_empty());
}

#[tokio::test]
async fn execute_command_timeout_returns_deadline_exceeded() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let status = client
        .execute_command(CommandRequest {
            args: vec!["sleep".into(), "10".into()],
            timeout_seconds: 1,
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::DeadlineExceeded);
}

#[tokio::test]
async fn execute_command_empty_args_is_invalid_argument() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let status = client
        .execute_command(CommandRequest::default())
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn execute_command_overlays_environment() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let mut env = HashMap::new();
    env.insert("CONVOY_TEST_VAR".to_string(), "overlay".to_string());
    env.insert(String::new(), "dropped".to_string());

    let resp = client
        .execute_command(CommandRequest {
            args: vec!["sh".into(), "-c".into(), "echo $CONVOY_TEST_VAR".into()],
            env,
            ..Default::default()
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(resp.stdout, "overlay\n");
    assert_eq!(resp.exit_code, 0);
    assert!(resp.error_message.is_empty());
}

#[tokio::test]
async fn execute_command_respects_work_dir() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;
    let dir = tempfile::tempdir().unwrap();

    let resp = client
        .execute_command(CommandRequest {
            args: vec!["pwd".into()],
            work_dir: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(resp.exit_code, 0);
    assert_eq!(resp.stdout.trim(), dir.path().to_string_lossy());
}

#[tokio::test]
async fn execute_command_spawn_failure_is_unknown() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let status = client
        .execute_command(CommandRequest {
            args: vec!["/nonexistent/binary-12345".into()],
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Unknown);
}

// =============================================================================
// CheckHealth
// =============================================================================

#[tokio::test]
async fn check_health_always_healthy() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let resp = client
        .check_health(HealthRequest {})
        .await
        .unwrap()
        .into_inner();

    assert_eq!(resp.status(), HealthStatus::Healthy);
    assert_eq!(resp.message, "ok");
}

// =============================================================================
// ExecuteShell
// =============================================================================

#[tokio::test]
async fn shell_session_echo_roundtrip() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let (tx, mut inbound) = open_shell(
        &mut client,
        ShellRequest::start(ShellStart {
            args: vec!["/bin/sh".into()],
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    tx.send(ShellRequest::input(b"echo hello\n".to_vec()))
        .await
        .unwrap();
    tx.send(ShellRequest::input_eof()).await.unwrap();

    let mut stdout = Vec::new();
    let mut exit = None;
    while let Some(frame) = inbound.message().await.unwrap() {
        assert!(exit.is_none(), "exit frame must be the final message");
        match frame.payload {
            Some(shell_response::Payload::Output(output)) => {
                if output.stream() == ShellStream::Stdout {
                    stdout.extend_from_slice(&output.data);
                }
            }
            Some(shell_response::Payload::Exit(e)) => exit = Some(e),
            None => {}
        }
    }

    assert_eq!(String::from_utf8_lossy(&stdout), "hello\n");
    let exit = exit.expect("missing exit frame");
    assert_eq!(exit.exit_code, 0);
    assert!(exit.message.is_empty());
}

#[tokio::test]
async fn shell_defaults_to_configured_shell_and_separates_stderr() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let (tx, mut inbound) = open_shell(
        &mut client,
        ShellRequest::start(ShellStart::default()),
    )
    .await
    .unwrap();

    tx.send(ShellRequest::input(b"echo out; echo err >&2; exit 3\n".to_vec()))
        .await
        .unwrap();
    tx.send(ShellRequest::input_eof()).await.unwrap();

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut exit = None;
    while let Some(frame) = inbound.message().await.unwrap() {
        match frame.payload {
            Some(shell_response::Payload::Output(output)) => match output.stream() {
                ShellStream::Stdout => stdout.extend_from_slice(&output.data),
                ShellStream::Stderr => stderr.extend_from_slice(&output.data),
            },
            Some(shell_response::Payload::Exit(e)) => exit = Some(e),
            None => {}
        }
    }

    assert_eq!(String::from_utf8_lossy(&stdout), "out\n");
    assert_eq!(String::from_utf8_lossy(&stderr), "err\n");
    let exit = exit.expect("missing exit frame");
    assert_eq!(exit.exit_code, 3);
    assert!(!exit.message.is_empty());
}

#[tokio::test]
async fn shell_rejects_non_start_first_frame() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let status = match open_shell(&mut client, ShellRequest::input(b"ls\n".to_vec())).await {
        Err(status) => status,
        Ok(_) => panic!("expected invalid argument"),
    };

    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn shell_session_times_out_with_agent_deadline() {
    let mut client = start_agent(test_config(4, Duration::from_secs(1))).await;

    let (_tx, mut inbound) = open_shell(
        &mut client,
        ShellRequest::start(ShellStart {
            args: vec!["sleep".into(), "30".into()],
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    let status = loop {
        match inbound.message().await {
            Ok(Some(_)) => continue,
            Ok(None) => panic!("expected deadline error, got clean end of stream"),
            Err(status) => break status,
        }
    };
    assert_eq!(status.code(), Code::DeadlineExceeded);
}

// =============================================================================
// Concurrency gate + cancellation
// =============================================================================

#[tokio::test]
async fn gate_blocks_excess_calls_and_cancellation_releases_permit() {
    let mut client = start_agent(test_config(1, Duration::from_secs(30))).await;

    // Occupy the single permit with a long-running shell.
    let (shell_tx, shell_stream) = open_shell(
        &mut client,
        ShellRequest::start(ShellStart {
            args: vec!["sleep".into(), "30".into()],
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    // A second call must block in acquire.
    let mut blocked_client = client.clone();
    let blocked = tokio::time::timeout(
        Duration::from_millis(300),
        blocked_client.execute_command(CommandRequest {
            args: vec!["true".into()],
            ..Default::default()
        }),
    )
    .await;
    assert!(blocked.is_err(), "second call should block while permit is held");

    // Cancel the shell RPC; the agent must kill the subprocess and release
    // the permit promptly.
    drop(shell_tx);
    drop(shell_stream);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let attempt = tokio::time::timeout(
            Duration::from_millis(300),
            client.execute_command(CommandRequest {
                args: vec!["true".into()],
                ..Default::default()
            }),
        )
        .await;

        match attempt {
            Ok(Ok(resp)) => {
                assert_eq!(resp.into_inner().exit_code, 0);
                break;
            }
            _ if tokio::time::Instant::now() < deadline => continue,
            other => panic!("permit was not released after cancellation: {other:?}"),
        }
    }
}

// =============================================================================
// Copy
// =============================================================================

fn tar_with_dir_and_file() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    let mut header = tar::Header::new_gnu();
    header.set_path("dir/").unwrap();
    header.set_entry_type(tar::EntryType::Directory);
    header.set_size(0);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append(&header, std::io::empty()).unwrap();

    let mut header = tar::Header::new_gnu();
    header.set_path("dir/file.txt").unwrap();
    header.set_size(1);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append(&header, &b"X"[..]).unwrap();

    builder.into_inner().unwrap()
}

fn tar_with_traversal_entry() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    let name = b"../etc/passwd";
    header.as_gnu_mut().unwrap().name[..name.len()].copy_from_slice(name);
    header.set_size(4);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append(&header, &b"evil"[..]).unwrap();
    builder.into_inner().unwrap()
}

async fn push_tar(
    client: &mut ConvoyServiceClient<Channel>,
    tar_data: Vec<u8>,
    dest: &str,
    overwrite: bool,
) -> Result<CopyResult, tonic::Status> {
    let (tx, mut inbound) = open_copy(
        client,
        CopyRequest::start(CopyDirection::ToAgent, dest, overwrite),
    )
    .await?;

    for chunk in tar_data.chunks(32 * 1024) {
        tx.send(CopyRequest::chunk(chunk.to_vec(), false))
            .await
            .unwrap();
    }
    tx.send(CopyRequest::chunk(Vec::new(), true)).await.unwrap();
    drop(tx);

    loop {
        match inbound.message().await? {
            Some(CopyResponse {
                payload: Some(copy_response::Payload::Result(result)),
            }) => return Ok(result),
            Some(_) => continue,
            None => panic!("stream ended without a result frame"),
        }
    }
}

async fn pull_tar(
    client: &mut ConvoyServiceClient<Channel>,
    src: &str,
) -> Result<(Vec<u8>, CopyResult), tonic::Status> {
    let (_tx, mut inbound) = open_copy(
        client,
        CopyRequest::start(CopyDirection::FromAgent, src, false),
    )
    .await?;

    let mut data = Vec::new();
    loop {
        match inbound.message().await? {
            Some(CopyResponse {
                payload: Some(copy_response::Payload::Chunk(chunk)),
            }) => {
                data.extend_from_slice(&chunk.data);
                if chunk.eof {
                    break;
                }
            }
            Some(_) => continue,
            None => panic!("stream ended before the eof chunk"),
        }
    }

    let result = read_copy_result(&mut inbound).await;
    Ok((data, result))
}

#[tokio::test]
async fn copy_to_agent_extracts_and_counts() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;
    let dest = tempfile::tempdir().unwrap();

    let result = push_tar(
        &mut client,
        tar_with_dir_and_file(),
        &dest.path().to_string_lossy(),
        false,
    )
    .await
    .unwrap();

    assert!(result.success);
    assert_eq!(result.message, "copy completed successfully");
    assert_eq!(result.total_bytes, 1);
    assert_eq!(result.file_count, 2);
    assert_eq!(
        std::fs::read(dest.path().join("dir/file.txt")).unwrap(),
        b"X"
    );
}

#[tokio::test]
async fn copy_to_agent_rejects_path_traversal() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;
    let dest = tempfile::tempdir().unwrap();

    let status = push_tar(
        &mut client,
        tar_with_traversal_entry(),
        &dest.path().to_string_lossy(),
        false,
    )
    .await
    .unwrap_err();

    assert_eq!(status.code(), Code::Internal);
    assert_eq!(
        std::fs::read_dir(dest.path()).unwrap().count(),
        0,
        "destination root must stay untouched"
    );
}

#[tokio::test]
async fn copy_from_agent_streams_single_file() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;
    let src_dir = tempfile::tempdir().unwrap();
    let src = src_dir.path().join("hostname");
    std::fs::write(&src, b"agent-7\n").unwrap();

    let (data, result) = pull_tar(&mut client, &src.to_string_lossy()).await.unwrap();

    assert!(result.success);
    assert_eq!(result.file_count, 1);
    assert_eq!(result.total_bytes, 8);

    let mut archive = tar::Archive::new(data.as_slice());
    let mut entries = archive.entries().unwrap();
    let mut entry = entries.next().unwrap().unwrap();
    assert_eq!(&*entry.path().unwrap(), std::path::Path::new("hostname"));
    let mut content = Vec::new();
    std::io::Read::read_to_end(&mut entry, &mut content).unwrap();
    assert_eq!(content, b"agent-7\n");
}

#[tokio::test]
async fn copy_from_agent_missing_source_is_not_found() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let status = pull_tar(&mut client, "/nonexistent/path-12345")
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn copy_from_agent_empty_source_is_invalid_argument() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let status = pull_tar(&mut client, "").await.unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn copy_invalid_direction_is_invalid_argument() {
    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let status = match open_copy(
        &mut client,
        CopyRequest::start(CopyDirection::Unspecified, "/tmp", false),
    )
    .await
    {
        Err(status) => status,
        Ok(_) => panic!("expected invalid argument"),
    };

    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn copy_roundtrip_preserves_tree() {
    use std::os::unix::fs::PermissionsExt;

    let mut client = start_agent(test_config(4, Duration::from_secs(30))).await;

    let src_dir = tempfile::tempdir().unwrap();
    let tree = src_dir.path().join("tree");
    std::fs::create_dir_all(tree.join("sub")).unwrap();
    std::fs::write(tree.join("sub/data.txt"), b"payload").unwrap();
    std::fs::write(tree.join("run.sh"), b"#!/bin/sh\n").unwrap();
    std::fs::set_permissions(tree.join("run.sh"), std::fs::Permissions::from_mode(0o755)).unwrap();
    std::os::unix::fs::symlink("sub/data.txt", tree.join("link")).unwrap();

    let (data, pull_result) = pull_tar(&mut client, &tree.to_string_lossy()).await.unwrap();
    assert!(pull_result.success);

    let dest = tempfile::tempdir().unwrap();
    let push_result = push_tar(&mut client, data, &dest.path().to_string_lossy(), true)
        .await
        .unwrap();

    assert!(push_result.success);
    assert_eq!(push_result.file_count, pull_result.file_count);
    assert_eq!(push_result.total_bytes, pull_result.total_bytes);

    assert_eq!(
        std::fs::read(dest.path().join("sub/data.txt")).unwrap(),
        b"payload"
    );
    assert_eq!(
        std::fs::read_link(dest.path().join("link")).unwrap(),
        std::path::PathBuf::from("sub/data.txt")
    );
    let mode = std::fs::metadata(dest.path().join("run.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);
}
