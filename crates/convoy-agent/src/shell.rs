//! Bidirectional shell session streaming.
//!
//! A session multiplexes a subprocess's three stdio pipes over the RPC
//! stream: two reader tasks pump stdout/stderr into a bounded output queue,
//! one input task feeds inbound frames to stdin, and the session driver
//! forwards queued output to the client while watching for pipe errors, input
//! errors, and the exec deadline. Once both readers hit EOF and the input
//! side is done, the subprocess is reaped and a final `Exit` frame closes the
//! stream.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Status, Streaming};
use tracing::{debug, info};

use convoy_protocol::v1::shell_request;
use convoy_protocol::{ShellRequest, ShellResponse, ShellStart, ShellStream};

use crate::config::AgentConfig;
use crate::gate::Permit;

/// Read size for the stdout/stderr pumps.
const READ_BUFFER_SIZE: usize = 32 * 1024;

/// Output queue depth: small enough that a slow client backpressures the
/// subprocess through blocked sends, large enough to absorb bursts.
const OUTPUT_QUEUE_CAPACITY: usize = 16;

type StreamItem = Result<ShellResponse, Status>;

/// Spawns the shell subprocess and the session driver, returning the
/// response stream.
pub(crate) fn handle(
    cfg: &AgentConfig,
    start: ShellStart,
    inbound: Streaming<ShellRequest>,
    permit: Permit,
) -> Result<ReceiverStream<StreamItem>, Status> {
    let mut args = start.args;
    if args.is_empty() {
        args = vec![cfg.shell_path.clone()];
    }

    info!(args = ?args, "starting shell session");

    let mut cmd = Command::new(&args[0]);
    cmd.args(&args[1..]);
    if !start.work_dir.is_empty() {
        cmd.current_dir(&start.work_dir);
    }
    for (key, value) in &start.env {
        if key.is_empty() {
            continue;
        }
        cmd.env(key, value);
    }
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|err| Status::internal(format!("start shell: {err}")))?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| Status::internal("stdin pipe unavailable"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Status::internal("stdout pipe unavailable"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Status::internal("stderr pipe unavailable"))?;

    let (tx, rx) = mpsc::channel(OUTPUT_QUEUE_CAPACITY);
    let deadline = cfg.exec_timeout;
    tokio::spawn(async move {
        run_session(child, stdin, stdout, stderr, inbound, tx, deadline).await;
        drop(permit);
    });

    Ok(ReceiverStream::new(rx))
}

async fn run_session(
    mut child: Child,
    stdin: ChildStdin,
    stdout: impl AsyncRead + Unpin + Send + 'static,
    stderr: impl AsyncRead + Unpin + Send + 'static,
    inbound: Streaming<ShellRequest>,
    tx: mpsc::Sender<StreamItem>,
    deadline: Duration,
) {
    let (out_tx, mut out_rx) = mpsc::channel::<ShellResponse>(OUTPUT_QUEUE_CAPACITY);
    let (read_err_tx, mut read_err_rx) = mpsc::channel::<std::io::Error>(2);

    let stdout_task = tokio::spawn(pump_output(
        stdout,
        ShellStream::Stdout,
        out_tx.clone(),
        read_err_tx.clone(),
    ));
    let stderr_task = tokio::spawn(pump_output(
        stderr,
        ShellStream::Stderr,
        out_tx,
        read_err_tx,
    ));

    let (input_tx, mut input_rx) = mpsc::channel::<Result<(), Status>>(1);
    let input_task = tokio::spawn(pump_input(inbound, stdin, input_tx));

    let timeout = tokio::time::sleep(deadline);
    tokio::pin!(timeout);

    let mut outputs_done = false;
    let mut input_done = false;

    let failure = loop {
        if outputs_done && input_done {
            break None;
        }

        tokio::select! {
            maybe = out_rx.recv(), if !outputs_done => match maybe {
                Some(frame) => {
                    if tx.send(Ok(frame)).await.is_err() {
                        break Some(Status::cancelled("client disconnected"));
                    }
                }
                None => outputs_done = true,
            },
            Some(err) = read_err_rx.recv() => {
                break Some(Status::internal(format!("pipe read error: {err}")));
            }
            status = input_rx.recv(), if !input_done => {
                input_done = true;
                if let Some(Err(status)) = status {
                    break Some(status);
                }
            }
            () = tx.closed() => {
                break Some(Status::cancelled("client disconnected"));
            }
            () = &mut timeout => {
                break Some(Status::deadline_exceeded("shell timed out"));
            }
        }
    };

    if let Some(status) = failure {
        debug!(code = ?status.code(), "shell session terminating early");
        let _ = child.kill().await;
        stdout_task.abort();
        stderr_task.abort();
        input_task.abort();
        let _ = tx.send(Err(status)).await;
        return;
    }

    // Both readers hit EOF and the input side is finished; reap the
    // subprocess and emit the final exit frame.
    let exit = tokio::select! {
        res = child.wait() => match res {
            Ok(status) => exit_frame(status),
            Err(err) => {
                let _ = tx.send(Err(Status::internal(format!("wait: {err}")))).await;
                return;
            }
        },
        () = &mut timeout => {
            let _ = child.kill().await;
            let _ = tx.send(Err(Status::deadline_exceeded("shell timed out"))).await;
            return;
        }
    };

    let _ = tx.send(Ok(exit)).await;
}

/// Pumps one subprocess pipe into the output queue in 32 KiB reads.
///
/// Zero-length reads are not emitted; EOF ends the pump cleanly; any other
/// read error is reported on the error channel.
async fn pump_output<R: AsyncRead + Unpin>(
    mut reader: R,
    stream: ShellStream,
    out_tx: mpsc::Sender<ShellResponse>,
    err_tx: mpsc::Sender<std::io::Error>,
) {
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => return,
            Ok(n) => {
                let frame = ShellResponse::output(stream, buf[..n].to_vec());
                if out_tx.send(frame).await.is_err() {
                    return;
                }
            }
            Err(err) => {
                let _ = err_tx.send(err).await;
                return;
            }
        }
    }
}

/// Feeds inbound input frames to the subprocess stdin.
///
/// `Input{eof}` and inbound stream EOF both close stdin and finish the task;
/// write and receive errors are reported as the task's result.
async fn pump_input(
    mut inbound: Streaming<ShellRequest>,
    mut stdin: ChildStdin,
    done: mpsc::Sender<Result<(), Status>>,
) {
    let result = loop {
        match inbound.message().await {
            Ok(Some(frame)) => {
                let Some(shell_request::Payload::Input(input)) = frame.payload else {
                    continue;
                };
                if !input.data.is_empty() {
                    if let Err(err) = stdin.write_all(&input.data).await {
                        break Err(Status::internal(format!("stdin write error: {err}")));
                    }
                }
                if input.eof {
                    break Ok(());
                }
            }
            Ok(None) => break Ok(()),
            Err(status) => break Err(status),
        }
    };

    let _ = stdin.shutdown().await;
    drop(stdin);
    let _ = done.send(result).await;
}

fn exit_frame(status: std::process::ExitStatus) -> ShellResponse {
    match status.code() {
        Some(0) => ShellResponse::exit(0, ""),
        Some(code) => ShellResponse::exit(code, format!("exit status {code}")),
        None => {
            use std::os::unix::process::ExitStatusExt;
            let message = match status.signal() {
                Some(signal) => format!("terminated by signal {signal}"),
                None => "terminated".to_string(),
            };
            ShellResponse::exit(-1, message)
        }
    }
}
