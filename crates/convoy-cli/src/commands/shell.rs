//! Shell command implementation.
//!
//! Opens a bidirectional shell stream against the container's agent. Local
//! stdin is forwarded line-buffered as input frames; output frames are
//! written to the matching local stream; the agent's final exit frame
//! becomes this process's exit code.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use convoy_core::{RpcConfig, RpcPool};
use convoy_protocol::v1::shell_response;
use convoy_protocol::{ShellRequest, ShellStart, ShellStream};

use crate::commands::load_manager;
use crate::index::ContainerIndex;

/// Arguments for the shell command.
#[derive(Args)]
pub struct ShellArgs {
    /// Container name or id
    pub container: String,
}

/// Executes the shell command.
pub async fn execute(args: ShellArgs, config_path: Option<&Path>) -> Result<()> {
    let (_cfg, manager) = load_manager(config_path)?;
    let index = ContainerIndex::load(&manager).await?;
    let record = index.resolve_with_endpoint(&args.container)?;

    let pool = RpcPool::new(RpcConfig::default());
    let (tx, mut inbound) = pool
        .execute_shell(&record.endpoint)
        .await
        .context("open shell stream")?;

    // Empty args select the agent's configured shell.
    tx.send(ShellRequest::start(ShellStart::default()))
        .await
        .context("send start frame")?;

    // Forward local stdin line by line; EOF closes the remote stdin.
    let stdin_tx = tx.clone();
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        let mut handle = stdin.lock();
        let mut line = String::new();
        loop {
            line.clear();
            match handle.read_line(&mut line) {
                Ok(0) | Err(_) => {
                    let _ = stdin_tx.blocking_send(ShellRequest::input_eof());
                    return;
                }
                Ok(_) => {
                    if stdin_tx
                        .blocking_send(ShellRequest::input(line.as_bytes().to_vec()))
                        .is_err()
                    {
                        return;
                    }
                }
            }
        }
    });

    let mut exit_code = 0;
    while let Some(frame) = inbound.message().await.context("shell stream")? {
        match frame.payload {
            Some(shell_response::Payload::Output(output)) => match output.stream() {
                ShellStream::Stdout => {
                    let mut stdout = std::io::stdout();
                    stdout.write_all(&output.data)?;
                    stdout.flush()?;
                }
                ShellStream::Stderr => {
                    let mut stderr = std::io::stderr();
                    stderr.write_all(&output.data)?;
                    stderr.flush()?;
                }
            },
            Some(shell_response::Payload::Exit(exit)) => {
                exit_code = exit.exit_code;
                if exit.exit_code != 0 && !exit.message.is_empty() {
                    eprintln!("{}", exit.message);
                }
            }
            None => {}
        }
    }

    drop(tx);
    pool.close().await;

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
