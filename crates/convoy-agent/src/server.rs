//! The `ConvoyService` implementation served by the agent.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, info};

use convoy_protocol::v1::{copy_request, shell_request};
use convoy_protocol::{
    CommandRequest, CommandResponse, ConvoyService, CopyRequest, CopyResponse, HealthRequest,
    HealthResponse, HealthStatus, ShellRequest, ShellResponse,
};

use crate::config::AgentConfig;
use crate::gate::Gate;
use crate::{copy, shell};

/// Agent-side service state shared across RPC calls.
#[derive(Debug, Clone)]
pub struct AgentServer {
    cfg: Arc<AgentConfig>,
    gate: Gate,
}

impl AgentServer {
    /// Creates the service from its configuration.
    pub fn new(cfg: AgentConfig) -> Self {
        let gate = Gate::new(cfg.max_concurrent);
        Self {
            cfg: Arc::new(cfg),
            gate,
        }
    }

    /// The configuration this server runs with.
    pub fn config(&self) -> &AgentConfig {
        &self.cfg
    }

    fn command_timeout(&self, timeout_seconds: i32) -> Duration {
        if timeout_seconds > 0 {
            Duration::from_secs(timeout_seconds as u64)
        } else {
            self.cfg.exec_timeout
        }
    }
}

#[tonic::async_trait]
impl ConvoyService for AgentServer {
    async fn execute_command(
        &self,
        request: Request<CommandRequest>,
    ) -> Result<Response<CommandResponse>, Status> {
        let req = request.into_inner();
        if req.args.is_empty() {
            return Err(Status::invalid_argument("args required"));
        }

        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| Status::internal("concurrency gate closed"))?;

        info!(args = ?req.args, work_dir = %req.work_dir, "executing command");

        let timeout = self.command_timeout(req.timeout_seconds);

        let mut cmd = Command::new(&req.args[0]);
        cmd.args(&req.args[1..]);
        if !req.work_dir.is_empty() {
            cmd.current_dir(&req.work_dir);
        }
        // Overlay the request environment onto the agent's own; empty keys
        // are dropped.
        for (key, value) in &req.env {
            if key.is_empty() {
                continue;
            }
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|err| Status::unknown(format!("command failed: {err}")))?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => return Err(Status::unknown(format!("command failed: {err}"))),
            Err(_) => return Err(Status::deadline_exceeded("command timed out")),
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let error_message = if output.status.success() {
            String::new()
        } else {
            format!("{}", output.status)
        };

        // Non-zero exits are data, not RPC failures: the caller distinguishes
        // "ran and failed" from "could not run".
        Ok(Response::new(CommandResponse {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
            error_message,
        }))
    }

    type ExecuteShellStream = ReceiverStream<Result<ShellResponse, Status>>;

    async fn execute_shell(
        &self,
        request: Request<Streaming<ShellRequest>>,
    ) -> Result<Response<Self::ExecuteShellStream>, Status> {
        let mut inbound = request.into_inner();

        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| Status::internal("concurrency gate closed"))?;

        let start = match inbound.message().await?.and_then(|req| req.payload) {
            Some(shell_request::Payload::Start(start)) => start,
            _ => return Err(Status::invalid_argument("first message must be start")),
        };

        let stream = shell::handle(&self.cfg, start, inbound, permit)?;
        Ok(Response::new(stream))
    }

    type CopyStream = ReceiverStream<Result<CopyResponse, Status>>;

    async fn copy(
        &self,
        request: Request<Streaming<CopyRequest>>,
    ) -> Result<Response<Self::CopyStream>, Status> {
        let mut inbound = request.into_inner();

        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| Status::internal("concurrency gate closed"))?;

        let start = match inbound.message().await?.and_then(|req| req.payload) {
            Some(copy_request::Payload::Start(start)) => start,
            _ => return Err(Status::invalid_argument("first message must be CopyStart")),
        };

        let stream = copy::handle(start, inbound, permit).await?;
        Ok(Response::new(stream))
    }

    async fn check_health(
        &self,
        _request: Request<HealthRequest>,
    ) -> Result<Response<HealthResponse>, Status> {
        debug!(agent_id = %self.cfg.agent_id, "health check requested");
        Ok(Response::new(HealthResponse {
            status: HealthStatus::Healthy as i32,
            message: "ok".to_string(),
        }))
    }
}
