//! Docker runtime driver.
//!
//! Implements the orchestrator's runtime capability trait by shelling out to
//! the `docker` binary. Containers created here carry a `convoy.managed`
//! label so `list` only reports this tool's containers, and publish the
//! agent port so the endpoint can be derived from the host port binding.

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::process::Command;
use tracing::{debug, warn};

use convoy_core::{Config, ContainerRecord, ContainerSpec, CoreError, Result, Runtime};

const MANAGED_LABEL: &str = "convoy.managed=true";
const STOP_TIMEOUT_SECS: u32 = 10;

/// Runtime driver backed by the `docker` CLI.
pub struct DockerCliRuntime {
    image: String,
    agent_port: u16,
    docker_host: String,
    network: String,
    pull_always: bool,
    pull_timeout: Duration,
}

impl DockerCliRuntime {
    pub fn new(cfg: &Config) -> Self {
        Self {
            image: cfg.image.clone(),
            agent_port: cfg.agent_port,
            docker_host: cfg.docker_host.clone(),
            network: cfg.docker_network.clone(),
            pull_always: cfg.pull_always,
            pull_timeout: cfg.pull_timeout,
        }
    }

    /// Runs a docker subcommand and returns trimmed stdout.
    async fn docker(&self, args: &[&str]) -> Result<String> {
        debug!(?args, "docker");
        let output = Command::new("docker")
            .args(args)
            .env("DOCKER_HOST", &self.docker_host)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| CoreError::Runtime(format!("run docker: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CoreError::Runtime(format!(
                "docker {}: {}",
                args.first().copied().unwrap_or(""),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn ensure_image(&self, image: &str) -> Result<()> {
        if !self.pull_always && self.docker(&["image", "inspect", image]).await.is_ok() {
            return Ok(());
        }

        tokio::time::timeout(self.pull_timeout, self.docker(&["pull", image]))
            .await
            .map_err(|_| CoreError::Runtime(format!("pull {image}: timed out")))??;
        Ok(())
    }

    /// Derives the agent endpoint for a container.
    ///
    /// Prefers the published host port binding; falls back to the container
    /// IP on the configured (or default) network. Returns an empty string
    /// when neither is available, which disables RPC for the container.
    async fn derive_endpoint(&self, id: &str) -> String {
        let port_arg = format!("{}/tcp", self.agent_port);
        if let Ok(bindings) = self.docker(&["port", id, &port_arg]).await {
            for line in bindings.lines() {
                if let Some((host, port)) = line.rsplit_once(':') {
                    if port.is_empty() {
                        continue;
                    }
                    let host = match host {
                        "0.0.0.0" | "::" | "[::]" | "" => "127.0.0.1",
                        other => other,
                    };
                    return format!("{host}:{port}");
                }
            }
        }

        let ip_format = if self.network.is_empty() {
            "{{.NetworkSettings.IPAddress}}".to_string()
        } else {
            format!(
                "{{{{with index .NetworkSettings.Networks \"{}\"}}}}{{{{.IPAddress}}}}{{{{end}}}}",
                self.network
            )
        };
        if let Ok(ip) = self.docker(&["inspect", "-f", &ip_format, id]).await {
            if !ip.is_empty() {
                return format!("{}:{}", ip, self.agent_port);
            }
        }

        String::new()
    }

    async fn inspect_record(&self, id: &str) -> Result<ContainerRecord> {
        let line = self
            .docker(&[
                "inspect",
                "-f",
                "{{.Id}}\t{{.Name}}\t{{.Config.Image}}\t{{.Created}}",
                id,
            ])
            .await?;

        let mut fields = line.split('\t');
        let full_id = fields.next().unwrap_or(id).to_string();
        let name = fields
            .next()
            .unwrap_or("")
            .trim_start_matches('/')
            .to_string();
        let image = fields.next().unwrap_or("").to_string();
        let created_at = fields
            .next()
            .and_then(|ts| ts.parse::<DateTime<Utc>>().ok())
            .unwrap_or_else(Utc::now);

        let endpoint = self.derive_endpoint(&full_id).await;

        Ok(ContainerRecord {
            id: full_id,
            name,
            image,
            endpoint,
            labels: HashMap::new(),
            created_at,
            updated_at: created_at,
        })
    }
}

#[async_trait]
impl Runtime for DockerCliRuntime {
    async fn create_container(&self, spec: ContainerSpec) -> Result<ContainerRecord> {
        let image = if spec.image.trim().is_empty() {
            self.image.trim().to_string()
        } else {
            spec.image.trim().to_string()
        };
        if image.is_empty() {
            return Err(CoreError::InvalidInput("image is required".into()));
        }

        self.ensure_image(&image).await?;

        let publish = self.agent_port.to_string();
        let mut args: Vec<String> = vec![
            "create".into(),
            "--label".into(),
            MANAGED_LABEL.into(),
            "--publish".into(),
            publish,
        ];
        if !spec.name.is_empty() {
            args.push("--name".into());
            args.push(spec.name.clone());
        }
        if !self.network.is_empty() {
            args.push("--network".into());
            args.push(self.network.clone());
        }
        for (key, value) in &spec.labels {
            args.push("--label".into());
            args.push(format!("{key}={value}"));
        }
        for (key, value) in &spec.environment {
            if key.trim().is_empty() {
                continue;
            }
            args.push("--env".into());
            args.push(format!("{key}={value}"));
        }
        args.push(image);
        args.extend(spec.command.iter().cloned());

        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let id = self.docker(&arg_refs).await?;
        let id = id
            .lines()
            .last()
            .map(str::to_string)
            .ok_or_else(|| CoreError::Runtime("docker create returned no id".into()))?;

        self.inspect_record(&id).await
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        self.docker(&["start", id]).await?;
        Ok(())
    }

    async fn stop_container(&self, id: &str) -> Result<()> {
        let timeout = STOP_TIMEOUT_SECS.to_string();
        self.docker(&["stop", "-t", &timeout, id]).await?;
        Ok(())
    }

    async fn remove_container(&self, id: &str) -> Result<()> {
        self.docker(&["rm", "--force", "--volumes", id]).await?;
        Ok(())
    }

    async fn exec(&self, id: &str, cmd: &[String]) -> Result<String> {
        let mut args: Vec<&str> = vec!["exec", id];
        args.extend(cmd.iter().map(String::as_str));

        let output = Command::new("docker")
            .args(&args)
            .env("DOCKER_HOST", &self.docker_host)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| CoreError::Runtime(format!("run docker: {err}")))?;

        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            return Err(CoreError::Runtime(format!("exec exit {code}: {combined}")));
        }

        Ok(combined)
    }

    async fn shell(&self, id: &str) -> Result<()> {
        let status = Command::new("docker")
            .args(["exec", "-i", id, "/bin/sh"])
            .env("DOCKER_HOST", &self.docker_host)
            .status()
            .await
            .map_err(|err| CoreError::Runtime(format!("run docker: {err}")))?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            return Err(CoreError::Runtime(format!("shell exited with {code}")));
        }
        Ok(())
    }

    async fn list_containers(&self) -> Result<Vec<ContainerRecord>> {
        let filter = format!("label={MANAGED_LABEL}");
        let listing = self
            .docker(&["ps", "-a", "--filter", &filter, "--format", "{{.ID}}"])
            .await?;

        let mut records = Vec::new();
        for id in listing.lines().filter(|l| !l.is_empty()) {
            match self.inspect_record(id).await {
                Ok(record) => records.push(record),
                Err(err) => warn!(%id, %err, "failed to inspect container"),
            }
        }
        Ok(records)
    }
}
