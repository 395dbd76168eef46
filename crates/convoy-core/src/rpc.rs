//! Connection-pooling gRPC client for agent endpoints.
//!
//! One channel is cached per endpoint. Dialing happens outside the cache
//! lock; a second check after the dial resolves concurrent dial races by
//! dropping the loser. Unary calls carry the configured call deadline;
//! streaming calls pass the caller's context through unchanged.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Streaming};
use tracing::debug;

use convoy_protocol::{
    CommandRequest, CommandResponse, ConvoyServiceClient, CopyRequest, CopyResponse,
    HealthRequest, HealthResponse, ShellRequest, ShellResponse,
};

use crate::error::{CoreError, Result};

const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound frame capacity for streaming calls.
const STREAM_BUFFER: usize = 16;

/// Timeouts applied by the pool.
#[derive(Debug, Clone, Copy)]
pub struct RpcConfig {
    /// Deadline for establishing a connection.
    pub dial_timeout: Duration,
    /// Deadline applied to unary calls.
    pub call_timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl RpcConfig {
    /// Replaces zero durations with the defaults.
    fn normalized(mut self) -> Self {
        if self.dial_timeout.is_zero() {
            self.dial_timeout = DEFAULT_DIAL_TIMEOUT;
        }
        if self.call_timeout.is_zero() {
            self.call_timeout = DEFAULT_CALL_TIMEOUT;
        }
        self
    }
}

/// Pooled RPC client keyed by agent endpoint.
pub struct RpcPool {
    cfg: RpcConfig,
    conns: Mutex<HashMap<String, Channel>>,
}

impl RpcPool {
    /// Creates a pool with the given timeouts (zeroes fall back to the
    /// defaults).
    pub fn new(cfg: RpcConfig) -> Self {
        Self {
            cfg: cfg.normalized(),
            conns: Mutex::new(HashMap::new()),
        }
    }

    /// Drops all cached connections.
    pub async fn close(&self) {
        self.conns.lock().await.clear();
    }

    /// Calls ExecuteCommand on the target endpoint.
    pub async fn execute_command(
        &self,
        endpoint: &str,
        req: CommandRequest,
    ) -> Result<CommandResponse> {
        let mut client = self.client(endpoint).await?;
        let mut request = Request::new(req);
        request.set_timeout(self.cfg.call_timeout);
        Ok(client.execute_command(request).await?.into_inner())
    }

    /// Queries the agent health endpoint.
    pub async fn check_health(&self, endpoint: &str) -> Result<HealthResponse> {
        let mut client = self.client(endpoint).await?;
        let mut request = Request::new(HealthRequest {});
        request.set_timeout(self.cfg.call_timeout);
        Ok(client.check_health(request).await?.into_inner())
    }

    /// Opens a bidirectional shell stream.
    ///
    /// Returns the outbound frame sender (dropping it closes the send side)
    /// and the inbound response stream. The stream lives until the caller
    /// drops it; no pool deadline is applied.
    pub async fn execute_shell(
        &self,
        endpoint: &str,
    ) -> Result<(mpsc::Sender<ShellRequest>, Streaming<ShellResponse>)> {
        let mut client = self.client(endpoint).await?;
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let response = client.execute_shell(ReceiverStream::new(rx)).await?;
        Ok((tx, response.into_inner()))
    }

    /// Opens a bidirectional copy stream.
    pub async fn copy(
        &self,
        endpoint: &str,
    ) -> Result<(mpsc::Sender<CopyRequest>, Streaming<CopyResponse>)> {
        let mut client = self.client(endpoint).await?;
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let response = client.copy(ReceiverStream::new(rx)).await?;
        Ok((tx, response.into_inner()))
    }

    async fn client(&self, endpoint: &str) -> Result<ConvoyServiceClient<Channel>> {
        let channel = self.connection(endpoint).await?;
        Ok(ConvoyServiceClient::new(channel))
    }

    async fn connection(&self, endpoint: &str) -> Result<Channel> {
        if endpoint.is_empty() {
            return Err(CoreError::InvalidInput("endpoint is required".into()));
        }

        if let Some(channel) = self.conns.lock().await.get(endpoint) {
            return Ok(channel.clone());
        }

        let channel = Endpoint::from_shared(format!("http://{endpoint}"))
            .map_err(|source| CoreError::Dial {
                endpoint: endpoint.to_string(),
                source,
            })?
            .connect_timeout(self.cfg.dial_timeout)
            .connect()
            .await
            .map_err(|source| CoreError::Dial {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let mut conns = self.conns.lock().await;
        // Another task might have dialed the same endpoint while we did;
        // keep the cached winner and drop ours.
        if let Some(existing) = conns.get(endpoint) {
            debug!(%endpoint, "discarding connection that lost the dial race");
            return Ok(existing.clone());
        }

        conns.insert(endpoint.to_string(), channel.clone());
        Ok(channel)
    }

    #[cfg(test)]
    async fn cached_connections(&self) -> usize {
        self.conns.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_agent::{AgentConfig, AgentServer};
    use convoy_protocol::{ConvoyServiceServer, HealthStatus};
    use tokio::net::TcpListener;
    use tokio_stream::wrappers::TcpListenerStream;

    async fn start_agent() -> String {
        let cfg = AgentConfig {
            grpc_port: 1,
            shell_path: "/bin/sh".to_string(),
            max_concurrent: 4,
            exec_timeout: Duration::from_secs(30),
            agent_id: "pool-test".to_string(),
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(
            tonic::transport::Server::builder()
                .add_service(ConvoyServiceServer::new(AgentServer::new(cfg)))
                .serve_with_incoming(TcpListenerStream::new(listener)),
        );
        addr.to_string()
    }

    #[test]
    fn zero_timeouts_fall_back_to_defaults() {
        let pool = RpcPool::new(RpcConfig {
            dial_timeout: Duration::ZERO,
            call_timeout: Duration::ZERO,
        });
        assert_eq!(pool.cfg.dial_timeout, DEFAULT_DIAL_TIMEOUT);
        assert_eq!(pool.cfg.call_timeout, DEFAULT_CALL_TIMEOUT);
    }

    #[tokio::test]
    async fn empty_endpoint_is_rejected() {
        let pool = RpcPool::new(RpcConfig::default());
        let err = pool.check_health("").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_dial_error() {
        let pool = RpcPool::new(RpcConfig::default());
        // Bind-then-drop leaves a port nothing is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = pool.check_health(&addr.to_string()).await.unwrap_err();
        assert!(matches!(err, CoreError::Dial { .. }));
    }

    #[tokio::test]
    async fn connections_are_cached_per_endpoint() {
        let endpoint = start_agent().await;
        let pool = RpcPool::new(RpcConfig::default());

        pool.check_health(&endpoint).await.unwrap();
        pool.check_health(&endpoint).await.unwrap();
        assert_eq!(pool.cached_connections().await, 1);

        pool.close().await;
        assert_eq!(pool.cached_connections().await, 0);
    }

    #[tokio::test]
    async fn concurrent_dials_leave_a_single_cached_connection() {
        let endpoint = start_agent().await;
        let pool = RpcPool::new(RpcConfig::default());

        let (a, b) = tokio::join!(pool.connection(&endpoint), pool.connection(&endpoint));
        a.unwrap();
        b.unwrap();

        assert_eq!(pool.cached_connections().await, 1);

        // The surviving channel works.
        let resp = pool.check_health(&endpoint).await.unwrap();
        assert_eq!(resp.status(), HealthStatus::Healthy);
    }
}
