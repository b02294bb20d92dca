// ABOUTME: Docker-compatible daemon client over a Unix socket.
// ABOUTME: bollard for status queries, raw HTTP/1 for the streaming pull and build endpoints.

use super::traits::{
    BuildOptions, ContextStream, DaemonClient, DaemonMetadata, DaemonStatus, DaemonStatusError,
    EventStream, RequestError,
};
use super::types::{RuntimeInfo, RuntimeType};
use crate::types::ImageName;
use async_trait::async_trait;
use bollard::Docker;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, future};
use http_body_util::{BodyExt, Empty, StreamBody};
use hyper::body::{Body, Frame, Incoming};
use hyper::{Method, Request, Response, header};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use tokio::net::UnixStream;

/// Daemon client for Docker and Podman sockets.
///
/// bollard decodes the progress stream into typed messages, which would hide
/// chunk boundaries and malformed tails. Pull and build therefore talk HTTP
/// directly and hand the response body through untouched.
pub struct DockerDaemon {
    client: Docker,
    runtime_type: RuntimeType,
    socket_path: String,
}

impl DockerDaemon {
    /// Connect to a daemon using detected runtime info.
    ///
    /// Use with `detect_runtime()` to find the socket.
    pub fn connect(info: &RuntimeInfo) -> Result<Self, DaemonStatusError> {
        let client =
            Docker::connect_with_unix(&info.socket_path, 120, bollard::API_DEFAULT_VERSION)
                .map_err(|e| DaemonStatusError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            runtime_type: info.runtime_type,
            socket_path: info.socket_path.clone(),
        })
    }

    /// Get the runtime type (Docker or Podman).
    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }

    pub fn socket_path(&self) -> &str {
        &self.socket_path
    }

    /// Send one request on a fresh connection.
    ///
    /// Non-2xx responses are turned into `RequestError::Rejected` here, so a
    /// returned response always carries a progress stream.
    async fn send<B>(&self, req: Request<B>) -> Result<Response<Incoming>, RequestError>
    where
        B: Body + Send + 'static,
        B::Data: Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|e| {
            RequestError::Transport(format!("failed to connect to {}: {}", self.socket_path, e))
        })?;

        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| RequestError::Transport(format!("HTTP handshake failed: {}", e)))?;

        // Spawn connection handler
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("daemon connection error: {}", e);
            }
        });

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| RequestError::Transport(format!("request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .into_body()
                .collect()
                .await
                .map(|b| b.to_bytes())
                .unwrap_or_default();
            return Err(RequestError::Rejected {
                status,
                message: rejection_message(&body),
            });
        }

        Ok(resp)
    }
}

fn build_request<B>(
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: B,
) -> Result<Request<B>, RequestError> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "localhost");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(body)
        .map_err(|e| RequestError::Transport(format!("failed to build request: {}", e)))
}

/// Error bodies are `{"message": "..."}`; fall back to the raw text.
fn rejection_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string())
}

/// An empty `tag` asks the daemon for every tag of the repository, so an
/// untagged, undigested name pulls `latest`.
fn pull_uri(name: &ImageName) -> String {
    let mut uri = format!(
        "/images/create?fromImage={}",
        urlencoding::encode(name.as_str())
    );
    if name.tag().is_none() && name.digest().is_none() {
        uri.push_str("&tag=latest");
    }
    uri
}

/// Response body frames as raw chunks. A body error ends the stream.
fn event_stream(resp: Response<Incoming>) -> EventStream {
    let frames = resp.into_body().into_data_stream();
    Box::pin(
        frames
            .take_while(|frame| {
                if let Err(e) = frame {
                    tracing::warn!("daemon stream ended early: {}", e);
                }
                future::ready(frame.is_ok())
            })
            .filter_map(|frame| future::ready(frame.ok())),
    )
}

#[async_trait]
impl DaemonClient for DockerDaemon {
    async fn pull(&self, name: &ImageName) -> Result<EventStream, RequestError> {
        let uri = pull_uri(name);
        let req = build_request(Method::POST, &uri, None, Empty::<Bytes>::new())?;

        tracing::debug!(image = %name, "requesting pull");
        let resp = self.send(req).await?;
        Ok(event_stream(resp))
    }

    async fn build_image(
        &self,
        context: ContextStream,
        options: &BuildOptions,
    ) -> Result<EventStream, RequestError> {
        let uri = format!("/build?t={}", urlencoding::encode(&options.t));
        let body = StreamBody::new(context.map_ok(Frame::data));
        let req = build_request(Method::POST, &uri, Some("application/x-tar"), body)?;

        tracing::debug!(tag = %options.t, "requesting build");
        let resp = self.send(req).await?;
        Ok(event_stream(resp))
    }
}

#[async_trait]
impl DaemonStatus for DockerDaemon {
    async fn info(&self) -> Result<DaemonMetadata, DaemonStatusError> {
        let info = self
            .client
            .info()
            .await
            .map_err(|e| DaemonStatusError::ConnectionFailed(e.to_string()))?;

        let name = match self.runtime_type {
            RuntimeType::Docker => "Docker".to_string(),
            RuntimeType::Podman => "Podman".to_string(),
        };

        Ok(DaemonMetadata {
            name,
            version: info.server_version.unwrap_or_default(),
            api_version: bollard::API_DEFAULT_VERSION.to_string(),
            os: info.operating_system.unwrap_or_default(),
            arch: info.architecture.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), DaemonStatusError> {
        self.client
            .ping()
            .await
            .map_err(|e| DaemonStatusError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }
}
