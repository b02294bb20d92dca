// ABOUTME: In-memory fakes for the daemon, command and file capabilities.
// ABOUTME: Each records its calls so tests can assert on exactly what the core asked for.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, stream};
use hoist::runtime::traits::{
    BuildOptions, CommandOutput, CommandRunner, ContextFiles, ContextStream, DaemonClient,
    EventStream, Invocation, RequestError,
};
use hoist::types::ImageName;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::Poll;

/// The payload the daemon sends when a pull or build fails.
pub fn error_payload(message: &str) -> String {
    format!(r#"{{"errorDetail":{{"message":"{}"}}}}"#, message)
}

/// What a fake build call received.
#[derive(Debug, Clone)]
pub struct BuildCall {
    pub options: BuildOptions,
    pub context: Vec<u8>,
}

#[derive(Default)]
struct DaemonState {
    rejection: Option<String>,
    responses: HashMap<String, Vec<Bytes>>,
    pulls: Vec<String>,
    builds: Vec<BuildCall>,
}

/// Scriptable daemon. Unscripted names get an empty stream.
#[derive(Clone, Default)]
pub struct FakeDaemon {
    state: Arc<Mutex<DaemonState>>,
    drained: Arc<AtomicUsize>,
}

impl FakeDaemon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every request before producing a stream.
    pub fn rejecting(message: &str) -> Self {
        let daemon = Self::new();
        daemon.state.lock().rejection = Some(message.to_string());
        daemon
    }

    /// Respond to `name` (pull) or tag (build) with these chunks.
    pub fn respond(self, name: &str, chunks: &[&str]) -> Self {
        let chunks = chunks
            .iter()
            .map(|c| Bytes::copy_from_slice(c.as_bytes()))
            .collect();
        self.state.lock().responses.insert(name.to_string(), chunks);
        self
    }

    pub fn pulls(&self) -> Vec<String> {
        self.state.lock().pulls.clone()
    }

    pub fn builds(&self) -> Vec<BuildCall> {
        self.state.lock().builds.clone()
    }

    /// How many handed-out streams were polled through to their end.
    pub fn drained(&self) -> usize {
        self.drained.load(Ordering::SeqCst)
    }

    fn stream_for(&self, name: &str) -> Result<EventStream, RequestError> {
        let state = self.state.lock();
        if let Some(message) = &state.rejection {
            return Err(RequestError::Rejected {
                status: 500,
                message: message.clone(),
            });
        }

        let chunks = state.responses.get(name).cloned().unwrap_or_default();
        let drained = Arc::clone(&self.drained);
        let end = stream::poll_fn(move |_| {
            drained.fetch_add(1, Ordering::SeqCst);
            Poll::<Option<Bytes>>::Ready(None)
        });
        Ok(Box::pin(stream::iter(chunks).chain(end)))
    }
}

#[async_trait]
impl DaemonClient for FakeDaemon {
    async fn pull(&self, name: &ImageName) -> Result<EventStream, RequestError> {
        self.state.lock().pulls.push(name.as_str().to_string());
        self.stream_for(name.as_str())
    }

    async fn build_image(
        &self,
        context: ContextStream,
        options: &BuildOptions,
    ) -> Result<EventStream, RequestError> {
        let chunks: Vec<Bytes> = context
            .try_collect()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;
        self.state.lock().builds.push(BuildCall {
            options: options.clone(),
            context: chunks.concat(),
        });
        self.stream_for(&options.t)
    }
}

enum RunnerBehavior {
    Exit(Option<i32>, String),
    SpawnFails,
}

/// Records invocations instead of running anything.
#[derive(Clone)]
pub struct FakeRunner {
    behavior: Arc<RunnerBehavior>,
    calls: Arc<Mutex<Vec<Invocation>>>,
}

impl FakeRunner {
    pub fn succeeding() -> Self {
        Self::with(RunnerBehavior::Exit(Some(0), String::new()))
    }

    pub fn exiting(code: i32, stderr: &str) -> Self {
        Self::with(RunnerBehavior::Exit(Some(code), stderr.to_string()))
    }

    pub fn unspawnable() -> Self {
        Self::with(RunnerBehavior::SpawnFails)
    }

    fn with(behavior: RunnerBehavior) -> Self {
        Self {
            behavior: Arc::new(behavior),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        self.calls.lock().push(invocation.clone());
        match &*self.behavior {
            RunnerBehavior::Exit(status, stderr) => Ok(CommandOutput {
                status: *status,
                stdout: Vec::new(),
                stderr: stderr.as_bytes().to_vec(),
            }),
            RunnerBehavior::SpawnFails => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "tar: command not found",
            )),
        }
    }
}

/// Serves fixed bytes for any path, or fails every open.
#[derive(Clone)]
pub struct FakeFiles {
    contents: Option<Bytes>,
    opened: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeFiles {
    pub fn serving(contents: &'static [u8]) -> Self {
        Self {
            contents: Some(Bytes::from_static(contents)),
            opened: Arc::default(),
        }
    }

    pub fn missing() -> Self {
        Self {
            contents: None,
            opened: Arc::default(),
        }
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().clone()
    }
}

#[async_trait]
impl ContextFiles for FakeFiles {
    async fn open_read(&self, path: &Path) -> std::io::Result<ContextStream> {
        self.opened.lock().push(path.to_path_buf());
        match &self.contents {
            Some(contents) => {
                // Split in two so the daemon sees more than one chunk.
                let mid = contents.len() / 2;
                let parts: Vec<std::io::Result<Bytes>> =
                    vec![Ok(contents.slice(..mid)), Ok(contents.slice(mid..))];
                Ok(Box::pin(stream::iter(parts)))
            }
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            )),
        }
    }
}
