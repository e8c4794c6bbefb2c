use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use cloner_logging::{cloner_debug, cloner_info, cloner_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::client::{ClientSettings, CloneClient, ReqwestCloneClient};
use crate::{EngineEvent, RequestId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid service url: {0}")]
    InvalidServiceUrl(String),
    #[error("http client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("engine runtime failed to start: {0}")]
    Runtime(#[from] io::Error),
}

/// Receives engine events on the runtime's threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Clone { request_id: RequestId, url: String },
    Cancel { request_id: RequestId },
    HealthCheck,
}

/// Runs clone requests on a background tokio runtime.
///
/// Every request is bound to a child of the engine's root cancellation token,
/// so cancelling one request or dropping the handle abandons the call without
/// emitting an event.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    root: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: &ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let client = Arc::new(ReqwestCloneClient::new(settings)?);
        cloner_info!("Cloning service endpoint: {}", client.endpoint());
        Self::with_client(client, sink)
    }

    pub fn with_client(
        client: Arc<dyn CloneClient>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("cloner-engine-rt")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let root = CancellationToken::new();
        let dispatcher_root = root.clone();

        let worker = thread::Builder::new()
            .name("cloner-engine".to_string())
            .spawn(move || {
                dispatch(runtime, cmd_rx, client, sink, dispatcher_root);
            })?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            root,
            worker: Some(worker),
        })
    }

    pub fn send_clone(&self, request_id: RequestId, url: impl Into<String>) {
        self.send(EngineCommand::Clone {
            request_id,
            url: url.into(),
        });
    }

    pub fn cancel(&self, request_id: RequestId) {
        self.send(EngineCommand::Cancel { request_id });
    }

    pub fn health_check(&self) {
        self.send(EngineCommand::HealthCheck);
    }

    /// Cancels all in-flight work and waits for the dispatcher to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn send(&self, command: EngineCommand) {
        if let Some(tx) = &self.cmd_tx {
            if tx.send(command).is_err() {
                cloner_warn!("Engine dispatcher is gone; command dropped");
            }
        }
    }

    fn stop(&mut self) {
        self.root.cancel();
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                cloner_warn!("Engine dispatcher panicked");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn dispatch(
    runtime: tokio::runtime::Runtime,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    client: Arc<dyn CloneClient>,
    sink: Arc<dyn EventSink>,
    root: CancellationToken,
) {
    let mut in_flight: HashMap<RequestId, CancellationToken> = HashMap::new();

    while let Ok(command) = cmd_rx.recv() {
        // Finished tasks cancel their own token on exit.
        in_flight.retain(|_, token| !token.is_cancelled());

        match command {
            EngineCommand::Clone { request_id, url } => {
                let token = root.child_token();
                in_flight.insert(request_id, token.clone());
                let client = client.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let _done = token.clone().drop_guard();
                    tokio::select! {
                        _ = token.cancelled() => {
                            cloner_info!("Clone request {} abandoned", request_id);
                        }
                        result = client.clone_page(&url) => {
                            sink.emit(EngineEvent::CloneCompleted { request_id, result });
                        }
                    }
                });
            }
            EngineCommand::Cancel { request_id } => match in_flight.remove(&request_id) {
                Some(token) => token.cancel(),
                None => cloner_debug!("Cancel for unknown request {}", request_id),
            },
            EngineCommand::HealthCheck => {
                let client = client.clone();
                let sink = sink.clone();
                let token = root.child_token();
                runtime.spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        reachable = client.health_check() => {
                            sink.emit(EngineEvent::ServiceChecked { reachable });
                        }
                    }
                });
            }
        }
    }

    root.cancel();
    runtime.shutdown_background();
}
