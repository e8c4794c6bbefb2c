use std::sync::{mpsc, Arc};

use cloner_core::{CloneFailure, Effect, Msg};
use cloner_engine::{ClientSettings, EngineError, EngineEvent, EngineHandle, EventSink, FailureKind};
use cloner_logging::{cloner_debug, cloner_info};

/// Executes core effects against the engine and feeds results back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: &ClientSettings, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, Arc::new(MsgSink { msg_tx }))?;
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SendClone { request_id, url } => {
                    cloner_info!("SendClone request_id={} url={}", request_id, url);
                    self.engine.send_clone(request_id, url);
                }
                Effect::CancelClone { request_id } => {
                    cloner_info!("CancelClone request_id={}", request_id);
                    self.engine.cancel(request_id);
                }
            }
        }
    }

    pub fn health_check(&self) {
        self.engine.health_check();
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

struct MsgSink {
    msg_tx: mpsc::Sender<Msg>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        if self.msg_tx.send(map_event(event)).is_err() {
            cloner_debug!("View is gone; engine event dropped");
        }
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CloneCompleted { request_id, result } => Msg::CloneFinished {
            request_id,
            result: result.map_err(|err| map_failure(err.kind)),
        },
        EngineEvent::ServiceChecked { reachable } => Msg::ServiceChecked { reachable },
    }
}

fn map_failure(kind: FailureKind) -> CloneFailure {
    match kind {
        FailureKind::Transport => CloneFailure::Transport,
        FailureKind::Service { status, detail } => CloneFailure::Service { status, detail },
        FailureKind::MalformedResponse | FailureKind::TooLarge { .. } => {
            CloneFailure::MalformedResponse
        }
    }
}
