use crate::view_model::{AppViewModel, PhaseKind};
use crate::CloneFailure;

pub type RequestId = u64;

/// Shown when no response was received from the cloning service.
pub const GENERIC_CONNECT_ERROR: &str = "Failed to connect to the cloning service.";
/// Shown when a response arrived but could not be interpreted.
pub const GENERIC_RESPONSE_ERROR: &str = "The cloning service returned an unexpected response.";

/// Submission lifecycle. Each variant owns the data that only exists in it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading {
        request_id: RequestId,
        url: String,
    },
    Success {
        document: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceStatus {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    url_input: String,
    phase: Phase,
    next_request_id: RequestId,
    mounted: bool,
    service: ServiceStatus,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            url_input: String::new(),
            phase: Phase::Idle,
            next_request_id: 1,
            mounted: true,
            service: ServiceStatus::Unknown,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let (kind, loading_url, preview, error) = match &self.phase {
            Phase::Idle => (PhaseKind::Idle, None, None, None),
            Phase::Loading { url, .. } => (PhaseKind::Loading, Some(url.clone()), None, None),
            Phase::Success { document } => {
                (PhaseKind::Success, None, Some(document.clone()), None)
            }
            Phase::Error { message } => (PhaseKind::Error, None, None, Some(message.clone())),
        };
        AppViewModel {
            url_input: self.url_input.clone(),
            phase: kind,
            submit_enabled: self.mounted
                && kind != PhaseKind::Loading
                && crate::is_submittable_url(&self.url_input),
            loading_url,
            preview,
            error,
            service: self.service,
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Id of the request currently awaited, if any.
    pub fn in_flight(&self) -> Option<RequestId> {
        match self.phase {
            Phase::Loading { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.url_input != text {
            self.url_input = text;
            self.mark_dirty();
        }
    }

    /// Enters `Loading`, dropping any previous document or error.
    pub(crate) fn begin_request(&mut self, url: String) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.phase = Phase::Loading { request_id, url };
        self.mark_dirty();
        request_id
    }

    pub(crate) fn finish_request(&mut self, result: Result<String, CloneFailure>) {
        self.phase = match result {
            Ok(document) if !document.trim().is_empty() => Phase::Success { document },
            Ok(_) => Phase::Error {
                message: CloneFailure::MalformedResponse.user_message(),
            },
            Err(failure) => Phase::Error {
                message: failure.user_message(),
            },
        };
        self.mark_dirty();
    }

    pub(crate) fn set_service(&mut self, service: ServiceStatus) {
        if self.service != service {
            self.service = service;
            self.mark_dirty();
        }
    }

    /// Unmounts the view. Returns the request that was still in flight.
    pub(crate) fn close(&mut self) -> Option<RequestId> {
        let in_flight = self.in_flight();
        self.mounted = false;
        self.phase = Phase::Idle;
        self.mark_dirty();
        in_flight
    }
}
