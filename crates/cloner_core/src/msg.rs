use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL field.
    InputChanged(String),
    /// User submitted the form.
    Submitted,
    /// The network call for `request_id` resolved.
    CloneFinished {
        request_id: RequestId,
        result: Result<String, CloneFailure>,
    },
    /// Result of the startup health check.
    ServiceChecked { reachable: bool },
    /// The view is being torn down.
    ViewClosed,
    /// Render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Why a clone request did not produce a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneFailure {
    /// No response was received.
    Transport,
    /// Non-2xx response; `detail` is the service's message when one was sent.
    Service { status: u16, detail: Option<String> },
    /// 2xx response that could not be interpreted.
    MalformedResponse,
}

impl CloneFailure {
    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            CloneFailure::Transport => crate::GENERIC_CONNECT_ERROR.to_string(),
            CloneFailure::Service { status, detail } => match detail {
                Some(detail) if !detail.trim().is_empty() => detail.clone(),
                _ => format!("The cloning service returned an error (HTTP {status})."),
            },
            CloneFailure::MalformedResponse => crate::GENERIC_RESPONSE_ERROR.to_string(),
        }
    }
}
