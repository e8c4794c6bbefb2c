use crate::ServiceStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseKind {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub url_input: String,
    pub phase: PhaseKind,
    /// False while loading or when the input would not be accepted.
    pub submit_enabled: bool,
    /// Document for the preview sandbox; only set in `Success`.
    /// URL of the request in flight; only set in `Loading`.
    pub loading_url: Option<String>,
    pub preview: Option<String>,
    /// Only set in `Error`.
    pub error: Option<String>,
    pub service: ServiceStatus,
    pub dirty: bool,
}
