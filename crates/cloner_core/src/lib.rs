//! Cloner core: pure submission lifecycle state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{CloneFailure, Msg};
pub use state::{
    AppState, Phase, RequestId, ServiceStatus, GENERIC_CONNECT_ERROR, GENERIC_RESPONSE_ERROR,
};
pub use update::{is_submittable_url, update};
pub use view_model::{AppViewModel, PhaseKind};
