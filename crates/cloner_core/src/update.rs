use cloner_logging::{cloner_debug, cloner_info, cloner_warn};

use crate::{AppState, Effect, Msg, ServiceStatus};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    // Once the view is gone every message, including late results, is dropped.
    if !state.is_mounted() {
        cloner_debug!("Dropping {:?} after view was closed", msg);
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::Submitted => {
            if let Some(request_id) = state.in_flight() {
                cloner_debug!("Submit suppressed; request {} still in flight", request_id);
                return (state, Vec::new());
            }
            let url = state.url_input().trim().to_string();
            if !is_submittable_url(&url) {
                cloner_debug!("Submit ignored; input is not an absolute URL: {:?}", url);
                return (state, Vec::new());
            }
            let request_id = state.begin_request(url.clone());
            cloner_info!("Clone request {} started for {}", request_id, url);
            vec![Effect::SendClone { request_id, url }]
        }
        Msg::CloneFinished { request_id, result } => {
            if state.in_flight() != Some(request_id) {
                cloner_debug!("Ignoring stale result for request {}", request_id);
                return (state, Vec::new());
            }
            match &result {
                Ok(document) => cloner_info!(
                    "Clone request {} succeeded ({} bytes)",
                    request_id,
                    document.len()
                ),
                Err(failure) => {
                    cloner_warn!("Clone request {} failed: {:?}", request_id, failure)
                }
            }
            state.finish_request(result);
            Vec::new()
        }
        Msg::ServiceChecked { reachable } => {
            state.set_service(if reachable {
                ServiceStatus::Reachable
            } else {
                ServiceStatus::Unreachable
            });
            Vec::new()
        }
        Msg::ViewClosed => match state.close() {
            Some(request_id) => {
                cloner_info!("View closed; cancelling request {}", request_id);
                vec![Effect::CancelClone { request_id }]
            }
            None => Vec::new(),
        },
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Accepts what a native URL field would: a non-blank absolute URL.
pub fn is_submittable_url(input: &str) -> bool {
    let trimmed = input.trim();
    !trimmed.is_empty() && url::Url::parse(trimmed).is_ok()
}
