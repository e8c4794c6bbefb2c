use cloner_core::{
    update, AppState, CloneFailure, Effect, Msg, Phase, PhaseKind, RequestId,
    GENERIC_CONNECT_ERROR, GENERIC_RESPONSE_ERROR,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    cloner_logging::initialize_for_tests();
}

fn submit_url(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::Submitted)
}

fn sent_request_id(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SendClone { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("send effect")
}

fn finish(state: AppState, request_id: RequestId, result: Result<String, CloneFailure>) -> AppState {
    let (state, effects) = update(state, Msg::CloneFinished { request_id, result });
    assert!(effects.is_empty());
    state
}

#[test]
fn submit_enters_loading_and_sends_trimmed_url() {
    init_logging();
    let (mut state, effects) = submit_url(AppState::new(), "  https://example.com  ");

    assert_eq!(
        effects,
        vec![Effect::SendClone {
            request_id: 1,
            url: "https://example.com".to_string(),
        }]
    );
    assert_eq!(
        state.phase(),
        &Phase::Loading {
            request_id: 1,
            url: "https://example.com".to_string(),
        }
    );
    let view = state.view();
    assert_eq!(view.phase, PhaseKind::Loading);
    assert_eq!(view.loading_url.as_deref(), Some("https://example.com"));
    assert!(!view.submit_enabled);
    assert_eq!(view.preview, None);
    assert_eq!(view.error, None);
    assert!(state.consume_dirty());
}

#[test]
fn success_stores_document() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "https://example.com");
    let request_id = sent_request_id(&effects);

    let state = finish(state, request_id, Ok("<html>...</html>".to_string()));

    let view = state.view();
    assert_eq!(view.phase, PhaseKind::Success);
    assert_eq!(view.preview.as_deref(), Some("<html>...</html>"));
    assert_eq!(view.error, None);
    assert!(view.submit_enabled);
}

#[test]
fn service_detail_is_shown_verbatim() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "https://bad.example");
    let request_id = sent_request_id(&effects);

    let state = finish(
        state,
        request_id,
        Err(CloneFailure::Service {
            status: 500,
            detail: Some("Could not fetch target page".to_string()),
        }),
    );

    let view = state.view();
    assert_eq!(view.phase, PhaseKind::Error);
    assert_eq!(view.error.as_deref(), Some("Could not fetch target page"));
    assert_eq!(view.preview, None);
}

#[test]
fn service_error_without_detail_falls_back() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "https://bad.example");
    let request_id = sent_request_id(&effects);

    let state = finish(
        state,
        request_id,
        Err(CloneFailure::Service {
            status: 502,
            detail: Some("   ".to_string()),
        }),
    );

    assert_eq!(
        state.view().error.as_deref(),
        Some("The cloning service returned an error (HTTP 502).")
    );
}

#[test]
fn transport_failure_shows_connect_message() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "https://example.com");
    let request_id = sent_request_id(&effects);

    let state = finish(state, request_id, Err(CloneFailure::Transport));

    let view = state.view();
    assert_eq!(view.phase, PhaseKind::Error);
    assert_eq!(view.error.as_deref(), Some(GENERIC_CONNECT_ERROR));
}

#[test]
fn malformed_success_body_resolves_to_error() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "https://example.com");
    let request_id = sent_request_id(&effects);

    let state = finish(state, request_id, Err(CloneFailure::MalformedResponse));

    assert_eq!(state.in_flight(), None);
    assert_eq!(state.view().error.as_deref(), Some(GENERIC_RESPONSE_ERROR));
}

#[test]
fn submit_while_loading_is_suppressed() {
    init_logging();
    let (mut state, _effects) = submit_url(AppState::new(), "https://example.com");
    assert!(state.consume_dirty());
    let before = state.clone();

    let (mut state, effects) = update(state, Msg::Submitted);

    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert!(!state.consume_dirty());
}

#[test]
fn resubmit_after_success_clears_previous_document() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "https://example.com");
    let first = sent_request_id(&effects);
    let state = finish(state, first, Ok("<html>old</html>".to_string()));

    let (state, effects) = update(state, Msg::Submitted);
    let second = sent_request_id(&effects);
    assert_ne!(first, second);
    assert_eq!(state.view().preview, None);
    assert_eq!(state.view().phase, PhaseKind::Loading);

    let state = finish(state, second, Err(CloneFailure::Transport));
    let view = state.view();
    assert_eq!(view.preview, None);
    assert_eq!(view.error.as_deref(), Some(GENERIC_CONNECT_ERROR));
}

#[test]
fn resubmit_after_error_clears_message() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "https://bad.example");
    let state = finish(state, sent_request_id(&effects), Err(CloneFailure::Transport));

    let (state, effects) = submit_url(state, "https://example.com");

    assert_eq!(effects.len(), 1);
    assert_eq!(state.view().error, None);
}

#[test]
fn invalid_input_is_not_submitted() {
    init_logging();
    for input in ["", "   ", "example.com", "not a url"] {
        let (state, effects) = submit_url(AppState::new(), input);
        assert!(effects.is_empty(), "input {input:?} should not submit");
        assert_eq!(state.phase(), &Phase::Idle);
        assert!(!state.view().submit_enabled);
    }
}

#[test]
fn stale_result_is_ignored() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "https://example.com");
    let request_id = sent_request_id(&effects);

    let state = finish(state, request_id + 7, Ok("<html>late</html>".to_string()));

    assert_eq!(state.in_flight(), Some(request_id));
    assert_eq!(state.view().phase, PhaseKind::Loading);
}

#[test]
fn result_while_idle_is_ignored() {
    init_logging();
    let state = finish(AppState::new(), 1, Ok("<html></html>".to_string()));
    assert_eq!(state.phase(), &Phase::Idle);
}

#[test]
fn view_closed_cancels_in_flight_request() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "https://example.com");
    let request_id = sent_request_id(&effects);

    let (state, effects) = update(state, Msg::ViewClosed);
    assert_eq!(effects, vec![Effect::CancelClone { request_id }]);
    assert!(!state.is_mounted());

    // A late result after teardown changes nothing.
    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::CloneFinished {
            request_id,
            result: Ok("<html>late</html>".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn view_closed_while_idle_emits_nothing() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ViewClosed);

    assert!(effects.is_empty());
    let (_state, effects) = submit_url(state, "https://example.com");
    assert!(effects.is_empty());
}

#[test]
fn service_check_is_reported_without_touching_phase() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::ServiceChecked { reachable: false });

    assert!(effects.is_empty());
    assert_eq!(state.view().service, cloner_core::ServiceStatus::Unreachable);
    assert_eq!(state.phase(), &Phase::Idle);
    assert!(state.consume_dirty());
}

#[test]
fn empty_document_resolves_to_error() {
    init_logging();
    for document in ["", "  \n\t "] {
        let (state, effects) = submit_url(AppState::new(), "https://example.com");
        let request_id = sent_request_id(&effects);

        let state = finish(state, request_id, Ok(document.to_string()));

        let view = state.view();
        assert_eq!(view.phase, PhaseKind::Error);
        assert_eq!(view.preview, None);
        assert_eq!(view.error.as_deref(), Some(GENERIC_RESPONSE_ERROR));
    }
}

#[test]
fn editing_input_while_loading_keeps_submitted_url() {
    init_logging();
    let (state, _effects) = submit_url(AppState::new(), "https://first.example");

    let (state, effects) = submit_url(state, "https://second.example");

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.url_input, "https://second.example");
    assert_eq!(view.loading_url.as_deref(), Some("https://first.example"));
}
