use finder_logging::{finder_debug, finder_info, finder_warn};

use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Activated => {
            if state.activate() {
                vec![dispatch(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::QueryChanged(text) => {
            state.set_query(text);
            Vec::new()
        }
        Msg::SearchRequested => vec![dispatch(&mut state)],
        Msg::SearchSettled {
            request_id,
            outcome,
        } => {
            if !state.accepts_settle(request_id) {
                finder_debug!(
                    "Discarding settle for request {} (latest issued {})",
                    request_id,
                    state.last_issued()
                );
                return (state, Vec::new());
            }
            match outcome {
                Ok(jobs) => {
                    finder_info!("Request {} settled with {} jobs", request_id, jobs.len());
                    state.apply_results(jobs);
                }
                Err(failure) => {
                    finder_warn!(
                        "Request {} failed: {} ({})",
                        request_id,
                        failure.kind,
                        failure.message
                    );
                    state.apply_failure(failure);
                }
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn dispatch(state: &mut AppState) -> Effect {
    let request_id = state.begin_search();
    Effect::DispatchSearch {
        request_id,
        query: state.query().to_owned(),
    }
}
