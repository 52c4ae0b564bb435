use std::io;
use std::sync::Arc;

use finder_core::{Effect, FailureKind, Job, Msg, SearchFailure};
use finder_engine::{EngineEvent, EngineHandle, JobPosting, JobSearchClient, SearchError};
use finder_logging::finder_info;

/// Executes core effects on the engine and turns engine events back into
/// messages for `update`.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(client: Arc<dyn JobSearchClient>) -> io::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(client)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::DispatchSearch { request_id, query } => {
                    finder_info!(
                        "DispatchSearch request_id={} query_len={}",
                        request_id,
                        query.len()
                    );
                    self.engine.search(request_id, query);
                }
            }
        }
    }

    /// Collects every engine event that is ready, without blocking.
    pub fn drain(&self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            inbox.push(map_event(event));
        }
        inbox
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SearchCompleted { request_id, result } => Msg::SearchSettled {
            request_id,
            outcome: result
                .map(|postings| postings.into_iter().map(map_job).collect())
                .map_err(map_failure),
        },
    }
}

fn map_job(posting: JobPosting) -> Job {
    Job {
        title: posting.title,
        description: posting.description,
        hiring_organization: posting.hiring_organization,
        location_name: posting.location_name,
        date_posted: posting.date_posted,
        url: posting.url,
    }
}

fn map_failure(err: SearchError) -> SearchFailure {
    let kind = match err.kind {
        finder_engine::FailureKind::Network => FailureKind::Network,
        finder_engine::FailureKind::Timeout => FailureKind::Timeout,
        finder_engine::FailureKind::HttpStatus(code) => FailureKind::HttpStatus(code),
        finder_engine::FailureKind::TooLarge { .. } => FailureKind::TooLarge,
        finder_engine::FailureKind::MalformedBody => FailureKind::MalformedBody,
        finder_engine::FailureKind::MissingHits => FailureKind::MissingHits,
        finder_engine::FailureKind::MissingCredentials => FailureKind::MissingCredentials,
        finder_engine::FailureKind::Internal => FailureKind::Internal,
    };
    SearchFailure::new(kind, err.message)
}
