use std::fmt;

use crate::view_model::{AppViewModel, JobCardView};

/// Seed term used for the automatic search on activation.
pub const DEFAULT_QUERY: &str = "ReactJs";

pub type RequestId = u64;

/// One posting as displayed. Attributes missing upstream are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Job {
    pub title: String,
    pub description: String,
    pub hiring_organization: String,
    pub location_name: String,
    pub date_posted: String,
    pub url: String,
}

/// How settles of overlapping searches are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Only the most recently issued request may change the view.
    #[default]
    LatestIssued,
    /// Every settle is applied in arrival order; the last one wins.
    LastSettled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    HttpStatus(u16),
    TooLarge,
    MalformedBody,
    MissingHits,
    MissingCredentials,
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "request timed out"),
            FailureKind::HttpStatus(code) => write!(f, "upstream returned HTTP {code}"),
            FailureKind::TooLarge => write!(f, "response too large"),
            FailureKind::MalformedBody => write!(f, "response was not valid JSON"),
            FailureKind::MissingHits => write!(f, "response had no job list"),
            FailureKind::MissingCredentials => write!(f, "no API key configured"),
            FailureKind::Internal => write!(f, "search failed unexpectedly"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SearchFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// State of the search view.
///
/// `results` is empty whenever `loading` is true: dispatch clears the result
/// set before raising the flag, and only a settle lowers it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    query: String,
    default_query: String,
    results: Vec<Job>,
    loading: bool,
    error: Option<SearchFailure>,
    activated: bool,
    policy: OverlapPolicy,
    last_issued: RequestId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(DEFAULT_QUERY, OverlapPolicy::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(default_query: impl Into<String>, policy: OverlapPolicy) -> Self {
        let default_query = default_query.into();
        Self {
            query: default_query.clone(),
            default_query,
            results: Vec::new(),
            loading: false,
            error: None,
            activated: false,
            policy,
            last_issued: 0,
            dirty: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Job] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&SearchFailure> {
        self.error.as_ref()
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn last_issued(&self) -> RequestId {
        self.last_issued
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            query: self.query.clone(),
            loading: self.loading,
            error: self
                .error
                .as_ref()
                .map(|failure| format!("Search failed: {}", failure.kind)),
            cards: self
                .results
                .iter()
                .enumerate()
                .map(|(index, job)| JobCardView::from_job(index, job))
                .collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Marks the view active. Returns false if it already was.
    pub(crate) fn activate(&mut self) -> bool {
        if self.activated {
            return false;
        }
        self.activated = true;
        self.query = self.default_query.clone();
        self.mark_dirty();
        true
    }

    pub(crate) fn set_query(&mut self, text: String) {
        if self.query != text {
            self.query = text;
            self.mark_dirty();
        }
    }

    /// Enters the loading state and allocates the id for the new request.
    pub(crate) fn begin_search(&mut self) -> RequestId {
        self.results.clear();
        self.error = None;
        self.loading = true;
        self.last_issued += 1;
        self.mark_dirty();
        self.last_issued
    }

    /// Whether a settle for `request_id` may change the view under the
    /// configured policy.
    pub(crate) fn accepts_settle(&self, request_id: RequestId) -> bool {
        if request_id == 0 || request_id > self.last_issued {
            return false;
        }
        match self.policy {
            OverlapPolicy::LatestIssued => request_id == self.last_issued,
            OverlapPolicy::LastSettled => true,
        }
    }

    pub(crate) fn apply_results(&mut self, jobs: Vec<Job>) {
        self.results = jobs;
        self.error = None;
        self.loading = false;
        self.mark_dirty();
    }

    pub(crate) fn apply_failure(&mut self, failure: SearchFailure) {
        self.results.clear();
        self.error = Some(failure);
        self.loading = false;
        self.mark_dirty();
    }
}
