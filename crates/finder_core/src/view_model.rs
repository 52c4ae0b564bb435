use url::Url;

use crate::Job;

/// `rel` carried by every outbound job link.
pub const LINK_REL: &str = "noopener noreferrer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// Opened outside the view, never replacing it.
    NewBrowsingContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub href: String,
    pub target: LinkTarget,
    pub rel: &'static str,
}

impl LinkView {
    fn external(href: &str) -> Self {
        Self {
            href: href.to_owned(),
            target: LinkTarget::NewBrowsingContext,
            rel: LINK_REL,
        }
    }

    /// Only absolute http(s) urls are handed to a browser.
    pub fn is_navigable(&self) -> bool {
        Url::parse(&self.href)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCardView {
    /// Position in the result set; the only display key.
    pub key: usize,
    pub link: LinkView,
    pub title: String,
    pub description: String,
    pub organization: String,
    pub location: String,
    pub date_posted: String,
}

impl JobCardView {
    pub(crate) fn from_job(key: usize, job: &Job) -> Self {
        Self {
            key,
            link: LinkView::external(&printable(&job.url)),
            title: printable(&job.title),
            description: job
                .description
                .lines()
                .map(printable)
                .collect::<Vec<_>>()
                .join("\n"),
            organization: printable(&job.hiring_organization),
            location: printable(&job.location_name),
            date_posted: printable(&job.date_posted),
        }
    }
}

/// Upstream text must not reach the terminal as control sequences.
fn printable(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\t' => ' ',
            ch if ch.is_control() => char::REPLACEMENT_CHARACTER,
            ch => ch,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub cards: Vec<JobCardView>,
    pub dirty: bool,
}
