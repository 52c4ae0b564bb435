//! Job finder engine: upstream search client and effect execution.
mod credentials;
mod engine;
mod response;
mod search;
mod types;

pub use credentials::{CredentialProvider, StaticCredentials, DEFAULT_API_HOST};
pub use engine::EngineHandle;
pub use response::parse_hits;
pub use search::{
    ClientError, JobSearchClient, ReqwestSearchClient, SearchSettings, API_HOST_HEADER,
    API_KEY_HEADER, DEFAULT_ENDPOINT,
};
pub use types::{EngineEvent, FailureKind, JobPosting, RequestId, SearchError};
