use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send one search request upstream; its outcome must come back as
    /// `Msg::SearchSettled` carrying the same `request_id`.
    DispatchSearch { request_id: RequestId, query: String },
}
