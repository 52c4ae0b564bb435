#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The view became active; runs the one automatic search.
    Activated,
    /// User edited the query input.
    QueryChanged(String),
    /// User pressed the search control.
    SearchRequested,
    /// Engine finished a request, successfully or not.
    SearchSettled {
        request_id: crate::RequestId,
        outcome: Result<Vec<crate::Job>, crate::SearchFailure>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
