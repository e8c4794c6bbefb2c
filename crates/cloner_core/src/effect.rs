use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the URL to the cloning service.
    SendClone { request_id: RequestId, url: String },
    /// Abandon an in-flight request; its result must not be delivered.
    CancelClone { request_id: RequestId },
}
