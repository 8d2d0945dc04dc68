use crate::{DcId, Fault};

/// Error type returned by this crate.
///
/// Cloneable so a single authorization transfer can hand the same outcome to
/// every call waiting on it.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RecoveryError {
    /// Terminal server fault. Always the fault the failed call reported.
    #[error("rpc error {0}")]
    Rpc(Fault),
    /// Migration target is the datacenter the call already ran against.
    #[error("migration loop: server redirected dc {dc_id} to itself ({fault})")]
    RedirectLoop {
        /// Datacenter named by the redirect.
        dc_id: DcId,
        /// Fault carrying the redirect.
        fault: Fault,
    },
    /// Failure reported by a transport collaborator.
    #[error("transport error: {0}")]
    Transport(String),
    /// Collaborator returned a payload of an unexpected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// Shared authorization transfer task panicked or was cancelled.
    #[error("authorization transfer aborted: {0}")]
    TransferAborted(String),
}

impl RecoveryError {
    /// Returns the server fault carried by this error, if any.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Rpc(fault) | Self::RedirectLoop { fault, .. } => Some(fault),
            _ => None,
        }
    }
}

impl From<Fault> for RecoveryError {
    fn from(fault: Fault) -> Self {
        Self::Rpc(fault)
    }
}
