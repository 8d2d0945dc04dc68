//! Collaborator seams the recovery engine drives.
//!
//! Implementations live in the RPC client: the transport, the scheduler that
//! owns the failed call, credential storage and the event bus.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::Value;

use crate::{DcId, InvokeOptions, RequestOptions, Result};

/// Issues RPCs and hands out connections to datacenters.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one RPC.
    async fn invoke(&self, method: &str, params: Value, options: InvokeOptions) -> Result<Value>;

    /// Resolves or creates a usable connection to `dc_id`.
    async fn networker(
        &self,
        dc_id: DcId,
        options: &RequestOptions,
    ) -> Result<Arc<dyn Networker>>;
}

/// Connection bound to one datacenter.
pub trait Networker: Send + Sync {
    fn dc_id(&self) -> DcId;
}

/// The failed call being recovered.
///
/// Both methods run a new attempt of the same logical call; its result
/// settles the original caller.
#[async_trait]
pub trait OriginalCall: Send + Sync {
    /// Re-sends the call on `networker` right away.
    async fn resend(&self, networker: Arc<dyn Networker>) -> Result<Value>;

    /// Re-issues the call under its current options once `delay` elapses.
    async fn reissue_after(&self, delay: Duration) -> Result<Value>;
}

/// Persisted credential storage.
pub trait CredentialStore: Send + Sync {
    fn remove(&self, keys: &[&str]);

    /// Persists `dc_id` as the client's home datacenter.
    fn set_base_dc(&self, dc_id: DcId);
}

/// Fire-and-forget notification sink.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: RecoveryEvent);
}

/// Notifications emitted while recovering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RecoveryEvent {
    /// Home datacenter rejected the stored credential.
    HomeAuthInvalidated,
}

impl RecoveryEvent {
    /// Event name as published on the client's event bus.
    pub fn name(&self) -> &'static str {
        match self {
            Self::HomeAuthInvalidated => "error.401.base",
        }
    }
}
