use std::{
    collections::HashMap,
    fmt,
    future::Future,
    sync::{Mutex, PoisonError},
};

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::{DcId, RecoveryError, Result};

/// Awaitable outcome of one authorization transfer, shared by every caller.
pub type SharedTransfer = Shared<BoxFuture<'static, Result<()>>>;

/// Per-datacenter single-flight cache of authorization transfers.
///
/// The first caller for a datacenter starts the transfer; later callers join
/// it and observe the same outcome. Entries are kept for the lifetime of the
/// cache, including failed ones.
#[derive(Default)]
pub struct AuthTransferCache {
    transfers: Mutex<HashMap<DcId, SharedTransfer>>,
}

impl AuthTransferCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the transfer for `dc_id`, starting it with `create` if none exists.
    ///
    /// The transfer runs as its own tokio task, so it keeps going when a
    /// waiter drops its handle. Must be called from within a tokio runtime.
    pub fn acquire<F, Fut>(&self, dc_id: DcId, create: F) -> SharedTransfer
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let mut transfers = self
            .transfers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        transfers
            .entry(dc_id)
            .or_insert_with(|| {
                #[cfg(feature = "tracing")]
                tracing::debug!(dc_id = dc_id.0, "starting authorization transfer");

                let task = tokio::spawn(create());
                async move {
                    match task.await {
                        Ok(outcome) => outcome,
                        Err(err) => Err(RecoveryError::TransferAborted(err.to_string())),
                    }
                }
                .boxed()
                .shared()
            })
            .clone()
    }
}

impl fmt::Debug for AuthTransferCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let transfers = self
            .transfers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut dc_ids: Vec<_> = transfers.keys().copied().collect();
        dc_ids.sort();
        f.debug_struct("AuthTransferCache")
            .field("dc_ids", &dc_ids)
            .finish()
    }
}
