use std::{fmt, sync::Arc};

use serde_json::Value;

use crate::{
    classify, strategy, AuthTransferCache, CallOptions, Collaborators, CredentialStore, EventSink,
    Fault, FaultKind, OriginalCall, RecoveryConfig, RecoveryContext, Result, Transport,
};

/// Routes failed calls to the recovery action for their fault.
#[derive(Clone)]
pub struct Dispatcher {
    collaborators: Collaborators,
    auth_cache: Arc<AuthTransferCache>,
    config: Arc<RecoveryConfig>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("auth_cache", &self.auth_cache)
            .field("config", &self.config)
            .finish()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with default config and its own auth cache.
    pub fn new(
        transport: Arc<dyn Transport>,
        storage: Arc<dyn CredentialStore>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            collaborators: Collaborators {
                transport,
                storage,
                events,
            },
            auth_cache: Arc::new(AuthTransferCache::new()),
            config: Arc::new(RecoveryConfig::default()),
        }
    }

    /// Applies recovery limits and defaults.
    pub fn with_config(mut self, config: RecoveryConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Shares an auth cache with other dispatchers of the same process.
    pub fn with_auth_cache(mut self, auth_cache: Arc<AuthTransferCache>) -> Self {
        self.auth_cache = auth_cache;
        self
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Recovers a call that failed with `fault`.
    ///
    /// Resolves with the result of the re-issued call when recovery succeeds.
    /// Terminal faults come back as [`RecoveryError::Rpc`](crate::RecoveryError::Rpc)
    /// holding `fault` itself.
    pub async fn recover(
        &self,
        fault: Fault,
        options: &CallOptions,
        call: Arc<dyn OriginalCall>,
    ) -> Result<Value> {
        let kind = classify(&fault);

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %kind, fault = %fault, "recovering failed call");

        let ctx = RecoveryContext::new(
            fault,
            options.clone(),
            call,
            &self.collaborators,
            &self.auth_cache,
            &self.config,
        );

        let outcome = match kind {
            FaultKind::HomeAuthInvalid => strategy::home_auth_invalid(&ctx).await,
            FaultKind::ForeignAuthInvalid => strategy::foreign_auth_invalid(&ctx).await,
            FaultKind::Migrate => strategy::migrate(&ctx).await,
            FaultKind::FloodWait => strategy::flood_wait(&ctx).await,
            FaultKind::TransientServerFault => strategy::transient_server_fault(&ctx).await,
            FaultKind::Unclassified => strategy::unclassified(&ctx).await,
        };

        #[cfg(feature = "tracing")]
        if let Err(err) = &outcome {
            tracing::debug!(kind = %kind, error = %err, "call rejected");
        }

        outcome
    }
}
