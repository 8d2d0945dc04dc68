use std::sync::Arc;

use crate::{
    AuthTransferCache, CallOptions, CredentialStore, EventSink, Fault, OriginalCall,
    RecoveryConfig, RecoveryError, Transport,
};

/// Collaborators shared by every recovery attempt of a dispatcher.
#[derive(Clone)]
pub struct Collaborators {
    pub transport: Arc<dyn Transport>,
    pub storage: Arc<dyn CredentialStore>,
    pub events: Arc<dyn EventSink>,
}

/// Everything one recovery attempt needs, assembled once per failed call.
pub struct RecoveryContext {
    fault: Fault,
    options: CallOptions,
    call: Arc<dyn OriginalCall>,
    collaborators: Collaborators,
    auth_cache: Arc<AuthTransferCache>,
    config: Arc<RecoveryConfig>,
}

impl RecoveryContext {
    pub fn new(
        fault: Fault,
        options: CallOptions,
        call: Arc<dyn OriginalCall>,
        collaborators: &Collaborators,
        auth_cache: &Arc<AuthTransferCache>,
        config: &Arc<RecoveryConfig>,
    ) -> Self {
        Self {
            fault,
            options,
            call,
            collaborators: collaborators.clone(),
            auth_cache: Arc::clone(auth_cache),
            config: Arc::clone(config),
        }
    }

    pub fn fault(&self) -> &Fault {
        &self.fault
    }

    pub fn options(&self) -> &CallOptions {
        &self.options
    }

    pub fn call(&self) -> &dyn OriginalCall {
        self.call.as_ref()
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.collaborators.transport
    }

    pub fn storage(&self) -> &dyn CredentialStore {
        self.collaborators.storage.as_ref()
    }

    pub fn events(&self) -> &dyn EventSink {
        self.collaborators.events.as_ref()
    }

    pub fn auth_cache(&self) -> &AuthTransferCache {
        &self.auth_cache
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Terminal error carrying the original fault.
    pub fn reject(&self) -> RecoveryError {
        RecoveryError::Rpc(self.fault.clone())
    }
}
