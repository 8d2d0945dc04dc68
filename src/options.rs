use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::time::Instant;

use crate::DcId;

/// Configures the limits and defaults used by recovery strategies.
#[derive(Clone, Debug, PartialEq)]
pub struct RecoveryConfig {
    /// Persisted keys holding the home datacenter credential.
    pub home_auth_keys: Vec<String>,
    /// Flood wait used when the fault type carries no duration.
    pub flood_wait_default_secs: u64,
    /// Longest acceptable flood wait when the call sets no timeout.
    pub flood_wait_ceiling_secs: u64,
    /// Transient fault retry window when the call sets no timeout.
    pub transient_timeout_secs: u64,
    /// Delay before the first transient fault retry.
    pub initial_backoff: Duration,
    /// Upper bound for transient fault retry delay.
    pub max_backoff: Duration,
    /// Growth factor applied to the previous retry delay.
    ///
    /// Products that are negative, NaN or too large for a [`Duration`]
    /// fall back to `max_backoff`.
    pub backoff_multiplier: f64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            home_auth_keys: vec!["dc".to_owned(), "user_auth".to_owned()],
            flood_wait_default_secs: 10,
            flood_wait_ceiling_secs: 60,
            transient_timeout_secs: 10,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            backoff_multiplier: 1.5,
        }
    }
}

impl RecoveryConfig {
    pub(crate) fn next_backoff(&self, previous: Option<Duration>) -> Duration {
        match previous {
            Some(previous) => {
                Duration::try_from_secs_f64(previous.as_secs_f64() * self.backoff_multiplier)
                    .map_or(self.max_backoff, |next| next.min(self.max_backoff))
            }
            None => self.initial_backoff,
        }
    }
}

/// Per-call options carried across retries of the same logical call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Datacenter forced for this call instead of the home one.
    pub dc_override: Option<DcId>,
    /// Call timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Point after which transient faults stop being retried.
    pub deadline: Option<Instant>,
    /// Delay used for the latest transient fault retry.
    pub backoff: Option<Duration>,
}

impl RequestOptions {
    pub fn with_dc_override(mut self, dc_id: DcId) -> Self {
        self.dc_override = Some(dc_id);
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

/// Shared handle to the [`RequestOptions`] of one logical call.
///
/// Clones observe the same options, so a re-issued attempt sees the
/// deadline and backoff stored by the previous recovery round.
#[derive(Clone, Debug, Default)]
pub struct CallOptions(Arc<Mutex<RequestOptions>>);

impl CallOptions {
    pub fn new(options: RequestOptions) -> Self {
        Self(Arc::new(Mutex::new(options)))
    }

    /// Returns a copy of the current options.
    pub fn snapshot(&self) -> RequestOptions {
        self.lock().clone()
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut RequestOptions) -> R) -> R {
        f(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, RequestOptions> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<RequestOptions> for CallOptions {
    fn from(options: RequestOptions) -> Self {
        Self::new(options)
    }
}

/// Options for a single collaborator RPC issued during recovery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    /// Target datacenter. `None` means the home datacenter.
    pub dc_id: Option<DcId>,
    /// Skip the transport's generic error wrapping; the caller handles failures.
    pub no_error_box: bool,
}

impl InvokeOptions {
    pub(crate) fn unboxed() -> Self {
        Self {
            dc_id: None,
            no_error_box: true,
        }
    }

    pub(crate) fn at(mut self, dc_id: DcId) -> Self {
        self.dc_id = Some(dc_id);
        self
    }
}
