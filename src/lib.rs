//! `dc-recovery` classifies faults from a multi-datacenter RPC client and
//! drives their recovery.
//!
//! A failed call goes through [`Dispatcher::recover`], which picks one of:
//! - re-authorizing at a foreign datacenter (one transfer per datacenter,
//!   shared by concurrent callers)
//! - following a migration redirect
//! - waiting out a flood wait, or backing off on a transient server fault
//! - rejecting with the original fault
//!
//! The transport, scheduler, credential store and event bus stay with the
//! client and are reached through the traits in this crate.

mod classify;
mod collab;
mod context;
mod dispatcher;
mod error;
mod options;
mod single_flight;
mod strategy;
mod types;
pub mod wire;

pub use classify::{classify, FaultKind};
pub use collab::{CredentialStore, EventSink, Networker, OriginalCall, RecoveryEvent, Transport};
pub use context::{Collaborators, RecoveryContext};
pub use dispatcher::Dispatcher;
pub use error::RecoveryError;
pub use options::{CallOptions, InvokeOptions, RecoveryConfig, RequestOptions};
pub use single_flight::{AuthTransferCache, SharedTransfer};
pub use types::{DcId, Fault};

pub type Result<T> = std::result::Result<T, RecoveryError>;
