//! Recovery actions, one per [`FaultKind`](crate::FaultKind).
//!
//! Each returns the settlement of the original call: `Ok` with the result of
//! a successful re-issue, or `Err` with the terminal error.

use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use regex::Regex;
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::{
    wire::{ExportedAuthorization, EXPORT_AUTHORIZATION, IMPORT_AUTHORIZATION},
    DcId, InvokeOptions, RecoveryContext, RecoveryError, RecoveryEvent, Result, Transport,
};

// Deadline used when the call timeout does not fit on the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

static MIGRATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(PHONE_MIGRATE_|NETWORK_MIGRATE_|USER_MIGRATE_)(\d+)")
        .expect("migrate pattern must compile")
});

static FLOOD_WAIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^FLOOD_WAIT_(\d+)").expect("flood wait pattern must compile"));

pub(crate) async fn home_auth_invalid(ctx: &RecoveryContext) -> Result<Value> {
    let keys: Vec<&str> = ctx
        .config()
        .home_auth_keys
        .iter()
        .map(String::as_str)
        .collect();
    ctx.storage().remove(&keys);
    ctx.events().emit(RecoveryEvent::HomeAuthInvalidated);

    #[cfg(feature = "tracing")]
    tracing::warn!(dc_id = ctx.fault().dc_id.0, "home authorization invalidated");

    Err(ctx.reject())
}

pub(crate) async fn foreign_auth_invalid(ctx: &RecoveryContext) -> Result<Value> {
    let dc_id = ctx.fault().dc_id;
    let transport = Arc::clone(ctx.transport());
    let transfer = ctx
        .auth_cache()
        .acquire(dc_id, move || transfer_authorization(transport, dc_id));
    transfer.await?;

    let options = ctx.options().snapshot();
    let networker = ctx.transport().networker(dc_id, &options).await?;
    ctx.call().resend(networker).await
}

/// Exports the home authorization and imports it at `dc_id`.
async fn transfer_authorization(transport: Arc<dyn Transport>, dc_id: DcId) -> Result<()> {
    let exported = transport
        .invoke(
            EXPORT_AUTHORIZATION,
            json!({ "dc_id": dc_id }),
            InvokeOptions::unboxed(),
        )
        .await?;
    let exported: ExportedAuthorization = serde_json::from_value(exported)
        .map_err(|err| RecoveryError::Decode(format!("invalid exported authorization: {err}")))?;

    #[cfg(feature = "tracing")]
    tracing::debug!(dc_id = dc_id.0, id = exported.id, "importing authorization");

    transport
        .invoke(
            IMPORT_AUTHORIZATION,
            json!({ "id": exported.id, "bytes": exported.bytes }),
            InvokeOptions::unboxed().at(dc_id),
        )
        .await?;
    Ok(())
}

pub(crate) async fn migrate(ctx: &RecoveryContext) -> Result<Value> {
    let fault = ctx.fault();
    let Some(target) = migrate_target(&fault.kind) else {
        return Err(ctx.reject());
    };
    if target == fault.dc_id {
        return Err(RecoveryError::RedirectLoop {
            dc_id: target,
            fault: fault.clone(),
        });
    }

    let options = ctx.options().update(|options| {
        if let Some(dc_override) = options.dc_override.as_mut() {
            *dc_override = target;
        }
        options.clone()
    });
    if options.dc_override.is_none() {
        ctx.storage().set_base_dc(target);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(from = fault.dc_id.0, to = target.0, "following migration");

    let networker = ctx.transport().networker(target, &options).await?;
    ctx.call().resend(networker).await
}

pub(crate) async fn flood_wait(ctx: &RecoveryContext) -> Result<Value> {
    let config = ctx.config();
    let wait_secs = flood_wait_secs(&ctx.fault().kind).unwrap_or(config.flood_wait_default_secs);
    let ceiling = ctx
        .options()
        .snapshot()
        .timeout_secs
        .unwrap_or(config.flood_wait_ceiling_secs);
    if wait_secs > ceiling {
        return Err(ctx.reject());
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(wait_secs, "flood wait, re-issuing later");

    ctx.call().reissue_after(Duration::from_secs(wait_secs)).await
}

pub(crate) async fn transient_server_fault(ctx: &RecoveryContext) -> Result<Value> {
    let config = ctx.config();
    let now = Instant::now();
    let delay = ctx.options().update(|options| {
        match options.deadline {
            Some(deadline) if now >= deadline => return None,
            Some(_) => {}
            None => {
                let timeout = options.timeout_secs.unwrap_or(config.transient_timeout_secs);
                options.deadline = Some(
                    now.checked_add(Duration::from_secs(timeout))
                        .unwrap_or_else(|| now + FAR_FUTURE),
                );
            }
        }
        let delay = config.next_backoff(options.backoff);
        options.backoff = Some(delay);
        Some(delay)
    });
    let Some(delay) = delay else {
        #[cfg(feature = "tracing")]
        tracing::warn!("transient fault retry deadline passed");
        return Err(ctx.reject());
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(delay_ms = delay.as_millis() as u64, "transient fault, backing off");

    ctx.call().reissue_after(delay).await
}

pub(crate) async fn unclassified(ctx: &RecoveryContext) -> Result<Value> {
    Err(ctx.reject())
}

fn migrate_target(kind: &str) -> Option<DcId> {
    let captures = MIGRATE_RE.captures(kind)?;
    captures.get(2)?.as_str().parse().ok().map(DcId)
}

// Digits that overflow `u64` still name a wait, just one longer than any timeout.
fn flood_wait_secs(kind: &str) -> Option<u64> {
    let captures = FLOOD_WAIT_RE.captures(kind)?;
    Some(captures.get(1)?.as_str().parse().unwrap_or(u64::MAX))
}
