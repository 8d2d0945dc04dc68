use std::fmt;

use crate::Fault;

/// Recovery category of a [`Fault`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Home datacenter no longer accepts the stored credential.
    HomeAuthInvalid,
    /// A foreign datacenter has no authorization for this client yet.
    ForeignAuthInvalid,
    /// Server redirected the call to another datacenter.
    Migrate,
    /// Server asked the client to slow down.
    FloodWait,
    /// Generic server-side failure worth retrying with backoff.
    TransientServerFault,
    /// No recovery applies.
    Unclassified,
}

impl FaultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HomeAuthInvalid => "home_auth_invalid",
            Self::ForeignAuthInvalid => "foreign_auth_invalid",
            Self::Migrate => "migrate",
            Self::FloodWait => "flood_wait",
            Self::TransientServerFault => "transient_server_fault",
            Self::Unclassified => "unclassified",
        }
    }

    /// Whether recovery re-issues the call instead of settling it on the spot.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Migrate | Self::FloodWait | Self::TransientServerFault
        )
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Rule = (FaultKind, fn(&Fault) -> bool);

// Evaluated top to bottom. Both auth rules share code 401, so the home rule
// must stay first. The last rule matches everything.
const RULES: &[Rule] = &[
    (FaultKind::HomeAuthInvalid, is_home_auth_invalid),
    (FaultKind::ForeignAuthInvalid, is_foreign_auth_invalid),
    (FaultKind::Migrate, is_migrate),
    (FaultKind::FloodWait, is_flood_wait),
    (FaultKind::TransientServerFault, is_transient_server_fault),
    (FaultKind::Unclassified, always),
];

/// Returns the kind of the first rule matching `fault`.
pub fn classify(fault: &Fault) -> FaultKind {
    RULES
        .iter()
        .find(|(_, matches)| matches(fault))
        .map_or(FaultKind::Unclassified, |(kind, _)| *kind)
}

fn is_home_auth_invalid(fault: &Fault) -> bool {
    fault.has_code(401) && fault.targets_home()
}

fn is_foreign_auth_invalid(fault: &Fault) -> bool {
    fault.has_code(401) && !fault.targets_home()
}

fn is_migrate(fault: &Fault) -> bool {
    fault.has_code(303)
}

fn is_flood_wait(fault: &Fault) -> bool {
    fault.raw_error.is_none() && fault.has_code(420)
}

fn is_transient_server_fault(fault: &Fault) -> bool {
    fault.raw_error.is_none() && (fault.has_code(500) || fault.kind == "MSG_WAIT_FAILED")
}

fn always(_: &Fault) -> bool {
    true
}
