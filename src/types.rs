use std::fmt;

use serde::{Deserialize, Serialize};

use crate::wire::FaultPayload;

/// Datacenter identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DcId(pub u32);

impl fmt::Display for DcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for DcId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Normalized server fault for a failed call.
#[derive(Clone, Debug, PartialEq)]
pub struct Fault {
    /// Numeric fault code. `None` never compares equal to any code.
    pub code: Option<i32>,
    /// Fault type string, e.g. `FLOOD_WAIT_30`. Empty when absent.
    pub kind: String,
    /// Lower-level transport error attached to the fault.
    pub raw_error: Option<serde_json::Value>,
    /// Datacenter the failed call targeted.
    pub dc_id: DcId,
    /// Client's home datacenter at the time of the call.
    pub base_dc_id: DcId,
}

impl Fault {
    /// Builds a fault with a code and no raw transport error.
    pub fn new(code: i32, kind: impl Into<String>, dc_id: DcId, base_dc_id: DcId) -> Self {
        Self {
            code: Some(code),
            kind: kind.into(),
            raw_error: None,
            dc_id,
            base_dc_id,
        }
    }

    /// Builds a fault from the record surfaced by the transport.
    pub fn from_wire(payload: FaultPayload, dc_id: DcId, base_dc_id: DcId) -> Self {
        Self {
            code: payload.code,
            kind: payload.kind,
            raw_error: payload.raw_error,
            dc_id,
            base_dc_id,
        }
    }

    /// Attaches the lower-level transport error.
    pub fn with_raw_error(mut self, raw_error: serde_json::Value) -> Self {
        self.raw_error = Some(raw_error);
        self
    }

    /// Whether the fault carries exactly `code`.
    pub fn has_code(&self, code: i32) -> bool {
        self.code == Some(code)
    }

    /// Whether the failed call targeted the home datacenter.
    pub fn targets_home(&self) -> bool {
        self.dc_id == self.base_dc_id
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{code}")?,
            None => f.write_str("NaN")?,
        }
        if !self.kind.is_empty() {
            write!(f, " {}", self.kind)?;
        }
        write!(f, " at dc {}", self.dc_id)
    }
}
