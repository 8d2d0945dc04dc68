use serde::{Deserialize, Serialize};

pub(crate) const EXPORT_AUTHORIZATION: &str = "auth.exportAuthorization";
pub(crate) const IMPORT_AUTHORIZATION: &str = "auth.importAuthorization";

/// Fault record as surfaced by the transport.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FaultPayload {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "rawError", default, skip_serializing_if = "Option::is_none")]
    pub raw_error: Option<serde_json::Value>,
}

/// Authorization ticket returned by the home datacenter's export call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedAuthorization {
    pub id: i64,
    pub bytes: Vec<u8>,
}
