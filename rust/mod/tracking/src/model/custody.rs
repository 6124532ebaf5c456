use serde::{Deserialize, Serialize};

/// One hand-over of a luggage item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodyLog {
    pub id: i64,
    pub luggage_id: i64,
    pub handler_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// RFC 3339.
    pub timestamp: String,
}

/// Request body for a hand-over.
///
/// The item is named by exactly one of `luggageId`, `publicId` or the
/// scanned tag text in `payload`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustodyLog {
    #[serde(default)]
    pub luggage_id: Option<i64>,
    #[serde(default)]
    pub public_id: Option<i64>,
    #[serde(default)]
    pub payload: Option<String>,
    pub handler_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Defaults to now.
    #[serde(default)]
    pub timestamp: Option<String>,
}
