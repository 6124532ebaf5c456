use serde::Serialize;

use super::CustodyLog;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LuggageCounts {
    pub total: i64,
    /// Items with a reported location.
    pub located: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCounts {
    pub total: i64,
    /// Vehicles with every slot occupied.
    pub full: i64,
}

/// Dashboard counters over vehicles, luggage and custody.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStats {
    pub luggage: LuggageCounts,
    pub vehicles: VehicleCounts,
    pub custody_logs: i64,
    /// Newest custody logs first.
    pub recent_activity: Vec<CustodyLog>,
}
