use serde::{Deserialize, Serialize};

use super::Vehicle;

/// A GPS fix. Latitude and longitude always travel together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
}

impl GeoPoint {
    /// Reject non-finite or out-of-range coordinates.
    pub fn validate(&self) -> Result<(), String> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("latitude {} is out of range", self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("longitude {} is out of range", self.longitude));
        }
        Ok(())
    }
}

/// A luggage item.
///
/// Items are always created with a vehicle, slot, public ID and QR code; the
/// fields are optional only so rows written by older deployments still load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Luggage {
    pub id: i64,
    pub sender_id: i64,
    pub color: String,
    pub shape: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub vehicle_id: Option<i64>,
    pub slot: Option<u32>,
    pub public_id: Option<i64>,
    pub qr_payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    /// Last reported latitude. Set together with `gps_lng`.
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub created_at: String,
}

impl Luggage {
    /// Last reported location, if any.
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.gps_lat, self.gps_lng) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint { latitude, longitude }),
            _ => None,
        }
    }
}

/// Request body for registering luggage.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLuggage {
    pub sender_id: i64,
    pub vehicle_id: i64,
    pub color: String,
    pub shape: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Returned once a luggage item has been registered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLuggage {
    pub luggage_id: i64,
    pub vehicle_id: i64,
    pub slot: u32,
    pub public_id: i64,
    pub qr_payload: String,
    /// Image data URL of the rendered QR code.
    pub qr_code: String,
}

/// How a caller names a luggage item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuggageRef {
    /// The storage-assigned id.
    Id(i64),
    /// The public ID printed on the tag.
    Public(i64),
}

/// A resolved scan: the item plus the vehicle carrying it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub luggage: Luggage,
    pub vehicle: Option<Vehicle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_point_bounds() {
        let ok = GeoPoint { latitude: -90.0, longitude: 180.0 };
        assert!(ok.validate().is_ok());

        for (lat, lng) in [(90.5, 0.0), (0.0, -180.1), (f64::NAN, 0.0), (0.0, f64::INFINITY)] {
            let p = GeoPoint { latitude: lat, longitude: lng };
            assert!(p.validate().is_err(), "{:?} accepted", p);
        }
    }

    #[test]
    fn new_luggage_from_camel_case() {
        let input: NewLuggage = serde_json::from_str(
            r#"{"senderId": 4, "vehicleId": 2, "color": "red", "shape": "duffel"}"#,
        )
        .unwrap();
        assert_eq!(input.sender_id, 4);
        assert_eq!(input.vehicle_id, 2);
        assert_eq!(input.description, None);
    }
}
