use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("empty QR payload")]
    Empty,

    #[error("'{0}' is not a luggage identifier")]
    BadIdentifier(String),

    #[error("'{0}' is not a vehicle identifier")]
    BadVehicle(String),
}

/// The decoded content of a luggage tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrPayload {
    pub public_id: i64,
    /// Absent on legacy tags.
    pub vehicle_id: Option<i64>,
}

impl QrPayload {
    pub fn new(public_id: i64, vehicle_id: i64) -> Self {
        Self {
            public_id,
            vehicle_id: Some(vehicle_id),
        }
    }

    pub fn legacy(public_id: i64) -> Self {
        Self {
            public_id,
            vehicle_id: None,
        }
    }

    /// The text stored in the QR code.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parse scanned text.
    ///
    /// Splits on the first colon. Text without a colon is a legacy tag whose
    /// whole content is the identifier. Surrounding whitespace is ignored.
    pub fn decode(text: &str) -> Result<Self, PayloadError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PayloadError::Empty);
        }

        match text.split_once(':') {
            Some((id, vehicle)) => {
                let public_id = parse_id(id)
                    .ok_or_else(|| PayloadError::BadIdentifier(id.trim().to_string()))?;
                let vehicle_id = parse_id(vehicle)
                    .ok_or_else(|| PayloadError::BadVehicle(vehicle.trim().to_string()))?;
                Ok(Self::new(public_id, vehicle_id))
            }
            None => parse_id(text)
                .map(Self::legacy)
                .ok_or_else(|| PayloadError::BadIdentifier(text.to_string())),
        }
    }
}

impl fmt::Display for QrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.vehicle_id {
            Some(vehicle_id) => write!(f, "{}:{}", self.public_id, vehicle_id),
            None => write!(f, "{}", self.public_id),
        }
    }
}

fn parse_id(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok().filter(|&id| id >= 1)
}
