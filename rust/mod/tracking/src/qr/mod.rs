//! QR payloads and rendering.
//!
//! A luggage tag encodes the text `"<publicId>:<vehicleId>"`. Tags printed
//! before the vehicle suffix existed carry a bare identifier, which is read
//! as a public ID.
//!
//! ```rust
//! use tracking::qr::QrPayload;
//!
//! let payload = QrPayload::new(45, 3);
//! assert_eq!(payload.encode(), "45:3");
//!
//! let scanned = QrPayload::decode("45:3").unwrap();
//! assert_eq!(scanned.public_id, 45);
//! assert_eq!(scanned.vehicle_id, Some(3));
//! ```

pub mod payload;
pub mod render;

pub use payload::{PayloadError, QrPayload};
pub use render::{QrRenderer, RenderError, SvgQrRenderer};
