pub mod custody;
pub mod luggage;
pub mod stats;
pub mod vehicle;

pub use custody::{CustodyLog, NewCustodyLog};
pub use luggage::{CreatedLuggage, GeoPoint, Luggage, LuggageRef, NewLuggage, ScanResult};
pub use stats::{LuggageCounts, TrackingStats, VehicleCounts};
pub use vehicle::{CreatedVehicle, Manifest, NewVehicle, SlotEntry, Vehicle};
