//! Per-vehicle slot allocation and public-ID derivation.
//!
//! Every vehicle carries at most [`CAPACITY`] luggage items. Each item holds
//! a slot in `1..=CAPACITY`, unique within its vehicle, and a public ID that
//! packs `(vehicle_id, slot)` into one integer:
//!
//! ```text
//! public_id = (vehicle_id - 1) * CAPACITY + slot
//! ```
//!
//! The mapping is a bijection between `{vehicle_id >= 1} x {1..=CAPACITY}`
//! and `{public_id >= 1}`, so public IDs are globally unique as long as
//! vehicle IDs are. Nothing here touches storage: callers pass in the set of
//! slots already taken, read inside the same transaction that will insert.

use thiserror::Error;

/// Maximum luggage items per vehicle.
pub const CAPACITY: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("all {capacity} slots are taken")]
    CapacityExceeded { capacity: u32 },

    #[error("vehicle id must be >= 1, got {0}")]
    InvalidVehicle(i64),

    #[error("slot must be in 1..={capacity}, got {slot}")]
    InvalidSlot { slot: u32, capacity: u32 },

    #[error("public id must be >= 1, got {0}")]
    InvalidPublicId(i64),
}

/// Pick the lowest slot in `1..=CAPACITY` not present in `taken`.
///
/// Values outside the valid range are ignored.
pub fn allocate_slot<I>(taken: I) -> Result<u32, SlotError>
where
    I: IntoIterator<Item = u32>,
{
    first_free(taken, CAPACITY)
}

fn first_free<I>(taken: I, capacity: u32) -> Result<u32, SlotError>
where
    I: IntoIterator<Item = u32>,
{
    let mut used = vec![false; capacity as usize + 1];
    for slot in taken {
        if (1..=capacity).contains(&slot) {
            used[slot as usize] = true;
        }
    }
    (1..=capacity)
        .find(|&slot| !used[slot as usize])
        .ok_or(SlotError::CapacityExceeded { capacity })
}

/// Derive the public ID for a `(vehicle_id, slot)` pair.
pub fn derive_public_id(vehicle_id: i64, slot: u32) -> Result<i64, SlotError> {
    if vehicle_id < 1 {
        return Err(SlotError::InvalidVehicle(vehicle_id));
    }
    if !(1..=CAPACITY).contains(&slot) {
        return Err(SlotError::InvalidSlot {
            slot,
            capacity: CAPACITY,
        });
    }
    Ok((vehicle_id - 1) * i64::from(CAPACITY) + i64::from(slot))
}

/// Split a public ID back into `(vehicle_id, slot)`.
pub fn decompose_public_id(public_id: i64) -> Result<(i64, u32), SlotError> {
    if public_id < 1 {
        return Err(SlotError::InvalidPublicId(public_id));
    }
    let capacity = i64::from(CAPACITY);
    let vehicle_id = (public_id - 1) / capacity + 1;
    let slot = ((public_id - 1) % capacity + 1) as u32;
    Ok((vehicle_id, slot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_vehicle_gets_slot_one() {
        assert_eq!(allocate_slot([]), Ok(1));
    }

    #[test]
    fn lowest_gap_wins() {
        assert_eq!(allocate_slot([1, 2, 4]), Ok(3));
        assert_eq!(allocate_slot([2, 3]), Ok(1));
        assert_eq!(allocate_slot([4, 1, 2, 3]), Ok(5));
    }

    #[test]
    fn out_of_range_values_are_ignored() {
        assert_eq!(allocate_slot([0, 21, 99, 1]), Ok(2));
    }

    #[test]
    fn full_vehicle_is_rejected() {
        assert_eq!(
            allocate_slot(1..=CAPACITY),
            Err(SlotError::CapacityExceeded { capacity: CAPACITY })
        );
        assert_eq!(allocate_slot(1..CAPACITY), Ok(CAPACITY));
    }

    #[test]
    fn small_capacity() {
        assert_eq!(first_free([1, 3], 3), Ok(2));
        assert!(first_free([1, 2, 3], 3).is_err());
    }

    #[test]
    fn public_id_examples() {
        assert_eq!(derive_public_id(1, 1), Ok(1));
        assert_eq!(derive_public_id(2, 1), Ok(21));
        assert_eq!(derive_public_id(1, 20), Ok(20));
        assert_eq!(derive_public_id(3, 5), Ok(45));
    }

    #[test]
    fn public_id_preconditions() {
        assert_eq!(derive_public_id(0, 1), Err(SlotError::InvalidVehicle(0)));
        assert_eq!(
            derive_public_id(1, 0),
            Err(SlotError::InvalidSlot { slot: 0, capacity: CAPACITY })
        );
        assert!(derive_public_id(1, CAPACITY + 1).is_err());
        assert_eq!(decompose_public_id(0), Err(SlotError::InvalidPublicId(0)));
    }

    #[test]
    fn decompose_inverts_derive() {
        for vehicle_id in 1..=50i64 {
            for slot in 1..=CAPACITY {
                let public_id = derive_public_id(vehicle_id, slot).unwrap();
                assert_eq!(decompose_public_id(public_id), Ok((vehicle_id, slot)));
            }
        }
    }

    #[test]
    fn public_ids_are_dense_and_distinct() {
        // Vehicles 1..=10 cover public ids 1..=200 with no gaps or repeats.
        let mut seen = Vec::new();
        for vehicle_id in 1..=10i64 {
            for slot in 1..=CAPACITY {
                seen.push(derive_public_id(vehicle_id, slot).unwrap());
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (1..=200).collect::<Vec<i64>>());
    }
}
