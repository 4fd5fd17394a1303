//! Per-service GATT database record
//!
//! Accumulates the attributes one discovery run finds for a single service:
//! the service handle range, its characteristics, and each characteristic's
//! CCCD handle if one exists.

use log::warn;

use super::constants::MAX_CHARACTERISTICS_PER_SERVICE;
use crate::gatt::{Characteristic, HandleRange, Uuid, INVALID_HANDLE};

/// A discovered characteristic together with its CCCD handle
///
/// The CCCD handle stays [`INVALID_HANDLE`] until descriptor discovery finds
/// a Client Characteristic Configuration descriptor in the characteristic's
/// descriptor range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacteristicWithCccd {
    pub characteristic: Characteristic,
    pub cccd_handle: u16,
}

impl CharacteristicWithCccd {
    fn new(characteristic: Characteristic) -> Self {
        CharacteristicWithCccd {
            characteristic,
            cccd_handle: INVALID_HANDLE,
        }
    }

    pub fn has_cccd(&self) -> bool {
        self.cccd_handle != INVALID_HANDLE
    }
}

/// One service's accumulated discovery results
///
/// Created as a placeholder carrying only the UUID being searched for, then
/// filled in as transport responses arrive. The characteristic list is
/// bounded by [`MAX_CHARACTERISTICS_PER_SERVICE`]; entries reported beyond
/// the bound are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    uuid: Uuid,
    handle_range: HandleRange,
    characteristics: Vec<CharacteristicWithCccd>,
}

impl ServiceRecord {
    /// A record for a service that has not been located yet
    pub fn placeholder(uuid: Uuid) -> Self {
        ServiceRecord {
            uuid,
            handle_range: HandleRange::new(INVALID_HANDLE, INVALID_HANDLE),
            characteristics: Vec::with_capacity(MAX_CHARACTERISTICS_PER_SERVICE),
        }
    }

    pub fn uuid(&self) -> &Uuid {
        &self.uuid
    }

    pub fn handle_range(&self) -> HandleRange {
        self.handle_range
    }

    pub fn characteristics(&self) -> &[CharacteristicWithCccd] {
        &self.characteristics
    }

    pub fn char_count(&self) -> usize {
        self.characteristics.len()
    }

    pub fn last_characteristic(&self) -> Option<&CharacteristicWithCccd> {
        self.characteristics.last()
    }

    /// Record the handle range a primary-service response resolved
    pub fn record_primary_service(&mut self, handle_range: HandleRange) {
        self.handle_range = handle_range;
    }

    /// Append discovered characteristics, truncating at the capacity bound
    ///
    /// Truncation is not an error: the service is still considered fully
    /// discovered, the excess characteristics are just not recorded.
    pub fn append_characteristics(&mut self, new_chars: &[Characteristic]) {
        let room = MAX_CHARACTERISTICS_PER_SERVICE - self.characteristics.len();
        if new_chars.len() > room {
            warn!(
                "service {}: dropping {} characteristic(s) beyond the {}-entry bound",
                self.uuid,
                new_chars.len() - room,
                MAX_CHARACTERISTICS_PER_SERVICE
            );
        }
        self.characteristics.extend(
            new_chars
                .iter()
                .take(room)
                .copied()
                .map(CharacteristicWithCccd::new),
        );
    }

    /// Set the CCCD handle of one characteristic
    ///
    /// Out-of-range indices are ignored; the engine's own cursor tracking
    /// should never produce one.
    pub fn attach_cccd(&mut self, characteristic_index: usize, handle: u16) {
        match self.characteristics.get_mut(characteristic_index) {
            Some(entry) => entry.cccd_handle = handle,
            None => warn!(
                "service {}: CCCD for characteristic index {} out of range",
                self.uuid, characteristic_index
            ),
        }
    }
}
