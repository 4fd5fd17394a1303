//! Handle-range arithmetic for discovery sub-requests
//!
//! Pure helpers that decide, from already-discovered attributes, which ATT
//! handle interval the next discovery round has to cover.

use crate::gatt::{Characteristic, HandleRange};

/// Whether another characteristic-discovery round is required after the last
/// discovered characteristic.
///
/// Handles are assigned in ascending order, so once the last characteristic's
/// value handle reaches the service's end handle there is nothing left to
/// discover.
pub fn needs_more_characteristics(service_range: HandleRange, last: &Characteristic) -> bool {
    last.value_handle < service_range.end
}

/// The handle interval in which descriptors of `current` may exist.
///
/// Descriptors of a characteristic sit between its value attribute and the
/// next characteristic declaration (or the service end, for the last
/// characteristic). Returns `None` when that interval is empty, so the caller
/// can skip a discovery round that cannot find anything.
pub fn descriptor_search_range(
    service_range: HandleRange,
    current: &Characteristic,
    next: Option<&Characteristic>,
) -> Option<HandleRange> {
    // Value attribute on the service boundary: provably no descriptor space.
    if current.value_handle == service_range.end {
        return None;
    }

    let end = match next {
        Some(next) => next.declaration_handle.wrapping_sub(1),
        None => service_range.end,
    };
    // A value handle at the top of the handle space is malformed peer data;
    // there is no room above it either way.
    let start = current.value_handle.checked_add(1)?;
    let range = HandleRange::new(start, end);

    if range.is_empty() {
        None
    } else {
        Some(range)
    }
}
