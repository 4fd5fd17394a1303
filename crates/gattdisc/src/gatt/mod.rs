//! GATT (Generic Attribute Profile) data model
//!
//! This module provides the attribute-level types the discovery engine works
//! with: UUIDs, handle ranges, characteristic declarations and descriptors.

pub mod constants;
pub mod types;

#[cfg(test)]
mod tests;

pub use self::constants::*;
pub use self::types::{Characteristic, CharacteristicProperty, Descriptor, HandleRange, Uuid};
