//! gattdisc - GATT database discovery for BLE centrals
//!
//! This library implements the service/characteristic/descriptor discovery
//! walk a central-role application performs after connecting to a peripheral.
//! It is the orchestration layer only: the radio protocol stack is abstracted
//! behind the [`Transport`] trait and delivers its results as asynchronous
//! [`TransportEvent`]s.
//!
//! Usage pattern:
//!
//! 1. During startup, each application module registers the service UUID it
//!    consumes with the shared [`ServiceRegistry`].
//! 2. On a new connection, call [`DiscoveryEngine::start`] with that
//!    connection's [`DiscoveryContext`].
//! 3. Forward every transport event for the connection to
//!    [`DiscoveryEngine::on_transport_event`].
//! 4. Once every registered service has resolved, all consumers receive their
//!    completion events in one batch, followed by an `Available` signal.

pub mod discovery;
pub mod error;
pub mod gatt;

// Re-export common types for convenience
pub use discovery::{
    CharacteristicWithCccd, DiscoveryContext, DiscoveryEngine, DiscoveryEvent, ResponseStatus,
    ServiceRecord, ServiceRegistry, Transport, TransportError, TransportEvent,
};
pub use error::DiscoveryError;
pub use gatt::{Characteristic, CharacteristicProperty, Descriptor, HandleRange, Uuid};
