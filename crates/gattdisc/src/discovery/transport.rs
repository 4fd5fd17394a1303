//! Transport boundary of the discovery engine
//!
//! The engine does not speak the GATT wire protocol itself. It issues
//! discovery sub-requests through [`Transport`] and consumes the
//! asynchronously delivered [`TransportEvent`]s the radio stack produces for
//! them. Requests are accepted or rejected synchronously; results always
//! arrive later as events, in request order per connection.

use thiserror::Error;

use crate::gatt::{Characteristic, Descriptor, HandleRange, Uuid};

/// A discovery sub-request the radio stack refused to take
///
/// Carries the stack's status code; the engine does not interpret it beyond
/// logging, it aborts the run either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("discovery request rejected by transport (status 0x{0:04X})")]
pub struct TransportError(pub u16);

/// Outcome of one discovery sub-request, reported in its response event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// The request found attributes; the event carries them.
    Success,
    /// The searched range holds no matching attribute. A valid outcome, not
    /// a failure.
    AttributeNotFound,
    /// The procedure failed with the given protocol status code.
    Error(u16),
}

/// Asynchronous events the transport delivers to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Response to a primary-service discovery request. `service` is the
    /// located UUID and handle range, present on success.
    PrimaryServiceDiscovery {
        conn_handle: u16,
        status: ResponseStatus,
        service: Option<(Uuid, HandleRange)>,
    },
    /// Response to a characteristic discovery request. One response may cover
    /// only part of the service range; the engine re-issues until done.
    CharacteristicDiscovery {
        conn_handle: u16,
        status: ResponseStatus,
        characteristics: Vec<Characteristic>,
    },
    /// Response to a descriptor discovery request over one characteristic's
    /// descriptor range.
    DescriptorDiscovery {
        conn_handle: u16,
        status: ResponseStatus,
        descriptors: Vec<Descriptor>,
    },
    /// The link dropped. Any discovery run on this connection is abandoned.
    Disconnected { conn_handle: u16 },
}

impl TransportEvent {
    /// The connection this event belongs to
    pub fn conn_handle(&self) -> u16 {
        match self {
            TransportEvent::PrimaryServiceDiscovery { conn_handle, .. }
            | TransportEvent::CharacteristicDiscovery { conn_handle, .. }
            | TransportEvent::DescriptorDiscovery { conn_handle, .. }
            | TransportEvent::Disconnected { conn_handle } => *conn_handle,
        }
    }
}

/// Discovery requests the engine issues to the radio stack
///
/// Implementations return `Ok(())` once the request is queued; the result is
/// delivered later as the matching [`TransportEvent`]. Events for one
/// connection must be delivered in request order.
pub trait Transport {
    /// Search for a primary service by UUID from `start_handle` upward.
    fn discover_primary_services(
        &self,
        conn_handle: u16,
        start_handle: u16,
        uuid: &Uuid,
    ) -> Result<(), TransportError>;

    /// Discover characteristic declarations within `range`.
    fn discover_characteristics(
        &self,
        conn_handle: u16,
        range: HandleRange,
    ) -> Result<(), TransportError>;

    /// Discover descriptors within one characteristic's descriptor range.
    fn discover_descriptors(
        &self,
        conn_handle: u16,
        range: HandleRange,
    ) -> Result<(), TransportError>;
}
