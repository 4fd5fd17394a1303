//! GATT database discovery engine
//!
//! This module implements the central-role discovery walk: for every service
//! UUID registered with the [`ServiceRegistry`], the engine locates the
//! service on the peer, enumerates its characteristics and finds each
//! characteristic's CCCD, accumulating the results in per-service records.
//! The walk is asynchronous and event-driven; the radio stack sits behind the
//! [`Transport`] trait and drives progress by delivering [`TransportEvent`]s.
//!
//! Consumers are notified in a single batch once the whole run has resolved
//! every registered service, then receive an `Available` signal marking the
//! connection's context reusable.

pub mod constants;
pub mod database;
pub mod engine;
pub mod range;
pub mod registry;
pub mod transport;


pub use self::constants::{MAX_CHARACTERISTICS_PER_SERVICE, MAX_REGISTERED_SERVICES};
pub use self::database::{CharacteristicWithCccd, ServiceRecord};
pub use self::engine::{DiscoveryContext, DiscoveryEngine};
pub use self::range::{descriptor_search_range, needs_more_characteristics};
pub use self::registry::{DiscoveryEvent, ServiceRegistry};
pub use self::transport::{ResponseStatus, Transport, TransportError, TransportEvent};
