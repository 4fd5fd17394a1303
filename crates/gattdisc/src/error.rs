//! Error types for the gattdisc library

use thiserror::Error;

use crate::discovery::transport::TransportError;

/// Errors surfaced by the discovery engine's public operations
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no discovery consumers registered")]
    NoRegisteredConsumers,

    #[error("discovery already in progress on this connection")]
    AlreadyInProgress,

    #[error("registration table full (capacity {0})")]
    OutOfCapacity(usize),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
