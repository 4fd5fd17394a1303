//! Compile-time resource bounds for the discovery engine
//!
//! These mirror the fixed-size tables of the embedded original: memory for
//! discovery results is bounded at build time, and the engine truncates
//! rather than allocates when a peer exceeds a bound.

/// Maximum characteristics recorded per service. Characteristics reported
/// beyond this bound are dropped; discovery of the service still completes.
pub const MAX_CHARACTERISTICS_PER_SERVICE: usize = 6;

/// Maximum number of service UUIDs that can be registered for discovery.
pub const MAX_REGISTERED_SERVICES: usize = 4;
