//! Consumer registration and event delivery
//!
//! Application modules register once, before discovery starts, for the
//! service UUID they care about. The table is read-only after startup; the
//! batching of completion events for a run lives in that run's
//! [`DiscoveryContext`](super::engine::DiscoveryContext), so runs on
//! different connections never interfere.

use std::sync::{Arc, Mutex};

use log::{debug, warn};

use super::constants::MAX_REGISTERED_SERVICES;
use super::database::ServiceRecord;
use crate::error::DiscoveryError;
use crate::gatt::Uuid;

/// Events delivered to registered consumers
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryEvent {
    /// The registered service was found and fully walked.
    ServiceDiscovered {
        conn_handle: u16,
        service: ServiceRecord,
    },
    /// The peer does not expose the registered service. A terminal outcome,
    /// not an error.
    ServiceNotFound { conn_handle: u16, uuid: Uuid },
    /// The run aborted because the transport rejected a sub-request.
    Error { conn_handle: u16, status: u16 },
    /// Out-of-band signal: the connection's discovery context may be reused.
    Available { conn_handle: u16 },
}

type EventCallback = Arc<dyn Fn(&DiscoveryEvent) + Send + Sync>;

struct Registration {
    uuid: Uuid,
    callback: EventCallback,
}

/// Process-wide table of (service UUID, consumer callback) registrations
///
/// Populated during application startup and read-only afterwards. Callbacks
/// run on the thread delivering the triggering transport event.
pub struct ServiceRegistry {
    registrations: Mutex<Vec<Registration>>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceRegistry {
    pub fn new() -> Self {
        ServiceRegistry {
            registrations: Mutex::new(Vec::with_capacity(MAX_REGISTERED_SERVICES)),
        }
    }

    /// Register a consumer for one service UUID
    ///
    /// Idempotent per UUID: a second registration for the same UUID succeeds
    /// without adding a slot, keeping the first callback. Fails once
    /// [`MAX_REGISTERED_SERVICES`] distinct UUIDs are registered.
    pub fn register<F>(&self, uuid: Uuid, callback: F) -> Result<(), DiscoveryError>
    where
        F: Fn(&DiscoveryEvent) + Send + Sync + 'static,
    {
        let mut registrations = self.registrations.lock().unwrap();

        if registrations.iter().any(|r| r.uuid == uuid) {
            debug!("service {} already registered, keeping first consumer", uuid);
            return Ok(());
        }
        if registrations.len() >= MAX_REGISTERED_SERVICES {
            return Err(DiscoveryError::OutOfCapacity(MAX_REGISTERED_SERVICES));
        }

        registrations.push(Registration {
            uuid,
            callback: Arc::new(callback),
        });
        Ok(())
    }

    pub fn num_registered(&self) -> usize {
        self.registrations.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_registered() == 0
    }

    /// The UUID registered at `index`, in registration order
    pub fn uuid_at(&self, index: usize) -> Option<Uuid> {
        self.registrations
            .lock()
            .unwrap()
            .get(index)
            .map(|r| r.uuid)
    }

    /// Deliver one completion event to the consumer registered for `uuid`
    ///
    /// The callback is cloned out of the lock before it runs, so consumers
    /// may call back into the registry.
    pub fn dispatch(&self, uuid: &Uuid, event: &DiscoveryEvent) {
        let callback = {
            let registrations = self.registrations.lock().unwrap();
            registrations
                .iter()
                .find(|r| &r.uuid == uuid)
                .map(|r| r.callback.clone())
        };

        match callback {
            Some(callback) => callback(event),
            None => warn!("completion event for unregistered service {}", uuid),
        }
    }

    /// Tell every consumer the connection's context is free for a new run
    pub fn broadcast_available(&self, conn_handle: u16) {
        let callbacks: Vec<EventCallback> = {
            let registrations = self.registrations.lock().unwrap();
            registrations.iter().map(|r| r.callback.clone()).collect()
        };

        let event = DiscoveryEvent::Available { conn_handle };
        for callback in &callbacks {
            callback(&event);
        }
    }
}
