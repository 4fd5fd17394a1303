//! Discovery state machine
//!
//! Walks a remote peer's GATT database for every registered service UUID:
//! primary-service lookup, then characteristic rounds, then descriptor rounds
//! per characteristic. The walk is event-driven: every step either issues one
//! transport request and returns, or concludes the current service and moves
//! to the next registered UUID. [`DiscoveryEngine::on_transport_event`] is the
//! sole re-entry point; all progress state lives in the [`DiscoveryContext`].

use std::sync::Arc;

use log::{debug, error, info, trace, warn};

use super::constants::{MAX_CHARACTERISTICS_PER_SERVICE, MAX_REGISTERED_SERVICES};
use super::database::ServiceRecord;
use super::range::{descriptor_search_range, needs_more_characteristics};
use super::registry::{DiscoveryEvent, ServiceRegistry};
use super::transport::{ResponseStatus, Transport, TransportEvent};
use crate::error::DiscoveryError;
use crate::gatt::{Characteristic, Descriptor, HandleRange, Uuid, ATT_HANDLE_MIN,
    CLIENT_CHAR_CONFIG_UUID};

/// Phase of the per-connection walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiscoveryState {
    Idle,
    DiscoveringService,
    DiscoveringCharacteristics,
    DiscoveringDescriptors,
}

/// Per-connection discovery session state
///
/// One context per connection, owned by the code driving that connection's
/// event stream. Completion events queue here until the run resolves, so
/// concurrent runs on other connections cannot disturb them. Reset whenever
/// a new run starts; a context must not be fed events from more than one
/// connection at a time.
pub struct DiscoveryContext {
    conn_handle: u16,
    services: Vec<ServiceRecord>,
    pending: Vec<(Uuid, DiscoveryEvent)>,
    curr_srv_index: usize,
    curr_char_index: usize,
    resolved_count: usize,
    in_progress: bool,
    state: DiscoveryState,
}

impl Default for DiscoveryContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoveryContext {
    pub fn new() -> Self {
        DiscoveryContext {
            conn_handle: 0,
            services: Vec::with_capacity(MAX_REGISTERED_SERVICES),
            pending: Vec::with_capacity(MAX_REGISTERED_SERVICES),
            curr_srv_index: 0,
            curr_char_index: 0,
            resolved_count: 0,
            in_progress: false,
            state: DiscoveryState::Idle,
        }
    }

    /// Whether a discovery run is currently active on this context
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Services resolved so far in the current (or last) run
    pub fn resolved_count(&self) -> usize {
        self.resolved_count
    }

    fn reset(&mut self, conn_handle: u16) {
        self.conn_handle = conn_handle;
        self.services.clear();
        if !self.pending.is_empty() {
            debug!("discarding {} stale pending event(s)", self.pending.len());
            self.pending.clear();
        }
        self.curr_srv_index = 0;
        self.curr_char_index = 0;
        self.resolved_count = 0;
        self.in_progress = false;
        self.state = DiscoveryState::Idle;
    }

    fn current_record(&self) -> &ServiceRecord {
        &self.services[self.curr_srv_index]
    }

    fn current_record_mut(&mut self) -> &mut ServiceRecord {
        &mut self.services[self.curr_srv_index]
    }
}

/// The discovery engine: registry plus transport, shared across contexts
///
/// The engine itself is stateless between calls; everything about a run lives
/// in its [`DiscoveryContext`], so one engine can drive any number of
/// connections as long as each context is fed only its own events.
pub struct DiscoveryEngine<T: Transport> {
    registry: Arc<ServiceRegistry>,
    transport: T,
}

impl<T: Transport> DiscoveryEngine<T> {
    pub fn new(registry: Arc<ServiceRegistry>, transport: T) -> Self {
        DiscoveryEngine {
            registry,
            transport,
        }
    }

    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// Begin a discovery run on `conn_handle`
    ///
    /// Issues the primary-service request for the first registered UUID and
    /// returns; progress continues through [`Self::on_transport_event`]. At
    /// most one run per context: a second call while running fails with
    /// [`DiscoveryError::AlreadyInProgress`] and leaves the run untouched.
    pub fn start(
        &self,
        ctx: &mut DiscoveryContext,
        conn_handle: u16,
    ) -> Result<(), DiscoveryError> {
        if self.registry.is_empty() {
            return Err(DiscoveryError::NoRegisteredConsumers);
        }
        if ctx.in_progress {
            return Err(DiscoveryError::AlreadyInProgress);
        }

        // Frozen-registry assumption: index 0 exists because the registry is
        // non-empty and nothing unregisters.
        let Some(uuid) = self.registry.uuid_at(0) else {
            return Err(DiscoveryError::NoRegisteredConsumers);
        };

        ctx.reset(conn_handle);
        ctx.services.push(ServiceRecord::placeholder(uuid));
        ctx.in_progress = true;
        ctx.state = DiscoveryState::DiscoveringService;

        debug!(
            "conn 0x{:04X}: starting discovery, {} registered service(s), first {}",
            conn_handle,
            self.registry.num_registered(),
            uuid
        );

        if let Err(err) = self
            .transport
            .discover_primary_services(conn_handle, ATT_HANDLE_MIN, &uuid)
        {
            self.abort_run(ctx, err.0);
            return Err(err.into());
        }
        Ok(())
    }

    /// Feed one transport event into the state machine
    ///
    /// Events for other connections, or arriving while no run is active, are
    /// ignored.
    pub fn on_transport_event(&self, ctx: &mut DiscoveryContext, event: &TransportEvent) {
        if let TransportEvent::Disconnected { conn_handle } = event {
            if *conn_handle == ctx.conn_handle && ctx.in_progress {
                debug!(
                    "conn 0x{:04X}: disconnected mid-discovery, abandoning run",
                    conn_handle
                );
                ctx.in_progress = false;
                ctx.state = DiscoveryState::Idle;
            }
            return;
        }

        if !ctx.in_progress || event.conn_handle() != ctx.conn_handle {
            trace!(
                "conn 0x{:04X}: ignoring transport event for conn 0x{:04X}",
                ctx.conn_handle,
                event.conn_handle()
            );
            return;
        }

        match event {
            TransportEvent::PrimaryServiceDiscovery {
                status, service, ..
            } => self.on_primary_service_response(ctx, *status, service.as_ref()),
            TransportEvent::CharacteristicDiscovery {
                status,
                characteristics,
                ..
            } => self.on_characteristic_response(ctx, *status, characteristics),
            TransportEvent::DescriptorDiscovery {
                status,
                descriptors,
                ..
            } => self.on_descriptor_response(ctx, *status, descriptors),
            TransportEvent::Disconnected { .. } => {}
        }
    }

    fn on_primary_service_response(
        &self,
        ctx: &mut DiscoveryContext,
        status: ResponseStatus,
        service: Option<&(Uuid, HandleRange)>,
    ) {
        if ctx.state != DiscoveryState::DiscoveringService {
            warn!(
                "conn 0x{:04X}: primary-service response in {:?}",
                ctx.conn_handle, ctx.state
            );
            return;
        }

        match (status, service) {
            (ResponseStatus::Success, Some((uuid, range))) => {
                let expected = *ctx.current_record().uuid();
                if expected != *uuid {
                    warn!(
                        "conn 0x{:04X}: response for service {} while searching {}",
                        ctx.conn_handle, uuid, expected
                    );
                }
                ctx.current_record_mut().record_primary_service(*range);
                debug!(
                    "conn 0x{:04X}: service {} at {}",
                    ctx.conn_handle, uuid, range
                );
                ctx.state = DiscoveryState::DiscoveringCharacteristics;
                if let Err(err) = self.transport.discover_characteristics(ctx.conn_handle, *range) {
                    self.abort_run(ctx, err.0);
                }
            }
            _ => {
                let uuid = *ctx.current_record().uuid();
                let conn_handle = ctx.conn_handle;
                debug!(
                    "conn 0x{:04X}: service {} not present on peer",
                    conn_handle, uuid
                );
                self.enqueue_completion(
                    ctx,
                    uuid,
                    DiscoveryEvent::ServiceNotFound { conn_handle, uuid },
                );
                self.on_service_resolved(ctx);
            }
        }
    }

    fn on_characteristic_response(
        &self,
        ctx: &mut DiscoveryContext,
        status: ResponseStatus,
        characteristics: &[Characteristic],
    ) {
        if ctx.state != DiscoveryState::DiscoveringCharacteristics {
            warn!(
                "conn 0x{:04X}: characteristic response in {:?}",
                ctx.conn_handle, ctx.state
            );
            return;
        }

        // A successful response carrying nothing would re-issue the same
        // range forever, so an empty list is final too.
        if status != ResponseStatus::Success || characteristics.is_empty() {
            trace!(
                "conn 0x{:04X}: characteristic list final ({:?}, {} reported)",
                ctx.conn_handle,
                status,
                characteristics.len()
            );
            self.begin_descriptor_phase(ctx);
            return;
        }

        let (next_range, more) = {
            let record = ctx.current_record_mut();
            record.append_characteristics(characteristics);
            let range = record.handle_range();
            let more = record.char_count() < MAX_CHARACTERISTICS_PER_SERVICE
                && record
                    .last_characteristic()
                    .is_some_and(|last| needs_more_characteristics(range, &last.characteristic));
            let next_start = record
                .last_characteristic()
                .map(|last| last.characteristic.value_handle + 1);
            (next_start.map(|s| HandleRange::new(s, range.end)), more)
        };

        match (more, next_range) {
            (true, Some(next_range)) => {
                trace!(
                    "conn 0x{:04X}: continuing characteristic discovery over {}",
                    ctx.conn_handle,
                    next_range
                );
                if let Err(err) = self
                    .transport
                    .discover_characteristics(ctx.conn_handle, next_range)
                {
                    self.abort_run(ctx, err.0);
                }
            }
            _ => self.begin_descriptor_phase(ctx),
        }
    }

    fn on_descriptor_response(
        &self,
        ctx: &mut DiscoveryContext,
        status: ResponseStatus,
        descriptors: &[Descriptor],
    ) {
        if ctx.state != DiscoveryState::DiscoveringDescriptors {
            warn!(
                "conn 0x{:04X}: descriptor response in {:?}",
                ctx.conn_handle, ctx.state
            );
            return;
        }

        if status == ResponseStatus::Success {
            let cccd = descriptors
                .iter()
                .find(|d| d.uuid == Uuid::from_u16(CLIENT_CHAR_CONFIG_UUID));
            if let Some(descriptor) = cccd {
                debug!(
                    "conn 0x{:04X}: CCCD at 0x{:04X} for characteristic {}",
                    ctx.conn_handle, descriptor.handle, ctx.curr_char_index
                );
                let index = ctx.curr_char_index;
                let handle = descriptor.handle;
                ctx.current_record_mut().attach_cccd(index, handle);
            }
        }

        let next_index = ctx.curr_char_index + 1;
        if next_index >= ctx.current_record().char_count() {
            self.complete_service(ctx);
        } else {
            self.issue_descriptor_request_from(ctx, next_index);
        }
    }

    /// Switch to descriptor discovery once the characteristic list is final
    fn begin_descriptor_phase(&self, ctx: &mut DiscoveryContext) {
        ctx.state = DiscoveryState::DiscoveringDescriptors;
        ctx.curr_char_index = 0;
        self.issue_descriptor_request_from(ctx, 0);
    }

    /// Issue a descriptor request for the first characteristic at or after
    /// `from` that has room for descriptors; complete the service if none do
    ///
    /// Characteristics packed back-to-back leave no descriptor gap, so whole
    /// stretches of the list can be skipped without a radio round-trip.
    fn issue_descriptor_request_from(&self, ctx: &mut DiscoveryContext, from: usize) {
        let target = {
            let record = ctx.current_record();
            let range = record.handle_range();
            let chars = record.characteristics();
            (from..chars.len()).find_map(|i| {
                let next = chars.get(i + 1).map(|c| &c.characteristic);
                descriptor_search_range(range, &chars[i].characteristic, next)
                    .map(|search| (i, search))
            })
        };

        match target {
            Some((index, search)) => {
                ctx.curr_char_index = index;
                trace!(
                    "conn 0x{:04X}: descriptor search {} for characteristic {}",
                    ctx.conn_handle,
                    search,
                    index
                );
                if let Err(err) = self.transport.discover_descriptors(ctx.conn_handle, search) {
                    self.abort_run(ctx, err.0);
                }
            }
            None => self.complete_service(ctx),
        }
    }

    /// The current service's walk succeeded: queue its completion event
    fn complete_service(&self, ctx: &mut DiscoveryContext) {
        let record = ctx.current_record().clone();
        let uuid = *record.uuid();
        let conn_handle = ctx.conn_handle;
        debug!(
            "conn 0x{:04X}: service {} complete, {} characteristic(s)",
            conn_handle,
            uuid,
            record.char_count()
        );
        self.enqueue_completion(
            ctx,
            uuid,
            DiscoveryEvent::ServiceDiscovered {
                conn_handle,
                service: record,
            },
        );
        self.on_service_resolved(ctx);
    }

    /// Bookkeeping after a service reached a terminal state, successful or not
    fn on_service_resolved(&self, ctx: &mut DiscoveryContext) {
        ctx.resolved_count += 1;

        let next_index = ctx.curr_srv_index + 1;
        if next_index < self.registry.num_registered() {
            let Some(uuid) = self.registry.uuid_at(next_index) else {
                warn!(
                    "conn 0x{:04X}: registration {} disappeared mid-run",
                    ctx.conn_handle, next_index
                );
                return;
            };
            ctx.curr_srv_index = next_index;
            ctx.curr_char_index = 0;
            ctx.services.push(ServiceRecord::placeholder(uuid));
            ctx.state = DiscoveryState::DiscoveringService;
            debug!(
                "conn 0x{:04X}: searching next registered service {}",
                ctx.conn_handle, uuid
            );
            if let Err(err) =
                self.transport
                    .discover_primary_services(ctx.conn_handle, ATT_HANDLE_MIN, &uuid)
            {
                self.abort_run(ctx, err.0);
            }
        } else {
            info!(
                "conn 0x{:04X}: discovery run finished, {} service(s) resolved",
                ctx.conn_handle, ctx.resolved_count
            );
            ctx.in_progress = false;
            ctx.state = DiscoveryState::Idle;
            self.registry.broadcast_available(ctx.conn_handle);
        }
    }

    /// Queue one consumer's completion event for the current run
    ///
    /// When the queued count reaches the registered count the whole batch is
    /// dispatched in enqueue order and the queue cleared.
    fn enqueue_completion(&self, ctx: &mut DiscoveryContext, uuid: Uuid, event: DiscoveryEvent) {
        if ctx.pending.len() >= MAX_REGISTERED_SERVICES {
            // Unreachable while one run queues at most one event per
            // registration, kept as a guard against a bound violation.
            warn!(
                "conn 0x{:04X}: pending event queue full, dropping event for service {}",
                ctx.conn_handle, uuid
            );
            return;
        }
        ctx.pending.push((uuid, event));
        if ctx.pending.len() == self.registry.num_registered() {
            self.flush_pending(ctx);
        }
    }

    /// Dispatch whatever is queued, regardless of whether the run finished
    ///
    /// Used by the fail-fast abort path so consumers whose services already
    /// resolved still get their events.
    fn flush_pending(&self, ctx: &mut DiscoveryContext) {
        for (uuid, event) in ctx.pending.drain(..) {
            self.registry.dispatch(&uuid, &event);
        }
    }

    /// Fail-fast abort: a rejected sub-request ends the whole run
    ///
    /// The in-flight service's consumer gets an `Error` event; events already
    /// queued for earlier services are flushed so their consumers still see
    /// their results; nothing later in the run is attempted.
    fn abort_run(&self, ctx: &mut DiscoveryContext, status: u16) {
        let uuid = *ctx.current_record().uuid();
        let conn_handle = ctx.conn_handle;
        error!(
            "conn 0x{:04X}: transport rejected request while discovering {} (status 0x{:04X}), aborting run",
            conn_handle, uuid, status
        );
        ctx.in_progress = false;
        ctx.state = DiscoveryState::Idle;
        self.enqueue_completion(ctx, uuid, DiscoveryEvent::Error { conn_handle, status });
        self.flush_pending(ctx);
        self.registry.broadcast_available(conn_handle);
    }
}
