//! Scripted walkthrough of one discovery run
//!
//! A fake transport stands in for the radio stack: it prints every request
//! the engine issues, while `main` feeds back the canned responses a typical
//! heart-rate peripheral would produce for them.

use std::sync::Arc;

use gattdisc::discovery::{
    DiscoveryContext, DiscoveryEngine, DiscoveryEvent, ResponseStatus, ServiceRegistry, Transport,
    TransportError, TransportEvent,
};
use gattdisc::gatt::{
    Characteristic, CharacteristicProperty, Descriptor, HandleRange, Uuid,
    CLIENT_CHAR_CONFIG_UUID, HEART_RATE_SERVICE_UUID,
};

struct PrintingTransport;

impl Transport for PrintingTransport {
    fn discover_primary_services(
        &self,
        conn_handle: u16,
        start_handle: u16,
        uuid: &Uuid,
    ) -> Result<(), TransportError> {
        println!(
            "-> conn 0x{:04X}: discover primary service {} from 0x{:04X}",
            conn_handle, uuid, start_handle
        );
        Ok(())
    }

    fn discover_characteristics(
        &self,
        conn_handle: u16,
        range: HandleRange,
    ) -> Result<(), TransportError> {
        println!(
            "-> conn 0x{:04X}: discover characteristics in {}",
            conn_handle, range
        );
        Ok(())
    }

    fn discover_descriptors(
        &self,
        conn_handle: u16,
        range: HandleRange,
    ) -> Result<(), TransportError> {
        println!(
            "-> conn 0x{:04X}: discover descriptors in {}",
            conn_handle, range
        );
        Ok(())
    }
}

/// The responses a heart-rate peripheral would send for the engine's
/// requests, in delivery order.
fn peripheral_script(conn: u16) -> Vec<TransportEvent> {
    let measurement = Characteristic {
        uuid: Uuid::from_u16(0x2A37), // Heart Rate Measurement
        properties: CharacteristicProperty::NOTIFY,
        declaration_handle: 12,
        value_handle: 13,
    };
    let body_sensor_location = Characteristic {
        uuid: Uuid::from_u16(0x2A38), // Body Sensor Location
        properties: CharacteristicProperty::READ,
        declaration_handle: 17,
        value_handle: 18,
    };

    vec![
        TransportEvent::PrimaryServiceDiscovery {
            conn_handle: conn,
            status: ResponseStatus::Success,
            service: Some((
                Uuid::from_u16(HEART_RATE_SERVICE_UUID),
                HandleRange::new(10, 20),
            )),
        },
        TransportEvent::CharacteristicDiscovery {
            conn_handle: conn,
            status: ResponseStatus::Success,
            characteristics: vec![measurement, body_sensor_location],
        },
        // The second characteristic round finds nothing more.
        TransportEvent::CharacteristicDiscovery {
            conn_handle: conn,
            status: ResponseStatus::AttributeNotFound,
            characteristics: Vec::new(),
        },
        // Gap after the measurement characteristic holds its CCCD.
        TransportEvent::DescriptorDiscovery {
            conn_handle: conn,
            status: ResponseStatus::Success,
            descriptors: vec![Descriptor {
                uuid: Uuid::from_u16(CLIENT_CHAR_CONFIG_UUID),
                handle: 14,
            }],
        },
        // Nothing after the body sensor location characteristic.
        TransportEvent::DescriptorDiscovery {
            conn_handle: conn,
            status: ResponseStatus::AttributeNotFound,
            descriptors: Vec::new(),
        },
    ]
}

fn main() {
    let registry = Arc::new(ServiceRegistry::new());
    registry
        .register(
            Uuid::from_u16(HEART_RATE_SERVICE_UUID),
            |event: &DiscoveryEvent| match event {
                DiscoveryEvent::ServiceDiscovered {
                    conn_handle,
                    service,
                } => {
                    println!(
                        "<- conn 0x{:04X}: heart rate service at {}",
                        conn_handle,
                        service.handle_range()
                    );
                    for entry in service.characteristics() {
                        let cccd = if entry.has_cccd() {
                            format!("CCCD at 0x{:04X}", entry.cccd_handle)
                        } else {
                            "no CCCD".to_string()
                        };
                        println!(
                            "     characteristic {} value handle 0x{:04X}, {}",
                            entry.characteristic.uuid, entry.characteristic.value_handle, cccd
                        );
                    }
                }
                DiscoveryEvent::ServiceNotFound { conn_handle, uuid } => {
                    println!("<- conn 0x{:04X}: service {} not found", conn_handle, uuid);
                }
                DiscoveryEvent::Error {
                    conn_handle,
                    status,
                } => {
                    println!(
                        "<- conn 0x{:04X}: discovery failed (status 0x{:04X})",
                        conn_handle, status
                    );
                }
                DiscoveryEvent::Available { conn_handle } => {
                    println!("<- conn 0x{:04X}: discovery available again", conn_handle);
                }
            },
        )
        .expect("registration failed");

    let engine = DiscoveryEngine::new(registry, PrintingTransport);
    let mut ctx = DiscoveryContext::new();

    let conn_handle = 5;
    engine
        .start(&mut ctx, conn_handle)
        .expect("failed to start discovery");

    for event in peripheral_script(conn_handle) {
        engine.on_transport_event(&mut ctx, &event);
    }
}
