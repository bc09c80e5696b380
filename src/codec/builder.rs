use super::ethernet::EthernetFrame;
use super::lldpdu::{ChassisId, Lldpdu, PortId};
use super::traits::LldpEncode;
use crate::error::Result;
use crate::model::{Identity, InterfaceHandle};
use crate::protocol::{CHASSIS_ID_SUBTYPE_MAC_ADDRESS, PORT_ID_SUBTYPE_INTERFACE_NAME};
use std::time::Duration;

/// TTL advertised for a given send interval: twice the interval, saturated
/// at `u16::MAX` seconds.
pub fn ttl_for(interval: Duration) -> u16 {
    let secs = interval.saturating_mul(2).as_secs();
    u16::try_from(secs).unwrap_or(u16::MAX)
}

/// The LLDPDU announcing `identity` on `interface`.
pub fn lldpdu(identity: &Identity, interface: &InterfaceHandle, interval: Duration) -> Lldpdu {
    Lldpdu {
        chassis_id: ChassisId {
            subtype: CHASSIS_ID_SUBTYPE_MAC_ADDRESS,
            id: interface.hardware_address.octets().to_vec(),
        },
        port_id: PortId {
            subtype: PORT_ID_SUBTYPE_INTERFACE_NAME,
            id: interface.name.as_bytes().to_vec(),
        },
        ttl: ttl_for(interval),
        port_description: Some(interface.name.clone()),
        system_name: Some(identity.machine_id.clone()),
        system_description: Some(identity.description.clone()),
    }
}

/// Encodes the LLDPDU bytes. Deterministic for identical inputs.
pub fn build(identity: &Identity, interface: &InterfaceHandle, interval: Duration) -> Result<Vec<u8>> {
    lldpdu(identity, interface, interval).to_bytes()
}

/// Encodes the complete ethernet frame sent by a transmit engine.
pub fn build_frame(
    identity: &Identity,
    interface: &InterfaceHandle,
    interval: Duration,
) -> Result<Vec<u8>> {
    let payload = build(identity, interface, interval)?;
    EthernetFrame::lldp(interface.hardware_address, payload).to_bytes()
}
