use super::tlv::{Tlv, TlvReader};
use super::traits::{LldpDecode, LldpEncode};
use crate::error::{LldpError, Result};
use crate::protocol::{
    TLV_CHASSIS_ID, TLV_END, TLV_PORT_DESCRIPTION, TLV_PORT_ID, TLV_SYSTEM_DESCRIPTION,
    TLV_SYSTEM_NAME, TLV_TTL,
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChassisId {
    pub subtype: u8,
    pub id: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortId {
    pub subtype: u8,
    pub id: Vec<u8>,
}

/// An LLDP data unit restricted to the mandatory TLVs plus port description,
/// system name and system description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lldpdu {
    pub chassis_id: ChassisId,
    pub port_id: PortId,
    /// Seconds
    pub ttl: u16,
    pub port_description: Option<String>,
    pub system_name: Option<String>,
    pub system_description: Option<String>,
}

impl Lldpdu {
    fn tlvs(&self) -> Vec<Tlv> {
        let mut tlvs = vec![
            Tlv::with_subtype(TLV_CHASSIS_ID, self.chassis_id.subtype, &self.chassis_id.id),
            Tlv::with_subtype(TLV_PORT_ID, self.port_id.subtype, &self.port_id.id),
            Tlv::new(TLV_TTL, self.ttl.to_be_bytes().to_vec()),
        ];
        let optional = [
            (TLV_PORT_DESCRIPTION, &self.port_description),
            (TLV_SYSTEM_NAME, &self.system_name),
            (TLV_SYSTEM_DESCRIPTION, &self.system_description),
        ];
        for (tlv_type, value) in optional {
            if let Some(value) = value {
                tlvs.push(Tlv::new(tlv_type, value.as_bytes()));
            }
        }
        tlvs.push(Tlv::end());
        tlvs
    }
}

impl LldpEncode for Lldpdu {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        let tlvs = self.tlvs();
        // Validate everything first so a failing TLV leaves nothing half written.
        for tlv in &tlvs {
            tlv.header()?;
        }
        for tlv in &tlvs {
            tlv.encode(writer)?;
        }
        Ok(())
    }
}

impl LldpDecode for Lldpdu {
    fn decode(buf: &[u8]) -> Result<Self> {
        let mut chassis_id = None;
        let mut port_id = None;
        let mut ttl = None;
        let mut port_description = None;
        let mut system_name = None;
        let mut system_description = None;

        for (position, tlv) in TlvReader::new(buf).enumerate() {
            let tlv = tlv?;

            // Chassis ID, Port ID and TTL must lead, in that order.
            let expected = match position {
                0 => Some(TLV_CHASSIS_ID),
                1 => Some(TLV_PORT_ID),
                2 => Some(TLV_TTL),
                _ => None,
            };
            if let Some(expected) = expected {
                if tlv.tlv_type != expected {
                    return Err(LldpError::Decode(format!(
                        "expected tlv type {} at position {}, got {}",
                        expected, position, tlv.tlv_type
                    )));
                }
            }

            match tlv.tlv_type {
                TLV_END => break,
                TLV_CHASSIS_ID => {
                    let (subtype, id) = split_subtype(tlv.value, "chassis id")?;
                    chassis_id = Some(ChassisId { subtype, id });
                }
                TLV_PORT_ID => {
                    let (subtype, id) = split_subtype(tlv.value, "port id")?;
                    port_id = Some(PortId { subtype, id });
                }
                TLV_TTL => {
                    let bytes: [u8; 2] = tlv.value.try_into().map_err(|_| {
                        LldpError::Decode(format!("ttl tlv has {} bytes, want 2", tlv.value.len()))
                    })?;
                    ttl = Some(u16::from_be_bytes(bytes));
                }
                TLV_PORT_DESCRIPTION => port_description = Some(text(tlv.value)),
                TLV_SYSTEM_NAME => system_name = Some(text(tlv.value)),
                TLV_SYSTEM_DESCRIPTION => system_description = Some(text(tlv.value)),
                // Capabilities, management address, org specific...
                _ => {}
            }
        }

        match (chassis_id, port_id, ttl) {
            (Some(chassis_id), Some(port_id), Some(ttl)) => Ok(Lldpdu {
                chassis_id,
                port_id,
                ttl,
                port_description,
                system_name,
                system_description,
            }),
            _ => Err(LldpError::Decode("lldpdu misses a mandatory tlv".to_string())),
        }
    }
}

fn split_subtype(value: &[u8], what: &str) -> Result<(u8, Vec<u8>)> {
    match value.split_first() {
        Some((subtype, id)) if !id.is_empty() => Ok((*subtype, id.to_vec())),
        _ => Err(LldpError::Decode(format!("{} tlv too short", what))),
    }
}

fn text(value: &[u8]) -> String {
    String::from_utf8_lossy(value).into_owned()
}
