use super::traits::{LldpDecode, LldpEncode};
use crate::error::{LldpError, Result};
use crate::protocol::{
    ETHERNET_HEADER_LEN, ETHERNET_MIN_FRAME_LEN, ETHER_TYPE_LLDP, ETHER_TYPE_VLAN, MacAddr,
    NEAREST_BRIDGE,
};
use std::io::Write;

/// Ethernet II frame without FCS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub ether_type: u16,
    /// Present when the frame carried a single 802.1Q tag.
    pub vlan_id: Option<u16>,
    pub payload: Vec<u8>,
}

impl EthernetFrame {
    /// An LLDP frame addressed to the nearest-bridge group.
    pub fn lldp(source: MacAddr, payload: Vec<u8>) -> Self {
        EthernetFrame {
            destination: NEAREST_BRIDGE,
            source,
            ether_type: ETHER_TYPE_LLDP,
            vlan_id: None,
            payload,
        }
    }

    pub fn is_lldp(&self) -> bool {
        self.ether_type == ETHER_TYPE_LLDP
    }
}

impl LldpEncode for EthernetFrame {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.destination.octets())?;
        writer.write_all(&self.source.octets())?;
        if let Some(vlan_id) = self.vlan_id {
            writer.write_all(&ETHER_TYPE_VLAN.to_be_bytes())?;
            writer.write_all(&(vlan_id & 0x0fff).to_be_bytes())?;
        }
        writer.write_all(&self.ether_type.to_be_bytes())?;
        writer.write_all(&self.payload)?;

        let header_len = ETHERNET_HEADER_LEN + if self.vlan_id.is_some() { 4 } else { 0 };
        let written = header_len + self.payload.len();
        if written < ETHERNET_MIN_FRAME_LEN {
            writer.write_all(&vec![0u8; ETHERNET_MIN_FRAME_LEN - written])?;
        }
        Ok(())
    }
}

impl LldpDecode for EthernetFrame {
    fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < ETHERNET_HEADER_LEN {
            return Err(LldpError::Decode(format!(
                "{} bytes are too short for an ethernet header",
                buf.len()
            )));
        }

        let mut destination = [0u8; 6];
        destination.copy_from_slice(&buf[0..6]);
        let mut source = [0u8; 6];
        source.copy_from_slice(&buf[6..12]);
        let mut ether_type = u16::from_be_bytes([buf[12], buf[13]]);
        let mut offset = ETHERNET_HEADER_LEN;
        let mut vlan_id = None;

        if ether_type == ETHER_TYPE_VLAN {
            if buf.len() < ETHERNET_HEADER_LEN + 4 {
                return Err(LldpError::Decode("truncated 802.1Q tag".to_string()));
            }
            vlan_id = Some(u16::from_be_bytes([buf[14], buf[15]]) & 0x0fff);
            ether_type = u16::from_be_bytes([buf[16], buf[17]]);
            offset += 4;
        }

        Ok(EthernetFrame {
            destination: MacAddr(destination),
            source: MacAddr(source),
            ether_type,
            vlan_id,
            payload: buf[offset..].to_vec(),
        })
    }
}
