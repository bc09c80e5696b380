//! # Protocol Definitions
//!
//! Wire constants shared by the encoder, the raw socket transport and the
//! capture path. See IEEE 802.1AB-2016, section 8.

use std::fmt;
use std::str::FromStr;

/// LLDP EtherType.
/// https://www.iana.org/assignments/ieee-802-numbers/ieee-802-numbers.xhtml
pub const ETHER_TYPE_LLDP: u16 = 0x88cc;

/// 802.1Q VLAN tag protocol identifier.
pub const ETHER_TYPE_VLAN: u16 = 0x8100;

/// Nearest-bridge group address. Frames sent here are never forwarded by
/// 802.1D bridges.
pub const NEAREST_BRIDGE: MacAddr = MacAddr([0x01, 0x80, 0xc2, 0x00, 0x00, 0x0e]);

/// `TC_PRIO_CONTROL`, newer intel NICs do not forward frames queued at the
/// default socket priority.
pub const TC_PRIO_CONTROL: i32 = 7;

pub const ETHERNET_HEADER_LEN: usize = 14;
/// Minimum frame size without FCS. Shorter frames are zero padded.
pub const ETHERNET_MIN_FRAME_LEN: usize = 60;

/// The TLV length field is 9 bits wide.
pub const MAX_TLV_VALUE_LEN: usize = 0x01ff;
/// The TLV type field is 7 bits wide.
pub const MAX_TLV_TYPE: u8 = 0x7f;

pub const TLV_END: u8 = 0;
pub const TLV_CHASSIS_ID: u8 = 1;
pub const TLV_PORT_ID: u8 = 2;
pub const TLV_TTL: u8 = 3;
pub const TLV_PORT_DESCRIPTION: u8 = 4;
pub const TLV_SYSTEM_NAME: u8 = 5;
pub const TLV_SYSTEM_DESCRIPTION: u8 = 6;

pub const CHASSIS_ID_SUBTYPE_MAC_ADDRESS: u8 = 4;
pub const PORT_ID_SUBTYPE_INTERFACE_NAME: u8 = 5;

/// ARPHRD_ETHER from `if_arp.h`.
pub const ARPHRD_ETHER: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 == 0x01
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        MacAddr(octets)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.trim().split(':');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(|| format!("mac address {:?} too short", s))?;
            *octet = u8::from_str_radix(part, 16)
                .map_err(|e| format!("invalid octet {:?} in mac address {:?}: {}", part, s, e))?;
        }
        if parts.next().is_some() {
            return Err(format!("mac address {:?} too long", s));
        }
        Ok(MacAddr(octets))
    }
}
