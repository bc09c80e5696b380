use super::traits::LldpEncode;
use crate::error::{LldpError, Result};
use crate::protocol::{MAX_TLV_TYPE, MAX_TLV_VALUE_LEN, TLV_END};
use std::io::Write;

/// A single Type-Length-Value element.
///
/// The 2 byte header packs a 7 bit type and a 9 bit value length, big endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    pub tlv_type: u8,
    pub value: Vec<u8>,
}

impl Tlv {
    pub const HEADER_LENGTH: usize = 2;

    pub fn new(tlv_type: u8, value: impl Into<Vec<u8>>) -> Self {
        Tlv {
            tlv_type,
            value: value.into(),
        }
    }

    /// A TLV whose value is prefixed with a one byte subtype.
    pub fn with_subtype(tlv_type: u8, subtype: u8, id: &[u8]) -> Self {
        let mut value = Vec::with_capacity(id.len() + 1);
        value.push(subtype);
        value.extend_from_slice(id);
        Tlv { tlv_type, value }
    }

    pub fn end() -> Self {
        Tlv::new(TLV_END, Vec::new())
    }

    pub fn header(&self) -> Result<u16> {
        debug_assert!(self.tlv_type <= MAX_TLV_TYPE);
        if self.value.len() > MAX_TLV_VALUE_LEN {
            return Err(LldpError::TlvTooLong {
                tlv_type: self.tlv_type,
                len: self.value.len(),
            });
        }
        Ok((u16::from(self.tlv_type) << 9) | self.value.len() as u16)
    }
}

impl LldpEncode for Tlv {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        let header = self.header()?;
        writer.write_all(&header.to_be_bytes())?;
        writer.write_all(&self.value)?;
        Ok(())
    }
}

/// Borrowed view of one TLV inside a received LLDPDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvRef<'a> {
    pub tlv_type: u8,
    pub value: &'a [u8],
}

/// Walks a TLV sequence. Stops after End-of-LLDPDU or at the end of the
/// buffer; a truncated TLV yields one error and ends the iteration.
pub struct TlvReader<'a> {
    buf: &'a [u8],
    done: bool,
}

impl<'a> TlvReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        TlvReader { buf, done: false }
    }
}

impl<'a> Iterator for TlvReader<'a> {
    type Item = Result<TlvRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.buf.is_empty() {
            return None;
        }
        if self.buf.len() < Tlv::HEADER_LENGTH {
            self.done = true;
            return Some(Err(LldpError::Decode(format!(
                "{} trailing bytes are too short for a tlv header",
                self.buf.len()
            ))));
        }

        let header = u16::from_be_bytes([self.buf[0], self.buf[1]]);
        let tlv_type = (header >> 9) as u8;
        let len = usize::from(header & 0x01ff);
        let rest = &self.buf[Tlv::HEADER_LENGTH..];
        if rest.len() < len {
            self.done = true;
            return Some(Err(LldpError::Decode(format!(
                "tlv type {} declares {} bytes, only {} left",
                tlv_type,
                len,
                rest.len()
            ))));
        }

        let (value, remaining) = rest.split_at(len);
        self.buf = remaining;
        if tlv_type == TLV_END {
            self.done = true;
        }
        Some(Ok(TlvRef { tlv_type, value }))
    }
}
