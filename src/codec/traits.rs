use crate::error::Result;
use std::io::Write;

// Types that can be written as LLDP wire bytes
pub trait LldpEncode {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()>;

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(&mut buf)?;
        Ok(buf)
    }
}

// Types that can be parsed from LLDP wire bytes
pub trait LldpDecode: Sized {
    fn decode(buf: &[u8]) -> Result<Self>;
}
