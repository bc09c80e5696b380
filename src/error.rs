use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LldpError {
    #[error("interface {0} not found")]
    InterfaceNotFound(String),

    #[error("unable to open raw socket on interface {interface}: {source}")]
    Open {
        interface: String,
        #[source]
        source: io::Error,
    },

    #[error("unable to bind raw socket on interface {interface}: {source}")]
    Bind {
        interface: String,
        #[source]
        source: io::Error,
    },

    #[error("tlv type {tlv_type} value is {len} bytes, at most 511 fit into the length field")]
    TlvTooLong { tlv_type: u8, len: usize },

    #[error("transport is not bound")]
    NotBound,

    #[error("unable to write to socket: {0}")]
    Write(#[source] io::Error),

    #[error("unable to open capture on interface {interface}: {source}")]
    CaptureOpen {
        interface: String,
        #[source]
        source: io::Error,
    },

    #[error("capture read failed: {0}")]
    CaptureRead(#[source] io::Error),

    #[error("capture stream on interface {0} ended")]
    StreamEnded(String),

    #[error("malformed frame: {0}")]
    Decode(String),

    #[error("engine for interface {interface} is {state}")]
    EngineState { interface: String, state: &'static str },

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl LldpError {
    /// Construction-time errors that keep an engine from ever reaching `Running`.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LldpError::InterfaceNotFound(_)
                | LldpError::Open { .. }
                | LldpError::Bind { .. }
                | LldpError::TlvTooLong { .. }
                | LldpError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LldpError>;
