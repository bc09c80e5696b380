pub mod codec;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod host;
pub mod logging;
pub mod model;
pub mod protocol;
pub mod runtime;
pub mod signal;
pub mod transport;

pub use codec::{EthernetFrame, LldpDecode, LldpEncode, Lldpdu, build, build_frame};
pub use discovery::{DiscoveryListener, DiscoveryResult};
pub use engine::{EngineState, TransmitEngine};
pub use error::{LldpError, Result};
pub use model::{Identity, InterfaceHandle};
pub use protocol::MacAddr;
pub use runtime::{DaemonConfig, InstallConfig, LldpRuntime};
pub use transport::{CaptureSource, LinkTransport, PacketCapture, RawSocketTransport};
