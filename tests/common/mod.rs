//! Shared fixtures for the integration tests.

use bytewire::base::ByteOrder;
use bytewire::tlv::{Definition, FrameCode, Limits, Protocol, StdParamType};
use tracing_subscriber::EnvFilter;

//------------ Ping ----------------------------------------------------------

bytewire::tlv_enum! {
    /// A small protocol with a single version.
    =>
    pub Ping;

    (V1 => 1, "V1")
}

impl Protocol for Ping {
    fn byte_order(self) -> ByteOrder {
        ByteOrder::BigEndian
    }

    fn limits(self) -> Limits {
        Limits::new(10, 10, 1024)
    }
}

bytewire::tlv_enum! {
    /// The frames of the ping protocol.
    =>
    pub PingFrame;

    (Ping => 1, "Ping")
    (Pong => 2, "Pong")
}

impl FrameCode for PingFrame {}

/// The definition of the ping protocol.
pub type PingDefinition = Definition<Ping, PingFrame, StdParamType>;

/// Setup logging of events reported by the codec.
///
/// Use the RUST_LOG environment variable to enable output, e.g.,
/// `RUST_LOG=bytewire=trace`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_thread_ids(true)
        .without_time()
        .try_init()
        .ok();
}
