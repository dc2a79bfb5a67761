//! Destinations for marshalled datagrams.
//!
//! The transmission itself is an external collaborator. This module only
//! defines the seam ([`PacketSink`]), a default that accepts and logs every
//! datagram ([`DiscardSink`]), and a thread-local slot where the embedding
//! program registers the real sink before the simulator starts calling in.

use std::cell::RefCell;

use crate::config::MarshalConfig;
use crate::error::MarshalResult;

/// A payload addressed to `address:port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datagram<'a> {
    /// Destination address exactly as received. Not validated or resolved.
    pub address: &'a str,
    pub port: u16,
    pub payload: &'a [u8],
}

impl<'a> Datagram<'a> {
    pub fn new(address: &'a str, port: u16, payload: &'a [u8]) -> Self {
        Self {
            address,
            port,
            payload,
        }
    }
}

/// Sends datagrams somewhere.
///
/// Implementations report failure with [`MarshalError::sink`], whose code is
/// handed back to the simulator unchanged.
///
/// [`MarshalError::sink`]: crate::MarshalError::sink
pub trait PacketSink: Send {
    fn send(&self, datagram: &Datagram<'_>) -> MarshalResult<()>;
}

/// Accepts every datagram without transmitting it.
#[derive(Debug, Clone, Default)]
pub struct DiscardSink {
    config: MarshalConfig,
}

impl DiscardSink {
    pub fn new(config: MarshalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    /// Formats up to `payload_preview_bytes` of the payload as hex.
    pub fn preview(&self, payload: &[u8]) -> String {
        let shown = payload.len().min(self.config.payload_preview_bytes);
        let mut out = payload[..shown]
            .chunks(1)
            .map(hex::encode)
            .collect::<Vec<_>>()
            .join(" ");
        if shown < payload.len() {
            out.push_str(" ..");
        }
        out
    }
}

impl PacketSink for DiscardSink {
    fn send(&self, datagram: &Datagram<'_>) -> MarshalResult<()> {
        if self.config.log_payload {
            log::info!(
                "Discarding {} bytes for {}:{} [{}]",
                datagram.payload.len(),
                datagram.address,
                datagram.port,
                self.preview(datagram.payload)
            );
        } else {
            log::debug!(
                "Discarding {} bytes for {}:{}",
                datagram.payload.len(),
                datagram.address,
                datagram.port
            );
        }
        Ok(())
    }
}

// =============================================================================
// Thread-local sink registration
// =============================================================================

thread_local! {
    /// Sink used by `send_udp_packet` on this thread. DPI calls arrive on the
    /// simulator thread, so the sink is registered there.
    static PACKET_SINK: RefCell<Option<Box<dyn PacketSink>>> = RefCell::new(None);
}

/// Registers the sink used by `send_udp_packet` on the current thread.
pub fn register_packet_sink(sink: Box<dyn PacketSink>) {
    PACKET_SINK.with(|cell| {
        *cell.borrow_mut() = Some(sink);
    });
}

/// Unregisters the sink, restoring the default [`DiscardSink`].
pub fn unregister_packet_sink() {
    PACKET_SINK.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Runs `f` with the registered sink, or a default [`DiscardSink`].
///
/// Sinks must not register or unregister sinks from inside `send`.
pub fn with_packet_sink<R>(f: impl FnOnce(&dyn PacketSink) -> R) -> R {
    PACKET_SINK.with(|cell| match cell.borrow().as_deref() {
        Some(sink) => f(sink),
        None => f(&DiscardSink::default()),
    })
}
