//! Marshalling of SystemVerilog DPI open arrays.
//!
//! A simulator calls into this crate through the DPI-C import
//!
//! ```text
//! import "DPI-C" function int send_udp_packet(
//!     input string ip_address, input shortint unsigned port, input byte data[]);
//! ```
//!
//! and hands over `data` as an `svOpenArrayHandle`. The crate copies the
//! open array into an owned `Vec<u8>`, preserving element order, and passes
//! it together with the address and port to a [`PacketSink`].
//!
//! # Modules
//!
//! - [`array`]: the [`OpenArray`] descriptor and an in-memory implementation
//! - [`svdpi`]: bindings to the simulator's `svdpi.h` accessors
//! - [`marshal`]: [`read_data`] and [`send_packet`]
//! - [`sink`]: the [`PacketSink`] seam and the default [`DiscardSink`]
//! - [`config`]: sink logging options loaded from TOML
//! - [`error`]: error types and C status codes
//!
//! # Safety
//!
//! The C entry point checks the address pointer for null and never reads an
//! element pointer the simulator reports as null. Errors become status codes;
//! nothing unwinds across the boundary.

pub mod array;
pub mod config;
pub mod error;
mod exports;
pub mod marshal;
pub mod sink;
pub mod svdpi;

pub use array::{OpenArray, SliceArray};
pub use config::MarshalConfig;
pub use error::{MarshalError, MarshalResult, SendStatus};
pub use exports::*;
pub use marshal::{read_data, send_packet};
pub use sink::{
    register_packet_sink, unregister_packet_sink, with_packet_sink, Datagram, DiscardSink,
    PacketSink,
};
pub use svdpi::{SvOpenArray, SvOpenArrayHandle};
