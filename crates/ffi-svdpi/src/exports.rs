//! DPI-C entry points exported to the simulator.

use std::borrow::Cow;
use std::ffi::{c_char, c_int, CStr};

use crate::array::OpenArray;
use crate::error::{MarshalError, MarshalResult, SendStatus};
use crate::marshal::send_packet;
use crate::sink::with_packet_sink;
use crate::svdpi::{SvOpenArray, SvOpenArrayHandle};

/// Reads the address string. Invalid UTF-8 is replaced, not rejected.
///
/// # Safety
///
/// - `ip_address` must be null or a valid NUL-terminated C string living
///   for `'a`
unsafe fn address_from_ptr<'a>(ip_address: *const c_char) -> MarshalResult<Cow<'a, str>> {
    if ip_address.is_null() {
        return Err(MarshalError::NullAddress);
    }
    Ok(unsafe { CStr::from_ptr(ip_address) }.to_string_lossy())
}

/// Marshals `data` and sends it through the registered sink.
///
/// Returns 0 on success, a [`SendStatus`] code for failures raised before
/// the sink, or the sink's own nonzero code.
///
/// # Safety
///
/// - `ip_address` must be null or a valid NUL-terminated C string that
///   outlives the call
pub unsafe fn send_udp_packet_with(
    ip_address: *const c_char,
    port: u16,
    data: &impl OpenArray,
) -> c_int {
    let result = unsafe { address_from_ptr(ip_address) }
        .and_then(|address| with_packet_sink(|sink| send_packet(&address, port, data, sink)));

    match result {
        Ok(()) => SendStatus::Success.as_raw(),
        Err(e) => {
            log::warn!("send_udp_packet to port {} failed: {}", port, e);
            e.status_code()
        }
    }
}

/// DPI-C import `send_udp_packet`.
///
/// Always exported. Without the `svdpi-link` feature the open array reads
/// as empty, so the call forwards an empty payload.
///
/// # Safety
///
/// - `ip_address` must be null or a valid NUL-terminated C string
/// - `data` must be the open array handle of the current DPI call
#[no_mangle]
pub unsafe extern "C" fn send_udp_packet(
    ip_address: *const c_char,
    port: u16,
    data: SvOpenArrayHandle,
) -> c_int {
    let array = unsafe { SvOpenArray::from_raw(data) };
    unsafe { send_udp_packet_with(ip_address, port, &array) }
}
