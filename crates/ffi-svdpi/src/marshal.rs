//! Copying open arrays into owned buffers.

use crate::array::OpenArray;
use crate::error::{MarshalError, MarshalResult};
use crate::sink::{Datagram, PacketSink};

/// Copies every element of `array` into a new buffer, in index order.
///
/// Walks `left()..=right()` ascending, so `buf[i - left] == array[i]`. An
/// array whose left bound is greater than its right bound yields an empty
/// buffer.
///
/// `size()` only sizes the initial reservation, and never beyond the number
/// of indices the bounds describe.
pub fn read_data(array: &impl OpenArray) -> MarshalResult<Vec<u8>> {
    let (low, high) = (array.left(), array.right());
    let span = (i64::from(high) - i64::from(low) + 1).max(0);
    let span = usize::try_from(span).unwrap_or(usize::MAX);
    let mut data = Vec::with_capacity(array.size().min(span));

    for index in low..=high {
        let byte = array
            .element(index)
            .ok_or(MarshalError::MissingElement { index })?;
        data.push(byte);
    }

    Ok(data)
}

/// Marshals `array` and hands it to `sink` addressed to `address:port`.
///
/// The sink is called exactly once, and only if marshalling succeeded.
pub fn send_packet(
    address: &str,
    port: u16,
    array: &impl OpenArray,
    sink: &dyn PacketSink,
) -> MarshalResult<()> {
    let payload = read_data(array)?;
    log::debug!(
        "Marshalled {} bytes [{}:{}] for {}:{}",
        payload.len(),
        array.left(),
        array.right(),
        address,
        port
    );
    sink.send(&Datagram::new(address, port, &payload))
}
