//! End-to-end marshalling through the C entry point and a recording sink.

use std::ffi::CString;
use std::io::Write;
use std::sync::mpsc::{channel, Receiver, Sender};

use ffi_svdpi::{
    read_data, register_packet_sink, send_packet, send_udp_packet_with, unregister_packet_sink,
    Datagram, DiscardSink, MarshalConfig, MarshalError, MarshalResult, OpenArray, PacketSink,
    SendStatus, SliceArray,
};
use pretty_assertions::assert_eq;

#[derive(Debug, PartialEq)]
struct Sent {
    address: String,
    port: u16,
    payload: Vec<u8>,
}

struct RecordingSink {
    tx: Sender<Sent>,
    status: i32,
}

impl RecordingSink {
    fn new(status: i32) -> (Self, Receiver<Sent>) {
        let (tx, rx) = channel();
        (Self { tx, status }, rx)
    }
}

impl PacketSink for RecordingSink {
    fn send(&self, datagram: &Datagram<'_>) -> MarshalResult<()> {
        self.tx
            .send(Sent {
                address: datagram.address.to_string(),
                port: datagram.port,
                payload: datagram.payload.to_vec(),
            })
            .expect("receiver alive");
        if self.status == 0 {
            Ok(())
        } else {
            Err(MarshalError::sink(self.status))
        }
    }
}

/// Descending SystemVerilog range such as `byte data[2:0]`.
struct Descending;

impl OpenArray for Descending {
    fn left(&self) -> i32 {
        2
    }

    fn right(&self) -> i32 {
        0
    }

    fn size(&self) -> usize {
        3
    }

    fn element(&self, _index: i32) -> Option<u8> {
        Some(0xff)
    }
}

/// Claims far more elements than its empty bounds describe.
struct InflatedSize;

impl OpenArray for InflatedSize {
    fn left(&self) -> i32 {
        1
    }

    fn right(&self) -> i32 {
        0
    }

    fn size(&self) -> usize {
        usize::MAX
    }

    fn element(&self, _index: i32) -> Option<u8> {
        None
    }
}

#[test]
fn abc_reaches_sink_unchanged() {
    let (sink, rx) = RecordingSink::new(0);
    register_packet_sink(Box::new(sink));

    let address = CString::new("10.1.2.3").unwrap();
    let array = SliceArray::new(&[0x41, 0x42, 0x43]);
    let status = unsafe { send_udp_packet_with(address.as_ptr(), 4791, &array) };

    assert_eq!(status, 0);
    assert_eq!(
        rx.try_recv().unwrap(),
        Sent {
            address: "10.1.2.3".to_string(),
            port: 4791,
            payload: vec![0x41, 0x42, 0x43],
        }
    );
    assert!(rx.try_recv().is_err());
    unregister_packet_sink();
}

#[test]
fn buffer_matches_bounds() {
    let backing: Vec<u8> = (0..=255).collect();
    for low in [-300, -1, 0, 1, 7, 1_000_000] {
        for len in [0usize, 1, 2, 17, 256] {
            let array = SliceArray::with_bounds(low, &backing[..len]).unwrap();
            let (left, right) = (array.left(), array.right());
            let data = read_data(&array).unwrap();

            let expected_len = (i64::from(right) - i64::from(left) + 1).max(0) as usize;
            assert_eq!(data.len(), expected_len);
            for index in left..=right {
                assert_eq!(Some(data[(index - left) as usize]), array.element(index));
            }
        }
    }
}

#[test]
fn empty_range_succeeds() {
    let (sink, rx) = RecordingSink::new(0);
    let array = SliceArray::with_bounds(3, &[]).unwrap();
    assert!(array.left() > array.right());

    send_packet("h", 1, &array, &sink).unwrap();
    assert_eq!(rx.try_recv().unwrap().payload, Vec::<u8>::new());
}

#[test]
fn descending_range_is_empty() {
    assert_eq!(read_data(&Descending).unwrap(), Vec::<u8>::new());
}

#[test]
fn inflated_size_with_empty_bounds_succeeds() {
    let (sink, rx) = RecordingSink::new(0);
    register_packet_sink(Box::new(sink));

    let address = CString::new("h").unwrap();
    let status = unsafe { send_udp_packet_with(address.as_ptr(), 1, &InflatedSize) };

    assert_eq!(status, 0);
    assert_eq!(rx.try_recv().unwrap().payload, Vec::<u8>::new());
    unregister_packet_sink();
}

#[test]
fn sink_failure_code_is_returned() {
    let (sink, rx) = RecordingSink::new(42);
    register_packet_sink(Box::new(sink));

    let address = CString::new("::1").unwrap();
    let status = unsafe { send_udp_packet_with(address.as_ptr(), 9, &SliceArray::new(&[1, 2])) };

    assert_eq!(status, 42);
    assert_eq!(rx.try_recv().unwrap().payload, vec![1, 2]);
    unregister_packet_sink();
}

#[test]
fn null_address_never_reaches_sink() {
    let (sink, rx) = RecordingSink::new(0);
    register_packet_sink(Box::new(sink));

    let status = unsafe { send_udp_packet_with(std::ptr::null(), 9, &SliceArray::new(&[1])) };

    assert_eq!(SendStatus::from_raw(status), SendStatus::NullArgument);
    assert!(rx.try_recv().is_err());
    unregister_packet_sink();
}

#[test]
fn default_sink_without_registration() {
    unregister_packet_sink();
    let address = CString::new("127.0.0.1").unwrap();
    let status = unsafe { send_udp_packet_with(address.as_ptr(), 53, &SliceArray::new(b"q")) };
    assert_eq!(status, 0);
}

#[test]
fn config_file_drives_discard_sink() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "log_payload = true").unwrap();
    writeln!(file, "payload_preview_bytes = 4").unwrap();

    let config = MarshalConfig::from_file(file.path()).unwrap();
    assert!(config.log_payload);

    let sink = DiscardSink::new(config);
    assert_eq!(sink.preview(b"ABCDEF"), "41 42 43 44 ..");
    send_packet("h", 1, &SliceArray::new(b"ABCDEF"), &sink).unwrap();
}

#[test]
fn config_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("svdpi.toml");
    let config = MarshalConfig {
        log_payload: true,
        payload_preview_bytes: 64,
    };

    config.save(&path).unwrap();
    assert_eq!(MarshalConfig::from_file(&path).unwrap(), config);
}
