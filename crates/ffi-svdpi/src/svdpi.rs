//! Bindings to the simulator's svdpi.h open array accessors.
//!
//! The symbols are provided by the simulator process that loads this
//! library, so they are only declared when the `svdpi-link` feature is on.
//! Without it every accessor logs a warning and reports an empty array, and
//! the exported `send_udp_packet` still links and forwards empty payloads.

use std::ffi::c_void;
#[cfg(feature = "svdpi-link")]
use std::ffi::c_int;

use crate::array::OpenArray;

/// Opaque open array handle (`svOpenArrayHandle` in svdpi.h).
pub type SvOpenArrayHandle = *mut c_void;

// =============================================================================
// svdpi.h declarations (extern "C")
// =============================================================================

#[cfg(feature = "svdpi-link")]
extern "C" {
    fn svLeft(h: SvOpenArrayHandle, d: c_int) -> c_int;
    fn svRight(h: SvOpenArrayHandle, d: c_int) -> c_int;
    fn svSize(h: SvOpenArrayHandle, d: c_int) -> c_int;
    fn svGetArrElemPtr1(h: SvOpenArrayHandle, indx1: c_int) -> *mut c_void;
}

/// Open arrays passed to `send_udp_packet` are one-dimensional.
#[cfg(feature = "svdpi-link")]
const DIMENSION: c_int = 1;

// =============================================================================
// Safe wrapper
// =============================================================================

/// An open array owned by the simulator for the duration of a DPI call.
#[derive(Debug)]
pub struct SvOpenArray {
    handle: SvOpenArrayHandle,
}

impl SvOpenArray {
    /// Wraps a handle received from the simulator.
    ///
    /// # Safety
    ///
    /// - `handle` must be the `svOpenArrayHandle` of an unpacked byte array
    ///   passed into the current DPI import call
    /// - the wrapper must not outlive that call
    pub unsafe fn from_raw(handle: SvOpenArrayHandle) -> Self {
        Self { handle }
    }

    /// Returns the raw handle.
    pub fn as_raw(&self) -> SvOpenArrayHandle {
        self.handle
    }
}

#[cfg(feature = "svdpi-link")]
impl OpenArray for SvOpenArray {
    fn left(&self) -> i32 {
        // Safety: handle validity is guaranteed by from_raw's contract
        unsafe { svLeft(self.handle, DIMENSION) }
    }

    fn right(&self) -> i32 {
        unsafe { svRight(self.handle, DIMENSION) }
    }

    fn size(&self) -> usize {
        let size = unsafe { svSize(self.handle, DIMENSION) };
        usize::try_from(size).unwrap_or(0)
    }

    fn element(&self, index: i32) -> Option<u8> {
        let ptr = unsafe { svGetArrElemPtr1(self.handle, index) };
        if ptr.is_null() {
            return None;
        }
        // Safety: a non-null element pointer of a byte array points to one
        // readable byte for the duration of the call
        Some(unsafe { *ptr.cast::<u8>() })
    }
}

/// Stub implementation when svdpi linking is not enabled.
#[cfg(not(feature = "svdpi-link"))]
impl OpenArray for SvOpenArray {
    fn left(&self) -> i32 {
        log::warn!("SvOpenArray::left called without svdpi-link feature");
        0
    }

    fn right(&self) -> i32 {
        log::warn!("SvOpenArray::right called without svdpi-link feature");
        -1
    }

    fn size(&self) -> usize {
        log::warn!("SvOpenArray::size called without svdpi-link feature");
        0
    }

    fn element(&self, _index: i32) -> Option<u8> {
        log::warn!("SvOpenArray::element called without svdpi-link feature");
        None
    }
}
