//! Opaque-handle C ABI for a stateful Rust object.
//!
//! A foreign caller (C, C++, a simulator, anything that speaks the C ABI)
//! manages a [`Dog`] purely through an address-sized token and four free
//! functions:
//!
//! ```text
//! uintptr_t dog_ctor(void);
//! void      dog_dctor(uintptr_t dog);
//! void      dog_run(uintptr_t dog, int distance);
//! int       dog_distance(uintptr_t dog);
//! ```
//!
//! # Safety
//!
//! Handles are keys into a process-wide [`HandleRegistry`], never pointers.
//! The exported functions therefore never dereference caller-supplied
//! values:
//!
//! 1. Handles are issued from a monotonic counter and never reused
//! 2. Destroyed, foreign or null handles are rejected, not dereferenced
//! 3. Failures are reported through `dog_last_error()` instead of unwinding
//! 4. The registry is mutex-guarded, so callers on any thread are serialised

mod dog;
mod error;
mod exports;
mod registry;

pub use dog::*;
pub use error::{HandleError, HandleErrorCode, HandleResult};
pub use exports::*;
pub use registry::{Handle, HandleRegistry, RawHandle};
