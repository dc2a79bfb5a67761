//! Dog lifecycle functions exported for C callers.
//!
//! Every export records its outcome in a thread-local last-error slot that
//! the caller can read back with `dog_last_error()`, the same way `errno`
//! works. A successful call clears the slot.

use std::cell::Cell;

use once_cell::sync::Lazy;

use crate::dog::Dog;
use crate::error::{HandleErrorCode, HandleResult};
use crate::registry::{Handle, HandleRegistry, RawHandle};

// =============================================================================
// Process-wide registry and last-error slot
// =============================================================================

static DOGS: Lazy<HandleRegistry<Dog>> = Lazy::new(HandleRegistry::new);

thread_local! {
    /// Outcome of the most recent export called on this thread.
    static LAST_ERROR: Cell<HandleErrorCode> = const { Cell::new(HandleErrorCode::Ok) };
}

/// Returns the registry backing the exported functions.
pub fn dogs() -> &'static HandleRegistry<Dog> {
    &DOGS
}

fn record<T>(op: &str, result: HandleResult<T>) -> Option<T> {
    match result {
        Ok(value) => {
            LAST_ERROR.with(|slot| slot.set(HandleErrorCode::Ok));
            Some(value)
        }
        Err(e) => {
            log::warn!("{} rejected: {}", op, e);
            LAST_ERROR.with(|slot| slot.set(e.code()));
            None
        }
    }
}

// =============================================================================
// Safe Rust API
// =============================================================================

/// Creates a dog and returns its handle.
pub fn create_dog() -> HandleResult<Handle> {
    let handle = DOGS.insert(Dog::new())?;
    log::debug!("Created dog {}", handle);
    Ok(handle)
}

/// Destroys the dog behind `handle`. A second destroy is rejected.
pub fn destroy_dog(handle: RawHandle) -> HandleResult<()> {
    let dog = DOGS.remove(handle)?;
    log::debug!(
        "Destroyed dog 0x{:x} after {} units",
        handle,
        dog.distance()
    );
    Ok(())
}

/// Makes the dog behind `handle` run `distance` units.
pub fn run_dog(handle: RawHandle, distance: i32) -> HandleResult<()> {
    DOGS.with_mut(handle, |dog| dog.run(distance))
}

/// Returns how far the dog behind `handle` has run.
pub fn get_dog_distance(handle: RawHandle) -> HandleResult<i32> {
    DOGS.with(handle, Dog::distance)
}

// =============================================================================
// Exported C functions
// =============================================================================

/// Creates a dog and returns its opaque handle.
///
/// Returns 0 if no handle could be issued; `dog_last_error()` tells why.
#[no_mangle]
pub extern "C" fn dog_ctor() -> RawHandle {
    record("dog_ctor", create_dog())
        .map(|h| h.as_raw())
        .unwrap_or(0)
}

/// Destroys a dog.
///
/// Null, foreign and already-destroyed handles are ignored and reported
/// through `dog_last_error()`.
#[no_mangle]
pub extern "C" fn dog_dctor(dog: RawHandle) {
    record("dog_dctor", destroy_dog(dog));
}

/// Adds `distance` to the dog's total.
#[no_mangle]
pub extern "C" fn dog_run(dog: RawHandle, distance: i32) {
    record("dog_run", run_dog(dog, distance));
}

/// Returns the dog's total distance, or 0 if the handle is not live.
#[no_mangle]
pub extern "C" fn dog_distance(dog: RawHandle) -> i32 {
    record("dog_distance", get_dog_distance(dog)).unwrap_or(0)
}

/// Returns the error code of the last dog call made on this thread.
#[no_mangle]
pub extern "C" fn dog_last_error() -> i32 {
    LAST_ERROR.with(|slot| slot.get()).as_raw()
}

/// Resets the last-error slot of this thread.
#[no_mangle]
pub extern "C" fn dog_clear_error() {
    LAST_ERROR.with(|slot| slot.set(HandleErrorCode::Ok));
}

// =============================================================================
// Tests
// =============================================================================
