//! Handle registry mapping opaque tokens to owned objects.
//!
//! The registry is the only owner of objects handed across the boundary.
//! Callers hold a [`Handle`]; the object itself never leaves the map except
//! through [`HandleRegistry::remove`].
//!
//! Unlike a `HashMap` keyed by pointer, lookups never fabricate or
//! dereference anything: a handle that was not issued, or was already
//! removed, is reported as [`HandleError::InvalidHandle`].

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::error::{HandleError, HandleResult};

/// Raw handle value as seen by C (`uintptr_t`). Zero is the null handle.
pub type RawHandle = usize;

/// A live handle issued by a [`HandleRegistry`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(NonZeroUsize);

impl Handle {
    /// Wraps a raw value. Returns `None` for the null handle.
    pub fn from_raw(raw: RawHandle) -> Option<Self> {
        NonZeroUsize::new(raw).map(Handle)
    }

    /// Returns the raw value passed to C.
    pub const fn as_raw(&self) -> RawHandle {
        self.0.get()
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(0x{:x})", self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

struct RegistryInner<T> {
    next: RawHandle,
    objects: HashMap<RawHandle, T>,
}

/// Thread-safe map from issued handles to owned objects.
///
/// # Example
///
/// ```
/// use ffi_handle::{Dog, HandleRegistry};
///
/// let registry = HandleRegistry::new();
/// let handle = registry.insert(Dog::new()).unwrap();
///
/// registry.with_mut(handle.as_raw(), |dog| dog.run(4)).unwrap();
/// assert_eq!(registry.with(handle.as_raw(), Dog::distance), Ok(4));
///
/// registry.remove(handle.as_raw()).unwrap();
/// assert!(registry.with(handle.as_raw(), Dog::distance).is_err());
/// ```
pub struct HandleRegistry<T> {
    inner: Mutex<RegistryInner<T>>,
}

impl<T> HandleRegistry<T> {
    /// Creates an empty registry. The first handle issued is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates an empty registry issuing handles from `first`.
    ///
    /// A `first` of zero is bumped to one so the null handle is never issued.
    pub fn starting_at(first: RawHandle) -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                next: first.max(1),
                objects: HashMap::new(),
            }),
        }
    }

    /// Takes ownership of `object` and returns a fresh handle for it.
    pub fn insert(&self, object: T) -> HandleResult<Handle> {
        let mut inner = self.inner.lock();
        let raw = inner.next;
        // next == 0 marks the handle space as used up.
        let handle = Handle::from_raw(raw).ok_or(HandleError::Exhausted)?;
        inner.next = raw.checked_add(1).unwrap_or(0);
        inner.objects.insert(raw, object);
        Ok(handle)
    }

    /// Removes the object behind `raw` and returns it to the caller.
    pub fn remove(&self, raw: RawHandle) -> HandleResult<T> {
        let key = Self::key(raw)?;
        self.inner
            .lock()
            .objects
            .remove(&key)
            .ok_or_else(|| HandleError::invalid(raw))
    }

    /// Runs `f` with shared access to the object behind `raw`.
    pub fn with<R>(&self, raw: RawHandle, f: impl FnOnce(&T) -> R) -> HandleResult<R> {
        let key = Self::key(raw)?;
        let inner = self.inner.lock();
        inner
            .objects
            .get(&key)
            .map(f)
            .ok_or_else(|| HandleError::invalid(raw))
    }

    /// Runs `f` with exclusive access to the object behind `raw`.
    pub fn with_mut<R>(&self, raw: RawHandle, f: impl FnOnce(&mut T) -> R) -> HandleResult<R> {
        let key = Self::key(raw)?;
        let mut inner = self.inner.lock();
        inner
            .objects
            .get_mut(&key)
            .map(f)
            .ok_or_else(|| HandleError::invalid(raw))
    }

    /// Returns true if `raw` refers to a live object.
    pub fn contains(&self, raw: RawHandle) -> bool {
        raw != 0 && self.inner.lock().objects.contains_key(&raw)
    }

    /// Returns the number of live objects.
    pub fn len(&self) -> usize {
        self.inner.lock().objects.len()
    }

    /// Returns true if no objects are live.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().objects.is_empty()
    }

    fn key(raw: RawHandle) -> HandleResult<RawHandle> {
        Handle::from_raw(raw)
            .map(|h| h.as_raw())
            .ok_or(HandleError::NullHandle)
    }
}

impl<T> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HandleRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("HandleRegistry")
            .field("next", &inner.next)
            .field("live", &inner.objects.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_handles_are_unique_and_non_null() {
        let registry = HandleRegistry::new();
        let a = registry.insert("a").unwrap();
        let b = registry.insert("b").unwrap();

        assert_ne!(a, b);
        assert_ne!(a.as_raw(), 0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_handles_are_not_reused() {
        let registry = HandleRegistry::new();
        let a = registry.insert(1).unwrap();
        registry.remove(a.as_raw()).unwrap();

        let b = registry.insert(2).unwrap();
        assert_ne!(a, b);
        assert!(!registry.contains(a.as_raw()));
        assert!(registry.contains(b.as_raw()));
    }

    #[test]
    fn test_double_remove_is_rejected() {
        let registry = HandleRegistry::new();
        let h = registry.insert(()).unwrap();

        assert!(registry.remove(h.as_raw()).is_ok());
        assert_eq!(
            registry.remove(h.as_raw()),
            Err(HandleError::InvalidHandle { handle: h.as_raw() })
        );
    }

    #[test]
    fn test_null_and_foreign_handles() {
        let registry: HandleRegistry<i32> = HandleRegistry::new();

        assert_eq!(registry.with(0, |v| *v), Err(HandleError::NullHandle));
        assert_eq!(
            registry.with_mut(0xdead_beef, |v| *v += 1),
            Err(HandleError::invalid(0xdead_beef))
        );
        assert!(!registry.contains(0));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_with_mut_updates_in_place() {
        let registry = HandleRegistry::new();
        let h = registry.insert(10).unwrap();

        registry.with_mut(h.as_raw(), |v| *v += 5).unwrap();
        assert_eq!(registry.with(h.as_raw(), |v| *v), Ok(15));
        assert_eq!(registry.remove(h.as_raw()), Ok(15));
    }

    #[test]
    fn test_exhaustion() {
        let registry = HandleRegistry::starting_at(usize::MAX);
        let last = registry.insert(()).unwrap();
        assert_eq!(last.as_raw(), usize::MAX);

        assert_eq!(registry.insert(()), Err(HandleError::Exhausted));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_starting_at_zero_skips_null() {
        let registry = HandleRegistry::starting_at(0);
        assert_eq!(registry.insert(()).unwrap().as_raw(), 1);
    }

    #[test]
    fn test_handle_display() {
        let h = Handle::from_raw(0x10).unwrap();
        assert_eq!(h.to_string(), "0x10");
        assert_eq!(format!("{:?}", h), "Handle(0x10)");
        assert!(Handle::from_raw(0).is_none());
    }
}
