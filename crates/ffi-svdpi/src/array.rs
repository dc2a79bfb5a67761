//! Bounds-described views over foreign byte arrays.

/// A one-dimensional open array owned by someone else.
///
/// Mirrors the svdpi.h accessors for dimension 1: `svLeft`, `svRight`,
/// `svSize` and `svGetArrElemPtr1`.
pub trait OpenArray {
    /// Index of the first element (`svLeft`).
    fn left(&self) -> i32;

    /// Index of the last element (`svRight`).
    fn right(&self) -> i32;

    /// Total number of elements (`svSize`). Used as a capacity hint only.
    fn size(&self) -> usize;

    /// Reads the element at `index`.
    ///
    /// Returns `None` if the owner has no element there.
    fn element(&self, index: i32) -> Option<u8>;
}

impl<A: OpenArray + ?Sized> OpenArray for &A {
    fn left(&self) -> i32 {
        (**self).left()
    }

    fn right(&self) -> i32 {
        (**self).right()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn element(&self, index: i32) -> Option<u8> {
        (**self).element(index)
    }
}

/// An open array backed by a byte slice, indexed from an arbitrary bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceArray<'a> {
    low: i32,
    data: &'a [u8],
}

impl<'a> SliceArray<'a> {
    /// Creates an array indexed from zero.
    ///
    /// # Panics
    ///
    /// Panics if `data` has more than `i32::MAX` elements.
    pub fn new(data: &'a [u8]) -> Self {
        match Self::with_bounds(0, data) {
            Some(array) => array,
            None => panic!("open array of {} elements exceeds i32 indexing", data.len()),
        }
    }

    /// Creates an array whose first element has index `low`.
    ///
    /// Returns `None` if the index range does not fit in `i32`. An empty
    /// slice yields `left() == low` and `right() == low - 1`.
    pub fn with_bounds(low: i32, data: &'a [u8]) -> Option<Self> {
        let high = i64::from(low) + data.len() as i64 - 1;
        if high > i64::from(i32::MAX) || high < i64::from(i32::MIN) {
            return None;
        }
        Some(Self { low, data })
    }

    /// Returns the underlying bytes in index order.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }
}

impl OpenArray for SliceArray<'_> {
    fn left(&self) -> i32 {
        self.low
    }

    fn right(&self) -> i32 {
        // Range checked in with_bounds.
        (i64::from(self.low) + self.data.len() as i64 - 1) as i32
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn element(&self, index: i32) -> Option<u8> {
        let offset = i64::from(index) - i64::from(self.low);
        usize::try_from(offset)
            .ok()
            .and_then(|offset| self.data.get(offset))
            .copied()
    }
}
