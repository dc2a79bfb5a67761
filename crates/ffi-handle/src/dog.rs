//! The object managed behind the handle boundary.

/// A dog that keeps track of how far it has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dog {
    distance: i32,
}

impl Dog {
    /// Creates a dog that has not run yet.
    pub fn new() -> Self {
        Self { distance: 0 }
    }

    /// Adds `distance` to the total. Negative values are accepted and the
    /// total wraps on overflow.
    pub fn run(&mut self, distance: i32) {
        self.distance = self.distance.wrapping_add(distance);
    }

    /// Returns the total distance run.
    pub fn distance(&self) -> i32 {
        self.distance
    }
}
