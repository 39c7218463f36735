//! Previous-tick snapshots for edge detection.
//!
//! Input wishes are levels, not events. The solver derives presses,
//! releases and changes by diffing each tick's value against the last one.

use bevy::prelude::*;

/// Remembers the last value it was fed.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeDetector<T> {
    previous: T,
}

/// The result of feeding one value to an [`EdgeDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<T> {
    pub value: T,
    pub previous: T,
}

impl<T: Copy + PartialEq> EdgeDetector<T> {
    pub fn new(initial: T) -> Self {
        Self { previous: initial }
    }

    /// The value fed on the previous update.
    pub fn previous(&self) -> T {
        self.previous
    }

    /// Record `value` and report how it relates to the previous one.
    pub fn update(&mut self, value: T) -> Edge<T> {
        let previous = std::mem::replace(&mut self.previous, value);
        Edge { value, previous }
    }
}

impl<T: Copy + PartialEq> Edge<T> {
    pub fn changed(&self) -> bool {
        self.value != self.previous
    }
}

impl Edge<bool> {
    /// `false -> true`.
    pub fn rising(&self) -> bool {
        self.value && !self.previous
    }

    /// `true -> false`.
    pub fn falling(&self) -> bool {
        !self.value && self.previous
    }
}
