//! Counter newtypes owned by the simulation driver.
//!
//! The checkpoint index and the iteration counter are both plain `usize`
//! values underneath; wrapping them keeps `save(q, index, t, dt)` and
//! `advance(q, u, dt, iteration)` call sites from swapping the two.

use std::fmt;

/// Macro to generate counter newtypes with common functionality.
macro_rules! define_counter {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new counter value.
            #[inline]
            pub const fn new(value: usize) -> Self {
                Self(value)
            }

            /// Get the raw value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// First value (0).
            pub const ZERO: Self = Self(0);

            /// Post-increment: return the current value and advance `self`.
            #[inline]
            pub fn bump(&mut self) -> Self {
                let current = *self;
                self.0 += 1;
                current
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }
    };
}

define_counter!(
    /// Sequence number of a written checkpoint.
    ///
    /// # Example
    ///
    /// ```
    /// use fv_rs::types::CheckpointIndex;
    ///
    /// let mut idx = CheckpointIndex::ZERO;
    /// assert_eq!(idx.bump().get(), 0);
    /// assert_eq!(idx.get(), 1);
    /// ```
    CheckpointIndex,
    "ckpt"
);

define_counter!(
    /// Number of completed solver cycles.
    Iteration,
    "it"
);
