//! Construction parameters.

/// Configuration used to create a [`DynArr`](crate::DynArr).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayConfig {
	/// Number of slots allocated up front.
	///
	/// Values below 1 are raised to 1: an array always owns at least one slot.
	/// Every later capacity is this value multiplied by a power of two.
	pub initial_capacity: usize
}

impl ArrayConfig {
	/// Default initial capacity.
	pub const DEFAULT_INITIAL_CAPACITY: usize = 1;

	#[inline]
	pub const fn new(initial_capacity: usize) -> Self {
		ArrayConfig {
			initial_capacity
		}
	}

	/// Capacity actually allocated at construction.
	#[inline]
	pub fn capacity(&self) -> usize {
		std::cmp::max(self.initial_capacity, 1)
	}
}

impl Default for ArrayConfig {
	#[inline]
	fn default() -> Self {
		Self::new(Self::DEFAULT_INITIAL_CAPACITY)
	}
}
