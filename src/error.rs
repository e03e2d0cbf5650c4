//! Errors reported by [`DynArr`](crate::DynArr) operations.
use std::alloc::Layout;
use thiserror::Error;

/// Errors that can occur when operating on a [`DynArr`](crate::DynArr).
///
/// The first five variants are contract violations: the caller passed an
/// index, a range or an element that does not fit the current state of the array.
/// The last two are resource exhaustion while growing the buffer.
///
/// A failed operation never modifies the array.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
	/// Index outside of the live range `[0, len)`.
	#[error("index (is {index}) should be < len (is {len})")]
	IndexOutOfBounds {
		index: usize,
		len: usize
	},

	/// Insertion index outside of `[0, len]`.
	#[error("insertion index (is {index}) should be <= len (is {len})")]
	InsertOutOfBounds {
		index: usize,
		len: usize
	},

	/// Range `[index, index + count)` not contained in the live range.
	#[error("cannot access {count} elements starting from index {index} in array of length {len}")]
	RangeOutOfBounds {
		index: usize,
		count: usize,
		len: usize
	},

	/// Attempt to remove more elements than the array holds.
	#[error("cannot remove {count} elements from array of length {len}")]
	Underflow {
		count: usize,
		len: usize
	},

	/// The given element reference does not point into the array's live range.
	#[error("element is outside of the array")]
	ForeignElement,

	/// The requested capacity does not fit in `usize` (or `isize::MAX` bytes).
	#[error("capacity overflow")]
	CapacityOverflow,

	/// The allocator refused to provide the requested memory.
	#[error("memory allocation of {} bytes failed", .layout.size())]
	AllocFailed {
		layout: Layout
	}
}

impl Error {
	/// Returns `true` for errors caused by invalid arguments,
	/// `false` for allocation failures.
	pub fn is_contract_violation(&self) -> bool {
		!matches!(self, Error::CapacityOverflow | Error::AllocFailed { .. })
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages() {
		assert_eq!(Error::IndexOutOfBounds { index: 3, len: 2 }.to_string(), "index (is 3) should be < len (is 2)");
		assert_eq!(Error::Underflow { count: 4, len: 1 }.to_string(), "cannot remove 4 elements from array of length 1");

		let layout = Layout::array::<u64>(8).unwrap();
		assert_eq!(Error::AllocFailed { layout }.to_string(), "memory allocation of 64 bytes failed");
	}

	#[test]
	fn classification() {
		assert!(Error::ForeignElement.is_contract_violation());
		assert!(Error::RangeOutOfBounds { index: 0, count: 1, len: 0 }.is_contract_violation());
		assert!(!Error::CapacityOverflow.is_contract_violation());
	}
}
