use core::{
	alloc::{
		Layout,
		LayoutError
	},
	marker::PhantomData,
	mem,
	ptr::NonNull
};
use std::alloc::{
	self,
	handle_alloc_error
};
use crate::error::Error;

/// Uninitialized storage backing a [`DynArr`](crate::DynArr).
///
/// `RawBuf` only tracks slots, never their contents: dropping it releases the
/// allocation without dropping any element. The owner decides which slots are live.
///
/// The capacity is never smaller than 1 and only ever grows by doubling.
pub struct RawBuf<T> {
	/// Pointer to the allocated slots (dangling for zero-sized types).
	ptr: NonNull<T>,

	/// Number of allocated slots.
	capacity: usize,

	marker: PhantomData<T>
}

unsafe impl<T: Send> Send for RawBuf<T> {}
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T> Drop for RawBuf<T> {
	fn drop(&mut self) {
		if let Some((ptr, layout)) = self.current_memory() {
			unsafe {
				alloc::dealloc(ptr.as_ptr(), layout)
			}
		}
	}
}

impl<T> RawBuf<T> {
	/// Allocates a buffer with room for `capacity` elements.
	///
	/// A `capacity` of 0 is raised to 1.
	///
	/// # Aborts
	///
	/// Aborts the process if the allocator fails.
	#[inline]
	pub fn with_capacity(capacity: usize) -> Self {
		handle_reserve(Self::try_with_capacity(capacity))
	}

	/// The same as `with_capacity`, but returns on errors instead of panicking or aborting.
	pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
		let capacity = std::cmp::max(capacity, 1);

		let ptr = if mem::size_of::<T>() == 0 {
			NonNull::dangling()
		} else {
			finish_grow(Layout::array::<T>(capacity), None)?.cast()
		};

		Ok(RawBuf {
			ptr,
			capacity,
			marker: PhantomData
		})
	}

	/// Returns the number of slots of the buffer.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Returns a raw pointer to the first slot.
	///
	/// Any call that may reallocate the buffer invalidates this pointer.
	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.ptr.as_ptr()
	}

	/// Returns an unsafe mutable pointer to the first slot.
	#[inline]
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.ptr.as_ptr()
	}

	/// Allocation owned by the buffer, if any (none for zero-sized types).
	fn current_memory(&self) -> Option<(NonNull<u8>, Layout)> {
		if mem::size_of::<T>() == 0 {
			None
		} else {
			// this layout was validated when the buffer was allocated.
			unsafe {
				let align = mem::align_of::<T>();
				let size = mem::size_of::<T>() * self.capacity;
				let layout = Layout::from_size_align_unchecked(size, align);
				Some((self.ptr.cast(), layout))
			}
		}
	}

	/// Checks whether `additional` elements past `len` exceed the capacity.
	#[inline]
	pub fn needs_to_grow(&self, len: usize, additional: usize) -> bool {
		additional > self.capacity.wrapping_sub(len)
	}

	/// Ensures that the buffer can hold at least `len + additional` elements.
	///
	/// The capacity is doubled as many times as needed. The first `len` slots
	/// are preserved if the buffer is moved.
	/// Returns `false` without touching the buffer when it is large enough,
	/// and `true` once it has grown.
	pub fn try_reserve(&mut self, len: usize, additional: usize) -> Result<bool, Error> {
		if !self.needs_to_grow(len, additional) {
			return Ok(false)
		}

		let required = len.checked_add(additional).ok_or(Error::CapacityOverflow)?;
		let mut capacity = self.capacity;
		while capacity < required {
			capacity = capacity.checked_mul(2).ok_or(Error::CapacityOverflow)?;
		}

		if mem::size_of::<T>() != 0 {
			let ptr = finish_grow(Layout::array::<T>(capacity), self.current_memory())?;
			self.ptr = ptr.cast();
		}

		tracing::trace!(from = self.capacity, to = capacity, "buffer grown");
		self.capacity = capacity;
		Ok(true)
	}
}

// Not generic over `T`, so a single copy is instantiated.
#[inline(never)]
fn finish_grow(new_layout: Result<Layout, LayoutError>, current_memory: Option<(NonNull<u8>, Layout)>) -> Result<NonNull<u8>, Error> {
	let new_layout = new_layout.map_err(|_| Error::CapacityOverflow)?;

	alloc_guard(new_layout.size())?;

	let memory = if let Some((ptr, old_layout)) = current_memory {
		debug_assert_eq!(old_layout.align(), new_layout.align());
		unsafe {
			alloc::realloc(ptr.as_ptr(), old_layout, new_layout.size())
		}
	} else {
		unsafe {
			alloc::alloc(new_layout)
		}
	};

	NonNull::new(memory).ok_or_else(|| {
		tracing::error!(size = new_layout.size(), "allocation failed");
		Error::AllocFailed { layout: new_layout }
	})
}

// Turns growth errors into a panic or an abort for the infallible entry points.
#[inline]
pub(crate) fn handle_reserve<T>(result: Result<T, Error>) -> T {
	match result {
		Err(Error::CapacityOverflow) => capacity_overflow(),
		Err(Error::AllocFailed { layout }) => handle_alloc_error(layout),
		Err(e) => panic!("{}", e),
		Ok(t) => t
	}
}

// Allocations may not exceed `isize::MAX` bytes. On 64-bit targets the
// allocator rejects such sizes itself, smaller targets must check.
#[inline]
fn alloc_guard(alloc_size: usize) -> Result<(), Error> {
	if usize::BITS < 64 && alloc_size > isize::MAX as usize {
		Err(Error::CapacityOverflow)
	} else {
		Ok(())
	}
}

#[cold]
fn capacity_overflow() -> ! {
	panic!("capacity overflow");
}
