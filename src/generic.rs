use core::{
	mem,
	ptr,
	slice,
	ops::{
		Deref,
		DerefMut
	},
	fmt
};
use std::io;
use crate::{
	config::ArrayConfig,
	error::{
		Error,
		Result
	},
	policy::{
		Lifecycle,
		Plain
	},
	raw::{
		RawBuf,
		handle_reserve
	}
};

/// Contiguous growable array with a pluggable element lifecycle policy.
///
/// The elements are stored in a single buffer whose capacity starts at
/// [`ArrayConfig::initial_capacity`] (at least 1) and is doubled each time it is exceeded.
/// The capacity never shrinks.
///
/// The policy `P` (see [`Lifecycle`]) defines how elements coming from a borrowed source
/// are copied into the array, how elements leaving the array are freed
/// and how the array is printed.
/// Every element removed from the array, or still in it when it is dropped,
/// is passed to the policy's `free` exactly once.
///
/// Operations taking an index or a range check it first,
/// and return an [`Error`] without modifying the array if it is invalid.
///
/// # Example
///
/// ```
/// # use dynarr::IntArr;
/// let mut arr = IntArr::new();
/// arr.push(5).unwrap();
/// *arr.push_reserved().unwrap() = 6;
/// arr.insert_slice(0, &[-1, 1, 2, 3, 4]).unwrap();
/// arr.insert(1, 0).unwrap();
/// assert_eq!(arr, [-1, 0, 1, 2, 3, 4, 5, 6]);
///
/// arr.remove(0).unwrap();
/// arr.remove_range(4, 2).unwrap();
/// assert_eq!(arr, [0, 1, 2, 3, 6]);
///
/// arr.pop().unwrap();
/// arr.pop_n(2).unwrap();
/// assert_eq!(arr, [0, 1]);
/// assert_eq!(arr.capacity(), 8);
/// ```
pub struct DynArr<T, P: Lifecycle<T> = Plain> {
	/// Buffer, of which only the first `len` slots are initialized.
	buf: RawBuf<T>,

	/// Number of live elements.
	len: usize,

	/// Element lifecycle policy.
	policy: P
}

impl<T, P: Lifecycle<T>> Drop for DynArr<T, P> {
	fn drop(&mut self) {
		// the buffer itself is released by `RawBuf`.
		self.clear()
	}
}

impl<T, P: Lifecycle<T> + Default> DynArr<T, P> {
	/// Creates a new empty array with a capacity of 1.
	///
	/// # Aborts
	///
	/// Aborts the process if the buffer cannot be allocated.
	#[inline]
	pub fn new() -> Self {
		Self::with_config(ArrayConfig::default(), P::default())
	}

	/// Creates a new empty array with the given initial capacity (at least 1).
	#[inline]
	pub fn with_capacity(capacity: usize) -> Self {
		Self::with_config(ArrayConfig::new(capacity), P::default())
	}
}

impl<T, P: Lifecycle<T>> DynArr<T, P> {
	/// Creates a new empty array with a capacity of 1 using the given policy.
	#[inline]
	pub fn with_policy(policy: P) -> Self {
		Self::with_config(ArrayConfig::default(), policy)
	}

	/// Creates a new empty array from the given configuration and policy.
	///
	/// # Aborts
	///
	/// Aborts the process if the buffer cannot be allocated.
	#[inline]
	pub fn with_config(config: ArrayConfig, policy: P) -> Self {
		handle_reserve(Self::try_with_config(config, policy))
	}

	/// The same as `with_config`, but returns on errors instead of panicking or aborting.
	pub fn try_with_config(config: ArrayConfig, policy: P) -> Result<Self> {
		Ok(DynArr {
			buf: RawBuf::try_with_capacity(config.capacity())?,
			len: 0,
			policy
		})
	}

	/// Returns the number of elements in the array.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Returns the number of elements the array can hold without reallocating.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.buf.capacity()
	}

	/// Returns a reference to the array's lifecycle policy.
	#[inline]
	pub fn policy(&self) -> &P {
		&self.policy
	}

	/// Returns a raw pointer to the array's buffer.
	///
	/// The caller must ensure that the array outlives the pointer this
	/// function returns, or else it will end up pointing to garbage.
	/// Modifying the array may cause its buffer to be reallocated,
	/// which would also make any pointers to it invalid.
	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.buf.as_ptr()
	}

	/// Extracts a slice containing the entire array.
	#[inline]
	pub fn as_slice(&self) -> &[T] {
		unsafe {
			slice::from_raw_parts(self.buf.as_ptr(), self.len)
		}
	}

	/// Extracts a mutable slice of the entire array.
	///
	/// Elements overwritten through this slice are dropped in place and are not
	/// passed to the policy's `free`. Use [`assign`](DynArr::assign) for that.
	#[inline]
	pub fn as_mut_slice(&mut self) -> &mut [T] {
		unsafe {
			slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len)
		}
	}

	/// Returns a reference to the element at `index`, or `None` if out of bounds.
	#[inline]
	pub fn get(&self, index: usize) -> Option<&T> {
		self.as_slice().get(index)
	}

	#[inline]
	pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
		self.as_mut_slice().get_mut(index)
	}

	/// Returns a reference to the element at `index`.
	///
	/// # Errors
	///
	/// Returns [`Error::IndexOutOfBounds`] if `index >= len`.
	#[inline]
	pub fn at(&self, index: usize) -> Result<&T> {
		self.check_index(index)?;
		Ok(&self.as_slice()[index])
	}

	#[inline]
	pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
		self.check_index(index)?;
		Ok(&mut self.as_mut_slice()[index])
	}

	/// Checks that `index` designates a live element (`index < len`).
	#[inline]
	pub fn check_index(&self, index: usize) -> Result<()> {
		if index < self.len {
			Ok(())
		} else {
			Err(rejected(Error::IndexOutOfBounds { index, len: self.len }))
		}
	}

	/// Checks that the `count` elements starting at `index` are all live
	/// (`index + count <= len`).
	#[inline]
	pub fn check_range(&self, index: usize, count: usize) -> Result<()> {
		match index.checked_add(count) {
			Some(end) if end <= self.len => Ok(()),
			_ => Err(rejected(Error::RangeOutOfBounds { index, count, len: self.len }))
		}
	}

	/// Checks that `index` is a valid insertion position (`index <= len`).
	///
	/// Inserting at `len` is the same as appending.
	#[inline]
	fn check_insert(&self, index: usize) -> Result<()> {
		if index <= self.len {
			Ok(())
		} else {
			Err(rejected(Error::InsertOutOfBounds { index, len: self.len }))
		}
	}

	/// Makes room for `additional` elements past the live range.
	///
	/// The capacity is doubled until it fits. The length is left untouched:
	/// it is advanced by the caller once the new slots are initialized.
	#[inline]
	fn grow(&mut self, additional: usize) -> Result<()> {
		self.buf.try_reserve(self.len, additional)?;
		debug_assert!(self.len + additional <= self.buf.capacity());
		Ok(())
	}

	/// Reserves capacity for at least `additional` more elements.
	///
	/// After calling `try_reserve`, capacity will be greater than or equal to
	/// `self.len() + additional`. Does nothing if capacity is already sufficient.
	#[inline]
	pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
		self.grow(additional)
	}

	/// Opens a gap of `count` uninitialized slots at `index`,
	/// shifting the elements from `index` onward to the right.
	///
	/// Returns the previous length.
	/// The length is set to `index`, so the gap and the shifted elements are leaked
	/// rather than dropped should filling the gap panic.
	///
	/// ## Safety
	///
	/// `index` must be `<= len`. The caller must fill the gap and then set the length
	/// to the returned length plus `count`.
	unsafe fn open_gap(&mut self, index: usize, count: usize) -> Result<usize> {
		debug_assert!(index <= self.len);
		let len = self.len;
		self.grow(count)?;

		let p = self.buf.as_mut_ptr().add(index);
		// overlapping, toward higher addresses.
		ptr::copy(p, p.add(count), len - index);
		self.len = index;

		Ok(len)
	}

	/// Frees the `count` elements starting at `index` and shifts the following elements
	/// to the left.
	///
	/// ## Safety
	///
	/// `index + count` must be `<= len`.
	unsafe fn discard(&mut self, index: usize, count: usize) {
		let len = self.len;
		debug_assert!(index + count <= len);

		let base = self.buf.as_mut_ptr();
		// freed slots must not be visible if `free` panics.
		self.len = index;
		for i in index..(index + count) {
			self.policy.free(ptr::read(base.add(i)));
		}

		// overlapping, toward lower addresses.
		ptr::copy(base.add(index + count), base.add(index), len - index - count);
		self.len = len - count;
	}

	/// Appends `count` elements produced by `f` (given the policy and the element rank).
	fn append_with<F>(&mut self, count: usize, mut f: F) -> Result<&mut [T]> where F: FnMut(&P, usize) -> T {
		let len = self.len;
		self.grow(count)?;

		unsafe {
			let base = self.buf.as_mut_ptr();
			let mut local_len = SetLenOnDrop::new(&mut self.len);
			for i in 0..count {
				ptr::write(base.add(local_len.current()), f(&self.policy, i));
				// Increment the length in every step in case `f` panics
				local_len.increment_len(1);
			}
		}

		Ok(&mut self.as_mut_slice()[len..])
	}

	/// Inserts `count` elements produced by `f` at `index`.
	fn insert_with<F>(&mut self, index: usize, count: usize, mut f: F) -> Result<&mut [T]> where F: FnMut(&P, usize) -> T {
		self.check_insert(index)?;

		unsafe {
			let len = self.open_gap(index, count)?;
			let p = self.buf.as_mut_ptr().add(index);
			for i in 0..count {
				ptr::write(p.add(i), f(&self.policy, i));
			}
			self.len = len + count;
		}

		Ok(&mut self.as_mut_slice()[index..(index + count)])
	}

	/// Appends an element to the back of the array.
	///
	/// The element is moved into the array, which takes ownership of it.
	/// Returns a reference to the stored element.
	///
	/// # Errors
	///
	/// Returns [`Error::CapacityOverflow`] or [`Error::AllocFailed`] if the buffer
	/// cannot grow. The element is then dropped.
	#[inline]
	pub fn push(&mut self, value: T) -> Result<&mut T> {
		let len = self.len;
		self.grow(1)?;

		unsafe {
			let end = self.buf.as_mut_ptr().add(len);
			ptr::write(end, value);
			self.len = len + 1;
			Ok(&mut *end)
		}
	}

	/// Appends a default element, to be filled in place through the returned reference.
	///
	/// ```
	/// # use dynarr::DynArr;
	/// let mut arr: DynArr<u32> = DynArr::new();
	/// *arr.push_reserved().unwrap() = 6;
	/// assert_eq!(arr, [6]);
	/// ```
	#[inline]
	pub fn push_reserved(&mut self) -> Result<&mut T> where T: Default {
		self.push(T::default())
	}

	/// Appends a copy of each element of `values`, made by the policy.
	///
	/// Returns the newly appended elements.
	#[inline]
	pub fn push_slice(&mut self, values: &[T]) -> Result<&mut [T]> {
		self.append_with(values.len(), |policy, i| policy.copy(&values[i]))
	}

	/// Appends `count` default elements, to be filled in place.
	#[inline]
	pub fn push_reserved_n(&mut self, count: usize) -> Result<&mut [T]> where T: Default {
		self.append_with(count, |_, _| T::default())
	}

	/// Inserts an element at position `index`, shifting all
	/// elements after it to the right.
	///
	/// Inserting at `len` is allowed and appends the element.
	///
	/// # Errors
	///
	/// Returns [`Error::InsertOutOfBounds`] if `index > len`.
	pub fn insert(&mut self, index: usize, value: T) -> Result<&mut T> {
		self.check_insert(index)?;

		unsafe {
			let len = self.open_gap(index, 1)?;
			// The spot to put the new value
			let p = self.buf.as_mut_ptr().add(index);
			ptr::write(p, value);
			self.len = len + 1;
			Ok(&mut *p)
		}
	}

	/// Inserts a default element at `index`, to be filled in place.
	#[inline]
	pub fn insert_reserved(&mut self, index: usize) -> Result<&mut T> where T: Default {
		self.insert(index, T::default())
	}

	/// Inserts a copy of each element of `values` at position `index`,
	/// shifting all elements after it to the right.
	///
	/// # Errors
	///
	/// Returns [`Error::InsertOutOfBounds`] if `index > len`.
	#[inline]
	pub fn insert_slice(&mut self, index: usize, values: &[T]) -> Result<&mut [T]> {
		self.insert_with(index, values.len(), |policy, i| policy.copy(&values[i]))
	}

	/// Inserts `count` default elements at position `index`, to be filled in place.
	#[inline]
	pub fn insert_reserved_n(&mut self, index: usize, count: usize) -> Result<&mut [T]> where T: Default {
		self.insert_with(index, count, |_, _| T::default())
	}

	/// Replaces the element at `index` with `value`.
	///
	/// The replaced element is freed by the policy.
	///
	/// # Errors
	///
	/// Returns [`Error::IndexOutOfBounds`] if `index >= len`.
	pub fn assign(&mut self, index: usize, value: T) -> Result<&mut T> {
		self.check_index(index)?;

		unsafe {
			let p = self.buf.as_mut_ptr().add(index);
			let old = ptr::replace(p, value);
			self.policy.free(old);
			Ok(&mut *p)
		}
	}

	/// Replaces the elements starting at `index` with copies of `values`.
	///
	/// Each replaced element is freed by the policy.
	///
	/// # Errors
	///
	/// Returns [`Error::RangeOutOfBounds`] if `index + values.len() > len`.
	pub fn assign_slice(&mut self, index: usize, values: &[T]) -> Result<&mut [T]> {
		self.check_range(index, values.len())?;

		let p = unsafe { self.buf.as_mut_ptr().add(index) };
		for (i, v) in values.iter().enumerate() {
			unsafe {
				let old = ptr::replace(p.add(i), self.policy.copy(v));
				self.policy.free(old);
			}
		}

		Ok(&mut self.as_mut_slice()[index..(index + values.len())])
	}

	/// Removes the element at position `index`, shifting all
	/// elements after it to the left.
	///
	/// The element is freed by the policy.
	///
	/// # Errors
	///
	/// Returns [`Error::IndexOutOfBounds`] if `index >= len`.
	pub fn remove(&mut self, index: usize) -> Result<()> {
		self.check_index(index)?;
		unsafe {
			self.discard(index, 1)
		}
		Ok(())
	}

	/// Removes the `count` elements starting at `index`, shifting all
	/// elements after them to the left.
	///
	/// # Errors
	///
	/// Returns [`Error::RangeOutOfBounds`] if `index + count > len`.
	pub fn remove_range(&mut self, index: usize, count: usize) -> Result<()> {
		self.check_range(index, count)?;
		unsafe {
			self.discard(index, count)
		}
		Ok(())
	}

	/// Removes the last element.
	///
	/// # Errors
	///
	/// Returns [`Error::Underflow`] if the array is empty.
	#[inline]
	pub fn pop(&mut self) -> Result<()> {
		self.pop_n(1)
	}

	/// Removes the last `count` elements.
	///
	/// The capacity is left untouched.
	///
	/// # Errors
	///
	/// Returns [`Error::Underflow`] if `count > len`.
	pub fn pop_n(&mut self, count: usize) -> Result<()> {
		let len = self.len;
		if count > len {
			return Err(rejected(Error::Underflow { count, len }))
		}

		unsafe {
			self.discard(len - count, count)
		}
		Ok(())
	}

	/// Clears the array, freeing all values.
	///
	/// Note that this method has no effect on the allocated capacity
	/// of the array.
	#[inline]
	pub fn clear(&mut self) {
		unsafe {
			self.discard(0, self.len)
		}
	}

	/// Returns the index of `element`, which must be a reference into this array.
	///
	/// ```
	/// # use dynarr::DynArr;
	/// let mut arr: DynArr<char> = "abcd".chars().collect();
	/// let i = arr.index_of(&arr[2]).unwrap();
	/// arr.remove(i).unwrap();
	/// assert_eq!(arr, ['a', 'b', 'd']);
	/// ```
	///
	/// # Errors
	///
	/// Returns [`Error::ForeignElement`] if `element` does not point to a live element
	/// of this array. This is always the case for zero-sized types.
	pub fn index_of(&self, element: &T) -> Result<usize> {
		let size = mem::size_of::<T>();
		let start = self.buf.as_ptr() as usize;
		let addr = element as *const T as usize;

		if size == 0 || addr < start || (addr - start) / size >= self.len || (addr - start) % size != 0 {
			Err(rejected(Error::ForeignElement))
		} else {
			Ok((addr - start) / size)
		}
	}

	/// Calls `f` on each element, in index order.
	#[inline]
	pub fn iterate<F>(&self, f: F) where F: FnMut(&T) {
		self.as_slice().iter().for_each(f)
	}

	/// Calls `f` on each of the `count` elements starting at `index`, in index order.
	///
	/// # Errors
	///
	/// Returns [`Error::RangeOutOfBounds`] if `index + count > len`.
	#[inline]
	pub fn iterate_range<F>(&self, index: usize, count: usize, f: F) -> Result<()> where F: FnMut(&T) {
		self.check_range(index, count)?;
		self.as_slice()[index..(index + count)].iter().for_each(f);
		Ok(())
	}

	/// Prints the array on the standard output using the policy.
	///
	/// Does nothing if the policy does not print.
	pub fn print(&self) -> io::Result<()> {
		let stdout = io::stdout();
		let mut out = stdout.lock();
		self.print_to(&mut out)
	}

	/// Prints the array into `out` using the policy.
	#[inline]
	pub fn print_to(&self, out: &mut dyn io::Write) -> io::Result<()> {
		self.policy.print(self.as_slice(), out)
	}

	/// Creates an independent copy of the array.
	///
	/// The copy has the same capacity and a clone of the policy,
	/// and each element is copied by the policy.
	pub fn deep_copy(&self) -> Result<Self> where P: Clone {
		let mut copy = Self::try_with_config(ArrayConfig::new(self.capacity()), self.policy.clone())?;
		copy.push_slice(self.as_slice())?;
		Ok(copy)
	}

	/// Moves the elements out of the array into a `Vec`.
	///
	/// The elements are handed over to the caller and are not freed by the policy.
	pub fn into_vec(mut self) -> Vec<T> {
		let len = self.len;
		let mut vec = Vec::with_capacity(len);
		unsafe {
			ptr::copy_nonoverlapping(self.buf.as_ptr(), vec.as_mut_ptr(), len);
			vec.set_len(len);
			// the elements now belong to `vec`.
			self.len = 0;
		}
		vec
	}
}

#[cold]
fn rejected(error: Error) -> Error {
	tracing::debug!(%error, "operation rejected");
	error
}

// Set the length of the array when the `SetLenOnDrop` value goes out of scope.
//
// The length field in SetLenOnDrop is a local variable
// that the optimizer will see does not alias with any stores through the array's data
// pointer, and it keeps the initialized prefix accurate if an element constructor panics.
struct SetLenOnDrop<'a> {
	len: &'a mut usize,
	local_len: usize
}

impl<'a> SetLenOnDrop<'a> {
	#[inline]
	fn new(len: &'a mut usize) -> Self {
		SetLenOnDrop { local_len: *len, len }
	}

	#[inline]
	fn current(&self) -> usize {
		self.local_len
	}

	#[inline]
	fn increment_len(&mut self, increment: usize) {
		self.local_len += increment;
	}
}

impl Drop for SetLenOnDrop<'_> {
	#[inline]
	fn drop(&mut self) {
		*self.len = self.local_len;
	}
}

impl<T, P: Lifecycle<T> + Default> Default for DynArr<T, P> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<T, P: Lifecycle<T> + Clone> Clone for DynArr<T, P> {
	fn clone(&self) -> Self {
		handle_reserve(self.deep_copy())
	}
}

impl<T, P: Lifecycle<T>> Deref for DynArr<T, P> {
	type Target = [T];

	#[inline]
	fn deref(&self) -> &[T] {
		self.as_slice()
	}
}

impl<T, P: Lifecycle<T>> DerefMut for DynArr<T, P> {
	#[inline]
	fn deref_mut(&mut self) -> &mut [T] {
		self.as_mut_slice()
	}
}

impl<'v, T, P: Lifecycle<T>> IntoIterator for &'v DynArr<T, P> {
	type Item = &'v T;
	type IntoIter = slice::Iter<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.as_slice().iter()
	}
}

impl<'v, T, P: Lifecycle<T>> IntoIterator for &'v mut DynArr<T, P> {
	type Item = &'v mut T;
	type IntoIter = slice::IterMut<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.as_mut_slice().iter_mut()
	}
}

impl<T, P: Lifecycle<T>> IntoIterator for DynArr<T, P> {
	type Item = T;
	type IntoIter = std::vec::IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		self.into_vec().into_iter()
	}
}

impl<T, P: Lifecycle<T>> Extend<T> for DynArr<T, P> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iterable: I) {
		let iterator = iterable.into_iter();
		let (lower, _) = iterator.size_hint();
		handle_reserve(self.try_reserve(lower));
		for element in iterator {
			handle_reserve(self.push(element));
		}
	}
}

impl<T, P: Lifecycle<T> + Default> std::iter::FromIterator<T> for DynArr<T, P> {
	fn from_iter<I: IntoIterator<Item = T>>(iterable: I) -> Self {
		let iterator = iterable.into_iter();
		let (lower, _) = iterator.size_hint();
		let mut arr = Self::with_capacity(lower);
		arr.extend(iterator);
		arr
	}
}

impl<T: fmt::Debug, P: Lifecycle<T>> fmt::Debug for DynArr<T, P> {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl<T, P: Lifecycle<T>> AsRef<[T]> for DynArr<T, P> {
	#[inline]
	fn as_ref(&self) -> &[T] {
		self
	}
}

impl<T, P: Lifecycle<T>> AsMut<[T]> for DynArr<T, P> {
	#[inline]
	fn as_mut(&mut self) -> &mut [T] {
		self
	}
}

macro_rules! impl_slice_eq1 {
	([$($vars:tt)*] $lhs:ty, $rhs:ty) => {
		impl<$($vars)*> PartialEq<$rhs> for $lhs where T: PartialEq<U> {
			#[inline]
			fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
			#[inline]
			fn ne(&self, other: &$rhs) -> bool { self[..] != other[..] }
		}
	}
}

impl_slice_eq1! { [T, U, P: Lifecycle<T>, Q: Lifecycle<U>] DynArr<T, P>, DynArr<U, Q> }
impl_slice_eq1! { [T, U, P: Lifecycle<T>] DynArr<T, P>, Vec<U> }
impl_slice_eq1! { [T, U, P: Lifecycle<U>] Vec<T>, DynArr<U, P> }
impl_slice_eq1! { [T, U, P: Lifecycle<T>] DynArr<T, P>, &[U] }
impl_slice_eq1! { [T, U, P: Lifecycle<T>] DynArr<T, P>, &mut [U] }
impl_slice_eq1! { [T, U, P: Lifecycle<U>] &[T], DynArr<U, P> }
impl_slice_eq1! { [T, U, P: Lifecycle<U>] &mut [T], DynArr<U, P> }
impl_slice_eq1! { [T, U, P: Lifecycle<T>, const N: usize] DynArr<T, P>, [U; N] }
impl_slice_eq1! { [T, U, P: Lifecycle<T>, const N: usize] DynArr<T, P>, &[U; N] }
impl_slice_eq1! { [T, U, P: Lifecycle<U>, const N: usize] [T; N], DynArr<U, P> }
impl_slice_eq1! { [T, U, P: Lifecycle<U>, const N: usize] &[T; N], DynArr<U, P> }

impl<T: Eq, P: Lifecycle<T>> Eq for DynArr<T, P> {}
