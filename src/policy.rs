//! Element lifecycle policies.
//!
//! A policy tells a [`DynArr`](crate::DynArr) how to duplicate elements coming from a borrowed
//! source, how to release elements leaving the array, and how to print the array.
//! This crate provides four of them:
//! [`Plain`] for self-contained `Copy` values,
//! [`Ints`] for integers (printing only),
//! [`Cloned`] for any `Clone` type,
//! and [`OwnedStrings`](crate::string::OwnedStrings) for heap strings.
use std::io::{
	self,
	Write
};

/// Per-element lifecycle operations.
///
/// The policy of an array is chosen at construction and is fixed for the array's lifetime.
pub trait Lifecycle<T> {
	/// Produces an owned duplicate of `value`, to be stored in the array.
	///
	/// Called once for every element copied from a borrowed source
	/// (`push_slice`, `insert_slice`, `assign_slice`, `deep_copy`).
	fn copy(&self, value: &T) -> T;

	/// Releases an element leaving the array.
	///
	/// Every element removed from the array, overwritten by `assign`,
	/// or still present when the array is dropped, is passed to this function exactly once.
	#[inline]
	fn free(&self, value: T) {
		drop(value)
	}

	/// Prints the live elements of an array.
	///
	/// Called once per `print` with the whole live range.
	/// The default implementation prints nothing.
	#[inline]
	fn print(&self, elements: &[T], out: &mut dyn io::Write) -> io::Result<()> {
		let _ = (elements, out);
		Ok(())
	}
}

/// Policy for plain values.
///
/// Elements are copied bit for bit and have nothing to release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Plain;

impl<T: Copy> Lifecycle<T> for Plain {
	#[inline]
	fn copy(&self, value: &T) -> T {
		*value
	}

	#[inline]
	fn free(&self, _value: T) {}
}

/// Policy for arrays of integers.
///
/// Like [`Plain`], but printing writes every element followed by a space, then a newline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ints;

macro_rules! impl_ints {
	($($ty:ty),*) => {
		$(
			impl Lifecycle<$ty> for Ints {
				#[inline]
				fn copy(&self, value: &$ty) -> $ty {
					*value
				}

				#[inline]
				fn free(&self, _value: $ty) {}

				fn print(&self, elements: &[$ty], out: &mut dyn io::Write) -> io::Result<()> {
					for e in elements {
						write!(out, "{} ", e)?;
					}
					writeln!(out)
				}
			}
		)*
	}
}

impl_ints!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Array of `i32` printed by [`Ints`].
pub type IntArr = crate::generic::DynArr<i32, Ints>;

/// Policy for elements owning resources through `Clone` and `Drop`.
///
/// Copying clones the element, releasing drops it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cloned;

impl<T: Clone> Lifecycle<T> for Cloned {
	#[inline]
	fn copy(&self, value: &T) -> T {
		value.clone()
	}
}
