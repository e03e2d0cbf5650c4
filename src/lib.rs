//! This crate provides the [`DynArr`] data structure,
//! a growable array whose elements follow a pluggable lifecycle policy.
//!
//! The policy (see [`Lifecycle`]) decides how an element is copied into the array
//! from a borrowed source, how it is freed when it leaves the array,
//! and how the array is printed.
//! This lets the array own elements that themselves own external resources,
//! such as heap strings, and release each of them exactly once.
//!
//! ## Basic usage
//!
//! The default policy, [`Plain`], is meant for self-contained `Copy` values.
//! ```rust
//! use dynarr::DynArr;
//!
//! let mut arr: DynArr<i32> = DynArr::new(); // capacity 1.
//! arr.push(5).unwrap();
//! arr.push(6).unwrap(); // the capacity doubles here.
//! arr.insert_slice(0, &[-1, 1, 2, 3, 4]).unwrap();
//! assert_eq!(arr, [-1, 1, 2, 3, 4, 5, 6]);
//! assert_eq!(arr.capacity(), 8);
//! ```
//!
//! Every operation taking an index or a range checks it,
//! and returns an [`Error`] instead of touching the array if it is invalid:
//! ```rust
//! # use dynarr::{DynArr, Error};
//! let mut arr: DynArr<i32> = DynArr::new();
//! assert_eq!(arr.remove(0), Err(Error::IndexOutOfBounds { index: 0, len: 0 }));
//! ```
//!
//! ## Owned elements
//!
//! With the [`OwnedStrings`] policy, an array owns its strings.
//! Copying the array duplicates every string:
//! ```rust
//! use dynarr::StringArr;
//!
//! let mut arr = StringArr::new();
//! arr.push("hello".to_string()).unwrap();
//! arr.push("world".to_string()).unwrap();
//!
//! let copy = arr.deep_copy().unwrap();
//! arr.clear(); // frees the original strings.
//! assert_eq!(copy, ["hello", "world"]);
//! ```
pub mod config;
pub mod error;
pub mod raw;
pub mod generic;
pub mod policy;
pub mod string;

pub use config::ArrayConfig;
pub use error::{
	Error,
	Result
};
pub use generic::DynArr;
pub use policy::{
	Lifecycle,
	Plain,
	Ints,
	Cloned,
	IntArr
};
pub use string::{
	OwnedStrings,
	StringArr
};
