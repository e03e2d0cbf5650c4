//! Arrays of owned heap strings.
use std::io::{
	self,
	Write
};
use crate::{
	generic::DynArr,
	policy::Lifecycle
};

/// Policy for arrays owning heap-allocated strings.
///
/// Copying an element duplicates its heap buffer,
/// releasing it frees the buffer.
/// Printing writes one string per line.
///
/// # Example
///
/// ```
/// # use dynarr::StringArr;
/// let mut names = StringArr::new();
/// names.push_slice(&["ada".to_string(), "grace".to_string()]).unwrap();
///
/// let copy = names.deep_copy().unwrap();
/// names.clear();
/// assert_eq!(copy, ["ada", "grace"]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OwnedStrings;

impl Lifecycle<String> for OwnedStrings {
	#[inline]
	fn copy(&self, value: &String) -> String {
		value.as_str().to_owned()
	}

	fn print(&self, elements: &[String], out: &mut dyn io::Write) -> io::Result<()> {
		for s in elements {
			writeln!(out, "{}", s)?;
		}

		Ok(())
	}
}

/// Array of owned strings.
pub type StringArr = DynArr<String, OwnedStrings>;

impl DynArr<String, OwnedStrings> {
	/// Appends a copy of the given string slice.
	#[inline]
	pub fn push_str(&mut self, s: &str) -> crate::Result<&mut String> {
		self.push(s.to_owned())
	}

	/// Returns `true` if the array contains a string equal to `s`.
	#[inline]
	pub fn contains_str(&self, s: &str) -> bool {
		self.iter().any(|e| e == s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn copy_is_a_new_allocation() {
		let s = "hello".to_string();
		let c = OwnedStrings.copy(&s);
		assert_eq!(c, s);
		assert_ne!(c.as_ptr(), s.as_ptr());
	}

	#[test]
	fn print_one_per_line() {
		let mut out = Vec::new();
		OwnedStrings.print(&["a".to_string(), "bc".to_string()], &mut out).unwrap();
		assert_eq!(out, b"a\nbc\n");
	}

	#[test]
	fn push_str() {
		let mut arr = StringArr::new();
		arr.push_str("one").unwrap();
		arr.push_str("two").unwrap();
		assert!(arr.contains_str("two"));
		assert!(!arr.contains_str("three"));
		assert_eq!(arr.len(), 2);
	}
}
