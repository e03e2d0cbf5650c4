use proptest::prelude::*;
use dynarr::{
	DynArr,
	Error
};

/// Operation applied both to a `DynArr` and to a `Vec` model.
#[derive(Clone, Debug)]
enum Op {
	Push(i32),
	PushSlice(Vec<i32>),
	Insert(usize, i32),
	InsertSlice(usize, Vec<i32>),
	Assign(usize, i32),
	Remove(usize),
	RemoveRange(usize, usize),
	Pop,
	PopN(usize),
	Clear
}

fn op() -> impl Strategy<Value = Op> {
	let values = proptest::collection::vec(any::<i32>(), 0..8);
	prop_oneof![
		4 => any::<i32>().prop_map(Op::Push),
		2 => values.clone().prop_map(Op::PushSlice),
		2 => (0usize..24, any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
		2 => (0usize..24, values).prop_map(|(i, vs)| Op::InsertSlice(i, vs)),
		1 => (0usize..24, any::<i32>()).prop_map(|(i, v)| Op::Assign(i, v)),
		2 => (0usize..24).prop_map(Op::Remove),
		1 => (0usize..24, 0usize..6).prop_map(|(i, n)| Op::RemoveRange(i, n)),
		1 => Just(Op::Pop),
		1 => (0usize..6).prop_map(Op::PopN),
		1 => Just(Op::Clear)
	]
}

/// Applies `op` to both, and checks that the array accepts it exactly when
/// the model's preconditions hold.
fn apply(arr: &mut DynArr<i32>, model: &mut Vec<i32>, op: &Op) -> Result<(), TestCaseError> {
	let len = model.len();
	match op {
		Op::Push(v) => {
			prop_assert_eq!(*arr.push(*v).unwrap(), *v);
			model.push(*v)
		},
		Op::PushSlice(vs) => {
			prop_assert_eq!(&*arr.push_slice(vs).unwrap(), vs.as_slice());
			model.extend_from_slice(vs)
		},
		Op::Insert(i, v) => {
			let result = arr.insert(*i, *v).map(|e| *e);
			if *i <= len {
				prop_assert_eq!(result, Ok(*v));
				model.insert(*i, *v)
			} else {
				prop_assert_eq!(result, Err(Error::InsertOutOfBounds { index: *i, len }))
			}
		},
		Op::InsertSlice(i, vs) => {
			let result = arr.insert_slice(*i, vs).map(|s| s.len());
			if *i <= len {
				prop_assert_eq!(result, Ok(vs.len()));
				model.splice(*i..*i, vs.iter().copied());
			} else {
				prop_assert!(result.is_err())
			}
		},
		Op::Assign(i, v) => {
			let result = arr.assign(*i, *v).map(|e| *e);
			if *i < len {
				prop_assert_eq!(result, Ok(*v));
				model[*i] = *v
			} else {
				prop_assert_eq!(result, Err(Error::IndexOutOfBounds { index: *i, len }))
			}
		},
		Op::Remove(i) => {
			let result = arr.remove(*i);
			if *i < len {
				prop_assert!(result.is_ok());
				model.remove(*i);
			} else {
				prop_assert_eq!(result, Err(Error::IndexOutOfBounds { index: *i, len }))
			}
		},
		Op::RemoveRange(i, n) => {
			let result = arr.remove_range(*i, *n);
			if i + n <= len {
				prop_assert!(result.is_ok());
				model.drain(*i..(i + n));
			} else {
				prop_assert_eq!(result, Err(Error::RangeOutOfBounds { index: *i, count: *n, len }))
			}
		},
		Op::Pop => {
			let result = arr.pop();
			if len > 0 {
				prop_assert!(result.is_ok());
				model.pop();
			} else {
				prop_assert_eq!(result, Err(Error::Underflow { count: 1, len }))
			}
		},
		Op::PopN(n) => {
			let result = arr.pop_n(*n);
			if *n <= len {
				prop_assert!(result.is_ok());
				model.truncate(len - n)
			} else {
				prop_assert_eq!(result, Err(Error::Underflow { count: *n, len }))
			}
		},
		Op::Clear => {
			arr.clear();
			model.clear()
		}
	}

	Ok(())
}

proptest! {
	#[test]
	fn behaves_like_vec(ops in proptest::collection::vec(op(), 0..64)) {
		let mut arr: DynArr<i32> = DynArr::new();
		let mut model = Vec::new();
		let mut capacity = arr.capacity();

		for op in &ops {
			apply(&mut arr, &mut model, op)?;
			prop_assert_eq!(arr.as_slice(), model.as_slice());

			// the capacity never shrinks, and only ever doubles.
			prop_assert!(arr.len() <= arr.capacity());
			prop_assert!(arr.capacity() >= capacity);
			prop_assert!(arr.capacity().is_power_of_two());
			capacity = arr.capacity();
		}
	}

	#[test]
	fn insert_then_remove_restores(
		base in proptest::collection::vec(any::<i16>(), 0..32),
		inserted in proptest::collection::vec(any::<i16>(), 0..16),
		at in any::<prop::sample::Index>()
	) {
		let mut arr: DynArr<i16> = base.iter().copied().collect();
		let index = at.index(base.len() + 1);

		arr.insert_slice(index, &inserted).unwrap();
		prop_assert_eq!(&arr[index..(index + inserted.len())], inserted.as_slice());
		arr.remove_range(index, inserted.len()).unwrap();
		prop_assert_eq!(arr, base);
	}

	#[test]
	fn remove_keeps_order(
		base in proptest::collection::vec(any::<u8>(), 1..32),
		at in any::<prop::sample::Index>()
	) {
		let mut arr: DynArr<u8> = base.iter().copied().collect();
		let index = at.index(base.len());
		arr.remove(index).unwrap();

		let expected: Vec<u8> = base.iter().enumerate().filter(|(i, _)| *i != index).map(|(_, b)| *b).collect();
		prop_assert_eq!(arr, expected);
	}

	#[test]
	fn deep_copies_are_independent(
		base in proptest::collection::vec(".{0,8}", 0..16),
		extra in ".{0,8}"
	) {
		let mut arr = dynarr::StringArr::new();
		arr.push_slice(&base).unwrap();
		let capacity = arr.capacity();
		let copy = arr.deep_copy().unwrap();

		arr.push(extra).unwrap();
		for s in arr.iter_mut() {
			s.push('#');
		}

		prop_assert_eq!(copy.capacity(), capacity);
		prop_assert_eq!(copy, base);
	}
}
