//! Typed selections out of a pool of items.

use zkpc_core::{Gadget, GadgetKind};

/// Every ordered selection of one pool item per pattern entry, with matching kinds.
///
/// No pool item is used twice within one selection. Items are told apart by their position in
/// `pool`, so two equal items at different positions may both appear in a selection. Selections
/// follow pattern order, and are enumerated in pool order.
///
/// An empty pattern selects nothing and yields no selection at all.
pub fn combinations<'a, T, K, F>(pattern: &[K], pool: &[&'a T], kind_of: F) -> Vec<Vec<&'a T>>
where
	K: PartialEq,
	F: Fn(&T) -> K,
{
	let mut out = Vec::new();
	if pattern.is_empty() {
		return out;
	}
	let mut used = vec![false; pool.len()];
	let mut selection = Vec::with_capacity(pattern.len());
	extend(pattern, pool, &kind_of, &mut used, &mut selection, &mut out);
	out
}

fn extend<'a, T, K, F>(
	pattern: &[K],
	pool: &[&'a T],
	kind_of: &F,
	used: &mut [bool],
	selection: &mut Vec<&'a T>,
	out: &mut Vec<Vec<&'a T>>,
) where
	K: PartialEq,
	F: Fn(&T) -> K,
{
	let Some((first, rest)) = pattern.split_first() else {
		out.push(selection.clone());
		return;
	};
	for (i, &item) in pool.iter().enumerate() {
		if used[i] || kind_of(item) != *first {
			continue;
		}
		used[i] = true;
		selection.push(item);
		extend(rest, pool, kind_of, used, selection, out);
		selection.pop();
		used[i] = false;
	}
}

pub fn gadget_combinations<'a>(
	pattern: &[GadgetKind],
	pool: &[&'a Gadget],
) -> Vec<Vec<&'a Gadget>> {
	combinations(pattern, pool, Gadget::kind)
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[derive(Debug, Clone, Copy, PartialEq)]
	enum Shape {
		Circle,
		Square,
		Triangle,
	}

	fn shape() -> impl Strategy<Value = Shape> {
		prop_oneof![Just(Shape::Circle), Just(Shape::Square), Just(Shape::Triangle)]
	}

	#[test]
	fn empty_pattern_has_no_selection() {
		let pool = [&Shape::Circle];
		assert!(combinations(&[], &pool, |s: &Shape| *s).is_empty());
	}

	#[test]
	fn repeated_kinds_do_not_reuse_items() {
		let (a, b, c) = (Shape::Circle, Shape::Circle, Shape::Square);
		let pool = [&a, &b, &c];
		let found = combinations(&[Shape::Circle, Shape::Circle], &pool, |s: &Shape| *s);
		assert_eq!(found.len(), 2);
		assert!(found.iter().all(|sel| !std::ptr::eq(sel[0], sel[1])));

		let found = combinations(&[Shape::Square, Shape::Circle], &pool, |s: &Shape| *s);
		assert_eq!(found.len(), 2);
		assert!(found.iter().all(|sel| *sel[0] == Shape::Square));
	}

	#[test]
	fn missing_kind_yields_nothing() {
		let a = Shape::Circle;
		let found = combinations(&[Shape::Circle, Shape::Triangle], &[&a], |s: &Shape| *s);
		assert!(found.is_empty());
	}

	proptest! {
		#[test]
		fn selections_are_typed_and_never_reuse_an_item(
			pool in prop::collection::vec(shape(), 0..7),
			pattern in prop::collection::vec(shape(), 1..4),
		) {
			let refs: Vec<&Shape> = pool.iter().collect();
			let found = combinations(&pattern, &refs, |s: &Shape| *s);
			for selection in &found {
				prop_assert_eq!(selection.len(), pattern.len());
				for (item, kind) in selection.iter().zip(&pattern) {
					prop_assert_eq!(**item, *kind);
				}
				for i in 0..selection.len() {
					for j in i + 1..selection.len() {
						prop_assert!(!std::ptr::eq(selection[i], selection[j]));
					}
				}
			}

			// Count matches a direct product of the available items per kind.
			let mut expected = 1usize;
			let mut remaining = pool.clone();
			for kind in &pattern {
				let available = remaining.iter().filter(|s| *s == kind).count();
				expected *= available;
				if let Some(i) = remaining.iter().position(|s| s == kind) {
					remaining.remove(i);
				}
			}
			prop_assert_eq!(found.len(), expected);
		}
	}
}
